//! Wire format: exactly [`FRAME_LEN`] bytes, cell `(z, y, x)` at `z*64 + y*8 + x`.

use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::{FRAME_LEN, Frame};

/// Serialize a frame into its wire payload.
pub fn encode(frame: &Frame) -> Vec<u8> {
    frame.as_bytes().to_vec()
}

/// Parse a wire payload. Anything other than exactly [`FRAME_LEN`] bytes is rejected.
pub fn decode(payload: &[u8]) -> TessledResult<Frame> {
    let cells: [u8; FRAME_LEN] = payload.try_into().map_err(|_| {
        TessledError::codec(format!(
            "frame payload must be {FRAME_LEN} bytes, got {}",
            payload.len()
        ))
    })?;
    Ok(Frame::from_cells(cells))
}

#[cfg(test)]
#[path = "../../tests/unit/transport/codec.rs"]
mod tests;
