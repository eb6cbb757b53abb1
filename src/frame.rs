//! Voxel frames and per-device coordinate transforms.
//!
//! A frame is addressed `(z, y, x)` with `z` the layer (bottom first), and is stored row-major
//! with `z` outermost. That storage order is also the wire order, see [`crate::transport::codec`].

use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::foundation::core::Fps;
use crate::foundation::error::{TessledError, TessledResult};

/// Number of cells along each axis.
pub const SIDE: usize = 8;
/// Frame shape as (Z, Y, X).
pub const FRAME_SHAPE: (usize, usize, usize) = (SIDE, SIDE, SIDE);
/// Number of Z-layers (the unit of multiplexed scanning).
pub const LAYERS: usize = SIDE;
/// Cells in one layer.
pub const LAYER_LEN: usize = SIDE * SIDE;
/// Cells in one frame.
pub const FRAME_LEN: usize = SIDE * SIDE * SIDE;

/// One 8x8x8 grid of 8-bit intensities.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    cells: [u8; FRAME_LEN],
}

impl Frame {
    /// Zero-filled frame.
    pub fn empty() -> Self {
        Self {
            cells: [0; FRAME_LEN],
        }
    }

    /// Frame with every cell set to `value`.
    pub fn filled(value: u8) -> Self {
        Self {
            cells: [value; FRAME_LEN],
        }
    }

    pub fn from_cells(cells: [u8; FRAME_LEN]) -> Self {
        Self { cells }
    }

    /// Flat storage offset of `(z, y, x)`.
    #[inline]
    pub fn offset(z: usize, y: usize, x: usize) -> usize {
        debug_assert!(z < SIDE && y < SIDE && x < SIDE);
        z * LAYER_LEN + y * SIDE + x
    }

    /// `true` when all three coordinates fall inside the grid.
    #[inline]
    pub fn contains(z: i32, y: i32, x: i32) -> bool {
        let side = SIDE as i32;
        (0..side).contains(&z) && (0..side).contains(&y) && (0..side).contains(&x)
    }

    pub fn get(&self, z: usize, y: usize, x: usize) -> u8 {
        self.cells[Self::offset(z, y, x)]
    }

    pub fn set(&mut self, z: usize, y: usize, x: usize, value: u8) {
        self.cells[Self::offset(z, y, x)] = value;
    }

    /// Set a cell given signed coordinates; out-of-grid writes are ignored.
    pub fn set_clipped(&mut self, z: i32, y: i32, x: i32, value: u8) {
        if Self::contains(z, y, x) {
            self.set(z as usize, y as usize, x as usize, value);
        }
    }

    /// Raise a cell to `value` if it is currently dimmer (soft-edged composition).
    pub fn max_merge(&mut self, z: usize, y: usize, x: usize, value: u8) {
        let cell = &mut self.cells[Self::offset(z, y, x)];
        *cell = (*cell).max(value);
    }

    pub fn fill(&mut self, value: u8) {
        self.cells.fill(value);
    }

    /// The 64 cells of layer `z`, in (y, x) row-major order.
    pub fn layer(&self, z: usize) -> &[u8] {
        &self.cells[z * LAYER_LEN..(z + 1) * LAYER_LEN]
    }

    pub fn layer_mut(&mut self, z: usize) -> &mut [u8] {
        &mut self.cells[z * LAYER_LEN..(z + 1) * LAYER_LEN]
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.cells
    }

    /// Number of cells that are not dark.
    pub fn lit_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Text picture of the frame: one 8x8 block per layer, top layer first, `y` rows downwards.
    pub fn to_text(&self) -> String {
        const SHADES: &[u8] = b" .:-=+*#%@";
        let mut out = String::with_capacity(LAYERS * (SIDE + 1) * (SIDE + 12));
        for z in (0..LAYERS).rev() {
            out.push_str(&format!("z={z}\n"));
            for row in self.layer(z).chunks(SIDE) {
                out.push('|');
                for &v in row {
                    let shade = usize::from(v) * (SHADES.len() - 1) / 255;
                    out.push(char::from(SHADES[shade]));
                }
                out.push_str("|\n");
            }
        }
        out
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("lit", &self.lit_count())
            .finish_non_exhaustive()
    }
}

impl Index<(usize, usize, usize)> for Frame {
    type Output = u8;

    fn index(&self, (z, y, x): (usize, usize, usize)) -> &u8 {
        &self.cells[Self::offset(z, y, x)]
    }
}

impl IndexMut<(usize, usize, usize)> for Frame {
    fn index_mut(&mut self, (z, y, x): (usize, usize, usize)) -> &mut u8 {
        &mut self.cells[Self::offset(z, y, x)]
    }
}

/// Physical device a frame is destined for.
///
/// The virtual frame produced by the engine is mapped into the device's wiring order by
/// [`DeviceType::virtual_to_physical`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum DeviceType {
    /// The on-screen simulator: identity mapping.
    Simulator,
    /// The full cube: Z and Y reversed.
    #[default]
    Tesseract,
    /// The small prototype cube: Z reversed.
    Minicube,
}

/// Closed lookup table of device identifiers.
pub const DEVICE_TYPES: &[(&str, DeviceType)] = &[
    ("simulator", DeviceType::Simulator),
    ("tesseract", DeviceType::Tesseract),
    ("minicube", DeviceType::Minicube),
];

impl DeviceType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Simulator => "simulator",
            Self::Tesseract => "tesseract",
            Self::Minicube => "minicube",
        }
    }

    /// Look up a device by identifier.
    pub fn lookup(name: &str) -> TessledResult<Self> {
        let key = name.trim().to_ascii_lowercase();
        DEVICE_TYPES
            .iter()
            .find(|(n, _)| *n == key)
            .map(|&(_, d)| d)
            .ok_or_else(|| {
                let known: Vec<&str> = DEVICE_TYPES.iter().map(|(n, _)| *n).collect();
                TessledError::config(format!(
                    "unknown device type '{name}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }

    /// Map a virtual frame into this device's physical coordinate order.
    pub fn virtual_to_physical(self, frame: &Frame) -> Frame {
        match self {
            Self::Simulator => frame.clone(),
            Self::Tesseract => remap(frame, true, true),
            Self::Minicube => remap(frame, true, false),
        }
    }
}

fn remap(frame: &Frame, flip_z: bool, flip_y: bool) -> Frame {
    let last = SIDE - 1;
    let mut out = Frame::empty();
    for z in 0..SIDE {
        let sz = if flip_z { last - z } else { z };
        for y in 0..SIDE {
            let sy = if flip_y { last - y } else { y };
            let src = Frame::offset(sz, sy, 0);
            let dst = Frame::offset(z, y, 0);
            out.cells[dst..dst + SIDE].copy_from_slice(&frame.cells[src..src + SIDE]);
        }
    }
    out
}

impl FromStr for DeviceType {
    type Err = TessledError;

    fn from_str(s: &str) -> TessledResult<Self> {
        Self::lookup(s)
    }
}

impl TryFrom<String> for DeviceType {
    type Error = TessledError;

    fn try_from(s: String) -> TessledResult<Self> {
        Self::lookup(&s)
    }
}

impl From<DeviceType> for String {
    fn from(d: DeviceType) -> Self {
        d.name().to_owned()
    }
}

impl std::fmt::Display for DeviceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-process constants every animation unit is bound to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConstants {
    pub fps: Fps,
    pub device: DeviceType,
}

impl FrameConstants {
    pub fn new(fps: Fps, device: DeviceType) -> Self {
        Self { fps, device }
    }

    pub fn empty_frame(&self) -> Frame {
        Frame::empty()
    }

    pub fn virtual_to_physical(&self, frame: &Frame) -> Frame {
        self.device.virtual_to_physical(frame)
    }
}

impl Default for FrameConstants {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            device: DeviceType::Simulator,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/frame/frame.rs"]
mod tests;
