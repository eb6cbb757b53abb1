use std::sync::mpsc;

use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::Frame;
use crate::transport::codec;

/// Publish side of the frame stream.
///
/// Publication is fire-and-forget: a sink never waits for a subscriber and never reports
/// whether anyone received the frame.
pub trait FrameSink: Send {
    fn publish(&mut self, frame: &Frame) -> TessledResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    frames: Vec<Frame>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Published frames in order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn publish(&mut self, frame: &Frame) -> TessledResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Sink that hands encoded payloads to an in-process [`ChannelSource`](super::ChannelSource).
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<Vec<u8>>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<Vec<u8>>) -> Self {
        Self { tx }
    }
}

impl FrameSink for ChannelSink {
    fn publish(&mut self, frame: &Frame) -> TessledResult<()> {
        self.tx
            .send(codec::encode(frame))
            .map_err(|_| TessledError::transport("frame channel closed"))
    }
}
