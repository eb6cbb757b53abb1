//! Subscribe side of the frame stream and the stale-frame rule.

use std::sync::mpsc;

use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::Frame;
use crate::transport::{codec, sink::ChannelSink};

/// Non-blocking frame source.
pub trait FrameSource {
    /// Next raw payload, or `None` when nothing is queued. Errors are real transport failures.
    fn try_recv(&mut self) -> TessledResult<Option<Vec<u8>>>;
}

/// In-process source fed by a [`ChannelSink`].
#[derive(Debug)]
pub struct ChannelSource {
    rx: mpsc::Receiver<Vec<u8>>,
}

impl ChannelSource {
    pub fn new(rx: mpsc::Receiver<Vec<u8>>) -> Self {
        Self { rx }
    }

    /// Connected sink/source pair.
    pub fn pair() -> (ChannelSink, ChannelSource) {
        let (tx, rx) = mpsc::channel();
        (ChannelSink::new(tx), ChannelSource::new(rx))
    }
}

impl FrameSource for ChannelSource {
    fn try_recv(&mut self) -> TessledResult<Option<Vec<u8>>> {
        match self.rx.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(mpsc::TryRecvError::Empty) => Ok(None),
            Err(mpsc::TryRecvError::Disconnected) => {
                Err(TessledError::transport("frame channel disconnected"))
            }
        }
    }
}

/// How many queued messages one poll consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReceivePolicy {
    /// Read everything queued and keep only the newest valid frame.
    #[default]
    DrainToLatest,
    /// Read at most one message; a backlog is worked off one poll at a time.
    OnePerPoll,
}

/// Transport counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Valid frames accepted.
    pub received: u64,
    /// Payloads dropped for having the wrong length.
    pub malformed: u64,
}

/// The most recent valid frame from a source.
///
/// Until the first frame arrives the current frame is all dark. When a poll finds nothing, the
/// previous frame stays current.
#[derive(Debug)]
pub struct LatestFrame<S> {
    source: S,
    policy: ReceivePolicy,
    current: Frame,
    stats: TransportStats,
}

impl<S: FrameSource> LatestFrame<S> {
    pub fn new(source: S, policy: ReceivePolicy) -> Self {
        Self {
            source,
            policy,
            current: Frame::empty(),
            stats: TransportStats::default(),
        }
    }

    pub fn current(&self) -> &Frame {
        &self.current
    }

    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    pub fn policy(&self) -> ReceivePolicy {
        self.policy
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Check for new frames without blocking. Returns `true` when the current frame changed.
    pub fn poll(&mut self) -> TessledResult<bool> {
        let mut updated = false;
        while let Some(payload) = self.source.try_recv()? {
            match codec::decode(&payload) {
                Ok(frame) => {
                    self.current = frame;
                    self.stats.received += 1;
                    updated = true;
                }
                Err(err) => {
                    self.stats.malformed += 1;
                    tracing::warn!(
                        len = payload.len(),
                        dropped = self.stats.malformed,
                        "dropping malformed frame: {err}"
                    );
                }
            }
            if self.policy == ReceivePolicy::OnePerPoll {
                break;
            }
        }
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transport/source.rs"]
mod tests;
