//! Frame transport: the 512-byte wire codec and the publish/subscribe seams.

pub mod codec;
pub mod sink;
pub mod source;
#[cfg(feature = "zmq-transport")]
pub mod zmq;

pub use codec::{decode, encode};
pub use sink::{ChannelSink, FrameSink, InMemorySink};
pub use source::{ChannelSource, FrameSource, LatestFrame, ReceivePolicy, TransportStats};
#[cfg(feature = "zmq-transport")]
pub use self::zmq::{ZmqPublisher, ZmqSubscriber};

/// Endpoint used when no address is configured.
pub const DEFAULT_FRAME_ADDR: &str = "tcp://127.0.0.1:5556";
