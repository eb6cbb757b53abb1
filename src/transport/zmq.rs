//! ZeroMQ PUB/SUB transport.

use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::Frame;
use crate::transport::{FrameSink, FrameSource, codec};

fn zmq_err(what: &str, addr: &str, err: zmq::Error) -> TessledError {
    TessledError::transport(format!("{what} {addr}: {err}"))
}

/// PUB socket bound to the frame address.
pub struct ZmqPublisher {
    socket: zmq::Socket,
    addr: String,
    // Keeps the context alive for as long as the socket.
    _context: zmq::Context,
}

impl ZmqPublisher {
    pub fn bind(addr: &str) -> TessledResult<Self> {
        Self::bind_in(zmq::Context::new(), addr)
    }

    /// Bind within an existing context (required for `inproc://` endpoints).
    pub fn bind_in(context: zmq::Context, addr: &str) -> TessledResult<Self> {
        let socket = context
            .socket(zmq::PUB)
            .map_err(|e| zmq_err("create PUB socket for", addr, e))?;
        socket
            .set_linger(0)
            .map_err(|e| zmq_err("configure", addr, e))?;
        socket.bind(addr).map_err(|e| zmq_err("bind", addr, e))?;
        tracing::info!(%addr, "publishing frames");
        Ok(Self {
            socket,
            addr: addr.to_owned(),
            _context: context,
        })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}

impl FrameSink for ZmqPublisher {
    fn publish(&mut self, frame: &Frame) -> TessledResult<()> {
        self.socket
            .send(codec::encode(frame), 0)
            .map_err(|e| zmq_err("publish to", &self.addr, e))
    }
}

/// SUB socket connected to the frame address, subscribed to everything.
pub struct ZmqSubscriber {
    socket: zmq::Socket,
    addr: String,
    _context: zmq::Context,
}

impl ZmqSubscriber {
    pub fn connect(addr: &str) -> TessledResult<Self> {
        Self::connect_in(zmq::Context::new(), addr)
    }

    pub fn connect_in(context: zmq::Context, addr: &str) -> TessledResult<Self> {
        let socket = context
            .socket(zmq::SUB)
            .map_err(|e| zmq_err("create SUB socket for", addr, e))?;
        socket
            .set_linger(0)
            .map_err(|e| zmq_err("configure", addr, e))?;
        socket
            .set_subscribe(b"")
            .map_err(|e| zmq_err("subscribe to", addr, e))?;
        socket
            .connect(addr)
            .map_err(|e| zmq_err("connect to", addr, e))?;
        tracing::info!(%addr, "subscribed to frames");
        Ok(Self {
            socket,
            addr: addr.to_owned(),
            _context: context,
        })
    }
}

impl FrameSource for ZmqSubscriber {
    fn try_recv(&mut self) -> TessledResult<Option<Vec<u8>>> {
        match self.socket.recv_bytes(zmq::DONTWAIT) {
            Ok(payload) => Ok(Some(payload)),
            Err(zmq::Error::EAGAIN) => Ok(None),
            Err(e) => Err(zmq_err("receive from", &self.addr, e)),
        }
    }
}
