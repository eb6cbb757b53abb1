pub type TessledResult<T> = Result<T, TessledError>;

/// Library error type.
///
/// Configuration, transport and hardware failures are all fatal to the process that hits them;
/// callers at the binary edge wrap them in `anyhow` with context.
#[derive(thiserror::Error, Debug)]
pub enum TessledError {
    /// Invalid startup configuration (unknown identifiers, bad ranges, unreadable files).
    #[error("configuration error: {0}")]
    Config(String),

    /// Publish/subscribe failure other than "no message available".
    #[error("transport error: {0}")]
    Transport(String),

    /// Peripheral I/O failure while driving the LED chain.
    #[error("hardware error: {0}")]
    Hardware(String),

    /// Malformed frame payload.
    #[error("codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TessledError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn hardware(msg: impl Into<String>) -> Self {
        Self::Hardware(msg.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
