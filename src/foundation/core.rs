use std::time::Duration;

use crate::foundation::error::{TessledError, TessledResult};

/// Frames per second of the animation clock.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fps(f64);

impl Fps {
    /// Create a validated frame rate: finite, strictly positive, and slow enough that one
    /// tick still fits in a [`Duration`].
    pub fn new(hz: f64) -> TessledResult<Self> {
        if !hz.is_finite() || hz <= 0.0 {
            return Err(TessledError::config(format!(
                "fps must be a positive number, got {hz}"
            )));
        }
        Duration::try_from_secs_f64(1.0 / hz).map_err(|_| {
            TessledError::config(format!("fps {hz} is too low, one tick would not fit a duration"))
        })?;
        Ok(Self(hz))
    }

    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// Duration of one tick in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        1.0 / self.0
    }

    /// Duration of one tick.
    pub fn tick(self) -> Duration {
        // `new` checked that the tick is representable.
        Duration::try_from_secs_f64(self.frame_duration_secs()).unwrap_or(Duration::MAX)
    }

    /// Convert a tick count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to a whole number of ticks, rounding down.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.0).floor().max(0.0) as u64
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(10.0)
    }
}

impl TryFrom<f64> for Fps {
    type Error = TessledError;

    fn try_from(hz: f64) -> TessledResult<Self> {
        Self::new(hz)
    }
}

impl From<Fps> for f64 {
    fn from(fps: Fps) -> Self {
        fps.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
