//! Multiplexed layer scanning.
//!
//! Only one layer is powered at a time. For each layer step the whole output array is rebuilt:
//! outputs `0..8` select the powered layer and outputs `16..80` carry that layer's 64 LEDs in
//! `(y, x)` order, scaled from 8-bit to 12-bit.

use std::convert::Infallible;
use std::time::Duration;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::{Frame, LAYER_LEN, LAYERS};
use crate::hardware::tlc::{CHANNELS_PER_CHIP, PWM_MAX, TlcChain};
use crate::transport::{FrameSource, LatestFrame, TransportStats};

/// First output carrying LED data.
pub const DATA_OFFSET: usize = 16;
/// Smallest chain that fits the layer selectors and one layer of data.
pub const MIN_CHIPS: usize = (DATA_OFFSET + LAYER_LEN).div_ceil(CHANNELS_PER_CHIP);
/// 8-bit to 12-bit scale factor.
pub const INTENSITY_SCALE: u16 = 16;
/// Cycles between statistics log lines.
pub const STATS_INTERVAL: u64 = 100;

/// Fill `outputs` for one layer step of `frame`. Every output is rewritten.
///
/// `outputs` must hold at least `MIN_CHIPS * 16` values.
pub fn fill_layer_outputs(outputs: &mut [u16], layer: usize, frame: &Frame) {
    outputs.fill(0);
    outputs[layer] = PWM_MAX;
    for (out, &v) in outputs[DATA_OFFSET..DATA_OFFSET + LAYER_LEN]
        .iter_mut()
        .zip(frame.layer(layer))
    {
        *out = u16::from(v) * INTENSITY_SCALE;
    }
}

/// Fresh output array for one layer step.
pub fn layer_outputs(n_outputs: usize, layer: usize, frame: &Frame) -> Vec<u16> {
    let mut outputs = vec![0; n_outputs];
    fill_layer_outputs(&mut outputs, layer, frame);
    outputs
}

/// Where the non-blocking frame check happens.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PollMode {
    /// Once before each full 8-layer cycle.
    #[default]
    PerCycle,
    /// Before every layer step.
    PerLayer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub cycles: u64,
    pub transport: TransportStats,
}

pub struct ScanDriver<P, S, F> {
    chain: TlcChain<P, S>,
    frames: LatestFrame<F>,
    poll: PollMode,
    outputs: Vec<u16>,
    cycles: u64,
}

impl<P, S, F> ScanDriver<P, S, F>
where
    P: OutputPin,
    S: SpiBus<u8>,
    F: FrameSource,
{
    /// The chain must already be initialized, see [`TlcChain::init`].
    pub fn new(
        chain: TlcChain<P, S>,
        frames: LatestFrame<F>,
        poll: PollMode,
    ) -> TessledResult<Self> {
        if chain.chips() < MIN_CHIPS {
            return Err(TessledError::config(format!(
                "scanning needs at least {MIN_CHIPS} chips, chain has {}",
                chain.chips()
            )));
        }
        let outputs = vec![0; chain.outputs()];
        Ok(Self {
            chain,
            frames,
            poll,
            outputs,
            cycles: 0,
        })
    }

    pub fn stats(&self) -> ScanStats {
        ScanStats {
            cycles: self.cycles,
            transport: self.frames.stats(),
        }
    }

    pub fn current_frame(&self) -> &Frame {
        self.frames.current()
    }

    pub fn chain(&self) -> &TlcChain<P, S> {
        &self.chain
    }

    pub fn into_parts(self) -> (TlcChain<P, S>, LatestFrame<F>) {
        (self.chain, self.frames)
    }

    fn step(&mut self, layer: usize) -> TessledResult<()> {
        fill_layer_outputs(&mut self.outputs, layer, self.frames.current());
        self.chain.write_pwm(&self.outputs)
    }

    /// Drive all layers once, polling for a new frame per [`PollMode`].
    pub fn scan_cycle(&mut self) -> TessledResult<()> {
        if self.poll == PollMode::PerCycle {
            self.frames.poll()?;
        }
        for layer in 0..LAYERS {
            if self.poll == PollMode::PerLayer {
                self.frames.poll()?;
            }
            self.step(layer)?;
        }
        self.cycles += 1;
        if self.cycles % STATS_INTERVAL == 0 {
            let stats = self.frames.stats();
            tracing::debug!(
                cycles = self.cycles,
                frames = stats.received,
                malformed = stats.malformed,
                "scan statistics"
            );
        }
        Ok(())
    }

    pub fn run_cycles(&mut self, cycles: u64) -> TessledResult<()> {
        for _ in 0..cycles {
            self.scan_cycle()?;
        }
        Ok(())
    }

    /// Scan until a peripheral or transport error.
    pub fn run(&mut self) -> TessledResult<Infallible> {
        loop {
            self.scan_cycle()?;
        }
    }
}

/// Flicker threshold for the whole-cube refresh rate.
pub const FLICKER_FREE_HZ: f64 = 60.0;

/// Back-of-the-envelope scan timing from bus speed alone (GPIO and CPU time ignored).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanTiming {
    /// Bytes shifted per layer step.
    pub bytes_per_layer: usize,
    pub layer_write: Duration,
    /// Full 8-layer refreshes per second.
    pub refresh_hz: f64,
}

impl ScanTiming {
    pub fn estimate(chips: usize, spi_hz: u32) -> Self {
        let bytes_per_layer = chips * CHANNELS_PER_CHIP * 12 / 8;
        let secs = (bytes_per_layer * 8) as f64 / f64::from(spi_hz.max(1));
        Self {
            bytes_per_layer,
            layer_write: Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX),
            refresh_hz: 1.0 / (secs * LAYERS as f64),
        }
    }

    pub fn is_flicker_free(&self) -> bool {
        self.refresh_hz >= FLICKER_FREE_HZ
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hardware/scan.rs"]
mod tests;
