//! Daisy-chained TLC5940 constant-current drivers.
//!
//! Data is shifted out over SPI, last output first, and latched with XLAT. BLANK turns all
//! outputs off; VPRG selects the dot-correction register bank and DCPRG selects whether dot
//! correction comes from that register or from EEPROM.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::spi::SpiBus;

use crate::foundation::error::{TessledError, TessledResult};
use crate::hardware::pack::{Polarity, pack_6bit, pack_12bit};

/// Outputs per chip.
pub const CHANNELS_PER_CHIP: usize = 16;
/// Full-scale grayscale value.
pub const PWM_MAX: u16 = 4095;
/// Full-scale dot-correction value.
pub const DC_MAX: u8 = 63;

/// The four control lines, all of one pin type.
#[derive(Debug)]
pub struct ControlPins<P> {
    pub blank: P,
    pub vprg: P,
    pub xlat: P,
    pub dcprg: P,
}

#[derive(Clone, Copy, Debug)]
enum Line {
    Blank,
    Vprg,
    Xlat,
    Dcprg,
}

impl Line {
    fn name(self) -> &'static str {
        match self {
            Self::Blank => "BLANK",
            Self::Vprg => "VPRG",
            Self::Xlat => "XLAT",
            Self::Dcprg => "DCPRG",
        }
    }
}

/// Where BLANK is asserted during a grayscale write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlankMode {
    /// Shift with outputs running, blank only around the XLAT pulse.
    #[default]
    DuringLatch,
    /// Blank for the whole shift and latch.
    DuringLoad,
    /// Never blank; the latch lands while outputs keep running.
    Overlapped,
}

/// Grayscale write progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteState {
    Idle,
    Loading,
    Latching,
}

pub struct TlcChain<P, S> {
    pins: ControlPins<P>,
    spi: S,
    chips: usize,
    polarity: Polarity,
    blank_mode: BlankMode,
    state: WriteState,
    reversed: Vec<u16>,
}

impl<P: OutputPin, S: SpiBus<u8>> TlcChain<P, S> {
    pub fn new(
        pins: ControlPins<P>,
        spi: S,
        chips: usize,
        polarity: Polarity,
        blank_mode: BlankMode,
    ) -> Self {
        Self {
            pins,
            spi,
            chips,
            polarity,
            blank_mode,
            state: WriteState::Idle,
            reversed: Vec::with_capacity(chips * CHANNELS_PER_CHIP),
        }
    }

    pub fn chips(&self) -> usize {
        self.chips
    }

    /// Total outputs along the chain.
    pub fn outputs(&self) -> usize {
        self.chips * CHANNELS_PER_CHIP
    }

    pub fn state(&self) -> WriteState {
        self.state
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Give back the pins and bus.
    pub fn release(self) -> (ControlPins<P>, S) {
        (self.pins, self.spi)
    }

    fn pin(&mut self, line: Line) -> &mut P {
        match line {
            Line::Blank => &mut self.pins.blank,
            Line::Vprg => &mut self.pins.vprg,
            Line::Xlat => &mut self.pins.xlat,
            Line::Dcprg => &mut self.pins.dcprg,
        }
    }

    /// Drive `line` to a logical level, translated through the chain polarity.
    fn drive(&mut self, line: Line, high: bool) -> TessledResult<()> {
        let level = self.polarity.level(high);
        self.set_raw(line, level)
    }

    fn set_raw(&mut self, line: Line, level: bool) -> TessledResult<()> {
        self.pin(line)
            .set_state(PinState::from(level))
            .map_err(|e| TessledError::hardware(format!("{} pin: {e:?}", line.name())))
    }

    fn shift(&mut self, mut bytes: Vec<u8>) -> TessledResult<()> {
        self.polarity.apply(&mut bytes);
        self.spi
            .write(&bytes)
            .and_then(|()| self.spi.flush())
            .map_err(|e| TessledError::hardware(format!("SPI write of {} bytes: {e:?}", bytes.len())))
    }

    fn pulse_xlat(&mut self) -> TessledResult<()> {
        self.drive(Line::Xlat, true)?;
        self.drive(Line::Xlat, false)
    }

    fn check_len(&self, what: &str, len: usize) -> TessledResult<()> {
        if len != self.outputs() {
            return Err(TessledError::hardware(format!(
                "{what} write needs {} values for {} chips, got {len}",
                self.outputs(),
                self.chips
            )));
        }
        Ok(())
    }

    /// Bring the chain into grayscale mode with every output at full scale.
    ///
    /// `dot_correction` writes one uniform dot-correction level to every output first.
    pub fn init(&mut self, dot_correction: Option<u8>) -> TessledResult<()> {
        self.drive(Line::Dcprg, false)?;
        self.drive(Line::Vprg, true)?;
        self.drive(Line::Xlat, false)?;
        self.drive(Line::Blank, true)?;
        self.drive(Line::Vprg, false)?;
        if let Some(level) = dot_correction {
            let values = vec![level; self.outputs()];
            self.write_dc(&values)?;
        }
        let full = vec![PWM_MAX; self.outputs()];
        self.write_pwm(&full)?;
        // After the first grayscale latch following a dot-correction cycle the chip needs one
        // extra SCLK pulse before the next grayscale data.
        self.shift(vec![0x01])?;
        tracing::debug!(chips = self.chips, polarity = ?self.polarity, "TLC chain initialized");
        Ok(())
    }

    /// Shift and latch one grayscale value per output, in physical output order.
    pub fn write_pwm(&mut self, values: &[u16]) -> TessledResult<()> {
        self.check_len("grayscale", values.len())?;
        self.reversed.clear();
        self.reversed.extend(values.iter().rev());
        let packed = pack_12bit(&self.reversed);

        self.state = WriteState::Loading;
        tracing::trace!(state = ?self.state, "grayscale write");
        if self.blank_mode == BlankMode::DuringLoad {
            self.drive(Line::Blank, true)?;
        }
        self.shift(packed)?;

        self.state = WriteState::Latching;
        tracing::trace!(state = ?self.state, "grayscale write");
        if self.blank_mode == BlankMode::DuringLatch {
            self.drive(Line::Blank, true)?;
        }
        self.pulse_xlat()?;
        if self.blank_mode != BlankMode::Overlapped {
            self.drive(Line::Blank, false)?;
        }

        self.state = WriteState::Idle;
        Ok(())
    }

    /// Load dot correction into the DC register. Only meaningful at init time.
    pub fn write_dc(&mut self, values: &[u8]) -> TessledResult<()> {
        self.check_len("dot-correction", values.len())?;
        let reversed: Vec<u8> = values.iter().rev().copied().collect();
        self.drive(Line::Dcprg, true)?;
        self.drive(Line::Vprg, true)?;
        self.shift(pack_6bit(&reversed))?;
        self.pulse_xlat()?;
        self.drive(Line::Vprg, false)
    }

    /// Cycle every control pin high then low, calling `pause` after each step.
    ///
    /// Levels here are raw pin levels, not translated through the polarity, so they can be
    /// checked with a meter at the pin header.
    pub fn test_io(&mut self, mut pause: impl FnMut(&str) -> TessledResult<()>) -> TessledResult<()> {
        for line in [Line::Vprg, Line::Blank, Line::Xlat, Line::Dcprg] {
            for (level, label) in [(true, "high"), (false, "low")] {
                self.set_raw(line, level)?;
                pause(&format!("{} set {label}", line.name()))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hardware/tlc.rs"]
mod tests;
