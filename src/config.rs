//! Process configuration for the effect generator and the hardware driver.
//!
//! Both structs deserialize from TOML with every field optional; missing fields take the
//! defaults of the reference build (10 fps tesseract, 60 s transitions, five inverted chips on
//! SPI 0.0 at 500 kHz). Call `validate` before use.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::animation::{AnimationKind, DEFAULT_ANIMATIONS};
use crate::foundation::core::Fps;
use crate::foundation::error::{TessledError, TessledResult};
use crate::frame::{DeviceType, FrameConstants};
use crate::hardware::pack::Polarity;
use crate::hardware::scan::{MIN_CHIPS, PollMode};
use crate::hardware::tlc::{BlankMode, DC_MAX};
use crate::transport::{DEFAULT_FRAME_ADDR, ReceivePolicy};

fn load_toml<T: DeserializeOwned>(path: &Path) -> TessledResult<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| TessledError::config(format!("read {}: {e}", path.display())))?;
    toml::from_str(&text).map_err(|e| TessledError::config(format!("parse {}: {e}", path.display())))
}

fn check_addr(addr: &str) -> TessledResult<()> {
    if addr.trim().is_empty() || !addr.contains("://") {
        return Err(TessledError::config(format!(
            "frame address '{addr}' must look like transport://endpoint"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectboxConfig {
    pub fps: Fps,
    pub device: DeviceType,
    /// Seconds between default-layer transitions.
    pub transition: f64,
    /// Animation identifiers to rotate through; empty means the default set.
    pub animations: Vec<String>,
    pub frame_addr: String,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for EffectboxConfig {
    fn default() -> Self {
        Self {
            fps: Fps::default(),
            device: DeviceType::Tesseract,
            transition: 60.0,
            animations: Vec::new(),
            frame_addr: DEFAULT_FRAME_ADDR.to_owned(),
            seed: None,
        }
    }
}

impl EffectboxConfig {
    pub fn from_toml_file(path: &Path) -> TessledResult<Self> {
        load_toml(path)
    }

    pub fn frame_constants(&self) -> FrameConstants {
        FrameConstants::new(self.fps, self.device)
    }

    /// Resolve the animation list. Unknown identifiers are an error.
    pub fn animation_kinds(&self) -> TessledResult<Vec<AnimationKind>> {
        if self.animations.is_empty() {
            return Ok(DEFAULT_ANIMATIONS.to_vec());
        }
        self.animations
            .iter()
            .map(|name| AnimationKind::resolve(name))
            .collect()
    }

    pub fn validate(&self) -> TessledResult<()> {
        if !self.transition.is_finite() || self.transition <= 0.0 {
            return Err(TessledError::config(format!(
                "transition must be > 0 seconds, got {}",
                self.transition
            )));
        }
        check_addr(&self.frame_addr)?;
        self.animation_kinds()?;
        Ok(())
    }
}

/// Control-line GPIO numbers (BCM numbering).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PinConfig {
    pub blank: u32,
    pub vprg: u32,
    pub xlat: u32,
    pub dcprg: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            blank: 22,
            vprg: 24,
            xlat: 25,
            dcprg: 4,
        }
    }
}

impl PinConfig {
    fn all(&self) -> [(&'static str, u32); 4] {
        [
            ("blank", self.blank),
            ("vprg", self.vprg),
            ("xlat", self.xlat),
            ("dcprg", self.dcprg),
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpiConfig {
    pub bus: u8,
    pub device: u8,
    pub speed_hz: u32,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            bus: 0,
            device: 0,
            speed_hz: 500_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HardwareConfig {
    pub chips: usize,
    pub pins: PinConfig,
    pub spi: SpiConfig,
    /// Drive the chain through inverting buffers.
    pub inverted: bool,
    pub blank_mode: BlankMode,
    pub poll: PollMode,
    pub receive: ReceivePolicy,
    /// Uniform dot-correction level written at init; `None` keeps the EEPROM values.
    pub dot_correction: Option<u8>,
    pub frame_addr: String,
}

impl Default for HardwareConfig {
    fn default() -> Self {
        Self {
            chips: 5,
            pins: PinConfig::default(),
            spi: SpiConfig::default(),
            inverted: true,
            blank_mode: BlankMode::default(),
            poll: PollMode::default(),
            receive: ReceivePolicy::default(),
            dot_correction: None,
            frame_addr: DEFAULT_FRAME_ADDR.to_owned(),
        }
    }
}

impl HardwareConfig {
    pub fn from_toml_file(path: &Path) -> TessledResult<Self> {
        load_toml(path)
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::from_inverted(self.inverted)
    }

    pub fn validate(&self) -> TessledResult<()> {
        if self.chips < MIN_CHIPS {
            return Err(TessledError::config(format!(
                "chips must be >= {MIN_CHIPS} (8 layer selectors plus 64 LEDs), got {}",
                self.chips
            )));
        }
        let pins = self.pins.all();
        for (i, (name, pin)) in pins.iter().enumerate() {
            if let Some((other, _)) = pins[..i].iter().find(|(_, p)| p == pin) {
                return Err(TessledError::config(format!(
                    "pins '{other}' and '{name}' share GPIO {pin}"
                )));
            }
        }
        if self.spi.speed_hz == 0 {
            return Err(TessledError::config("spi.speed_hz must be > 0"));
        }
        if let Some(dc) = self.dot_correction
            && dc > DC_MAX
        {
            return Err(TessledError::config(format!(
                "dot_correction must be <= {DC_MAX}, got {dc}"
            )));
        }
        check_addr(&self.frame_addr)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
