//! Linux peripheral backend on `linux-embedded-hal`: sysfs GPIO lines and a spidev bus.
//!
//! The bus clock rate and SPI mode from [`HardwareConfig`] are applied to the spidev node when
//! it is opened.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use linux_embedded_hal::spidev::{SpiModeFlags, Spidev, SpidevOptions};
use linux_embedded_hal::sysfs_gpio::Direction;
use linux_embedded_hal::{SpidevBus, SysfsPin};

use crate::config::HardwareConfig;
use crate::foundation::error::{TessledError, TessledResult};
use crate::hardware::pack::Polarity;
use crate::hardware::tlc::{ControlPins, TlcChain};

/// SPI clock mode for a polarity. Behind inverting buffers the idle-high clock (mode 2) reaches
/// the chips as mode 0.
pub fn spi_mode(polarity: Polarity) -> SpiModeFlags {
    match polarity {
        Polarity::Normal => SpiModeFlags::SPI_MODE_0,
        Polarity::Inverted => SpiModeFlags::SPI_MODE_2,
    }
}

/// Settings written to the spidev node on open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusSettings {
    pub speed_hz: u32,
    pub mode: SpiModeFlags,
}

impl BusSettings {
    pub fn for_config(cfg: &HardwareConfig) -> Self {
        Self {
            speed_hz: cfg.spi.speed_hz,
            mode: spi_mode(cfg.polarity()),
        }
    }

    pub fn options(&self) -> SpidevOptions {
        SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(self.speed_hz)
            .mode(self.mode)
            .build()
    }
}

pub fn spidev_path(bus: u8, device: u8) -> PathBuf {
    PathBuf::from(format!("/dev/spidev{bus}.{device}"))
}

/// Open and configure a spidev node.
pub fn open_bus(path: &Path, settings: BusSettings) -> TessledResult<SpidevBus> {
    let mut dev = Spidev::open(path)
        .map_err(|e| TessledError::hardware(format!("open {}: {e}", path.display())))?;
    dev.configure(&settings.options()).map_err(|e| {
        TessledError::hardware(format!(
            "configure {} ({} Hz, {:?}): {e}",
            path.display(),
            settings.speed_hz,
            settings.mode
        ))
    })?;
    tracing::debug!(
        path = %path.display(),
        speed_hz = settings.speed_hz,
        mode = ?settings.mode,
        "opened SPI bus"
    );
    Ok(SpidevBus(dev))
}

/// Export BCM line `number` if needed and configure it as an output driven low.
pub fn export_pin(number: u32) -> TessledResult<SysfsPin> {
    let ctx = |what: &str, e: linux_embedded_hal::sysfs_gpio::Error| {
        TessledError::hardware(format!("GPIO {number}: {what}: {e}"))
    };
    let pin = SysfsPin::new(u64::from(number));
    if !pin.is_exported() {
        pin.export().map_err(|e| ctx("export", e))?;
        // udev needs a moment to fix up permissions on the new node.
        thread::sleep(Duration::from_millis(50));
    }
    pin.set_direction(Direction::Low)
        .map_err(|e| ctx("set direction", e))?;
    tracing::debug!(gpio = number, "exported output pin");
    Ok(pin)
}

/// Open the control pins and SPI bus named by `cfg` as an uninitialized chain.
pub fn open_chain(cfg: &HardwareConfig) -> TessledResult<TlcChain<SysfsPin, SpidevBus>> {
    cfg.validate()?;
    let pins = ControlPins {
        blank: export_pin(cfg.pins.blank)?,
        vprg: export_pin(cfg.pins.vprg)?,
        xlat: export_pin(cfg.pins.xlat)?,
        dcprg: export_pin(cfg.pins.dcprg)?,
    };
    let spi = open_bus(
        &spidev_path(cfg.spi.bus, cfg.spi.device),
        BusSettings::for_config(cfg),
    )?;
    Ok(TlcChain::new(
        pins,
        spi,
        cfg.chips,
        cfg.polarity(),
        cfg.blank_mode,
    ))
}
