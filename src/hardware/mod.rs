//! TLC5940 chain encoding and the multiplexed scan driver.

#[cfg(target_os = "linux")]
pub mod linux;
pub mod pack;
pub mod scan;
pub mod tlc;

pub use pack::{Polarity, pack_6bit, pack_12bit};
pub use scan::{PollMode, ScanDriver, ScanStats, ScanTiming};
pub use tlc::{BlankMode, ControlPins, TlcChain, WriteState};
