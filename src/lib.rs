//! Animation engine and LED-driver pipeline for an 8x8x8 volumetric LED cube.
//!
//! Two processes share one frame stream:
//!
//! - the *effectbox* ([`effectbox::Effectbox`]) renders frames with the layered animation
//!   [`engine::Engine`], maps them to the physical wiring of the configured
//!   [`frame::DeviceType`] and publishes 512-byte payloads through a [`transport::FrameSink`];
//! - the *driver* ([`hardware::scan::ScanDriver`]) polls a [`transport::FrameSource`] without
//!   blocking and multiplexes the latest frame, layer by layer, into a chain of TLC5940
//!   drivers over `embedded-hal` GPIO and SPI.

#![forbid(unsafe_code)]

pub mod animation;
pub mod config;
pub mod effectbox;
pub mod engine;
pub mod foundation;
pub mod frame;
pub mod hardware;
pub mod transport;

pub use animation::{Animation, AnimationKind, Params};
pub use config::{EffectboxConfig, HardwareConfig};
pub use engine::{Engine, Layer};
pub use foundation::core::Fps;
pub use foundation::error::{TessledError, TessledResult};
pub use frame::{DeviceType, Frame, FrameConstants};
