//! Built-in animation units.
//!
//! Unit time is counted in ticks (`ticks / fps` seconds) rather than read from the wall clock, so
//! a unit produces the same frames for the same seed on every run.

pub mod boxes;
pub mod fill;
pub mod fxyt;
pub mod sphere;
pub mod starfield;
pub mod swipe;
pub mod text;
