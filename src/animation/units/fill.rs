//! Whole-cube fills.

use crate::animation::{Animation, ArgSpec, UnitContext};
use crate::frame::Frame;

pub const POWER_ON_ARGS: &[ArgSpec] = &[ArgSpec::int("intensity", 1, Some(0), Some(255))];

pub const FLASH_ARGS: &[ArgSpec] = &[
    ArgSpec::int("intensity", 255, Some(0), Some(255)),
    ArgSpec::float("duration", 1.0, Some(0.0), Some(3600.0)),
];

/// Every LED at one constant intensity. Useful for checking that the whole cube lights.
pub struct PowerOn {
    intensity: u8,
}

pub fn power_on(ctx: UnitContext) -> Box<dyn Animation> {
    Box::new(PowerOn {
        intensity: ctx.args.int("intensity") as u8,
    })
}

impl Animation for PowerOn {
    fn render(&mut self, frame: &mut Frame) {
        frame.fill(self.intensity);
    }
}

/// The whole cube lit, fading linearly to dark over `duration` seconds, then finished.
pub struct Flash {
    intensity: f64,
    frames: u64,
    tick: u64,
}

pub fn flash(ctx: UnitContext) -> Box<dyn Animation> {
    let frames = ctx
        .fc
        .fps
        .secs_to_frames_floor(ctx.args.float("duration"))
        .max(1);
    Box::new(Flash {
        intensity: ctx.args.int("intensity") as f64,
        frames,
        tick: 0,
    })
}

impl Animation for Flash {
    fn render(&mut self, frame: &mut Frame) {
        if self.is_finished() {
            return;
        }
        let remaining = 1.0 - (self.tick as f64) / (self.frames as f64);
        frame.fill((self.intensity * remaining).round().clamp(0.0, 255.0) as u8);
        self.tick += 1;
    }

    fn is_finished(&self) -> bool {
        self.tick >= self.frames
    }
}
