//! Height-field animations: one lit voxel per (x, y) column at `z = f(x, y, t)`.

use crate::animation::{Animation, ArgSpec, UnitContext};
use crate::foundation::core::Fps;
use crate::frame::{Frame, SIDE};

pub const ARGS: &[ArgSpec] = &[ArgSpec::int("intensity", 255, Some(1), Some(255))];

/// Surface function and the domain it is sampled over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Surface {
    /// `A(t) * sin(R) / R` with `R = |(x, y)|` and `A(t) = sin²(t)`.
    MexicanHat,
    /// `sin(y + 1.5t)`.
    WaveY,
}

impl Surface {
    /// `((x0, x1), (y0, y1), (z0, z1))`
    fn ranges(self) -> ((f64, f64), (f64, f64), (f64, f64)) {
        use std::f64::consts::PI;
        match self {
            Self::MexicanHat => ((-8.0, 8.0), (-8.0, 8.0), (-0.2, 0.6)),
            Self::WaveY => ((-PI, PI), (-PI, PI), (-1.0, 1.0)),
        }
    }

    pub fn eval(self, x: f64, y: f64, t: f64) -> f64 {
        match self {
            Self::MexicanHat => {
                let r = (x * x + y * y).sqrt() + 0.01;
                let a = t.sin().powi(2) + 0.01;
                a * r.sin() / r
            }
            Self::WaveY => (y + 1.5 * t).sin(),
        }
    }

    /// Layer index of the surface at grid column `(xi, yi)`.
    pub fn layer_at(self, xi: usize, yi: usize, t: f64) -> usize {
        let ((x0, x1), (y0, y1), (z0, z1)) = self.ranges();
        let last = (SIDE - 1) as f64;
        let x = x0 + (x1 - x0) * (xi as f64) / last;
        let y = y0 + (y1 - y0) * (yi as f64) / last;
        let z = (self.eval(x, y, t) - z0) / ((z1 - z0) / SIDE as f64);
        if z.is_finite() {
            z.floor().clamp(0.0, last) as usize
        } else {
            0
        }
    }
}

pub struct Fxyt {
    surface: Surface,
    fps: Fps,
    intensity: u8,
    tick: u64,
}

fn with_surface(surface: Surface, ctx: UnitContext) -> Box<dyn Animation> {
    Box::new(Fxyt {
        surface,
        fps: ctx.fc.fps,
        intensity: ctx.args.int("intensity") as u8,
        tick: 0,
    })
}

pub fn mexican_hat(ctx: UnitContext) -> Box<dyn Animation> {
    with_surface(Surface::MexicanHat, ctx)
}

pub fn wavey(ctx: UnitContext) -> Box<dyn Animation> {
    with_surface(Surface::WaveY, ctx)
}

impl Animation for Fxyt {
    fn render(&mut self, frame: &mut Frame) {
        let t = self.fps.frames_to_secs(self.tick);
        self.tick += 1;
        for xi in 0..SIDE {
            for yi in 0..SIDE {
                let z = self.surface.layer_at(xi, yi, t);
                frame.set(z, yi, xi, self.intensity);
            }
        }
    }
}
