use std::f64::consts::TAU;

use crate::animation::sprites::{Sphere, Sprite};
use crate::animation::{Animation, ArgSpec, UnitContext};
use crate::foundation::core::Fps;
use crate::frame::Frame;

pub const ARGS: &[ArgSpec] = &[
    ArgSpec::float("hz", 0.2, Some(0.01), Some(5.0)),
    ArgSpec::float("max_radius", 6.0, Some(0.5), Some(12.0)),
];

/// Two soft spheres in opposite corners breathing in and out.
pub struct ExploringSphere {
    fps: Fps,
    hz: f64,
    max_radius: f64,
    spheres: [Sprite; 2],
    tick: u64,
}

pub fn build(ctx: UnitContext) -> Box<dyn Animation> {
    Box::new(ExploringSphere {
        fps: ctx.fc.fps,
        hz: ctx.args.float("hz"),
        max_radius: ctx.args.float("max_radius"),
        spheres: [
            Sprite::Sphere(Sphere::new([2.0, 2.0, 2.0], 0.5)),
            Sprite::Sphere(Sphere::new([6.0, 6.0, 6.0], 0.5)),
        ],
        tick: 0,
    })
}

impl ExploringSphere {
    fn radius_at(&self, t: f64) -> f64 {
        self.max_radius * (1.0 + (t * self.hz * TAU).sin()) / 2.0
    }
}

impl Animation for ExploringSphere {
    fn render(&mut self, frame: &mut Frame) {
        let r = self.radius_at(self.fps.frames_to_secs(self.tick));
        self.tick += 1;
        for sprite in &mut self.spheres {
            if let Sprite::Sphere(s) = sprite {
                s.radius = r;
            }
            sprite.render(frame);
        }
    }
}
