use std::collections::VecDeque;

use rand::Rng;
use rand::rngs::StdRng;

use crate::animation::{Animation, ArgSpec, UnitContext};
use crate::frame::{Frame, SIDE};

pub const ARGS: &[ArgSpec] = &[
    ArgSpec::int("stars", 100, Some(1), Some(512)),
    ArgSpec::int("intensity", 255, Some(1), Some(255)),
];

/// Random stars; the oldest tenth is replaced every tick.
pub struct Starfield {
    rng: StdRng,
    stars: VecDeque<[usize; 3]>,
    churn: usize,
    intensity: u8,
}

pub fn build(ctx: UnitContext) -> Box<dyn Animation> {
    let count = ctx.args.int("stars") as usize;
    let mut field = Starfield {
        rng: ctx.rng,
        stars: VecDeque::with_capacity(count),
        churn: (count / 10).max(1),
        intensity: ctx.args.int("intensity") as u8,
    };
    field.add_stars(count);
    Box::new(field)
}

impl Starfield {
    fn add_stars(&mut self, n: usize) {
        for _ in 0..n {
            let star = [
                self.rng.gen_range(0..SIDE),
                self.rng.gen_range(0..SIDE),
                self.rng.gen_range(0..SIDE),
            ];
            self.stars.push_back(star);
        }
    }
}

impl Animation for Starfield {
    fn render(&mut self, frame: &mut Frame) {
        let churn = self.churn.min(self.stars.len());
        self.stars.drain(..churn);
        self.add_stars(churn);
        for &[z, y, x] in &self.stars {
            frame.set(z, y, x, self.intensity);
        }
    }
}
