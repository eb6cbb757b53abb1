//! Wire-frame box animations.

use rand::Rng;

use crate::animation::sprites::{Cube, Pos, Sprite};
use crate::animation::{Animation, ArgSpec, UnitContext};
use crate::frame::{Frame, SIDE};

pub const EXPANDING_ARGS: &[ArgSpec] = &[];
pub const EXPLORING_ARGS: &[ArgSpec] = &[];

const EXPANDING_SIZES: [i32; 6] = [2, 4, 6, 8, 6, 4];

/// A cube centred in the display that grows and shrinks.
pub struct ExpandingBox {
    step: usize,
}

pub fn expanding(_ctx: UnitContext) -> Box<dyn Animation> {
    Box::new(ExpandingBox { step: 0 })
}

impl Animation for ExpandingBox {
    fn render(&mut self, frame: &mut Frame) {
        let size = EXPANDING_SIZES[self.step % EXPANDING_SIZES.len()];
        self.step = self.step.wrapping_add(1);
        let corner = (SIDE as i32 - size) / 2;
        let mut cube = Cube::new(size);
        cube.pos = [corner, corner, corner];
        Sprite::Cube(cube).render(frame);
    }
}

/// Walks the rim of the XY plane one step per tick, climbing one layer per lap.
#[derive(Clone, Debug)]
pub struct SpiralPath {
    ring: Vec<(i32, i32)>,
    max_z: i32,
    t: usize,
}

impl SpiralPath {
    /// `margin` is the sprite extent along each axis; `offset` is a fraction of one lap.
    pub fn new(margin: [i32; 3], offset: f64) -> Self {
        let side = SIDE as i32;
        let steps_x = (side - margin[0]).max(0);
        let steps_y = (side - margin[1]).max(0);
        let max_z = (side - margin[2]).max(0);

        let mut ring = Vec::new();
        ring.extend((0..steps_y).map(|y| (0, y)));
        ring.extend((0..steps_x).map(|x| (x, steps_y)));
        ring.extend((0..steps_y).rev().map(|y| (steps_x, y)));
        ring.extend((0..steps_x).rev().map(|x| (x, 0)));
        if ring.is_empty() {
            ring.push((0, 0));
        }

        let t = ((ring.len() as f64) * offset.clamp(0.0, 1.0)) as usize;
        Self { ring, max_z, t }
    }

    pub fn next_pos(&mut self) -> Pos {
        let lap = self.ring.len();
        let z = (self.t / lap) as i32;
        let (x, y) = self.ring[self.t % lap];
        self.t = (self.t + 1) % ((self.max_z as usize + 1) * lap);
        [x, y, z]
    }
}

/// A pair of cubes of random size spiralling around the display half a lap apart.
pub struct ExploringBox {
    explorers: Vec<(Sprite, SpiralPath)>,
}

pub fn exploring(mut ctx: UnitContext) -> Box<dyn Animation> {
    let explorers = [0.0, 0.5]
        .into_iter()
        .map(|offset| {
            let size = ctx.rng.gen_range(2..=5);
            let path = SpiralPath::new([size; 3], offset);
            (Sprite::Cube(Cube::new(size)), path)
        })
        .collect();
    Box::new(ExploringBox { explorers })
}

impl Animation for ExploringBox {
    fn render(&mut self, frame: &mut Frame) {
        for (sprite, path) in &mut self.explorers {
            sprite.set_pos(path.next_pos());
            sprite.render(frame);
        }
    }
}
