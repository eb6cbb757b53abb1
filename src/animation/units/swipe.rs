//! Solid blocks sweeping through the display.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::animation::sprites::{Pos, SolidCube, Sprite};
use crate::animation::{Animation, ArgSpec, UnitContext};
use crate::frame::{Frame, SIDE};

pub const EDGES_ARGS: &[ArgSpec] = &[ArgSpec::float("step", 0.5, Some(0.05), Some(4.0))];
pub const PHASES_ARGS: &[ArgSpec] = &[];

const RANGE: f64 = 8.0;

/// `(start, direction)` per sweep; axis sweeps are listed twice so they come up more often than
/// diagonals.
const SWEEPS: &[([f64; 3], [f64; 3])] = &[
    ([-8.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
    ([8.0, 0.0, 0.0], [-1.0, 0.0, 0.0]),
    ([0.0, -8.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 8.0, 0.0], [0.0, -1.0, 0.0]),
    ([0.0, 0.0, -8.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 8.0], [0.0, 0.0, -1.0]),
    ([-8.0, 0.0, 0.0], [1.0, 0.0, 0.0]),
    ([8.0, 0.0, 0.0], [-1.0, 0.0, 0.0]),
    ([0.0, -8.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 8.0, 0.0], [0.0, -1.0, 0.0]),
    ([0.0, 0.0, -8.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 8.0], [0.0, 0.0, -1.0]),
    ([-8.0, -8.0, -8.0], [1.0, 1.0, 1.0]),
    ([-8.0, -8.0, 8.0], [1.0, 1.0, -1.0]),
    ([-8.0, 8.0, -8.0], [1.0, -1.0, 1.0]),
    ([-8.0, 8.0, 8.0], [1.0, -1.0, -1.0]),
    ([8.0, -8.0, -8.0], [-1.0, 1.0, 1.0]),
    ([8.0, -8.0, 8.0], [-1.0, 1.0, -1.0]),
    ([8.0, 8.0, -8.0], [-1.0, -1.0, 1.0]),
    ([8.0, 8.0, 8.0], [-1.0, -1.0, -1.0]),
];

/// Diagonal sweeps move at two thirds of the axis speed.
const DIAGONAL_FACTOR: f64 = 0.66;

/// Path of a full-size block entering from one side and leaving through the other.
#[derive(Clone, Debug)]
struct Sweep {
    pos: [f64; 3],
    dir: [f64; 3],
    step: f64,
    reset: bool,
}

impl Sweep {
    fn new(step: f64) -> Self {
        Self {
            pos: [0.0; 3],
            dir: [0.0; 3],
            step,
            reset: true,
        }
    }

    fn next_pos(&mut self, rng: &mut StdRng) -> Pos {
        if self.reset {
            let &(start, dir) = SWEEPS.choose(rng).unwrap_or(&SWEEPS[0]);
            let diagonal = dir.iter().all(|d| *d != 0.0);
            let speed = if diagonal {
                self.step * DIAGONAL_FACTOR
            } else {
                self.step
            };
            self.pos = start;
            self.dir = dir.map(|d| d * speed);
            self.reset = false;
        }
        for (p, d) in self.pos.iter_mut().zip(self.dir) {
            *p += d;
        }
        if self.pos.iter().any(|p| !(-RANGE..=RANGE).contains(p)) {
            self.reset = true;
        }
        self.pos.map(|p| p as i32)
    }
}

/// A full-size solid block sweeping through the display from a random side.
pub struct EdgesSwipe {
    rng: StdRng,
    block: Sprite,
    sweep: Sweep,
}

pub fn edges(ctx: UnitContext) -> Box<dyn Animation> {
    Box::new(EdgesSwipe {
        sweep: Sweep::new(ctx.args.float("step")),
        rng: ctx.rng,
        block: Sprite::SolidCube(SolidCube::new([SIDE as i32; 3])),
    })
}

impl Animation for EdgesSwipe {
    fn render(&mut self, frame: &mut Frame) {
        let pos = self.sweep.next_pos(&mut self.rng);
        self.block.set_pos(pos);
        self.block.render(frame);
    }
}

/// A line that rises one layer every `period + 1` ticks and wraps back to the bottom.
#[derive(Clone, Debug)]
struct Riser {
    row: i32,
    z: i32,
    period: u32,
    wait: u32,
}

impl Riser {
    fn next_pos(&mut self) -> Pos {
        self.wait += 1;
        if self.wait > self.period {
            self.z += 1;
            self.wait = 0;
        }
        if self.z > SIDE as i32 - 1 {
            self.z = -1;
        }
        [0, self.row, self.z]
    }
}

/// Eight horizontal lines, one per row, rising at different speeds so they drift in and out of
/// phase. Each line owns its row: the row is cleared before the line is drawn.
pub struct Phases {
    lines: Vec<(Sprite, Riser)>,
}

const PHASE_PERIODS: [u32; SIDE] = [4, 3, 2, 1, 1, 2, 3, 4];

pub fn phases(_ctx: UnitContext) -> Box<dyn Animation> {
    let lines = PHASE_PERIODS
        .iter()
        .enumerate()
        .map(|(row, &period)| {
            let line = Sprite::SolidCube(SolidCube::new([SIDE as i32, 1, 2]));
            let riser = Riser {
                row: row as i32,
                z: 3,
                period,
                wait: 0,
            };
            (line, riser)
        })
        .collect();
    Box::new(Phases { lines })
}

impl Animation for Phases {
    fn render(&mut self, frame: &mut Frame) {
        for (line, riser) in &mut self.lines {
            let pos = riser.next_pos();
            let y = pos[1] as usize;
            for z in 0..SIDE {
                for x in 0..SIDE {
                    frame.set(z, y, x, 0);
                }
            }
            line.set_pos(pos);
            line.render(frame);
        }
    }
}
