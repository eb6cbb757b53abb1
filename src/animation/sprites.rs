//! Geometric building blocks shared by animation units.
//!
//! Sprite positions are `[x, y, z]`, the reverse of frame indexing order.

use crate::frame::{Frame, SIDE};

/// Position in `[x, y, z]` order.
pub type Pos = [i32; 3];

/// Wire-frame cube: the 12 edges of an axis-aligned cube.
#[derive(Clone, Debug, PartialEq)]
pub struct Cube {
    /// Corner nearest the origin.
    pub pos: Pos,
    /// Edge length in LEDs.
    pub size: i32,
    pub intensity: u8,
}

impl Cube {
    pub fn new(size: i32) -> Self {
        Self {
            pos: [0, 0, 0],
            size,
            intensity: 255,
        }
    }

    fn render(&self, frame: &mut Frame) {
        if self.size <= 0 {
            return;
        }
        let [sx, sy, sz] = self.pos;
        let inc = self.size - 1;
        let (bx, by, bz) = (sx + inc, sy + inc, sz + inc);
        let v = self.intensity;
        for i in 0..=inc {
            for (y, z) in [(sy, sz), (by, sz), (sy, bz), (by, bz)] {
                frame.set_clipped(z, y, sx + i, v);
            }
            for (x, z) in [(sx, sz), (bx, sz), (sx, bz), (bx, bz)] {
                frame.set_clipped(z, sy + i, x, v);
            }
            for (x, y) in [(sx, sy), (bx, sy), (sx, by), (bx, by)] {
                frame.set_clipped(sz + i, y, x, v);
            }
        }
    }
}

/// Filled box, clipped to the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SolidCube {
    /// Corner nearest the origin.
    pub pos: Pos,
    /// Extent along x, y, z.
    pub dims: [i32; 3],
    pub intensity: u8,
}

impl SolidCube {
    pub fn new(dims: [i32; 3]) -> Self {
        Self {
            pos: [0, 0, 0],
            dims,
            intensity: 255,
        }
    }

    fn render(&self, frame: &mut Frame) {
        let side = SIDE as i32;
        let span = |axis: usize| {
            let lo = self.pos[axis].max(0);
            let hi = (self.pos[axis] + self.dims[axis]).min(side);
            lo..hi.max(lo)
        };
        for z in span(2) {
            for y in span(1) {
                for x in span(0) {
                    frame.set(z as usize, y as usize, x as usize, self.intensity);
                }
            }
        }
    }
}

/// Soft-edged spherical shell.
///
/// Integer coordinates mark grid intersections; LED centres sit on half-integers. Brightness
/// falls off linearly with distance from the shell and is max-merged into the frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Centre in `[x, y, z]`.
    pub centre: [f64; 3],
    pub radius: f64,
    pub intensity: u8,
    /// Higher values give a thinner shell.
    pub sharpness: f64,
}

impl Sphere {
    pub fn new(centre: [f64; 3], sharpness: f64) -> Self {
        Self {
            centre,
            radius: 1.0,
            intensity: 255,
            sharpness,
        }
    }

    fn render(&self, frame: &mut Frame) {
        let [cx, cy, cz] = self.centre;
        for z in 0..SIDE {
            let dz = z as f64 + 0.5 - cz;
            for y in 0..SIDE {
                let dy = y as f64 + 0.5 - cy;
                for x in 0..SIDE {
                    let dx = x as f64 + 0.5 - cx;
                    let dist = (dx * dx + dy * dy + dz * dz).sqrt();
                    let weight = 1.0 - self.sharpness * (dist - self.radius).abs();
                    if weight > 0.0 {
                        let v = (weight * f64::from(self.intensity)).clamp(0.0, 255.0) as u8;
                        frame.max_merge(z, y, x, v);
                    }
                }
            }
        }
    }
}

/// Explicit voxel list, written in order (later entries win).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Custom {
    pub voxels: Vec<(Pos, u8)>,
}

impl Custom {
    fn render(&self, frame: &mut Frame) {
        for &([x, y, z], v) in &self.voxels {
            frame.set_clipped(z, y, x, v);
        }
    }
}

/// Any sprite.
#[derive(Clone, Debug, PartialEq)]
pub enum Sprite {
    Cube(Cube),
    SolidCube(SolidCube),
    Sphere(Sphere),
    Custom(Custom),
}

impl Sprite {
    pub fn render(&self, frame: &mut Frame) {
        match self {
            Self::Cube(s) => s.render(frame),
            Self::SolidCube(s) => s.render(frame),
            Self::Sphere(s) => s.render(frame),
            Self::Custom(s) => s.render(frame),
        }
    }

    /// Move the sprite's anchor (corner for boxes, centre for spheres).
    pub fn set_pos(&mut self, pos: Pos) {
        match self {
            Self::Cube(s) => s.pos = pos,
            Self::SolidCube(s) => s.pos = pos,
            Self::Sphere(s) => s.centre = pos.map(f64::from),
            Self::Custom(_) => {}
        }
    }
}

impl From<Cube> for Sprite {
    fn from(s: Cube) -> Self {
        Self::Cube(s)
    }
}

impl From<SolidCube> for Sprite {
    fn from(s: SolidCube) -> Self {
        Self::SolidCube(s)
    }
}

impl From<Sphere> for Sprite {
    fn from(s: Sphere) -> Self {
        Self::Sphere(s)
    }
}

impl From<Custom> for Sprite {
    fn from(s: Custom) -> Self {
        Self::Custom(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/sprites.rs"]
mod tests;
