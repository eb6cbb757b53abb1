//! Scrolling text on one face of the cube.

use crate::animation::{Animation, ArgSpec, UnitContext};
use crate::frame::{Frame, SIDE};

pub const ARGS: &[ArgSpec] = &[
    ArgSpec::string("text", "FESTIVAL OF LIGHT"),
    ArgSpec::int("intensity", 255, Some(1), Some(255)),
];

/// 5x7 glyphs, one byte per column, bit 0 is the top row.
const GLYPHS: &[(char, [u8; 5])] = &[
    (' ', [0x00, 0x00, 0x00, 0x00, 0x00]),
    ('!', [0x00, 0x00, 0x5F, 0x00, 0x00]),
    (',', [0x00, 0x50, 0x30, 0x00, 0x00]),
    ('-', [0x08, 0x08, 0x08, 0x08, 0x08]),
    ('.', [0x00, 0x60, 0x60, 0x00, 0x00]),
    ('?', [0x02, 0x01, 0x51, 0x09, 0x06]),
    ('0', [0x3E, 0x51, 0x49, 0x45, 0x3E]),
    ('1', [0x00, 0x42, 0x7F, 0x40, 0x00]),
    ('2', [0x42, 0x61, 0x51, 0x49, 0x46]),
    ('3', [0x21, 0x41, 0x45, 0x4B, 0x31]),
    ('4', [0x18, 0x14, 0x12, 0x7F, 0x10]),
    ('5', [0x27, 0x45, 0x45, 0x45, 0x39]),
    ('6', [0x3C, 0x4A, 0x49, 0x49, 0x30]),
    ('7', [0x01, 0x71, 0x09, 0x05, 0x03]),
    ('8', [0x36, 0x49, 0x49, 0x49, 0x36]),
    ('9', [0x06, 0x49, 0x49, 0x29, 0x1E]),
    ('A', [0x7E, 0x11, 0x11, 0x11, 0x7E]),
    ('B', [0x7F, 0x49, 0x49, 0x49, 0x36]),
    ('C', [0x3E, 0x41, 0x41, 0x41, 0x22]),
    ('D', [0x7F, 0x41, 0x41, 0x22, 0x1C]),
    ('E', [0x7F, 0x49, 0x49, 0x49, 0x41]),
    ('F', [0x7F, 0x09, 0x09, 0x09, 0x01]),
    ('G', [0x3E, 0x41, 0x49, 0x49, 0x7A]),
    ('H', [0x7F, 0x08, 0x08, 0x08, 0x7F]),
    ('I', [0x00, 0x41, 0x7F, 0x41, 0x00]),
    ('J', [0x20, 0x40, 0x41, 0x3F, 0x01]),
    ('K', [0x7F, 0x08, 0x14, 0x22, 0x41]),
    ('L', [0x7F, 0x40, 0x40, 0x40, 0x40]),
    ('M', [0x7F, 0x02, 0x0C, 0x02, 0x7F]),
    ('N', [0x7F, 0x04, 0x08, 0x10, 0x7F]),
    ('O', [0x3E, 0x41, 0x41, 0x41, 0x3E]),
    ('P', [0x7F, 0x09, 0x09, 0x09, 0x06]),
    ('Q', [0x3E, 0x41, 0x51, 0x21, 0x5E]),
    ('R', [0x7F, 0x09, 0x19, 0x29, 0x46]),
    ('S', [0x46, 0x49, 0x49, 0x49, 0x31]),
    ('T', [0x01, 0x01, 0x7F, 0x01, 0x01]),
    ('U', [0x3F, 0x40, 0x40, 0x40, 0x3F]),
    ('V', [0x1F, 0x20, 0x40, 0x20, 0x1F]),
    ('W', [0x3F, 0x40, 0x38, 0x40, 0x3F]),
    ('X', [0x63, 0x14, 0x08, 0x14, 0x63]),
    ('Y', [0x07, 0x08, 0x70, 0x08, 0x07]),
    ('Z', [0x61, 0x51, 0x49, 0x45, 0x43]),
];

const GLYPH_ROWS: usize = 7;

fn glyph(c: char) -> [u8; 5] {
    let c = c.to_ascii_uppercase();
    let find = |c: char| GLYPHS.iter().find(|(g, _)| *g == c).map(|(_, cols)| *cols);
    find(c).or_else(|| find('?')).unwrap_or([0; 5])
}

/// Rasterize `text` into columns of 8 cells, bottom row first, followed by a blank display
/// width so the text scrolls fully off before repeating.
pub fn rasterize(text: &str) -> Vec<[bool; SIDE]> {
    let mut columns = Vec::new();
    for c in text.chars() {
        for bits in glyph(c) {
            let mut col = [false; SIDE];
            for row in 0..GLYPH_ROWS {
                // Glyph row 0 is the top; frame z 0 is the bottom layer.
                col[SIDE - 1 - row] = bits & (1 << row) != 0;
            }
            columns.push(col);
        }
        columns.push([false; SIDE]);
    }
    columns.extend(std::iter::repeat_n([false; SIDE], SIDE));
    columns
}

/// Text scrolling along Y on the `x = 0` face.
pub struct FolText {
    columns: Vec<[bool; SIDE]>,
    intensity: u8,
    scroll: i32,
}

pub fn build(ctx: UnitContext) -> Box<dyn Animation> {
    Box::new(FolText {
        columns: rasterize(&ctx.args.string("text")),
        intensity: ctx.args.int("intensity") as u8,
        scroll: -(SIDE as i32),
    })
}

impl Animation for FolText {
    fn render(&mut self, frame: &mut Frame) {
        let width = self.columns.len() as i32;
        if self.scroll < width - SIDE as i32 {
            self.scroll += 1;
        } else {
            self.scroll = -(SIDE as i32);
        }
        for y in 0..SIDE {
            let col = self.scroll + y as i32;
            if col < 0 || col >= width {
                continue;
            }
            let cells = &self.columns[col as usize];
            for (z, &on) in cells.iter().enumerate() {
                frame.set(z, y, 0, if on { self.intensity } else { 0 });
            }
        }
    }
}
