//! Bit packing for the TLC serial registers.
//!
//! Grayscale values are 12 bits, two per three bytes; dot-correction values are 6 bits, four per
//! three bytes. Both are MSB first. Packing is pure and polarity-free; see [`Polarity`].

/// Pack 12-bit values, two per three bytes. Values are reduced modulo 4096; an odd trailing
/// value is padded with zero.
pub fn pack_12bit(values: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len().div_ceil(2) * 3);
    for pair in values.chunks(2) {
        let v0 = pair[0] & 0x0FFF;
        let v1 = pair.get(1).copied().unwrap_or(0) & 0x0FFF;
        out.push((v0 >> 4) as u8);
        out.push((((v0 & 0x0F) << 4) | (v1 >> 8)) as u8);
        out.push((v1 & 0xFF) as u8);
    }
    out
}

/// Pack 6-bit values, four per three bytes. Values are reduced modulo 64; a short trailing group
/// is padded with zeros.
pub fn pack_6bit(values: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len().div_ceil(4) * 3);
    for quad in values.chunks(4) {
        let v = |i: usize| quad.get(i).copied().unwrap_or(0) & 0x3F;
        let (v0, v1, v2, v3) = (v(0), v(1), v(2), v(3));
        out.push((v0 << 2) | (v1 >> 4));
        out.push(((v1 & 0x0F) << 4) | (v2 >> 2));
        out.push(((v2 & 0x03) << 6) | v3);
    }
    out
}

/// Electrical polarity of the chain.
///
/// Boards that drive the chips through inverting buffers need every control level swapped and
/// every shifted byte complemented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Polarity {
    Normal,
    #[default]
    Inverted,
}

impl Polarity {
    pub fn from_inverted(inverted: bool) -> Self {
        if inverted {
            Self::Inverted
        } else {
            Self::Normal
        }
    }

    /// Physical pin level for a logical level.
    pub fn level(self, high: bool) -> bool {
        match self {
            Self::Normal => high,
            Self::Inverted => !high,
        }
    }

    /// Convert packed bytes to line levels in place.
    pub fn apply(self, bytes: &mut [u8]) {
        if self == Self::Inverted {
            for b in bytes {
                *b = !*b;
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/hardware/pack.rs"]
mod tests;
