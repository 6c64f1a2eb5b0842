use crate::foundation::error::{RasterFxError, RasterFxResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Integer pixel rectangle, half-open: `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct IntRect {
    /// Left edge (inclusive).
    pub x0: i32,
    /// Top edge (inclusive).
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl IntRect {
    /// Build from two corners; corners are reordered so that `x0 <= x1` and `y0 <= y1`.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Build from origin and size. Negative sizes are treated as zero.
    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x.saturating_add(w.max(0)),
            y1: y.saturating_add(h.max(0)),
        }
    }

    /// Left edge.
    pub fn left(self) -> i32 {
        self.x0
    }

    /// Top edge.
    pub fn top(self) -> i32 {
        self.y0
    }

    /// Right edge (exclusive).
    pub fn right(self) -> i32 {
        self.x1
    }

    /// Bottom edge (exclusive).
    pub fn bottom(self) -> i32 {
        self.y1
    }

    /// Width in pixels.
    pub fn width(self) -> i32 {
        self.x1 - self.x0
    }

    /// Height in pixels.
    pub fn height(self) -> i32 {
        self.y1 - self.y0
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        (self.width().max(0) as usize).saturating_mul(self.height().max(0) as usize)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Smallest integer rectangle containing `r` (rounds outward).
    pub fn round_out(r: Rect) -> Self {
        Self::new(
            r.x0.floor() as i32,
            r.y0.floor() as i32,
            r.x1.ceil() as i32,
            r.y1.ceil() as i32,
        )
    }

    /// Convert to a floating-point rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x0),
            f64::from(self.y0),
            f64::from(self.x1),
            f64::from(self.y1),
        )
    }
}

/// Linear part of `trans` applied to `v` (translation ignored).
pub fn transform_vector(trans: Affine, v: Vec2) -> Vec2 {
    let [a, b, c, d, _, _] = trans.as_coeffs();
    Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y)
}

/// Length of the transformed unit x vector.
pub fn expansion_x(trans: Affine) -> f64 {
    let [a, b, ..] = trans.as_coeffs();
    a.hypot(b)
}

/// Length of the transformed unit y vector.
pub fn expansion_y(trans: Affine) -> f64 {
    let [_, _, c, d, ..] = trans.as_coeffs();
    c.hypot(d)
}

/// Non-premultiplied color packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Rgba32(pub u32);

impl Rgba32 {
    /// Opaque black.
    pub const BLACK: Self = Self(0x0000_00ff);

    /// Build from 8-bit channels.
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
    pub fn parse_hex(s: &str) -> RasterFxResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(RasterFxError::validation(format!("invalid hex color '{s}'")));
        }
        let v = u32::from_str_radix(hex, 16)
            .map_err(|_| RasterFxError::validation(format!("invalid hex color '{s}'")))?;
        match hex.len() {
            6 => Ok(Self((v << 8) | 0xff)),
            8 => Ok(Self(v)),
            _ => Err(RasterFxError::validation(format!(
                "hex color must have 6 or 8 digits, got '{s}'"
            ))),
        }
    }

    /// `[r, g, b, a]` channels.
    pub fn channels(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Alpha in `[0, 1]`.
    pub fn a_f(self) -> f64 {
        f64::from(self.channels()[3]) / 255.0
    }
}

impl Default for Rgba32 {
    fn default() -> Self {
        Self::BLACK
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
