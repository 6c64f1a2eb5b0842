//! Point, bilinear and gradient sampling of a surface.
//!
//! Lighting-style filters read a surface through [`SurfaceSampler`] one position at a time, so
//! every lookup branches once on the storage format instead of being monomorphized per kernel.

use crate::foundation::error::RasterFxResult;
use crate::foundation::math::alpha_of;

use super::accessor::{Reader, reader};
use super::surface::PixelSurface;

/// Unit-length surface normal derived from the alpha channel treated as a height field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceNormal {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component; points out of the surface.
    pub z: f64,
}

impl SurfaceNormal {
    /// Normal of a flat region.
    pub const FLAT: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    fn normalized(x: f64, y: f64, z: f64) -> Self {
        let len = (x * x + y * y + z * z).sqrt();
        Self {
            x: x / len,
            y: y / len,
            z: z / len,
        }
    }
}

/// Read-only sampler over a flushed surface.
#[derive(Clone, Copy)]
pub struct SurfaceSampler<'a> {
    reader: Reader<'a>,
    alpha_only: bool,
    width: u32,
    height: u32,
}

impl<'a> SurfaceSampler<'a> {
    /// Flushes `surface` and binds a sampler to it. Fails on surfaces in an error state.
    pub fn new(surface: &'a PixelSurface) -> RasterFxResult<Self> {
        surface.check_status()?;
        surface.flush();
        let reader = reader(surface);
        Ok(Self {
            alpha_only: matches!(reader, Reader::A8(_)),
            reader,
            width: surface.width(),
            height: surface.height(),
        })
    }

    /// Width of the sampled surface.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the sampled surface.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed `0xAARRGGBB` pixel at integer coordinates. Panics when out of bounds.
    #[inline]
    pub fn pixel_at(&self, x: u32, y: u32) -> u32 {
        self.reader.get(x as usize, y as usize)
    }

    /// Alpha (0-255) at integer coordinates. Panics when out of bounds.
    #[inline]
    pub fn alpha_at(&self, x: u32, y: u32) -> u32 {
        alpha_of(self.pixel_at(x, y))
    }

    /// Bilinearly interpolated pixel at fractional coordinates.
    ///
    /// Weights are quantized to 0..=255 and each channel is rounded to nearest. Taps that fall
    /// outside the surface read as transparent black.
    pub fn pixel_at_f(&self, x: f64, y: f64) -> u32 {
        if self.alpha_only {
            return self.alpha_at_f(x, y) << 24;
        }
        let ([p00, p10, p01, p11], xw, yw) = self.taps(x, y);
        (0..4).fold(0, |acc, i| {
            let shift = i * 8;
            let c = |p: u32| (p >> shift) & 0xff;
            acc | (lerp2(c(p00), c(p10), c(p01), c(p11), xw, yw) << shift)
        })
    }

    /// Bilinearly interpolated alpha (0-255) at fractional coordinates.
    pub fn alpha_at_f(&self, x: f64, y: f64) -> u32 {
        let ([p00, p10, p01, p11], xw, yw) = self.taps(x, y);
        lerp2(
            alpha_of(p00),
            alpha_of(p10),
            alpha_of(p01),
            alpha_of(p11),
            xw,
            yw,
        )
    }

    fn taps(&self, x: f64, y: f64) -> ([u32; 4], u32, u32) {
        let (xf, yf) = (x.floor(), y.floor());
        // Transparent when no tap lands on the surface; NaN and infinities fail both checks.
        let x_near = xf >= -1.0 && xf < f64::from(self.width);
        let y_near = yf >= -1.0 && yf < f64::from(self.height);
        if !(x_near && y_near) {
            return ([0; 4], 0, 0);
        }
        let xw = ((x - xf) * 255.0).round() as u32;
        let yw = ((y - yf) * 255.0).round() as u32;
        let (xi, yi) = (xf as i64, yf as i64);
        let px = |x: i64, y: i64| self.pixel_or_clear(x, y);
        (
            [px(xi, yi), px(xi + 1, yi), px(xi, yi + 1), px(xi + 1, yi + 1)],
            xw,
            yw,
        )
    }

    fn pixel_or_clear(&self, x: i64, y: i64) -> u32 {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return 0;
        }
        self.pixel_at(x as u32, y as u32)
    }

    /// Unit normal at `(x, y)` from a Sobel gradient of the alpha channel. Panics when out of
    /// bounds.
    ///
    /// Border pixels use the truncated kernel: missing taps are dropped, the center row or column
    /// keeps weight 2, and the gradient is renormalized by the available weight and tap
    /// distance (`1/4` inside, `1/2` and `1/3` on edges, `2/3` at corners). A gradient along an
    /// axis only one pixel wide is zero. The Z component is 1 before normalization.
    pub fn surface_normal_at(&self, x: u32, y: u32, scale: f64) -> SurfaceNormal {
        let left = x.saturating_sub(1);
        let right = (x + 1).min(self.width - 1);
        let top = y.saturating_sub(1);
        let bottom = (y + 1).min(self.height - 1);

        let a = |x: u32, y: u32| f64::from(self.alpha_at(x, y));

        // Horizontal gradient: right column minus left column, rows weighted 1-2-1.
        let mut gx = 0.0;
        let mut wx = 0.0;
        // Vertical gradient: bottom row minus top row, columns weighted 1-2-1.
        let mut gy = 0.0;
        let mut wy = 0.0;
        for row in top..=bottom {
            let w = if row == y { 2.0 } else { 1.0 };
            gx += w * (a(right, row) - a(left, row));
            wx += w;
        }
        for col in left..=right {
            let w = if col == x { 2.0 } else { 1.0 };
            gy += w * (a(col, bottom) - a(col, top));
            wy += w;
        }

        let fx = axis_factor(wx, right - left, scale);
        let fy = axis_factor(wy, bottom - top, scale);
        SurfaceNormal::normalized(gx * fx, gy * fy, 1.0)
    }
}

impl std::fmt::Debug for SurfaceSampler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceSampler")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("alpha_only", &self.alpha_only)
            .finish()
    }
}

fn axis_factor(weight: f64, distance: u32, scale: f64) -> f64 {
    if distance == 0 {
        return 0.0;
    }
    -scale / 255.0 * 2.0 / (weight * f64::from(distance))
}

#[inline]
fn lerp2(p00: u32, p10: u32, p01: u32, p11: u32, xw: u32, yw: u32) -> u32 {
    let upper = (255 - xw) * p00 + xw * p10;
    let lower = (255 - xw) * p01 + xw * p11;
    ((255 - yw) * upper + yw * lower + 255 * 255 / 2) / (255 * 255)
}

#[cfg(test)]
#[path = "../../tests/unit/surface/sampler.rs"]
mod tests;
