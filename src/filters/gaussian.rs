use crate::effects::gaussian_blur_xy;
use crate::foundation::core::{Affine, IntRect, Rect, Vec2, expansion_x, expansion_y, transform_vector};
use crate::foundation::error::{RasterFxError, RasterFxResult};

use super::drop_shadow::NO_BLUR_DEVIATION;
use super::{FilterPrimitive, FilterSlot, PrimitiveIo};

/// Gaussian blur of the input, optionally with a different deviation per axis.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterGaussianBlur {
    io: PrimitiveIo,
    deviation_x: f64,
    deviation_y: f64,
}

impl FilterGaussianBlur {
    /// Isotropic blur of `deviation` primitive units.
    pub fn new(deviation: f64) -> Self {
        let mut blur = Self::default();
        blur.set_deviation(deviation);
        blur
    }

    /// Same deviation on both axes; negative values clamp to zero.
    pub fn set_deviation(&mut self, deviation: f64) {
        self.set_deviation_xy(deviation, deviation);
    }

    /// Per-axis deviation; negative values clamp to zero.
    pub fn set_deviation_xy(&mut self, x: f64, y: f64) {
        self.deviation_x = x.max(0.0);
        self.deviation_y = y.max(0.0);
    }

    /// `(x, y)` deviation in primitive units.
    pub fn deviation(&self) -> (f64, f64) {
        (self.deviation_x, self.deviation_y)
    }

    fn is_noop(&self) -> bool {
        self.deviation_x <= NO_BLUR_DEVIATION && self.deviation_y <= NO_BLUR_DEVIATION
    }

    fn try_render(&self, slot: &mut FilterSlot) -> RasterFxResult<()> {
        let input = slot.get(self.io.input).ok_or_else(|| {
            RasterFxError::validation(format!("input slot {:?} is empty", self.io.input))
        })?;
        input.check_status()?;

        let mut out = input.clone();
        let vp = slot.filter_primitive_area(input);
        if !self.is_noop() {
            let p2pb = slot.units().matrix_primitiveunits2pb();
            gaussian_blur_xy(
                &mut out,
                self.deviation_x * expansion_x(p2pb),
                self.deviation_y * expansion_y(p2pb),
            )?;
        }

        let output = self.io.output;
        slot.set_primitive_area(output, vp);
        slot.set(output, out);
        Ok(())
    }
}

impl FilterPrimitive for FilterGaussianBlur {
    fn name(&self) -> &'static str {
        "GaussianBlur"
    }

    fn io(&self) -> &PrimitiveIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut PrimitiveIo {
        &mut self.io
    }

    #[tracing::instrument(level = "debug", skip(self, slot), fields(deviation_x = self.deviation_x, deviation_y = self.deviation_y))]
    fn render(&self, slot: &mut FilterSlot) {
        if let Err(err) = self.try_render(slot) {
            tracing::debug!(%err, "gaussian blur not rendered");
        }
    }

    fn area_enlarge(&self, area: IntRect, trans: Affine) -> IntRect {
        if self.is_noop() {
            return area;
        }
        let e = transform_vector(trans, Vec2::new(3.0 * self.deviation_x, 3.0 * self.deviation_y));
        let (ex, ey) = (e.x.abs(), e.y.abs());
        let r = area.to_rect();
        IntRect::round_out(Rect::new(r.x0 - ex, r.y0 - ey, r.x1 + ex, r.y1 + ey))
    }

    fn complexity(&self, _ctm: Affine) -> f64 {
        if self.is_noop() {
            1.0
        } else {
            1.0 + 0.5 * self.deviation_x.max(self.deviation_y)
        }
    }

    /// Anisotropic blurs are axis-aligned, so they cannot follow a rotation or skew.
    fn can_handle_affine(&self, trans: Affine) -> bool {
        let [_, b, c, ..] = trans.as_coeffs();
        self.deviation_x == self.deviation_y || (b == 0.0 && c == 0.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/gaussian.rs"]
mod tests;
