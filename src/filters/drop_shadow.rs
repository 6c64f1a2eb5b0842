use crate::effects::{gaussian_blur_xy, in_alpha, over, premultiplied};
use crate::foundation::core::{
    Affine, IntRect, Rect, Rgba32, Vec2, expansion_x, expansion_y, transform_vector,
};
use crate::foundation::error::{RasterFxError, RasterFxResult};
use crate::surface::{SurfaceSampler, blend, filter, synthesize};

use super::{FilterPrimitive, FilterSlot, PrimitiveIo};

/// Deviations at or below this are rendered without blur.
pub const NO_BLUR_DEVIATION: f64 = 0.1;

/// Drop shadow: a blurred, tinted and offset copy of the input's silhouette painted behind the
/// input itself.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterDropShadow {
    io: PrimitiveIo,
    dx: f64,
    dy: f64,
    std_deviation: f64,
    flood_color: Rgba32,
    flood_opacity: f64,
}

impl Default for FilterDropShadow {
    fn default() -> Self {
        Self {
            io: PrimitiveIo::default(),
            dx: 2.0,
            dy: 2.0,
            std_deviation: 2.0,
            flood_color: Rgba32::BLACK,
            flood_opacity: 1.0,
        }
    }
}

impl FilterDropShadow {
    /// A primitive with the SVG defaults (`dx = dy = stdDeviation = 2`, opaque black).
    pub fn new() -> Self {
        Self::default()
    }

    /// Horizontal offset in primitive units.
    pub fn set_dx(&mut self, amount: f64) {
        self.dx = amount;
    }

    /// Vertical offset in primitive units.
    pub fn set_dy(&mut self, amount: f64) {
        self.dy = amount;
    }

    /// Blur deviation in primitive units; negative values clamp to zero.
    pub fn set_std_deviation(&mut self, deviation: f64) {
        self.std_deviation = deviation.max(0.0);
    }

    /// Shadow color, non-premultiplied.
    pub fn set_flood_color(&mut self, color: Rgba32) {
        self.flood_color = color;
    }

    /// Shadow opacity; clamped to `[0, 1]`.
    pub fn set_flood_opacity(&mut self, opacity: f64) {
        self.flood_opacity = opacity.clamp(0.0, 1.0);
    }

    /// Horizontal offset.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// Vertical offset.
    pub fn dy(&self) -> f64 {
        self.dy
    }

    /// Blur deviation.
    pub fn std_deviation(&self) -> f64 {
        self.std_deviation
    }

    /// Shadow color.
    pub fn flood_color(&self) -> Rgba32 {
        self.flood_color
    }

    /// Shadow opacity.
    pub fn flood_opacity(&self) -> f64 {
        self.flood_opacity
    }

    fn try_render(&self, slot: &mut FilterSlot) -> RasterFxResult<()> {
        let input = slot.get(self.io.input).ok_or_else(|| {
            RasterFxError::validation(format!("input slot {:?} is empty", self.io.input))
        })?;
        input.check_status()?;

        let mut out = input.create_identical()?;
        let vp = slot.filter_primitive_area(input);

        let p2pb = slot.units().matrix_primitiveunits2pb();
        let (ex, ey) = (expansion_x(p2pb), expansion_y(p2pb));
        let offset_x = self.dx * ex;
        let offset_y = self.dy * ey;

        // Silhouette of the input in the flood color.
        let mut shadow = input.create_identical()?;
        let tint = premultiplied(self.flood_color, self.flood_opacity);
        filter(input, &mut shadow, |px| in_alpha(tint, px))?;

        if self.std_deviation > NO_BLUR_DEVIATION {
            gaussian_blur_xy(
                &mut shadow,
                self.std_deviation * ex,
                self.std_deviation * ey,
            )?;
        }

        let mut offset_layer = input.create_identical()?;
        {
            let sampler = SurfaceSampler::new(&shadow)?;
            synthesize(&mut offset_layer, |x, y| {
                sampler.pixel_at_f(f64::from(x) - offset_x, f64::from(y) - offset_y)
            })?;
        }

        blend(&offset_layer, input, &mut out, |shadow_px, input_px| {
            over(shadow_px, input_px)
        })?;

        let output = self.io.output;
        slot.set_primitive_area(output, vp);
        slot.set(output, out);
        Ok(())
    }
}

impl FilterPrimitive for FilterDropShadow {
    fn name(&self) -> &'static str {
        "DropShadow"
    }

    fn io(&self) -> &PrimitiveIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut PrimitiveIo {
        &mut self.io
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, slot),
        fields(dx = self.dx, dy = self.dy, std_deviation = self.std_deviation)
    )]
    fn render(&self, slot: &mut FilterSlot) {
        if let Err(err) = self.try_render(slot) {
            tracing::debug!(%err, "drop shadow not rendered");
        }
    }

    /// Grows `area` toward the offset, then by `3 * stdDeviation` on every side unless the blur
    /// is disabled, all mapped through the linear part of `trans`.
    fn area_enlarge(&self, area: IntRect, trans: Affine) -> IntRect {
        let offset = transform_vector(trans, Vec2::new(self.dx, self.dy));
        let blur = if self.std_deviation > NO_BLUR_DEVIATION {
            let e = 3.0 * self.std_deviation;
            transform_vector(trans, Vec2::new(e, e))
        } else {
            Vec2::ZERO
        };

        let mut r = area.to_rect();
        if offset.x > 0.0 {
            r.x1 += offset.x;
        } else {
            r.x0 += offset.x;
        }
        if offset.y > 0.0 {
            r.y1 += offset.y;
        } else {
            r.y0 += offset.y;
        }

        IntRect::round_out(Rect::new(
            r.x0 - blur.x.abs(),
            r.y0 - blur.y.abs(),
            r.x1 + blur.x.abs(),
            r.y1 + blur.y.abs(),
        ))
    }

    fn complexity(&self, _ctm: Affine) -> f64 {
        if self.std_deviation <= NO_BLUR_DEVIATION {
            1.0
        } else {
            2.0 + self.std_deviation * 0.5
        }
    }

    fn can_handle_affine(&self, _trans: Affine) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/drop_shadow.rs"]
mod tests;
