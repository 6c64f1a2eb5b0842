use crate::effects::premultiplied;
use crate::foundation::core::{Affine, IntRect, Rgba32};
use crate::foundation::error::{RasterFxError, RasterFxResult};
use crate::surface::{PixelFormat, PixelSurface, synthesize_area};

use super::{FilterPrimitive, FilterSlot, PrimitiveIo};

/// Fills the primitive area with a solid color. The input only provides the surface size.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterFlood {
    io: PrimitiveIo,
    color: Rgba32,
    opacity: f64,
}

impl Default for FilterFlood {
    fn default() -> Self {
        Self {
            io: PrimitiveIo::default(),
            color: Rgba32::BLACK,
            opacity: 1.0,
        }
    }
}

impl FilterFlood {
    /// Opaque black flood.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill color, non-premultiplied.
    pub fn set_color(&mut self, color: Rgba32) {
        self.color = color;
    }

    /// Fill opacity; clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Fill color.
    pub fn color(&self) -> Rgba32 {
        self.color
    }

    /// Fill opacity.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    fn try_render(&self, slot: &mut FilterSlot) -> RasterFxResult<()> {
        let input = slot.get(self.io.input).ok_or_else(|| {
            RasterFxError::validation(format!("input slot {:?} is empty", self.io.input))
        })?;
        input.check_status()?;

        let mut out = PixelSurface::new(input.width(), input.height(), PixelFormat::Argb32)?;
        out.set_color_interpolation(input.color_interpolation());
        let vp = slot.filter_primitive_area(input);

        let color = premultiplied(self.color, self.opacity);
        synthesize_area(&mut out, IntRect::round_out(vp), |_, _| color)?;

        let output = self.io.output;
        slot.set_primitive_area(output, vp);
        slot.set(output, out);
        Ok(())
    }
}

impl FilterPrimitive for FilterFlood {
    fn name(&self) -> &'static str {
        "Flood"
    }

    fn io(&self) -> &PrimitiveIo {
        &self.io
    }

    fn io_mut(&mut self) -> &mut PrimitiveIo {
        &mut self.io
    }

    #[tracing::instrument(level = "debug", skip(self, slot))]
    fn render(&self, slot: &mut FilterSlot) {
        if let Err(err) = self.try_render(slot) {
            tracing::debug!(%err, "flood not rendered");
        }
    }

    fn can_handle_affine(&self, _trans: Affine) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/flood.rs"]
mod tests;
