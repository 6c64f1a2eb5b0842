//! Filter primitives: one effect stage each, reading and writing surfaces through a
//! [`FilterSlot`].

pub mod drop_shadow;
pub mod flood;
pub mod gaussian;
pub mod slot;

pub use drop_shadow::FilterDropShadow;
pub use flood::FilterFlood;
pub use gaussian::FilterGaussianBlur;
pub use slot::{FilterSlot, FilterUnits, SlotKey};

use crate::foundation::core::{Affine, IntRect};

/// Input and output slot of a primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveIo {
    /// Slot the primitive reads.
    pub input: SlotKey,
    /// Slot the primitive writes.
    pub output: SlotKey,
}

impl Default for PrimitiveIo {
    fn default() -> Self {
        Self {
            input: SlotKey::SourceGraphic,
            output: SlotKey::Unnamed,
        }
    }
}

/// One stage of a filter.
///
/// `render` never reports failure: when a step fails (bad input status, allocation) the stage is
/// skipped and the output slot keeps whatever it held before.
pub trait FilterPrimitive: std::fmt::Debug + Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Input and output slots.
    fn io(&self) -> &PrimitiveIo;

    /// Mutable access to the input and output slots.
    fn io_mut(&mut self) -> &mut PrimitiveIo;

    /// Render from the input slot into the output slot.
    fn render(&self, slot: &mut FilterSlot);

    /// Grow `area` (pixel-buffer coordinates) by the spread this primitive introduces under
    /// `trans`.
    fn area_enlarge(&self, area: IntRect, _trans: Affine) -> IntRect {
        area
    }

    /// Relative rendering cost; `1.0` is a plain per-pixel pass.
    fn complexity(&self, _ctm: Affine) -> f64 {
        1.0
    }

    /// Whether the primitive renders correctly in a space related to user space by `trans`.
    fn can_handle_affine(&self, _trans: Affine) -> bool {
        false
    }

    /// Slot the primitive reads.
    fn input(&self) -> SlotKey {
        self.io().input
    }

    /// Slot the primitive writes.
    fn output(&self) -> SlotKey {
        self.io().output
    }

    /// Read from `key`.
    fn set_input(&mut self, key: SlotKey) {
        self.io_mut().input = key;
    }

    /// Write to `key`.
    fn set_output(&mut self, key: SlotKey) {
        self.io_mut().output = key;
    }
}

/// Render `primitives` in order against one slot.
pub fn render_chain(primitives: &[&dyn FilterPrimitive], slot: &mut FilterSlot) {
    for primitive in primitives {
        tracing::trace!(name = primitive.name(), input = ?primitive.input(), output = ?primitive.output(), "render primitive");
        primitive.render(slot);
    }
}

/// Combined region growth of `primitives`.
pub fn chain_area_enlarge(
    primitives: &[&dyn FilterPrimitive],
    area: IntRect,
    trans: Affine,
) -> IntRect {
    primitives
        .iter()
        .fold(area, |area, p| p.area_enlarge(area, trans))
}
