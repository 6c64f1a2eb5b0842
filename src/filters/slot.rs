use std::collections::HashMap;

use crate::foundation::core::{Affine, IntRect, Rect};
use crate::surface::PixelSurface;

/// Name of an intermediate surface inside one filter invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SlotKey {
    /// The rendered element the filter is applied to.
    #[default]
    SourceGraphic,
    /// Output of a primitive that names no result.
    Unnamed,
    /// Result of an earlier primitive.
    Named(u32),
}

/// Coordinate systems of one filter invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterUnits {
    primitive_to_pb: Affine,
    filter_area: Option<IntRect>,
}

impl FilterUnits {
    /// Units mapping primitive coordinates to pixel-buffer coordinates through `primitive_to_pb`.
    pub fn new(primitive_to_pb: Affine) -> Self {
        Self {
            primitive_to_pb,
            filter_area: None,
        }
    }

    /// Restrict the filter region to `area`, in pixel-buffer coordinates.
    pub fn with_filter_area(mut self, area: IntRect) -> Self {
        self.filter_area = Some(area);
        self
    }

    /// Primitive units to pixel buffer.
    pub fn matrix_primitiveunits2pb(&self) -> Affine {
        self.primitive_to_pb
    }

    /// Filter region in pixel-buffer coordinates, if one was set.
    pub fn filter_area(&self) -> Option<IntRect> {
        self.filter_area
    }
}

impl Default for FilterUnits {
    fn default() -> Self {
        Self::new(Affine::IDENTITY)
    }
}

/// Surfaces exchanged between the primitives of one filter invocation.
///
/// Every surface is owned by the slot; a primitive borrows its input and hands over a new output.
#[derive(Debug, Default)]
pub struct FilterSlot {
    surfaces: HashMap<SlotKey, PixelSurface>,
    primitive_areas: HashMap<SlotKey, Rect>,
    units: FilterUnits,
}

impl FilterSlot {
    /// An empty slot.
    pub fn new(units: FilterUnits) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }

    /// A slot holding `source` as [`SlotKey::SourceGraphic`].
    pub fn with_source(source: PixelSurface, units: FilterUnits) -> Self {
        let mut slot = Self::new(units);
        slot.set(SlotKey::SourceGraphic, source);
        slot
    }

    /// Surface stored under `key`.
    pub fn get(&self, key: SlotKey) -> Option<&PixelSurface> {
        self.surfaces.get(&key)
    }

    /// Store `surface` under `key`, replacing any previous one.
    pub fn set(&mut self, key: SlotKey, surface: PixelSurface) {
        self.surfaces.insert(key, surface);
    }

    /// Remove and return the surface stored under `key`.
    pub fn take(&mut self, key: SlotKey) -> Option<PixelSurface> {
        self.surfaces.remove(&key)
    }

    /// Coordinate systems of this invocation.
    pub fn units(&self) -> &FilterUnits {
        &self.units
    }

    /// Record the pixel-buffer area a primitive's result covers.
    pub fn set_primitive_area(&mut self, key: SlotKey, area: Rect) {
        self.primitive_areas.insert(key, area);
    }

    /// Area recorded by [`FilterSlot::set_primitive_area`].
    pub fn primitive_area(&self, key: SlotKey) -> Option<Rect> {
        self.primitive_areas.get(&key).copied()
    }

    /// Area a primitive reading `surface` covers: the filter region when set, else the surface.
    pub fn filter_primitive_area(&self, surface: &PixelSurface) -> Rect {
        self.units
            .filter_area()
            .unwrap_or_else(|| {
                IntRect::from_xywh(0, 0, surface.width() as i32, surface.height() as i32)
            })
            .to_rect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/filters/slot.rs"]
mod tests;
