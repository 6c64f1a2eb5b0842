use super::*;
use crate::surface::PixelFormat;

#[test]
fn surfaces_are_stored_per_key() {
    let src = PixelSurface::new(3, 2, PixelFormat::Argb32).unwrap();
    let mut slot = FilterSlot::with_source(src, FilterUnits::default());
    assert!(slot.get(SlotKey::SourceGraphic).is_some());
    assert!(slot.get(SlotKey::Named(1)).is_none());

    slot.set(SlotKey::Named(1), PixelSurface::new(1, 1, PixelFormat::A8).unwrap());
    assert_eq!(slot.get(SlotKey::Named(1)).unwrap().format(), PixelFormat::A8);

    let taken = slot.take(SlotKey::SourceGraphic).unwrap();
    assert_eq!((taken.width(), taken.height()), (3, 2));
    assert!(slot.get(SlotKey::SourceGraphic).is_none());
}

#[test]
fn units_default_to_identity() {
    let units = FilterUnits::default();
    assert_eq!(units.matrix_primitiveunits2pb(), Affine::IDENTITY);
    assert_eq!(units.filter_area(), None);

    let scaled = FilterUnits::new(Affine::scale(2.0)).with_filter_area(IntRect::new(1, 2, 3, 4));
    assert_eq!(scaled.filter_area(), Some(IntRect::new(1, 2, 3, 4)));
    assert_eq!(scaled.matrix_primitiveunits2pb(), Affine::scale(2.0));
}

#[test]
fn primitive_area_falls_back_to_surface_bounds() {
    let surface = PixelSurface::new(8, 5, PixelFormat::Argb32).unwrap();
    let mut slot = FilterSlot::new(FilterUnits::default());
    assert_eq!(slot.filter_primitive_area(&surface), Rect::new(0.0, 0.0, 8.0, 5.0));

    slot.set_primitive_area(SlotKey::Named(0), Rect::new(1.0, 1.0, 2.0, 2.0));
    assert_eq!(slot.primitive_area(SlotKey::Named(0)), Some(Rect::new(1.0, 1.0, 2.0, 2.0)));

    let bounded = FilterSlot::new(FilterUnits::default().with_filter_area(IntRect::new(2, 2, 4, 4)));
    assert_eq!(bounded.filter_primitive_area(&surface), Rect::new(2.0, 2.0, 4.0, 4.0));
}
