use super::*;
use crate::filters::{FilterUnits, SlotKey};
use crate::surface::{PixelFormat, PixelSurface};

fn dot_slot(units: FilterUnits) -> FilterSlot {
    let mut s = PixelSurface::new(21, 21, PixelFormat::Argb32).unwrap();
    s.set_pixel(10, 10, 0xffff_ffff);
    FilterSlot::with_source(s, units)
}

#[test]
fn small_deviation_copies_input() {
    let blur = FilterGaussianBlur::new(0.05);
    let mut slot = dot_slot(FilterUnits::default());
    blur.render(&mut slot);
    let out = slot.get(SlotKey::Unnamed).unwrap();
    assert_eq!(out.fingerprint(), slot.get(SlotKey::SourceGraphic).unwrap().fingerprint());
    assert_eq!(blur.complexity(Affine::IDENTITY), 1.0);
}

#[test]
fn blur_spreads_into_output_slot() {
    let mut blur = FilterGaussianBlur::new(1.0);
    blur.set_output(SlotKey::Named(7));
    let mut slot = dot_slot(FilterUnits::default());
    blur.render(&mut slot);
    let out = slot.get(SlotKey::Named(7)).unwrap();
    assert!(out.pixel(10, 10) >> 24 < 255);
    assert!(out.pixel(11, 10) >> 24 > 0);
    assert_eq!(slot.get(SlotKey::SourceGraphic).unwrap().pixel(11, 10), 0);
}

#[test]
fn deviation_is_scaled_per_axis() {
    let mut blur = FilterGaussianBlur::default();
    blur.set_deviation_xy(1.0, 0.0);
    assert_eq!(blur.deviation(), (1.0, 0.0));
    let mut slot = dot_slot(FilterUnits::new(Affine::scale_non_uniform(2.0, 1.0)));
    blur.render(&mut slot);
    let out = slot.get(SlotKey::Unnamed).unwrap();
    assert!(out.pixel(13, 10) > 0);
    assert_eq!(out.pixel(10, 11), 0);
}

#[test]
fn area_enlarge_and_complexity() {
    let blur = FilterGaussianBlur::new(2.0);
    let area = IntRect::new(0, 0, 10, 10);
    assert_eq!(blur.area_enlarge(area, Affine::IDENTITY), IntRect::new(-6, -6, 16, 16));
    assert_eq!(blur.area_enlarge(area, Affine::scale(0.5)), IntRect::new(-3, -3, 13, 13));
    assert_eq!(FilterGaussianBlur::new(0.0).area_enlarge(area, Affine::IDENTITY), area);
    assert_eq!(blur.complexity(Affine::IDENTITY), 2.0);
}

#[test]
fn only_isotropic_blurs_follow_rotation() {
    let mut blur = FilterGaussianBlur::new(-1.0);
    assert_eq!(blur.deviation(), (0.0, 0.0));
    assert!(blur.can_handle_affine(Affine::rotate(0.5)));
    blur.set_deviation_xy(1.0, 2.0);
    assert!(!blur.can_handle_affine(Affine::rotate(0.5)));
    assert!(blur.can_handle_affine(Affine::scale(2.0)));
}
