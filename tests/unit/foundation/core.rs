use super::*;

#[test]
fn int_rect_accessors() {
    let r = IntRect::from_xywh(10, 10, 40, 20);
    assert_eq!(r.left(), 10);
    assert_eq!(r.top(), 10);
    assert_eq!(r.right(), 50);
    assert_eq!(r.bottom(), 30);
    assert_eq!(r.width(), 40);
    assert_eq!(r.height(), 20);
    assert_eq!(r.area(), 800);
    assert!(!r.is_empty());
    assert!(IntRect::from_xywh(0, 0, -3, 4).is_empty());
}

#[test]
fn round_out_covers_fractional_edges() {
    let r = IntRect::round_out(Rect::new(-0.5, 1.2, 10.1, 19.0));
    assert_eq!(r, IntRect::new(-1, 1, 11, 19));
}

#[test]
fn new_reorders_corners() {
    assert_eq!(IntRect::new(5, 6, 1, 2), IntRect::new(1, 2, 5, 6));
}

#[test]
fn vector_transform_ignores_translation() {
    let t = Affine::translate((100.0, 50.0)) * Affine::scale_non_uniform(2.0, 3.0);
    let v = transform_vector(t, Vec2::new(1.0, 1.0));
    assert_eq!(v, Vec2::new(2.0, 3.0));
    assert_eq!(expansion_x(t), 2.0);
    assert_eq!(expansion_y(t), 3.0);
}

#[test]
fn expansion_of_rotation_is_one() {
    let t = Affine::rotate(0.7);
    assert!((expansion_x(t) - 1.0).abs() < 1e-12);
    assert!((expansion_y(t) - 1.0).abs() < 1e-12);
}

#[test]
fn rgba32_parse_and_channels() {
    assert_eq!(Rgba32::parse_hex("#ff0000").unwrap(), Rgba32(0xff00_00ff));
    assert_eq!(Rgba32::parse_hex("00ff0080").unwrap(), Rgba32(0x00ff_0080));
    assert!(Rgba32::parse_hex("#fff").is_err());
    assert!(Rgba32::parse_hex("zzzzzz").is_err());

    let c = Rgba32::from_rgba(255, 0, 51, 255);
    assert_eq!(c.channels(), [255, 0, 51, 255]);
    assert_eq!(c.a_f(), 1.0);
    assert!((Rgba32::from_rgba(0, 0, 0, 51).a_f() - 0.2).abs() < 1e-12);
    assert_eq!(Rgba32::default(), Rgba32::BLACK);
}
