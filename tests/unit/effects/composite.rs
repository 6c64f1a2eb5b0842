use super::*;

#[test]
fn over_transparent_src_is_noop() {
    assert_eq!(over(0x8040_2010, 0x00ff_ffff), 0x8040_2010);
}

#[test]
fn over_opaque_src_replaces_dst() {
    assert_eq!(over(0xff00_00ff, 0xffff_0000), 0xffff_0000);
}

#[test]
fn over_transparent_dst_returns_src() {
    assert_eq!(over(0, 0x8040_2010), 0x8040_2010);
}

#[test]
fn over_half_alpha_mixes() {
    // 0x80 alpha leaves (255 - 128) / 255 of the opaque white backdrop.
    let out = over(0xffff_ffff, 0x8000_0000);
    assert_eq!(out >> 24, 0xff);
    assert_eq!((out >> 16) & 0xff, 127);
}

#[test]
fn in_alpha_scales_all_channels() {
    assert_eq!(in_alpha(0xffff_ffff, 0), 0);
    assert_eq!(in_alpha(0xff20_4060, 0xff00_0000), 0xff20_4060);
    assert_eq!(in_alpha(0xffff_ffff, 0x8000_0000), 0x8080_8080);
}

#[test]
fn premultiplied_flood_color() {
    assert_eq!(premultiplied(Rgba32::BLACK, 1.0), 0xff00_0000);
    assert_eq!(premultiplied(Rgba32::from_rgba(255, 0, 0, 255), 0.5), 0x8080_0000);
    assert_eq!(premultiplied(Rgba32::from_rgba(255, 255, 255, 255), 0.0), 0);
    assert_eq!(premultiplied(Rgba32::from_rgba(0, 255, 0, 128), 4.0), 0xff00_ff00);
}
