//! 8-bit fixed-point helpers shared by the pixel kernels.
//!
//! Packed pixels are `0xAARRGGBB` with premultiplied color channels.

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Split a packed pixel into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(px: u32) -> [u8; 4] {
    [
        (px >> 24) as u8,
        (px >> 16) as u8,
        (px >> 8) as u8,
        px as u8,
    ]
}

/// Inverse of [`unpack_argb`].
#[inline]
pub fn pack_argb(c: [u8; 4]) -> u32 {
    (u32::from(c[0]) << 24) | (u32::from(c[1]) << 16) | (u32::from(c[2]) << 8) | u32::from(c[3])
}

/// Alpha channel of a packed pixel.
#[inline]
pub fn alpha_of(px: u32) -> u32 {
    px >> 24
}

/// Convert a unit-interval value to an 8-bit channel, rounding to nearest.
#[inline]
pub(crate) fn unit_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
