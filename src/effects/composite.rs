//! Porter-Duff helpers on packed premultiplied `0xAARRGGBB` pixels.

use crate::foundation::core::Rgba32;
use crate::foundation::math::{mul_div255_u8, pack_argb, unit_to_u8, unpack_argb};

/// `src` over `dst`.
pub fn over(dst: u32, src: u32) -> u32 {
    let s = unpack_argb(src);
    match s[0] {
        0 => dst,
        255 => src,
        sa => {
            let inv = 255u16 - u16::from(sa);
            let d = unpack_argb(dst);
            pack_argb(std::array::from_fn(|i| {
                s[i].saturating_add(mul_div255_u8(u16::from(d[i]), inv))
            }))
        }
    }
}

/// `color` in `mask`: every channel of `color` scaled by the alpha of `mask`.
pub fn in_alpha(color: u32, mask: u32) -> u32 {
    let ma = u16::from(unpack_argb(mask)[0]);
    match ma {
        0 => 0,
        255 => color,
        _ => pack_argb(unpack_argb(color).map(|c| mul_div255_u8(u16::from(c), ma))),
    }
}

/// Premultiplied packed form of `color` with its alpha multiplied by `opacity`.
///
/// The effective alpha is clamped to `[0, 1]`.
pub fn premultiplied(color: Rgba32, opacity: f64) -> u32 {
    let a = unit_to_u8(color.a_f() * opacity);
    let [r, g, b, _] = color.channels();
    let a16 = u16::from(a);
    pack_argb([
        a,
        mul_div255_u8(u16::from(r), a16),
        mul_div255_u8(u16::from(g), a16),
        mul_div255_u8(u16::from(b), a16),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
