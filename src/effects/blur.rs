//! Separable Gaussian blur over premultiplied surfaces.
//!
//! Pixels outside the surface count as transparent black. Small deviations use an exact Q16
//! fixed-point kernel; from [`BOX_BLUR_MIN_DEVIATION`] upward three successive box blurs
//! approximate the Gaussian at a cost independent of the radius.
//!
//! Both passes run one job per row on the global dispatch pool. The vertical pass transposes the
//! image, blurs rows, and transposes back, so every job owns exactly one destination row.

use std::sync::{Mutex, PoisonError};

use smallvec::SmallVec;

use crate::dispatch::{DispatchPool, get_global_dispatch_pool};
use crate::foundation::error::{RasterFxError, RasterFxResult};
use crate::foundation::math::{pack_argb, unpack_argb};
use crate::surface::accessor::reader;
use crate::surface::{POOL_THRESHOLD, PixelRowsMut, PixelSurface, synthesize};

/// Deviation from which the box-blur approximation replaces the exact kernel.
pub const BOX_BLUR_MIN_DEVIATION: f64 = 2.0;

type Kernel = SmallVec<[u32; 16]>;

#[derive(Clone, Debug, PartialEq)]
enum BlurPlan {
    Fir(Kernel),
    Box(usize),
}

impl BlurPlan {
    fn new(std_deviation: f64) -> RasterFxResult<Option<Self>> {
        if !std_deviation.is_finite() || std_deviation <= 0.0 {
            return Ok(None);
        }
        if std_deviation < BOX_BLUR_MIN_DEVIATION {
            let radius = (3.0 * std_deviation).ceil() as u32;
            return Ok(Some(Self::Fir(gaussian_kernel_q16(radius, std_deviation)?)));
        }
        Ok(Some(Self::Box(box_size(std_deviation))))
    }
}

/// Box size that makes three passes approximate a Gaussian of `std_deviation`.
pub fn box_size(std_deviation: f64) -> usize {
    let d = std_deviation * 3.0 * (2.0 * std::f64::consts::PI).sqrt() / 4.0 + 0.5;
    (d.floor() as usize).clamp(1, 1 << 24)
}

/// Blur `surface` in place with the same deviation on both axes.
pub fn gaussian_blur(surface: &mut PixelSurface, std_deviation: f64) -> RasterFxResult<()> {
    gaussian_blur_xy(surface, std_deviation, std_deviation)
}

/// Blur `surface` in place; a deviation `<= 0` leaves that axis untouched.
pub fn gaussian_blur_xy(
    surface: &mut PixelSurface,
    std_deviation_x: f64,
    std_deviation_y: f64,
) -> RasterFxResult<()> {
    surface.check_status()?;
    let plan_x = BlurPlan::new(std_deviation_x)?;
    let plan_y = BlurPlan::new(std_deviation_y)?;
    if plan_x.is_none() && plan_y.is_none() {
        return Ok(());
    }

    surface.flush();
    let (w, h) = (surface.width() as usize, surface.height() as usize);
    let mut buf = alloc_buffer(w * h)?;
    {
        let src = reader(surface);
        for (y, row) in buf.chunks_exact_mut(w).enumerate() {
            for (x, px) in row.iter_mut().enumerate() {
                *px = src.get(x, y);
            }
        }
    }
    let mut tmp = alloc_buffer(w * h)?;

    let pool = get_global_dispatch_pool();
    tracing::trace!(w, h, std_deviation_x, std_deviation_y, "gaussian blur");

    if let Some(plan) = &plan_x {
        blur_rows(&pool, &buf, &mut tmp, w, h, plan)?;
        std::mem::swap(&mut buf, &mut tmp);
    }
    if let Some(plan) = &plan_y {
        transpose(&pool, &buf, &mut tmp, w, h);
        blur_rows(&pool, &tmp, &mut buf, h, w, plan)?;
        transpose(&pool, &buf, &mut tmp, h, w);
        std::mem::swap(&mut buf, &mut tmp);
    }

    synthesize(surface, |x, y| buf[y as usize * w + x as usize])
}

fn alloc_buffer(len: usize) -> RasterFxResult<Vec<u32>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| RasterFxError::allocation(format!("blur buffer of {len} pixels")))?;
    v.resize(len, 0);
    Ok(v)
}

// `dst` is `src` transposed: `h` rows of `w` pixels become `w` rows of `h` pixels.
fn transpose(pool: &DispatchPool, src: &[u32], dst: &mut [u32], w: usize, h: usize) {
    let rows = PixelRowsMut::new(dst, h, h, w);
    pool.dispatch_threshold(w, w * h > POOL_THRESHOLD, |x, _| {
        rows.with_row(x, |row| {
            for (y, px) in row.as_mut_slice().iter_mut().enumerate() {
                *px = src[y * w + x];
            }
        });
    });
}

fn blur_rows(
    pool: &DispatchPool,
    src: &[u32],
    dst: &mut [u32],
    w: usize,
    h: usize,
    plan: &BlurPlan,
) -> RasterFxResult<()> {
    let rows = PixelRowsMut::new(dst, w, w, h);
    let threaded = w * h > POOL_THRESHOLD;
    match plan {
        BlurPlan::Fir(kernel) => {
            pool.dispatch_threshold(h, threaded, |y, _| {
                let line = &src[y * w..(y + 1) * w];
                rows.with_row(y, |row| fir_line(line, row.as_mut_slice(), kernel));
            });
        }
        BlurPlan::Box(d) => {
            // Two ping-pong lines per thread, indexed by local id.
            let mut scratch = Vec::with_capacity(pool.size());
            for _ in 0..pool.size() {
                scratch.push(Mutex::new((alloc_buffer(w)?, alloc_buffer(w)?)));
            }
            let d = *d;
            pool.dispatch_threshold(h, threaded, |y, local_id| {
                let line = &src[y * w..(y + 1) * w];
                let mut guard = scratch[local_id]
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                let (a, b) = &mut *guard;
                rows.with_row(y, |row| triple_box_line(line, a, b, row.as_mut_slice(), d));
            });
        }
    }
    Ok(())
}

fn fir_line(src: &[u32], dst: &mut [u32], kernel: &[u32]) {
    let radius = kernel.len() / 2;
    let n = src.len();
    for (x, out) in dst.iter_mut().enumerate() {
        let first = x.saturating_sub(radius);
        let last = (x + radius).min(n - 1);
        let mut acc = [0u32; 4];
        for (sx, &px) in src.iter().enumerate().take(last + 1).skip(first) {
            let kw = kernel[sx + radius - x];
            for (a, c) in acc.iter_mut().zip(unpack_argb(px)) {
                *a += kw * u32::from(c);
            }
        }
        *out = pack_argb(acc.map(q16_to_u8));
    }
}

// Three box passes. An even size cannot be centered, so the first two boxes lean left then right
// and the third is widened by one pixel.
fn triple_box_line(src: &[u32], a: &mut [u32], b: &mut [u32], dst: &mut [u32], d: usize) {
    let half = d / 2;
    if d % 2 == 1 {
        box_line(src, a, half, half);
        box_line(a, b, half, half);
        box_line(b, dst, half, half);
    } else {
        box_line(src, a, half, half - 1);
        box_line(a, b, half - 1, half);
        box_line(b, dst, half, half);
    }
}

// Moving average over `[x - left, x + right]`.
fn box_line(src: &[u32], dst: &mut [u32], left: usize, right: usize) {
    let d = (left + right + 1) as u32;
    let mut sum = [0u32; 4];
    let add = |sum: &mut [u32; 4], px: u32| {
        for (s, c) in sum.iter_mut().zip(unpack_argb(px)) {
            *s += u32::from(c);
        }
    };

    for &px in src.iter().take(right + 1) {
        add(&mut sum, px);
    }
    for (x, out) in dst.iter_mut().enumerate() {
        *out = pack_argb(sum.map(|s| ((s + d / 2) / d).min(255) as u8));
        if let Some(&px) = src.get(x + right + 1) {
            add(&mut sum, px);
        }
        if x >= left {
            for (s, c) in sum.iter_mut().zip(unpack_argb(src[x - left])) {
                *s -= u32::from(c);
            }
        }
    }
}

fn gaussian_kernel_q16(radius: u32, sigma: f64) -> RasterFxResult<Kernel> {
    if radius == 0 {
        return Ok(smallvec::smallvec![1 << 16]);
    }

    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights_f: SmallVec<[f64; 16]> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(RasterFxError::validation("gaussian kernel sum is zero"));
    }

    let mut acc: i64 = 0;
    let mut weights: Kernel = weights_f
        .iter()
        .map(|&wf| {
            let q = ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as i64;
            acc += q;
            q as u32
        })
        .collect();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn q16_to_u8(acc: u32) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
