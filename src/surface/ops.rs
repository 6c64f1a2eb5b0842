//! Generic per-pixel algorithms over [`PixelSurface`]s.
//!
//! The functors see packed premultiplied `0xAARRGGBB` values whatever the physical layout of the
//! surfaces involved. Work is split one row per dispatch job and goes through the global dispatch
//! pool once the pixel count exceeds [`POOL_THRESHOLD`].

use crate::dispatch::get_global_dispatch_pool;
use crate::foundation::core::IntRect;
use crate::foundation::error::{RasterFxError, RasterFxResult};

use super::accessor::{PixelAccessor, PixelElement, PixelRowsMut, Reader, reader};
use super::surface::{PixelData, PixelSurface};

/// Single-threaded operation if the number of pixels is at or below this threshold.
pub const POOL_THRESHOLD: usize = 2048;

fn ensure_same_size(a: &PixelSurface, b: &PixelSurface, what: &str) -> RasterFxResult<()> {
    if a.width() != b.width() || a.height() != b.height() {
        return Err(RasterFxError::validation(format!(
            "{what} expects surfaces of equal size, got {}x{} and {}x{}",
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    Ok(())
}

/// `out[x, y] = blend(in1[x, y], in2[x, y])` for every pixel.
///
/// All three surfaces must have the same size; mixed A8/ARGB32 inputs are handled transparently.
pub fn blend<F>(
    in1: &PixelSurface,
    in2: &PixelSurface,
    out: &mut PixelSurface,
    blend: F,
) -> RasterFxResult<()>
where
    F: Fn(u32, u32) -> u32 + Sync,
{
    in1.check_status()?;
    in2.check_status()?;
    out.check_status()?;
    ensure_same_size(in1, in2, "blend")?;
    ensure_same_size(in1, out, "blend")?;

    in1.flush();
    in2.flush();

    let (w, h) = (in1.width() as usize, in1.height() as usize);
    match (reader(in1), reader(in2)) {
        (Reader::Argb32(a), Reader::Argb32(b)) => blend_into(out, a, b, w, h, &blend),
        (Reader::Argb32(a), Reader::A8(b)) => blend_into(out, a, b, w, h, &blend),
        (Reader::A8(a), Reader::Argb32(b)) => blend_into(out, a, b, w, h, &blend),
        (Reader::A8(a), Reader::A8(b)) => blend_into(out, a, b, w, h, &blend),
    }

    out.mark_dirty();
    Ok(())
}

fn blend_into<A, B, F>(
    out: &mut PixelSurface,
    a: PixelAccessor<'_, A>,
    b: PixelAccessor<'_, B>,
    w: usize,
    h: usize,
    blend: &F,
) where
    A: PixelElement,
    B: PixelElement,
    F: Fn(u32, u32) -> u32 + Sync,
{
    let stride = out.element_stride();
    match out.data_mut() {
        PixelData::A8(o) => blend_internal(PixelRowsMut::new(o, stride, w, h), a, b, w, h, blend),
        PixelData::Argb32(o) => {
            blend_internal(PixelRowsMut::new(o, stride, w, h), a, b, w, h, blend)
        }
    }
}

fn blend_internal<O, A, B, F>(
    out: PixelRowsMut<'_, O>,
    a: PixelAccessor<'_, A>,
    b: PixelAccessor<'_, B>,
    w: usize,
    h: usize,
    blend: &F,
) where
    O: PixelElement,
    A: PixelElement,
    B: PixelElement,
    F: Fn(u32, u32) -> u32 + Sync,
{
    let pool = get_global_dispatch_pool();
    pool.dispatch_threshold(h, w * h > POOL_THRESHOLD, |y, _| {
        out.with_row(y, |row| {
            for x in 0..w {
                row.set(x, blend(a.get(x, y), b.get(x, y)));
            }
        });
    });
}

/// `out[x, y] = filter(input[x, y])` for every pixel.
///
/// Input and output may differ in format (e.g. luminance-to-alpha writes A8 from ARGB32).
pub fn filter<F>(input: &PixelSurface, out: &mut PixelSurface, filter: F) -> RasterFxResult<()>
where
    F: Fn(u32) -> u32 + Sync,
{
    input.check_status()?;
    out.check_status()?;
    ensure_same_size(input, out, "filter")?;

    input.flush();

    let (w, h) = (input.width() as usize, input.height() as usize);
    match reader(input) {
        Reader::Argb32(src) => filter_into(out, src, w, h, &filter),
        Reader::A8(src) => filter_into(out, src, w, h, &filter),
    }

    out.mark_dirty();
    Ok(())
}

fn filter_into<I, F>(out: &mut PixelSurface, src: PixelAccessor<'_, I>, w: usize, h: usize, filter: &F)
where
    I: PixelElement,
    F: Fn(u32) -> u32 + Sync,
{
    let stride = out.element_stride();
    match out.data_mut() {
        PixelData::A8(o) => filter_internal(PixelRowsMut::new(o, stride, w, h), src, w, h, filter),
        PixelData::Argb32(o) => {
            filter_internal(PixelRowsMut::new(o, stride, w, h), src, w, h, filter)
        }
    }
}

fn filter_internal<O, I, F>(
    out: PixelRowsMut<'_, O>,
    src: PixelAccessor<'_, I>,
    w: usize,
    h: usize,
    filter: &F,
) where
    O: PixelElement,
    I: PixelElement,
    F: Fn(u32) -> u32 + Sync,
{
    let pool = get_global_dispatch_pool();
    pool.dispatch_threshold(h, w * h > POOL_THRESHOLD, |y, _| {
        out.with_row(y, |row| {
            for x in 0..w {
                row.set(x, filter(src.get(x, y)));
            }
        });
    });
}

/// `out[x, y] = synth(x, y)` for every pixel of `area`, clipped to the surface.
///
/// Pixels outside `area` are left untouched.
pub fn synthesize_area<F>(out: &mut PixelSurface, area: IntRect, synth: F) -> RasterFxResult<()>
where
    F: Fn(u32, u32) -> u32 + Sync,
{
    out.check_status()?;

    let clip = IntRect {
        x0: area.x0.max(0),
        y0: area.y0.max(0),
        x1: area.x1.min(out.width() as i32),
        y1: area.y1.min(out.height() as i32),
    };
    if clip.is_empty() {
        return Ok(());
    }

    let (w, h) = (out.width() as usize, out.height() as usize);
    let stride = out.element_stride();
    match out.data_mut() {
        PixelData::A8(o) => synthesize_internal(PixelRowsMut::new(o, stride, w, h), clip, &synth),
        PixelData::Argb32(o) => {
            synthesize_internal(PixelRowsMut::new(o, stride, w, h), clip, &synth)
        }
    }

    out.mark_dirty();
    Ok(())
}

/// [`synthesize_area`] over the whole surface.
pub fn synthesize<F>(out: &mut PixelSurface, synth: F) -> RasterFxResult<()>
where
    F: Fn(u32, u32) -> u32 + Sync,
{
    let area = IntRect::from_xywh(0, 0, out.width() as i32, out.height() as i32);
    synthesize_area(out, area, synth)
}

fn synthesize_internal<O, F>(out: PixelRowsMut<'_, O>, area: IntRect, synth: &F)
where
    O: PixelElement,
    F: Fn(u32, u32) -> u32 + Sync,
{
    let (x0, x1) = (area.x0 as usize, area.x1 as usize);
    let y0 = area.y0 as usize;
    let pool = get_global_dispatch_pool();
    pool.dispatch_threshold(area.height() as usize, area.area() > POOL_THRESHOLD, |dy, _| {
        let y = y0 + dy;
        out.with_row(y, |row| {
            for x in x0..x1 {
                row.set(x, synth(x as u32, y as u32));
            }
        });
    });
}

#[cfg(test)]
#[path = "../../tests/unit/surface/ops.rs"]
mod tests;
