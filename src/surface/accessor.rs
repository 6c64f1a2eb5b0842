//! Format-parameterized views over raw pixel storage.
//!
//! Every accessor speaks packed `0xAARRGGBB`; 8-bit storage maps to and from the alpha byte.
//! Kernels are generic over [`PixelElement`] and monomorphized per format, so the format is
//! decided once per call rather than once per pixel.

use std::sync::{Mutex, PoisonError};

use super::surface::{PixelData, PixelFormat, PixelSurface};

/// Storage element of a pixel buffer.
pub trait PixelElement: Copy + Default + Send + Sync + 'static {
    /// Format this element type stores.
    const FORMAT: PixelFormat;

    /// Widen to a packed pixel.
    fn to_argb(self) -> u32;

    /// Narrow a packed pixel into storage.
    fn from_argb(value: u32) -> Self;
}

impl PixelElement for u8 {
    const FORMAT: PixelFormat = PixelFormat::A8;

    #[inline]
    fn to_argb(self) -> u32 {
        u32::from(self) << 24
    }

    #[inline]
    fn from_argb(value: u32) -> Self {
        (value >> 24) as u8
    }
}

impl PixelElement for u32 {
    const FORMAT: PixelFormat = PixelFormat::Argb32;

    #[inline]
    fn to_argb(self) -> u32 {
        self
    }

    #[inline]
    fn from_argb(value: u32) -> Self {
        value
    }
}

/// Read-only accessor: base slice plus stride in elements.
#[derive(Clone, Copy, Debug)]
pub struct PixelAccessor<'a, T> {
    stride: usize,
    data: &'a [T],
}

impl<'a, T: PixelElement> PixelAccessor<'a, T> {
    /// `stride` is in elements, not bytes.
    pub fn new(data: &'a [T], stride: usize) -> Self {
        Self { stride, data }
    }

    /// Packed pixel at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.data[y * self.stride + x].to_argb()
    }
}

/// Read access to a surface with the format resolved once.
#[derive(Clone, Copy)]
pub(crate) enum Reader<'a> {
    A8(PixelAccessor<'a, u8>),
    Argb32(PixelAccessor<'a, u32>),
}

impl Reader<'_> {
    #[inline]
    pub(crate) fn get(&self, x: usize, y: usize) -> u32 {
        match self {
            Self::A8(a) => a.get(x, y),
            Self::Argb32(a) => a.get(x, y),
        }
    }
}

pub(crate) fn reader(surface: &PixelSurface) -> Reader<'_> {
    let stride = surface.element_stride();
    match surface.data() {
        PixelData::A8(v) => Reader::A8(PixelAccessor::new(v, stride)),
        PixelData::Argb32(v) => Reader::Argb32(PixelAccessor::new(v, stride)),
    }
}

/// Row-partitioned writer for parallel kernels.
///
/// Each row sits behind its own lock. A dispatch job owns exactly one row, so the locks are never
/// contended; they only let disjoint rows be written through a shared reference.
pub struct PixelRowsMut<'a, T> {
    rows: Vec<Mutex<&'a mut [T]>>,
}

impl<'a, T: PixelElement> PixelRowsMut<'a, T> {
    /// Split `data` into `height` rows of `width` visible elements each.
    pub fn new(data: &'a mut [T], stride: usize, width: usize, height: usize) -> Self {
        let rows = data
            .chunks_mut(stride.max(1))
            .take(height)
            .map(|row| Mutex::new(&mut row[..width]))
            .collect();
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// `true` when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Run `f` with exclusive access to row `y`.
    pub fn with_row<R>(&self, y: usize, f: impl FnOnce(&mut RowMut<'_, T>) -> R) -> R {
        let mut guard = self.rows[y].lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut RowMut { row: &mut guard[..] })
    }
}

/// One writable row handed out by [`PixelRowsMut::with_row`].
pub struct RowMut<'r, T> {
    row: &'r mut [T],
}

impl<T: PixelElement> RowMut<'_, T> {
    /// Packed pixel at column `x`.
    #[inline]
    pub fn get(&self, x: usize) -> u32 {
        self.row[x].to_argb()
    }

    /// Store a packed pixel at column `x`.
    #[inline]
    pub fn set(&mut self, x: usize, value: u32) {
        self.row[x] = T::from_argb(value);
    }

    /// Raw storage of the row.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut *self.row
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/accessor.rs"]
mod tests;
