use std::sync::atomic::{AtomicBool, Ordering};

use crate::foundation::error::{RasterFxError, RasterFxResult};
use crate::foundation::math::{mul_div255_u8, pack_argb, unpack_argb};

/// Physical pixel layout of a [`PixelSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PixelFormat {
    /// One byte per pixel, alpha only.
    A8,
    /// One `u32` per pixel, premultiplied `0xAARRGGBB`.
    Argb32,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::A8 => 1,
            Self::Argb32 => 4,
        }
    }

    /// Tightest row stride in bytes; A8 rows are padded to a multiple of 4.
    pub fn stride_for_width(self, width: u32) -> Option<usize> {
        let bytes = (width as usize).checked_mul(self.bytes_per_pixel())?;
        bytes.checked_next_multiple_of(4)
    }
}

/// Raster status carried by a surface. Anything other than `Success` marks a surface that must
/// not be read or written.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SurfaceStatus {
    /// Usable surface.
    #[error("success")]
    Success,
    /// The pixel buffer could not be allocated.
    #[error("out of memory")]
    NoMemory,
    /// Width or height is zero or too large to address.
    #[error("invalid size")]
    InvalidSize,
    /// Stride is smaller than a row or not a multiple of the pixel size.
    #[error("invalid stride")]
    InvalidStride,
}

/// Color space the pixel values are expressed in. Only tagged; never converted here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ColorInterpolation {
    /// sRGB-encoded channels.
    Srgb,
    /// Linear-light channels (SVG filter default).
    #[default]
    LinearRgb,
}

#[derive(Clone, Debug)]
pub(crate) enum PixelData {
    A8(Vec<u8>),
    Argb32(Vec<u32>),
}

/// A width x height pixel buffer with a row stride.
///
/// The buffer is owned exclusively; intermediate stages of a filter each hold their own surface.
#[derive(Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
    status: SurfaceStatus,
    color_interpolation: ColorInterpolation,
    data: PixelData,
    dirty: AtomicBool,
    generation: u64,
}

impl PixelSurface {
    /// Allocate a zeroed (fully transparent) surface with the tightest stride.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> RasterFxResult<Self> {
        let stride = format
            .stride_for_width(width)
            .ok_or(RasterFxError::Surface(SurfaceStatus::InvalidSize))?;
        Self::with_stride(width, height, format, stride)
    }

    /// Allocate a zeroed surface with an explicit row stride in bytes.
    pub fn with_stride(
        width: u32,
        height: u32,
        format: PixelFormat,
        stride: usize,
    ) -> RasterFxResult<Self> {
        if width == 0 || height == 0 || width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(SurfaceStatus::InvalidSize.into());
        }
        let bpp = format.bytes_per_pixel();
        let row_bytes = (width as usize)
            .checked_mul(bpp)
            .ok_or(SurfaceStatus::InvalidSize)?;
        if stride < row_bytes || !stride.is_multiple_of(bpp) {
            return Err(SurfaceStatus::InvalidStride.into());
        }
        let len = (stride / bpp)
            .checked_mul(height as usize)
            .ok_or(SurfaceStatus::InvalidSize)?;

        let data = match format {
            PixelFormat::A8 => PixelData::A8(alloc_zeroed(len)?),
            PixelFormat::Argb32 => PixelData::Argb32(alloc_zeroed(len)?),
        };

        Ok(Self {
            width,
            height,
            stride,
            format,
            status: SurfaceStatus::Success,
            color_interpolation: ColorInterpolation::default(),
            data,
            dirty: AtomicBool::new(false),
            generation: 0,
        })
    }

    /// A placeholder surface carrying a failure status, as handed over by an upstream stage
    /// that could not produce its output.
    pub fn in_error(status: SurfaceStatus) -> Self {
        Self {
            width: 0,
            height: 0,
            stride: 0,
            format: PixelFormat::Argb32,
            status,
            color_interpolation: ColorInterpolation::default(),
            data: PixelData::Argb32(Vec::new()),
            dirty: AtomicBool::new(false),
            generation: 0,
        }
    }

    /// A new zeroed surface with the same size, format and color interpolation tag.
    pub fn create_identical(&self) -> RasterFxResult<Self> {
        self.check_status()?;
        let mut out = Self::new(self.width, self.height, self.format)?;
        out.color_interpolation = self.color_interpolation;
        Ok(out)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel layout.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raster status.
    pub fn status(&self) -> SurfaceStatus {
        self.status
    }

    /// `Ok` when the surface is usable, otherwise its status as an error.
    pub fn check_status(&self) -> RasterFxResult<()> {
        match self.status {
            SurfaceStatus::Success => Ok(()),
            status => Err(status.into()),
        }
    }

    /// Color interpolation tag.
    pub fn color_interpolation(&self) -> ColorInterpolation {
        self.color_interpolation
    }

    /// Retag the surface. Pixel values are left as they are.
    pub fn set_color_interpolation(&mut self, ci: ColorInterpolation) {
        self.color_interpolation = ci;
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Stride in elements of the underlying storage.
    pub(crate) fn element_stride(&self) -> usize {
        self.stride / self.format.bytes_per_pixel()
    }

    pub(crate) fn data(&self) -> &PixelData {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut PixelData {
        &mut self.data
    }

    /// Complete pending writes before the pixels are read directly.
    pub fn flush(&self) {
        self.dirty.store(false, Ordering::Release);
    }

    /// Record that the pixels were modified directly.
    pub fn mark_dirty(&mut self) {
        self.dirty.store(true, Ordering::Release);
        self.generation = self.generation.wrapping_add(1);
    }

    /// `true` between [`PixelSurface::mark_dirty`] and the next [`PixelSurface::flush`].
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Counter bumped by every [`PixelSurface::mark_dirty`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        match &mut self.data {
            PixelData::A8(v) => v.fill(0),
            PixelData::Argb32(v) => v.fill(0),
        }
        self.mark_dirty();
    }

    /// Packed `0xAARRGGBB` value at `(x, y)`; A8 surfaces report `alpha << 24`.
    ///
    /// Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize) * self.element_stride() + x as usize;
        match &self.data {
            PixelData::A8(v) => u32::from(v[idx]) << 24,
            PixelData::Argb32(v) => v[idx],
        }
    }

    /// Store a packed pixel; A8 surfaces keep `value >> 24`.
    ///
    /// Panics when out of bounds. Callers writing many pixels should prefer the surface
    /// algorithms and call [`PixelSurface::mark_dirty`] once afterwards.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize) * self.element_stride() + x as usize;
        match &mut self.data {
            PixelData::A8(v) => v[idx] = (value >> 24) as u8,
            PixelData::Argb32(v) => v[idx] = value,
        }
    }

    /// Stable hash of the visible pixels (stride padding excluded).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = xxhash_rust::xxh3::Xxh3::new();
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        hasher.update(&[self.format.bytes_per_pixel() as u8]);
        if self.status != SurfaceStatus::Success {
            hasher.update(self.status.to_string().as_bytes());
            return hasher.digest();
        }

        let w = self.width as usize;
        let stride = self.element_stride();
        match &self.data {
            PixelData::A8(v) => {
                for row in v.chunks(stride).take(self.height as usize) {
                    hasher.update(&row[..w]);
                }
            }
            PixelData::Argb32(v) => {
                let mut bytes = Vec::with_capacity(w * 4);
                for row in v.chunks(stride).take(self.height as usize) {
                    bytes.clear();
                    for px in &row[..w] {
                        bytes.extend_from_slice(&px.to_le_bytes());
                    }
                    hasher.update(&bytes);
                }
            }
        }
        hasher.digest()
    }

    /// Import straight-alpha RGBA8 pixels as a premultiplied ARGB32 surface.
    pub fn from_rgba_image(img: &image::RgbaImage) -> RasterFxResult<Self> {
        let mut out = Self::new(img.width(), img.height(), PixelFormat::Argb32)?;
        for (x, y, px) in img.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            let a16 = u16::from(a);
            out.set_pixel(
                x,
                y,
                pack_argb([
                    a,
                    mul_div255_u8(u16::from(r), a16),
                    mul_div255_u8(u16::from(g), a16),
                    mul_div255_u8(u16::from(b), a16),
                ]),
            );
        }
        out.mark_dirty();
        Ok(out)
    }

    /// Export as straight-alpha RGBA8. A8 surfaces export as black with their alpha.
    pub fn to_rgba_image(&self) -> RasterFxResult<image::RgbaImage> {
        self.check_status()?;
        self.flush();
        let mut img = image::RgbaImage::new(self.width, self.height);
        for (x, y, px) in img.enumerate_pixels_mut() {
            let [a, r, g, b] = unpack_argb(self.pixel(x, y));
            px.0 = [unpremul(r, a), unpremul(g, a), unpremul(b, a), a];
        }
        Ok(img)
    }
}

impl Clone for PixelSurface {
    fn clone(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            stride: self.stride,
            format: self.format,
            status: self.status,
            color_interpolation: self.color_interpolation,
            data: self.data.clone(),
            dirty: AtomicBool::new(self.is_dirty()),
            generation: self.generation,
        }
    }
}

fn alloc_zeroed<T: Copy + Default>(len: usize) -> RasterFxResult<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| RasterFxError::Surface(SurfaceStatus::NoMemory))?;
    v.resize(len, T::default());
    Ok(v)
}

fn unpremul(c: u8, a: u8) -> u8 {
    if a == 0 {
        return 0;
    }
    let v = (u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a);
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/surface/surface.rs"]
mod tests;
