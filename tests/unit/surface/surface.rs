use super::*;

#[test]
fn new_surface_is_transparent_with_aligned_stride() {
    let s = PixelSurface::new(3, 2, PixelFormat::A8).unwrap();
    assert_eq!(s.stride(), 4);
    assert_eq!(s.status(), SurfaceStatus::Success);
    assert_eq!(s.pixel(2, 1), 0);

    let s = PixelSurface::new(3, 2, PixelFormat::Argb32).unwrap();
    assert_eq!(s.stride(), 12);
    assert_eq!(s.pixel_count(), 6);
}

#[test]
fn invalid_dimensions_are_rejected() {
    assert!(matches!(
        PixelSurface::new(0, 4, PixelFormat::Argb32),
        Err(RasterFxError::Surface(SurfaceStatus::InvalidSize))
    ));
    assert!(matches!(
        PixelSurface::with_stride(4, 4, PixelFormat::Argb32, 8),
        Err(RasterFxError::Surface(SurfaceStatus::InvalidStride))
    ));
    assert!(matches!(
        PixelSurface::with_stride(4, 4, PixelFormat::Argb32, 18),
        Err(RasterFxError::Surface(SurfaceStatus::InvalidStride))
    ));
}

#[test]
fn a8_surfaces_store_the_high_byte() {
    let mut s = PixelSurface::new(2, 2, PixelFormat::A8).unwrap();
    s.set_pixel(1, 1, 0x7f12_3456);
    assert_eq!(s.pixel(1, 1), 0x7f00_0000);
}

#[test]
fn padded_stride_keeps_rows_apart() {
    let mut s = PixelSurface::with_stride(2, 3, PixelFormat::Argb32, 16).unwrap();
    s.set_pixel(1, 0, 1);
    s.set_pixel(0, 1, 2);
    s.set_pixel(1, 2, 3);
    assert_eq!(s.pixel(1, 0), 1);
    assert_eq!(s.pixel(0, 1), 2);
    assert_eq!(s.pixel(1, 2), 3);
    assert_eq!(s.pixel(0, 2), 0);
}

#[test]
fn create_identical_copies_shape_not_pixels() {
    let mut s = PixelSurface::new(5, 4, PixelFormat::Argb32).unwrap();
    s.set_color_interpolation(ColorInterpolation::Srgb);
    s.set_pixel(0, 0, 0xffff_ffff);
    let t = s.create_identical().unwrap();
    assert_eq!((t.width(), t.height(), t.format()), (5, 4, PixelFormat::Argb32));
    assert_eq!(t.color_interpolation(), ColorInterpolation::Srgb);
    assert_eq!(t.pixel(0, 0), 0);
}

#[test]
fn error_surfaces_refuse_derivation() {
    let s = PixelSurface::in_error(SurfaceStatus::NoMemory);
    assert_eq!(s.status(), SurfaceStatus::NoMemory);
    assert!(s.check_status().is_err());
    assert!(s.create_identical().is_err());
    assert!(s.to_rgba_image().is_err());
}

#[test]
fn error_surfaces_fingerprint_by_status() {
    let no_memory = PixelSurface::in_error(SurfaceStatus::NoMemory).fingerprint();
    assert_eq!(no_memory, PixelSurface::in_error(SurfaceStatus::NoMemory).fingerprint());
    assert_ne!(no_memory, PixelSurface::in_error(SurfaceStatus::InvalidSize).fingerprint());
}

#[test]
fn dirty_flag_and_generation() {
    let mut s = PixelSurface::new(1, 1, PixelFormat::Argb32).unwrap();
    assert!(!s.is_dirty());
    s.mark_dirty();
    assert!(s.is_dirty());
    assert_eq!(s.generation(), 1);
    s.flush();
    assert!(!s.is_dirty());
    s.clear();
    assert_eq!(s.generation(), 2);
}

#[test]
fn fingerprint_ignores_stride_padding() {
    let mut a = PixelSurface::new(2, 2, PixelFormat::Argb32).unwrap();
    let mut b = PixelSurface::with_stride(2, 2, PixelFormat::Argb32, 32).unwrap();
    for (x, y, v) in [(0, 0, 1u32), (1, 1, 0xff00_00ff)] {
        a.set_pixel(x, y, v);
        b.set_pixel(x, y, v);
    }
    assert_eq!(a.fingerprint(), b.fingerprint());
    b.set_pixel(0, 1, 7);
    assert_ne!(a.fingerprint(), b.fingerprint());
}

#[test]
fn rgba_image_interop_premultiplies() {
    let mut img = image::RgbaImage::new(2, 1);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, image::Rgba([255, 255, 255, 128]));

    let s = PixelSurface::from_rgba_image(&img).unwrap();
    assert_eq!(s.pixel(0, 0), 0xffff_0000);
    assert_eq!(s.pixel(1, 0), 0x8080_8080);

    let back = s.to_rgba_image().unwrap();
    assert_eq!(back.get_pixel(0, 0).0, [255, 0, 0, 255]);
    assert_eq!(back.get_pixel(1, 0).0, [255, 255, 255, 128]);
}
