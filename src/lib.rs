//! rasterfx is a parallel pixel-processing engine for raster filter effects.
//!
//! It runs per-pixel work for filter primitives (blur, flood, drop shadow) over premultiplied
//! ARGB32 and alpha-only A8 surfaces, spreading rows across a fixed-size dispatch pool.
//!
//! # Layers
//!
//! 1. **Dispatch**: [`DispatchPool`] runs one counter-indexed batch at a time with the calling
//!    thread participating; [`get_global_dispatch_pool`] shares one per process.
//! 2. **Surfaces**: [`PixelSurface`] plus the generic [`blend`], [`filter`] and [`synthesize`]
//!    kernels, monomorphized per pixel format, and the [`SurfaceSampler`].
//! 3. **Effects**: packed-pixel compositing ([`over`], [`in_alpha`]) and [`gaussian_blur`].
//! 4. **Filters**: [`FilterPrimitive`] stages exchanging surfaces through a [`FilterSlot`], with
//!    [`FilterDropShadow`] as the main consumer.
//!
//! Rendering failures inside a primitive are logged with `tracing` and leave the output slot
//! untouched; everything else reports [`RasterFxError`].
//!
//! `unsafe` is denied crate-wide. The single exception is the lifetime erasure in
//! [`DispatchPool::dispatch`], which lends a borrowed function to the pool's long-lived workers.
#![deny(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod dispatch;
mod effects;
mod filters;
mod foundation;
mod surface;

pub use config::{DISPATCH_THREADS_ENV, DropShadowParams, EngineConfig};
pub use dispatch::{
    DEFAULT_DISPATCH_THREADS, DispatchPool, GlobalId, LocalId, get_global_dispatch_pool,
    num_dispatch_threads, set_num_dispatch_threads,
};
pub use effects::{
    BOX_BLUR_MIN_DEVIATION, box_size, gaussian_blur, gaussian_blur_xy, in_alpha, over,
    premultiplied,
};
pub use filters::drop_shadow::NO_BLUR_DEVIATION;
pub use filters::{
    FilterDropShadow, FilterFlood, FilterGaussianBlur, FilterPrimitive, FilterSlot, FilterUnits,
    PrimitiveIo, SlotKey, chain_area_enlarge, render_chain,
};
pub use foundation::core::{
    Affine, IntRect, Point, Rect, Rgba32, Vec2, expansion_x, expansion_y, transform_vector,
};
pub use foundation::error::{RasterFxError, RasterFxResult};
pub use foundation::math::{alpha_of, pack_argb, unpack_argb};
pub use surface::{
    ColorInterpolation, POOL_THRESHOLD, PixelAccessor, PixelElement, PixelFormat, PixelRowsMut,
    PixelSurface, RowMut, SurfaceNormal, SurfaceSampler, SurfaceStatus, blend, filter,
    synthesize, synthesize_area,
};
