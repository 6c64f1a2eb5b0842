//! Pixel surfaces and the generic algorithms that run over them.

pub mod accessor;
pub mod ops;
pub mod sampler;
#[allow(clippy::module_inception)]
pub mod surface;

pub use accessor::{PixelAccessor, PixelElement, PixelRowsMut, RowMut};
pub use ops::{POOL_THRESHOLD, blend, filter, synthesize, synthesize_area};
pub use sampler::{SurfaceNormal, SurfaceSampler};
pub use surface::{ColorInterpolation, PixelFormat, PixelSurface, SurfaceStatus};
