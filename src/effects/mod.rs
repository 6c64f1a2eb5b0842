//! Pixel effects shared by the filter primitives.

pub mod blur;
pub mod composite;

pub use blur::{BOX_BLUR_MIN_DEVIATION, box_size, gaussian_blur, gaussian_blur_xy};
pub use composite::{in_alpha, over, premultiplied};
