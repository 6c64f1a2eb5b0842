//! Shared geometry, error, and fixed-point helpers.

pub mod core;
pub mod error;
pub mod math;
