//! Interpolation primitives.
//!
//! - `functions`: component-wise lerp, quaternion SLERP/NLERP, cubic Bezier points
//! - `easing`: named easing curves applied to segment fractions

pub mod easing;
pub mod functions;

pub use easing::{Curve, Easing, EasingParams};
