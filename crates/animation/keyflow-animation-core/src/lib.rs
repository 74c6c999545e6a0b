//! Keyflow Animation Core (engine-agnostic)
//!
//! Pure evaluation of animated properties for declarative scene graphs:
//! keyframe tracks with named easings, Bezier and Catmull-Rom paths, motion
//! along a path, time-range gates and fractal noise. Everything is built once,
//! validated up front, and then queried by time without side effects.
//!
//! ```
//! use keyflow_animation_core::{Keyframe, Track, Value};
//!
//! let track = Track::new(vec![
//!     Keyframe::new(0.0, 0.0),
//!     Keyframe::eased(1.0, 10.0, "exp_in_out".parse().unwrap()),
//! ])
//! .unwrap();
//! assert_eq!(track.evaluate(1.0).unwrap(), Value::Scalar(10.0));
//! ```

pub mod animated_path;
pub mod baking;
pub mod config;
pub mod document;
pub mod error;
pub mod interp;
pub mod noise;
pub mod path;
pub mod sampling;
pub mod time_range;
pub mod track;
pub mod value;

// Re-exports for consumers (adapters)
pub use animated_path::{AnimatedPath, Parametrization};
pub use baking::{
    bake_animated_path, bake_track, export_baked_json, BakedPath, BakedTrack, BakingConfig,
};
pub use config::Config;
pub use document::{
    parse_animation_json, parse_animation_json_with_config, AnimationDocument, AnimationSet,
};
pub use error::AnimError;
pub use interp::{Curve, Easing, EasingParams};
pub use noise::{Noise, NoiseFunction};
pub use path::{Path, PathMode, PathSpec};
pub use sampling::evaluate;
pub use time_range::{TimeRange, TimeRangeGate, TimeRangeMode};
pub use track::{Keyframe, Track};
pub use value::{Value, ValueKind, Vec3};

pub type Result<T> = std::result::Result<T, AnimError>;
