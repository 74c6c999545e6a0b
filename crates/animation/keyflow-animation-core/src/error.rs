//! Error types for track, path and gate construction and evaluation.

use serde::{Deserialize, Serialize};

use crate::value::ValueKind;

/// Every failure the evaluator can report. None of them are fatal; callers
/// (typically the scene engine) decide how to surface them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimError {
    /// Empty keyframe sequence or unordered/non-finite keyframe times
    #[error("Invalid track: {reason}")]
    InvalidTrack { reason: String },

    /// Easing name that does not resolve to a known curve
    #[error("Unknown easing: {name}")]
    UnknownEasing { name: String },

    /// Two adjacent keyframes share the same time (only when rejected by config)
    #[error("Degenerate segment ending at keyframe {index} (time {time})")]
    DegenerateSegment { index: usize, time: f32 },

    /// Point/control counts or parameters inconsistent with the path mode
    #[error("Invalid path spec: {reason}")]
    InvalidPathSpec { reason: String },

    /// Path parameter outside [0, 1]
    #[error("Path parameter {value} is out of range [0, 1]")]
    OutOfRange { value: f32 },

    /// Query time is NaN
    #[error("Invalid time value: {time}")]
    InvalidTime { time: f32 },

    /// Keyframes of a single track carry different value kinds
    #[error("Value kind mismatch at keyframe {index}: expected {expected:?}, got {actual:?}")]
    ValueKindMismatch {
        index: usize,
        expected: ValueKind,
        actual: ValueKind,
    },

    #[error("Invalid easing parameters: {reason}")]
    InvalidEasingParams { reason: String },

    #[error("Invalid time ranges: {reason}")]
    InvalidTimeRanges { reason: String },

    #[error("Invalid noise: {reason}")]
    InvalidNoise { reason: String },

    /// Baking window that would produce an unbounded number of frames
    #[error("Invalid baking window: {reason}")]
    InvalidBaking { reason: String },

    /// A document entry references a track or path that is not defined
    #[error("Unknown {kind} reference: {name}")]
    UnknownReference { kind: String, name: String },

    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl AnimError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidTrack { .. }
            | Self::DegenerateSegment { .. }
            | Self::ValueKindMismatch { .. } => "track",
            Self::UnknownEasing { .. } | Self::InvalidEasingParams { .. } => "easing",
            Self::InvalidPathSpec { .. } | Self::OutOfRange { .. } => "path",
            Self::InvalidTime { .. } | Self::InvalidTimeRanges { .. } => "time",
            Self::InvalidNoise { .. } => "noise",
            Self::InvalidBaking { .. } => "baking",
            Self::UnknownReference { .. } | Self::Serialization { .. } => "document",
        }
    }

    pub(crate) fn invalid_track(reason: impl Into<String>) -> Self {
        Self::InvalidTrack {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_path(reason: impl Into<String>) -> Self {
        Self::InvalidPathSpec {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for AnimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
