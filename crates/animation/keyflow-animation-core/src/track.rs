//! Keyframes and validated keyframe tracks.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AnimError;
use crate::interp::{Easing, EasingParams};
use crate::sampling;
use crate::value::{Value, ValueKind};

fn is_linear(easing: &Easing) -> bool {
    *easing == Easing::Linear
}

/// A timed value. The easing shapes the segment that ends at this keyframe;
/// the first keyframe's easing is never used.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    /// Time in seconds.
    pub time: f32,
    pub value: Value,
    #[serde(default, skip_serializing_if = "is_linear")]
    pub easing: Easing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easing_params: Option<EasingParams>,
}

impl Keyframe {
    pub fn new(time: f32, value: impl Into<Value>) -> Self {
        Self {
            time,
            value: value.into(),
            easing: Easing::Linear,
            easing_params: None,
        }
    }

    /// Keyframe reached through `easing`.
    pub fn eased(time: f32, value: impl Into<Value>, easing: Easing) -> Self {
        Self::new(time, value).with_easing(easing)
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_params(mut self, params: EasingParams) -> Self {
        self.easing_params = Some(params);
        self
    }

    #[inline]
    pub fn params(&self) -> &EasingParams {
        self.easing_params.as_ref().unwrap_or(&EasingParams::DEFAULT)
    }

    /// Eased fraction for the segment arriving at this keyframe.
    #[inline]
    pub fn ease(&self, fraction: f32) -> f32 {
        self.easing.apply(fraction, self.params())
    }
}

/// An ordered, validated sequence of keyframes for one animated property.
///
/// Invariants enforced at construction:
/// - at least one keyframe
/// - finite, non-decreasing times
/// - finite values of a single [`ValueKind`]
/// - easing parameters valid for their easing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Track {
    keyframes: Vec<Keyframe>,
    kind: ValueKind,
    derivative_epsilon: f32,
}

impl Track {
    pub fn new(keyframes: Vec<Keyframe>) -> Result<Self, AnimError> {
        Self::with_config(keyframes, &Config::default())
    }

    pub fn with_config(keyframes: Vec<Keyframe>, cfg: &Config) -> Result<Self, AnimError> {
        let first = keyframes
            .first()
            .ok_or_else(|| AnimError::invalid_track("track has no keyframes"))?;
        let kind = first.value.kind();

        let mut last_time = f32::NEG_INFINITY;
        for (index, kf) in keyframes.iter().enumerate() {
            if !kf.time.is_finite() {
                return Err(AnimError::invalid_track(format!(
                    "keyframe {index} has non-finite time {}",
                    kf.time
                )));
            }
            if kf.value.kind() != kind {
                return Err(AnimError::ValueKindMismatch {
                    index,
                    expected: kind,
                    actual: kf.value.kind(),
                });
            }
            if !kf.value.is_finite() {
                return Err(AnimError::invalid_track(format!(
                    "keyframe {index} has a non-finite value"
                )));
            }
            if kf.time < last_time {
                return Err(AnimError::invalid_track(format!(
                    "keyframe {index} at {} precedes previous keyframe at {last_time}",
                    kf.time
                )));
            }
            if kf.time == last_time {
                if cfg.reject_degenerate_segments {
                    return Err(AnimError::DegenerateSegment {
                        index,
                        time: kf.time,
                    });
                }
                warn!(
                    "keyframes {} and {index} share time {}; treating as a jump",
                    index - 1,
                    kf.time
                );
            }
            if let Some(params) = &kf.easing_params {
                params.validate(kf.easing)?;
            }
            last_time = kf.time;
        }

        debug!(
            "built {kind:?} track: {} keyframes over [{}, {last_time}]",
            keyframes.len(),
            first.time
        );
        Ok(Self {
            keyframes,
            kind,
            derivative_epsilon: cfg.effective_derivative_epsilon(),
        })
    }

    /// Interpolated value at time `t` (seconds). Clamps outside the keyframe range.
    pub fn evaluate(&self, t: f32) -> Result<Value, AnimError> {
        sampling::evaluate(&self.keyframes, t)
    }

    /// First time-derivative at `t`; zero outside the keyframe range.
    /// Rotation tracks return `None`.
    pub fn velocity(&self, t: f32) -> Result<Option<Value>, AnimError> {
        sampling::velocity(&self.keyframes, t, self.derivative_epsilon)
    }

    /// Unit direction of the current segment scaled by the slope of its eased
    /// fraction. Zero at rest. Only Vec2 and Vec3 tracks have one.
    pub fn motion(&self, t: f32) -> Result<Option<Value>, AnimError> {
        sampling::motion(&self.keyframes, t, self.derivative_epsilon)
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn start_time(&self) -> f32 {
        self.keyframes[0].time
    }

    pub fn end_time(&self) -> f32 {
        self.keyframes[self.keyframes.len() - 1].time
    }

    pub fn duration(&self) -> f32 {
        self.end_time() - self.start_time()
    }
}

impl TryFrom<Vec<Keyframe>> for Track {
    type Error = AnimError;

    fn try_from(keyframes: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Track::new(keyframes)
    }
}

impl From<Track> for Vec<Keyframe> {
    fn from(track: Track) -> Self {
        track.keyframes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Curve;

    #[test]
    fn empty_track_is_invalid() {
        assert!(matches!(
            Track::new(vec![]),
            Err(AnimError::InvalidTrack { .. })
        ));
    }

    #[test]
    fn unordered_times_rejected() {
        let err = Track::new(vec![Keyframe::new(1.0, 0.0), Keyframe::new(0.5, 1.0)]).unwrap_err();
        assert!(matches!(err, AnimError::InvalidTrack { .. }));
    }

    #[test]
    fn mixed_kinds_rejected() {
        let err = Track::new(vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, [1.0, 2.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            AnimError::ValueKindMismatch {
                index: 1,
                expected: ValueKind::Scalar,
                actual: ValueKind::Vec2,
            }
        );
    }

    #[test]
    fn degenerate_rejected_when_configured() {
        let keys = vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::new(1.0, 1.0),
            Keyframe::new(1.0, 5.0),
        ];
        assert!(Track::new(keys.clone()).is_ok());
        let cfg = Config {
            reject_degenerate_segments: true,
            ..Config::default()
        };
        assert_eq!(
            Track::with_config(keys, &cfg).unwrap_err(),
            AnimError::DegenerateSegment {
                index: 2,
                time: 1.0
            }
        );
    }

    #[test]
    fn invalid_easing_params_rejected() {
        let params = EasingParams {
            period: 0.0,
            ..EasingParams::default()
        };
        let err = Track::new(vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::eased(1.0, 1.0, Easing::Out(Curve::Elastic)).with_params(params),
        ])
        .unwrap_err();
        assert!(matches!(err, AnimError::InvalidEasingParams { .. }));
    }

    #[test]
    fn range_accessors() {
        let track = Track::new(vec![Keyframe::new(0.5, 0.0), Keyframe::new(2.0, 1.0)]).unwrap();
        assert_eq!(track.start_time(), 0.5);
        assert_eq!(track.end_time(), 2.0);
        assert_eq!(track.duration(), 1.5);
        assert_eq!(track.kind(), ValueKind::Scalar);
    }

    #[test]
    fn serde_validates() {
        let bad = r#"[{"time": 1.0, "value": {"type": "Scalar", "data": 0.0}},
                      {"time": 0.0, "value": {"type": "Scalar", "data": 1.0}}]"#;
        assert!(serde_json::from_str::<Track>(bad).is_err());

        let good = r#"[{"time": 0.0, "value": {"type": "Scalar", "data": 0.0}},
                       {"time": 1.0, "value": {"type": "Scalar", "data": 1.0}, "easing": "exp_out"}]"#;
        let track: Track = serde_json::from_str(good).unwrap();
        assert_eq!(track.keyframes()[1].easing, Easing::Out(Curve::Exp));
    }
}
