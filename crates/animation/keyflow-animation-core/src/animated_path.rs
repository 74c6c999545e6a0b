//! Motion along a path: a scalar progress track drives the curve parameter.
//!
//! Easing the progress is independent from the curve shape. With the default
//! segment parametrization an overshooting easing (`back_*`, `elastic_*`)
//! extrapolates past the path ends instead of failing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::AnimError;
use crate::path::Path;
use crate::track::Track;
use crate::value::{ValueKind, Vec3};

/// How progress values map onto the path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parametrization {
    /// Uniform by segment index ([`Path::sample`]).
    #[default]
    Segment,
    /// Constant speed by arc length ([`Path::sample_at_distance`]); progress is clamped to [0, 1].
    ArcLength,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedPath {
    progress: Track,
    path: Arc<Path>,
    parametrization: Parametrization,
}

impl AnimatedPath {
    /// `progress` must be a scalar track; its values are path parameters.
    pub fn new(progress: Track, path: Arc<Path>) -> Result<Self, AnimError> {
        if progress.kind() != ValueKind::Scalar {
            return Err(AnimError::ValueKindMismatch {
                index: 0,
                expected: ValueKind::Scalar,
                actual: progress.kind(),
            });
        }
        Ok(Self {
            progress,
            path,
            parametrization: Parametrization::Segment,
        })
    }

    pub fn with_parametrization(mut self, parametrization: Parametrization) -> Self {
        self.parametrization = parametrization;
        self
    }

    /// Path parameter at time `t`.
    pub fn progress_at(&self, t: f32) -> Result<f32, AnimError> {
        let value = self.progress.evaluate(t)?;
        // Scalar kind is checked in `new`.
        Ok(value.as_scalar().unwrap_or_default())
    }

    /// Position on the path at time `t`.
    pub fn evaluate(&self, t: f32) -> Result<Vec3, AnimError> {
        let p = self.progress_at(t)?;
        match self.parametrization {
            Parametrization::Segment => Ok(self.path.sample_unclamped(p)),
            Parametrization::ArcLength => self.path.sample_at_distance(p.clamp(0.0, 1.0)),
        }
    }

    pub fn progress(&self) -> &Track {
        &self.progress
    }

    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    pub fn parametrization(&self) -> Parametrization {
        self.parametrization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::{Curve, Easing};
    use crate::path::PathMode;
    use crate::track::Keyframe;

    fn straight() -> Arc<Path> {
        Arc::new(
            Path::build(
                vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]],
                // Evenly spaced controls keep the parametrization linear.
                vec![[1.0 / 3.0, 0.0, 0.0], [2.0 / 3.0, 0.0, 0.0]],
                PathMode::Bezier3,
                None,
            )
            .unwrap(),
        )
    }

    #[test]
    fn rejects_vector_progress() {
        let track = Track::new(vec![Keyframe::new(0.0, [0.0, 0.0])]).unwrap();
        assert!(matches!(
            AnimatedPath::new(track, straight()),
            Err(AnimError::ValueKindMismatch { .. })
        ));
    }

    #[test]
    fn overshoot_extrapolates() {
        let track = Track::new(vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::eased(1.0, 1.0, Easing::InOut(Curve::Back)),
        ])
        .unwrap();
        let anim = AnimatedPath::new(track, straight()).unwrap();
        let p = anim.progress_at(0.95).unwrap();
        assert!(p > 1.0);
        let pos = anim.evaluate(0.95).unwrap();
        assert!(pos[0] > 1.0);
        assert_eq!(anim.evaluate(1.0).unwrap(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn arc_length_clamps() {
        let track = Track::new(vec![
            Keyframe::new(0.0, 0.0),
            Keyframe::eased(1.0, 1.0, Easing::InOut(Curve::Back)),
        ])
        .unwrap();
        let anim = AnimatedPath::new(track, straight())
            .unwrap()
            .with_parametrization(Parametrization::ArcLength);
        assert_eq!(anim.evaluate(0.95).unwrap(), [1.0, 0.0, 0.0]);
    }
}
