//! Keyframe sampling.
//!
//! Model:
//! - Keyframes are ordered by non-decreasing time (seconds).
//! - Before the first keyframe the first value holds; after the last, the last value holds.
//! - Inside, the bracketing pair `k_i.time <= t < k_{i+1}.time` is found by binary search,
//!   the local fraction is eased with `k_{i+1}`'s easing, then values blend linearly
//!   (quaternions: SLERP).
//! - Zero-length segments are jumps: at the shared time the later keyframe wins.

use crate::error::AnimError;
use crate::interp::functions::{linear_value, scaled_difference, scaled_direction};
use crate::track::Keyframe;
use crate::value::{Value, ValueKind};

/// Where a query time falls relative to the keyframes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Segment {
    /// Before (or at) the first keyframe.
    Before,
    /// At or after the last keyframe.
    After,
    /// Exactly on keyframe `index` (the last one when several share the time).
    At(usize),
    /// Strictly between `from` and `from + 1`.
    Inside { from: usize, fraction: f32 },
}

/// Locate `t` among `keyframes`. Expects a non-empty slice and a non-NaN `t`.
pub(crate) fn find_segment(keyframes: &[Keyframe], t: f32) -> Segment {
    let n = keyframes.len();
    if n == 0 || t <= keyframes[0].time {
        return Segment::Before;
    }
    if t >= keyframes[n - 1].time {
        return Segment::After;
    }
    // Number of keyframes with time <= t; at least 1 and at most n - 1 here.
    let upper = keyframes.partition_point(|k| k.time <= t);
    let from = upper.saturating_sub(1).min(n - 2);
    let t0 = keyframes[from].time;
    let t1 = keyframes[from + 1].time;
    if t == t0 {
        return Segment::At(from);
    }
    let span = t1 - t0;
    if span <= 0.0 {
        // Only reachable with unsorted input; hold the later keyframe.
        return Segment::At(from + 1);
    }
    Segment::Inside {
        from,
        fraction: (t - t0) / span,
    }
}

fn check_query(keyframes: &[Keyframe], t: f32) -> Result<(), AnimError> {
    if keyframes.is_empty() {
        return Err(AnimError::invalid_track("track has no keyframes"));
    }
    if t.is_nan() {
        return Err(AnimError::InvalidTime { time: t });
    }
    Ok(())
}

fn mismatch(keyframes: &[Keyframe], from: usize) -> AnimError {
    AnimError::ValueKindMismatch {
        index: from + 1,
        expected: keyframes[from].value.kind(),
        actual: keyframes[from + 1].value.kind(),
    }
}

/// Evaluate an ordered keyframe slice at time `t`.
///
/// [`crate::Track`] validates ordering up front; raw slices are assumed sorted.
pub fn evaluate(keyframes: &[Keyframe], t: f32) -> Result<Value, AnimError> {
    check_query(keyframes, t)?;
    match find_segment(keyframes, t) {
        Segment::Before => Ok(keyframes[0].value),
        Segment::After => Ok(keyframes[keyframes.len() - 1].value),
        Segment::At(index) => Ok(keyframes[index].value),
        Segment::Inside { from, fraction } => {
            let left = &keyframes[from];
            let right = &keyframes[from + 1];
            let eased = right.ease(fraction);
            linear_value(&left.value, &right.value, eased).ok_or_else(|| mismatch(keyframes, from))
        }
    }
}

fn segment_velocity(
    keyframes: &[Keyframe],
    from: usize,
    fraction: f32,
    eps: f32,
) -> Result<Option<Value>, AnimError> {
    let left = &keyframes[from];
    let right = &keyframes[from + 1];
    let span = right.time - left.time;
    if span <= 0.0 {
        return Ok(Some(Value::zero(left.value.kind())));
    }
    let slope = right.easing.derivative(fraction, right.params(), eps);
    match scaled_difference(&left.value, &right.value, slope / span) {
        Some(v) => Ok(Some(v)),
        None if left.value.kind() != right.value.kind() => Err(mismatch(keyframes, from)),
        None => Ok(None),
    }
}

/// First time-derivative of the keyframe curve at `t`.
///
/// Outside the keyframe range the value is constant, so the derivative is
/// zero. On a keyframe the outgoing segment's slope is used. Quaternion
/// tracks yield `None`.
pub fn velocity(keyframes: &[Keyframe], t: f32, eps: f32) -> Result<Option<Value>, AnimError> {
    check_query(keyframes, t)?;
    let kind = keyframes[0].value.kind();
    if kind == ValueKind::Quat {
        return Ok(None);
    }
    match find_segment(keyframes, t) {
        Segment::Before | Segment::After => Ok(Some(Value::zero(kind))),
        Segment::At(index) if index + 1 < keyframes.len() => {
            segment_velocity(keyframes, index, 0.0, eps)
        }
        Segment::At(_) => Ok(Some(Value::zero(kind))),
        Segment::Inside { from, fraction } => segment_velocity(keyframes, from, fraction, eps),
    }
}

/// Motion vector of a 2D/3D keyframe curve at `t`: the unit direction of the
/// current segment scaled by the slope of its eased fraction.
///
/// Unlike [`velocity`] the magnitude does not depend on segment length or
/// duration, only on how fast the easing progresses. Zero at rest (outside
/// the keyframe range, on zero-length segments, between equal values).
/// Tracks of other kinds yield `None`.
pub fn motion(keyframes: &[Keyframe], t: f32, eps: f32) -> Result<Option<Value>, AnimError> {
    check_query(keyframes, t)?;
    let kind = keyframes[0].value.kind();
    if !matches!(kind, ValueKind::Vec2 | ValueKind::Vec3) {
        return Ok(None);
    }
    let (from, fraction) = match find_segment(keyframes, t) {
        Segment::Before | Segment::After => return Ok(Some(Value::zero(kind))),
        Segment::At(index) if index + 1 < keyframes.len() => (index, 0.0),
        Segment::At(_) => return Ok(Some(Value::zero(kind))),
        Segment::Inside { from, fraction } => (from, fraction),
    };
    let left = &keyframes[from];
    let right = &keyframes[from + 1];
    if right.time <= left.time {
        return Ok(Some(Value::zero(kind)));
    }
    let slope = right.easing.derivative(fraction, right.params(), eps);
    scaled_direction(&left.value, &right.value, slope)
        .map(Some)
        .ok_or_else(|| mismatch(keyframes, from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::{Curve, Easing};

    fn keys(points: &[(f32, f32)]) -> Vec<Keyframe> {
        points.iter().map(|(t, v)| Keyframe::new(*t, *v)).collect()
    }

    #[test]
    fn find_segment_cases() {
        let k = keys(&[(0.0, 0.0), (1.0, 1.0), (3.0, 2.0)]);
        assert_eq!(find_segment(&k, -1.0), Segment::Before);
        assert_eq!(find_segment(&k, 0.0), Segment::Before);
        assert_eq!(find_segment(&k, 1.0), Segment::At(1));
        assert_eq!(
            find_segment(&k, 2.0),
            Segment::Inside {
                from: 1,
                fraction: 0.5
            }
        );
        assert_eq!(find_segment(&k, 3.0), Segment::After);
        assert_eq!(find_segment(&k, f32::INFINITY), Segment::After);
    }

    #[test]
    fn ties_pick_the_later_keyframe() {
        let k = keys(&[(0.0, 0.0), (1.0, 1.0), (1.0, 5.0), (2.0, 6.0)]);
        assert_eq!(find_segment(&k, 1.0), Segment::At(2));
        assert_eq!(evaluate(&k, 1.0).unwrap(), Value::Scalar(5.0));
        // Approaching the jump from the left interpolates toward the earlier keyframe.
        assert_eq!(evaluate(&k, 0.5).unwrap(), Value::Scalar(0.5));
        assert_eq!(evaluate(&k, 1.5).unwrap(), Value::Scalar(5.5));
    }

    #[test]
    fn empty_and_nan() {
        assert!(matches!(
            evaluate(&[], 0.0),
            Err(AnimError::InvalidTrack { .. })
        ));
        let k = keys(&[(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            evaluate(&k, f32::NAN),
            Err(AnimError::InvalidTime { .. })
        ));
    }

    #[test]
    fn destination_easing_governs_segment() {
        let k = vec![
            Keyframe::eased(0.0, 0.0, Easing::In(Curve::Cubic)),
            Keyframe::eased(1.0, 1.0, Easing::In(Curve::Quadratic)),
        ];
        assert_eq!(evaluate(&k, 0.5).unwrap(), Value::Scalar(0.25));
    }

    #[test]
    fn raw_slice_kind_mismatch() {
        let k = vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, [1.0, 1.0])];
        assert!(matches!(
            evaluate(&k, 0.5),
            Err(AnimError::ValueKindMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn tie_on_first_keyframe_holds_first_value() {
        // Before-or-at the first time always yields the first keyframe.
        let k = keys(&[(0.0, 0.0), (0.0, 5.0), (1.0, 6.0)]);
        assert_eq!(find_segment(&k, 0.0), Segment::Before);
        assert_eq!(evaluate(&k, 0.0).unwrap(), Value::Scalar(0.0));
        assert_eq!(evaluate(&k, 0.5).unwrap(), Value::Scalar(5.5));
    }

    #[test]
    fn motion_is_unit_direction_times_ease_slope() {
        let k = vec![
            Keyframe::new(0.0, [0.0, 0.0, 0.0]),
            Keyframe::new(4.0, [0.0, 3.0, 4.0]),
        ];
        assert_eq!(
            motion(&k, 2.0, 1e-3).unwrap(),
            Some(Value::Vec3([0.0, 0.6, 0.8]))
        );
        assert_eq!(motion(&k, -1.0, 1e-3).unwrap(), Some(Value::Vec3([0.0; 3])));
        assert_eq!(motion(&k, 4.0, 1e-3).unwrap(), Some(Value::Vec3([0.0; 3])));
        assert_eq!(motion(&keys(&[(0.0, 0.0), (1.0, 1.0)]), 0.5, 1e-3).unwrap(), None);
    }

    #[test]
    fn velocity_linear_segment() {
        let k = keys(&[(0.0, 0.0), (2.0, 10.0)]);
        assert_eq!(velocity(&k, 1.0, 1e-3).unwrap(), Some(Value::Scalar(5.0)));
        assert_eq!(velocity(&k, 0.0, 1e-3).unwrap(), Some(Value::Scalar(0.0)));
        assert_eq!(velocity(&k, 5.0, 1e-3).unwrap(), Some(Value::Scalar(0.0)));
    }
}
