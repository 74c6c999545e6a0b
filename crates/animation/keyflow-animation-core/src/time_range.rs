//! Time-range gates: label time intervals with an evaluation mode for the
//! subtree they govern.
//!
//! The gate only reports the active mode; what a frozen subtree displays is up
//! to the caller.

use serde::{Deserialize, Serialize};

use crate::error::AnimError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimeRangeMode {
    /// Evaluate normally.
    Cont,
    /// Skip evaluation; hold or hide.
    Noop,
    /// Evaluate once, frozen at `render_time`.
    Once { render_time: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub time: f32,
    #[serde(flatten)]
    pub mode: TimeRangeMode,
}

impl TimeRange {
    pub fn cont(time: f32) -> Self {
        Self {
            time,
            mode: TimeRangeMode::Cont,
        }
    }

    pub fn noop(time: f32) -> Self {
        Self {
            time,
            mode: TimeRangeMode::Noop,
        }
    }

    pub fn once(time: f32, render_time: f32) -> Self {
        Self {
            time,
            mode: TimeRangeMode::Once { render_time },
        }
    }
}

/// Mode of the last entry with `time <= t`, or of the first entry when `t`
/// precedes them all. An empty list is always [`TimeRangeMode::Cont`].
/// `ranges` is assumed sorted by time.
pub fn active(ranges: &[TimeRange], t: f32) -> TimeRangeMode {
    let Some(first) = ranges.first() else {
        return TimeRangeMode::Cont;
    };
    let upper = ranges.partition_point(|r| r.time <= t);
    match upper {
        0 => first.mode,
        n => ranges[n - 1].mode,
    }
}

/// Validated, ordered list of time ranges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimeRange>", into = "Vec<TimeRange>")]
pub struct TimeRangeGate {
    ranges: Vec<TimeRange>,
}

impl TimeRangeGate {
    pub fn new(ranges: Vec<TimeRange>) -> Result<Self, AnimError> {
        let mut last = f32::NEG_INFINITY;
        for (i, r) in ranges.iter().enumerate() {
            if !r.time.is_finite() {
                return Err(AnimError::InvalidTimeRanges {
                    reason: format!("entry {i} has non-finite time {}", r.time),
                });
            }
            if r.time < last {
                return Err(AnimError::InvalidTimeRanges {
                    reason: format!("entry {i} at {} precedes previous entry at {last}", r.time),
                });
            }
            if let TimeRangeMode::Once { render_time } = r.mode {
                if !render_time.is_finite() {
                    return Err(AnimError::InvalidTimeRanges {
                        reason: format!("entry {i} has non-finite render time"),
                    });
                }
            }
            last = r.time;
        }
        Ok(Self { ranges })
    }

    pub fn active(&self, t: f32) -> TimeRangeMode {
        active(&self.ranges, t)
    }

    /// Time at which the governed subtree should be evaluated, or `None` when
    /// it is inactive.
    pub fn effective_time(&self, t: f32) -> Option<f32> {
        match self.active(t) {
            TimeRangeMode::Cont => Some(t),
            TimeRangeMode::Noop => None,
            TimeRangeMode::Once { render_time } => Some(render_time),
        }
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }
}

impl TryFrom<Vec<TimeRange>> for TimeRangeGate {
    type Error = AnimError;

    fn try_from(ranges: Vec<TimeRange>) -> Result<Self, Self::Error> {
        TimeRangeGate::new(ranges)
    }
}

impl From<TimeRangeGate> for Vec<TimeRange> {
    fn from(gate: TimeRangeGate) -> Self {
        gate.ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_window() {
        let gate = TimeRangeGate::new(vec![
            TimeRange::noop(0.0),
            TimeRange::cont(1.0),
            TimeRange::noop(8.0),
        ])
        .unwrap();
        assert_eq!(gate.active(0.5), TimeRangeMode::Noop);
        assert_eq!(gate.active(5.0), TimeRangeMode::Cont);
        assert_eq!(gate.active(9.0), TimeRangeMode::Noop);
    }

    #[test]
    fn boundaries_and_before_first() {
        let ranges = [TimeRange::cont(2.0), TimeRange::noop(4.0)];
        // Before every entry: first entry's mode.
        assert_eq!(active(&ranges, 0.0), TimeRangeMode::Cont);
        assert_eq!(active(&ranges, 4.0), TimeRangeMode::Noop);
        assert_eq!(active(&ranges, 3.999), TimeRangeMode::Cont);
        assert_eq!(active(&[], 3.0), TimeRangeMode::Cont);
    }

    #[test]
    fn once_freezes_time() {
        let gate = TimeRangeGate::new(vec![
            TimeRange::cont(0.0),
            TimeRange::once(2.0, 2.5),
            TimeRange::noop(3.0),
        ])
        .unwrap();
        assert_eq!(gate.effective_time(1.0), Some(1.0));
        assert_eq!(gate.effective_time(2.2), Some(2.5));
        assert_eq!(gate.effective_time(3.5), None);
    }

    #[test]
    fn unordered_rejected() {
        let err = TimeRangeGate::new(vec![TimeRange::cont(2.0), TimeRange::noop(1.0)]).unwrap_err();
        assert!(matches!(err, AnimError::InvalidTimeRanges { .. }));
    }

    #[test]
    fn json_shape() {
        let gate: TimeRangeGate = serde_json::from_str(
            r#"[{"time": 0.0, "mode": "cont"}, {"time": 1.0, "mode": "once", "render_time": 1.5}]"#,
        )
        .unwrap();
        assert_eq!(
            gate.active(2.0),
            TimeRangeMode::Once { render_time: 1.5 }
        );
    }
}
