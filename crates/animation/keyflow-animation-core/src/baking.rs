//! Baking API: fixed-rate samples of a track or animated path over a time window.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::animated_path::AnimatedPath;
use crate::error::AnimError;
use crate::track::Track;
use crate::value::{Value, Vec3};

const DEFAULT_FRAME_RATE: f32 = 60.0;

/// Upper bound on frames per bake, end frame included.
pub const MAX_BAKED_FRAMES: usize = 1 << 24;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakingConfig {
    /// Target frame rate (Hz) for baked samples.
    pub frame_rate: f32,
    /// Start time (seconds).
    pub start_time: f32,
    /// End time (seconds); if None, uses the end of the track.
    pub end_time: Option<f32>,
    /// Also sample first derivatives (tracks only).
    pub include_velocities: bool,
}

impl Default for BakingConfig {
    fn default() -> Self {
        Self {
            frame_rate: DEFAULT_FRAME_RATE,
            start_time: 0.0,
            end_time: None,
            include_velocities: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedTrack {
    pub frame_rate: f32,
    pub start_time: f32,
    pub end_time: f32,
    /// Sampled values at each frame.
    pub values: Vec<Value>,
    /// Per-frame velocities when requested; `None` entries for rotation tracks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocities: Option<Vec<Option<Value>>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BakedPath {
    pub frame_rate: f32,
    pub start_time: f32,
    pub end_time: f32,
    pub positions: Vec<Vec3>,
}

/// Resolved sampling window. Frames are inclusive of both ends; the last one
/// lands exactly on `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameWindow {
    rate: f32,
    start: f32,
    end: f32,
    count: usize,
}

impl FrameWindow {
    fn new(cfg: &BakingConfig, default_end: f32) -> Result<Self, AnimError> {
        let rate = if cfg.frame_rate.is_finite() && cfg.frame_rate > 0.0 {
            cfg.frame_rate
        } else {
            DEFAULT_FRAME_RATE
        };
        let start = if cfg.start_time.is_finite() {
            cfg.start_time
        } else {
            0.0
        };
        let end = cfg
            .end_time
            .filter(|e| e.is_finite())
            .unwrap_or(default_end)
            .max(start);
        // Counted in f64; the f32 product saturates for large rates.
        let frames = ((end as f64 - start as f64) * rate as f64).ceil();
        if !frames.is_finite() || frames >= MAX_BAKED_FRAMES as f64 {
            return Err(AnimError::InvalidBaking {
                reason: format!(
                    "{frames} frames over [{start}, {end}] at {rate} Hz exceeds the limit of {MAX_BAKED_FRAMES}"
                ),
            });
        }
        Ok(Self {
            rate,
            start,
            end,
            count: frames as usize + 1,
        })
    }

    fn times(self) -> impl Iterator<Item = f32> {
        (0..self.count).map(move |f| (self.start + f as f32 / self.rate).min(self.end))
    }
}

/// Bake a single track using the provided config.
pub fn bake_track(track: &Track, cfg: &BakingConfig) -> Result<BakedTrack, AnimError> {
    let window = FrameWindow::new(cfg, track.end_time())?;
    let values = window
        .times()
        .map(|t| track.evaluate(t))
        .collect::<Result<Vec<_>, _>>()?;
    let velocities = if cfg.include_velocities {
        Some(
            window
                .times()
                .map(|t| track.velocity(t))
                .collect::<Result<Vec<_>, _>>()?,
        )
    } else {
        None
    };
    debug!(
        "baked {} frames at {} Hz over [{}, {}]",
        window.count, window.rate, window.start, window.end
    );
    Ok(BakedTrack {
        frame_rate: window.rate,
        start_time: window.start,
        end_time: window.end,
        values,
        velocities,
    })
}

/// Bake positions along an animated path. The default end is the end of the
/// progress track.
pub fn bake_animated_path(
    anim: &AnimatedPath,
    cfg: &BakingConfig,
) -> Result<BakedPath, AnimError> {
    let window = FrameWindow::new(cfg, anim.progress().end_time())?;
    let positions = window
        .times()
        .map(|t| anim.evaluate(t))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(BakedPath {
        frame_rate: window.rate,
        start_time: window.start,
        end_time: window.end,
        positions,
    })
}

/// Export baked data as serde_json::Value (stable schema for serialization).
pub fn export_baked_json<T: Serialize>(baked: &T) -> Result<serde_json::Value, AnimError> {
    Ok(serde_json::to_value(baked)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Keyframe;

    fn ramp() -> Track {
        Track::new(vec![Keyframe::new(0.0, 0.0), Keyframe::new(1.0, 10.0)]).unwrap()
    }

    #[test]
    fn frame_count_is_inclusive() {
        let cfg = BakingConfig {
            frame_rate: 4.0,
            ..Default::default()
        };
        let baked = bake_track(&ramp(), &cfg).unwrap();
        assert_eq!(baked.values.len(), 5);
        assert_eq!(baked.values[0], Value::Scalar(0.0));
        assert_eq!(baked.values[2], Value::Scalar(5.0));
        assert_eq!(baked.values[4], Value::Scalar(10.0));
        assert!(baked.velocities.is_none());
    }

    #[test]
    fn invalid_rate_falls_back() {
        let cfg = BakingConfig {
            frame_rate: 0.0,
            ..Default::default()
        };
        let baked = bake_track(&ramp(), &cfg).unwrap();
        assert_eq!(baked.frame_rate, 60.0);
        assert_eq!(baked.values.len(), 61);
    }

    #[test]
    fn uneven_window_ends_on_end_time() {
        let cfg = BakingConfig {
            frame_rate: 3.0,
            start_time: 0.0,
            end_time: Some(0.5),
            include_velocities: true,
        };
        let baked = bake_track(&ramp(), &cfg).unwrap();
        assert_eq!(baked.values.len(), 3);
        assert_eq!(baked.values[2], Value::Scalar(5.0));
        let velocities = baked.velocities.unwrap();
        assert_eq!(velocities.len(), 3);
        assert_eq!(velocities[1], Some(Value::Scalar(10.0)));
    }

    #[test]
    fn export_shape() {
        let cfg = BakingConfig {
            frame_rate: 1.0,
            ..Default::default()
        };
        let json = export_baked_json(&bake_track(&ramp(), &cfg).unwrap()).unwrap();
        assert_eq!(json["frame_rate"], 1.0);
        assert_eq!(json["values"][1]["type"], "Scalar");
        assert!(json.get("velocities").is_none());
    }
}
