//! Curves through anchor points, sampled by a normalized parameter.
//!
//! Both modes reduce to a chain of cubic Bezier segments, one per pair of
//! adjacent anchors:
//! - `bezier3`: the caller gives two control points per segment.
//! - `catmull`: controls are derived from Catmull-Rom tangents
//!   `m_i = tension * (P_{i+1} - P_{i-1})`; the caller gives only the two
//!   phantom neighbours of the first and last anchors.
//!
//! [`Path::sample`] spreads `u` uniformly over segments by index. For
//! constant-speed motion, [`Path::sample_at_distance`] maps a normalized arc
//! length through a lookup table of `segments * precision + 1` points.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AnimError;
use crate::interp::functions::{cubic_bezier_vec3, distance_vec3};
use crate::value::Vec3;

/// Largest accepted arc-length table resolution per segment.
pub const MAX_PATH_PRECISION: u32 = 1 << 16;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathMode {
    /// Cubic Bezier with explicit control points
    #[default]
    Bezier3,
    /// Catmull-Rom spline through the anchors
    Catmull,
}

/// Serializable path description. Missing `tension` / `precision` take the
/// [`Config`] defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    pub points: Vec<Vec3>,
    pub controls: Vec<Vec3>,
    #[serde(default)]
    pub mode: PathMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tension: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl PathSpec {
    pub fn new(points: Vec<Vec3>, controls: Vec<Vec3>, mode: PathMode) -> Self {
        Self {
            points,
            controls,
            mode,
            tension: None,
            precision: None,
        }
    }

    pub fn with_tension(mut self, tension: f32) -> Self {
        self.tension = Some(tension);
        self
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }
}

/// Immutable curve built from a [`PathSpec`].
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    spec: PathSpec,
    tension: f32,
    precision: u32,
    /// Bezier control polygon per segment: [anchor, control, control, anchor].
    segments: Vec<[Vec3; 4]>,
    /// Normalized cumulative arc distances, first 0.0 and last 1.0.
    arc_distances: Vec<f32>,
    length: f32,
}

fn all_finite(points: &[Vec3]) -> bool {
    points.iter().flatten().all(|c| c.is_finite())
}

#[inline]
fn add_scaled(p: Vec3, d: Vec3, s: f32) -> Vec3 {
    [p[0] + d[0] * s, p[1] + d[1] * s, p[2] + d[2] * s]
}

#[inline]
fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn bezier_segments(points: &[Vec3], controls: &[Vec3]) -> Vec<[Vec3; 4]> {
    points
        .windows(2)
        .zip(controls.chunks_exact(2))
        .map(|(p, c)| [p[0], c[0], c[1], p[1]])
        .collect()
}

fn catmull_segments(points: &[Vec3], controls: &[Vec3], tension: f32) -> Vec<[Vec3; 4]> {
    let n = points.len();
    let (first_phantom, last_phantom) = (controls[0], controls[1]);
    let neighbour = |i: isize| -> Vec3 {
        if i < 0 {
            first_phantom
        } else if i as usize >= n {
            last_phantom
        } else {
            points[i as usize]
        }
    };
    (0..n - 1)
        .map(|i| {
            let i = i as isize;
            let p1 = neighbour(i);
            let p2 = neighbour(i + 1);
            let m1 = sub(p2, neighbour(i - 1));
            let m2 = sub(neighbour(i + 2), p1);
            // Hermite tangents to Bezier controls: P +/- m / 3
            let c1 = add_scaled(p1, m1, tension / 3.0);
            let c2 = add_scaled(p2, m2, -tension / 3.0);
            [p1, c1, c2, p2]
        })
        .collect()
}

impl Path {
    /// Build a path using the default [`Config`].
    pub fn build(
        points: Vec<Vec3>,
        controls: Vec<Vec3>,
        mode: PathMode,
        tension: Option<f32>,
    ) -> Result<Self, AnimError> {
        let mut spec = PathSpec::new(points, controls, mode);
        spec.tension = tension;
        Self::from_spec(spec, &Config::default())
    }

    pub fn from_spec(spec: PathSpec, cfg: &Config) -> Result<Self, AnimError> {
        let tension = spec.tension.unwrap_or(cfg.catmull_tension);
        let precision = spec.precision.unwrap_or(cfg.path_precision);
        let (points, controls) = (&spec.points, &spec.controls);

        if points.len() < 2 {
            return Err(AnimError::invalid_path(format!(
                "at least 2 anchor points are required, got {}",
                points.len()
            )));
        }
        if !all_finite(points) || !all_finite(controls) {
            return Err(AnimError::invalid_path("coordinates must be finite"));
        }
        if precision == 0 || precision > MAX_PATH_PRECISION {
            return Err(AnimError::invalid_path(format!(
                "precision must be in [1, {MAX_PATH_PRECISION}], got {precision}"
            )));
        }

        let segments = match spec.mode {
            PathMode::Bezier3 => {
                let expected = 2 * (points.len() - 1);
                if controls.len() != expected {
                    return Err(AnimError::invalid_path(format!(
                        "bezier3 needs 2 control points per segment ({expected}), got {}",
                        controls.len()
                    )));
                }
                bezier_segments(points, controls)
            }
            PathMode::Catmull => {
                if controls.len() != 2 {
                    return Err(AnimError::invalid_path(format!(
                        "catmull needs exactly 2 control points (first and last), got {}",
                        controls.len()
                    )));
                }
                if !tension.is_finite() {
                    return Err(AnimError::invalid_path(format!(
                        "tension must be finite, got {tension}"
                    )));
                }
                catmull_segments(points, controls, tension)
            }
        };

        let (arc_distances, length) = arc_table(&segments, precision);
        debug!(
            "built {:?} path: {} segments, approx length {length}",
            spec.mode,
            segments.len()
        );
        Ok(Self {
            spec,
            tension,
            precision,
            segments,
            arc_distances,
            length,
        })
    }

    /// Position at `u ∈ [0, 1]`, segments spread uniformly by index.
    pub fn sample(&self, u: f32) -> Result<Vec3, AnimError> {
        if !(0.0..=1.0).contains(&u) {
            return Err(AnimError::OutOfRange { value: u });
        }
        Ok(self.sample_unclamped(u))
    }

    /// Like [`Path::sample`] but extrapolates the first/last segment outside
    /// `[0, 1]` instead of failing.
    pub fn sample_unclamped(&self, u: f32) -> Vec3 {
        let n = self.segments.len();
        let scaled = u * n as f32;
        let index = if scaled <= 0.0 {
            0
        } else {
            (scaled.floor() as usize).min(n - 1)
        };
        let local = scaled - index as f32;
        let [p0, p1, p2, p3] = self.segments[index];
        cubic_bezier_vec3(p0, p1, p2, p3, local)
    }

    /// Position at normalized arc length `distance ∈ [0, 1]`.
    pub fn sample_at_distance(&self, distance: f32) -> Result<Vec3, AnimError> {
        if !(0.0..=1.0).contains(&distance) {
            return Err(AnimError::OutOfRange { value: distance });
        }
        Ok(self.sample_unclamped(self.distance_to_parameter(distance)))
    }

    /// Map a normalized arc length to the index-uniform parameter.
    pub fn distance_to_parameter(&self, distance: f32) -> f32 {
        let d = &self.arc_distances;
        let steps = d.len() - 1;
        if self.length <= 0.0 {
            return distance.clamp(0.0, 1.0);
        }
        let upper = d.partition_point(|&x| x <= distance);
        let j = upper.saturating_sub(1).min(steps - 1);
        let span = d[j + 1] - d[j];
        let ratio = if span > 0.0 {
            ((distance - d[j]) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (j as f32 + ratio) / steps as f32
    }

    /// Approximate curve length (sum of lookup-table chords).
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn mode(&self) -> PathMode {
        self.spec.mode
    }

    pub fn tension(&self) -> f32 {
        self.tension
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn anchors(&self) -> &[Vec3] {
        &self.spec.points
    }

    /// Bezier control polygons actually sampled, one per segment.
    pub fn segments(&self) -> &[[Vec3; 4]] {
        &self.segments
    }

    pub fn spec(&self) -> &PathSpec {
        &self.spec
    }
}

/// Normalized cumulative chord lengths over `segments * precision + 1` points.
fn arc_table(segments: &[[Vec3; 4]], precision: u32) -> (Vec<f32>, f32) {
    let precision = precision as usize;
    let steps = segments.len() * precision;
    let mut distances = Vec::with_capacity(steps + 1);
    distances.push(0.0f32);

    let mut total = 0.0f32;
    let mut prev = segments[0][0];
    for [p0, p1, p2, p3] in segments.iter().copied() {
        for k in 1..=precision {
            let t = k as f32 / precision as f32;
            let point = cubic_bezier_vec3(p0, p1, p2, p3, t);
            total += distance_vec3(prev, point);
            distances.push(total);
            prev = point;
        }
    }

    if total > 0.0 {
        let scale = total.recip();
        for d in distances.iter_mut() {
            *d *= scale;
        }
        if let Some(last) = distances.last_mut() {
            *last = 1.0;
        }
    }
    (distances, total)
}
