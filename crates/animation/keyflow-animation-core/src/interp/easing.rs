//! Easing curves: pure functions mapping a segment fraction `t ∈ [0, 1]` to an
//! eased fraction. Results are not clamped; `elastic`, `back` and `bounce`
//! variants overshoot.
//!
//! Every curve is defined by its `in` form. The other variants derive from it:
//! - `out(t)    = 1 - in(1 - t)`
//! - `in_out(t) = in(2t) / 2` then `1 - in(2 - 2t) / 2`
//! - `out_in(t) = out(2t) / 2` then `(1 + in(2t - 1)) / 2`
//!
//! Names such as `"exp_in_out"` resolve through [`FromStr`] and are the
//! serialized form.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnimError;

/// Base shape of an easing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    Quadratic,
    Cubic,
    Quartic,
    Quintic,
    /// `t^exponent`
    Power,
    Sinus,
    /// Exponential with a configurable base
    Exp,
    Circular,
    Bounce,
    Elastic,
    Back,
}

impl Curve {
    pub const ALL: [Curve; 11] = [
        Curve::Quadratic,
        Curve::Cubic,
        Curve::Quartic,
        Curve::Quintic,
        Curve::Power,
        Curve::Sinus,
        Curve::Exp,
        Curve::Circular,
        Curve::Bounce,
        Curve::Elastic,
        Curve::Back,
    ];

    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Curve::Quadratic => "quadratic",
            Curve::Cubic => "cubic",
            Curve::Quartic => "quartic",
            Curve::Quintic => "quintic",
            Curve::Power => "power",
            Curve::Sinus => "sinus",
            Curve::Exp => "exp",
            Curve::Circular => "circular",
            Curve::Bounce => "bounce",
            Curve::Elastic => "elastic",
            Curve::Back => "back",
        }
    }

    fn from_name(name: &str) -> Option<Curve> {
        Curve::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// The `in` form of the curve.
    fn ease_in(&self, t: f32, params: &EasingParams) -> f32 {
        match self {
            Curve::Quadratic => t * t,
            Curve::Cubic => t * t * t,
            Curve::Quartic => t * t * t * t,
            Curve::Quintic => t * t * t * t * t,
            Curve::Power => t.powf(params.exponent),
            Curve::Sinus => 1.0 - (t * FRAC_PI_2).cos(),
            Curve::Exp => {
                if t <= 0.0 {
                    0.0
                } else if t >= 1.0 {
                    1.0
                } else {
                    (params.base.powf(t) - 1.0) / (params.base - 1.0)
                }
            }
            Curve::Circular => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            Curve::Bounce => 1.0 - bounce_out(1.0 - t),
            Curve::Elastic => elastic_in(t, params.amplitude, params.period),
            Curve::Back => {
                let s = params.overshoot;
                t * t * ((s + 1.0) * t - s)
            }
        }
    }

    fn ease_out(&self, t: f32, params: &EasingParams) -> f32 {
        1.0 - self.ease_in(1.0 - t, params)
    }
}

fn bounce_out(t: f32) -> f32 {
    const N1: f32 = 7.5625;
    const D1: f32 = 2.75;
    if t < 1.0 / D1 {
        N1 * t * t
    } else if t < 2.0 / D1 {
        let t = t - 1.5 / D1;
        N1 * t * t + 0.75
    } else if t < 2.5 / D1 {
        let t = t - 2.25 / D1;
        N1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / D1;
        N1 * t * t + 0.984375
    }
}

fn elastic_in(t: f32, amplitude: f32, period: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    // Amplitudes below 1 cannot reach the end point; use 1 and a quarter period phase.
    let (a, s) = if amplitude < 1.0 {
        (1.0, period / 4.0)
    } else {
        (amplitude, period / (2.0 * PI) * (1.0 / amplitude).asin())
    };
    let t1 = t - 1.0;
    -(a * 2f32.powf(10.0 * t1) * ((t1 - s) * 2.0 * PI / period).sin())
}

/// Named easing attached to a keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    #[default]
    Linear,
    In(Curve),
    Out(Curve),
    InOut(Curve),
    OutIn(Curve),
}

impl Easing {
    /// Every easing, `linear` first then each curve in its four variants.
    pub fn all() -> impl Iterator<Item = Easing> {
        std::iter::once(Easing::Linear).chain(Curve::ALL.into_iter().flat_map(|c| {
            [
                Easing::In(c),
                Easing::Out(c),
                Easing::InOut(c),
                Easing::OutIn(c),
            ]
        }))
    }

    pub fn curve(&self) -> Option<Curve> {
        match self {
            Easing::Linear => None,
            Easing::In(c) | Easing::Out(c) | Easing::InOut(c) | Easing::OutIn(c) => Some(*c),
        }
    }

    /// Full curve, ignoring offsets.
    fn raw(&self, t: f32, params: &EasingParams) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::In(c) => c.ease_in(t, params),
            Easing::Out(c) => c.ease_out(t, params),
            Easing::InOut(c) => {
                if t < 0.5 {
                    c.ease_in(2.0 * t, params) / 2.0
                } else {
                    1.0 - c.ease_in(2.0 - 2.0 * t, params) / 2.0
                }
            }
            Easing::OutIn(c) => {
                if t < 0.5 {
                    c.ease_out(2.0 * t, params) / 2.0
                } else {
                    (1.0 + c.ease_in(2.0 * t - 1.0, params)) / 2.0
                }
            }
        }
    }

    /// Eased fraction for `t`. With non-default offsets only the
    /// `[start_offset, end_offset]` part of the curve is used, renormalized to
    /// map 0 to 0 and 1 to 1.
    pub fn apply(&self, t: f32, params: &EasingParams) -> f32 {
        if !params.has_offsets() {
            return self.raw(t, params);
        }
        let (s, e) = (params.start_offset, params.end_offset);
        let y0 = self.raw(s, params);
        let y1 = self.raw(e, params);
        (self.raw(s + (e - s) * t, params) - y0) / (y1 - y0)
    }

    /// Slope of [`Easing::apply`] at `t`, by central finite difference
    /// (one-sided at the segment ends).
    pub fn derivative(&self, t: f32, params: &EasingParams, eps: f32) -> f32 {
        if *self == Easing::Linear && !params.has_offsets() {
            return 1.0;
        }
        let lo = (t - eps).max(0.0);
        let hi = (t + eps).min(1.0);
        if hi <= lo {
            return 0.0;
        }
        (self.apply(hi, params) - self.apply(lo, params)) / (hi - lo)
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("linear"),
            Easing::In(c) => write!(f, "{}_in", c.name()),
            Easing::Out(c) => write!(f, "{}_out", c.name()),
            Easing::InOut(c) => write!(f, "{}_in_out", c.name()),
            Easing::OutIn(c) => write!(f, "{}_out_in", c.name()),
        }
    }
}

impl FromStr for Easing {
    type Err = AnimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "linear" {
            return Ok(Easing::Linear);
        }
        // Longest suffixes first: "_in_out" also ends with "_out".
        let variants: [(&str, fn(Curve) -> Easing); 4] = [
            ("_in_out", Easing::InOut),
            ("_out_in", Easing::OutIn),
            ("_in", Easing::In),
            ("_out", Easing::Out),
        ];
        variants
            .into_iter()
            .find_map(|(suffix, ctor)| {
                s.strip_suffix(suffix)
                    .and_then(Curve::from_name)
                    .map(ctor)
            })
            .ok_or_else(|| AnimError::UnknownEasing { name: s.to_string() })
    }
}

impl TryFrom<String> for Easing {
    type Error = AnimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

/// Optional easing parameters. Only the fields relevant to the chosen curve
/// are read; the defaults are the usual curve shapes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EasingParams {
    /// `power` curve exponent.
    pub exponent: f32,
    /// `exp` curve base.
    pub base: f32,
    /// `elastic` amplitude; values below 1 behave as 1.
    pub amplitude: f32,
    /// `elastic` oscillation period.
    pub period: f32,
    /// `back` overshoot factor.
    pub overshoot: f32,
    pub start_offset: f32,
    pub end_offset: f32,
}

impl Default for EasingParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl EasingParams {
    pub const DEFAULT: EasingParams = EasingParams {
        exponent: 1.0,
        base: 1024.0,
        amplitude: 0.1,
        period: 0.25,
        overshoot: 1.70158,
        start_offset: 0.0,
        end_offset: 1.0,
    };

    #[inline]
    pub fn has_offsets(&self) -> bool {
        self.start_offset != 0.0 || self.end_offset != 1.0
    }

    pub fn with_offsets(mut self, start: f32, end: f32) -> Self {
        self.start_offset = start;
        self.end_offset = end;
        self
    }

    /// Check the parameters against the easing they will drive.
    pub fn validate(&self, easing: Easing) -> Result<(), AnimError> {
        let invalid = |reason: String| Err(AnimError::InvalidEasingParams { reason });
        let fields = [
            self.exponent,
            self.base,
            self.amplitude,
            self.period,
            self.overshoot,
            self.start_offset,
            self.end_offset,
        ];
        if fields.iter().any(|v| !v.is_finite()) {
            return invalid("parameters must be finite".into());
        }
        match easing.curve() {
            Some(Curve::Power) if self.exponent <= 0.0 => {
                return invalid(format!("power exponent {} must be > 0", self.exponent));
            }
            Some(Curve::Exp) if self.base <= 0.0 || self.base == 1.0 => {
                return invalid(format!("exp base {} must be > 0 and != 1", self.base));
            }
            Some(Curve::Elastic) if self.period <= 0.0 => {
                return invalid(format!("elastic period {} must be > 0", self.period));
            }
            _ => {}
        }
        if self.has_offsets() {
            let (s, e) = (self.start_offset, self.end_offset);
            if !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&e) || s >= e {
                return invalid(format!("offsets [{s}, {e}] must satisfy 0 <= start < end <= 1"));
            }
            if (easing.raw(e, self) - easing.raw(s, self)).abs() <= f32::EPSILON {
                return invalid(format!("{easing} is flat over [{s}, {e}]"));
            }
        }
        Ok(())
    }
}
