//! Fractal 1-D gradient noise over time, used for wiggles and flicker.

use serde::{Deserialize, Serialize};

use crate::error::AnimError;

/// Interpolation between lattice points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseFunction {
    /// 3t² - 2t³
    Cubic,
    /// 6t⁵ - 15t⁴ + 10t³
    #[default]
    Quintic,
}

impl NoiseFunction {
    #[inline]
    fn curve(self, t: f32) -> f32 {
        match self {
            NoiseFunction::Cubic => (3.0 - 2.0 * t) * t * t,
            NoiseFunction::Quintic => ((6.0 * t - 15.0) * t + 10.0) * t * t * t,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Noise {
    /// Number of summed layers.
    pub octaves: u32,
    /// Frequency multiplier per octave.
    pub lacunarity: f32,
    /// Amplitude multiplier per octave.
    pub gain: f32,
    pub seed: u32,
    pub function: NoiseFunction,
}

/// Octaves past this add detail below f32 resolution.
pub const MAX_OCTAVES: u32 = 32;

impl Default for Noise {
    fn default() -> Self {
        Self {
            octaves: 3,
            lacunarity: 2.0,
            gain: 0.5,
            seed: 0x5072_6e67, // "Prng"
            function: NoiseFunction::Quintic,
        }
    }
}

/// xorshift64* step
#[inline]
fn hash(mut x: u64) -> u64 {
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    x.wrapping_mul(0x2545_F491_4F6C_DD1D)
}

/// Uniform double in [0, 1) from the top 52 bits.
#[inline]
fn unit_f64(x: u64) -> f64 {
    f64::from_bits((0x3FF_u64 << 52) | (x >> 12)) - 1.0
}

impl Noise {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), AnimError> {
        if self.octaves == 0 || self.octaves > MAX_OCTAVES {
            return Err(AnimError::InvalidNoise {
                reason: format!(
                    "octaves must be in [1, {MAX_OCTAVES}], got {}",
                    self.octaves
                ),
            });
        }
        if !self.lacunarity.is_finite() || !self.gain.is_finite() {
            return Err(AnimError::InvalidNoise {
                reason: "lacunarity and gain must be finite".into(),
            });
        }
        let mut amp_sum = 0.0f32;
        let mut amp = 1.0f32;
        for _ in 0..self.octaves {
            amp_sum += amp;
            amp *= self.gain;
        }
        if amp_sum == 0.0 || !amp_sum.is_finite() {
            return Err(AnimError::InvalidNoise {
                reason: format!("gain {} gives a degenerate amplitude sum", self.gain),
            });
        }
        Ok(())
    }

    /// Single octave in [-1, 1).
    fn octave(&self, v: f32) -> f32 {
        let i = v.floor();
        let f = v - i;
        let x = (i as i64 as u64).wrapping_add(self.seed as u64);

        // Random slopes at both lattice points, rescaled from [0, 1) to [-1, 1).
        let s0 = (unit_f64(hash(x)) * 2.0 - 1.0) as f32;
        let s1 = (unit_f64(hash(x.wrapping_add(1))) * 2.0 - 1.0) as f32;

        let v0 = f * s0;
        let v1 = (f - 1.0) * s1;
        let t = self.function.curve(f);
        (v0 + (v1 - v0) * t) * 2.0
    }

    /// Noise value at time `t`, normalized by the summed octave amplitudes.
    pub fn evaluate(&self, t: f32) -> Result<f32, AnimError> {
        self.validate()?;
        if t.is_nan() {
            return Err(AnimError::InvalidTime { time: t });
        }
        let mut sum = 0.0f32;
        let mut max_amp = 0.0f32;
        let mut freq = 1.0f32;
        let mut amp = 1.0f32;
        for _ in 0..self.octaves {
            sum += self.octave(t * freq) * amp;
            max_amp += amp;
            freq *= self.lacunarity;
            amp *= self.gain;
        }
        Ok(sum / max_amp)
    }
}
