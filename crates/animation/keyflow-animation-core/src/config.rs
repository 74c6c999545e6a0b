//! Evaluator configuration shared by tracks, paths and the document loader.

use serde::{Deserialize, Serialize};

/// Defaults applied when building tracks and paths.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Divisions per curve segment used for the arc-length lookup table.
    pub path_precision: u32,
    /// Catmull-Rom tension used when a path spec does not provide one.
    pub catmull_tension: f32,
    /// Fail track construction on zero-length segments instead of treating
    /// them as an instantaneous jump.
    pub reject_degenerate_segments: bool,
    /// Finite-difference step (in normalized segment time) for easing derivatives.
    pub derivative_epsilon: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path_precision: 64,
            catmull_tension: 0.5,
            reject_degenerate_segments: false,
            derivative_epsilon: 1e-3,
        }
    }
}

impl Config {
    /// Epsilon actually used for derivatives; falls back to the default when
    /// the configured one is unusable.
    pub(crate) fn effective_derivative_epsilon(&self) -> f32 {
        let eps = self.derivative_epsilon;
        if eps.is_finite() && eps > 0.0 && eps < 0.5 {
            eps
        } else {
            Config::default().derivative_epsilon
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: Config = serde_json::from_str(r#"{"reject_degenerate_segments": true}"#).unwrap();
        assert!(cfg.reject_degenerate_segments);
        assert_eq!(cfg.path_precision, 64);
        assert_eq!(cfg.catmull_tension, 0.5);
    }

    #[test]
    fn bad_epsilon_falls_back() {
        let cfg = Config {
            derivative_epsilon: -1.0,
            ..Config::default()
        };
        assert_eq!(cfg.effective_derivative_epsilon(), 1e-3);
    }
}
