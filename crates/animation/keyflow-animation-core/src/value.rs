//! Animated value kinds: scalars, small vectors and rotations.

use serde::{Deserialize, Serialize};

/// 3D position produced by paths.
pub type Vec3 = [f32; 3];

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Quat,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    Scalar(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Quaternion (x, y, z, w)
    Quat([f32; 4]),
}

impl Value {
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Scalar(_) => ValueKind::Scalar,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Vec4(_) => ValueKind::Vec4,
            Value::Quat(_) => ValueKind::Quat,
        }
    }

    /// Flat view of the components.
    #[inline]
    pub fn components(&self) -> &[f32] {
        match self {
            Value::Scalar(v) => std::slice::from_ref(v),
            Value::Vec2(v) => v,
            Value::Vec3(v) => v,
            Value::Vec4(v) | Value::Quat(v) => v,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            Value::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.components().iter().all(|c| c.is_finite())
    }

    /// Zero value of the given kind (identity quaternion for `Quat`).
    pub fn zero(kind: ValueKind) -> Value {
        match kind {
            ValueKind::Scalar => Value::Scalar(0.0),
            ValueKind::Vec2 => Value::Vec2([0.0; 2]),
            ValueKind::Vec3 => Value::Vec3([0.0; 3]),
            ValueKind::Vec4 => Value::Vec4([0.0; 4]),
            ValueKind::Quat => Value::Quat([0.0, 0.0, 0.0, 1.0]),
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(v)
    }
}

impl From<[f32; 2]> for Value {
    fn from(v: [f32; 2]) -> Self {
        Value::Vec2(v)
    }
}

impl From<[f32; 3]> for Value {
    fn from(v: [f32; 3]) -> Self {
        Value::Vec3(v)
    }
}

impl From<[f32; 4]> for Value {
    fn from(v: [f32; 4]) -> Self {
        Value::Vec4(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_json_shape() {
        let v = Value::Vec3([0.0, 1.0, 0.0]);
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json, serde_json::json!({"type": "Vec3", "data": [0.0, 1.0, 0.0]}));
    }

    #[test]
    fn components_match_kind() {
        assert_eq!(Value::Scalar(2.0).components(), &[2.0]);
        assert_eq!(Value::Quat([0.0, 0.0, 0.0, 1.0]).components().len(), 4);
        assert_eq!(Value::zero(ValueKind::Quat), Value::Quat([0.0, 0.0, 0.0, 1.0]));
    }
}
