//! Interpolation helpers:
//! - lerp_* (component-wise)
//! - quaternion NLERP / SLERP with shortest-arc correction
//! - linear_value (Value dispatch)
//! - cubic Bezier evaluation for path segments

use crate::value::{Value, Vec3};

/// Below this angle cosine SLERP falls back to NLERP.
const SLERP_NLERP_THRESHOLD: f32 = 0.9995;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_array<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    let mut out = a;
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = lerp_f32(*x, *y, t);
    }
    out
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        for c in q.iter_mut() {
            *c *= inv_len;
        }
    }
    q
}

#[inline]
fn negate4(q: [f32; 4]) -> [f32; 4] {
    [-q[0], -q[1], -q[2], -q[3]]
}

/// Quaternion NLERP with shortest-arc correction.
/// If dot < 0, negate the second quaternion to ensure the shortest path.
/// Returns a normalized quaternion (x,y,z,w).
#[inline]
pub fn nlerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    if dot4(a, b) < 0.0 {
        b = negate4(b);
    }
    normalize4(lerp_array(a, b, t))
}

/// Quaternion SLERP along the shortest arc. Nearly parallel inputs use NLERP
/// to avoid dividing by a vanishing sine.
pub fn slerp_quat(a: [f32; 4], mut b: [f32; 4], t: f32) -> [f32; 4] {
    let mut d = dot4(a, b);
    if d < 0.0 {
        b = negate4(b);
        d = -d;
    }
    if d > SLERP_NLERP_THRESHOLD {
        return nlerp_quat(a, b, t);
    }
    let theta0 = d.clamp(-1.0, 1.0).acos();
    let theta = theta0 * t;
    let sin0 = theta0.sin();
    let s1 = theta.sin() / sin0;
    let s0 = theta.cos() - d * s1;
    [
        s0 * a[0] + s1 * b[0],
        s0 * a[1] + s1 * b[1],
        s0 * a[2] + s1 * b[2],
        s0 * a[3] + s1 * b[3],
    ]
}

/// Interpolate two values of the same kind by an (already eased) fraction.
/// Vectors blend per component, quaternions use SLERP.
/// Returns `None` when the kinds differ.
pub fn linear_value(a: &Value, b: &Value, t: f32) -> Option<Value> {
    match (a, b) {
        (Value::Scalar(va), Value::Scalar(vb)) => Some(Value::Scalar(lerp_f32(*va, *vb, t))),
        (Value::Vec2(va), Value::Vec2(vb)) => Some(Value::Vec2(lerp_array(*va, *vb, t))),
        (Value::Vec3(va), Value::Vec3(vb)) => Some(Value::Vec3(lerp_array(*va, *vb, t))),
        (Value::Vec4(va), Value::Vec4(vb)) => Some(Value::Vec4(lerp_array(*va, *vb, t))),
        (Value::Quat(qa), Value::Quat(qb)) => Some(Value::Quat(slerp_quat(*qa, *qb, t))),
        _ => None,
    }
}

/// `(b - a) * scale` per component. Rotations have no meaningful
/// component-wise rate, so quaternions return `None`.
pub fn scaled_difference(a: &Value, b: &Value, scale: f32) -> Option<Value> {
    fn diff<const N: usize>(a: [f32; N], b: [f32; N], scale: f32) -> [f32; N] {
        let mut out = [0.0; N];
        for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
            *o = (y - x) * scale;
        }
        out
    }
    match (a, b) {
        (Value::Scalar(va), Value::Scalar(vb)) => Some(Value::Scalar((vb - va) * scale)),
        (Value::Vec2(va), Value::Vec2(vb)) => Some(Value::Vec2(diff(*va, *vb, scale))),
        (Value::Vec3(va), Value::Vec3(vb)) => Some(Value::Vec3(diff(*va, *vb, scale))),
        (Value::Vec4(va), Value::Vec4(vb)) => Some(Value::Vec4(diff(*va, *vb, scale))),
        _ => None,
    }
}

/// Unit direction from `a` to `b`, scaled by `scale`. Only 2D and 3D
/// vectors have a direction; coincident points give zero.
pub fn scaled_direction(a: &Value, b: &Value, scale: f32) -> Option<Value> {
    fn dir<const N: usize>(a: [f32; N], b: [f32; N], scale: f32) -> [f32; N] {
        let mut out = [0.0; N];
        for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
            *o = y - x;
        }
        let len = out.iter().map(|c| c * c).sum::<f32>().sqrt();
        if len > 0.0 {
            let k = scale / len;
            for o in out.iter_mut() {
                *o *= k;
            }
        }
        out
    }
    match (a, b) {
        (Value::Vec2(va), Value::Vec2(vb)) => Some(Value::Vec2(dir(*va, *vb, scale))),
        (Value::Vec3(va), Value::Vec3(vb)) => Some(Value::Vec3(dir(*va, *vb, scale))),
        _ => None,
    }
}

/// Point on a cubic Bezier curve at parameter `t`.
///
/// B(t) = (1 - t)^3 P0 + 3 (1 - t)^2 t P1 + 3 (1 - t) t^2 P2 + t^3 P3
///
/// The Bernstein form returns `p0` exactly at `t = 0` and `p3` exactly at `t = 1`.
#[inline]
pub fn cubic_bezier_vec3(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let u = 1.0 - t;
    let f0 = u * u * u;
    let f1 = 3.0 * u * u * t;
    let f2 = 3.0 * u * t * t;
    let f3 = t * t * t;
    [
        f0 * p0[0] + f1 * p1[0] + f2 * p2[0] + f3 * p3[0],
        f0 * p0[1] + f1 * p1[1] + f2 * p2[1] + f3 * p3[1],
        f0 * p0[2] + f1 * p1[2] + f2 * p2[2] + f3 * p3[2],
    ]
}

#[inline]
pub fn distance_vec3(a: Vec3, b: Vec3) -> f32 {
    let d = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}
