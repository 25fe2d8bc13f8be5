// vector.rs - In-place 3-component float operations
//
// Records in the arena store vectors as plain [f32; 3]. These helpers
// mutate them where they sit: no allocation, no wrapper type.

pub type Vec3 = [f32; 3];

pub const ZERO: Vec3 = [0.0; 3];

/// Added to every quadrance so normalizing a degenerate vector stays finite.
pub const EPSILON: f32 = 0.00000001;

#[inline(always)]
pub fn set(v: &mut Vec3, x: f32, y: f32, z: f32) {
    *v = [x, y, z];
}

#[inline(always)]
pub fn zero(v: &mut Vec3) {
    *v = ZERO;
}

#[inline(always)]
pub fn add(v: &mut Vec3, o: &Vec3) {
    v[0] += o[0];
    v[1] += o[1];
    v[2] += o[2];
}

#[inline(always)]
pub fn sub(v: &mut Vec3, o: &Vec3) {
    v[0] -= o[0];
    v[1] -= o[1];
    v[2] -= o[2];
}

#[inline(always)]
pub fn add_scaled(v: &mut Vec3, o: &Vec3, s: f32) {
    v[0] += o[0] * s;
    v[1] += o[1] * s;
    v[2] += o[2] * s;
}

#[inline(always)]
pub fn scale(v: &mut Vec3, s: f32) {
    v[0] *= s;
    v[1] *= s;
    v[2] *= s;
}

#[inline(always)]
pub fn sum(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline(always)]
pub fn difference(a: &Vec3, b: &Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline(always)]
pub fn dot(a: &Vec3, b: &Vec3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline(always)]
pub fn cross(a: &Vec3, b: &Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Moves `v` toward `o` by `t` (0 keeps `v`, 1 lands on `o`).
#[inline(always)]
pub fn lerp(v: &mut Vec3, o: &Vec3, t: f32) {
    let anti = 1.0 - t;
    v[0] = v[0] * anti + o[0] * t;
    v[1] = v[1] * anti + o[1] * t;
    v[2] = v[2] * anti + o[2] * t;
}

#[inline(always)]
pub fn quadrance(v: &Vec3) -> f32 {
    v[0] * v[0] + v[1] * v[1] + v[2] * v[2] + EPSILON
}

#[inline(always)]
pub fn length(v: &Vec3) -> f32 {
    quadrance(v).sqrt()
}

pub fn distance(a: &Vec3, b: &Vec3) -> f32 {
    let d = difference(a, b);
    (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt()
}

/// Scales `v` to unit length and returns its previous length.
#[inline(always)]
pub fn normalize(v: &mut Vec3) -> f32 {
    let len = length(v);
    scale(v, 1.0 / len);
    len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross(&[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn lerp_moves_every_component() {
        let mut v = [0.0, 0.0, 0.0];
        lerp(&mut v, &[2.0, 4.0, 8.0], 0.5);
        assert_eq!(v, [1.0, 2.0, 4.0]);
    }

    #[test]
    fn normalizing_zero_stays_finite() {
        let mut v = ZERO;
        normalize(&mut v);
        assert!(v.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn normalize_returns_length() {
        let mut v = [3.0, 4.0, 0.0];
        let len = normalize(&mut v);
        assert!((len - 5.0).abs() < 1e-5);
        assert!((v[0] - 0.6).abs() < 1e-5);
        assert!((v[1] - 0.8).abs() < 1e-5);
    }
}
