// export.rs - Write render geometry into the arena's output regions
//
// Output layout (read by the host straight from memory):
//   line locations   alpha, omega location per interval
//   line colors      same color at both ends, red = pushing, blue = pulling
//   face midpoints   mean of the three corners
//   face normals     face normal bent toward each corner
//   face locations   the three corners

use crate::arena::{FaceVectors, StoresMut};
use crate::fabric::Interval;
use crate::vector::{self, Vec3};

/// How far each corner normal leans toward its corner.
const NORMAL_PUSH: f32 = 0.7;

/// Color for a stress already divided by the saturation stress.
pub fn stress_color(stress: f32) -> Vec3 {
    let s = stress.clamp(-1.0, 1.0);
    [0.6 - s * 0.4, 0.0, 0.6 + s * 0.4]
}

fn shows_stress(interval: &Interval) -> bool {
    // The stress cache holds a span snapshot during a role 0 transition,
    // and nothing meaningful on the tick a trigger lands.
    !(interval.phase == 1 || (interval.role == 0 && interval.phase != 0))
}

/// Copies line endpoints and stress colors for every live interval and
/// returns the highest phase seen.
pub fn export_lines(stores: &mut StoresMut<'_>, interval_count: usize, stress_max: f32) -> u16 {
    let mut max_phase = 0;
    for (i, interval) in stores.intervals[..interval_count].iter().enumerate() {
        stores.line_locations[i] = [
            stores.joints[interval.alpha as usize].location,
            stores.joints[interval.omega as usize].location,
        ];
        let stress = if shows_stress(interval) {
            interval.stress / stress_max.max(f32::EPSILON)
        } else {
            0.0
        };
        let color = stress_color(stress);
        stores.line_colors[i] = [color, color];
        max_phase = max_phase.max(interval.phase);
    }
    max_phase
}

/// Midpoint and per-corner normals for a triangle.
///
/// The face normal follows the winding (corner 1 - corner 0) x
/// (corner 2 - corner 0); each corner gets that normal pushed toward the
/// corner and renormalized, for cheap smooth-looking shading.
pub fn face_geometry(corners: &FaceVectors) -> (Vec3, FaceVectors) {
    let mut midpoint = vector::ZERO;
    for corner in corners {
        vector::add(&mut midpoint, corner);
    }
    vector::scale(&mut midpoint, 1.0 / 3.0);

    let mut normal = vector::cross(
        &vector::difference(&corners[1], &corners[0]),
        &vector::difference(&corners[2], &corners[0]),
    );
    vector::normalize(&mut normal);

    let mut normals = [normal; 3];
    for (corner_normal, corner) in normals.iter_mut().zip(corners) {
        let mut push = vector::difference(corner, &midpoint);
        vector::normalize(&mut push);
        vector::add_scaled(corner_normal, &push, NORMAL_PUSH);
        vector::normalize(corner_normal);
    }
    (midpoint, normals)
}

pub fn export_face(stores: &mut StoresMut<'_>, face_index: usize) {
    let joints = stores.faces[face_index].joints;
    let corners = joints.map(|joint| stores.joints[joint as usize].location);
    let (midpoint, normals) = face_geometry(&corners);
    stores.face_locations[face_index] = corners;
    stores.face_midpoints[face_index] = midpoint;
    stores.face_normals[face_index] = normals;
}

pub fn export_faces(stores: &mut StoresMut<'_>, face_count: usize) {
    for face_index in 0..face_count {
        export_face(stores, face_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Physics;

    #[test]
    fn stress_color_saturates() {
        assert_eq!(stress_color(0.0), [0.6, 0.0, 0.6]);
        assert_eq!(stress_color(5.0), stress_color(1.0));
        let pulled = stress_color(1.0);
        assert!((pulled[0] - 0.2).abs() < 1e-6 && (pulled[2] - 1.0).abs() < 1e-6);
        let pushed = stress_color(-1.0);
        assert!((pushed[0] - 1.0).abs() < 1e-6 && (pushed[2] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn zero_saturation_stress_still_gives_colors() {
        let mut fabric = crate::fabric::tests::triangle();
        let physics = Physics { stress_max: 0.0, ..Physics::default() };
        fabric.set_physics(physics);
        fabric.iterate(1);
        let colors = &fabric.arena().line_colors()[..fabric.interval_count() as usize];
        assert!(colors.iter().flatten().flatten().all(|c| c.is_finite()));
    }

    #[test]
    fn face_geometry_of_a_flat_triangle() {
        let corners = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let (midpoint, normals) = face_geometry(&corners);
        assert!((midpoint[0] - 1.0 / 3.0).abs() < 1e-6);
        assert!((midpoint[1] - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(midpoint[2], 0.0);
        for (normal, corner) in normals.iter().zip(&corners) {
            assert!((vector::length(normal) - 1.0).abs() < 1e-4);
            // Still facing +z, leaning toward its own corner.
            assert!(normal[2] > 0.0);
            let outward = vector::difference(corner, &midpoint);
            assert!(vector::dot(normal, &outward) > 0.0);
        }
    }

    #[test]
    fn degenerate_face_stays_finite() {
        let corners = [[1.0, 1.0, 1.0]; 3];
        let (midpoint, normals) = face_geometry(&corners);
        assert!(midpoint.iter().all(|c| c.is_finite()));
        assert!(normals.iter().flatten().all(|c| c.is_finite()));
    }
}
