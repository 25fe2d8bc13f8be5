// unfold.rs - Erect a tetrahedron on a face
//
// The face is replaced by three faces meeting at a new apex joint. The
// hinge picks which edge the apex leans toward: corners are rotated so the
// hinge edge is (corner 0, corner 1), and the first new face sits on it.

use crate::error::FabricError;
use crate::fabric::Fabric;
use crate::vector::{self, Vec3};

const APEX_LEAN: f32 = 0.5;

impl Fabric {
    /// Replaces `face` with three faces around a new apex and returns their
    /// indices, hinge edge first. Any index held before the call is stale
    /// afterwards.
    ///
    /// Room for everything is checked before anything changes, so a
    /// capacity error leaves the fabric untouched.
    pub fn unfold(&mut self, face: u16, hinge: usize) -> Result<[u16; 3], FabricError> {
        if hinge > 2 {
            return Err(FabricError::InvalidHinge(hinge));
        }
        let joints = self.face_or_err(face)?.joints;
        let corners = [joints[hinge], joints[(hinge + 1) % 3], joints[(hinge + 2) % 3]];
        let edges = [(corners[0], corners[1]), (corners[1], corners[2]), (corners[2], corners[0])];
        let missing = edges
            .iter()
            .filter(|&&(a, b)| self.find_interval_index(a, b).is_none())
            .count() as u16;
        self.ensure_room(1, 3 + missing, 2)?;
        self.ensure_tags(1)?;

        let locations: [Vec3; 3] = corners.map(|joint| self.joints()[joint as usize].location);
        let span = match self.face_average_ideal_span(face)? {
            Some(span) => span,
            None => {
                let [a, b, c] = &locations;
                (vector::distance(a, b) + vector::distance(b, c) + vector::distance(c, a)) / 3.0
            }
        };
        let laterality = self.face_laterality(face)?;

        let mut midpoint = vector::ZERO;
        for location in &locations {
            vector::add(&mut midpoint, location);
        }
        vector::scale(&mut midpoint, 1.0 / 3.0);
        let mut hinge_midpoint = vector::sum(&locations[0], &locations[1]);
        vector::scale(&mut hinge_midpoint, 0.5);
        let mut normal = vector::cross(
            &vector::difference(&locations[1], &locations[0]),
            &vector::difference(&locations[2], &locations[0]),
        );
        vector::normalize(&mut normal);

        let mut apex_location = midpoint;
        vector::lerp(&mut apex_location, &hinge_midpoint, APEX_LEAN);
        vector::add_scaled(&mut apex_location, &normal, span * (2.0f32 / 3.0).sqrt());

        self.remove_face(face)?;
        let tag = self.next_joint_tag()?;
        let apex = self.create_joint(tag, laterality, apex_location)?;
        for corner in corners {
            self.create_interval(0, corner, apex, span)?;
        }
        for (a, b) in edges {
            if self.find_interval_index(a, b).is_none() {
                self.create_interval(0, a, b, 0.0)?;
            }
        }
        Ok([
            self.create_face(corners[0], corners[1], apex)?,
            self.create_face(corners[1], corners[2], apex)?,
            self.create_face(corners[2], corners[0], apex)?,
        ])
    }
}
