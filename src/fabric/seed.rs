// seed.rs - The starting body: a bipyramid
//
// A ring of joints on the ground plane with one apex above and one below.
// Faces alternate top, bottom, top, ... around the ring, so faces 0, 2 and
// 4 are all on the upper half.

use std::f32::consts::TAU;

use tracing::debug;

use super::{Fabric, Laterality};
use crate::error::FabricError;
use crate::vector::Vec3;

const SIDE_EPSILON: f32 = 0.001;

fn laterality_of(location: &Vec3) -> Laterality {
    if location[2] > SIDE_EPSILON {
        Laterality::Right
    } else if location[2] < -SIDE_EPSILON {
        Laterality::Left
    } else {
        Laterality::Middle
    }
}

impl Fabric {
    /// Builds a bipyramid around `corners` ring joints and stands it with
    /// its lowest joint at `altitude`. Nothing is created unless all of it
    /// fits.
    pub fn create_seed(&mut self, corners: u16, altitude: f32) -> Result<(), FabricError> {
        if corners < 3 {
            return Err(FabricError::InvalidCorners(corners));
        }
        self.ensure_room(
            corners.saturating_add(2),
            corners.saturating_mul(3),
            corners.saturating_mul(2),
        )?;
        self.ensure_tags(corners.saturating_add(2))?;

        let mut ring = Vec::with_capacity(corners as usize);
        for corner in 0..corners {
            let angle = TAU * corner as f32 / corners as f32;
            let location = [angle.cos(), 0.0, angle.sin()];
            let tag = self.next_joint_tag()?;
            ring.push(self.create_joint(tag, laterality_of(&location), location)?);
        }
        let tag = self.next_joint_tag()?;
        let top = self.create_joint(tag, Laterality::Middle, [0.0, 1.0, 0.0])?;
        let tag = self.next_joint_tag()?;
        let bottom = self.create_joint(tag, Laterality::Middle, [0.0, -1.0, 0.0])?;

        for (i, &joint) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            self.create_interval(0, joint, next, 0.0)?;
            self.create_interval(0, top, joint, 0.0)?;
            self.create_interval(0, bottom, joint, 0.0)?;
        }
        for (i, &joint) in ring.iter().enumerate() {
            let next = ring[(i + 1) % ring.len()];
            self.create_face(top, next, joint)?;
            self.create_face(bottom, joint, next)?;
        }

        self.centralize(altitude, 1.0);
        debug!(
            corners,
            joints = self.joint_count,
            intervals = self.interval_count,
            faces = self.face_count,
            "seed created"
        );
        Ok(())
    }
}
