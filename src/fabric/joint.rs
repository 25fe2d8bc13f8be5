// joint.rs - Point masses
//
// Besides location and velocity a joint carries per-tick accumulators:
// force and interval mass are built up by intervals, absorbed velocity by
// the smoothing pass, gravity by the ground regime. Mass is reset to the
// ambient baseline at the end of every tick.

use bytemuck::{Pod, Zeroable};

use super::Fabric;
use crate::error::{EntityKind, FabricError};
use crate::vector::{self, Vec3};

/// Which side of the body a joint belongs to.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Laterality {
    #[default]
    Middle = 0,
    Right = 1,
    Left = 2,
}

impl From<u8> for Laterality {
    fn from(raw: u8) -> Self {
        match raw {
            1 => Laterality::Right,
            2 => Laterality::Left,
            _ => Laterality::Middle,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Joint {
    pub location: Vec3,
    pub velocity: Vec3,
    pub absorb_velocity: Vec3,
    pub force: Vec3,
    pub gravity: Vec3,
    pub interval_mass: f32,
    /// Height above ground as of the last tick.
    pub altitude: f32,
    laterality: u8,
    _pad: u8,
    pub tag: u16,
}

impl Joint {
    pub fn new(tag: u16, laterality: Laterality, location: Vec3, mass: f32) -> Self {
        Self {
            location,
            interval_mass: mass,
            altitude: location[1],
            laterality: laterality as u8,
            tag,
            ..Zeroable::zeroed()
        }
    }

    pub fn laterality(&self) -> Laterality {
        Laterality::from(self.laterality)
    }
}

impl Fabric {
    /// Hands out tags 1, 2, 3, ... Tags are identities, never indices, and
    /// are never handed out twice.
    pub fn next_joint_tag(&mut self) -> Result<u16, FabricError> {
        let tag = self.joint_tag_count.checked_add(1).ok_or(FabricError::TagsExhausted)?;
        self.joint_tag_count = tag;
        Ok(tag)
    }

    /// Fails unless `count` more tags can be handed out.
    pub(crate) fn ensure_tags(&self, count: u16) -> Result<(), FabricError> {
        if u16::MAX - self.joint_tag_count < count {
            return Err(FabricError::TagsExhausted);
        }
        Ok(())
    }

    pub fn create_joint(&mut self, tag: u16, laterality: Laterality, location: Vec3) -> Result<u16, FabricError> {
        let max = self.layout().max_joints;
        if self.joint_count >= max {
            return Err(FabricError::CapacityExceeded { kind: EntityKind::Joint, max });
        }
        let index = self.joint_count;
        let mass = self.physics.ambient_joint_mass;
        self.arena.stores_mut().joints[index as usize] = Joint::new(tag, laterality, location, mass);
        self.joint_count += 1;
        Ok(index)
    }

    /// Live joints, in index order.
    pub fn joints(&self) -> &[Joint] {
        &self.arena.joints()[..self.joint_count as usize]
    }

    pub fn joint(&self, index: u16) -> Option<&Joint> {
        self.joints().get(index as usize)
    }

    pub(crate) fn joint_or_err(&self, index: u16) -> Result<&Joint, FabricError> {
        self.joint(index).ok_or(FabricError::NoSuchJoint(index))
    }

    pub fn joint_location(&self, index: u16) -> Option<Vec3> {
        self.joint(index).map(|joint| joint.location)
    }

    /// Index of the joint carrying `tag`, if any.
    pub fn find_joint_by_tag(&self, tag: u16) -> Option<u16> {
        self.joints().iter().position(|joint| joint.tag == tag).map(|i| i as u16)
    }

    /// Pulls the body's horizontal center toward the origin by `intensity`
    /// (1 recenters fully, 0 not at all). A non-negative `altitude` also
    /// moves the body vertically so its lowest joint sits at that height.
    pub fn centralize(&mut self, altitude: f32, intensity: f32) {
        let count = self.joint_count as usize;
        if count == 0 {
            return;
        }
        let stores = self.arena.stores_mut();
        let joints = &mut stores.joints[..count];

        let mut x = 0.0;
        let mut z = 0.0;
        let mut low_y = f32::MAX;
        for joint in joints.iter() {
            x += joint.location[0];
            z += joint.location[2];
            low_y = low_y.min(joint.location[1]);
        }
        x /= count as f32;
        z /= count as f32;

        for joint in joints.iter_mut() {
            joint.location[0] -= x * intensity;
            if altitude >= 0.0 {
                joint.location[1] += altitude - low_y;
            }
            joint.location[2] -= z * intensity;
            joint.altitude = joint.location[1];
        }
    }

    /// Sum of ½v² over live joints, with unit mass.
    pub fn kinetic_energy(&self) -> f32 {
        self.joints()
            .iter()
            .map(|joint| vector::dot(&joint.velocity, &joint.velocity) / 2.0)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_reads_back_exactly() {
        let mut fabric = Fabric::with_capacity(3, 1, 1);
        let index = fabric.create_joint(9, Laterality::Left, [0.1, -2.5, 3.75]).unwrap();
        let joint = fabric.joint(index).unwrap();
        assert_eq!(joint.location, [0.1, -2.5, 3.75]);
        assert_eq!(joint.velocity, [0.0; 3]);
        assert_eq!(joint.force, [0.0; 3]);
        assert_eq!(joint.interval_mass, fabric.physics().ambient_joint_mass);
        assert_eq!(joint.laterality(), Laterality::Left);
        assert_eq!(joint.tag, 9);
    }

    #[test]
    fn full_store_refuses_without_counting() {
        let mut fabric = Fabric::with_capacity(2, 1, 1);
        assert_eq!(fabric.create_joint(1, Laterality::Middle, [0.0; 3]).unwrap(), 0);
        assert_eq!(fabric.create_joint(2, Laterality::Middle, [0.0; 3]).unwrap(), 1);
        let err = fabric.create_joint(3, Laterality::Middle, [0.0; 3]).unwrap_err();
        assert!(err.is_capacity());
        assert_eq!(fabric.joint_count(), 2);
    }

    #[test]
    fn tags_start_at_one_and_increase() {
        let mut fabric = Fabric::with_capacity(1, 1, 1);
        assert_eq!(fabric.next_joint_tag().unwrap(), 1);
        assert_eq!(fabric.next_joint_tag().unwrap(), 2);
    }

    #[test]
    fn tags_run_out_instead_of_wrapping() {
        let mut fabric = Fabric::with_capacity(1, 1, 1);
        fabric.joint_tag_count = u16::MAX - 1;
        assert!(fabric.ensure_tags(1).is_ok());
        assert!(fabric.ensure_tags(2).is_err());
        assert_eq!(fabric.next_joint_tag().unwrap(), u16::MAX);
        assert!(matches!(fabric.next_joint_tag(), Err(FabricError::TagsExhausted)));
        assert!(matches!(fabric.next_joint_tag(), Err(FabricError::TagsExhausted)));
    }

    #[test]
    fn centralize_recenters_and_grounds() {
        let mut fabric = Fabric::with_capacity(4, 1, 1);
        fabric.create_joint(1, Laterality::Middle, [2.0, 3.0, 4.0]).unwrap();
        fabric.create_joint(2, Laterality::Middle, [4.0, 5.0, 6.0]).unwrap();
        fabric.centralize(1.0, 1.0);
        assert_eq!(fabric.joint_location(0).unwrap(), [-1.0, 1.0, -1.0]);
        assert_eq!(fabric.joint_location(1).unwrap(), [1.0, 3.0, 1.0]);
    }

    #[test]
    fn centralize_without_altitude_or_intensity_is_idempotent() {
        let mut fabric = Fabric::with_capacity(4, 1, 1);
        fabric.create_joint(1, Laterality::Middle, [2.0, 3.0, 4.0]).unwrap();
        fabric.create_joint(2, Laterality::Middle, [-1.0, 0.5, 7.0]).unwrap();
        fabric.centralize(-1.0, 0.0);
        let once: Vec<Vec3> = fabric.joints().iter().map(|j| j.location).collect();
        fabric.centralize(-1.0, 0.0);
        let twice: Vec<Vec3> = fabric.joints().iter().map(|j| j.location).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn unknown_laterality_reads_as_middle() {
        assert_eq!(Laterality::from(7), Laterality::Middle);
        assert_eq!(Laterality::from(2), Laterality::Left);
    }
}
