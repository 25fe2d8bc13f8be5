// interval.rs - Elastic members between two joints
//
// The unit vector and stress are caches refreshed by the tick. The phase is
// a 16-bit clock: 0 means settled at rest length, 1 means just triggered,
// and anything else is partway through a transition.

use bytemuck::{Pod, Zeroable};

use super::{Fabric, Joint, ROLE_COUNT};
use crate::error::{EntityKind, FabricError};
use crate::vector::{self, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Interval {
    /// 0 for plain members, otherwise a behavior row (sign mirrors it).
    pub role: i8,
    _pad: u8,
    pub alpha: u16,
    pub omega: u16,
    pub phase: u16,
    /// Alpha to omega, unit length.
    pub unit: Vec3,
    pub stress: f32,
    pub ideal_span: f32,
}

impl Interval {
    pub fn new(role: i8, alpha: u16, omega: u16) -> Self {
        Self {
            role,
            alpha,
            omega,
            ..Zeroable::zeroed()
        }
    }

    /// Refreshes the unit vector and returns the current length.
    pub fn calculate_span(&mut self, joints: &[Joint]) -> f32 {
        self.unit = vector::difference(
            &joints[self.omega as usize].location,
            &joints[self.alpha as usize].location,
        );
        vector::normalize(&mut self.unit)
    }

    pub fn joins(&self, a: u16, b: u16) -> bool {
        (self.alpha == a && self.omega == b) || (self.alpha == b && self.omega == a)
    }

    pub fn is_triggered(&self) -> bool {
        self.phase != 0
    }
}

pub(crate) fn valid_role(role: i8) -> bool {
    (role.unsigned_abs() as usize) < ROLE_COUNT
}

impl Fabric {
    /// A non-positive `ideal_span` means "rest at the current distance".
    pub fn create_interval(&mut self, role: i8, alpha: u16, omega: u16, ideal_span: f32) -> Result<u16, FabricError> {
        let max = self.layout().max_intervals;
        if self.interval_count >= max {
            return Err(FabricError::CapacityExceeded { kind: EntityKind::Interval, max });
        }
        self.joint_or_err(alpha)?;
        self.joint_or_err(omega)?;
        if !valid_role(role) {
            return Err(FabricError::InvalidRole(role as i16));
        }

        let index = self.interval_count;
        let stores = self.arena.stores_mut();
        let mut interval = Interval::new(role, alpha, omega);
        let span = interval.calculate_span(stores.joints);
        interval.ideal_span = if ideal_span > 0.0 { ideal_span } else { span };
        stores.intervals[index as usize] = interval;
        self.interval_count += 1;
        Ok(index)
    }

    /// Live intervals, in index order.
    pub fn intervals(&self) -> &[Interval] {
        &self.arena.intervals()[..self.interval_count as usize]
    }

    pub fn interval(&self, index: u16) -> Option<&Interval> {
        self.intervals().get(index as usize)
    }

    fn interval_mut(&mut self, index: u16) -> Result<&mut Interval, FabricError> {
        if index >= self.interval_count {
            return Err(FabricError::NoSuchInterval(index));
        }
        Ok(&mut self.arena.stores_mut().intervals[index as usize])
    }

    pub fn calculate_span(&mut self, index: u16) -> Result<f32, FabricError> {
        if index >= self.interval_count {
            return Err(FabricError::NoSuchInterval(index));
        }
        let stores = self.arena.stores_mut();
        Ok(stores.intervals[index as usize].calculate_span(stores.joints))
    }

    /// Starts a transition: the next tick snapshots the current span.
    pub fn trigger_interval(&mut self, index: u16) -> Result<(), FabricError> {
        self.interval_mut(index)?.phase = 1;
        Ok(())
    }

    /// Jumps a transition to `phase`. 0 settles the interval immediately.
    pub fn set_interval_phase(&mut self, index: u16, phase: u16) -> Result<(), FabricError> {
        self.interval_mut(index)?.phase = phase;
        Ok(())
    }

    /// A member turned plain mid-transition restarts it from its current
    /// span.
    pub fn set_interval_role(&mut self, index: u16, role: i8) -> Result<(), FabricError> {
        if !valid_role(role) {
            return Err(FabricError::InvalidRole(role as i16));
        }
        let interval = self.interval_mut(index)?;
        if role == 0 && interval.role != 0 && interval.phase > 1 {
            // The stress slot holds spring stress, not a span snapshot.
            interval.phase = 1;
        }
        interval.role = role;
        Ok(())
    }

    /// Interval joining the two joints, in either order.
    pub fn find_interval_index(&self, a: u16, b: u16) -> Option<u16> {
        self.intervals()
            .iter()
            .position(|interval| interval.joins(a, b))
            .map(|i| i as u16)
    }

    /// Another interval whose endpoint tags are the same pair as this one's.
    /// Alpha/omega order does not matter.
    pub fn find_opposite_interval_index(&self, index: u16) -> Option<u16> {
        let joints = self.joints();
        let interval = self.interval(index)?;
        let tag_alpha = joints[interval.alpha as usize].tag;
        let tag_omega = joints[interval.omega as usize].tag;
        self.intervals()
            .iter()
            .enumerate()
            .filter(|&(other, _)| other != index as usize)
            .find(|(_, other)| {
                let alpha = joints[other.alpha as usize].tag;
                let omega = joints[other.omega as usize].tag;
                (alpha == tag_alpha && omega == tag_omega) || (alpha == tag_omega && omega == tag_alpha)
            })
            .map(|(other, _)| other as u16)
    }

    /// Shifts later intervals down one slot. Their indices and exported
    /// lines move with them.
    pub fn remove_interval(&mut self, index: u16) -> Result<(), FabricError> {
        if index >= self.interval_count {
            return Err(FabricError::NoSuchInterval(index));
        }
        let count = self.interval_count as usize;
        let stores = self.arena.stores_mut();
        let from = index as usize + 1;
        stores.intervals.copy_within(from..count, index as usize);
        stores.line_locations.copy_within(from..count, index as usize);
        stores.line_colors.copy_within(from..count, index as usize);
        self.interval_count -= 1;
        Ok(())
    }
}
