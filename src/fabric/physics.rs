// physics.rs - The tick pipeline
//
// One tick, strictly in order:
//   1. age += 1
//   2. intervals: rest length, spring force, stress cache, mass, phase
//   3. intervals: share a little axial velocity between endpoints
//   4. joints: gravity/drag regime, force -> velocity, reset accumulators
//   5. intervals: ground contact gravity to both endpoints
//   6. joints: velocity -> location
//
// Each pass reads what the previous pass left behind, so passes are never
// fused.

use tracing::trace;

use super::behavior::interpolate_current_span;
use super::{Behavior, Fabric, Interval, Joint};
use crate::config::Physics;
use crate::export;
use crate::vector::{self, Vec3};

/// Altitude sum below which a straddling interval averages its ends.
const STRADDLE_MIN: f32 = 0.001;

fn elastic_behavior(interval: &mut Interval, joints: &mut [Joint], behaviors: &[Behavior], physics: &Physics) {
    let phase = interval.phase;
    let ideal_span = interpolate_current_span(interval, joints, behaviors);
    let span = interval.calculate_span(joints);
    let stress = physics.elastic_factor * (span - ideal_span) * ideal_span * ideal_span;

    let alpha = interval.alpha as usize;
    let omega = interval.omega as usize;
    vector::add_scaled(&mut joints[alpha].force, &interval.unit, stress / 2.0);
    vector::add_scaled(&mut joints[omega].force, &interval.unit, -stress / 2.0);

    // Role 0 keeps its span snapshot in the stress slot until it settles.
    let snapshot_held = interval.role == 0 && phase != 0;
    if phase != 1 && !snapshot_held {
        interval.stress = stress;
    }

    let mass = ideal_span * ideal_span * ideal_span / 2.0;
    joints[alpha].interval_mass += mass;
    joints[omega].interval_mass += mass;

    if phase > 0 {
        let next = phase.wrapping_add(physics.phase_step);
        interval.phase = if next < phase { 0 } else { next };
    }
}

fn axial_part(velocity: &Vec3, unit: &Vec3, amount: f32) -> Vec3 {
    let mut projection = *unit;
    vector::scale(&mut projection, vector::dot(velocity, unit) * amount);
    projection
}

fn smooth_velocity(interval: &Interval, joints: &mut [Joint], spring_smooth: f32) {
    let alpha = interval.alpha as usize;
    let omega = interval.omega as usize;
    let alpha_part = axial_part(&joints[alpha].velocity, &interval.unit, spring_smooth);
    let omega_part = axial_part(&joints[omega].velocity, &interval.unit, spring_smooth);
    let mut shared = vector::sum(&alpha_part, &omega_part);
    vector::scale(&mut shared, 0.5);

    let absorb = &mut joints[alpha].absorb_velocity;
    vector::sub(absorb, &alpha_part);
    vector::add(absorb, &shared);
    let absorb = &mut joints[omega].absorb_velocity;
    vector::sub(absorb, &omega_part);
    vector::add(absorb, &shared);
}

fn exert_joint_physics(joint: &mut Joint, physics: &Physics) {
    let altitude = joint.location[1];
    let (gravity, drag) = physics.regime(altitude);
    joint.altitude = altitude;
    vector::set(&mut joint.gravity, 0.0, -gravity, 0.0);
    joint.velocity[1] -= gravity;
    vector::scale(&mut joint.velocity, 1.0 - drag);

    let force = joint.force;
    vector::add_scaled(&mut joint.velocity, &force, 1.0 / joint.interval_mass);
    vector::zero(&mut joint.force);
    let absorbed = joint.absorb_velocity;
    vector::add(&mut joint.velocity, &absorbed);
    vector::zero(&mut joint.absorb_velocity);
}

/// Gravity shared along an interval, weighted toward the end nearer the
/// ground plane when the interval crosses it.
fn contact_gravity(alpha: &Joint, omega: &Joint) -> Vec3 {
    let straddle = (alpha.altitude > 0.0) != (omega.altitude > 0.0);
    let alpha_height = alpha.altitude.abs();
    let omega_height = omega.altitude.abs();
    let total = alpha_height + omega_height;
    let mut gravity = alpha.gravity;
    if straddle && total > STRADDLE_MIN {
        vector::lerp(&mut gravity, &omega.gravity, omega_height / total);
    } else {
        vector::lerp(&mut gravity, &omega.gravity, 0.5);
    }
    gravity
}

impl Fabric {
    /// Advances the simulation by one step.
    pub fn tick(&mut self) {
        let joint_count = self.joint_count as usize;
        let interval_count = self.interval_count as usize;
        let physics = &self.physics;
        let stores = self.arena.stores_mut();
        let joints = &mut stores.joints[..joint_count];
        let intervals = &mut stores.intervals[..interval_count];
        let behaviors = &*stores.behaviors;

        *stores.age = stores.age.wrapping_add(1);

        for interval in intervals.iter_mut() {
            elastic_behavior(interval, joints, behaviors, physics);
        }
        for interval in intervals.iter() {
            smooth_velocity(interval, joints, physics.spring_smooth);
        }
        for joint in joints.iter_mut() {
            exert_joint_physics(joint, physics);
        }
        for interval in intervals.iter() {
            let gravity = contact_gravity(&joints[interval.alpha as usize], &joints[interval.omega as usize]);
            vector::add(&mut joints[interval.alpha as usize].velocity, &gravity);
            vector::add(&mut joints[interval.omega as usize].velocity, &gravity);
        }
        for joint in joints.iter_mut() {
            let velocity = joint.velocity;
            vector::add(&mut joint.location, &velocity);
            joint.interval_mass = physics.ambient_joint_mass;
        }
    }

    /// Runs `ticks` ticks, then refreshes every exported line and face.
    /// Returns the highest interval phase, 0 once every transition has
    /// settled.
    pub fn iterate(&mut self, ticks: u32) -> u16 {
        for _ in 0..ticks {
            self.tick();
        }
        let interval_count = self.interval_count as usize;
        let face_count = self.face_count as usize;
        let stress_max = self.physics.stress_max;
        let mut stores = self.arena.stores_mut();
        let max_phase = export::export_lines(&mut stores, interval_count, stress_max);
        export::export_faces(&mut stores, face_count);
        trace!(ticks, age = *stores.age, max_phase, "iterated");
        max_phase
    }
}
