// behavior.rs - Per-role rest length oscillation
//
// Every role owns a row of (phase, variation) pairs sorted by phase. An
// interval's rest length at a given phase is its ideal span scaled by the
// variation interpolated between the two entries that bracket the phase.
// The row wraps: the last entry is followed by the first, one cycle later.

use bytemuck::{Pod, Zeroable};
use rand::Rng;

use super::{Fabric, Interval, Joint};
use crate::error::FabricError;

pub const ROLE_COUNT: usize = 64;
pub const VARIATION_COUNT: usize = 3;
/// Largest fractional change a variation of ±1 makes to the ideal span.
pub const SPAN_VARIATION_MAX: f32 = 0.1;

const PHASE_CYCLE: i32 = 65536;
const VARIATION_SCALE: f32 = 32768.0;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Variation {
    pub phase: u16,
    pub variation: i16,
}

impl Variation {
    /// Variation in [-1, 1), negated for mirrored roles.
    fn normalized(&self, mirrored: bool) -> f32 {
        let value = self.variation as f32 / VARIATION_SCALE;
        if mirrored { -value } else { value }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Behavior {
    pub entries: [Variation; VARIATION_COUNT],
}

impl Behavior {
    pub fn randomized<R: Rng>(rng: &mut R) -> Self {
        let mut behavior = Behavior::default();
        for entry in behavior.entries.iter_mut() {
            entry.phase = rng.r#gen::<u16>();
            entry.variation = rng.r#gen::<i16>();
        }
        behavior.sort();
        behavior
    }

    pub fn sort(&mut self) {
        self.entries.sort_by_key(|entry| entry.phase);
    }

    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|pair| pair[0].phase <= pair[1].phase)
    }

    /// Rest length multiplier at `phase`. Phase 0 is always exactly 1.
    pub fn span_multiplier(&self, phase: u16, mirrored: bool) -> f32 {
        if phase == 0 {
            return 1.0;
        }
        let t = phase as i32;
        let first = &self.entries[0];
        let last = &self.entries[VARIATION_COUNT - 1];

        let (before_phase, before) = match self.entries.iter().rev().find(|e| e.phase as i32 <= t) {
            Some(entry) => (entry.phase as i32, entry),
            None => (last.phase as i32 - PHASE_CYCLE, last),
        };
        let (after_phase, after) = match self.entries.iter().find(|e| e.phase as i32 > t) {
            Some(entry) => (entry.phase as i32, entry),
            None => (first.phase as i32 + PHASE_CYCLE, first),
        };

        let progress = (t - before_phase) as f32 / (after_phase - before_phase) as f32;
        let variation = before.normalized(mirrored) * (1.0 - progress) + after.normalized(mirrored) * progress;
        1.0 + SPAN_VARIATION_MAX * variation
    }
}

/// Rest length of `interval` this tick.
///
/// Role 0 holds its ideal span, except while triggered: on the first tick
/// the current span is stored in the stress cache, then the rest length
/// slides from that snapshot to the ideal span as the phase runs out.
pub fn interpolate_current_span(interval: &mut Interval, joints: &[Joint], behaviors: &[Behavior]) -> f32 {
    let ideal = interval.ideal_span;
    let phase = interval.phase;
    if interval.role == 0 {
        if phase == 0 {
            return ideal;
        }
        let original = if phase == 1 {
            let span = interval.calculate_span(joints);
            interval.stress = span;
            span
        } else {
            interval.stress
        };
        let progress = phase as f32 / PHASE_CYCLE as f32;
        original * (1.0 - progress) + ideal * progress
    } else {
        let row = &behaviors[interval.role.unsigned_abs() as usize];
        ideal * row.span_multiplier(phase, interval.role < 0)
    }
}

impl Fabric {
    pub(crate) fn init_behavior<R: Rng>(&mut self, role: usize, rng: &mut R) {
        self.arena.stores_mut().behaviors[role] = Behavior::randomized(rng);
    }

    pub fn behavior(&self, role: u8) -> Option<&Behavior> {
        self.arena.behaviors().get(role as usize)
    }

    fn behavior_row_mut(&mut self, role: u8, variation: usize) -> Result<&mut Behavior, FabricError> {
        if role as usize >= ROLE_COUNT {
            return Err(FabricError::InvalidRole(role as i16));
        }
        if variation >= VARIATION_COUNT {
            return Err(FabricError::InvalidVariation(variation));
        }
        Ok(&mut self.arena.stores_mut().behaviors[role as usize])
    }

    /// Moves one entry in time; the row is re-sorted afterwards, so the
    /// entry may end up at a different position.
    pub fn set_behavior_phase(&mut self, role: u8, variation: usize, phase: u16) -> Result<(), FabricError> {
        let behavior = self.behavior_row_mut(role, variation)?;
        behavior.entries[variation].phase = phase;
        behavior.sort();
        Ok(())
    }

    pub fn set_behavior_variation(&mut self, role: u8, variation: usize, value: i16) -> Result<(), FabricError> {
        let behavior = self.behavior_row_mut(role, variation)?;
        behavior.entries[variation].variation = value;
        behavior.sort();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fabric::tests::triangle;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn row(entries: [(u16, i16); 3]) -> Behavior {
        let mut behavior = Behavior::default();
        for (slot, (phase, variation)) in behavior.entries.iter_mut().zip(entries) {
            *slot = Variation { phase, variation };
        }
        behavior
    }

    #[test]
    fn randomized_rows_are_sorted() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(Behavior::randomized(&mut rng).is_sorted());
        }
    }

    #[test]
    fn multiplier_hits_entries_exactly() {
        let behavior = row([(10000, 16384), (30000, -16384), (50000, 0)]);
        assert!((behavior.span_multiplier(10000, false) - 1.05).abs() < 1e-6);
        assert!((behavior.span_multiplier(30000, false) - 0.95).abs() < 1e-6);
        assert!((behavior.span_multiplier(30000, true) - 1.05).abs() < 1e-6);
    }

    #[test]
    fn multiplier_interpolates_between_entries() {
        let behavior = row([(10000, 16384), (30000, -16384), (50000, 0)]);
        assert!((behavior.span_multiplier(20000, false) - 1.0).abs() < 1e-6);
        assert!((behavior.span_multiplier(40000, false) - 0.975).abs() < 1e-6);
    }

    #[test]
    fn multiplier_wraps_around_the_row() {
        let behavior = row([(10000, 16384), (30000, -16384), (50000, 0)]);
        // Halfway from 50000 to 10000 + 65536.
        let wrapped = behavior.span_multiplier(62768, false);
        assert!((wrapped - 1.025).abs() < 1e-5);
        // Before the first entry, still between the last and the first.
        let early = behavior.span_multiplier(5000, false);
        assert!(early > 1.025 && early < 1.05);
    }

    #[test]
    fn phase_zero_is_at_rest() {
        let behavior = row([(10000, 32767), (30000, 32767), (50000, 32767)]);
        assert_eq!(behavior.span_multiplier(0, false), 1.0);
    }

    #[test]
    fn setters_keep_rows_sorted() {
        let mut fabric = triangle();
        fabric.set_behavior_phase(5, 0, 65535).unwrap();
        let behavior = fabric.behavior(5).unwrap();
        assert!(behavior.is_sorted());
        assert_eq!(behavior.entries[2].phase, 65535);

        fabric.set_behavior_variation(5, 1, -7).unwrap();
        assert!(fabric.behavior(5).unwrap().is_sorted());
        assert!(fabric.behavior(5).unwrap().entries.iter().any(|e| e.variation == -7));

        assert!(fabric.set_behavior_phase(64, 0, 1).is_err());
        assert!(fabric.set_behavior_phase(1, 3, 1).is_err());
    }

    #[test]
    fn role_zero_snapshots_then_slides_to_ideal() {
        let mut fabric = triangle();
        let joints: Vec<Joint> = fabric.joints().to_vec();
        let mut interval = *fabric.interval(0).unwrap();
        interval.ideal_span = 2.0;
        interval.phase = 1;
        let first = interpolate_current_span(&mut interval, &joints, fabric.arena().behaviors());
        assert!((interval.stress - 1.0).abs() < 1e-5);
        assert!((first - 1.0).abs() < 1e-4);

        interval.phase = 32768;
        let halfway = interpolate_current_span(&mut interval, &joints, fabric.arena().behaviors());
        assert!((halfway - 1.5).abs() < 1e-4);
    }
}
