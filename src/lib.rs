use wasm_bindgen::prelude::*;

pub mod arena;
pub mod config;
pub mod error;
pub mod export;
pub mod fabric;
pub mod growth;
pub mod vector;

pub use config::{FabricConfig, Physics};
pub use error::{EntityKind, FabricError};
pub use fabric::{Behavior, Fabric, Face, Interval, Joint, Laterality, Variation};
pub use growth::{GeneSequence, GeneSource, Growth, SeededGenes};

use tracing::debug;

// ============================================================================
// FABRIC WORLD - Host entry points over one fabric arena
// ============================================================================

/// Returned by create calls that were refused.
pub const SENTINEL: u16 = 65535;

/// Faces a fresh seed grows from: alternate top faces.
const GROWTH_FACES: [u16; 3] = [0, 2, 4];

fn index_or_sentinel(result: Result<u16, FabricError>) -> u16 {
    result.unwrap_or_else(|err| {
        debug!(%err, "refused");
        SENTINEL
    })
}

fn succeeded(result: Result<(), FabricError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            debug!(%err, "refused");
            false
        }
    }
}

#[wasm_bindgen]
pub struct FabricWorld {
    fabric: Fabric,
}

#[wasm_bindgen]
impl FabricWorld {
    /// Reserves an arena for the given capacities. Without a seed the
    /// behavior table is drawn from the host's random source.
    #[wasm_bindgen(constructor)]
    pub fn new(max_joints: u16, max_intervals: u16, max_faces: u16, seed: Option<u32>) -> Self {
        let seed = match seed {
            Some(seed) => seed as u64,
            None => (js_sys::Math::random() * u32::MAX as f64) as u64,
        };
        let config = FabricConfig {
            max_joints,
            max_intervals,
            max_faces,
            seed,
            ..FabricConfig::default()
        };
        Self { fabric: Fabric::new(&config) }
    }

    pub fn clear(&mut self) {
        self.fabric.clear();
    }

    // Memory

    pub fn base_ptr(&self) -> *const u8 { self.fabric.arena().as_ptr() }
    pub fn byte_size(&self) -> usize { self.fabric.layout().reserved_bytes }
    pub fn line_locations_offset(&self) -> usize { self.fabric.layout().line_locations }
    pub fn line_colors_offset(&self) -> usize { self.fabric.layout().line_colors }
    pub fn face_midpoints_offset(&self) -> usize { self.fabric.layout().face_midpoints }
    pub fn face_normals_offset(&self) -> usize { self.fabric.layout().face_normals }
    pub fn face_locations_offset(&self) -> usize { self.fabric.layout().face_locations }
    pub fn joints_offset(&self) -> usize { self.fabric.layout().joints }
    pub fn intervals_offset(&self) -> usize { self.fabric.layout().intervals }
    pub fn faces_offset(&self) -> usize { self.fabric.layout().faces }
    pub fn behaviors_offset(&self) -> usize { self.fabric.layout().behaviors }
    pub fn age_offset(&self) -> usize { self.fabric.layout().age }

    // Counts

    pub fn age(&self) -> u32 { self.fabric.age() }
    pub fn joint_count(&self) -> u16 { self.fabric.joint_count() }
    pub fn interval_count(&self) -> u16 { self.fabric.interval_count() }
    pub fn face_count(&self) -> u16 { self.fabric.face_count() }

    // Joints

    /// 0 once every tag has been handed out; 0 is never a tag.
    pub fn next_joint_tag(&mut self) -> u16 {
        self.fabric.next_joint_tag().unwrap_or_else(|err| {
            debug!(%err, "refused");
            0
        })
    }

    pub fn create_joint(&mut self, tag: u16, laterality: u8, x: f32, y: f32, z: f32) -> u16 {
        index_or_sentinel(self.fabric.create_joint(tag, Laterality::from(laterality), [x, y, z]))
    }

    /// `[x, y, z]`, empty for an unknown joint.
    pub fn joint_location(&self, index: u16) -> Vec<f32> {
        self.fabric.joint_location(index).map(Vec::from).unwrap_or_default()
    }

    pub fn joint_tag(&self, index: u16) -> u16 {
        self.fabric.joint(index).map_or(SENTINEL, |joint| joint.tag)
    }

    pub fn joint_laterality(&self, index: u16) -> u8 {
        self.fabric.joint(index).map_or(0, |joint| joint.laterality() as u8)
    }

    pub fn centralize(&mut self, altitude: f32, intensity: f32) {
        self.fabric.centralize(altitude, intensity);
    }

    // Intervals

    pub fn create_interval(&mut self, role: i8, alpha: u16, omega: u16, ideal_span: f32) -> u16 {
        index_or_sentinel(self.fabric.create_interval(role, alpha, omega, ideal_span))
    }

    pub fn remove_interval(&mut self, index: u16) -> bool {
        succeeded(self.fabric.remove_interval(index))
    }

    /// Current length, or 0 for an unknown interval.
    pub fn calculate_span(&mut self, index: u16) -> f32 {
        self.fabric.calculate_span(index).unwrap_or(0.0)
    }

    pub fn trigger_interval(&mut self, index: u16) -> bool {
        succeeded(self.fabric.trigger_interval(index))
    }

    pub fn set_interval_role(&mut self, index: u16, role: i8) -> bool {
        succeeded(self.fabric.set_interval_role(index, role))
    }

    /// Interval capacity when there is none.
    pub fn find_interval_index(&self, alpha: u16, omega: u16) -> u16 {
        self.fabric
            .find_interval_index(alpha, omega)
            .unwrap_or(self.fabric.layout().max_intervals)
    }

    /// Interval capacity when there is none.
    pub fn find_opposite_interval_index(&self, index: u16) -> u16 {
        self.fabric
            .find_opposite_interval_index(index)
            .unwrap_or(self.fabric.layout().max_intervals)
    }

    pub fn interval_role(&self, index: u16) -> i8 {
        self.fabric.interval(index).map_or(0, |interval| interval.role)
    }

    pub fn interval_alpha(&self, index: u16) -> u16 {
        self.fabric.interval(index).map_or(SENTINEL, |interval| interval.alpha)
    }

    pub fn interval_omega(&self, index: u16) -> u16 {
        self.fabric.interval(index).map_or(SENTINEL, |interval| interval.omega)
    }

    pub fn interval_phase(&self, index: u16) -> u16 {
        self.fabric.interval(index).map_or(0, |interval| interval.phase)
    }

    pub fn interval_stress(&self, index: u16) -> f32 {
        self.fabric.interval(index).map_or(0.0, |interval| interval.stress)
    }

    pub fn interval_ideal_span(&self, index: u16) -> f32 {
        self.fabric.interval(index).map_or(0.0, |interval| interval.ideal_span)
    }

    // Faces

    pub fn create_face(&mut self, joint0: u16, joint1: u16, joint2: u16) -> u16 {
        index_or_sentinel(self.fabric.create_face(joint0, joint1, joint2))
    }

    pub fn remove_face(&mut self, index: u16) -> bool {
        succeeded(self.fabric.remove_face(index))
    }

    /// One past the live faces when there is none.
    pub fn find_opposite_face_index(&self, index: u16) -> u16 {
        self.fabric
            .find_opposite_face_index(index)
            .unwrap_or(self.fabric.face_count().saturating_add(1))
    }

    pub fn face_joint(&self, index: u16, corner: u8) -> u16 {
        self.fabric
            .face(index)
            .and_then(|face| face.joints.get(corner as usize).copied())
            .unwrap_or(SENTINEL)
    }

    pub fn face_laterality(&self, index: u16) -> u8 {
        self.fabric.face_laterality(index).map_or(0, |laterality| laterality as u8)
    }

    pub fn face_average_ideal_span(&self, index: u16) -> f32 {
        match self.fabric.face_average_ideal_span(index) {
            Ok(Some(span)) => span,
            _ => 0.0,
        }
    }

    // Behavior

    pub fn behavior_phase(&self, role: u8, variation: u8) -> u16 {
        self.fabric
            .behavior(role)
            .and_then(|row| row.entries.get(variation as usize))
            .map_or(0, |entry| entry.phase)
    }

    pub fn behavior_variation(&self, role: u8, variation: u8) -> i16 {
        self.fabric
            .behavior(role)
            .and_then(|row| row.entries.get(variation as usize))
            .map_or(0, |entry| entry.variation)
    }

    pub fn set_behavior_phase(&mut self, role: u8, variation: u8, phase: u16) -> bool {
        succeeded(self.fabric.set_behavior_phase(role, variation as usize, phase))
    }

    pub fn set_behavior_variation(&mut self, role: u8, variation: u8, value: i16) -> bool {
        succeeded(self.fabric.set_behavior_variation(role, variation as usize, value))
    }

    // Simulation and growth

    /// Highest interval phase after the ticks; 0 once everything settled.
    pub fn iterate(&mut self, ticks: u32) -> u16 {
        self.fabric.iterate(ticks)
    }

    pub fn create_seed(&mut self, corners: u16, altitude: f32) -> bool {
        succeeded(self.fabric.create_seed(corners, altitude))
    }

    /// The three new face indices, or nothing if the unfold was refused.
    pub fn unfold(&mut self, face: u16, hinge: u8) -> Vec<u16> {
        match self.fabric.unfold(face, hinge as usize) {
            Ok(faces) => faces.to_vec(),
            Err(err) => {
                debug!(%err, face, hinge, "unfold refused");
                Vec::new()
            }
        }
    }

    /// Grows a seeded body for `steps` rounds, reading decisions from
    /// `genes`, then stands it back on `altitude`. Returns whether anything
    /// grew.
    pub fn grow(&mut self, genes: Vec<u8>, steps: u32, altitude: f32) -> bool {
        let mut growth = match Growth::new(&self.fabric, &GROWTH_FACES) {
            Ok(growth) => growth,
            Err(err) => {
                debug!(%err, "nothing to grow from");
                return false;
            }
        };
        let mut genes = GeneSequence::new(genes);
        let mut grew = false;
        for _ in 0..steps {
            match growth.step(&mut self.fabric, &mut genes) {
                Ok(fresh) => grew |= fresh,
                Err(err) => {
                    debug!(%err, "growth failed");
                    break;
                }
            }
            if growth.is_exhausted() {
                break;
            }
        }
        self.fabric.centralize(altitude, 1.0);
        grew
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> FabricWorld {
        FabricWorld::new(10, 10, 1, Some(7))
    }

    #[test]
    fn refused_creates_return_the_sentinel() {
        let mut world = world();
        assert_eq!(world.create_joint(1, 0, 0.0, 0.0, 0.0), 0);
        assert_eq!(world.create_interval(0, 0, 4, 0.0), SENTINEL);
        assert_eq!(world.create_face(0, 0, 9), SENTINEL);
        assert_eq!(world.joint_count(), 1);
        assert_eq!(world.interval_count(), 0);
    }

    #[test]
    fn missing_lookups_point_past_the_range() {
        let mut world = world();
        for (tag, x) in [(1, 0.0), (2, 1.0), (3, 2.0)] {
            world.create_joint(tag, 0, x, 0.0, 0.0);
        }
        world.create_interval(0, 0, 1, 0.0);
        world.create_face(0, 1, 2);
        assert_eq!(world.find_interval_index(1, 2), 10);
        assert_eq!(world.find_opposite_interval_index(0), 10);
        assert_eq!(world.find_opposite_face_index(0), 2);
    }

    #[test]
    fn offsets_fit_inside_the_buffer() {
        let world = world();
        assert!(world.age_offset() + 4 <= world.byte_size());
        assert!(world.joints_offset() < world.intervals_offset());
        assert_eq!(world.byte_size() % arena::PAGE_SIZE, 0);
    }

    #[test]
    fn seed_and_grow() {
        let mut world = FabricWorld::new(60, 200, 120, Some(1));
        assert!(world.create_seed(6, 0.0));
        assert!(world.grow(vec![0, 1, 2, 1, 0], 3, 2.0));
        assert!(world.joint_count() > 8);
        let lowest = (0..world.joint_count())
            .map(|joint| world.joint_location(joint)[1])
            .fold(f32::MAX, f32::min);
        assert!((lowest - 2.0).abs() < 1e-4, "lowest joint at {lowest}");
        world.iterate(10);
        assert_eq!(world.age(), 10);
        assert_eq!(world.unfold(0, 9), Vec::<u16>::new());
        assert_eq!(world.joint_location(60), Vec::<f32>::new());
    }
}
