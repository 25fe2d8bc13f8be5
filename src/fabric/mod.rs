// fabric/ - Tensegrity fabric: joints, intervals, faces and their physics
//
// Each entity kind has its own module holding its record type and the
// Fabric methods that create, query and remove it. Records are appended
// and removed by shifting later records down one slot, so any index held
// across a removal is stale and must be looked up again (by tag).

mod behavior;
mod face;
mod interval;
mod joint;
mod physics;
mod seed;

pub use behavior::{Behavior, ROLE_COUNT, SPAN_VARIATION_MAX, VARIATION_COUNT, Variation};
pub use face::Face;
pub use interval::Interval;
pub use joint::{Joint, Laterality};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::arena::{Arena, ArenaLayout};
use crate::config::{FabricConfig, Physics};
use crate::error::{EntityKind, FabricError};

pub struct Fabric {
    arena: Arena,
    physics: Physics,
    joint_count: u16,
    interval_count: u16,
    face_count: u16,
    joint_tag_count: u16,
}

impl Fabric {
    /// Reserves the arena and fills the behavior table from `config.seed`.
    pub fn new(config: &FabricConfig) -> Self {
        let layout = ArenaLayout::new(config.max_joints, config.max_intervals, config.max_faces);
        debug!(
            joints = config.max_joints,
            intervals = config.max_intervals,
            faces = config.max_faces,
            bytes = layout.total_bytes,
            reserved = layout.reserved_bytes,
            "arena reserved"
        );
        let mut fabric = Self {
            arena: Arena::new(layout),
            physics: config.physics.clone(),
            joint_count: 0,
            interval_count: 0,
            face_count: 0,
            joint_tag_count: 0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        for role in 0..ROLE_COUNT {
            fabric.init_behavior(role, &mut rng);
        }
        fabric
    }

    /// Same as [`Fabric::new`] with default physics and seed.
    pub fn with_capacity(max_joints: u16, max_intervals: u16, max_faces: u16) -> Self {
        Self::new(&FabricConfig {
            max_joints,
            max_intervals,
            max_faces,
            ..FabricConfig::default()
        })
    }

    /// Drops every joint, interval and face; the behavior table survives.
    pub fn clear(&mut self) {
        self.arena.clear_entities();
        self.joint_count = 0;
        self.interval_count = 0;
        self.face_count = 0;
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn layout(&self) -> &ArenaLayout {
        self.arena.layout()
    }

    pub fn physics(&self) -> &Physics {
        &self.physics
    }

    pub fn set_physics(&mut self, physics: Physics) {
        self.physics = physics;
    }

    pub fn age(&self) -> u32 {
        self.arena.age()
    }

    pub fn joint_count(&self) -> u16 {
        self.joint_count
    }

    pub fn interval_count(&self) -> u16 {
        self.interval_count
    }

    pub fn face_count(&self) -> u16 {
        self.face_count
    }

    /// Fails unless the stores can take this many more records of each kind.
    pub(crate) fn ensure_room(&self, joints: u16, intervals: u16, faces: u16) -> Result<(), FabricError> {
        let layout = self.layout();
        let checks = [
            (EntityKind::Joint, self.joint_count, joints, layout.max_joints),
            (EntityKind::Interval, self.interval_count, intervals, layout.max_intervals),
            (EntityKind::Face, self.face_count, faces, layout.max_faces),
        ];
        for (kind, count, extra, max) in checks {
            if count as u32 + extra as u32 > max as u32 {
                return Err(FabricError::CapacityExceeded { kind, max });
            }
        }
        Ok(())
    }
}
