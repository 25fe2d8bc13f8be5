// error.rs - Failures reported by the fabric core
//
// Nothing here aborts: every fallible call hands one of these back and the
// fabric stays exactly as it was before the call.

use thiserror::Error;

/// Entity kinds that live in the arena, used to say which store is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Joint,
    Interval,
    Face,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EntityKind::Joint => "joint",
            EntityKind::Interval => "interval",
            EntityKind::Face => "face",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FabricError {
    /// A create call found its store already holding `max` records.
    #[error("{kind} capacity exceeded (max {max})")]
    CapacityExceeded { kind: EntityKind, max: u16 },

    #[error("no joint at index {0}")]
    NoSuchJoint(u16),

    #[error("no interval at index {0}")]
    NoSuchInterval(u16),

    #[error("no face at index {0}")]
    NoSuchFace(u16),

    /// Hinges name one of a face's three corners.
    #[error("hinge must be 0, 1 or 2, got {0}")]
    InvalidHinge(usize),

    /// Every joint tag up to 65535 has been handed out once.
    #[error("joint tags exhausted")]
    TagsExhausted,

    #[error("invalid physics: {0}")]
    InvalidPhysics(&'static str),

    #[error("a seed needs at least 3 corners, got {0}")]
    InvalidCorners(u16),

    #[error("role {0} is outside the behavior table")]
    InvalidRole(i16),

    #[error("variation index {0} is outside the behavior row")]
    InvalidVariation(usize),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl FabricError {
    pub fn is_capacity(&self) -> bool {
        matches!(self, FabricError::CapacityExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_the_store() {
        let err = FabricError::CapacityExceeded { kind: EntityKind::Face, max: 12 };
        assert_eq!(err.to_string(), "face capacity exceeded (max 12)");
        assert!(err.is_capacity());
        assert!(!FabricError::InvalidHinge(4).is_capacity());
    }
}
