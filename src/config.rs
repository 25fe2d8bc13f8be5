// config.rs - Physics constants and fabric dimensioning
//
// Both structs deserialize from TOML with every field optional, so a file
// only needs to mention what it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FabricError;

/// Constants consumed by every tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Physics {
    /// Spring constant, multiplied by the square of the rest length.
    pub elastic_factor: f32,
    /// Downward velocity added per tick above the ground band.
    pub air_gravity: f32,
    /// Fraction of velocity lost per tick above the ground band.
    pub air_drag: f32,
    /// Below ground, gravity becomes `-air_gravity * land_gravity`.
    pub land_gravity: f32,
    /// Below ground, drag becomes `air_drag * land_drag`.
    pub land_drag: f32,
    /// Phase advance per tick for triggered intervals.
    pub phase_step: u16,
    /// Half-height of the band where air and land regimes blend.
    pub joint_radius: f32,
    /// Mass every joint carries before intervals add theirs.
    pub ambient_joint_mass: f32,
    /// Fraction of axial velocity shared between interval endpoints.
    pub spring_smooth: f32,
    /// Stress that maps to a fully saturated line color.
    pub stress_max: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            elastic_factor: 0.2,
            air_gravity: 0.000002,
            air_drag: 0.001,
            land_gravity: 30.0,
            land_drag: 800.0,
            phase_step: 37,
            joint_radius: 0.15,
            ambient_joint_mass: 0.1,
            spring_smooth: 0.03,
            stress_max: 0.001,
        }
    }
}

impl Physics {
    /// Refuses constants the tick or the export cannot run with.
    pub fn validate(&self) -> Result<(), FabricError> {
        if self.stress_max.is_nan() || self.stress_max <= 0.0 {
            return Err(FabricError::InvalidPhysics("stress_max must be positive"));
        }
        if self.phase_step == 0 {
            return Err(FabricError::InvalidPhysics("phase_step must be positive"));
        }
        Ok(())
    }

    /// Physics with gravity switched off in both regimes.
    pub fn weightless() -> Self {
        Self {
            air_gravity: 0.0,
            land_gravity: 0.0,
            ..Self::default()
        }
    }

    #[inline]
    pub fn land_gravity_value(&self) -> f32 {
        -self.air_gravity * self.land_gravity
    }

    #[inline]
    pub fn land_drag_value(&self) -> f32 {
        self.air_drag * self.land_drag
    }

    /// (gravity, drag) for a joint at the given altitude.
    pub fn regime(&self, altitude: f32) -> (f32, f32) {
        let radius = self.joint_radius;
        if altitude > radius {
            (self.air_gravity, self.air_drag)
        } else if altitude < -radius {
            (self.land_gravity_value(), self.land_drag_value())
        } else {
            let degree = (altitude + radius) / (radius * 2.0);
            let gravity = self.air_gravity * degree + self.land_gravity_value() * (1.0 - degree);
            let drag = self.air_drag * degree + self.land_drag_value() * (1.0 - degree);
            (gravity, drag)
        }
    }
}

/// Everything needed to build one fabric.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FabricConfig {
    pub max_joints: u16,
    pub max_intervals: u16,
    pub max_faces: u16,
    /// Seeds the behavior table so two fabrics built alike behave alike.
    pub seed: u64,
    pub physics: Physics,
}

impl Default for FabricConfig {
    fn default() -> Self {
        Self {
            max_joints: 200,
            max_intervals: 600,
            max_faces: 400,
            seed: 0x5EED,
            physics: Physics::default(),
        }
    }
}

impl FabricConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, FabricError> {
        let config: Self = toml::from_str(content)?;
        config.physics.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FabricError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
