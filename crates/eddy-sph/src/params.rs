use thiserror::Error;

use crate::{container::Container, external::ExternalForce, vector::SphVector};

/// Parameters of a single simulation step. Read-only while the step runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SphParams<V: SphVector> {
    /// Fraction of the normal velocity kept after hitting a wall, in `[0, 1]`.
    pub collision_damping: f32,
    pub mass: f32,
    /// Insets the collision bounds of box containers.
    pub particle_radius: f32,
    /// Interaction radius, also the width of a grid cell.
    pub smoothing_radius: f32,
    pub target_density: f32,
    pub pressure_scalar: f32,
    pub near_pressure_scalar: f32,
    pub viscosity_strength: f32,
    /// How far ahead, in seconds, the predicted position looks.
    pub lookahead_factor: f32,
    pub gravity: V,
    pub container: Container<V>,
    pub external_force: Option<ExternalForce<V>>,
}

impl<V: SphVector> Default for SphParams<V> {
    fn default() -> Self {
        let mut gravity = V::ZERO;
        gravity[1] = -10.0;

        if V::DIM == 2 {
            Self {
                collision_damping: 0.95,
                mass: 1.0,
                particle_radius: 0.05,
                smoothing_radius: 0.2,
                target_density: 10.0,
                pressure_scalar: 30.0,
                near_pressure_scalar: 1.0,
                viscosity_strength: 0.1,
                lookahead_factor: 1.0 / 60.0,
                gravity,
                container: Container::default(),
                external_force: None,
            }
        } else {
            Self {
                collision_damping: 0.95,
                mass: 1.0,
                particle_radius: 0.1,
                smoothing_radius: 0.25,
                target_density: 10.0,
                pressure_scalar: 22.0,
                near_pressure_scalar: 2.0,
                viscosity_strength: 0.1,
                lookahead_factor: 1.0 / 60.0,
                gravity,
                container: Container::default(),
                external_force: None,
            }
        }
    }
}

impl<V: SphVector> SphParams<V> {
    /// Check the parameters the pipeline divides by or relies on being well-formed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.smoothing_radius > 0.0 && self.smoothing_radius.is_finite()) {
            return Err(ConfigError::SmoothingRadius(self.smoothing_radius));
        }

        if !(self.mass > 0.0 && self.mass.is_finite()) {
            return Err(ConfigError::Mass(self.mass));
        }

        if !(0.0..=1.0).contains(&self.collision_damping) {
            return Err(ConfigError::CollisionDamping(self.collision_damping));
        }

        if !(self.particle_radius >= 0.0 && self.particle_radius.is_finite()) {
            return Err(ConfigError::ParticleRadius(self.particle_radius));
        }

        if !(self.lookahead_factor >= 0.0 && self.lookahead_factor.is_finite()) {
            return Err(ConfigError::Lookahead(self.lookahead_factor));
        }

        if !self.gravity.is_finite() {
            return Err(ConfigError::Gravity);
        }

        if let Container::Oriented { local_to_world, world_to_local } = &self.container {
            if !V::is_finite_affine(local_to_world) || !V::is_finite_affine(world_to_local) {
                return Err(ConfigError::SingularContainer);
            }
        }

        if let Some(force) = &self.external_force {
            if !(force.radius >= 0.0) {
                return Err(ConfigError::ExternalForceRadius(force.radius));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("smoothing radius must be positive and finite, got {0}")]
    SmoothingRadius(f32),
    #[error("particle mass must be positive and finite, got {0}")]
    Mass(f32),
    #[error("collision damping must lie in [0, 1], got {0}")]
    CollisionDamping(f32),
    #[error("particle radius must be non-negative, got {0}")]
    ParticleRadius(f32),
    #[error("lookahead factor must be non-negative, got {0}")]
    Lookahead(f32),
    #[error("gravity must be finite")]
    Gravity,
    #[error("container transform is not invertible")]
    SingularContainer,
    #[error("external force radius must be non-negative, got {0}")]
    ExternalForceRadius(f32),
}
