use glam::Vec2;
use ndarray::Zip;

use crate::{params::SphParams, vector::SphVector};

use super::Sph;

/// Unit direction from `from` to `to` and the distance between them.
///
/// Coincident points get [`SphVector::FALLBACK_DIRECTION`] so they still separate.
#[inline(always)]
pub fn pair_direction<V: SphVector>(from: V, to: V) -> (V, f32) {
    let offset = to - from;
    let distance = offset.length();

    if distance > 0.0 {
        (offset / distance, distance)
    } else {
        (V::FALLBACK_DIRECTION, 0.0)
    }
}

/// Pressure shared by a pair of particles. Symmetric in its arguments.
#[inline(always)]
pub fn shared_pressure(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) / 2.0
}

impl<V: SphVector> Sph<V> {
    /// Compute pressure and viscosity acceleration for every particle from its neighbours.
    ///
    /// Requires densities and pressures from [`update_density`](Self::update_density) of this
    /// same step.
    pub fn update_pressure_force(&mut self, params: &SphParams<V>) {
        let radius = params.smoothing_radius;
        let kernel = V::kernel_scales(radius);
        let index = &self.index;
        let predicted = &self.predicted_positions;
        let velocities = &self.velocities;
        let densities = &self.densities;
        let pressures = &self.pressures;

        Zip::indexed(&mut self.accelerations).par_for_each(|i, acceleration| {
            let p = predicted[i];
            let velocity = velocities[i];
            let pressure = pressures[i];

            let mut pressure_force = V::ZERO;
            let mut viscosity_force = V::ZERO;

            index.for_each_neighbor(p, radius, |j| {
                if i == j {
                    return;
                }

                let (direction, distance) = pair_direction(p, predicted[j]);
                if distance > radius {
                    return;
                }

                let shared = shared_pressure(pressure, pressures[j]);
                let neighbor_density = densities[j];

                pressure_force += direction
                    * (params.mass * shared.x * kernel.density_slope(distance) / neighbor_density.x);
                pressure_force += direction
                    * (params.mass * shared.y * kernel.near_density_slope(distance) / neighbor_density.y);

                viscosity_force += (velocities[j] - velocity) * kernel.viscosity(distance);
            });

            *acceleration = pressure_force / densities[i].x + viscosity_force * params.viscosity_strength;
        });
    }
}
