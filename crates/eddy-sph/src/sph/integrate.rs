use ndarray::Zip;

use crate::{params::SphParams, vector::SphVector};

use super::Sph;

impl<V: SphVector> Sph<V> {
    /// Apply gravity, the accumulated acceleration and the external force, move every particle,
    /// resolve container collisions and predict the next step's positions.
    pub fn integrate(&mut self, dt: f32, params: &SphParams<V>) {
        let external_force = params.external_force.filter(|force| force.is_active());

        Zip::from(&mut self.positions)
            .and(&mut self.velocities)
            .and(&mut self.predicted_positions)
            .and(&self.accelerations)
            .par_for_each(|pos, vel, predicted, &acceleration| {
                let external = external_force.map_or(V::ZERO, |force| force.force_at(*pos));

                *vel += (params.gravity + acceleration + external / params.mass) * dt;
                *pos += *vel * dt;

                params.container.resolve_collision(
                    pos,
                    vel,
                    params.particle_radius,
                    params.collision_damping,
                );

                *predicted = *pos + *vel * params.lookahead_factor;
            });
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use crate::{container::Container, external::ExternalForce};

    use super::*;

    #[test]
    fn free_fall() {
        let params = SphParams::<Vec2>::default();
        let mut fluid = Sph::new([Vec2::ZERO]);

        fluid.integrate(0.1, &params);

        assert_eq!(fluid.velocities()[0], Vec2::new(0.0, -1.0));
        assert_eq!(fluid.positions()[0], Vec2::new(0.0, -0.1));
        assert_eq!(
            fluid.predicted_positions()[0],
            Vec2::new(0.0, -0.1) + Vec2::new(0.0, -1.0) * params.lookahead_factor,
        );
    }

    #[test]
    fn floor_bounces_with_damping() {
        let params = SphParams {
            container: Container::new_box(Vec2::ZERO, Vec2::new(2.0, 2.0)),
            particle_radius: 0.0,
            collision_damping: 0.5,
            ..Default::default()
        };

        let mut fluid = Sph::new([Vec2::new(0.0, -0.99)]);
        fluid.set_velocity(0, Vec2::new(0.0, -10.0), &params);
        fluid.integrate(0.01, &params);

        assert_eq!(fluid.positions()[0].y, -1.0);
        assert!(fluid.velocities()[0].y > 0.0);
    }

    #[test]
    fn external_force_is_scaled_by_mass() {
        let params = SphParams {
            gravity: Vec2::ZERO,
            mass: 2.0,
            external_force: Some(ExternalForce::new(Vec2::ZERO, 1.0, 4.0)),
            ..Default::default()
        };

        let mut fluid = Sph::new([Vec2::new(0.5, 0.0)]);
        fluid.integrate(1.0, &params);

        // Force 4 * (1 - 0.5) = 2 toward the origin, divided by mass 2.
        assert!((fluid.velocities()[0] - Vec2::new(-1.0, 0.0)).length() < 1e-6);
    }
}
