use glam::Vec2;
use ndarray::Zip;

use crate::{kernel::DENSITY_PADDING, params::SphParams, vector::SphVector};

use super::Sph;

impl<V: SphVector> Sph<V> {
    /// Accumulate density and near density at every predicted position, then derive pressure.
    ///
    /// Every particle counts its own contribution: at distance zero it adds the kernel's peak
    /// value. Requires an up-to-date spatial index.
    pub fn update_density(&mut self, params: &SphParams<V>) {
        let radius = params.smoothing_radius;
        let kernel = V::kernel_scales(radius);
        let index = &self.index;
        let predicted = &self.predicted_positions;

        Zip::from(&mut self.densities)
            .and(&mut self.pressures)
            .and(&self.predicted_positions)
            .par_for_each(|density, pressure, &p| {
                let mut sum = Vec2::ZERO;

                index.for_each_neighbor(p, radius, |j| {
                    let distance = (predicted[j] - p).length();
                    if distance > radius {
                        return;
                    }

                    sum.x += kernel.density(distance);
                    sum.y += kernel.near_density(distance);
                });

                *density = sum * params.mass + DENSITY_PADDING;
                *pressure = Vec2::new(
                    params.pressure_scalar * (density.x - params.target_density),
                    params.near_pressure_scalar * density.y,
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn lone_particle_has_self_density() {
        let params = SphParams::<Vec3>::default();
        let kernel = Vec3::kernel_scales(params.smoothing_radius);

        let mut fluid = Sph::new([Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0)]);
        fluid.rebuild_index(params.smoothing_radius);
        fluid.update_density(&params);

        let density = fluid.densities()[0];
        assert_eq!(density.x, kernel.density(0.0) * params.mass + DENSITY_PADDING);
        assert_eq!(density.y, kernel.near_density(0.0) * params.mass + DENSITY_PADDING);
    }

    #[test]
    fn pressure_follows_equation_of_state() {
        let params = SphParams::<Vec2>::default();

        let mut fluid = Sph::new([Vec2::ZERO, Vec2::new(0.05, 0.0), Vec2::new(0.0, 0.1)]);
        fluid.rebuild_index(params.smoothing_radius);
        fluid.update_density(&params);

        for (density, pressure) in fluid.densities().iter().zip(fluid.pressures().iter()) {
            assert_eq!(pressure.x, params.pressure_scalar * (density.x - params.target_density));
            assert_eq!(pressure.y, params.near_pressure_scalar * density.y);
            assert!(pressure.y > 0.0);
        }
    }

    #[test]
    fn closer_neighbours_raise_density() {
        let params = SphParams::<Vec2>::default();

        let mut near = Sph::new([Vec2::ZERO, Vec2::new(0.02, 0.0)]);
        near.rebuild_index(params.smoothing_radius);
        near.update_density(&params);

        let mut far = Sph::new([Vec2::ZERO, Vec2::new(0.15, 0.0)]);
        far.rebuild_index(params.smoothing_radius);
        far.update_density(&params);

        assert!(near.densities()[0].x > far.densities()[0].x);
        assert!(near.densities()[0].y > far.densities()[0].y);
    }
}
