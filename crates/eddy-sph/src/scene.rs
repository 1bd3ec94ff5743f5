use crate::{
    external::ExternalForce,
    params::{ConfigError, SphParams},
    sph::Sph,
    vector::SphVector,
};

/// A fluid together with the parameters it is stepped with.
pub struct Scene<V: SphVector> {
    /// The fluid for this scene.
    pub fluid: Sph<V>,
    /// The parameters for this scene's fluid. Always valid.
    params: SphParams<V>,
    /// Number of substeps each call to [`step`](Self::step) is split into.
    substeps: usize,
}

impl<V: SphVector> Scene<V> {
    pub fn new(fluid: Sph<V>, params: SphParams<V>) -> Result<Self, ConfigError> {
        params.validate()?;

        Ok(Self {
            fluid,
            params,
            substeps: 1,
        })
    }

    /// Split every step into `substeps` equal steps.
    pub fn with_substeps(mut self, substeps: usize) -> Self {
        self.substeps = substeps.max(1);
        self
    }

    #[inline(always)]
    pub fn params(&self) -> &SphParams<V> {
        &self.params
    }

    /// Replace the parameters used from the next step on.
    pub fn set_params(&mut self, params: SphParams<V>) -> Result<(), ConfigError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    /// Set the force a host applies for user input, e.g. a cursor. `None` disables it.
    pub fn set_external_force(&mut self, force: Option<ExternalForce<V>>) -> Result<(), ConfigError> {
        if let Some(force) = &force {
            if !(force.radius >= 0.0) {
                return Err(ConfigError::ExternalForceRadius(force.radius));
            }
        }

        self.params.external_force = force;
        Ok(())
    }

    /// World-space bounds of the container.
    pub fn bounds(&self) -> (V, V) {
        self.params.container.bounds()
    }

    /// Domain size.
    pub fn size(&self) -> V {
        let (min, max) = self.bounds();
        max - min
    }

    pub fn step(&mut self, dt: f32) {
        let sdt = dt / self.substeps as f32;

        for _ in 0..self.substeps {
            self.fluid.step(sdt, &self.params);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn rejects_invalid_params() {
        let params = SphParams::<Vec2> {
            mass: 0.0,
            ..Default::default()
        };

        assert!(matches!(Scene::new(Sph::new([Vec2::ZERO]), params), Err(ConfigError::Mass(_))));
    }

    #[test]
    fn substeps_split_the_step() {
        let params = SphParams::<Vec2>::default();

        let mut single = Scene::new(Sph::new([Vec2::ZERO]), params.clone()).unwrap();
        let mut split = Scene::new(Sph::new([Vec2::ZERO]), params).unwrap().with_substeps(4);

        single.step(0.04);
        split.step(0.04);

        // Same velocity either way, but the split run lags behind on position.
        assert!((single.fluid.velocities()[0] - split.fluid.velocities()[0]).length() < 1e-6);
        assert!(split.fluid.positions()[0].y > single.fluid.positions()[0].y);
    }

    #[test]
    fn size_spans_the_container() {
        let scene = Scene::new(Sph::<Vec2>::new([]), SphParams::default()).unwrap();
        assert_eq!(scene.size(), Vec2::new(8.0, 6.0));
    }
}
