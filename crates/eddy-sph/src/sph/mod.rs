use glam::Vec2;
use log::trace;
use ndarray::{Array0, Array1, ArrayView1, Axis};

use crate::{index::SpatialIndex, params::SphParams, vector::SphVector};

pub use force::{pair_direction, shared_pressure};

mod density;
mod force;
mod integrate;

/// A smoothed-particle-hydrodynamics fluid over a fixed set of particles.
///
/// Each [`step`](Self::step) runs six stages, each a parallel loop that finishes before the
/// next starts: hash, sort, offsets, density, pressure force and integrate. Neighbour search
/// and density use the predicted position computed at the end of the previous step.
#[derive(Debug)]
pub struct Sph<V: SphVector> {
    /// Particle positions.
    positions: Array1<V>,
    /// Particle velocities.
    velocities: Array1<V>,
    /// Pressure and viscosity acceleration from the last force stage.
    accelerations: Array1<V>,
    /// Look-ahead positions used for neighbour search.
    predicted_positions: Array1<V>,
    /// `x` is density, `y` is near density. Both always positive.
    densities: Array1<Vec2>,
    /// `x` is pressure, `y` is near pressure.
    pressures: Array1<Vec2>,

    index: SpatialIndex,
}

impl<V: SphVector> Sph<V> {
    pub fn new(positions: impl IntoIterator<Item = V>) -> Self {
        let positions: Array1<V> = positions.into_iter().collect();
        let n = positions.len();

        Self {
            velocities: Array1::from_elem(n, V::ZERO),
            accelerations: Array1::from_elem(n, V::ZERO),
            predicted_positions: positions.clone(),
            densities: Array1::from_elem(n, Vec2::ZERO),
            pressures: Array1::from_elem(n, Vec2::ZERO),
            positions,
            index: SpatialIndex::new(n),
        }
    }

    /// Add a particle at rest. The spatial index is reallocated, since its bucket table is
    /// sized to the particle count.
    pub fn insert_particle(&mut self, pos: V) {
        let _ = self.positions.push(Axis(0), Array0::from_elem((), pos).view());
        let _ = self.velocities.push(Axis(0), Array0::from_elem((), V::ZERO).view());
        let _ = self.accelerations.push(Axis(0), Array0::from_elem((), V::ZERO).view());
        let _ = self.predicted_positions.push(Axis(0), Array0::from_elem((), pos).view());
        let _ = self.densities.push(Axis(0), Array0::from_elem((), Vec2::ZERO).view());
        let _ = self.pressures.push(Axis(0), Array0::from_elem((), Vec2::ZERO).view());

        self.index = SpatialIndex::new(self.positions.len());
    }

    /// Overwrite the velocity of one particle, keeping its predicted position consistent.
    pub fn set_velocity(&mut self, i: usize, vel: V, params: &SphParams<V>) {
        self.velocities[i] = vel;
        self.predicted_positions[i] = self.positions[i] + vel * params.lookahead_factor;
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> ArrayView1<'_, V> {
        self.positions.view()
    }

    pub fn velocities(&self) -> ArrayView1<'_, V> {
        self.velocities.view()
    }

    pub fn accelerations(&self) -> ArrayView1<'_, V> {
        self.accelerations.view()
    }

    pub fn predicted_positions(&self) -> ArrayView1<'_, V> {
        self.predicted_positions.view()
    }

    pub fn densities(&self) -> ArrayView1<'_, Vec2> {
        self.densities.view()
    }

    pub fn pressures(&self) -> ArrayView1<'_, Vec2> {
        self.pressures.view()
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn iter_particles(&self) -> impl Iterator<Item = (&V, &V)> {
        self.positions.iter().zip(self.velocities.iter())
    }

    /// Bucket every particle by the grid cell of its predicted position.
    pub fn hash_particles(&mut self, smoothing_radius: f32) {
        self.index.hash(self.predicted_positions.view(), smoothing_radius);
    }

    /// Group the particle permutation by bucket hash.
    pub fn sort(&mut self) {
        self.index.sort();
    }

    /// Record where every bucket's run starts in the permutation.
    pub fn build_offsets(&mut self) {
        self.index.build_offsets();
    }

    /// Rebuild the spatial index from the predicted positions.
    pub fn rebuild_index(&mut self, smoothing_radius: f32) {
        self.hash_particles(smoothing_radius);
        self.sort();
        self.build_offsets();
    }

    /// Advance the fluid by `dt` seconds.
    pub fn step(&mut self, dt: f32, params: &SphParams<V>) {
        debug_assert_eq!(params.validate(), Ok(()));

        if self.is_empty() {
            return;
        }

        trace!("sph step: {} particles, dt = {dt}", self.len());

        self.rebuild_index(params.smoothing_radius);
        self.update_density(params);
        self.update_pressure_force(params);
        self.integrate(dt, params);
    }
}
