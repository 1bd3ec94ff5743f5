use crate::vector::SphVector;

/// A radial force toward (positive `strength`) or away from (negative `strength`) a point,
/// fading linearly to zero at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalForce<V> {
    pub point: V,
    pub radius: f32,
    pub strength: f32,
}

impl<V: SphVector> ExternalForce<V> {
    pub fn new(point: V, radius: f32, strength: f32) -> Self {
        Self { point, radius, strength }
    }

    #[inline(always)]
    pub fn is_active(&self) -> bool {
        self.strength != 0.0 && self.radius > 0.0
    }

    /// The force felt by a particle at `position`.
    pub fn force_at(&self, position: V) -> V {
        if !self.is_active() {
            return V::ZERO;
        }

        let offset = self.point - position;
        let distance = offset.length();
        if distance >= self.radius || distance == 0.0 {
            return V::ZERO;
        }

        offset * (self.strength * (1.0 - distance / self.radius) / distance)
    }
}
