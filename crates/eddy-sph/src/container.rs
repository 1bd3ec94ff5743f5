use crate::vector::SphVector;

/// The region particles are confined to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Container<V: SphVector> {
    /// Axis-aligned box. Collision bounds are inset by the particle radius.
    Box { center: V, size: V },
    /// Unit cube `[-0.5, 0.5]^D` placed in the world by an affine transform.
    Oriented {
        local_to_world: V::Affine,
        world_to_local: V::Affine,
    },
}

impl<V: SphVector> Container<V> {
    pub fn new_box(center: V, size: V) -> Self {
        Container::Box { center, size }
    }

    /// An oriented container from its local-to-world transform.
    pub fn oriented(local_to_world: V::Affine) -> Self {
        Container::Oriented {
            local_to_world,
            world_to_local: V::inverse(&local_to_world),
        }
    }

    /// An oriented container from both transforms. They are assumed to be inverses.
    pub fn from_transforms(local_to_world: V::Affine, world_to_local: V::Affine) -> Self {
        Container::Oriented {
            local_to_world,
            world_to_local,
        }
    }

    /// World-space axis-aligned bounds of the container.
    pub fn bounds(&self) -> (V, V) {
        match *self {
            Container::Box { center, size } => (center - size * 0.5, center + size * 0.5),
            Container::Oriented { local_to_world, .. } => {
                let mut min = V::splat(f32::INFINITY);
                let mut max = V::splat(f32::NEG_INFINITY);

                for mask in 0..1usize << V::DIM {
                    let mut corner = V::ZERO;
                    for axis in 0..V::DIM {
                        corner[axis] = if mask >> axis & 1 == 0 { -0.5 } else { 0.5 };
                    }

                    let corner = V::transform_point(&local_to_world, corner);
                    for axis in 0..V::DIM {
                        min[axis] = min[axis].min(corner[axis]);
                        max[axis] = max[axis].max(corner[axis]);
                    }
                }

                (min, max)
            }
        }
    }

    /// Whether `position` lies inside the collision bounds, up to `tolerance`.
    pub fn contains(&self, position: V, inset: f32, tolerance: f32) -> bool {
        match *self {
            Container::Box { center, size } => {
                let (min, max) = box_bounds(center, size, inset);
                (0..V::DIM).all(|axis| {
                    position[axis] >= min[axis] - tolerance && position[axis] <= max[axis] + tolerance
                })
            }
            Container::Oriented { world_to_local, .. } => {
                let local = V::transform_point(&world_to_local, position);
                (0..V::DIM).all(|axis| local[axis].abs() <= 0.5 + tolerance)
            }
        }
    }

    /// Clamp `position` into the container, reflecting and damping the velocity component of
    /// every axis that was out of bounds.
    pub fn resolve_collision(&self, position: &mut V, velocity: &mut V, inset: f32, damping: f32) {
        match *self {
            Container::Box { center, size } => {
                let (min, max) = box_bounds(center, size, inset);
                reflect(position, velocity, min, max, damping);
            }
            Container::Oriented { local_to_world, world_to_local } => {
                let mut local_position = V::transform_point(&world_to_local, *position);
                let mut local_velocity = V::transform_vector(&world_to_local, *velocity);

                let half = V::splat(0.5);
                if reflect(&mut local_position, &mut local_velocity, -half, half, damping) {
                    *position = V::transform_point(&local_to_world, local_position);
                    *velocity = V::transform_vector(&local_to_world, local_velocity);
                }
            }
        }
    }
}

impl<V: SphVector> Default for Container<V> {
    fn default() -> Self {
        let mut size = V::splat(8.0);
        size[1] = 6.0;
        Container::new_box(V::ZERO, size)
    }
}

fn box_bounds<V: SphVector>(center: V, size: V, inset: f32) -> (V, V) {
    let mut half = size * 0.5;
    for axis in 0..V::DIM {
        half[axis] = (half[axis] - inset).max(0.0);
    }

    (center - half, center + half)
}

/// Returns whether any axis was clamped.
fn reflect<V: SphVector>(position: &mut V, velocity: &mut V, min: V, max: V, damping: f32) -> bool {
    let mut hit = false;

    for axis in 0..V::DIM {
        if position[axis] < min[axis] {
            position[axis] = min[axis];
            velocity[axis] *= -damping;
            hit = true;
        } else if position[axis] > max[axis] {
            position[axis] = max[axis];
            velocity[axis] *= -damping;
            hit = true;
        }
    }

    hit
}

#[cfg(test)]
mod tests {
    use glam::{Affine2, Affine3A, Quat, Vec2, Vec3};

    use super::*;

    #[test]
    fn box_reflects_and_damps() {
        let container = Container::new_box(Vec2::ZERO, Vec2::new(2.0, 2.0));

        let mut p = Vec2::new(1.5, 0.0);
        let mut v = Vec2::new(4.0, 1.0);
        container.resolve_collision(&mut p, &mut v, 0.1, 0.5);

        assert_eq!(p, Vec2::new(0.9, 0.0));
        assert_eq!(v, Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn box_leaves_interior_alone() {
        let container = Container::new_box(Vec3::ONE, Vec3::splat(2.0));

        let mut p = Vec3::new(1.2, 0.5, 1.9);
        let mut v = Vec3::new(-3.0, 2.0, 1.0);
        container.resolve_collision(&mut p, &mut v, 0.0, 0.95);

        assert_eq!(p, Vec3::new(1.2, 0.5, 1.9));
        assert_eq!(v, Vec3::new(-3.0, 2.0, 1.0));
    }

    #[test]
    fn oriented_clamps_in_local_frame() {
        let transform = Affine2::from_scale_angle_translation(
            Vec2::new(4.0, 2.0),
            std::f32::consts::FRAC_PI_4,
            Vec2::new(1.0, -1.0),
        );
        let container = Container::<Vec2>::oriented(transform);

        let mut p = Vec2::new(10.0, 10.0);
        let mut v = Vec2::new(1.0, 1.0);
        container.resolve_collision(&mut p, &mut v, 0.0, 1.0);

        assert!(container.contains(p, 0.0, 1e-5));
    }

    #[test]
    fn explicit_transform_pair_matches_derived_inverse() {
        let local_to_world =
            Affine2::from_scale_angle_translation(Vec2::new(3.0, 1.5), -0.4, Vec2::new(2.0, 0.5));
        let world_to_local = local_to_world.inverse();

        let explicit = Container::<Vec2>::from_transforms(local_to_world, world_to_local);
        assert_eq!(explicit, Container::oriented(local_to_world));

        assert!(explicit.contains(Vec2::new(2.0, 0.5), 0.0, 0.0));
        assert!(!explicit.contains(Vec2::new(10.0, 0.5), 0.0, 1e-3));

        let mut p = Vec2::new(-8.0, 3.0);
        let mut v = Vec2::new(-1.0, 0.5);
        explicit.resolve_collision(&mut p, &mut v, 0.0, 0.8);
        assert!(explicit.contains(p, 0.0, 1e-5));
    }

    #[test]
    fn oriented_bounds_enclose_rotated_cube() {
        let transform = Affine3A::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
            Vec3::ZERO,
        );
        let container = Container::<Vec3>::oriented(transform);
        let (min, max) = container.bounds();

        let diagonal = 2.0f32.sqrt();
        assert!((max.x - diagonal).abs() < 1e-5);
        assert!((min.y + diagonal).abs() < 1e-5);
        assert!((max.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn inset_never_inverts_bounds() {
        let container = Container::new_box(Vec2::ZERO, Vec2::splat(0.1));

        let mut p = Vec2::new(1.0, -1.0);
        let mut v = Vec2::ZERO;
        container.resolve_collision(&mut p, &mut v, 1.0, 0.5);

        assert_eq!(p, Vec2::ZERO);
    }
}
