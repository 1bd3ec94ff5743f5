use glam::{Affine3A, IVec3, Vec3};

use crate::kernel::KernelScales;

use super::{SphVector, HASH_PRIMES};

const fn neighbor_offsets() -> [IVec3; 27] {
    let mut offsets = [IVec3::ZERO; 27];
    let mut i = 0;
    while i < 27 {
        offsets[i] = IVec3::new(i as i32 % 3 - 1, (i as i32 / 3) % 3 - 1, i as i32 / 9 - 1);
        i += 1;
    }
    offsets
}

const NEIGHBOR_OFFSETS: [IVec3; 27] = neighbor_offsets();

impl SphVector for Vec3 {
    const DIM: usize = 3;
    const ZERO: Self = Vec3::ZERO;
    const FALLBACK_DIRECTION: Self = Vec3::Y;

    type Cell = IVec3;
    type Affine = Affine3A;

    #[inline(always)]
    fn splat(v: f32) -> Self {
        Vec3::splat(v)
    }

    #[inline(always)]
    fn length(self) -> f32 {
        Vec3::length(self)
    }

    #[inline(always)]
    fn is_finite(self) -> bool {
        Vec3::is_finite(self)
    }

    #[inline(always)]
    fn cell(self, cell_size: f32) -> IVec3 {
        (self / cell_size).floor().as_ivec3()
    }

    #[inline(always)]
    fn cell_hash(cell: IVec3, table_size: u32) -> u32 {
        let a = (cell.x as u32).wrapping_mul(HASH_PRIMES[0]);
        let b = (cell.y as u32).wrapping_mul(HASH_PRIMES[1]);
        let c = (cell.z as u32).wrapping_mul(HASH_PRIMES[2]);
        a.wrapping_add(b).wrapping_add(c) % table_size
    }

    fn neighbor_cells(cell: IVec3) -> impl Iterator<Item = IVec3> {
        NEIGHBOR_OFFSETS.into_iter().map(move |offset| cell.wrapping_add(offset))
    }

    fn kernel_scales(radius: f32) -> KernelScales {
        KernelScales::new_3d(radius)
    }

    fn transform_point(affine: &Affine3A, p: Vec3) -> Vec3 {
        affine.transform_point3(p)
    }

    fn transform_vector(affine: &Affine3A, v: Vec3) -> Vec3 {
        affine.transform_vector3(v)
    }

    fn inverse(affine: &Affine3A) -> Affine3A {
        affine.inverse()
    }

    fn is_finite_affine(affine: &Affine3A) -> bool {
        affine.is_finite()
    }
}
