use glam::{Affine2, IVec2, Vec2};

use crate::kernel::KernelScales;

use super::{SphVector, HASH_PRIMES};

const NEIGHBOR_OFFSETS: [IVec2; 9] = [
    IVec2::new(-1, -1),
    IVec2::new(0, -1),
    IVec2::new(1, -1),
    IVec2::new(-1, 0),
    IVec2::new(0, 0),
    IVec2::new(1, 0),
    IVec2::new(-1, 1),
    IVec2::new(0, 1),
    IVec2::new(1, 1),
];

impl SphVector for Vec2 {
    const DIM: usize = 2;
    const ZERO: Self = Vec2::ZERO;
    const FALLBACK_DIRECTION: Self = Vec2::Y;

    type Cell = IVec2;
    type Affine = Affine2;

    #[inline(always)]
    fn splat(v: f32) -> Self {
        Vec2::splat(v)
    }

    #[inline(always)]
    fn length(self) -> f32 {
        Vec2::length(self)
    }

    #[inline(always)]
    fn is_finite(self) -> bool {
        Vec2::is_finite(self)
    }

    #[inline(always)]
    fn cell(self, cell_size: f32) -> IVec2 {
        (self / cell_size).floor().as_ivec2()
    }

    #[inline(always)]
    fn cell_hash(cell: IVec2, table_size: u32) -> u32 {
        let a = (cell.x as u32).wrapping_mul(HASH_PRIMES[0]);
        let b = (cell.y as u32).wrapping_mul(HASH_PRIMES[1]);
        a.wrapping_add(b) % table_size
    }

    fn neighbor_cells(cell: IVec2) -> impl Iterator<Item = IVec2> {
        NEIGHBOR_OFFSETS.into_iter().map(move |offset| cell.wrapping_add(offset))
    }

    fn kernel_scales(radius: f32) -> KernelScales {
        KernelScales::new_2d(radius)
    }

    fn transform_point(affine: &Affine2, p: Vec2) -> Vec2 {
        affine.transform_point2(p)
    }

    fn transform_vector(affine: &Affine2, v: Vec2) -> Vec2 {
        affine.transform_vector2(v)
    }

    fn inverse(affine: &Affine2) -> Affine2 {
        affine.inverse()
    }

    fn is_finite_affine(affine: &Affine2) -> bool {
        affine.is_finite()
    }
}
