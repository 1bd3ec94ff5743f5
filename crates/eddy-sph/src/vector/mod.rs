use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::kernel::KernelScales;

mod d2;
mod d3;

/// Large primes decorrelating the per-axis contributions to a cell hash.
pub const HASH_PRIMES: [u32; 3] = [15823, 9737333, 440817757];

/// A world-space vector the SPH pipeline can run on.
///
/// Implemented for [`glam::Vec2`] and [`glam::Vec3`]; everything that differs between the two
/// dimensionalities (grid cells, neighbour stencils, kernel normalisation, container transforms)
/// lives behind this trait so the stages are written once.
pub trait SphVector:
    Copy
    + Default
    + Debug
    + PartialEq
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f32, Output = Self>
    + Div<f32, Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign<f32>
    + Index<usize, Output = f32>
    + IndexMut<usize>
{
    /// Number of spatial dimensions.
    const DIM: usize;
    const ZERO: Self;
    /// Separation direction used for particles sitting exactly on top of each other.
    const FALLBACK_DIRECTION: Self;

    /// Integer grid cell coordinate.
    type Cell: Copy + Debug + Eq + Send + Sync;
    /// Affine transform used by oriented containers.
    type Affine: Copy + Debug + PartialEq + Send + Sync;

    fn splat(v: f32) -> Self;

    fn length(self) -> f32;

    fn is_finite(self) -> bool;

    /// The grid cell containing `self` when cells are `cell_size` wide.
    fn cell(self, cell_size: f32) -> Self::Cell;

    /// Hash a grid cell into a table of `table_size` buckets.
    ///
    /// Uses wrapping 32-bit arithmetic so negative cells hash consistently. Distinct cells may
    /// collide.
    fn cell_hash(cell: Self::Cell, table_size: u32) -> u32;

    /// The `3^DIM` cells surrounding (and including) `cell`. Coordinates wrap at the `i32`
    /// limits, matching the wrapping hash.
    fn neighbor_cells(cell: Self::Cell) -> impl Iterator<Item = Self::Cell>;

    /// Smoothing kernel normalisation for this dimensionality.
    fn kernel_scales(radius: f32) -> KernelScales;

    fn transform_point(affine: &Self::Affine, p: Self) -> Self;

    fn transform_vector(affine: &Self::Affine, v: Self) -> Self;

    fn inverse(affine: &Self::Affine) -> Self::Affine;

    fn is_finite_affine(affine: &Self::Affine) -> bool;
}
