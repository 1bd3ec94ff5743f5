use std::sync::atomic::Ordering;

use ndarray::{ArrayView1, ArrayViewMut1, Zip};
use rayon::prelude::*;

use crate::vector::SphVector;

use super::{SpatialIndex, EMPTY_BUCKET};

impl SpatialIndex {
    /// Compute the bucket hash of every particle from its predicted position and clear the
    /// bucket offset table.
    ///
    /// Grid cells are exactly `cell_size` wide, so only the cells adjacent to a particle's own
    /// can hold anything within one `cell_size` of it.
    pub fn hash<V: SphVector>(&mut self, predicted_positions: ArrayView1<V>, cell_size: f32) {
        debug_assert_eq!(predicted_positions.len(), self.len);

        if self.is_empty() {
            return;
        }

        let table_size = self.len as u32;

        Zip::from(ArrayViewMut1::from(self.bucket_hashes.as_mut_slice()))
            .and(predicted_positions)
            .par_for_each(|hash, &p| {
                *hash = V::cell_hash(p.cell(cell_size), table_size);
            });

        self.bucket_offsets
            .par_iter()
            .for_each(|offset| offset.store(EMPTY_BUCKET, Ordering::Relaxed));
    }
}

#[cfg(test)]
mod tests {
    use glam::{IVec2, Vec2};
    use ndarray::Array1;

    use super::*;

    #[test]
    fn hashes_follow_predicted_cells() {
        let positions = Array1::from_vec(vec![
            Vec2::new(0.05, 0.05),
            Vec2::new(0.15, 0.05),
            Vec2::new(-0.3, 0.5),
        ]);

        let mut index = SpatialIndex::new(positions.len());
        index.hash(positions.view(), 0.2);

        let hashes = index.bucket_hashes();
        assert_eq!(hashes[0], hashes[1]);
        assert_eq!(hashes[2], Vec2::cell_hash(IVec2::new(-2, 2), 3));
        assert!(hashes.iter().all(|&h| h < 3));
    }

    #[test]
    fn clears_previous_offsets() {
        let positions = Array1::from_vec(vec![Vec2::ZERO, Vec2::ONE]);

        let mut index = SpatialIndex::new(2);
        index.hash(positions.view(), 0.2);
        index.sort();
        index.build_offsets();
        assert!(index.bucket_offset(index.bucket_hashes()[0]).is_some());

        index.hash(positions.view(), 0.2);
        assert_eq!(index.bucket_offset(0), None);
        assert_eq!(index.bucket_offset(1), None);
    }
}
