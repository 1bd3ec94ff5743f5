use std::sync::atomic::Ordering;

use rayon::prelude::*;

use super::SpatialIndex;

impl SpatialIndex {
    /// Record the first permutation slot of every bucket present in the sorted permutation.
    ///
    /// Every slot does an atomic minimum into its bucket, so slots can be processed in any
    /// order. Expects [`hash`](Self::hash) to have cleared the table and
    /// [`sort`](Self::sort) to have grouped the permutation.
    pub fn build_offsets(&mut self) {
        let offsets = &self.bucket_offsets;
        let hashes = &self.bucket_hashes;

        self.permutation[..self.len]
            .par_iter()
            .enumerate()
            .for_each(|(slot, &particle)| {
                let hash = hashes[particle as usize] as usize;
                offsets[hash].fetch_min(slot as u32, Ordering::Relaxed);
            });
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use ndarray::Array1;

    use super::*;

    #[test]
    fn offsets_point_at_run_starts() {
        let positions = Array1::from_vec(vec![
            Vec2::new(0.05, 0.05),
            Vec2::new(5.0, 5.0),
            Vec2::new(0.1, 0.1),
            Vec2::new(5.1, 5.1),
            Vec2::new(0.15, 0.05),
        ]);

        let mut index = SpatialIndex::new(positions.len());
        index.hash(positions.view(), 0.2);
        index.sort();
        index.build_offsets();

        let permutation = index.permutation();
        let hashes = index.bucket_hashes();

        for h in 0..positions.len() as u32 {
            let first = permutation.iter().position(|&p| hashes[p as usize] == h);
            assert_eq!(index.bucket_offset(h), first, "bucket {h}");
        }

        let origin: Vec<_> = index.bucket(hashes[0]).collect();
        for particle in [0, 2, 4] {
            assert!(origin.contains(&particle));
        }
    }
}
