use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;
use smallvec::SmallVec;

use crate::vector::SphVector;

pub use sort::{sort_sequential, BitonicSorter, SortPass};

mod hash;
mod offsets;
mod sort;

/// Stored in `bucket_offsets` for buckets no particle hashed into.
pub(crate) const EMPTY_BUCKET: u32 = u32::MAX;

/// Uniform-grid spatial hash over a fixed number of particles.
///
/// Rebuilt from scratch every step by running [`hash`](Self::hash), [`sort`](Self::sort) and
/// [`build_offsets`](Self::build_offsets) in that order. The bucket table has exactly as many
/// buckets as there are particles, so distinct grid cells can share a bucket; every walk
/// re-checks each candidate's own bucket hash, which keeps collisions a cost and never an error.
///
/// Changing the smoothing radius shifts how many cells land in each bucket, since the table is
/// sized to the particle count rather than to the domain volume.
#[derive(Debug)]
pub struct SpatialIndex {
    len: usize,
    /// Particle indices grouped by bucket hash. Slots `len..` are sorter padding.
    permutation: Vec<u32>,
    /// Bucket hash of every particle, addressed by particle index.
    bucket_hashes: Vec<u32>,
    /// First permutation slot of every bucket, or [`EMPTY_BUCKET`].
    bucket_offsets: Vec<AtomicU32>,
    sorter: BitonicSorter,
}

impl SpatialIndex {
    pub fn new(len: usize) -> Self {
        let sorter = BitonicSorter::new(len);

        debug!(
            "allocating spatial index for {len} particles ({} padded slots, {} sort passes)",
            sorter.padded_len(),
            sorter.passes().len(),
        );

        Self {
            len,
            permutation: (0..sorter.padded_len() as u32).collect(),
            bucket_hashes: vec![0; len],
            bucket_offsets: (0..len).map(|_| AtomicU32::new(EMPTY_BUCKET)).collect(),
            sorter,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Particle indices in sorted order, one per particle.
    pub fn permutation(&self) -> &[u32] {
        &self.permutation[..self.len]
    }

    /// Bucket hash of every particle, addressed by particle index.
    pub fn bucket_hashes(&self) -> &[u32] {
        &self.bucket_hashes
    }

    pub fn sorter(&self) -> &BitonicSorter {
        &self.sorter
    }

    /// The first permutation slot holding a particle with the given bucket hash, or `None` if
    /// no particle hashed there.
    pub fn bucket_offset(&self, hash: u32) -> Option<usize> {
        let offset = self.bucket_offsets.get(hash as usize)?.load(Ordering::Relaxed);
        (offset != EMPTY_BUCKET).then_some(offset as usize)
    }

    /// Iterate over every particle whose bucket hash equals `hash`.
    pub fn bucket(&self, hash: u32) -> impl Iterator<Item = usize> + '_ {
        let start = self.bucket_offset(hash).unwrap_or(self.len).min(self.len);

        self.permutation[start..self.len]
            .iter()
            .map(|&particle| particle as usize)
            .take_while(move |&particle| self.bucket_hashes[particle] == hash)
    }

    /// Call `f` with every particle in the `3^DIM` cells around `position`.
    ///
    /// Each candidate is visited once, even when several of the surrounding cells share a
    /// bucket. Candidates are not filtered by distance.
    pub fn for_each_neighbor<V: SphVector>(&self, position: V, cell_size: f32, mut f: impl FnMut(usize)) {
        if self.is_empty() {
            return;
        }

        let table_size = self.len as u32;
        let mut visited: SmallVec<[u32; 27]> = SmallVec::new();

        for cell in V::neighbor_cells(position.cell(cell_size)) {
            let hash = V::cell_hash(cell, table_size);
            if visited.contains(&hash) {
                continue;
            }
            visited.push(hash);

            for particle in self.bucket(hash) {
                f(particle);
            }
        }
    }
}
