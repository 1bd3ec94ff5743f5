use rayon::prelude::*;

use super::SpatialIndex;

/// Key given to padding slots so they always sort behind every real particle.
const PAD_KEY: u32 = u32::MAX;

/// Compare-exchanges per unit of parallel work.
const PASS_GRAIN: usize = 1024;

/// One compare-exchange pass of the bitonic network.
///
/// Slot `i` is compared with slot `i ^ block`; the pair is ordered ascending when bit `dim` of
/// `i` is clear and descending otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortPass {
    pub block: u32,
    pub dim: u32,
}

/// Bitonic sorting network over a power-of-two padded index space.
///
/// Every pass reads the full output of the previous one, so passes run one after another, each
/// as its own parallel loop.
#[derive(Debug, Clone)]
pub struct BitonicSorter {
    padded_len: usize,
    passes: Vec<SortPass>,
}

impl BitonicSorter {
    pub fn new(len: usize) -> Self {
        let padded_len = len.next_power_of_two();

        let mut passes = Vec::new();
        let mut dim = 2;
        while dim <= padded_len as u32 {
            let mut block = dim >> 1;
            while block > 0 {
                passes.push(SortPass { block, dim });
                block >>= 1;
            }
            dim <<= 1;
        }

        Self { padded_len, passes }
    }

    /// Length of the index space the network operates on.
    #[inline(always)]
    pub fn padded_len(&self) -> usize {
        self.padded_len
    }

    /// Passes in the order they must run.
    pub fn passes(&self) -> &[SortPass] {
        &self.passes
    }

    /// Sort `permutation` by the key of the particle each slot references.
    ///
    /// `permutation` must hold `padded_len` distinct indices; indices `>= keys.len()` are
    /// padding. Ties between equal keys are ordered by particle index.
    pub fn sort(&self, permutation: &mut [u32], keys: &[u32]) {
        debug_assert_eq!(permutation.len(), self.padded_len);

        for &pass in &self.passes {
            Self::apply_pass(pass, permutation, keys);
        }
    }

    /// Run a single pass of the network.
    pub fn apply_pass(pass: SortPass, permutation: &mut [u32], keys: &[u32]) {
        let block = pass.block as usize;
        let dim = pass.dim as usize;

        // Each chunk of `2 * block` slots starts on a multiple of `2 * block <= dim`, so bit
        // `dim` is the same for every slot in it.
        permutation
            .par_chunks_mut(2 * block)
            .enumerate()
            .with_min_len((PASS_GRAIN / block).max(1))
            .for_each(|(chunk, slots)| {
                let ascending = (chunk * 2 * block) & dim == 0;
                let (lo, hi) = slots.split_at_mut(block);

                lo.par_iter_mut()
                    .zip(hi.par_iter_mut())
                    .with_min_len(PASS_GRAIN)
                    .for_each(|(a, b)| {
                        if (sort_key(keys, *a) > sort_key(keys, *b)) == ascending {
                            std::mem::swap(a, b);
                        }
                    });
            });
    }
}

/// Sort `permutation` with an ordinary comparison sort on the same key as the network.
///
/// Produces exactly the order [`BitonicSorter::sort`] does.
pub fn sort_sequential(permutation: &mut [u32], keys: &[u32]) {
    permutation.sort_unstable_by_key(|&particle| sort_key(keys, particle));
}

#[inline(always)]
fn sort_key(keys: &[u32], particle: u32) -> (u32, u32) {
    (keys.get(particle as usize).copied().unwrap_or(PAD_KEY), particle)
}

impl SpatialIndex {
    /// Reorder the permutation so particles sharing a bucket hash occupy one contiguous run, in
    /// ascending hash order.
    pub fn sort(&mut self) {
        self.sorter.sort(&mut self.permutation, &self.bucket_hashes);
    }

    /// Same result as [`sort`](Self::sort), on a single thread.
    pub fn sort_sequential(&mut self) {
        sort_sequential(&mut self.permutation, &self.bucket_hashes);
    }
}
