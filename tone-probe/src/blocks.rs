use std::borrow::Cow;

/// An iterator over a sample slice in fixed size blocks, consecutive blocks
/// sharing `overlap` samples.
///
/// Every block has exactly `block_size` samples: a trailing partial block is
/// padded with `fill`.
///
/// This struct is created by the [`blocks`] method on [SampleBlocksExt].
///
/// [`blocks`]: SampleBlocksExt::blocks
#[must_use = "iterators are lazy and do nothing unless consumed"]
#[derive(Clone)]
pub(crate) struct Blocks<'a> {
    v: &'a [f32],
    block_size: usize,
    hop: usize,
    fill: f32,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Cow<'a, [f32]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.v.is_empty() {
            None
        } else if self.v.len() < self.block_size {
            let mut block = self.v.to_vec();
            block.resize(self.block_size, self.fill);
            self.v = &[];
            Some(Cow::Owned(block))
        } else {
            let block = &self.v[..self.block_size];
            // the last full block must not leave its overlap behind as a new block
            self.v = if self.v.len() == self.block_size {
                &[]
            } else {
                &self.v[self.hop..]
            };
            Some(Cow::Borrowed(block))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = if self.v.is_empty() {
            0
        } else {
            1 + self.v.len().saturating_sub(self.block_size).div_ceil(self.hop)
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for Blocks<'_> {}

/// Extension trait for sample slices, which adds the [`blocks`] method.
///
/// [`blocks`]: SampleBlocksExt::blocks
pub(crate) trait SampleBlocksExt {
    /// Returns an iterator over `block_size` samples at a time, each block
    /// overlapping the previous one by `overlap` samples. The last block is
    /// padded with the mean of the whole slice.
    ///
    /// # Panics
    ///
    /// Panics if `block_size` is 0 or `overlap` is greater than or equal to `block_size`.
    fn blocks(&self, block_size: usize, overlap: usize) -> Blocks<'_>;
}

impl SampleBlocksExt for [f32] {
    fn blocks(&self, block_size: usize, overlap: usize) -> Blocks<'_> {
        assert!(block_size > 0, "block size must be greater than 0");
        assert!(overlap < block_size, "overlap must be less than block size");
        let fill = if self.is_empty() {
            0.0
        } else {
            self.iter().sum::<f32>() / self.len() as f32
        };
        Blocks {
            v: self,
            block_size,
            hop: block_size - overlap,
            fill,
        }
    }
}
