/// Bidirectional map between each sample's local allele numbering and the
/// merged numbering for one position.
///
/// `None` is the missing sentinel: no mapping recorded for that slot. The
/// table is reset at the start of every position and grown (never shrunk)
/// as merged indices are assigned; growth preserves written entries.
#[derive(Debug, Clone, Default)]
pub struct AlleleLut {
    input_to_merged: Vec<Vec<Option<usize>>>,
    merged_to_input: Vec<Vec<Option<usize>>>,
}

impl AlleleLut {
    pub fn new(num_samples: usize) -> Self {
        AlleleLut {
            input_to_merged: vec![Vec::new(); num_samples],
            merged_to_input: vec![Vec::new(); num_samples],
        }
    }

    pub fn num_samples(&self) -> usize {
        self.input_to_merged.len()
    }

    /// Current per-sample capacity in allele indices.
    pub fn num_alleles(&self) -> usize {
        self.merged_to_input.first().map_or(0, Vec::len)
    }

    pub fn resize_samples(&mut self, num_samples: usize) {
        let num_alleles = self.num_alleles();
        self.input_to_merged
            .resize(num_samples, vec![None; num_alleles]);
        self.merged_to_input
            .resize(num_samples, vec![None; num_alleles]);
    }

    /// Invalidate every mapping, keeping allocated capacity for reuse.
    pub fn reset(&mut self) {
        for row in self
            .input_to_merged
            .iter_mut()
            .chain(self.merged_to_input.iter_mut())
        {
            row.fill(None);
        }
    }

    /// Ensure at least `num_alleles` columns per sample. Growth is
    /// geometric so repeated single-index bumps stay amortized-cheap.
    pub fn grow_to(&mut self, num_alleles: usize) {
        let current = self.num_alleles();
        if num_alleles <= current {
            return;
        }
        let new_len = num_alleles.max(current * 2);
        for row in self
            .input_to_merged
            .iter_mut()
            .chain(self.merged_to_input.iter_mut())
        {
            row.resize(new_len, None);
        }
    }

    /// Record that local `input_idx` corresponds to merged `merged_idx`
    /// for the sample at `call_idx`, in both directions.
    pub fn add_mapping(&mut self, call_idx: usize, input_idx: usize, merged_idx: usize) {
        debug_assert!(call_idx < self.num_samples());
        self.grow_to(input_idx.max(merged_idx) + 1);
        self.input_to_merged[call_idx][input_idx] = Some(merged_idx);
        self.merged_to_input[call_idx][merged_idx] = Some(input_idx);
    }

    pub fn merged_for_input(&self, call_idx: usize, input_idx: usize) -> Option<usize> {
        *self.input_to_merged.get(call_idx)?.get(input_idx)?
    }

    pub fn input_for_merged(&self, call_idx: usize, merged_idx: usize) -> Option<usize> {
        *self.merged_to_input.get(call_idx)?.get(merged_idx)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_both_directions() {
        let mut lut = AlleleLut::new(2);
        lut.add_mapping(0, 0, 0);
        lut.add_mapping(0, 1, 2);
        lut.add_mapping(1, 1, 1);

        assert_eq!(lut.merged_for_input(0, 0), Some(0));
        assert_eq!(lut.input_for_merged(0, 0), Some(0));
        assert_eq!(lut.merged_for_input(0, 1), Some(2));
        assert_eq!(lut.input_for_merged(0, 2), Some(1));
        assert_eq!(lut.merged_for_input(1, 1), Some(1));

        // Unmapped slots report the missing sentinel
        assert_eq!(lut.input_for_merged(0, 1), None);
        assert_eq!(lut.merged_for_input(1, 0), None);
    }

    #[test]
    fn test_out_of_range_lookups_are_missing() {
        let lut = AlleleLut::new(1);
        assert_eq!(lut.merged_for_input(0, 5), None);
        assert_eq!(lut.input_for_merged(5, 0), None);
    }

    #[test]
    fn test_growth_preserves_existing_mappings() {
        let mut lut = AlleleLut::new(1);
        lut.add_mapping(0, 1, 1);
        lut.grow_to(64);
        assert!(lut.num_alleles() >= 64);
        assert_eq!(lut.merged_for_input(0, 1), Some(1));
        assert_eq!(lut.input_for_merged(0, 1), Some(1));

        // Growing to a smaller size never shrinks
        lut.grow_to(2);
        assert!(lut.num_alleles() >= 64);
    }

    #[test]
    fn test_reset_clears_all_rows() {
        let mut lut = AlleleLut::new(2);
        lut.add_mapping(0, 1, 3);
        lut.add_mapping(1, 2, 1);
        lut.reset();
        assert_eq!(lut.merged_for_input(0, 1), None);
        assert_eq!(lut.input_for_merged(0, 3), None);
        assert_eq!(lut.merged_for_input(1, 2), None);
    }

    #[test]
    fn test_resize_samples() {
        let mut lut = AlleleLut::new(1);
        lut.add_mapping(0, 0, 0);
        lut.resize_samples(3);
        assert_eq!(lut.num_samples(), 3);
        assert_eq!(lut.merged_for_input(0, 0), Some(0));
        assert_eq!(lut.merged_for_input(2, 0), None);
    }
}
