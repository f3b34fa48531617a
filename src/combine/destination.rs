use crate::error::{CombineError, Result};
use crate::model::field::Element;
use crate::model::variant::Variant;

/// A writable surface for remapped values, addressed by (call index,
/// merged slot index). Implementations expose typed slots; a write
/// through the wrong element type is an error, never a reinterpretation.
pub trait RemapTarget<T: Element> {
    fn put(&mut self, call_idx: usize, slot_idx: usize, value: T) -> Result<()>;
}

/// Dense standalone buffer: each row is one merged slot (allele or
/// genotype pair), each column one sample call.
#[derive(Debug, Clone)]
pub struct RemappedMatrix<T> {
    rows: Vec<Vec<T>>,
}

impl<T: Element> RemappedMatrix<T> {
    pub fn new() -> Self {
        RemappedMatrix { rows: Vec::new() }
    }

    /// Size the matrix and pre-fill every slot with `fill` (typically the
    /// element type's missing value) so untouched slots read as missing.
    pub fn resize(&mut self, num_rows: usize, num_cols: usize, fill: T) {
        self.rows.clear();
        self.rows
            .resize_with(num_rows, || vec![fill.clone(); num_cols]);
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, slot_idx: usize) -> &[T] {
        &self.rows[slot_idx]
    }
}

impl<T: Element> Default for RemappedMatrix<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> RemapTarget<T> for RemappedMatrix<T> {
    fn put(&mut self, call_idx: usize, slot_idx: usize, value: T) -> Result<()> {
        let row = self.rows.get_mut(slot_idx).ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "slot index {slot_idx} out of range for remap buffer"
            ))
        })?;
        let slot = row.get_mut(call_idx).ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "call index {call_idx} out of range for remap buffer"
            ))
        })?;
        *slot = value;
        Ok(())
    }
}

/// In-place destination: writes land directly in one queried field of the
/// destination record's calls. The field must already be resized to the
/// merged slot count.
#[derive(Debug)]
pub struct RecordTarget<'a> {
    variant: &'a mut Variant,
    field_idx: usize,
}

impl<'a> RecordTarget<'a> {
    pub fn new(variant: &'a mut Variant, field_idx: usize) -> Self {
        RecordTarget { variant, field_idx }
    }
}

impl<T: Element> RemapTarget<T> for RecordTarget<'_> {
    fn put(&mut self, call_idx: usize, slot_idx: usize, value: T) -> Result<()> {
        let field_idx = self.field_idx;
        let call = self.variant.call_mut(call_idx).ok_or_else(|| {
            CombineError::InvariantViolation(format!("call index {call_idx} out of range"))
        })?;
        debug_assert!(call.is_valid());
        let field = call.field_mut(field_idx).ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "field {field_idx} absent in call {call_idx}"
            ))
        })?;
        let field_type = field.field_type();
        let values = T::values_mut(field).ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "field {field_idx} of call {call_idx} holds {field_type:?}, expected {:?}",
                T::field_type()
            ))
        })?;
        let slot = values.get_mut(slot_idx).ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "slot {slot_idx} out of range for field {field_idx} of call {call_idx}"
            ))
        })?;
        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::field::{FieldValue, MISSING_INT32};
    use crate::model::variant::SampleCall;

    #[test]
    fn test_matrix_prefill_and_put() {
        let mut matrix = RemappedMatrix::new();
        matrix.resize(2, 3, MISSING_INT32);
        assert_eq!(matrix.num_rows(), 2);
        assert_eq!(matrix.row(0), [MISSING_INT32; 3]);

        matrix.put(1, 0, 42).unwrap();
        matrix.put(2, 1, 7).unwrap();
        assert_eq!(matrix.row(0), [MISSING_INT32, 42, MISSING_INT32]);
        assert_eq!(matrix.row(1), [MISSING_INT32, MISSING_INT32, 7]);
    }

    #[test]
    fn test_matrix_out_of_range() {
        let mut matrix = RemappedMatrix::new();
        matrix.resize(1, 1, 0i32);
        assert!(matrix.put(0, 5, 1).is_err());
        assert!(matrix.put(5, 0, 1).is_err());
    }

    #[test]
    fn test_matrix_resize_overwrites() {
        let mut matrix = RemappedMatrix::new();
        matrix.resize(1, 1, 9i32);
        matrix.put(0, 0, 5).unwrap();
        matrix.resize(1, 1, 9i32);
        assert_eq!(matrix.row(0), [9]);
    }

    #[test]
    fn test_record_target_writes_in_place() {
        let mut call = SampleCall::new(100, 1);
        call.set_field(0, FieldValue::Int32(vec![MISSING_INT32; 2]));
        let mut variant = Variant::new(100, vec![call]);

        let mut target = RecordTarget::new(&mut variant, 0);
        target.put(0, 1, 13i32).unwrap();
        assert_eq!(
            variant.call(0).unwrap().field(0),
            Some(&FieldValue::Int32(vec![MISSING_INT32, 13]))
        );
    }

    #[test]
    fn test_record_target_type_mismatch() {
        let mut call = SampleCall::new(100, 1);
        call.set_field(0, FieldValue::Float(vec![0.0; 2]));
        let mut variant = Variant::new(100, vec![call]);

        let mut target = RecordTarget::new(&mut variant, 0);
        let err = RemapTarget::<i32>::put(&mut target, 0, 0, 1).unwrap_err();
        assert!(matches!(err, CombineError::InvariantViolation(_)));
        // The field is untouched after the failed write
        assert_eq!(
            variant.call(0).unwrap().field(0),
            Some(&FieldValue::Float(vec![0.0; 2]))
        );
    }

    #[test]
    fn test_record_target_missing_field_and_slot() {
        let mut call = SampleCall::new(100, 2);
        call.set_field(0, FieldValue::Int32(vec![1]));
        let mut variant = Variant::new(100, vec![call]);

        let mut target = RecordTarget::new(&mut variant, 1);
        assert!(RemapTarget::<i32>::put(&mut target, 0, 0, 1).is_err());

        let mut target = RecordTarget::new(&mut variant, 0);
        assert!(RemapTarget::<i32>::put(&mut target, 0, 3, 1).is_err());
        assert!(RemapTarget::<i32>::put(&mut target, 9, 0, 1).is_err());
    }
}
