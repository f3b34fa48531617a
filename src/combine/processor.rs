use super::allele_lut::AlleleLut;
use super::alleles::merge_alt_alleles;
use super::destination::RecordTarget;
use super::reference::{merge_reference_allele, REF_PLACEHOLDER};
use super::remap::{num_genotypes, remap_by_alleles, remap_by_genotypes, remap_gt_field};
use crate::error::{CombineError, Result};
use crate::model::descriptor::{FieldDescriptor, FieldNumber, QueryConfig};
use crate::model::field::{Element, FieldType, FieldValue};
use crate::model::variant::Variant;

#[derive(Debug, Clone, Copy)]
pub struct CombineConfig {
    /// Check the reference-prefix invariant while merging references.
    /// Callers trading correctness checking for speed opt out explicitly.
    pub validate_ref_prefix: bool,
}

impl Default for CombineConfig {
    fn default() -> Self {
        CombineConfig {
            validate_ref_prefix: true,
        }
    }
}

/// Per-position driver: merges reference and alt alleles across samples,
/// then re-expresses every queried field in merged coordinates.
///
/// All mutable state is scoped to one position and cleared between
/// positions, so one combiner instance processes positions sequentially;
/// parallel callers run independent instances.
pub struct PositionCombiner {
    config: CombineConfig,
    lut: AlleleLut,
    merged_ref: String,
    merged_alts: Vec<String>,
    non_ref_exists: bool,
}

impl PositionCombiner {
    pub fn new(num_samples: usize) -> Self {
        Self::with_config(num_samples, CombineConfig::default())
    }

    pub fn with_config(num_samples: usize, config: CombineConfig) -> Self {
        PositionCombiner {
            config,
            lut: AlleleLut::new(num_samples),
            merged_ref: String::new(),
            merged_alts: Vec::new(),
            non_ref_exists: false,
        }
    }

    /// Invalidate all per-position state, keeping allocations for reuse.
    pub fn clear(&mut self) {
        self.lut.reset();
        self.merged_ref.clear();
        self.merged_alts.clear();
        self.non_ref_exists = false;
    }

    pub fn merged_ref(&self) -> &str {
        &self.merged_ref
    }

    pub fn merged_alts(&self) -> &[String] {
        &self.merged_alts
    }

    pub fn non_ref_exists(&self) -> bool {
        self.non_ref_exists
    }

    pub fn allele_lut(&self) -> &AlleleLut {
        &self.lut
    }

    /// Run the allele-reconciliation half of the pipeline: build the
    /// working copy with placeholder references substituted, merge the
    /// reference, merge and deduplicate alt alleles.
    ///
    /// After this returns, the translation table and merged allele set
    /// describe the position; the returned copy is the base for field
    /// remapping.
    pub fn merge_position(&mut self, variant: &Variant, query: &QueryConfig) -> Result<Variant> {
        self.clear();
        if self.lut.num_samples() != variant.num_calls() {
            self.lut.resize_samples(variant.num_calls());
        }

        let mut working = variant.clone();
        let position = working.position();
        for call in working.calls_mut() {
            // A call starting before the merge position continues a
            // reference block; its reference bases are not known here
            if call.is_valid() && call.start() < position {
                call.set_ref_allele(query, REF_PLACEHOLDER);
            }
        }

        merge_reference_allele(
            &working,
            query,
            &mut self.merged_ref,
            self.config.validate_ref_prefix,
        )?;
        let (merged_alts, non_ref_exists) =
            merge_alt_alleles(&working, query, &self.merged_ref, &mut self.lut)?;
        self.merged_alts = merged_alts;
        self.non_ref_exists = non_ref_exists;

        log::trace!(
            "position {}: merged ref {} with {} alt allele(s), non-ref placeholder: {}",
            position,
            self.merged_ref,
            self.merged_alts.len(),
            self.non_ref_exists
        );
        Ok(working)
    }

    /// Produce the combined record for one position.
    ///
    /// Every queried field is dispatched on its declared length
    /// dependency: allele-indexed and genotype-indexed fields are
    /// remapped in place in the combined record, the genotype-call field
    /// is translated index-by-index, and fields with no length dependency
    /// pass through unchanged. A field whose element type cannot be
    /// remapped is skipped with a warning; remaining fields are still
    /// processed.
    pub fn combine(&mut self, variant: &Variant, query: &QueryConfig) -> Result<Variant> {
        let mut combined = self.merge_position(variant, query)?;
        let num_merged_alleles = self.merged_alts.len() + 1;

        for (field_idx, desc) in query.fields().iter().enumerate() {
            if query.is_common_field(field_idx) {
                continue;
            }
            if query.gt_idx() == Some(field_idx) {
                self.remap_genotype_calls(variant, &mut combined, field_idx)?;
                continue;
            }
            let num_slots = match desc.number {
                FieldNumber::AlleleCount => num_merged_alleles - 1,
                FieldNumber::AlleleAndRef => num_merged_alleles,
                FieldNumber::GenotypeCount => num_genotypes(num_merged_alleles),
                FieldNumber::Fixed(_) | FieldNumber::Variable => continue,
            };
            match self.dispatch_remap(variant, &mut combined, field_idx, desc, num_slots) {
                Err(CombineError::UnsupportedFieldType { field, field_type }) => {
                    log::warn!(
                        "skipping field {field} (index {field_idx}): element type \
                         {field_type:?} cannot be remapped"
                    );
                }
                other => other?,
            }
        }

        combined.set_common_fields(self.merged_ref.clone(), self.merged_alts.clone());
        Ok(combined)
    }

    fn dispatch_remap(
        &self,
        source: &Variant,
        combined: &mut Variant,
        field_idx: usize,
        desc: &FieldDescriptor,
        num_slots: usize,
    ) -> Result<()> {
        match desc.field_type {
            FieldType::Int32 => self.remap_field::<i32>(source, combined, field_idx, desc, num_slots),
            FieldType::Int64 => self.remap_field::<i64>(source, combined, field_idx, desc, num_slots),
            FieldType::UInt32 => self.remap_field::<u32>(source, combined, field_idx, desc, num_slots),
            FieldType::UInt64 => self.remap_field::<u64>(source, combined, field_idx, desc, num_slots),
            FieldType::Float => self.remap_field::<f32>(source, combined, field_idx, desc, num_slots),
            FieldType::Double => self.remap_field::<f64>(source, combined, field_idx, desc, num_slots),
            FieldType::Character => self.remap_field::<u8>(source, combined, field_idx, desc, num_slots),
            FieldType::Str => self.remap_field::<String>(source, combined, field_idx, desc, num_slots),
            FieldType::Flag => Err(CombineError::UnsupportedFieldType {
                field: desc.id.to_string(),
                field_type: desc.field_type,
            }),
        }
    }

    /// Remap one queried field for every valid call, reading local arrays
    /// from the immutable source and writing merged-space values into the
    /// combined record.
    fn remap_field<T: Element>(
        &self,
        source: &Variant,
        combined: &mut Variant,
        field_idx: usize,
        desc: &FieldDescriptor,
        num_slots: usize,
    ) -> Result<()> {
        // The destination field must cover the merged slot count before
        // any write lands
        for (call_idx, call) in source.valid_calls() {
            if call.field(field_idx).is_none() {
                continue;
            }
            if let Some(dest_field) = combined
                .call_mut(call_idx)
                .and_then(|dest| dest.field_mut(field_idx))
            {
                dest_field.resize_missing(num_slots);
            }
        }

        let num_merged_alleles = self.merged_alts.len() + 1;
        let mut valid_counts = vec![0u64; num_slots];
        let mut target = RecordTarget::new(combined, field_idx);
        for (call_idx, call) in source.valid_calls() {
            let Some(field) = call.field(field_idx) else {
                continue;
            };
            let Some(input) = T::values(field) else {
                return Err(CombineError::InvariantViolation(format!(
                    "field {} of call {call_idx} holds {:?}, declared as {:?}",
                    desc.id,
                    field.field_type(),
                    desc.field_type
                )));
            };
            if desc.number.is_genotype_length_dependent() {
                remap_by_genotypes(
                    input,
                    call_idx,
                    &self.lut,
                    num_merged_alleles,
                    self.non_ref_exists,
                    &mut target,
                    &mut valid_counts,
                    T::missing(),
                )?;
            } else {
                remap_by_alleles(
                    input,
                    call_idx,
                    &self.lut,
                    num_merged_alleles,
                    self.non_ref_exists,
                    desc.number.alt_alleles_only(),
                    &mut target,
                    &mut valid_counts,
                    T::missing(),
                )?;
            }
        }
        log::trace!(
            "field {}: {} merged slot(s), max contributors {}",
            desc.id,
            num_slots,
            valid_counts.iter().max().copied().unwrap_or(0)
        );
        Ok(())
    }

    /// Translate the distinguished genotype-call field through the
    /// local-to-merged direction of the translation table.
    fn remap_genotype_calls(
        &self,
        source: &Variant,
        combined: &mut Variant,
        field_idx: usize,
    ) -> Result<()> {
        for (call_idx, call) in source.valid_calls() {
            let Some(FieldValue::Int32(input)) = call.field(field_idx) else {
                continue;
            };
            let Some(FieldValue::Int32(output)) = combined
                .call_mut(call_idx)
                .and_then(|dest| dest.field_mut(field_idx))
            else {
                continue;
            };
            remap_gt_field(input, output, &self.lut, call_idx)?;
        }
        Ok(())
    }
}
