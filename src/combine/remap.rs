use super::allele_lut::AlleleLut;
use super::destination::RemapTarget;
use crate::error::{CombineError, Result};
use crate::model::field::Element;

/// Number of unordered allele pairs (genotypes) over `num_alleles`.
pub fn num_genotypes(num_alleles: usize) -> usize {
    num_alleles * (num_alleles + 1) / 2
}

/// Canonical index of the unordered pair `(a, b)` with `a <= b`.
pub fn genotype_pair_index(a: usize, b: usize) -> usize {
    debug_assert!(a <= b);
    a + b * (b + 1) / 2
}

/// Local index of the non-ref placeholder for this call, if the position
/// has one. The placeholder is always the last merged allele.
fn non_ref_input_idx(
    lut: &AlleleLut,
    call_idx: usize,
    num_merged_alleles: usize,
    non_ref_exists: bool,
) -> Option<usize> {
    if non_ref_exists {
        lut.input_for_merged(call_idx, num_merged_alleles - 1)
    } else {
        None
    }
}

/// Re-express one sample's allele-indexed array in merged coordinates.
///
/// For each merged slot the sample's local allele index is resolved
/// through the translation table; a merged allele the sample never listed
/// falls back to its non-ref placeholder when it has one, and otherwise
/// receives `missing`. With `alt_alleles_only` the slots cover merged alt
/// alleles 1.. and local indices are shifted down by one.
#[allow(clippy::too_many_arguments)]
pub fn remap_by_alleles<T: Element>(
    input: &[T],
    call_idx: usize,
    lut: &AlleleLut,
    num_merged_alleles: usize,
    non_ref_exists: bool,
    alt_alleles_only: bool,
    target: &mut dyn RemapTarget<T>,
    valid_counts: &mut [u64],
    missing: T,
) -> Result<()> {
    let input_non_ref = non_ref_input_idx(lut, call_idx, num_merged_alleles, non_ref_exists);
    let num_slots = if alt_alleles_only {
        num_merged_alleles - 1
    } else {
        num_merged_alleles
    };
    for slot in 0..num_slots {
        let merged_idx = if alt_alleles_only { slot + 1 } else { slot };
        let Some(input_allele) = lut
            .input_for_merged(call_idx, merged_idx)
            .or(input_non_ref)
        else {
            target.put(call_idx, slot, missing.clone())?;
            continue;
        };
        // With alt-only slots a resolved local index can never be the
        // reference
        if alt_alleles_only && input_allele == 0 {
            return Err(CombineError::InvariantViolation(format!(
                "merged alt allele {merged_idx} resolved to the reference of call {call_idx}"
            )));
        }
        let input_slot = if alt_alleles_only {
            input_allele - 1
        } else {
            input_allele
        };
        let value = input.get(input_slot).cloned().ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "allele-indexed value {input_slot} out of range for call {call_idx} \
                 ({} values)",
                input.len()
            ))
        })?;
        target.put(call_idx, slot, value)?;
        valid_counts[slot] += 1;
    }
    Ok(())
}

/// Re-express one sample's genotype-indexed array in merged coordinates.
///
/// Every unordered merged allele pair `(j, k)`, `j <= k`, is resolved
/// side by side through the translation table with the same non-ref
/// fallback as the allele-indexed remap. If a side stays unresolved the
/// affected pair slots receive `missing` and the remaining pairs are
/// still processed. Both the merged and the local pair use the canonical
/// triangular index.
#[allow(clippy::too_many_arguments)]
pub fn remap_by_genotypes<T: Element>(
    input: &[T],
    call_idx: usize,
    lut: &AlleleLut,
    num_merged_alleles: usize,
    non_ref_exists: bool,
    target: &mut dyn RemapTarget<T>,
    valid_counts: &mut [u64],
    missing: T,
) -> Result<()> {
    let input_non_ref = non_ref_input_idx(lut, call_idx, num_merged_alleles, non_ref_exists);
    for j in 0..num_merged_alleles {
        let Some(input_j) = lut.input_for_merged(call_idx, j).or(input_non_ref) else {
            // No local counterpart for allele j: every pair with j as one
            // component is missing
            for k in j..num_merged_alleles {
                target.put(call_idx, genotype_pair_index(j, k), missing.clone())?;
            }
            continue;
        };
        for k in j..num_merged_alleles {
            let pair_slot = genotype_pair_index(j, k);
            let Some(input_k) = lut.input_for_merged(call_idx, k).or(input_non_ref) else {
                target.put(call_idx, pair_slot, missing.clone())?;
                continue;
            };
            // Local indices may be ordered differently than merged ones
            let (a, b) = if input_j <= input_k {
                (input_j, input_k)
            } else {
                (input_k, input_j)
            };
            let input_slot = genotype_pair_index(a, b);
            let value = input.get(input_slot).cloned().ok_or_else(|| {
                CombineError::InvariantViolation(format!(
                    "genotype-indexed value {input_slot} out of range for call {call_idx} \
                     ({} values)",
                    input.len()
                ))
            })?;
            target.put(call_idx, pair_slot, value)?;
            valid_counts[pair_slot] += 1;
        }
    }
    Ok(())
}

/// Translate a genotype call array entry-by-entry into merged indices.
///
/// Unlike the generic remappers there is no placeholder fallback: a call
/// entry with no merged mapping is a logic error upstream and fails
/// loudly instead of being replaced with a sentinel.
pub fn remap_gt_field(
    input: &[i32],
    output: &mut [i32],
    lut: &AlleleLut,
    call_idx: usize,
) -> Result<()> {
    if input.len() != output.len() {
        return Err(CombineError::InvariantViolation(format!(
            "genotype call length mismatch for call {call_idx}: {} in, {} out",
            input.len(),
            output.len()
        )));
    }
    for (slot, &allele) in input.iter().enumerate() {
        let merged = usize::try_from(allele)
            .ok()
            .and_then(|input_idx| lut.merged_for_input(call_idx, input_idx))
            .ok_or_else(|| {
                CombineError::InvariantViolation(format!(
                    "genotype call entry {allele} of call {call_idx} has no merged mapping"
                ))
            })?;
        output[slot] = merged as i32;
    }
    Ok(())
}
