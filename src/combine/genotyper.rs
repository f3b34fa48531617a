use super::destination::RemappedMatrix;
use super::processor::PositionCombiner;
use super::remap::{num_genotypes, remap_by_genotypes};
use crate::error::{CombineError, Result};
use crate::model::descriptor::{FieldNumber, QueryConfig};
use crate::model::field::{Element, FieldType, MISSING_INT32};
use crate::model::variant::Variant;
use crate::utils::math::kth_largest;
use itertools::Itertools;
use std::io::Write;

/// Literal written for merged genotype slots no sample contributed to.
pub const MISSING_MEDIAN: &str = ".";

/// Illustrative consumer of the combine pipeline: merge the position's
/// alleles, remap every sample's genotype-likelihood field into a dense
/// buffer, and emit one summary line with the lower median likelihood per
/// merged genotype.
///
/// The median is taken at rank `count / 2` counting from the largest
/// contributed value. Line format:
/// `position,ref,alt1,...,altN,median1,...,medianG`.
pub fn write_median_genotype_summary<W: Write>(
    variant: &Variant,
    query: &QueryConfig,
    likelihood_idx: usize,
    combiner: &mut PositionCombiner,
    out: &mut W,
) -> Result<()> {
    let desc = query.fields().get(likelihood_idx).ok_or_else(|| {
        CombineError::InvalidConfig(format!(
            "likelihood field index {likelihood_idx} out of range ({} fields queried)",
            query.num_fields()
        ))
    })?;
    if desc.field_type != FieldType::Int32 || desc.number != FieldNumber::GenotypeCount {
        return Err(CombineError::InvalidConfig(format!(
            "field {} is not a genotype-indexed integer likelihood field",
            desc.id
        )));
    }

    combiner.merge_position(variant, query)?;
    let num_merged_alleles = combiner.merged_alts().len() + 1;
    let num_gts = num_genotypes(num_merged_alleles);

    let mut remapped = RemappedMatrix::new();
    remapped.resize(num_gts, variant.num_calls(), MISSING_INT32);
    let mut valid_counts = vec![0u64; num_gts];
    for (call_idx, call) in variant.valid_calls() {
        let Some(field) = call.field(likelihood_idx) else {
            continue;
        };
        let Some(input) = <i32 as Element>::values(field) else {
            continue;
        };
        remap_by_genotypes(
            input,
            call_idx,
            combiner.allele_lut(),
            num_merged_alleles,
            combiner.non_ref_exists(),
            &mut remapped,
            &mut valid_counts,
            MISSING_INT32,
        )?;
    }

    // Missing slots hold i32::MIN and sort after every contributed value
    // in decreasing order, so rank count/2 always lands on real data
    let medians = (0..num_gts).map(|gt_idx| {
        let count = valid_counts[gt_idx] as usize;
        if count == 0 {
            return MISSING_MEDIAN.to_string();
        }
        match kth_largest(remapped.row(gt_idx), count / 2) {
            Some(value) => value.to_string(),
            None => MISSING_MEDIAN.to_string(),
        }
    });

    let line = std::iter::once(combiner.merged_ref().to_string())
        .chain(combiner.merged_alts().iter().cloned())
        .chain(medians)
        .join(",");
    writeln!(out, "{},{}", variant.position(), line)?;
    Ok(())
}
