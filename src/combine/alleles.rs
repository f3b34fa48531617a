use super::allele_lut::AlleleLut;
use crate::error::{CombineError, Result};
use crate::model::descriptor::QueryConfig;
use crate::model::variant::Variant;
use std::borrow::Cow;
use std::collections::HashMap;

/// Symbolic allele standing for "any allele not otherwise listed".
/// Always occupies the last merged alt index when present.
pub const NON_REF_ALLELE: &str = "<NON_REF>";

pub fn is_non_ref_allele(allele: &str) -> bool {
    allele == NON_REF_ALLELE
}

/// Union the alt alleles of all valid calls against `merged_ref`,
/// populating `lut` with every sample's local-to-merged index mapping.
///
/// Alt alleles of a sample whose local reference is shorter than the
/// merged reference are padded with the merged reference's trailing
/// suffix, since all alleles at the position share a start coordinate.
/// Merged order is first-seen across samples, deduplicated, with the
/// non-ref placeholder pinned last. Returns the merged alt list and
/// whether any sample carried the placeholder.
pub fn merge_alt_alleles(
    variant: &Variant,
    config: &QueryConfig,
    merged_ref: &str,
    lut: &mut AlleleLut,
) -> Result<(Vec<String>, bool)> {
    lut.reset();

    // Pre-marking the placeholder guarantees it is never assigned a
    // middle index through the dedup path
    let mut seen: HashMap<String, Option<usize>> =
        HashMap::from([(NON_REF_ALLELE.to_string(), None)]);
    let mut merged_alts: Vec<String> = Vec::new();
    // Local placeholder index per call; the merged index is only known
    // once every sample has been processed
    let mut non_ref_input_idx: Vec<Option<usize>> = vec![None; variant.num_calls()];
    let mut non_ref_exists = false;
    let mut next_merged_idx = 1usize;

    for (call_idx, call) in variant.valid_calls() {
        let local_ref = call.ref_allele(config).ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "valid call {call_idx} has no reference allele"
            ))
        })?;
        let suffix = merged_ref.get(local_ref.len()..).unwrap_or("");

        // Reference always maps to reference
        lut.add_mapping(call_idx, 0, 0);

        for (offset, allele) in call.alt_alleles(config).iter().enumerate() {
            let input_idx = offset + 1;
            if is_non_ref_allele(allele) {
                non_ref_input_idx[call_idx] = Some(input_idx);
                non_ref_exists = true;
                continue;
            }
            let padded: Cow<str> = if suffix.is_empty() {
                Cow::Borrowed(allele.as_str())
            } else {
                Cow::Owned(format!("{allele}{suffix}"))
            };
            match seen.get(padded.as_ref()).copied() {
                Some(Some(merged_idx)) => lut.add_mapping(call_idx, input_idx, merged_idx),
                Some(None) => {
                    // Dedup hit on the pre-marked placeholder
                    non_ref_input_idx[call_idx] = Some(input_idx);
                    non_ref_exists = true;
                }
                None => {
                    let merged_idx = next_merged_idx;
                    next_merged_idx += 1;
                    seen.insert(padded.to_string(), Some(merged_idx));
                    lut.grow_to(merged_idx + 1);
                    lut.add_mapping(call_idx, input_idx, merged_idx);
                    merged_alts.push(padded.into_owned());
                }
            }
        }
    }

    if non_ref_exists {
        merged_alts.push(NON_REF_ALLELE.to_string());
        // Merged allele index, counting the reference at 0
        let non_ref_merged_idx = merged_alts.len();
        lut.grow_to(non_ref_merged_idx + 1);
        for (call_idx, input_idx) in non_ref_input_idx.iter().enumerate() {
            if let Some(input_idx) = input_idx {
                lut.add_mapping(call_idx, *input_idx, non_ref_merged_idx);
            }
        }
    }

    Ok((merged_alts, non_ref_exists))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::descriptor::{FieldDescriptor, FieldNumber};
    use crate::model::field::{FieldType, FieldValue};
    use crate::model::variant::SampleCall;

    fn test_config() -> QueryConfig {
        QueryConfig::new(
            vec![
                FieldDescriptor::builtin("REF", FieldType::Str, FieldNumber::Fixed(1)),
                FieldDescriptor::builtin("ALT", FieldType::Str, FieldNumber::AlleleCount),
            ],
            0,
            1,
            None,
        )
        .unwrap()
    }

    fn call_with_alleles(config: &QueryConfig, ref_allele: &str, alts: &[&str]) -> SampleCall {
        let mut call = SampleCall::new(100, config.num_fields());
        call.set_ref_allele(config, ref_allele);
        call.set_field(
            1,
            FieldValue::Str(alts.iter().map(|s| s.to_string()).collect()),
        );
        call
    }

    fn merge(samples: &[(&str, &[&str])]) -> (Vec<String>, bool, AlleleLut) {
        let config = test_config();
        let calls: Vec<SampleCall> = samples
            .iter()
            .map(|(r, alts)| call_with_alleles(&config, r, alts))
            .collect();
        let variant = Variant::new(100, calls);
        let merged_ref = samples
            .iter()
            .map(|(r, _)| *r)
            .max_by_key(|r| r.len())
            .unwrap()
            .to_string();
        let mut lut = AlleleLut::new(variant.num_calls());
        let (alts, non_ref_exists) =
            merge_alt_alleles(&variant, &config, &merged_ref, &mut lut).unwrap();
        (alts, non_ref_exists, lut)
    }

    #[test]
    fn test_shorter_sample_alts_are_padded() {
        // Refs "T" and "TG": the SNP sample's alt "G" becomes "GG"
        let (alts, non_ref_exists, lut) = merge(&[("T", &["G"]), ("TG", &["T"])]);
        assert_eq!(alts, ["GG", "T"]);
        assert!(!non_ref_exists);
        assert_eq!(lut.merged_for_input(0, 1), Some(1));
        assert_eq!(lut.merged_for_input(1, 1), Some(2));
    }

    #[test]
    fn test_identical_alts_deduplicate() {
        let (alts, _, lut) = merge(&[("A", &["C"]), ("A", &["C"])]);
        assert_eq!(alts, ["C"]);
        assert_eq!(lut.merged_for_input(0, 1), Some(1));
        assert_eq!(lut.merged_for_input(1, 1), Some(1));
        assert_eq!(lut.input_for_merged(1, 1), Some(1));
    }

    #[test]
    fn test_padding_can_create_duplicates() {
        // "G" padded with the suffix of "TG" collides with a literal "GG"
        let (alts, _, lut) = merge(&[("T", &["G"]), ("TG", &["GG"])]);
        assert_eq!(alts, ["GG"]);
        assert_eq!(lut.merged_for_input(0, 1), Some(1));
        assert_eq!(lut.merged_for_input(1, 1), Some(1));
    }

    #[test]
    fn test_reference_always_maps_to_reference() {
        let (_, _, lut) = merge(&[("A", &["C"]), ("A", &[])]);
        assert_eq!(lut.merged_for_input(0, 0), Some(0));
        assert_eq!(lut.input_for_merged(0, 0), Some(0));
        assert_eq!(lut.merged_for_input(1, 0), Some(0));
        assert_eq!(lut.input_for_merged(1, 0), Some(0));
    }

    #[test]
    fn test_non_ref_pinned_last() {
        // Sample 0 lists the placeholder before an ordinary allele seen
        // later; the placeholder still lands at the final merged index
        let (alts, non_ref_exists, lut) =
            merge(&[("A", &[NON_REF_ALLELE, "C"]), ("A", &["G"])]);
        assert_eq!(alts, ["C", "G", NON_REF_ALLELE]);
        assert!(non_ref_exists);
        // Sample 0: local 1 = placeholder -> merged 3, local 2 = C -> merged 1
        assert_eq!(lut.merged_for_input(0, 1), Some(3));
        assert_eq!(lut.merged_for_input(0, 2), Some(1));
        // Sample 1 has no placeholder: merged 3 has no local counterpart
        assert_eq!(lut.input_for_merged(1, 3), None);
        assert_eq!(lut.merged_for_input(1, 1), Some(2));
    }

    #[test]
    fn test_merged_order_is_first_seen() {
        let (alts, _, _) = merge(&[("A", &["G", "T"]), ("A", &["T", "C"])]);
        assert_eq!(alts, ["G", "T", "C"]);
    }

    #[test]
    fn test_invalid_calls_contribute_nothing() {
        let config = test_config();
        let calls = vec![
            call_with_alleles(&config, "A", &["C"]),
            SampleCall::invalid(config.num_fields()),
        ];
        let variant = Variant::new(100, calls);
        let mut lut = AlleleLut::new(variant.num_calls());
        let (alts, non_ref_exists) =
            merge_alt_alleles(&variant, &config, "A", &mut lut).unwrap();
        assert_eq!(alts, ["C"]);
        assert!(!non_ref_exists);
        assert_eq!(lut.merged_for_input(1, 0), None);
    }

    #[test]
    fn test_lut_reset_between_positions() {
        let config = test_config();
        let variant = Variant::new(100, vec![call_with_alleles(&config, "A", &["C", "G"])]);
        let mut lut = AlleleLut::new(1);
        merge_alt_alleles(&variant, &config, "A", &mut lut).unwrap();
        assert_eq!(lut.merged_for_input(0, 2), Some(2));

        let next = Variant::new(200, vec![call_with_alleles(&config, "T", &["A"])]);
        merge_alt_alleles(&next, &config, "T", &mut lut).unwrap();
        assert_eq!(lut.merged_for_input(0, 1), Some(1));
        assert_eq!(lut.merged_for_input(0, 2), None);
    }
}
