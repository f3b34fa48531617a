use crate::error::{CombineError, Result};
use crate::model::descriptor::QueryConfig;
use crate::model::variant::Variant;

/// Substituted for the reference of a call whose start precedes the merge
/// position: the true base at that sub-position is unknown here.
pub const REF_PLACEHOLDER: &str = "N";

pub fn is_placeholder_ref(allele: &str) -> bool {
    allele == REF_PLACEHOLDER
}

/// Compute the longest merged reference across all valid calls, appending
/// to `merged` (callers clear it per position).
///
/// Reference alleles at the same coordinate must be prefixes of one
/// another; the merged reference is the longest of them, with shorter ones
/// extended by appending the non-overlapping suffix. The "N" placeholder is
/// exempt from the prefix invariant and always loses to real data.
///
/// With `validate` set, a prefix violation is reported as
/// [`CombineError::InvalidInput`] naming both conflicting strings; callers
/// trading the check for speed can pass `false`.
pub fn merge_reference_allele(
    variant: &Variant,
    config: &QueryConfig,
    merged: &mut String,
    validate: bool,
) -> Result<()> {
    for (call_idx, call) in variant.valid_calls() {
        let curr = call.ref_allele(config).ok_or_else(|| {
            CombineError::InvariantViolation(format!(
                "valid call {call_idx} has no reference allele"
            ))
        })?;
        let curr_is_longer = curr.len() > merged.len();

        if validate {
            let (shorter, longer) = if curr_is_longer {
                (merged.as_str(), curr)
            } else {
                (curr, merged.as_str())
            };
            if !is_placeholder_ref(shorter)
                && !is_placeholder_ref(longer)
                && !longer.starts_with(shorter)
            {
                return Err(CombineError::InvalidInput {
                    shorter: shorter.to_string(),
                    longer: longer.to_string(),
                });
            }
        }

        if curr_is_longer {
            if is_placeholder_ref(merged) {
                // Placeholder carries no sequence; replace it wholesale
                merged.clear();
                merged.push_str(curr);
            } else {
                let suffix_start = merged.len();
                merged.push_str(&curr[suffix_start..]);
            }
        } else if is_placeholder_ref(merged) && !is_placeholder_ref(curr) {
            // Prefer real data over the placeholder
            merged.clear();
            merged.push_str(curr);
        }
    }
    Ok(())
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

    fn variant_with_refs(refs: &[&str]) -> Variant {
        let config = test_config();
        let calls = refs
            .iter()
            .map(|r| {
                let mut call = SampleCall::new(100, config.num_fields());
                call.set_ref_allele(&config, r);
                call
            })
            .collect();
        Variant::new(100, calls)
    }

    fn merge(refs: &[&str], validate: bool) -> Result<String> {
        let mut merged = String::new();
        merge_reference_allele(&variant_with_refs(refs), &test_config(), &mut merged, validate)?;
        Ok(merged)
    }

    #[test]
    fn test_longest_reference_wins() {
        assert_eq!(merge(&["T", "TG"], true).unwrap(), "TG");
        assert_eq!(merge(&["TG", "T"], true).unwrap(), "TG");
        assert_eq!(merge(&["T", "TG", "TGAC"], true).unwrap(), "TGAC");
    }

    #[test]
    fn test_merged_length_covers_all_inputs() {
        let refs = ["TGA", "T", "TG", "TGACC"];
        let merged = merge(&refs, true).unwrap();
        assert!(refs.iter().all(|r| merged.starts_with(r)));
        assert!(merged.len() >= refs.iter().map(|r| r.len()).max().unwrap());
    }

    #[test]
    fn test_placeholder_replaced_by_real_data() {
        // Longer real reference replaces the placeholder wholesale
        assert_eq!(merge(&["N", "TG"], true).unwrap(), "TG");
        // Equal-length real reference is preferred over the placeholder
        assert_eq!(merge(&["N", "T"], true).unwrap(), "T");
        // Placeholder never overrides real data
        assert_eq!(merge(&["TG", "N"], true).unwrap(), "TG");
        assert_eq!(merge(&["N", "N"], true).unwrap(), "N");
    }

    #[test]
    fn test_placeholder_exempt_from_prefix_check() {
        assert_eq!(merge(&["N", "GATTA"], true).unwrap(), "GATTA");
        assert_eq!(merge(&["GATTA", "N"], true).unwrap(), "GATTA");
    }

    #[test]
    fn test_prefix_violation_detected() {
        let err = merge(&["T", "GA"], true).unwrap_err();
        match err {
            CombineError::InvalidInput { shorter, longer } => {
                assert_eq!(shorter, "T");
                assert_eq!(longer, "GA");
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        // Same-length mismatch is also a violation
        assert!(merge(&["TA", "TG"], true).is_err());
    }

    #[test]
    fn test_validation_can_be_skipped() {
        // Without the check the merger still appends only the
        // non-overlapping suffix of the longer string
        let merged = merge(&["T", "GA"], false).unwrap();
        assert_eq!(merged, "TA");
    }

    #[test]
    fn test_invalid_calls_are_ignored() {
        let config = test_config();
        let mut valid = SampleCall::new(100, config.num_fields());
        valid.set_ref_allele(&config, "TG");
        let mut ignored = SampleCall::invalid(config.num_fields());
        ignored.set_field(0, FieldValue::Str(vec!["GGGG".to_string()]));
        let variant = Variant::new(100, vec![valid, ignored]);

        let mut merged = String::new();
        merge_reference_allele(&variant, &config, &mut merged, true).unwrap();
        assert_eq!(merged, "TG");
    }

    #[test]
    fn test_valid_call_without_reference_is_an_error() {
        let config = test_config();
        let variant = Variant::new(100, vec![SampleCall::new(100, config.num_fields())]);
        let mut merged = String::new();
        let err = merge_reference_allele(&variant, &config, &mut merged, true).unwrap_err();
        assert!(matches!(err, CombineError::InvariantViolation(_)));
    }
}
