use super::field::FieldType;
use crate::error::{CombineError, Result};
use std::borrow::Cow;

/// How the number of slots in a field is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldNumber {
    Fixed(usize),
    Variable,
    /// One slot per alternate allele ('A')
    AlleleCount,
    /// One slot per allele, reference included ('R')
    AlleleAndRef,
    /// One slot per unordered allele pair ('G')
    GenotypeCount,
}

impl FieldNumber {
    pub fn is_allele_length_dependent(self) -> bool {
        matches!(self, FieldNumber::AlleleCount | FieldNumber::AlleleAndRef)
    }

    pub fn is_genotype_length_dependent(self) -> bool {
        self == FieldNumber::GenotypeCount
    }

    pub fn alt_alleles_only(self) -> bool {
        self == FieldNumber::AlleleCount
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub id: Cow<'static, str>,
    pub field_type: FieldType,
    pub number: FieldNumber,
}

impl FieldDescriptor {
    /// Compile-time constructor for static descriptor tables.
    pub const fn builtin(id: &'static str, field_type: FieldType, number: FieldNumber) -> Self {
        FieldDescriptor {
            id: Cow::Borrowed(id),
            field_type,
            number,
        }
    }

    /// Runtime-allocated constructor for fields discovered from headers.
    pub fn new(id: &str, field_type: FieldType, number: FieldNumber) -> Self {
        FieldDescriptor {
            id: Cow::Owned(id.to_string()),
            field_type,
            number,
        }
    }
}

/// The set of queried fields at a position, with the distinguished
/// reference, alt, and genotype-call field indices.
///
/// `FieldNumber` is a single closed enum, so a field physically cannot be
/// both allele-length-dependent and genotype-length-dependent; `new`
/// validates the rest of the metadata up front.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    fields: Vec<FieldDescriptor>,
    ref_idx: usize,
    alt_idx: usize,
    gt_idx: Option<usize>,
}

impl QueryConfig {
    pub fn new(
        fields: Vec<FieldDescriptor>,
        ref_idx: usize,
        alt_idx: usize,
        gt_idx: Option<usize>,
    ) -> Result<Self> {
        let config = QueryConfig {
            fields,
            ref_idx,
            alt_idx,
            gt_idx,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.ref_idx == self.alt_idx {
            return Err(CombineError::InvalidConfig(format!(
                "reference and alt fields cannot share index {}",
                self.ref_idx
            )));
        }

        let ref_field = self.checked_field(self.ref_idx, "reference")?;
        if ref_field.field_type != FieldType::Str {
            return Err(CombineError::InvalidConfig(format!(
                "reference field {} must be string-typed, got {:?}",
                ref_field.id, ref_field.field_type
            )));
        }

        let alt_field = self.checked_field(self.alt_idx, "alt")?;
        if alt_field.field_type != FieldType::Str {
            return Err(CombineError::InvalidConfig(format!(
                "alt field {} must be string-typed, got {:?}",
                alt_field.id, alt_field.field_type
            )));
        }

        if let Some(gt_idx) = self.gt_idx {
            let gt_field = self.checked_field(gt_idx, "genotype-call")?;
            if gt_field.field_type != FieldType::Int32 {
                return Err(CombineError::InvalidConfig(format!(
                    "genotype-call field {} must hold 32-bit allele indices, got {:?}",
                    gt_field.id, gt_field.field_type
                )));
            }
            if gt_field.number.is_allele_length_dependent()
                || gt_field.number.is_genotype_length_dependent()
            {
                return Err(CombineError::InvalidConfig(format!(
                    "genotype-call field {} cannot be length-dependent on alleles or genotypes",
                    gt_field.id
                )));
            }
        }

        Ok(())
    }

    fn checked_field(&self, idx: usize, role: &str) -> Result<&FieldDescriptor> {
        self.fields.get(idx).ok_or_else(|| {
            CombineError::InvalidConfig(format!(
                "{} field index {} out of range ({} fields queried)",
                role,
                idx,
                self.fields.len()
            ))
        })
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }

    pub fn ref_idx(&self) -> usize {
        self.ref_idx
    }

    pub fn alt_idx(&self) -> usize {
        self.alt_idx
    }

    pub fn gt_idx(&self) -> Option<usize> {
        self.gt_idx
    }

    /// The two reserved common output fields of the combined record.
    pub fn is_common_field(&self, idx: usize) -> bool {
        idx == self.ref_idx || idx == self.alt_idx
    }
}
