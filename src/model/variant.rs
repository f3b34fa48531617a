use super::descriptor::QueryConfig;
use super::field::FieldValue;

/// One sample's contribution at a position.
///
/// A call whose start coordinate precedes the merge position is the
/// continuation of a multi-base reference block; its reference field is
/// then meaningless and gets overwritten with the "N" placeholder before
/// merging.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleCall {
    start: i64,
    valid: bool,
    fields: Vec<Option<FieldValue>>,
}

impl SampleCall {
    pub fn new(start: i64, num_fields: usize) -> Self {
        SampleCall {
            start,
            valid: true,
            fields: vec![None; num_fields],
        }
    }

    /// A placeholder for a sample with no data at this position.
    pub fn invalid(num_fields: usize) -> Self {
        SampleCall {
            start: 0,
            valid: false,
            fields: vec![None; num_fields],
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_field(&mut self, field_idx: usize, value: FieldValue) {
        self.fields[field_idx] = Some(value);
    }

    pub fn field(&self, field_idx: usize) -> Option<&FieldValue> {
        self.fields.get(field_idx)?.as_ref()
    }

    pub fn field_mut(&mut self, field_idx: usize) -> Option<&mut FieldValue> {
        self.fields.get_mut(field_idx)?.as_mut()
    }

    pub fn ref_allele(&self, config: &QueryConfig) -> Option<&str> {
        match self.field(config.ref_idx()) {
            Some(FieldValue::Str(v)) => v.first().map(String::as_str),
            _ => None,
        }
    }

    pub fn set_ref_allele(&mut self, config: &QueryConfig, allele: &str) {
        self.fields[config.ref_idx()] = Some(FieldValue::Str(vec![allele.to_string()]));
    }

    pub fn alt_alleles(&self, config: &QueryConfig) -> &[String] {
        match self.field(config.alt_idx()) {
            Some(FieldValue::Str(v)) => v,
            _ => &[],
        }
    }
}

/// All sample calls considered together at one position, plus the merged
/// reference and alt alleles once a combine pass has installed them.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    position: i64,
    calls: Vec<SampleCall>,
    common_ref: String,
    common_alts: Vec<String>,
}

impl Variant {
    pub fn new(position: i64, calls: Vec<SampleCall>) -> Self {
        Variant {
            position,
            calls,
            common_ref: String::new(),
            common_alts: Vec::new(),
        }
    }

    pub fn position(&self) -> i64 {
        self.position
    }

    pub fn num_calls(&self) -> usize {
        self.calls.len()
    }

    pub fn call(&self, call_idx: usize) -> Option<&SampleCall> {
        self.calls.get(call_idx)
    }

    pub fn call_mut(&mut self, call_idx: usize) -> Option<&mut SampleCall> {
        self.calls.get_mut(call_idx)
    }

    pub fn calls(&self) -> &[SampleCall] {
        &self.calls
    }

    pub fn calls_mut(&mut self) -> &mut [SampleCall] {
        &mut self.calls
    }

    /// Iterate over valid calls, yielding each call's index within the
    /// variant. Indices are not contiguous when invalid calls are skipped.
    pub fn valid_calls(&self) -> impl Iterator<Item = (usize, &SampleCall)> {
        self.calls
            .iter()
            .enumerate()
            .filter(|(_, call)| call.is_valid())
    }

    pub fn set_common_fields(&mut self, ref_allele: String, alt_alleles: Vec<String>) {
        self.common_ref = ref_allele;
        self.common_alts = alt_alleles;
    }

    pub fn common_ref(&self) -> &str {
        &self.common_ref
    }

    pub fn common_alts(&self) -> &[String] {
        &self.common_alts
    }
}
