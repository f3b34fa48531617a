use std::fmt;

pub const MISSING_INT32: i32 = i32::MIN;
pub const MISSING_INT64: i64 = i64::MIN;
pub const MISSING_UINT32: u32 = u32::MAX;
pub const MISSING_UINT64: u64 = u64::MAX;
pub const MISSING_FLOAT: f32 = f32::from_bits(0x7F80_0001);
pub const MISSING_DOUBLE: f64 = f64::from_bits(0x7FF0_0000_0000_0001);
pub const MISSING_CHAR: u8 = b'\0';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int32,
    Int64,
    UInt32,
    UInt64,
    Float,
    Double,
    Character,
    Str,
    Flag,
}

/// Typed storage for one field of one sample call.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Character(Vec<u8>),
    Str(Vec<String>),
    // Flag is presence/absence only and carries no per-slot data.
    Flag(bool),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Int32(_) => FieldType::Int32,
            FieldValue::Int64(_) => FieldType::Int64,
            FieldValue::UInt32(_) => FieldType::UInt32,
            FieldValue::UInt64(_) => FieldType::UInt64,
            FieldValue::Float(_) => FieldType::Float,
            FieldValue::Double(_) => FieldType::Double,
            FieldValue::Character(_) => FieldType::Character,
            FieldValue::Str(_) => FieldType::Str,
            FieldValue::Flag(_) => FieldType::Flag,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldValue::Int32(v) => v.len(),
            FieldValue::Int64(v) => v.len(),
            FieldValue::UInt32(v) => v.len(),
            FieldValue::UInt64(v) => v.len(),
            FieldValue::Float(v) => v.len(),
            FieldValue::Double(v) => v.len(),
            FieldValue::Character(v) => v.len(),
            FieldValue::Str(v) => v.len(),
            FieldValue::Flag(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        match self {
            FieldValue::Int32(v) => v.clear(),
            FieldValue::Int64(v) => v.clear(),
            FieldValue::UInt32(v) => v.clear(),
            FieldValue::UInt64(v) => v.clear(),
            FieldValue::Float(v) => v.clear(),
            FieldValue::Double(v) => v.clear(),
            FieldValue::Character(v) => v.clear(),
            FieldValue::Str(v) => v.clear(),
            FieldValue::Flag(v) => *v = false,
        }
    }

    /// Resize to `n` slots, filling new slots with the type's missing value.
    pub fn resize_missing(&mut self, n: usize) {
        match self {
            FieldValue::Int32(v) => v.resize(n, MISSING_INT32),
            FieldValue::Int64(v) => v.resize(n, MISSING_INT64),
            FieldValue::UInt32(v) => v.resize(n, MISSING_UINT32),
            FieldValue::UInt64(v) => v.resize(n, MISSING_UINT64),
            FieldValue::Float(v) => v.resize(n, MISSING_FLOAT),
            FieldValue::Double(v) => v.resize(n, MISSING_DOUBLE),
            FieldValue::Character(v) => v.resize(n, MISSING_CHAR),
            FieldValue::Str(v) => v.resize(n, String::new()),
            FieldValue::Flag(_) => {}
        }
    }
}

/// One of the element types a remappable field can hold.
///
/// The remap algorithms are generic over this trait and are instantiated
/// from a [`FieldType`] tag, so every write site stays statically typed;
/// a tag/storage mismatch surfaces as `None` from `values`/`values_mut`
/// instead of a reinterpreted write.
pub trait Element: Clone + PartialEq + fmt::Debug + Sized {
    fn field_type() -> FieldType;
    fn missing() -> Self;
    fn is_missing(&self) -> bool;
    fn values(field: &FieldValue) -> Option<&[Self]>;
    fn values_mut(field: &mut FieldValue) -> Option<&mut Vec<Self>>;
}

macro_rules! scalar_element {
    ($ty:ty, $variant:ident, $missing:expr) => {
        impl Element for $ty {
            fn field_type() -> FieldType {
                FieldType::$variant
            }

            fn missing() -> Self {
                $missing
            }

            fn is_missing(&self) -> bool {
                *self == $missing
            }

            fn values(field: &FieldValue) -> Option<&[Self]> {
                match field {
                    FieldValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn values_mut(field: &mut FieldValue) -> Option<&mut Vec<Self>> {
                match field {
                    FieldValue::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

scalar_element!(i32, Int32, MISSING_INT32);
scalar_element!(i64, Int64, MISSING_INT64);
scalar_element!(u32, UInt32, MISSING_UINT32);
scalar_element!(u64, UInt64, MISSING_UINT64);
scalar_element!(u8, Character, MISSING_CHAR);

// The float missing values are reserved NaN bit patterns, so they must be
// compared by bits, never with `==`.
impl Element for f32 {
    fn field_type() -> FieldType {
        FieldType::Float
    }

    fn missing() -> Self {
        MISSING_FLOAT
    }

    fn is_missing(&self) -> bool {
        self.to_bits() == MISSING_FLOAT.to_bits()
    }

    fn values(field: &FieldValue) -> Option<&[Self]> {
        match field {
            FieldValue::Float(v) => Some(v),
            _ => None,
        }
    }

    fn values_mut(field: &mut FieldValue) -> Option<&mut Vec<Self>> {
        match field {
            FieldValue::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for f64 {
    fn field_type() -> FieldType {
        FieldType::Double
    }

    fn missing() -> Self {
        MISSING_DOUBLE
    }

    fn is_missing(&self) -> bool {
        self.to_bits() == MISSING_DOUBLE.to_bits()
    }

    fn values(field: &FieldValue) -> Option<&[Self]> {
        match field {
            FieldValue::Double(v) => Some(v),
            _ => None,
        }
    }

    fn values_mut(field: &mut FieldValue) -> Option<&mut Vec<Self>> {
        match field {
            FieldValue::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl Element for String {
    fn field_type() -> FieldType {
        FieldType::Str
    }

    fn missing() -> Self {
        String::new()
    }

    fn is_missing(&self) -> bool {
        self.is_empty()
    }

    fn values(field: &FieldValue) -> Option<&[Self]> {
        match field {
            FieldValue::Str(v) => Some(v),
            _ => None,
        }
    }

    fn values_mut(field: &mut FieldValue) -> Option<&mut Vec<Self>> {
        match field {
            FieldValue::Str(v) => Some(v),
            _ => None,
        }
    }
}
