//! Structured value model consumed by the field encoder.
//!
//! A closed enum, built once from any `Serialize` type (see
//! [`crate::serializer`]), so the flattening pass only ever pattern-matches.
//!
//! Records are stored as `Vec<(String, StructuredValue)>` rather than a map
//! to keep declaration order, which is the order fields are emitted in.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

pub use serde_json::Number;

/// A value to be flattened into form fields.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredValue {
    /// Text, emitted unchanged.
    Scalar(String),
    /// Emitted as `"true"` / `"false"`.
    Bool(bool),
    /// Emitted as canonical decimal text.
    Number(Number),
    /// A missing optional.  Never contributes output.
    Absent,
    /// Repeated values sharing one field name.
    Array(Vec<StructuredValue>),
    /// Named entries in declaration order.
    Nested(Vec<(String, StructuredValue)>),
}

impl StructuredValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, StructuredValue::Absent)
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            StructuredValue::Scalar(_) => "scalar",
            StructuredValue::Bool(_) => "bool",
            StructuredValue::Number(_) => "number",
            StructuredValue::Absent => "absent value",
            StructuredValue::Array(_) => "array",
            StructuredValue::Nested(_) => "record",
        }
    }

    /// Look up a record entry by name.  Returns `None` for non-records.
    pub fn get(&self, name: &str) -> Option<&StructuredValue> {
        match self {
            StructuredValue::Nested(entries) => {
                entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
            }
            _ => None,
        }
    }
}

impl From<&str> for StructuredValue {
    fn from(s: &str) -> Self {
        StructuredValue::Scalar(s.to_owned())
    }
}

impl From<String> for StructuredValue {
    fn from(s: String) -> Self {
        StructuredValue::Scalar(s)
    }
}

impl From<bool> for StructuredValue {
    fn from(b: bool) -> Self {
        StructuredValue::Bool(b)
    }
}

impl From<i64> for StructuredValue {
    fn from(i: i64) -> Self {
        StructuredValue::Number(i.into())
    }
}

impl From<u64> for StructuredValue {
    fn from(u: u64) -> Self {
        StructuredValue::Number(u.into())
    }
}

impl<T: Into<StructuredValue>> From<Option<T>> for StructuredValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(StructuredValue::Absent, Into::into)
    }
}

impl<T: Into<StructuredValue>> From<Vec<T>> for StructuredValue {
    fn from(items: Vec<T>) -> Self {
        StructuredValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for StructuredValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuredValue::Scalar(s) => write!(f, "\"{}\"", s),
            StructuredValue::Bool(b) => write!(f, "{}", b),
            StructuredValue::Number(n) => write!(f, "{}", n),
            StructuredValue::Absent => f.write_str("<absent>"),
            StructuredValue::Array(items) => write!(f, "[{} items]", items.len()),
            StructuredValue::Nested(entries) => write!(f, "{{{} entries}}", entries.len()),
        }
    }
}

/// Serializes the way the fallback text serializer should see the value:
/// absent entries and elements are left out entirely.
impl Serialize for StructuredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StructuredValue::Scalar(s) => serializer.serialize_str(s),
            StructuredValue::Bool(b) => serializer.serialize_bool(*b),
            StructuredValue::Number(n) => n.serialize(serializer),
            StructuredValue::Absent => serializer.serialize_none(),
            StructuredValue::Array(items) => {
                let present = items.iter().filter(|v| !v.is_absent());
                let mut seq = serializer.serialize_seq(Some(present.clone().count()))?;
                for item in present {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            StructuredValue::Nested(entries) => {
                let present = entries.iter().filter(|(_, v)| !v.is_absent());
                let mut map = serializer.serialize_map(Some(present.clone().count()))?;
                for (k, v) in present {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
