//! Field encoder: flattens a [`StructuredValue`] record into an ordered
//! list of `(name, value)` text fields.
//!
//! Per entry of the root record:
//!   Absent  : nothing
//!   Scalar  : the text unchanged
//!   Bool    : "true" / "false"
//!   Number  : plain decimal text, never exponent form; integral floats
//!             drop the fraction (3.0 → "3", 1e21 → "1000000000000000000000")
//!   Array   : one field per present element, named per `ArrayEncoding`
//!   Nested  : one field holding the record's JSON text
//!
//! Nested records are not flattened into dotted paths.  They go through the
//! fallback text serializer (`serde_json`) as a whole.

use std::borrow::Cow;

use serde::Serialize;

use crate::constants::ARRAY_BRACKET_SUFFIX;
use crate::errors::EncodingError;
use crate::serializer::to_structured;
use crate::value::{Number, StructuredValue};

/// One `(name, value)` pair destined for one body part.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// How repeated values are named.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ArrayEncoding {
    /// `tags=a`, `tags=b`
    #[default]
    AccumulateValues,
    /// `tags[]=a`, `tags[]=b`
    BracketSuffix,
}

impl ArrayEncoding {
    /// Name carried by each element field of the array `name`.
    pub fn element_name<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            ArrayEncoding::AccumulateValues => Cow::Borrowed(name),
            ArrayEncoding::BracketSuffix => Cow::Owned(format!("{name}{ARRAY_BRACKET_SUFFIX}")),
        }
    }
}

/// Serialize `value` into the structured model, then flatten it.
pub fn encode<T: ?Sized + Serialize>(
    value: &T,
    strategy: ArrayEncoding,
) -> Result<Vec<Field>, EncodingError> {
    encode_fields(&to_structured(value)?, strategy)
}

/// Flatten a record into fields, preserving its entry order.
///
/// An absent root yields no fields.  Any other non-record root is rejected:
/// its fields would have no name.
pub fn encode_fields(
    value: &StructuredValue,
    strategy: ArrayEncoding,
) -> Result<Vec<Field>, EncodingError> {
    let entries = match value {
        StructuredValue::Nested(entries) => entries,
        StructuredValue::Absent => return Ok(Vec::new()),
        other => return Err(EncodingError::UnsupportedRoot { kind: other.kind() }),
    };

    let mut fields = Vec::with_capacity(entries.len());
    for (name, entry) in entries {
        if name.is_empty() {
            return Err(EncodingError::EmptyFieldName);
        }
        encode_entry(name, entry, strategy, &mut fields)?;
    }
    tracing::trace!(fields = fields.len(), ?strategy, "encoded record");
    Ok(fields)
}

fn encode_entry(
    name: &str,
    value: &StructuredValue,
    strategy: ArrayEncoding,
    out: &mut Vec<Field>,
) -> Result<(), EncodingError> {
    match value {
        StructuredValue::Absent => Ok(()),
        StructuredValue::Array(items) => {
            let element_name = strategy.element_name(name);
            for item in items.iter().filter(|v| !v.is_absent()) {
                out.push(Field::new(element_name.as_ref(), field_text(name, item)?));
            }
            Ok(())
        }
        other => {
            out.push(Field::new(name, field_text(name, other)?));
            Ok(())
        }
    }
}

/// Text of a single field.  `name` is only used for error context.
fn field_text(name: &str, value: &StructuredValue) -> Result<String, EncodingError> {
    match value {
        StructuredValue::Scalar(s) => Ok(s.clone()),
        StructuredValue::Bool(b) => Ok(b.to_string()),
        StructuredValue::Number(n) => Ok(number_text(n)),
        StructuredValue::Nested(_) => Ok(serde_json::to_string(value)?),
        // Arrays only reach here as array elements; absent values are
        // filtered out by the caller.
        StructuredValue::Array(_) | StructuredValue::Absent => {
            Err(EncodingError::UnsupportedNesting {
                field: name.to_owned(),
            })
        }
    }
}

/// Integers as-is; floats through `f64`'s `Display`, which has no exponent
/// form.
pub(crate) fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}
