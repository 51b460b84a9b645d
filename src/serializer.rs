//! `serde::Serializer` that builds a [`StructuredValue`] from any
//! `Serialize` type.
//!
//! Type mapping:
//!   bool                         → Bool
//!   integers, floats             → Number
//!   char, str, unit variant      → Scalar
//!   None, (), unit struct        → Absent
//!   Some(v), newtype struct      → v
//!   seq, tuple, tuple struct     → Array
//!   bytes                        → Array of Number (one per byte)
//!   map, struct                  → Nested, in serialization order
//!   newtype/tuple/struct variant → Nested with one entry named after the variant
//!
//! Floats have no total canonical form in every width, so an `f32` goes
//! through its shortest decimal text before widening; otherwise 0.1f32
//! would render as 0.10000000149011612.

use serde::ser::{self, Serialize};

use crate::encode::number_text;
use crate::errors::EncodingError;
use crate::value::{Number, StructuredValue};

/// Convert any `Serialize` value into the structured model.
pub fn to_structured<T: ?Sized + Serialize>(value: &T) -> Result<StructuredValue, EncodingError> {
    value.serialize(ValueSerializer)
}

fn float_number(v: f64) -> Result<StructuredValue, EncodingError> {
    Number::from_f64(v)
        .map(StructuredValue::Number)
        .ok_or_else(|| EncodingError::SerializationFailure(format!("non-finite number {v}")))
}

/// Map keys become field names, so they must come out as text.
fn key_text(key: StructuredValue) -> Result<String, EncodingError> {
    match key {
        StructuredValue::Scalar(s) => Ok(s),
        StructuredValue::Number(n) => Ok(number_text(&n)),
        StructuredValue::Bool(b) => Ok(b.to_string()),
        other => Err(EncodingError::SerializationFailure(format!(
            "map key must be text, got {}",
            other.kind()
        ))),
    }
}

fn single_entry(variant: &'static str, value: StructuredValue) -> StructuredValue {
    StructuredValue::Nested(vec![(variant.to_owned(), value)])
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = StructuredValue;
    type Error = EncodingError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = SeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = MapBuilder;

    fn serialize_bool(self, v: bool) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<StructuredValue, EncodingError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<StructuredValue, EncodingError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<StructuredValue, EncodingError> {
        self.serialize_i64(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Number(v.into()))
    }

    fn serialize_i128(self, v: i128) -> Result<StructuredValue, EncodingError> {
        if let Ok(i) = i64::try_from(v) {
            return self.serialize_i64(i);
        }
        if let Ok(u) = u64::try_from(v) {
            return self.serialize_u64(u);
        }
        Err(EncodingError::SerializationFailure(format!(
            "integer {v} does not fit in 64 bits"
        )))
    }

    fn serialize_u8(self, v: u8) -> Result<StructuredValue, EncodingError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<StructuredValue, EncodingError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<StructuredValue, EncodingError> {
        self.serialize_u64(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Number(v.into()))
    }

    fn serialize_u128(self, v: u128) -> Result<StructuredValue, EncodingError> {
        match u64::try_from(v) {
            Ok(u) => self.serialize_u64(u),
            Err(_) => Err(EncodingError::SerializationFailure(format!(
                "integer {v} does not fit in 64 bits"
            ))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<StructuredValue, EncodingError> {
        if !v.is_finite() {
            return float_number(f64::from(v));
        }
        let widened: f64 = v
            .to_string()
            .parse()
            .map_err(|_| EncodingError::SerializationFailure(format!("unparseable float {v}")))?;
        float_number(widened)
    }

    fn serialize_f64(self, v: f64) -> Result<StructuredValue, EncodingError> {
        float_number(v)
    }

    fn serialize_char(self, v: char) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Scalar(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Scalar(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Array(
            v.iter()
                .map(|b| StructuredValue::Number(u64::from(*b).into()))
                .collect(),
        ))
    }

    fn serialize_none(self) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Absent)
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<StructuredValue, EncodingError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Absent)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Absent)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<StructuredValue, EncodingError> {
        Ok(StructuredValue::Scalar(variant.to_owned()))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<StructuredValue, EncodingError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<StructuredValue, EncodingError> {
        Ok(single_entry(variant, value.serialize(ValueSerializer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder, EncodingError> {
        Ok(SeqBuilder::new(len, None))
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder, EncodingError> {
        Ok(SeqBuilder::new(Some(len), None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder, EncodingError> {
        Ok(SeqBuilder::new(Some(len), None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SeqBuilder, EncodingError> {
        Ok(SeqBuilder::new(Some(len), Some(variant)))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder, EncodingError> {
        Ok(MapBuilder::new(len, None))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<MapBuilder, EncodingError> {
        Ok(MapBuilder::new(Some(len), None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<MapBuilder, EncodingError> {
        Ok(MapBuilder::new(Some(len), Some(variant)))
    }
}

// ── Container builders ───────────────────────────────────────
// `variant` is set for enum variants; the finished container is then
// wrapped as a single-entry record keyed by the variant name.

struct SeqBuilder {
    items: Vec<StructuredValue>,
    variant: Option<&'static str>,
}

impl SeqBuilder {
    fn new(len: Option<usize>, variant: Option<&'static str>) -> Self {
        Self {
            items: Vec::with_capacity(len.unwrap_or(0)),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodingError> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn finish(self) -> StructuredValue {
        let array = StructuredValue::Array(self.items);
        match self.variant {
            Some(variant) => single_entry(variant, array),
            None => array,
        }
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = StructuredValue;
    type Error = EncodingError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodingError> {
        self.push(value)
    }

    fn end(self) -> Result<StructuredValue, EncodingError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = StructuredValue;
    type Error = EncodingError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodingError> {
        self.push(value)
    }

    fn end(self) -> Result<StructuredValue, EncodingError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = StructuredValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodingError> {
        self.push(value)
    }

    fn end(self) -> Result<StructuredValue, EncodingError> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleVariant for SeqBuilder {
    type Ok = StructuredValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodingError> {
        self.push(value)
    }

    fn end(self) -> Result<StructuredValue, EncodingError> {
        Ok(self.finish())
    }
}

struct MapBuilder {
    entries: Vec<(String, StructuredValue)>,
    pending_key: Option<String>,
    variant: Option<&'static str>,
}

impl MapBuilder {
    fn new(len: Option<usize>, variant: Option<&'static str>) -> Self {
        Self {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, key: String, value: &T) -> Result<(), EncodingError> {
        self.entries.push((key, value.serialize(ValueSerializer)?));
        Ok(())
    }

    fn finish(self) -> StructuredValue {
        let record = StructuredValue::Nested(self.entries);
        match self.variant {
            Some(variant) => single_entry(variant, record),
            None => record,
        }
    }
}

impl ser::SerializeMap for MapBuilder {
    type Ok = StructuredValue;
    type Error = EncodingError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), EncodingError> {
        self.pending_key = Some(key_text(key.serialize(ValueSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), EncodingError> {
        let key = self.pending_key.take().ok_or_else(|| {
            EncodingError::SerializationFailure("map value serialized before its key".into())
        })?;
        self.push(key, value)
    }

    fn end(self) -> Result<StructuredValue, EncodingError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = StructuredValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodingError> {
        self.push(key.to_owned(), value)
    }

    fn end(self) -> Result<StructuredValue, EncodingError> {
        Ok(self.finish())
    }
}

impl ser::SerializeStructVariant for MapBuilder {
    type Ok = StructuredValue;
    type Error = EncodingError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), EncodingError> {
        self.push(key.to_owned(), value)
    }

    fn end(self) -> Result<StructuredValue, EncodingError> {
        Ok(self.finish())
    }
}
