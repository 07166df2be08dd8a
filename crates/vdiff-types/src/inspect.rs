//! Serde bridge: build a [`Value`] from anything that implements `Serialize`.
//!
//! Rust has no runtime reflection, so the serde data model stands in for it.
//! Structs keep their Rust type name and field order, tuples become fixed
//! arrays, enums become variants holding a struct named `Enum::Variant`.

use serde::ser::{self, Serialize};

use crate::error::InspectError;
use crate::value::{Field, Struct, Value};

type Result<T> = std::result::Result<T, InspectError>;

/// Inspect `value` through its `Serialize` implementation.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

fn variant_name(name: &str, variant: &str) -> String {
    format!("{name}::{variant}")
}

/// A `serde::Serializer` whose output is a [`Value`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = InspectError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = RecordBuilder;
    type SerializeTupleVariant = VariantBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = RecordBuilder;
    type SerializeStructVariant = VariantBuilder;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(v.into())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Value::Seq(v.iter().copied().map(Value::from).collect()))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::none())
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(Value::some(to_value(value)?))
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Nil)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value> {
        Ok(RecordBuilder::new(name.to_owned(), 0).finish())
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        let inner = RecordBuilder::new(variant_name(name, variant), 0).finish();
        Ok(Value::variant(name, inner))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(Value::record(name, [("0", to_value(value)?)]))
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let inner = Value::record(variant_name(name, variant), [("0", to_value(value)?)]);
        Ok(Value::variant(name, inner))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
            fixed: false,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len),
            fixed: true,
        })
    }

    fn serialize_tuple_struct(self, name: &'static str, len: usize) -> Result<RecordBuilder> {
        Ok(RecordBuilder::new(name.to_owned(), len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder> {
        Ok(VariantBuilder {
            enum_name: name,
            record: RecordBuilder::new(variant_name(name, variant), len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            next_key: None,
        })
    }

    fn serialize_struct(self, name: &'static str, len: usize) -> Result<RecordBuilder> {
        Ok(RecordBuilder::new(name.to_owned(), len))
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantBuilder> {
        ser::Serializer::serialize_tuple_variant(self, name, variant_index, variant, len)
    }
}

/// Collects sequence elements; `fixed` sequences (tuples) become arrays.
pub struct SeqBuilder {
    items: Vec<Value>,
    fixed: bool,
}

impl SeqBuilder {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn finish(self) -> Value {
        if self.fixed {
            Value::Array(self.items)
        } else {
            Value::Seq(self.items)
        }
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// Collects struct fields in declaration order. Tuple fields are named by
/// their position.
pub struct RecordBuilder {
    name: String,
    fields: Vec<Field>,
}

impl RecordBuilder {
    fn new(name: String, len: usize) -> Self {
        Self {
            name,
            fields: Vec::with_capacity(len),
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, name: &str, value: &T) -> Result<()> {
        self.fields.push(Field {
            name: name.into(),
            value: to_value(value)?,
        });
        Ok(())
    }

    fn push_positional<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let name = self.fields.len().to_string();
        self.push(&name, value)
    }

    fn finish(self) -> Value {
        Value::Struct(Struct {
            name: self.name.into(),
            fields: self.fields,
        })
    }
}

impl ser::SerializeStruct for RecordBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

impl ser::SerializeTupleStruct for RecordBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push_positional(value)
    }

    fn end(self) -> Result<Value> {
        Ok(self.finish())
    }
}

/// A tuple or struct variant: the fields are collected into the concrete
/// `Enum::Variant` struct, which is then wrapped in the enum's variant.
pub struct VariantBuilder {
    enum_name: &'static str,
    record: RecordBuilder,
}

impl ser::SerializeTupleVariant for VariantBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.push_positional(value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::variant(self.enum_name, self.record.finish()))
    }
}

impl ser::SerializeStructVariant for VariantBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.record.push(key, value)
    }

    fn end(self) -> Result<Value> {
        Ok(Value::variant(self.enum_name, self.record.finish()))
    }
}

/// Collects map entries in the order the map yields them.
pub struct MapBuilder {
    entries: Vec<(Value, Value)>,
    next_key: Option<Value>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = InspectError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(to_value(key)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| InspectError::Custom("map value serialized before its key".into()))?;
        self.entries.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.entries))
    }
}
