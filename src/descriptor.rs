// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type message descriptors and the marshalling engine.
//!
//! [`MessageType`] is the host-facing object for one message type. It drives
//! both conversion directions generically over the type's runtime field list:
//! no per-type generated code, just a kind-tagged dispatch per field.
//!
//! Decode direction: wire bytes -> blank dynamic instance -> declaration-
//! ordered slot array -> host object (via the bridge). Unset singular and
//! empty repeated fields leave their slot empty; the host value stays sparse.
//!
//! Encode direction: host object -> slot array (via the bridge) -> populated
//! dynamic instance -> minimal wire bytes. Empty slots leave the field unset;
//! the first field-level error aborts the call before anything is encoded.
//! Dynamic instances are strictly call-scoped in both directions.

use crate::bridge::ValueBridge;
use crate::error::{Error, Result};
use crate::schema::Schema;
use crate::value::Value;
use bytes::Bytes;
use log::{error, warn};
use prost::Message;
use prost_reflect::{DynamicMessage, FieldDescriptor, Kind, Value as ProtoValue};
use std::fmt;

/// One message type of a loaded [`Schema`], exposing parse, serialize and
/// field introspection.
///
/// Holds a non-owning handle back to its registry (an index into it), used to
/// allocate instances and to resolve the descriptors of message-typed fields
/// at conversion time. Lazy lookup keeps recursive message graphs finite.
#[derive(Debug, Clone)]
pub struct MessageType {
    schema: Schema,
    index: usize,
}

impl MessageType {
    pub(crate) fn new(schema: Schema, index: usize) -> Self {
        Self { schema, index }
    }

    /// The owning schema registry.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Fully-qualified dotted name of this message type.
    pub fn full_name(&self) -> &str {
        self.schema.entry(self.index).descriptor.full_name()
    }

    /// Field names in declaration order.
    ///
    /// The position of each name is the index its value occupies in the slot
    /// arrays crossing the [`ValueBridge`] boundary.
    pub fn fields(&self) -> &[String] {
        &self.schema.entry(self.index).field_names
    }

    /// Decode wire bytes into a host value.
    ///
    /// Fails with [`Error::MalformedMessage`] when the bytes do not decode
    /// against this type; no partial value is returned. The dynamic instance
    /// backing the conversion is released on every path.
    pub fn parse<B: ValueBridge>(&self, bytes: &[u8], bridge: &B) -> Result<B::Object> {
        let descriptor = self.schema.entry(self.index).descriptor.clone();
        let message = DynamicMessage::decode(descriptor, bytes).map_err(Error::MalformedMessage)?;
        Ok(self.message_to_value(&message, bridge))
    }

    /// Encode a host value into its minimal wire-format byte sequence.
    ///
    /// Shape mismatches fail with [`Error::NotAnObject`] / [`Error::NotAnArray`],
    /// unresolvable enum values with [`Error::UnknownEnumValue`]; any error
    /// aborts before encoding and produces no bytes.
    ///
    /// 64-bit fields accept base-10 text for full-range fidelity. A native
    /// numeric value is accepted as a fallback and coerces through double
    /// precision, losing exactness beyond its integer range.
    pub fn serialize<B: ValueBridge>(&self, object: &B::Object, bridge: &B) -> Result<Vec<u8>> {
        let mut message = self.schema.new_message(self.index);
        self.populate_message(&mut message, object, bridge)?;
        Ok(message.encode_to_vec())
    }

    /// Convert a populated dynamic instance to a host value, field by field
    /// in declaration order. Absent fields stay absent: their slot is left
    /// empty rather than filled with a placeholder.
    fn message_to_value<B: ValueBridge>(&self, message: &DynamicMessage, bridge: &B) -> B::Object {
        let entry = self.schema.entry(self.index);
        let mut slots: Vec<Option<Value<B::Object>>> = Vec::with_capacity(entry.field_names.len());

        for field in entry.descriptor.fields() {
            if field.is_map() || !message.has_field(&field) {
                slots.push(None);
                continue;
            }

            let child = self.schema.descriptor_for(&field);
            if matches!(field.kind(), Kind::Message(_)) && child.is_none() {
                warn!(
                    "{}.{}: message type not registered, field skipped",
                    self.full_name(),
                    field.name()
                );
                slots.push(None);
                continue;
            }

            let value = message.get_field(&field);
            let slot = if field.is_list() {
                let elements = value.as_list().unwrap_or(&[]);
                if elements.is_empty() {
                    None
                } else {
                    Some(Value::List(
                        elements
                            .iter()
                            .filter_map(|element| {
                                element_to_value(&field, child.as_ref(), element, bridge)
                            })
                            .collect(),
                    ))
                }
            } else {
                element_to_value(&field, child.as_ref(), &value, bridge)
            };
            slots.push(slot);
        }

        bridge.array_as_object(&entry.field_names, slots)
    }

    /// Populate a dynamic instance from a host value. Empty slots leave the
    /// field unset; the first field-level error stops the conversion (fields
    /// set before it remain on the instance, which the caller discards).
    fn populate_message<B: ValueBridge>(
        &self,
        message: &mut DynamicMessage,
        object: &B::Object,
        bridge: &B,
    ) -> Result<()> {
        let entry = self.schema.entry(self.index);
        let slots = bridge.object_as_array(object, &entry.field_names);

        for (position, field) in entry.descriptor.fields().enumerate() {
            let value = match slots.get(position) {
                Some(Some(value)) => value,
                _ => continue,
            };
            if field.is_map() {
                continue;
            }

            let converted = if let Kind::Message(_) = field.kind() {
                let child = match self.schema.descriptor_for(&field) {
                    Some(child) => child,
                    None => {
                        warn!(
                            "{}.{}: message type not registered, field skipped",
                            self.full_name(),
                            field.name()
                        );
                        continue;
                    }
                };
                if field.is_list() {
                    let elements = value.as_list().ok_or(Error::NotAnArray)?;
                    let mut items = Vec::with_capacity(elements.len());
                    for element in elements {
                        items.push(child.nested_from_value(element, bridge)?);
                    }
                    ProtoValue::List(items)
                } else {
                    child.nested_from_value(value, bridge)?
                }
            } else if field.is_list() {
                let elements = value.as_list().ok_or(Error::NotAnArray)?;
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(scalar_from_value(&field, element)?);
                }
                ProtoValue::List(items)
            } else {
                scalar_from_value(&field, value)?
            };

            // Converted values match the field kind by construction.
            if let Err(err) = message.try_set_field(&field, converted) {
                error!(
                    "{}.{}: reflective set rejected: {}",
                    self.full_name(),
                    field.name(),
                    err
                );
            }
        }

        Ok(())
    }

    /// Encode one message-typed element into a freshly allocated nested
    /// instance of this type.
    fn nested_from_value<B: ValueBridge>(
        &self,
        value: &Value<B::Object>,
        bridge: &B,
    ) -> Result<ProtoValue> {
        let object = value.as_object().ok_or(Error::NotAnObject)?;
        let mut nested = self.schema.new_message(self.index);
        self.populate_message(&mut nested, object, bridge)?;
        Ok(ProtoValue::Message(nested))
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

/// Decode-direction conversion of one element (or one singular value).
///
/// `child` is the resolved descriptor for message-typed fields; the caller
/// has already skipped the field when resolution failed.
fn element_to_value<B: ValueBridge>(
    field: &FieldDescriptor,
    child: Option<&MessageType>,
    element: &ProtoValue,
    bridge: &B,
) -> Option<Value<B::Object>> {
    let converted = match field.kind() {
        Kind::Message(_) => {
            let message = element.as_message()?;
            Value::Object(child?.message_to_value(message, bridge))
        }
        Kind::String => Value::Text(element.as_str().unwrap_or_default().to_string()),
        Kind::Bytes => Value::Bytes(element.as_bytes().map(|b| b.to_vec()).unwrap_or_default()),
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => Value::I32(element.as_i32().unwrap_or(0)),
        Kind::Uint32 | Kind::Fixed32 => Value::U32(element.as_u32().unwrap_or(0)),
        // 64-bit integers travel as base-10 text so the full range survives
        // hosts without an exact 64-bit numeric type.
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => {
            Value::Text(element.as_i64().unwrap_or(0).to_string())
        }
        Kind::Uint64 | Kind::Fixed64 => Value::Text(element.as_u64().unwrap_or(0).to_string()),
        Kind::Float => Value::F32(element.as_f32().unwrap_or(0.0)),
        Kind::Double => Value::F64(element.as_f64().unwrap_or(0.0)),
        Kind::Bool => Value::Bool(element.as_bool().unwrap_or(false)),
        Kind::Enum(enum_desc) => {
            let number = element.as_enum_number().unwrap_or(0);
            match enum_desc.get_value(number) {
                Some(variant) => Value::Text(variant.name().to_string()),
                // Open enums can carry unregistered numbers; surface the tag
                // itself so the value still round-trips.
                None => Value::I32(number),
            }
        }
    };
    Some(converted)
}

/// Encode-direction conversion of one non-message element.
fn scalar_from_value<O>(field: &FieldDescriptor, value: &Value<O>) -> Result<ProtoValue> {
    let converted = match field.kind() {
        // Message kinds are dispatched by the caller.
        Kind::Message(_) => return Err(Error::NotAnObject),
        Kind::String => {
            let text = match value.as_bytes() {
                Some(raw) => String::from_utf8_lossy(raw).into_owned(),
                None => value.coerce_text(),
            };
            ProtoValue::String(text)
        }
        Kind::Bytes => {
            let raw = match value.as_bytes() {
                Some(raw) => raw.to_vec(),
                None => value.coerce_text().into_bytes(),
            };
            ProtoValue::Bytes(Bytes::from(raw))
        }
        Kind::Int32 | Kind::Sint32 | Kind::Sfixed32 => ProtoValue::I32(value.coerce_i32()),
        Kind::Uint32 | Kind::Fixed32 => ProtoValue::U32(value.coerce_u32()),
        Kind::Int64 | Kind::Sint64 | Kind::Sfixed64 => ProtoValue::I64(value.coerce_i64()),
        Kind::Uint64 | Kind::Fixed64 => ProtoValue::U64(value.coerce_u64()),
        Kind::Float => ProtoValue::F32(value.coerce_f32()),
        Kind::Double => ProtoValue::F64(value.coerce_f64()),
        Kind::Bool => ProtoValue::Bool(value.coerce_bool()),
        Kind::Enum(enum_desc) => {
            let resolved = if value.is_numeric() {
                enum_desc.get_value(value.coerce_i32())
            } else if let Some(name) = value.as_text() {
                enum_desc.get_value_by_name(name)
            } else {
                None
            };
            let variant = resolved.ok_or(Error::UnknownEnumValue)?;
            ProtoValue::EnumNumber(variant.number())
        }
    };
    Ok(converted)
}
