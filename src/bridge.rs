// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The host-value boundary.
//!
//! The marshalling engine never touches the host's structured representation
//! directly. Both directions cross through a [`ValueBridge`]: the embedding
//! layer supplies the pair of converters that translate between its
//! named-property object and the declaration-ordered slot array the engine
//! operates on. The engine relies on positional correspondence with
//! [`MessageType::fields()`](crate::MessageType::fields) and nothing else.
//!
//! [`MapBridge`] is the map-backed reference implementation, suitable for
//! tests and standalone callers that have no host runtime of their own.

use crate::value::Value;
use std::collections::BTreeMap;

/// Converter pair between a host object and the engine's field-index-ordered
/// slot array.
///
/// A `None` slot means the field is absent: the decode direction never
/// materializes placeholders for unset fields, and the encode direction
/// leaves `None` slots unset on the wire. Implementations must tolerate
/// sparse arrays in both directions.
pub trait ValueBridge {
    /// The host's structured value representation.
    type Object;

    /// Host object -> ordered array indexed by declared field position.
    ///
    /// `fields` is the declaration-ordered field name list of the message
    /// type being converted; the returned array uses the same indexing.
    fn object_as_array(
        &self,
        object: &Self::Object,
        fields: &[String],
    ) -> Vec<Option<Value<Self::Object>>>;

    /// Ordered array -> host object. Slots are indexed in declaration order
    /// and `None` slots must simply be omitted from the result.
    fn array_as_object(
        &self,
        fields: &[String],
        slots: Vec<Option<Value<Self::Object>>>,
    ) -> Self::Object;
}

/// A plain name-to-value record, the host object type of [`MapBridge`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record(pub BTreeMap<String, Value<Record>>);

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value<Record>>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Get a property value by name.
    pub fn get(&self, name: &str) -> Option<&Value<Record>> {
        self.0.get(name)
    }

    /// Number of present properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no properties are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// [`BTreeMap`]-backed [`ValueBridge`].
///
/// Property names are the declared field names; absent slots produce absent
/// keys, never null placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct MapBridge;

impl ValueBridge for MapBridge {
    type Object = Record;

    fn object_as_array(&self, object: &Record, fields: &[String]) -> Vec<Option<Value<Record>>> {
        fields
            .iter()
            .map(|name| object.0.get(name).cloned())
            .collect()
    }

    fn array_as_object(&self, fields: &[String], slots: Vec<Option<Value<Record>>>) -> Record {
        let mut properties = BTreeMap::new();
        for (name, slot) in fields.iter().zip(slots) {
            if let Some(value) = slot {
                properties.insert(name.clone(), value);
            }
        }
        Record(properties)
    }
}
