// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema registry: descriptor pool ownership and type lookup.
//!
//! A [`Schema`] wraps exactly one descriptor pool — either the process-wide
//! built-in pool or a pool decoded from a caller-supplied serialized
//! descriptor set — and indexes every message type in it. Top-level types are
//! exposed to the host under their fully-qualified dotted name; nested types
//! are indexed too so message-typed fields resolve during conversion, even
//! through recursive type graphs.
//!
//! The registry is immutable after construction. [`MessageType`] handles
//! reference it through a cheap reference-counted clone plus an entry index,
//! so descriptors never outlive their registry and recursive types resolve
//! lazily at conversion time instead of by eager embedding.

use crate::descriptor::MessageType;
use crate::error::{Error, Result};
use log::{debug, warn};
use prost_reflect::{DescriptorPool, DynamicMessage, FieldDescriptor, Kind, MessageDescriptor};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One registered message type: its reflection descriptor plus the
/// declaration-ordered field name list handed to the host.
#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) descriptor: MessageDescriptor,
    pub(crate) field_names: Vec<String>,
}

#[derive(Debug)]
struct SchemaInner {
    /// Kept alive for the lifetime of every descriptor and instance; the
    /// built-in pool is a shared process-wide handle that is never torn down.
    #[allow(dead_code)]
    pool: DescriptorPool,
    /// Every message type in the pool, nested types included.
    entries: Vec<Entry>,
    /// Fully-qualified name -> entry index, covering all entries.
    by_full_name: HashMap<String, usize>,
    /// Entry indices of the host-visible top-level types, in pool order.
    exposed: Vec<usize>,
}

/// A loaded schema: the registry of message types available for parsing and
/// serializing.
///
/// Cheap to clone; all clones share one immutable registry. Safe to use from
/// multiple threads concurrently since conversion mutates no shared state.
///
/// # Example
///
/// ```no_run
/// use protodyn::{MapBridge, Record, Schema};
///
/// let bytes = std::fs::read("unittest.desc").unwrap();
/// let schema = Schema::new(Some(&bytes)).unwrap();
///
/// let ty = schema.get("protobuf_unittest.TestAllTypes").unwrap();
/// let record: Record = ty.parse(&std::fs::read("golden_message").unwrap(), &MapBridge).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

impl Schema {
    /// Build a schema registry.
    ///
    /// With `source` bytes, the bytes are decoded as a serialized descriptor
    /// set and a fresh pool is built from it; [`Error::MalformedSchema`] is
    /// returned when the bytes do not parse or a file in the set references
    /// unresolvable types, and no usable registry is created. Without
    /// `source`, the process-wide built-in pool is used as-is.
    pub fn new(source: Option<&[u8]>) -> Result<Self> {
        let pool = match source {
            Some(bytes) => DescriptorPool::decode(bytes).map_err(Error::MalformedSchema)?,
            None => DescriptorPool::global(),
        };
        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: DescriptorPool) -> Self {
        let mut entries = Vec::new();
        let mut by_full_name = HashMap::new();
        let mut exposed = Vec::new();

        for descriptor in pool.all_messages() {
            let index = entries.len();
            by_full_name.insert(descriptor.full_name().to_string(), index);
            if descriptor.parent_message().is_none() {
                exposed.push(index);
            }

            let field_names: Vec<String> = descriptor
                .fields()
                .map(|field| {
                    if field.is_map() {
                        warn!(
                            "{}.{}: map fields are not marshalled",
                            descriptor.full_name(),
                            field.name()
                        );
                    }
                    field.name().to_string()
                })
                .collect();

            entries.push(Entry {
                descriptor,
                field_names,
            });
        }

        debug!(
            "schema registered {} message types ({} top-level)",
            entries.len(),
            exposed.len()
        );

        Self {
            inner: Arc::new(SchemaInner {
                pool,
                entries,
                by_full_name,
                exposed,
            }),
        }
    }

    /// Look up a message type by its fully-qualified dotted name.
    pub fn get(&self, full_name: &str) -> Option<MessageType> {
        self.inner
            .by_full_name
            .get(full_name)
            .map(|&index| MessageType::new(self.clone(), index))
    }

    /// Fully-qualified names of the host-visible top-level message types, in
    /// registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner
            .exposed
            .iter()
            .map(|&index| self.inner.entries[index].descriptor.full_name())
    }

    /// The host-visible top-level message types, in registration order.
    pub fn message_types(&self) -> impl Iterator<Item = MessageType> + '_ {
        self.inner
            .exposed
            .iter()
            .map(|&index| MessageType::new(self.clone(), index))
    }

    /// Number of host-visible top-level message types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.exposed.len()
    }

    /// Returns `true` if the schema exposes no message types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.exposed.is_empty()
    }

    /// Fresh zero-valued mutable instance of the given registered type.
    /// Infallible: the descriptor came from this registry's pool.
    pub(crate) fn new_message(&self, index: usize) -> DynamicMessage {
        DynamicMessage::new(self.inner.entries[index].descriptor.clone())
    }

    pub(crate) fn entry(&self, index: usize) -> &Entry {
        &self.inner.entries[index]
    }

    /// Resolve the previously built descriptor for a message-typed field.
    ///
    /// Returns `None` for non-message fields, and for message types that were
    /// never registered (cross-file references not present in the supplied
    /// set); callers skip such fields instead of failing the conversion.
    pub(crate) fn descriptor_for(&self, field: &FieldDescriptor) -> Option<MessageType> {
        match field.kind() {
            Kind::Message(message) => self
                .inner
                .by_full_name
                .get(message.full_name())
                .map(|&index| MessageType::new(self.clone(), index)),
            _ => None,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema({} message types)", self.inner.entries.len())
    }
}
