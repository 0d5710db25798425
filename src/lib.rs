// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # protodyn - runtime protobuf marshalling
//!
//! Load a protobuf schema at run time (the process-wide built-in descriptor
//! pool, or a serialized descriptor set supplied as bytes) and convert any
//! message type in it between wire bytes and a host structured value, driven
//! purely by runtime reflection. No generated accessor code is involved.
//!
//! ## Quick Start
//!
//! ```no_run
//! use protodyn::{MapBridge, Record, Schema, Value};
//!
//! # fn main() -> protodyn::Result<()> {
//! // Build a registry from a serialized FileDescriptorSet
//! let bytes = std::fs::read("addressbook.desc").unwrap();
//! let schema = Schema::new(Some(&bytes))?;
//!
//! // Look up a type by its fully-qualified name
//! let person = schema.get("tutorial.Person").unwrap();
//!
//! // Host value -> wire bytes -> host value
//! let value = Record::new()
//!     .with("name", "Ada")
//!     .with("id", 7i32);
//! let wire = person.serialize(&value, &MapBridge)?;
//! let back: Record = person.parse(&wire, &MapBridge)?;
//! assert_eq!(back.get("name").and_then(Value::as_text), Some("Ada"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Schema`] | Registry built from a descriptor pool, one per schema load |
//! | [`MessageType`] | Per-type parse/serialize/introspection surface |
//! | [`Value`] | The engine's field-slot tagged union |
//! | [`ValueBridge`] | Embedding-layer converter pair (object <-> slot array) |
//! | [`MapBridge`] | Map-backed reference bridge for tests and standalone use |
//!
//! ## Conversion rules
//!
//! - 32-bit integers, floats and bools cross as native values.
//! - 64-bit integers cross as base-10 decimal text in both directions, so
//!   the full range survives hosts without exact 64-bit numerics.
//! - Enum values cross as their symbolic name; the encode direction also
//!   accepts the numeric tag.
//! - Bytes fields carry raw buffers, never reinterpreted as text (and vice
//!   versa for string fields).
//! - Absent fields stay absent: no null or zero placeholders in either
//!   direction.

/// Host-value boundary (converter trait and the map-backed reference bridge).
pub mod bridge;
/// Per-type message descriptors and the marshalling engine.
pub mod descriptor;
/// Error taxonomy for schema loading and conversion.
pub mod error;
/// Schema registry and descriptor-pool ownership.
pub mod schema;
/// The engine-side value model crossing the host boundary.
pub mod value;

pub use bridge::{MapBridge, Record, ValueBridge};
pub use descriptor::MessageType;
pub use error::{Error, Result};
pub use schema::Schema;
pub use value::Value;

#[cfg(test)]
mod tests;
