// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema loading and marshalling.

use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by schema construction and message conversion.
///
/// Every error is local to the single operation that raised it: a failed
/// parse or serialize never corrupts the [`Schema`](crate::Schema) or any
/// [`MessageType`](crate::MessageType), and no partial value is ever returned
/// alongside an error.
#[derive(Debug)]
pub enum Error {
    /// Descriptor-set bytes did not parse, or a file in the set references
    /// types that cannot be resolved. Fatal to schema construction.
    MalformedSchema(prost_reflect::DescriptorError),
    /// Wire bytes did not decode against the target message type
    /// (truncated input, invalid varint, bad wire type).
    MalformedMessage(prost::DecodeError),
    /// A message-typed field was given a host value that is not a
    /// structured object.
    NotAnObject,
    /// A repeated field was given a host value that is not a sequence.
    NotAnArray,
    /// An enum field value matched neither a symbolic name nor a numeric tag.
    UnknownEnumValue,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedSchema(e) => write!(f, "Malformed descriptor: {}", e),
            Self::MalformedMessage(e) => write!(f, "Malformed message: {}", e),
            Self::NotAnObject => write!(f, "Not an object"),
            Self::NotAnArray => write!(f, "Not an array"),
            Self::UnknownEnumValue => write!(f, "Unknown enum value"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedSchema(e) => Some(e),
            Self::MalformedMessage(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::NotAnObject.to_string(), "Not an object");
        assert_eq!(Error::NotAnArray.to_string(), "Not an array");
        assert_eq!(Error::UnknownEnumValue.to_string(), "Unknown enum value");
    }
}
