// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The engine-side value model.
//!
//! [`Value`] is the tagged union the marshalling engine traffics in: every
//! slot of the declaration-ordered field array handed across the
//! [`ValueBridge`](crate::ValueBridge) boundary holds one of these. The host
//! object representation stays opaque behind the type parameter `O`; the
//! engine never looks inside an [`Value::Object`], it only passes it back
//! through the bridge.
//!
//! 64-bit integers deliberately have no variant of their own: the engine
//! renders them as base-10 [`Value::Text`] so the full range survives hosts
//! whose native numeric type cannot represent it exactly.

/// A single field (or element) value crossing the host boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<O> {
    Bool(bool),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
    /// Native text. Also carries 64-bit integers (base-10 decimal) and enum
    /// value names.
    Text(String),
    /// Raw byte buffer, distinct from text in both directions.
    Bytes(Vec<u8>),
    /// Ordered element values of a repeated field.
    List(Vec<Value<O>>),
    /// A host structured value for a message-typed field.
    Object(O),
}

impl<O> Value<O> {
    /// Try to get as bool, without coercion.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as text, without coercion.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as raw bytes, without coercion.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a sequence of element values.
    pub fn as_list(&self) -> Option<&[Value<O>]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as a host object.
    pub fn as_object(&self) -> Option<&O> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// True for numeric variants (the encode direction resolves enum values
    /// by tag exactly when the host value is numeric).
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::I32(_) | Self::U32(_) | Self::F32(_) | Self::F64(_)
        )
    }

    /// Host numeric coercion to double precision.
    ///
    /// Text parses as a decimal number; unparseable text, buffers, lists and
    /// objects coerce to zero. Booleans coerce to 0/1.
    pub fn coerce_f64(&self) -> f64 {
        match self {
            Self::Bool(v) => {
                if *v {
                    1.0
                } else {
                    0.0
                }
            }
            Self::I32(v) => f64::from(*v),
            Self::U32(v) => f64::from(*v),
            Self::F32(v) => f64::from(*v),
            Self::F64(v) => *v,
            Self::Text(v) => v.trim().parse::<f64>().unwrap_or(0.0),
            Self::Bytes(_) | Self::List(_) | Self::Object(_) => 0.0,
        }
    }

    /// Host numeric coercion to single precision.
    pub fn coerce_f32(&self) -> f32 {
        self.coerce_f64() as f32
    }

    /// Host numeric coercion to a signed 32-bit integer, truncating toward
    /// zero and saturating at the type bounds.
    pub fn coerce_i32(&self) -> i32 {
        match self {
            Self::I32(v) => *v,
            _ => self.coerce_f64() as i32,
        }
    }

    /// Host numeric coercion to an unsigned 32-bit integer.
    pub fn coerce_u32(&self) -> u32 {
        match self {
            Self::U32(v) => *v,
            _ => self.coerce_f64() as u32,
        }
    }

    /// Coercion for signed 64-bit fields: text parses as a full-range base-10
    /// integer (unparseable text yields 0); anything else coerces through the
    /// native double, losing precision beyond its exact-integer range.
    pub fn coerce_i64(&self) -> i64 {
        match self {
            Self::Text(v) => v.trim().parse::<i64>().unwrap_or(0),
            _ => self.coerce_f64() as i64,
        }
    }

    /// Coercion for unsigned 64-bit fields; see [`Value::coerce_i64`].
    pub fn coerce_u64(&self) -> u64 {
        match self {
            Self::Text(v) => v.trim().parse::<u64>().unwrap_or(0),
            _ => self.coerce_f64() as u64,
        }
    }

    /// Host boolean coercion: zero numbers and empty text/buffers are false,
    /// everything else is true.
    pub fn coerce_bool(&self) -> bool {
        match self {
            Self::Bool(v) => *v,
            Self::I32(v) => *v != 0,
            Self::U32(v) => *v != 0,
            Self::F32(v) => *v != 0.0,
            Self::F64(v) => *v != 0.0,
            Self::Text(v) => !v.is_empty(),
            Self::Bytes(v) => !v.is_empty(),
            Self::List(_) | Self::Object(_) => true,
        }
    }

    /// Host text coercion, used when a string or bytes field receives a
    /// non-buffer value. Buffers convert lossily; lists and objects have no
    /// textual rendering and coerce to the empty string.
    pub fn coerce_text(&self) -> String {
        match self {
            Self::Bool(v) => v.to_string(),
            Self::I32(v) => v.to_string(),
            Self::U32(v) => v.to_string(),
            Self::F32(v) => v.to_string(),
            Self::F64(v) => v.to_string(),
            Self::Text(v) => v.clone(),
            Self::Bytes(v) => String::from_utf8_lossy(v).into_owned(),
            Self::List(_) | Self::Object(_) => String::new(),
        }
    }
}

impl<O> From<bool> for Value<O> {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<O> From<i32> for Value<O> {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl<O> From<u32> for Value<O> {
    fn from(v: u32) -> Self {
        Self::U32(v)
    }
}

impl<O> From<f32> for Value<O> {
    fn from(v: f32) -> Self {
        Self::F32(v)
    }
}

impl<O> From<f64> for Value<O> {
    fn from(v: f64) -> Self {
        Self::F64(v)
    }
}

impl<O> From<String> for Value<O> {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<O> From<&str> for Value<O> {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<O> From<Vec<u8>> for Value<O> {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type V = Value<()>;

    #[test]
    fn test_accessors() {
        assert_eq!(V::from(true).as_bool(), Some(true));
        assert_eq!(V::from("hello").as_text(), Some("hello"));
        assert_eq!(V::from(vec![1u8, 2]).as_bytes(), Some(&[1u8, 2][..]));
        assert_eq!(V::from(42i32).as_text(), None);
        assert!(V::from(42i32).is_numeric());
        assert!(!V::from("42").is_numeric());
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(V::from("3").coerce_i32(), 3);
        assert_eq!(V::from("3.7").coerce_i32(), 3);
        assert_eq!(V::from("foo").coerce_i32(), 0);
        assert_eq!(V::from("").coerce_i32(), 0);
        assert_eq!(V::from(true).coerce_i32(), 1);
        assert_eq!(V::Object(()).coerce_i32(), 0);
        assert_eq!(V::from(2.5f64).coerce_u32(), 2);
    }

    #[test]
    fn test_wide_integer_coercion() {
        // Full 64-bit range survives the textual path.
        assert_eq!(
            V::from("9223372036854775807").coerce_i64(),
            i64::MAX
        );
        assert_eq!(
            V::from("18446744073709551615").coerce_u64(),
            u64::MAX
        );
        assert_eq!(V::from("garbage").coerce_i64(), 0);
        // The native-numeric fallback truncates toward zero.
        assert_eq!(V::from(42.9f64).coerce_i64(), 42);
    }

    #[test]
    fn test_bool_and_text_coercion() {
        assert!(V::from(1i32).coerce_bool());
        assert!(!V::from("").coerce_bool());
        assert!(V::from("no").coerce_bool());
        assert!(!V::from(0.0f64).coerce_bool());
        assert_eq!(V::from(17u32).coerce_text(), "17");
        assert_eq!(V::from(vec![0x66u8, 0x6f, 0x6f]).coerce_text(), "foo");
    }
}
