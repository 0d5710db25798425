// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Integration tests over in-memory descriptor sets.

use super::*;
use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet,
};

fn scalar_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        ..Default::default()
    }
}

fn typed_field(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..scalar_field(name, number, ty)
    }
}

fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(Label::Repeated as i32);
    field
}

fn enum_value(name: &str, number: i32) -> EnumValueDescriptorProto {
    EnumValueDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        ..Default::default()
    }
}

/// A proto2 test schema: a colour enum, a nested child, a parent with a
/// singular message field plus a repeated scalar, a recursive list node, and
/// one message covering every scalar kind.
fn test_descriptor_set() -> Vec<u8> {
    let child = DescriptorProto {
        name: Some("Child".to_string()),
        field: vec![scalar_field("name", 1, Type::String)],
        ..Default::default()
    };
    let parent = DescriptorProto {
        name: Some("Parent".to_string()),
        field: vec![
            typed_field("child", 1, Type::Message, ".testpkg.Child"),
            repeated(scalar_field("tags", 2, Type::Int32)),
        ],
        ..Default::default()
    };
    let node = DescriptorProto {
        name: Some("Node".to_string()),
        field: vec![
            typed_field("next", 1, Type::Message, ".testpkg.Node"),
            scalar_field("value", 2, Type::Int32),
        ],
        ..Default::default()
    };
    let everything = DescriptorProto {
        name: Some("Everything".to_string()),
        field: vec![
            scalar_field("f_i32", 1, Type::Int32),
            scalar_field("f_u32", 2, Type::Uint32),
            scalar_field("f_i64", 3, Type::Int64),
            scalar_field("f_u64", 4, Type::Uint64),
            scalar_field("f_f32", 5, Type::Float),
            scalar_field("f_f64", 6, Type::Double),
            scalar_field("f_bool", 7, Type::Bool),
            scalar_field("f_str", 8, Type::String),
            scalar_field("f_bytes", 9, Type::Bytes),
            typed_field("f_color", 10, Type::Enum, ".testpkg.Color"),
            repeated(scalar_field("f_words", 11, Type::String)),
        ],
        ..Default::default()
    };
    let color = EnumDescriptorProto {
        name: Some("Color".to_string()),
        value: vec![
            enum_value("RED", 0),
            enum_value("GREEN", 1),
            enum_value("BLUE", 2),
        ],
        ..Default::default()
    };

    let file = FileDescriptorProto {
        name: Some("test.proto".to_string()),
        package: Some("testpkg".to_string()),
        message_type: vec![child, parent, node, everything],
        enum_type: vec![color],
        ..Default::default()
    };

    FileDescriptorSet { file: vec![file] }.encode_to_vec()
}

fn test_schema() -> Schema {
    Schema::new(Some(&test_descriptor_set())).expect("schema")
}

#[test]
fn test_full_workflow() {
    // 1. Build the registry from descriptor-set bytes
    let schema = test_schema();
    assert_eq!(schema.len(), 4);
    let names: Vec<&str> = schema.names().collect();
    assert!(names.contains(&"testpkg.Everything"));

    // 2. Look up a type and inspect its field layout
    let ty = schema.get("testpkg.Everything").expect("descriptor");
    assert_eq!(ty.full_name(), "testpkg.Everything");
    assert_eq!(ty.fields().len(), 11);
    assert_eq!(ty.fields()[0], "f_i32");
    assert_eq!(ty.fields()[10], "f_words");

    // 3. Serialize a host value
    let value = Record::new()
        .with("f_i32", -5i32)
        .with("f_u32", 7u32)
        .with("f_i64", "-9000000000000000000")
        .with("f_bool", true)
        .with("f_str", "hello")
        .with("f_bytes", vec![0u8, 1, 2])
        .with("f_color", "BLUE")
        .with(
            "f_words",
            Value::List(vec!["a".into(), "b".into()]),
        );
    let wire = ty.serialize(&value, &MapBridge).expect("serialize");
    assert!(!wire.is_empty());

    // 4. Parse it back and verify per-field semantics
    let back = ty.parse(&wire, &MapBridge).expect("parse");
    assert_eq!(back.get("f_i32"), Some(&Value::I32(-5)));
    assert_eq!(back.get("f_u32"), Some(&Value::U32(7)));
    assert_eq!(
        back.get("f_i64").and_then(Value::as_text),
        Some("-9000000000000000000")
    );
    assert_eq!(back.get("f_bool"), Some(&Value::Bool(true)));
    assert_eq!(back.get("f_str").and_then(Value::as_text), Some("hello"));
    assert_eq!(
        back.get("f_bytes").and_then(Value::as_bytes),
        Some(&[0u8, 1, 2][..])
    );
    assert_eq!(back.get("f_color").and_then(Value::as_text), Some("BLUE"));
    assert_eq!(
        back.get("f_words").and_then(Value::as_list).map(<[_]>::len),
        Some(2)
    );
    // Fields never set stay absent, not zero-valued
    assert!(back.get("f_u64").is_none());
    assert!(back.get("f_f32").is_none());
}

#[test]
fn test_nested_types_resolve_lazily() {
    let schema = test_schema();
    let parent = schema.get("testpkg.Parent").expect("descriptor");

    let value = Record::new()
        .with("child", Value::Object(Record::new().with("name", "kid")))
        .with("tags", Value::List(vec![1i32.into(), 2i32.into(), 3i32.into()]));

    let wire = parent.serialize(&value, &MapBridge).expect("serialize");
    let back = parent.parse(&wire, &MapBridge).expect("parse");

    let child = back.get("child").and_then(Value::as_object).expect("child");
    assert_eq!(child.get("name").and_then(Value::as_text), Some("kid"));
    assert_eq!(
        back.get("tags").and_then(Value::as_list),
        Some(&[Value::I32(1), Value::I32(2), Value::I32(3)][..])
    );
}

#[test]
fn test_recursive_message_graph() {
    let schema = test_schema();
    let node = schema.get("testpkg.Node").expect("descriptor");

    let value = Record::new().with("value", 1i32).with(
        "next",
        Value::Object(Record::new().with("value", 2i32).with(
            "next",
            Value::Object(Record::new().with("value", 3i32)),
        )),
    );

    let wire = node.serialize(&value, &MapBridge).expect("serialize");
    let back = node.parse(&wire, &MapBridge).expect("parse");

    let second = back.get("next").and_then(Value::as_object).expect("next");
    let third = second.get("next").and_then(Value::as_object).expect("next.next");
    assert_eq!(third.get("value"), Some(&Value::I32(3)));
    assert!(third.get("next").is_none());
}

#[test]
fn test_built_in_pool_schema() {
    // No source selects the process-wide pool; construction never fails.
    let schema = Schema::new(None).expect("built-in schema");
    assert!(schema.get("no.such.Type").is_none());
}

#[test]
fn test_schema_display_and_lookup_misses() {
    let schema = test_schema();
    assert!(schema.get("testpkg.Missing").is_none());
    assert!(schema.get("").is_none());
    let ty = schema.get("testpkg.Child").expect("descriptor");
    assert_eq!(ty.to_string(), "testpkg.Child");
}
