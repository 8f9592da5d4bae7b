// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::missing_panics_doc)] // Tests/examples panic on failure
#![allow(clippy::too_many_lines)] // Example/test code

/// Flat dump example for flatbin
///
/// Demonstrates:
/// - Describing nested struct types at runtime
/// - Filling an Instance field by field
/// - Emitting the flat byte form and hex-dumping it
/// - Parsing the bytes back into an equal Instance
use flatbin::{
    emit, parse, EnumBuilder, Instance, PrimitiveKind, TextCodec, TypeDescriptorBuilder, Value,
};
use std::sync::Arc;

fn main() {
    // Flags enum over a single byte.
    let mode = Arc::new(
        EnumBuilder::new("Mode")
            .variant_value("Value1", 0x01)
            .variant_value("Value2", 0x02)
            .variant_value("Value3", 0x04)
            .underlying(PrimitiveKind::U8)
            .build(),
    );

    let inner = Arc::new(
        TypeDescriptorBuilder::new("InnerRecord")
            .field("my_long", PrimitiveKind::I64)
            .text_field("my_text")
            .field("my_double", PrimitiveKind::F64)
            .build(),
    );

    let second = Arc::new(
        TypeDescriptorBuilder::new("SecondRecord")
            .field("my_int", PrimitiveKind::I32)
            .text_field("my_text")
            .enum_field("my_mode", mode.clone())
            .build(),
    );

    let record = Arc::new(
        TypeDescriptorBuilder::new("Record")
            .field("my_int", PrimitiveKind::I32)
            .text_field("my_string")
            .enum_field("my_mode", mode)
            .nested_field("inner", inner)
            .nested_field("second", second)
            .sequence_field("samples", PrimitiveKind::U16)
            .build(),
    );

    let mut data = Instance::new(&record);
    data.set("my_int", 10i32).expect("set my_int");
    data.set("my_string", "Good").expect("set my_string");
    data.set("my_mode", Value::Enum(0x01 | 0x02)).expect("set my_mode");

    let inner_value = data.get_field_mut("inner").expect("inner slot");
    *inner_value = Value::Struct(Default::default());
    inner_value.set_field("my_long", Value::I64(100));
    inner_value.set_field("my_text", Value::Text("Morning".into()));
    inner_value.set_field("my_double", Value::F64(3.14));

    let second_value = data.get_field_mut("second").expect("second slot");
    *second_value = Value::Struct(Default::default());
    second_value.set_field("my_int", Value::I32(20));
    second_value.set_field("my_text", Value::Text("World!".into()));
    second_value.set_field("my_mode", Value::Enum(0x04));

    data.set("samples", Value::from(vec![7u16, 8, 9]))
        .expect("set samples");

    let bytes = emit(&data, Some(TextCodec::Utf8)).expect("emit");
    println!("emitted {} bytes for {}:", bytes.len(), data.type_name());
    hex_dump(&bytes);

    let decoded = parse(&bytes, &record, Some(TextCodec::Utf8)).expect("parse");
    assert_eq!(decoded, data);

    println!();
    println!("parsed back:");
    println!("  my_int:    {:?}", decoded.get::<i32>("my_int").unwrap());
    println!("  my_string: {:?}", decoded.get::<String>("my_string").unwrap());
    println!(
        "  my_mode:   {:?}",
        decoded.get_field("my_mode").unwrap().enum_value().unwrap()
    );
    let inner = decoded.get_field("inner").unwrap();
    println!(
        "  inner:     my_long={:?} my_text={:?} my_double={:?}",
        inner.get_field("my_long").and_then(Value::as_i64).unwrap(),
        inner.get_field("my_text").and_then(Value::as_text).unwrap(),
        inner.get_field("my_double").and_then(Value::as_f64).unwrap(),
    );
    let second = decoded.get_field("second").unwrap();
    println!(
        "  second:    my_int={:?} my_text={:?} my_mode={:?}",
        second.get_field("my_int").and_then(Value::as_i32).unwrap(),
        second.get_field("my_text").and_then(Value::as_text).unwrap(),
        second.get_field("my_mode").and_then(Value::enum_value).unwrap(),
    );
    println!(
        "  samples:   {:?}",
        decoded
            .get_field("samples")
            .unwrap()
            .as_sequence()
            .unwrap()
            .iter()
            .filter_map(|v| match v {
                Value::U16(n) => Some(*n),
                _ => None,
            })
            .collect::<Vec<_>>()
    );
}

/// Print bytes in hexadecimal, 16 per line.
fn hex_dump(bytes: &[u8]) {
    for (i, b) in bytes.iter().enumerate() {
        if i % 16 == 0 {
            if i > 0 {
                println!();
            }
            print!("{:08X}  ", i);
        }
        print!("{:02X} ", b);
    }
    println!();
}
