// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # flatbin - flat binary serialization for runtime-described types
//!
//! Converts values described by runtime type descriptors into a flat,
//! length-unannotated byte sequence and back. The format is closed-world:
//! the stream carries no type tags, no version byte and no schema, so the
//! parser must be handed the exact descriptor the emitter used.
//!
//! # Features
//!
//! - **TypeDescriptor**: runtime type description (primitives, enums,
//!   text, sequences, structs) with a fluent builder API
//! - **Classification**: every type resolves once to one of four encoding
//!   strategies (fixed-layout, text, sequence, composite), memoized in a
//!   process-wide cache
//! - **Instance**: type-erased data container with checked field access
//! - **Emit/Parse**: recursive little-endian encode/decode with
//!   byte-offset error context
//!
//! # Wire format
//!
//! | Value category | Layout |
//! |----------------|--------|
//! | Primitive/enum | raw little-endian bytes of fixed width |
//! | Text | 4-byte signed byte length, then codec bytes |
//! | Sequence | 4-byte signed count, then elements in order |
//! | Fixed-layout struct | members in declared order, no padding |
//! | Other struct | fields in declared order |
//!
//! # Example
//!
//! ```rust
//! use flatbin::{emit, parse, Instance, PrimitiveKind, TextCodec, TypeDescriptorBuilder};
//! use std::sync::Arc;
//!
//! // Describe a type at runtime
//! let descriptor = Arc::new(TypeDescriptorBuilder::new("SensorReading")
//!     .field("sensor_id", PrimitiveKind::U32)
//!     .field("temperature", PrimitiveKind::F64)
//!     .text_field("unit")
//!     .build());
//!
//! // Fill an instance
//! let mut reading = Instance::new(&descriptor);
//! reading.set("sensor_id", 42u32).unwrap();
//! reading.set("temperature", 23.5f64).unwrap();
//! reading.set("unit", "celsius").unwrap();
//!
//! // Round-trip through the flat form
//! let bytes = emit(&reading, Some(TextCodec::Utf8)).unwrap();
//! let decoded = parse(&bytes, &descriptor, Some(TextCodec::Utf8)).unwrap();
//! assert_eq!(decoded, reading);
//! ```

mod builder;
mod classify;
mod cursor;
mod descriptor;
mod emit;
mod error;
mod instance;
mod parse;
mod registry;
mod text;
mod value;

pub use builder::{EnumBuilder, TypeDescriptorBuilder};
pub use classify::{classify, fixed_size, Layout};
pub use descriptor::{
    EnumDescriptor, EnumVariant, FieldDescriptor, PrimitiveKind, SequenceDescriptor,
    TypeDescriptor, TypeKind, UnionCase, UnionDescriptor,
};
pub use emit::emit;
pub use error::{WireError, WireResult};
pub use instance::{FromValue, Instance, InstanceError, IntoValue};
pub use parse::parse;
pub use registry::{registry, Registry, RegistryError};
pub use text::TextCodec;
pub use value::Value;
