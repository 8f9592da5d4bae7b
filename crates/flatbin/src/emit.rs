// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive value-to-bytes emitter.

use crate::classify::{classify, Layout};
use crate::descriptor::{FieldDescriptor, PrimitiveKind, TypeDescriptor, TypeKind};
use crate::error::{WireError, WireResult};
use crate::instance::Instance;
use crate::text::TextCodec;
use crate::value::Value;
use std::collections::HashMap;

/// Serialize an instance to its flat binary form.
///
/// Fails with [`WireError::MissingCodec`] when no codec is supplied, and
/// with [`WireError::AbsentField`] when a traversed composite field was
/// never assigned. The output carries no tags or lengths beyond the text
/// and sequence prefixes; decoding requires the same descriptor.
pub fn emit(data: &Instance, codec: Option<TextCodec>) -> WireResult<Vec<u8>> {
    let codec = codec.ok_or(WireError::MissingCodec)?;
    let mut encoder = Encoder {
        buffer: Vec::new(),
        codec,
    };
    encoder.encode_value(data.value(), data.descriptor())?;
    log::trace!(
        "[emit] {} -> {} bytes",
        data.type_name(),
        encoder.buffer.len()
    );
    Ok(encoder.buffer)
}

struct Encoder {
    buffer: Vec<u8>,
    codec: TextCodec,
}

impl Encoder {
    fn encode_value(&mut self, value: &Value, desc: &TypeDescriptor) -> WireResult<()> {
        match classify(desc)? {
            Layout::Fixed(size) => {
                self.buffer.reserve(size);
                self.encode_fixed(value, desc)
            }
            Layout::Text => match value {
                Value::Text(text) => self.encode_text(text),
                other => Err(self.mismatch("text", other)),
            },
            Layout::Sequence => match (&desc.kind, value) {
                (TypeKind::Sequence(seq), Value::Sequence(elements)) => {
                    self.write_len(elements.len())?;
                    for element in elements {
                        self.encode_value(element, &seq.element_type)?;
                    }
                    Ok(())
                }
                (_, other) => Err(self.mismatch("sequence", other)),
            },
            Layout::Composite => self.encode_struct(value, desc),
        }
    }

    /// Encode a fixed-layout value: members in declared order, no gaps.
    ///
    /// Members of a fixed struct are themselves fixed, so the walk loops
    /// here directly without re-classifying each field.
    fn encode_fixed(&mut self, value: &Value, desc: &TypeDescriptor) -> WireResult<()> {
        match &desc.kind {
            TypeKind::Primitive(p) => self.encode_primitive(value, *p),
            TypeKind::Enum(e) => match value {
                // The wire sees only the underlying integer; unnamed bit
                // combinations pass through untouched.
                Value::Enum(raw) => self.write_int(*raw, e.underlying),
                other => Err(self.mismatch("enum", other)),
            },
            TypeKind::Struct(fields) => {
                let map = match value {
                    Value::Struct(map) => map,
                    other => return Err(self.mismatch("struct", other)),
                };
                for field in fields {
                    let field_value = lookup(map, desc, field)?;
                    self.encode_fixed(field_value, &field.type_desc)?;
                }
                Ok(())
            }
            _ => Err(self.mismatch("fixed-layout value", value)),
        }
    }

    fn encode_struct(&mut self, value: &Value, desc: &TypeDescriptor) -> WireResult<()> {
        let fields = match &desc.kind {
            TypeKind::Struct(fields) => fields,
            _ => return Err(self.mismatch("struct", value)),
        };
        let map = match value {
            Value::Struct(map) => map,
            other => return Err(self.mismatch("struct", other)),
        };

        for field in fields {
            let field_value = lookup(map, desc, field)?;
            self.encode_value(field_value, &field.type_desc)?;
        }
        Ok(())
    }

    fn encode_primitive(&mut self, value: &Value, kind: PrimitiveKind) -> WireResult<()> {
        match (value, kind) {
            (Value::Bool(v), PrimitiveKind::Bool) => {
                self.buffer.push(u8::from(*v));
            }
            (Value::U8(v), PrimitiveKind::U8) => {
                self.buffer.push(*v);
            }
            (Value::U16(v), PrimitiveKind::U16) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (Value::U32(v), PrimitiveKind::U32) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (Value::U64(v), PrimitiveKind::U64) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (Value::I8(v), PrimitiveKind::I8) => {
                self.buffer.push(*v as u8);
            }
            (Value::I16(v), PrimitiveKind::I16) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (Value::I32(v), PrimitiveKind::I32) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (Value::I64(v), PrimitiveKind::I64) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (Value::F32(v), PrimitiveKind::F32) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (Value::F64(v), PrimitiveKind::F64) => {
                self.buffer.extend(v.to_le_bytes());
            }
            (other, kind) => return Err(self.mismatch(kind.name(), other)),
        }
        Ok(())
    }

    /// Write an enum's underlying integer at its declared width.
    fn write_int(&mut self, raw: i64, kind: PrimitiveKind) -> WireResult<()> {
        match kind {
            PrimitiveKind::U8 => self.buffer.push(raw as u8),
            PrimitiveKind::U16 => self.buffer.extend((raw as u16).to_le_bytes()),
            PrimitiveKind::U32 => self.buffer.extend((raw as u32).to_le_bytes()),
            PrimitiveKind::U64 => self.buffer.extend((raw as u64).to_le_bytes()),
            PrimitiveKind::I8 => self.buffer.push(raw as i8 as u8),
            PrimitiveKind::I16 => self.buffer.extend((raw as i16).to_le_bytes()),
            PrimitiveKind::I32 => self.buffer.extend((raw as i32).to_le_bytes()),
            PrimitiveKind::I64 => self.buffer.extend(raw.to_le_bytes()),
            other => {
                return Err(WireError::InvalidData(format!(
                    "enum underlying kind {} is not an integer",
                    other.name()
                )))
            }
        }
        Ok(())
    }

    fn encode_text(&mut self, text: &str) -> WireResult<()> {
        let bytes = self.codec.encode(text);
        self.write_len(bytes.len())?;
        self.buffer.extend(bytes);
        Ok(())
    }

    /// Write a length/count as a 4-byte signed integer.
    fn write_len(&mut self, len: usize) -> WireResult<()> {
        if len > i32::MAX as usize {
            return Err(WireError::InvalidData(format!(
                "length {} exceeds the 4-byte signed prefix",
                len
            )));
        }
        self.buffer.extend((len as i32).to_le_bytes());
        Ok(())
    }

    fn mismatch(&self, expected: &str, found: &Value) -> WireError {
        WireError::TypeMismatch {
            expected: expected.to_string(),
            found: found.kind_name().to_string(),
        }
    }
}

/// Fetch a field's assigned value; unset slots are a hard error.
fn lookup<'v>(
    map: &'v HashMap<String, Value>,
    desc: &TypeDescriptor,
    field: &FieldDescriptor,
) -> WireResult<&'v Value> {
    map.get(&field.name)
        .filter(|v| !v.is_absent())
        .ok_or_else(|| WireError::AbsentField {
            type_name: desc.name.clone(),
            field: field.name.clone(),
        })
}
