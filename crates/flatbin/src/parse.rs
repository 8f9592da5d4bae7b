// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Recursive bytes-to-value parser.

use crate::classify::{classify, Layout};
use crate::cursor::Cursor;
use crate::descriptor::{PrimitiveKind, SequenceDescriptor, TypeDescriptor, TypeKind};
use crate::error::{WireError, WireResult};
use crate::instance::Instance;
use crate::text::TextCodec;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Upper bound on speculative `Vec` pre-allocation for untrusted counts.
const PREALLOC_CAP: usize = 4096;

/// Reconstruct an instance of the described type from flat bytes.
///
/// Mirrors [`emit`](crate::emit::emit) exactly, dispatching on the
/// classification of the requested descriptor; the stream itself carries no
/// type information. Trailing bytes after a complete value are left
/// unconsumed and are not an error; running out of bytes mid-value fails
/// with [`WireError::Truncated`].
pub fn parse(
    bytes: &[u8],
    descriptor: &Arc<TypeDescriptor>,
    codec: Option<TextCodec>,
) -> WireResult<Instance> {
    let codec = codec.ok_or(WireError::MissingCodec)?;
    let mut decoder = Decoder {
        cursor: Cursor::new(bytes),
        codec,
    };
    let value = decoder.decode_value(descriptor)?;
    log::trace!(
        "[parse] {} consumed {} of {} bytes",
        descriptor.name,
        decoder.cursor.offset(),
        bytes.len()
    );
    Instance::from_value(descriptor, value).map_err(|e| WireError::Construct(e.to_string()))
}

struct Decoder<'a> {
    cursor: Cursor<'a>,
    codec: TextCodec,
}

impl Decoder<'_> {
    fn decode_value(&mut self, desc: &TypeDescriptor) -> WireResult<Value> {
        match classify(desc)? {
            Layout::Fixed(size) => {
                // One bounds check covers the whole flat block; the member
                // loop below cannot run short after this.
                self.cursor.ensure(size)?;
                self.decode_fixed(desc)
            }
            Layout::Text => self.decode_text(),
            Layout::Sequence => match &desc.kind {
                TypeKind::Sequence(seq) => self.decode_sequence(seq),
                _ => unreachable!("sequence layout implies sequence kind"),
            },
            Layout::Composite => self.decode_struct(desc),
        }
    }

    /// Decode a fixed-layout value: members in declared order, no gaps.
    fn decode_fixed(&mut self, desc: &TypeDescriptor) -> WireResult<Value> {
        match &desc.kind {
            TypeKind::Primitive(p) => self.decode_primitive(*p),
            TypeKind::Enum(e) => {
                // Pass the underlying integer through without checking it
                // against named variants: flag combinations are legal.
                let raw = self.read_int(e.underlying)?;
                Ok(Value::Enum(raw))
            }
            TypeKind::Struct(fields) => {
                let mut map = HashMap::new();
                for field in fields {
                    let value = self.decode_fixed(&field.type_desc)?;
                    map.insert(field.name.clone(), value);
                }
                Ok(Value::Struct(map))
            }
            _ => unreachable!("fixed layout implies primitive, enum or struct"),
        }
    }

    fn decode_struct(&mut self, desc: &TypeDescriptor) -> WireResult<Value> {
        let fields = match &desc.kind {
            TypeKind::Struct(fields) => fields,
            _ => unreachable!("composite layout implies struct kind"),
        };
        let mut map = HashMap::new();
        for field in fields {
            let value = self.decode_value(&field.type_desc)?;
            map.insert(field.name.clone(), value);
        }
        Ok(Value::Struct(map))
    }

    fn decode_sequence(&mut self, seq: &SequenceDescriptor) -> WireResult<Value> {
        let count = self.read_len()?;
        // Cap pre-allocation: the count is untrusted until elements decode.
        let mut elements = Vec::with_capacity(count.min(PREALLOC_CAP));
        for _ in 0..count {
            elements.push(self.decode_value(&seq.element_type)?);
        }
        Ok(Value::Sequence(elements))
    }

    fn decode_text(&mut self) -> WireResult<Value> {
        let len = self.read_len()?;
        let bytes = self.cursor.read_bytes(len)?;
        Ok(Value::Text(self.codec.decode(bytes)?))
    }

    /// Read a 4-byte signed length/count; negative values are malformed.
    fn read_len(&mut self) -> WireResult<usize> {
        let offset = self.cursor.offset();
        let len = self.cursor.read_i32_le()?;
        if len < 0 {
            return Err(WireError::InvalidData(format!(
                "negative length {} at offset {}",
                len, offset
            )));
        }
        Ok(len as usize)
    }

    fn decode_primitive(&mut self, kind: PrimitiveKind) -> WireResult<Value> {
        Ok(match kind {
            PrimitiveKind::Bool => Value::Bool(self.cursor.read_u8()? != 0),
            PrimitiveKind::U8 => Value::U8(self.cursor.read_u8()?),
            PrimitiveKind::U16 => Value::U16(self.cursor.read_u16_le()?),
            PrimitiveKind::U32 => Value::U32(self.cursor.read_u32_le()?),
            PrimitiveKind::U64 => Value::U64(self.cursor.read_u64_le()?),
            PrimitiveKind::I8 => Value::I8(self.cursor.read_i8()?),
            PrimitiveKind::I16 => Value::I16(self.cursor.read_i16_le()?),
            PrimitiveKind::I32 => Value::I32(self.cursor.read_i32_le()?),
            PrimitiveKind::I64 => Value::I64(self.cursor.read_i64_le()?),
            PrimitiveKind::F32 => Value::F32(self.cursor.read_f32_le()?),
            PrimitiveKind::F64 => Value::F64(self.cursor.read_f64_le()?),
        })
    }

    /// Read an enum's underlying integer at its declared width.
    fn read_int(&mut self, kind: PrimitiveKind) -> WireResult<i64> {
        Ok(match kind {
            PrimitiveKind::U8 => i64::from(self.cursor.read_u8()?),
            PrimitiveKind::U16 => i64::from(self.cursor.read_u16_le()?),
            PrimitiveKind::U32 => i64::from(self.cursor.read_u32_le()?),
            PrimitiveKind::U64 => self.cursor.read_u64_le()? as i64,
            PrimitiveKind::I8 => i64::from(self.cursor.read_i8()?),
            PrimitiveKind::I16 => i64::from(self.cursor.read_i16_le()?),
            PrimitiveKind::I32 => i64::from(self.cursor.read_i32_le()?),
            PrimitiveKind::I64 => self.cursor.read_i64_le()?,
            other => {
                return Err(WireError::InvalidData(format!(
                    "enum underlying kind {} is not an integer",
                    other.name()
                )))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{EnumBuilder, TypeDescriptorBuilder};
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_parse_requires_codec() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("ParseNeedsCodec")
                .field("x", PrimitiveKind::I32)
                .build(),
        );
        assert!(matches!(
            parse(&[0, 0, 0, 0], &desc, None),
            Err(WireError::MissingCodec)
        ));
    }

    #[test]
    fn test_parse_fixed_struct() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("ParseFlat")
                .field("a", PrimitiveKind::U16)
                .field("b", PrimitiveKind::I32)
                .build(),
        );
        let bytes = [0x02, 0x01, 0xFE, 0xFF, 0xFF, 0xFF];
        let data = parse(&bytes, &desc, Some(TextCodec::Utf8)).expect("parse");
        assert_eq!(data.get::<u16>("a").expect("a"), 0x0102);
        assert_eq!(data.get::<i32>("b").expect("b"), -2);
    }

    #[test]
    fn test_parse_fixed_struct_short_buffer_fails_upfront() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("ParseShort")
                .field("a", PrimitiveKind::U16)
                .field("b", PrimitiveKind::I32)
                .build(),
        );
        // 5 of the 6 required bytes.
        match parse(&[0u8; 5], &desc, Some(TextCodec::Utf8)) {
            Err(WireError::Truncated { offset, need, have }) => {
                assert_eq!(offset, 0);
                assert_eq!(need, 6);
                assert_eq!(have, 5);
            }
            other => panic!("expected Truncated, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_sequence_count_fails() {
        let elem = Arc::new(TypeDescriptor::primitive("int32", PrimitiveKind::I32));
        let desc = Arc::new(TypeDescriptor::sequence_of("Ints", elem));
        let bytes = (-1i32).to_le_bytes();
        assert!(matches!(
            parse(&bytes, &desc, Some(TextCodec::Utf8)),
            Err(WireError::InvalidData(_))
        ));
    }

    #[test]
    fn test_parse_enum_unnamed_bits_pass_through() {
        let desc = Arc::new(
            EnumBuilder::new("ParseMode")
                .variant_value("Value1", 0x01)
                .variant_value("Value2", 0x02)
                .underlying(PrimitiveKind::U8)
                .build(),
        );
        let data = parse(&[0x03], &desc, Some(TextCodec::Utf8)).expect("parse");
        assert_eq!(data.value().enum_value(), Some(3));
    }

    #[test]
    fn test_parse_leaves_trailing_bytes() {
        let desc = Arc::new(TypeDescriptor::primitive("uint8", PrimitiveKind::U8));
        let data = parse(&[7, 99, 99], &desc, Some(TextCodec::Utf8)).expect("parse");
        assert_eq!(data.value().as_u64(), None);
        assert_eq!(*data.value(), Value::U8(7));
    }

    #[test]
    fn test_parse_union_is_unsupported() {
        use crate::descriptor::{UnionCase, UnionDescriptor};
        let disc = Arc::new(TypeDescriptor::primitive("", PrimitiveKind::U32));
        let case_ty = Arc::new(TypeDescriptor::primitive("", PrimitiveKind::I32));
        let desc = Arc::new(TypeDescriptor::new(
            "ParseEither",
            TypeKind::Union(UnionDescriptor::new(
                disc,
                vec![UnionCase::new("int_val", vec![0], case_ty)],
            )),
        ));
        assert!(matches!(
            parse(&[0u8; 8], &desc, Some(TextCodec::Utf8)),
            Err(WireError::UnsupportedType(_))
        ));
    }
}
