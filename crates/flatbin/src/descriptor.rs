// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.
//!
//! A [`TypeDescriptor`] is the out-of-band schema the wire format relies on:
//! the encoded stream carries no type tags, so emit and parse must walk the
//! same descriptor in the same order to agree on the byte layout.

use std::sync::Arc;

/// Fixed-width primitive kinds (numerics and bool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
}

impl PrimitiveKind {
    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 => 8,
        }
    }

    /// Whether this kind can back an enum (underlying representation).
    pub fn is_integer(&self) -> bool {
        !matches!(self, Self::Bool | Self::F32 | Self::F64)
    }

    /// Diagnostic name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

/// Type kind enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Fixed-width primitive.
    Primitive(PrimitiveKind),
    /// Enumeration backed by an integer representation.
    Enum(EnumDescriptor),
    /// Codec-encoded text, length-prefixed on the wire.
    Text,
    /// Variable-length sequence of one element type.
    Sequence(SequenceDescriptor),
    /// Struct with named fields in declaration order.
    Struct(Vec<FieldDescriptor>),
    /// Discriminated union. Describable, but the flat format cannot
    /// express it; classification rejects it.
    Union(UnionDescriptor),
}

/// A complete type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name. Names identify types: two descriptors sharing a name
    /// must be structurally identical (see `Registry`).
    pub name: String,
    /// Type kind.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    /// Create a new type descriptor.
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Create a primitive type descriptor.
    pub fn primitive(name: impl Into<String>, kind: PrimitiveKind) -> Self {
        Self::new(name, TypeKind::Primitive(kind))
    }

    /// Create a text type descriptor.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Text)
    }

    /// Create a struct type descriptor.
    pub fn struct_type(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self::new(name, TypeKind::Struct(fields))
    }

    /// Create a sequence type descriptor.
    pub fn sequence_of(name: impl Into<String>, element_type: Arc<TypeDescriptor>) -> Self {
        Self::new(name, TypeKind::Sequence(SequenceDescriptor::new(element_type)))
    }

    /// Check if this is a struct type.
    pub fn is_struct(&self) -> bool {
        matches!(self.kind, TypeKind::Struct(_))
    }

    /// Get fields if this is a struct.
    pub fn fields(&self) -> Option<&[FieldDescriptor]> {
        match &self.kind {
            TypeKind::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get field ordinal by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields()?.iter().position(|f| f.name == name)
    }
}

/// Field descriptor for struct members.
///
/// The field name is diagnostic only and never encoded; the position in the
/// owning struct's field list is the ordinal that fixes iteration order on
/// both emit and parse.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl FieldDescriptor {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc,
        }
    }
}

/// Sequence type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceDescriptor {
    /// Element type.
    pub element_type: Arc<TypeDescriptor>,
}

impl SequenceDescriptor {
    /// Create a sequence descriptor.
    pub fn new(element_type: Arc<TypeDescriptor>) -> Self {
        Self { element_type }
    }
}

/// Enumeration type descriptor.
///
/// The wire representation is the underlying integer kind alone; variant
/// names exist for diagnostics and builders. Values with no matching named
/// variant (flag combinations) are legal.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDescriptor {
    /// Enum variants.
    pub variants: Vec<EnumVariant>,
    /// Underlying integer kind (default u32).
    pub underlying: PrimitiveKind,
}

impl EnumDescriptor {
    /// Create enum descriptor with the default u32 underlying kind.
    pub fn new(variants: Vec<EnumVariant>) -> Self {
        Self {
            variants,
            underlying: PrimitiveKind::U32,
        }
    }

    /// Create with a specific underlying integer kind.
    pub fn with_underlying(mut self, underlying: PrimitiveKind) -> Self {
        self.underlying = underlying;
        self
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Get variant by value.
    pub fn variant_by_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| v.value == value)
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumVariant {
    /// Variant name.
    pub name: String,
    /// Variant value.
    pub value: i64,
}

impl EnumVariant {
    /// Create enum variant.
    pub fn new(name: impl Into<String>, value: i64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Union type descriptor.
///
/// Kept so tooling can describe union-shaped data; the flat wire format has
/// no discriminator convention, so classification fails for it.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionDescriptor {
    /// Discriminator type.
    pub discriminator: Arc<TypeDescriptor>,
    /// Union cases.
    pub cases: Vec<UnionCase>,
}

impl UnionDescriptor {
    /// Create union descriptor.
    pub fn new(discriminator: Arc<TypeDescriptor>, cases: Vec<UnionCase>) -> Self {
        Self {
            discriminator,
            cases,
        }
    }
}

/// Union case.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionCase {
    /// Case name.
    pub name: String,
    /// Discriminator labels for this case.
    pub labels: Vec<i64>,
    /// Case type.
    pub type_desc: Arc<TypeDescriptor>,
}

impl UnionCase {
    /// Create union case.
    pub fn new(name: impl Into<String>, labels: Vec<i64>, type_desc: Arc<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            labels,
            type_desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_size() {
        assert_eq!(PrimitiveKind::Bool.size(), 1);
        assert_eq!(PrimitiveKind::U16.size(), 2);
        assert_eq!(PrimitiveKind::I32.size(), 4);
        assert_eq!(PrimitiveKind::F64.size(), 8);
    }

    #[test]
    fn test_primitive_integer_kinds() {
        assert!(PrimitiveKind::U8.is_integer());
        assert!(PrimitiveKind::I64.is_integer());
        assert!(!PrimitiveKind::Bool.is_integer());
        assert!(!PrimitiveKind::F32.is_integer());
    }

    #[test]
    fn test_type_descriptor_struct() {
        let u32_type = Arc::new(TypeDescriptor::primitive("uint32", PrimitiveKind::U32));
        let f64_type = Arc::new(TypeDescriptor::primitive("float64", PrimitiveKind::F64));

        let fields = vec![
            FieldDescriptor::new("x", u32_type.clone()),
            FieldDescriptor::new("y", f64_type.clone()),
        ];

        let desc = TypeDescriptor::struct_type("Point", fields);
        assert!(desc.is_struct());
        assert_eq!(desc.fields().map(|f| f.len()), Some(2));
        assert!(desc.field("x").is_some());
        assert!(desc.field("z").is_none());
    }

    #[test]
    fn test_field_ordinals_follow_declaration_order() {
        let i32_type = Arc::new(TypeDescriptor::primitive("int32", PrimitiveKind::I32));
        let desc = TypeDescriptor::struct_type(
            "Ordered",
            vec![
                FieldDescriptor::new("first", i32_type.clone()),
                FieldDescriptor::new("second", i32_type.clone()),
                FieldDescriptor::new("third", i32_type),
            ],
        );

        assert_eq!(desc.field_index("first"), Some(0));
        assert_eq!(desc.field_index("second"), Some(1));
        assert_eq!(desc.field_index("third"), Some(2));
        assert_eq!(desc.field_index("missing"), None);
    }

    #[test]
    fn test_enum_descriptor() {
        let variants = vec![
            EnumVariant::new("RED", 0),
            EnumVariant::new("GREEN", 1),
            EnumVariant::new("BLUE", 2),
        ];
        let enum_desc = EnumDescriptor::new(variants).with_underlying(PrimitiveKind::U8);

        assert_eq!(enum_desc.underlying, PrimitiveKind::U8);
        assert_eq!(enum_desc.variant("GREEN").map(|v| v.value), Some(1));
        assert_eq!(
            enum_desc.variant_by_value(2).map(|v| &v.name as &str),
            Some("BLUE")
        );
        assert!(enum_desc.variant_by_value(7).is_none());
    }

    #[test]
    fn test_sequence_descriptor() {
        let u8_type = Arc::new(TypeDescriptor::primitive("uint8", PrimitiveKind::U8));
        let desc = TypeDescriptor::sequence_of("Bytes", u8_type);
        match &desc.kind {
            TypeKind::Sequence(seq) => {
                assert_eq!(seq.element_type.kind, TypeKind::Primitive(PrimitiveKind::U8));
            }
            other => panic!("expected sequence, got {other:?}"),
        }
    }
}
