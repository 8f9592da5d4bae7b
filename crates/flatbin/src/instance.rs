// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed value container with runtime type checking.

use crate::descriptor::{PrimitiveKind, TypeDescriptor, TypeKind};
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Errors for Instance operations.
#[derive(Debug)]
pub enum InstanceError {
    FieldNotFound(String),
    TypeMismatch { expected: String, got: String },
    InvalidOperation(String),
    IndexOutOfBounds { index: usize, length: usize },
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldNotFound(name) => write!(f, "field not found: {}", name),
            Self::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {}, got {}", expected, got)
            }
            Self::InvalidOperation(msg) => write!(f, "invalid operation for type: {}", msg),
            Self::IndexOutOfBounds { index, length } => {
                write!(f, "index out of bounds: {} >= {}", index, length)
            }
        }
    }
}

impl std::error::Error for InstanceError {}

/// A value paired with its type descriptor.
///
/// A fresh instance of a struct type starts with every field slot
/// [`Value::Absent`]; emitting it before all fields are assigned fails.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Type descriptor.
    descriptor: Arc<TypeDescriptor>,
    /// Actual value.
    value: Value,
}

impl Instance {
    /// Create a new instance with unset field slots.
    pub fn new(descriptor: &Arc<TypeDescriptor>) -> Self {
        let value = match &descriptor.kind {
            TypeKind::Struct(fields) => {
                let mut map = HashMap::new();
                for field in fields {
                    map.insert(field.name.clone(), Value::Absent);
                }
                Value::Struct(map)
            }
            TypeKind::Sequence(_) => Value::Sequence(Vec::new()),
            _ => Value::Absent,
        };
        Self {
            descriptor: descriptor.clone(),
            value,
        }
    }

    /// Create from an existing value, validating its shape against the
    /// descriptor. Unset (`Absent`) field slots are accepted.
    pub fn from_value(
        descriptor: &Arc<TypeDescriptor>,
        value: Value,
    ) -> Result<Self, InstanceError> {
        check_shape(&value, descriptor)?;
        Ok(Self {
            descriptor: descriptor.clone(),
            value,
        })
    }

    /// Get the type descriptor.
    pub fn descriptor(&self) -> &Arc<TypeDescriptor> {
        &self.descriptor
    }

    /// Get the type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.name
    }

    /// Get the underlying value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Get mutable reference to the value.
    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Into inner value.
    pub fn into_value(self) -> Value {
        self.value
    }

    /// Get a field value by name.
    pub fn get<T: FromValue>(&self, name: &str) -> Result<T, InstanceError> {
        let field_value = self.get_field(name)?;
        T::from_value(field_value)
    }

    /// Set a field value by name.
    pub fn set<T: IntoValue>(&mut self, name: &str, value: T) -> Result<(), InstanceError> {
        // Verify field exists
        if self.descriptor.field(name).is_none() {
            return Err(InstanceError::FieldNotFound(name.to_string()));
        }

        match &mut self.value {
            Value::Struct(fields) => {
                fields.insert(name.to_string(), value.into_value());
                Ok(())
            }
            _ => Err(InstanceError::InvalidOperation(
                "set requires struct type".into(),
            )),
        }
    }

    /// Get field by name.
    pub fn get_field(&self, name: &str) -> Result<&Value, InstanceError> {
        if self.descriptor.field(name).is_none() {
            return Err(InstanceError::FieldNotFound(name.to_string()));
        }

        match &self.value {
            Value::Struct(fields) => fields
                .get(name)
                .ok_or_else(|| InstanceError::FieldNotFound(name.to_string())),
            _ => Err(InstanceError::InvalidOperation(
                "get_field requires struct type".into(),
            )),
        }
    }

    /// Get mutable field by name.
    pub fn get_field_mut(&mut self, name: &str) -> Result<&mut Value, InstanceError> {
        if self.descriptor.field(name).is_none() {
            return Err(InstanceError::FieldNotFound(name.to_string()));
        }

        match &mut self.value {
            Value::Struct(fields) => fields
                .get_mut(name)
                .ok_or_else(|| InstanceError::FieldNotFound(name.to_string())),
            _ => Err(InstanceError::InvalidOperation(
                "get_field_mut requires struct type".into(),
            )),
        }
    }

    /// Get sequence element by index.
    pub fn get_element(&self, index: usize) -> Result<&Value, InstanceError> {
        match &self.value {
            Value::Sequence(seq) => seq.get(index).ok_or(InstanceError::IndexOutOfBounds {
                index,
                length: seq.len(),
            }),
            _ => Err(InstanceError::InvalidOperation(
                "get_element requires sequence type".into(),
            )),
        }
    }

    /// Set sequence element by index.
    pub fn set_element(&mut self, index: usize, value: Value) -> Result<(), InstanceError> {
        match &mut self.value {
            Value::Sequence(seq) => {
                if index >= seq.len() {
                    return Err(InstanceError::IndexOutOfBounds {
                        index,
                        length: seq.len(),
                    });
                }
                seq[index] = value;
                Ok(())
            }
            _ => Err(InstanceError::InvalidOperation(
                "set_element requires sequence type".into(),
            )),
        }
    }

    /// Push element to sequence.
    pub fn push_element(&mut self, value: Value) -> Result<(), InstanceError> {
        match &mut self.value {
            Value::Sequence(seq) => {
                seq.push(value);
                Ok(())
            }
            _ => Err(InstanceError::InvalidOperation(
                "push_element requires sequence type".into(),
            )),
        }
    }

    /// Get sequence length.
    pub fn len(&self) -> Result<usize, InstanceError> {
        match &self.value {
            Value::Sequence(seq) => Ok(seq.len()),
            _ => Err(InstanceError::InvalidOperation(
                "len requires sequence type".into(),
            )),
        }
    }

    /// Check if sequence is empty.
    pub fn is_empty(&self) -> Result<bool, InstanceError> {
        self.len().map(|l| l == 0)
    }

    /// Iterate over fields (for structs).
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        match &self.value {
            Value::Struct(fields) => {
                Box::new(fields.iter().map(|(k, v)| (k.as_str(), v))) as Box<dyn Iterator<Item = _>>
            }
            _ => Box::new(std::iter::empty()),
        }
    }

    /// Iterate over elements (for sequences).
    pub fn elements(&self) -> impl Iterator<Item = &Value> {
        match &self.value {
            Value::Sequence(seq) => Box::new(seq.iter()) as Box<dyn Iterator<Item = _>>,
            _ => Box::new(std::iter::empty()),
        }
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.name == other.descriptor.name && self.value == other.value
    }
}

/// Recursive shape check of a value tree against a descriptor.
fn check_shape(value: &Value, desc: &TypeDescriptor) -> Result<(), InstanceError> {
    // Unset slots are valid anywhere; emit rejects them later.
    if value.is_absent() {
        return Ok(());
    }

    let mismatch = |expected: &str| InstanceError::TypeMismatch {
        expected: expected.to_string(),
        got: value.kind_name().to_string(),
    };

    match &desc.kind {
        TypeKind::Primitive(p) => {
            if primitive_matches(value, *p) {
                Ok(())
            } else {
                Err(mismatch(p.name()))
            }
        }
        TypeKind::Enum(_) => match value {
            Value::Enum(_) => Ok(()),
            _ => Err(mismatch("enum")),
        },
        TypeKind::Text => match value {
            Value::Text(_) => Ok(()),
            _ => Err(mismatch("text")),
        },
        TypeKind::Sequence(seq) => match value {
            Value::Sequence(elements) => {
                for element in elements {
                    check_shape(element, &seq.element_type)?;
                }
                Ok(())
            }
            _ => Err(mismatch("sequence")),
        },
        TypeKind::Struct(fields) => match value {
            Value::Struct(map) => {
                for field in fields {
                    let field_value = map
                        .get(&field.name)
                        .ok_or_else(|| InstanceError::FieldNotFound(field.name.clone()))?;
                    check_shape(field_value, &field.type_desc)?;
                }
                Ok(())
            }
            _ => Err(mismatch("struct")),
        },
        TypeKind::Union(_) => Err(InstanceError::InvalidOperation(format!(
            "union {} instances are not supported",
            desc.name
        ))),
    }
}

fn primitive_matches(value: &Value, kind: PrimitiveKind) -> bool {
    matches!(
        (value, kind),
        (Value::Bool(_), PrimitiveKind::Bool)
            | (Value::U8(_), PrimitiveKind::U8)
            | (Value::U16(_), PrimitiveKind::U16)
            | (Value::U32(_), PrimitiveKind::U32)
            | (Value::U64(_), PrimitiveKind::U64)
            | (Value::I8(_), PrimitiveKind::I8)
            | (Value::I16(_), PrimitiveKind::I16)
            | (Value::I32(_), PrimitiveKind::I32)
            | (Value::I64(_), PrimitiveKind::I64)
            | (Value::F32(_), PrimitiveKind::F32)
            | (Value::F64(_), PrimitiveKind::F64)
    )
}

/// Trait for converting from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Result<Self, InstanceError>;
}

/// Trait for converting to a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

// Implement FromValue for primitives
macro_rules! impl_from_value {
    ($ty:ty, $variant:ident, $name:expr) => {
        impl FromValue for $ty {
            fn from_value(value: &Value) -> Result<Self, InstanceError> {
                match value {
                    Value::$variant(v) => Ok(*v),
                    other => Err(InstanceError::TypeMismatch {
                        expected: $name.to_string(),
                        got: other.kind_name().to_string(),
                    }),
                }
            }
        }
    };
}

impl_from_value!(bool, Bool, "bool");
impl_from_value!(u8, U8, "u8");
impl_from_value!(u16, U16, "u16");
impl_from_value!(u32, U32, "u32");
impl_from_value!(u64, U64, "u64");
impl_from_value!(i8, I8, "i8");
impl_from_value!(i16, I16, "i16");
impl_from_value!(i32, I32, "i32");
impl_from_value!(i64, I64, "i64");
impl_from_value!(f32, F32, "f32");
impl_from_value!(f64, F64, "f64");

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, InstanceError> {
        match value {
            Value::Text(s) => Ok(s.clone()),
            other => Err(InstanceError::TypeMismatch {
                expected: "text".to_string(),
                got: other.kind_name().to_string(),
            }),
        }
    }
}

// Implement IntoValue for primitives
macro_rules! impl_into_value {
    ($ty:ty, $variant:ident) => {
        impl IntoValue for $ty {
            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }
    };
}

impl_into_value!(bool, Bool);
impl_into_value!(u8, U8);
impl_into_value!(u16, U16);
impl_into_value!(u32, U32);
impl_into_value!(u64, U64);
impl_into_value!(i8, I8);
impl_into_value!(i16, I16);
impl_into_value!(i32, I32);
impl_into_value!(i64, I64);
impl_into_value!(f32, F32);
impl_into_value!(f64, F64);

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(self.to_string())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypeDescriptorBuilder;
    use crate::descriptor::PrimitiveKind;

    #[test]
    fn test_instance_struct_get_set() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("TestStruct")
                .field("x", PrimitiveKind::I32)
                .field("y", PrimitiveKind::F64)
                .text_field("name")
                .build(),
        );

        let mut data = Instance::new(&desc);

        data.set("x", 42i32).expect("set x");
        data.set("y", std::f64::consts::PI).expect("set y");
        data.set("name", "test").expect("set name");

        assert_eq!(data.get::<i32>("x").expect("get x"), 42);
        assert_eq!(data.get::<f64>("y").expect("get y"), std::f64::consts::PI);
        assert_eq!(data.get::<String>("name").expect("get name"), "test");

        // Non-existent field
        assert!(data.get::<i32>("z").is_err());
    }

    #[test]
    fn test_new_instance_fields_start_absent() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("FreshPoint")
                .field("x", PrimitiveKind::I32)
                .field("y", PrimitiveKind::I32)
                .build(),
        );

        let data = Instance::new(&desc);
        assert!(data.get_field("x").expect("slot exists").is_absent());
        assert!(data.get_field("y").expect("slot exists").is_absent());
    }

    #[test]
    fn test_from_value_validates_shape() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("CheckedPoint")
                .field("x", PrimitiveKind::I32)
                .field("y", PrimitiveKind::I32)
                .build(),
        );

        let mut good = HashMap::new();
        good.insert("x".to_string(), Value::I32(1));
        good.insert("y".to_string(), Value::I32(2));
        assert!(Instance::from_value(&desc, Value::Struct(good)).is_ok());

        let mut wrong_kind = HashMap::new();
        wrong_kind.insert("x".to_string(), Value::Text("oops".into()));
        wrong_kind.insert("y".to_string(), Value::I32(2));
        assert!(matches!(
            Instance::from_value(&desc, Value::Struct(wrong_kind)),
            Err(InstanceError::TypeMismatch { .. })
        ));

        let mut missing = HashMap::new();
        missing.insert("x".to_string(), Value::I32(1));
        assert!(matches!(
            Instance::from_value(&desc, Value::Struct(missing)),
            Err(InstanceError::FieldNotFound(_))
        ));

        assert!(matches!(
            Instance::from_value(&desc, Value::I32(5)),
            Err(InstanceError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_sequence_operations() {
        let elem = Arc::new(TypeDescriptor::primitive("int32", PrimitiveKind::I32));
        let desc = Arc::new(TypeDescriptor::sequence_of("Ints", elem));

        let mut data = Instance::new(&desc);
        assert!(data.is_empty().expect("sequence"));

        data.push_element(Value::I32(7)).expect("push");
        data.push_element(Value::I32(8)).expect("push");
        assert_eq!(data.len().expect("len"), 2);
        assert_eq!(data.get_element(1).expect("element").as_i32(), Some(8));

        data.set_element(0, Value::I32(9)).expect("set");
        assert_eq!(data.get_element(0).expect("element").as_i32(), Some(9));
        assert!(data.get_element(5).is_err());
        assert!(data.set_element(5, Value::I32(0)).is_err());
    }

    #[test]
    fn test_instance_iteration() {
        let desc = Arc::new(
            TypeDescriptorBuilder::new("IterPoint")
                .field("x", PrimitiveKind::I32)
                .field("y", PrimitiveKind::I32)
                .build(),
        );

        let mut data = Instance::new(&desc);
        data.set("x", 10i32).expect("set x");
        data.set("y", 20i32).expect("set y");

        let fields: Vec<_> = data.fields().collect();
        assert_eq!(fields.len(), 2);
    }
}
