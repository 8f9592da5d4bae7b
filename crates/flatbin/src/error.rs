// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire-level error type shared by classification, emit and parse.

use std::fmt;

/// Error for emit/parse operations.
#[derive(Debug)]
pub enum WireError {
    /// No text codec supplied to an operation that needs one.
    MissingCodec,
    /// A composite field's value was never assigned during emit.
    AbsentField { type_name: String, field: String },
    /// Classification met a type shape the flat format cannot express.
    UnsupportedType(String),
    /// Parse needed more bytes than the buffer had remaining.
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },
    /// The target type could not be instantiated from the decoded value.
    Construct(String),
    /// A value's shape disagrees with its descriptor during emit.
    TypeMismatch { expected: String, found: String },
    /// Malformed content (negative length, codec failure, oversized value).
    InvalidData(String),
    /// Text bytes were not valid UTF-8.
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCodec => write!(f, "no text codec supplied"),
            Self::AbsentField { type_name, field } => {
                write!(f, "field {}.{} has no value", type_name, field)
            }
            Self::UnsupportedType(t) => write!(f, "unsupported type: {}", t),
            Self::Truncated { offset, need, have } => {
                write!(
                    f,
                    "truncated input at offset {}: need {} bytes, have {}",
                    offset, need, have
                )
            }
            Self::Construct(msg) => write!(f, "failed to construct instance: {}", msg),
            Self::TypeMismatch { expected, found } => {
                write!(f, "type mismatch: expected {}, found {}", expected, found)
            }
            Self::InvalidData(msg) => write!(f, "invalid data: {}", msg),
            Self::Utf8(e) => write!(f, "invalid UTF-8 text: {}", e),
        }
    }
}

impl std::error::Error for WireError {}

impl From<std::string::FromUtf8Error> for WireError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}

/// Result alias used within the codec.
pub type WireResult<T> = Result<T, WireError>;
