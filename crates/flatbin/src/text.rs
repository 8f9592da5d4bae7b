// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Text codecs.
//!
//! Text travels as a 4-byte signed byte length followed by exactly that
//! many codec bytes: no terminator, no padding. The codec is chosen by the
//! caller per emit/parse call and is not recorded in the stream.

use crate::error::{WireError, WireResult};

/// Supported text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCodec {
    Utf8,
    Utf16Le,
}

impl TextCodec {
    /// Diagnostic name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf16Le => "utf-16le",
        }
    }

    /// Encode text to its byte representation.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::Utf16Le => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    bytes.extend(unit.to_le_bytes());
                }
                bytes
            }
        }
    }

    /// Decode text from its byte representation.
    pub fn decode(&self, bytes: &[u8]) -> WireResult<String> {
        match self {
            Self::Utf8 => Ok(String::from_utf8(bytes.to_vec())?),
            Self::Utf16Le => {
                if bytes.len() % 2 != 0 {
                    return Err(WireError::InvalidData(format!(
                        "utf-16le text length {} is not a multiple of 2",
                        bytes.len()
                    )));
                }
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16(&units)
                    .map_err(|_| WireError::InvalidData("invalid utf-16le text".into()))
            }
        }
    }
}
