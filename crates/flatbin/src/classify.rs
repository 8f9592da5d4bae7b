// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type classification and the process-wide classification cache.
//!
//! Every type resolves to one of four encoding strategies. Emit and parse
//! both dispatch on the classification of the descriptor alone; nothing in
//! the stream records which strategy was used, so the two sides must reach
//! the same answer from the same input. Classification of a named struct is
//! computed once per process and memoized.

use crate::descriptor::{TypeDescriptor, TypeKind};
use crate::error::{WireError, WireResult};
use dashmap::DashMap;
use std::sync::OnceLock;

/// Encoding strategy for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Fixed binary size known from the declaration alone; the payload is
    /// the given number of bytes. Covers primitives, enums and structs
    /// whose members are all fixed, recursively.
    Fixed(usize),
    /// Length-prefixed codec text.
    Text,
    /// Count-prefixed element run.
    Sequence,
    /// Struct with at least one non-fixed member, walked field by field.
    Composite,
}

static CACHE: OnceLock<DashMap<String, Layout>> = OnceLock::new();

fn cache() -> &'static DashMap<String, Layout> {
    CACHE.get_or_init(DashMap::new)
}

/// Classify a type into its encoding strategy.
///
/// Struct classification recurses into every field type. Results for named
/// structs are memoized for the process lifetime: entries are inserted once
/// and never updated. Concurrent first-time classification of the same name
/// computes the same answer on each thread and publishes it idempotently,
/// so no lock is held across the recursion.
pub fn classify(desc: &TypeDescriptor) -> WireResult<Layout> {
    match &desc.kind {
        TypeKind::Primitive(p) => Ok(Layout::Fixed(p.size())),
        TypeKind::Enum(e) => {
            if !e.underlying.is_integer() {
                return Err(WireError::UnsupportedType(format!(
                    "enum {} with non-integer underlying kind {}",
                    desc.name,
                    e.underlying.name()
                )));
            }
            Ok(Layout::Fixed(e.underlying.size()))
        }
        TypeKind::Text => Ok(Layout::Text),
        TypeKind::Sequence(_) => Ok(Layout::Sequence),
        TypeKind::Struct(fields) => {
            let named = !desc.name.is_empty();
            if named {
                if let Some(hit) = cache().get(&desc.name) {
                    return Ok(*hit);
                }
            }

            // All-fixed structs collapse to one flat block of the summed
            // member sizes; anything else is walked field by field.
            let mut total = 0usize;
            let mut fixed = true;
            for field in fields {
                match classify(&field.type_desc)? {
                    Layout::Fixed(size) => total += size,
                    _ => fixed = false,
                }
            }
            let layout = if fixed {
                Layout::Fixed(total)
            } else {
                Layout::Composite
            };

            if named {
                log::trace!("[classify] {} -> {:?}", desc.name, layout);
                cache().insert(desc.name.clone(), layout);
            }
            Ok(layout)
        }
        TypeKind::Union(_) => Err(WireError::UnsupportedType(format!(
            "union {} has no flat representation",
            desc.name
        ))),
    }
}

/// Statically-known encoded size of a fixed-layout type, independent of any
/// value's contents. `None` for text, sequences and non-fixed composites.
pub fn fixed_size(desc: &TypeDescriptor) -> Option<usize> {
    match classify(desc) {
        Ok(Layout::Fixed(size)) => Some(size),
        _ => None,
    }
}
