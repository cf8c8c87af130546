/*
 * slots.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Slot references in expanded sentences.
//!
//! The expander treats `<name>` and `<name~example>` as opaque. This module is
//! an optional check run over already expanded sentences, reporting slot
//! references that a registry does not define.

use std::collections::HashSet;
use std::hash::BuildHasher;

use serde::Serialize;

use crate::grammar::SLOT;

/// A slot placeholder found in a sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRef {
    /// Slot name, as written.
    pub name: String,

    /// Example text after `~`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

/// A slot reference whose name is not defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UndefinedSlot {
    pub slot: SlotRef,

    /// The sentence the reference was found in.
    pub sentence: String,
}

/// Extract every slot reference from `sentence`, left to right.
pub fn find_slots(sentence: &str) -> Vec<SlotRef> {
    SLOT.captures_iter(sentence)
        .filter_map(|caps| {
            let name = caps.get(2)?.as_str().to_string();
            // Group 3 includes the leading '~'
            let example = caps
                .get(3)
                .map(|m| m.as_str().trim_start_matches('~').to_string());
            Some(SlotRef { name, example })
        })
        .collect()
}

/// List slot references in `sentences` whose name is not in `known`.
///
/// Names are compared exactly. Each occurrence is reported, so a sentence that
/// uses the same undefined slot twice yields two entries.
pub fn undefined_slots<'a, I, S>(sentences: I, known: &HashSet<String, S>) -> Vec<UndefinedSlot>
where
    I: IntoIterator<Item = &'a String>,
    S: BuildHasher,
{
    let mut undefined = Vec::new();
    for sentence in sentences {
        for slot in find_slots(sentence) {
            if !known.contains(&slot.name) {
                undefined.push(UndefinedSlot {
                    slot,
                    sentence: sentence.clone(),
                });
            }
        }
    }
    undefined
}
