/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Sentence-template expansion for utterance corpora.
//!
//! A single template line stands for many concrete phrasings of an utterance.
//! This crate expands such a line into every sentence it denotes. The template
//! language supports:
//!
//! - Literal text: letters, digits, spaces, apostrophes and hyphens
//! - Slots: `<size>` or `<size~large>`, preserved verbatim
//! - Variables: `$greeting`, looked up case-insensitively in a [`VariableStore`]
//! - Alternation: `(a|b)` or a whole unbracketed line `a|b`
//! - Optionality: `[a|b]`, which also yields the variant with the span omitted
//! - Entity-synonym lines: `prefix ~ rest`, passed through untouched
//!
//! # Architecture
//!
//! The [`grammar`] module classifies one string into a single [`Rule`]. The
//! [`Expander`] runs a LIFO worklist over those classifications until every
//! branch is either emitted or dropped. Anomalies (unrecognised fragments,
//! undefined variables) never abort an expansion; they are reported through an
//! [`ExpansionObserver`].
//!
//! Output order is depth-first with the most recently pushed variant expanded
//! first, so it is *not* left-to-right reading order.
//!
//! # Example
//!
//! ```
//! use utterance_expander::{VariableStore, expand};
//!
//! let vars = VariableStore::from_pairs([("name", "Bob|Sue")]);
//! let sentences = expand("Hello $name", &vars);
//! assert_eq!(sentences, vec!["Hello Sue", "Hello Bob"]);
//! ```

pub mod corpus;
pub mod error;
pub mod expander;
pub mod grammar;
pub mod observer;
pub mod slots;
pub mod splice;
pub mod variables;

// Re-export main types at crate root
pub use corpus::{Corpus, ExpandedIntent, Intent};
pub use error::{ExpandError, ExpandResult};
pub use expander::{
    DEFAULT_MAX_SUBSTITUTION_DEPTH, ExpandOptions, Expander, UndefinedVariablePolicy, expand,
};
pub use grammar::{Classification, Disposition, Rule, classify};
pub use observer::{
    EventLevel, ExpansionEvent, ExpansionObserver, NoopObserver, RecordingObserver,
    TracingObserver,
};
pub use slots::{SlotRef, UndefinedSlot, find_slots, undefined_slots};
pub use splice::splice;
pub use variables::VariableStore;
