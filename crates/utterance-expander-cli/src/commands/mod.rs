//! Command implementations for the utterance expander CLI
//!
//! Each command module handles the CLI interface and delegates to
//! utterance-expander for the actual expansion.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use utterance_expander::{ExpandOptions, VariableStore};

pub mod corpus;
pub mod expand;

/// Output format for expanded sentences
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One sentence per line
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Build expansion options from the shared command-line flags.
pub fn expand_options(strict: bool, max_substitution_depth: Option<usize>) -> ExpandOptions {
    let options = ExpandOptions::default().with_strict_variables(strict);
    match max_substitution_depth {
        Some(limit) => options.with_max_substitution_depth(limit),
        None => options,
    }
}

/// Collect variables from an optional file plus `KEY=VALUE` assignments.
///
/// Assignments are applied after the file, so they win on conflict.
pub fn load_variables(assignments: &[String], file: Option<&str>) -> Result<VariableStore> {
    let mut store = match file {
        Some(path) => VariableStore::from_path(Path::new(path))
            .with_context(|| format!("Failed to load variables from {}", path))?,
        None => VariableStore::new(),
    };

    for assignment in assignments {
        store.insert_assignment(assignment)?;
    }

    Ok(store)
}
