/*
 * variables.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Variable store for `$name` substitution.
//!
//! Variable names are case-insensitive: keys are lower-cased when inserted and
//! lookups lower-case the requested name. The store is never mutated during an
//! expansion, so a single store can be shared by concurrent expansions.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ExpandError, ExpandResult};

/// Mapping from lower-cased variable name to replacement text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VariableStore {
    values: HashMap<String, String>,
}

impl VariableStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from name/value pairs.
    ///
    /// Later pairs win when two names differ only by case.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut store = Self::new();
        for (name, value) in pairs {
            store.insert(name.as_ref(), value);
        }
        store
    }

    /// Insert a variable, replacing any previous value for the same name.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_lowercase(), value.into());
    }

    /// Parse and insert a `KEY=VALUE` assignment.
    ///
    /// Only the first `=` separates; the value may contain further `=` signs.
    pub fn insert_assignment(&mut self, assignment: &str) -> ExpandResult<()> {
        match assignment.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                self.insert(name.trim(), value);
                Ok(())
            }
            _ => Err(ExpandError::InvalidVariableAssignment {
                assignment: assignment.to_string(),
            }),
        }
    }

    /// Copy every variable from `other` into this store, overwriting on conflict.
    pub fn extend(&mut self, other: VariableStore) {
        self.values.extend(other.values);
    }

    /// Look up a variable by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a YAML mapping of variables.
    pub fn from_yaml_str(source: &str) -> ExpandResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// Parse a JSON object of variables.
    pub fn from_json_str(source: &str) -> ExpandResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a variable file, choosing the format by extension.
    ///
    /// `.json` is read as JSON; anything else is read as YAML, which also
    /// accepts plain JSON.
    pub fn from_path(path: &Path) -> ExpandResult<Self> {
        let source = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&source),
            _ => Self::from_yaml_str(&source),
        }
    }
}

impl<'de> Deserialize<'de> for VariableStore {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        Ok(Self::from_pairs(raw))
    }
}
