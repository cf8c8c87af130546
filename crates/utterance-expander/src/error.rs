/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template expansion and corpus loading.

use thiserror::Error;

/// Errors that can occur while expanding templates or loading their inputs.
///
/// Malformed template fragments are not errors: they are dropped and reported
/// through the observer. Only the conditions below stop an expansion.
#[derive(Debug, Error)]
pub enum ExpandError {
    /// One branch needed more nested variable substitutions than the ceiling.
    ///
    /// This is how self-referential variables (`x = "$x"`) surface.
    #[error("Expansion of '{template}' exceeded {limit} nested variable substitutions")]
    SubstitutionDepthExceeded { template: String, limit: usize },

    /// A `$name` reference had no value and the strict policy was in effect.
    #[error("Undefined variable '${name}' in '{fragment}'")]
    UndefinedVariable { name: String, fragment: String },

    /// A `KEY=VALUE` assignment could not be parsed.
    #[error("Invalid variable assignment '{assignment}': expected KEY=VALUE")]
    InvalidVariableAssignment { assignment: String },

    /// The corpus file extension is not one we know how to read.
    #[error("Unsupported corpus format: {path} (expected .yaml, .yml or .json)")]
    UnsupportedCorpusFormat { path: String },

    /// I/O error (e.g., reading a corpus file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for expansion operations.
pub type ExpandResult<T> = Result<T, ExpandError>;
