/*
 * corpus.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Utterance corpus files.
//!
//! A corpus bundles a variable table with a list of intents. Each intent names
//! the slots it defines and the utterance templates that phrase it:
//!
//! ```yaml
//! variables:
//!   greeting: "hi|hello"
//! intents:
//!   - name: order_coffee
//!     slots: [size, drink]
//!     utterances:
//!       - "$greeting [please] (get|make) me a <size> <drink>"
//! ```
//!
//! Corpora are read from YAML (`.yaml`, `.yml`) or JSON (`.json`).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExpandError, ExpandResult};
use crate::expander::{ExpandOptions, Expander};
use crate::observer::ExpansionObserver;
use crate::slots::{UndefinedSlot, undefined_slots};
use crate::variables::VariableStore;

/// A set of intents sharing one variable table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub variables: VariableStore,

    #[serde(default)]
    pub intents: Vec<Intent>,
}

/// One intent and its utterance templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,

    /// Slot names this intent defines.
    #[serde(default)]
    pub slots: Vec<String>,

    /// Templates, one utterance pattern each.
    #[serde(default)]
    pub utterances: Vec<String>,
}

/// The expansion of every template of one intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedIntent {
    pub name: String,

    /// Sentences for each template in source order, each template's sentences
    /// in expander order.
    pub sentences: Vec<String>,

    /// Slot references the intent does not define.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub undefined_slots: Vec<UndefinedSlot>,
}

impl Corpus {
    pub fn from_yaml_str(source: &str) -> ExpandResult<Self> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn from_json_str(source: &str) -> ExpandResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load a corpus file, choosing the format by extension.
    pub fn from_path(path: &Path) -> ExpandResult<Self> {
        let format = path.extension().and_then(|e| e.to_str());
        if !matches!(format, Some("yaml" | "yml" | "json")) {
            return Err(ExpandError::UnsupportedCorpusFormat {
                path: path.display().to_string(),
            });
        }

        let source = std::fs::read_to_string(path)?;
        let corpus = match format {
            Some("json") => Self::from_json_str(&source)?,
            _ => Self::from_yaml_str(&source)?,
        };
        tracing::debug!(
            path = %path.display(),
            intents = corpus.intents.len(),
            variables = corpus.variables.len(),
            "Loaded corpus"
        );
        Ok(corpus)
    }

    /// Overlay extra variables, which win over the corpus's own.
    pub fn with_variables(mut self, extra: VariableStore) -> Self {
        self.variables.extend(extra);
        self
    }

    /// Expand every intent.
    ///
    /// Stops at the first template whose expansion fails (substitution depth ceiling, or an
    /// undefined variable under the strict policy).
    pub fn expand(
        &self,
        options: ExpandOptions,
        observer: &dyn ExpansionObserver,
    ) -> ExpandResult<Vec<ExpandedIntent>> {
        let expander = Expander::new(&self.variables)
            .with_options(options)
            .with_observer(observer);

        self.intents
            .iter()
            .map(|intent| intent.expand(&expander))
            .collect()
    }
}

impl Intent {
    /// Expand all of this intent's templates and check their slot references.
    pub fn expand(&self, expander: &Expander<'_>) -> ExpandResult<ExpandedIntent> {
        let mut sentences = Vec::new();
        for template in &self.utterances {
            let count = expander.try_expand_into(template, &mut sentences)?;
            tracing::debug!(intent = %self.name, template = %template, count, "Expanded template");
        }

        let known: HashSet<String> = self.slots.iter().cloned().collect();
        let undefined_slots = undefined_slots(&sentences, &known);

        Ok(ExpandedIntent {
            name: self.name.clone(),
            sentences,
            undefined_slots,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;

    const CORPUS: &str = r#"
variables:
  Greeting: "hi|hello"
intents:
  - name: greet
    utterances:
      - "$greeting there"
  - name: order
    slots: [drink]
    utterances:
      - "a <drink> [please]"
      - "a <size> <drink>"
"#;

    #[test]
    fn test_parse_yaml_corpus() {
        let corpus = Corpus::from_yaml_str(CORPUS).unwrap();
        assert_eq!(corpus.intents.len(), 2);
        assert_eq!(corpus.variables.get("greeting"), Some("hi|hello"));
        assert!(corpus.intents[0].slots.is_empty());
    }

    #[test]
    fn test_expand_corpus() {
        let corpus = Corpus::from_yaml_str(CORPUS).unwrap();
        let expanded = corpus
            .expand(ExpandOptions::default(), &NoopObserver)
            .unwrap();

        assert_eq!(expanded[0].name, "greet");
        assert_eq!(expanded[0].sentences, vec!["hello there", "hi there"]);
        assert!(expanded[0].undefined_slots.is_empty());

        assert_eq!(
            expanded[1].sentences,
            vec!["a <drink> ", "a <drink> please", "a <size> <drink>"]
        );
        assert_eq!(expanded[1].undefined_slots.len(), 1);
        assert_eq!(expanded[1].undefined_slots[0].slot.name, "size");
    }

    #[test]
    fn test_overlay_variables() {
        let corpus = Corpus::from_yaml_str(CORPUS)
            .unwrap()
            .with_variables(VariableStore::from_pairs([("greeting", "hey")]));
        let expanded = corpus
            .expand(ExpandOptions::default(), &NoopObserver)
            .unwrap();
        assert_eq!(expanded[0].sentences, vec!["hey there"]);
    }

    #[test]
    fn test_strict_corpus_fails_on_undefined_variable() {
        let corpus = Corpus::from_json_str(
            r#"{"intents": [{"name": "x", "utterances": ["say $nothing"]}]}"#,
        )
        .unwrap();
        let result = corpus.expand(
            ExpandOptions::default().with_strict_variables(true),
            &NoopObserver,
        );
        assert!(matches!(result, Err(ExpandError::UndefinedVariable { .. })));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = Corpus::from_path(Path::new("corpus.txt")).unwrap_err();
        assert!(matches!(err, ExpandError::UnsupportedCorpusFormat { .. }));
    }
}
