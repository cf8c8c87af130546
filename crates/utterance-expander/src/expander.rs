/*
 * expander.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Worklist-driven template expansion.
//!
//! The expander keeps a LIFO worklist seeded with the input template. Each
//! iteration pops the most recently pushed string, classifies it with
//! [`classify`], and then either:
//!
//! - emits it ([`Rule::Vanilla`], [`Rule::SynonymLine`]),
//! - drops it ([`Rule::Unrecognized`]), or
//! - pushes its rewritten variants back for reclassification.
//!
//! Variants are pushed in body order, and for `[...]` the omission variant is
//! pushed last. Because the worklist is a stack, the last pushed variant is
//! expanded first. Callers that depend on output order rely on this, so the
//! worklist must not become a queue.

use crate::error::{ExpandError, ExpandResult};
use crate::grammar::{Classification, Rule, classify};
use crate::observer::{ExpansionObserver, NoopObserver};
use crate::splice::splice;
use crate::variables::VariableStore;

/// Default ceiling on nested `$name` substitutions along one expansion branch.
///
/// Only variable substitution can reintroduce work, so alternation and
/// optional groups are never counted. A variable whose value mentions itself
/// stops here instead of growing forever.
pub const DEFAULT_MAX_SUBSTITUTION_DEPTH: usize = 1_000;

static NOOP_OBSERVER: NoopObserver = NoopObserver;

/// What to do when `$name` has no value in the variable store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UndefinedVariablePolicy {
    /// Substitute empty text (still wrapped in parentheses) and keep going.
    ///
    /// The resulting `()` matches no rule, so that branch is dropped later.
    #[default]
    Empty,
    /// Stop the expansion with [`ExpandError::UndefinedVariable`].
    Strict,
}

/// Options controlling one expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Maximum number of variable substitutions on any one branch.
    pub max_substitution_depth: usize,

    /// Handling of undefined variable references.
    pub undefined_variables: UndefinedVariablePolicy,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            max_substitution_depth: DEFAULT_MAX_SUBSTITUTION_DEPTH,
            undefined_variables: UndefinedVariablePolicy::default(),
        }
    }
}

impl ExpandOptions {
    pub fn with_max_substitution_depth(mut self, depth: usize) -> Self {
        self.max_substitution_depth = depth;
        self
    }

    /// Enable or disable strict handling of undefined variables.
    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.undefined_variables = if strict {
            UndefinedVariablePolicy::Strict
        } else {
            UndefinedVariablePolicy::Empty
        };
        self
    }
}

/// Expands templates against a borrowed variable store.
///
/// An `Expander` holds no per-expansion state, so one instance can expand any
/// number of templates.
pub struct Expander<'a> {
    variables: &'a VariableStore,
    observer: &'a dyn ExpansionObserver,
    options: ExpandOptions,
}

impl<'a> Expander<'a> {
    /// Create an expander with default options and a silent observer.
    pub fn new(variables: &'a VariableStore) -> Self {
        Self {
            variables,
            observer: &NOOP_OBSERVER,
            options: ExpandOptions::default(),
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn ExpansionObserver) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_options(mut self, options: ExpandOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExpandOptions {
        &self.options
    }

    /// Expand `template`, appending every produced sentence to `output`.
    ///
    /// Returns the number of sentences appended. On error, sentences produced
    /// before the failure remain in `output`.
    pub fn try_expand_into(&self, template: &str, output: &mut Vec<String>) -> ExpandResult<usize> {
        let start = output.len();
        // Each pending string carries how many substitutions produced it
        let mut worklist = vec![(template.to_string(), 0usize)];

        while let Some((sentence, depth)) = worklist.pop() {
            let classification = classify(&sentence);
            match classification.rule {
                Rule::Vanilla | Rule::SynonymLine => {
                    self.observer.on_emit(classification.rule, &sentence);
                    output.push(sentence);
                }
                Rule::Unrecognized => {
                    self.observer.on_unrecognized(&sentence);
                }
                rule => {
                    let depth = if rule == Rule::VariableRef {
                        let limit = self.options.max_substitution_depth;
                        if depth >= limit {
                            self.observer.on_limit_reached(limit, template);
                            return Err(ExpandError::SubstitutionDepthExceeded {
                                template: template.to_string(),
                                limit,
                            });
                        }
                        depth + 1
                    } else {
                        depth
                    };

                    let variants = self.rewrite(&classification, &sentence)?;
                    self.observer.on_rewrite(rule, &sentence, variants.len());
                    worklist.extend(variants.into_iter().map(|variant| (variant, depth)));
                }
            }
        }

        Ok(output.len() - start)
    }

    /// Expand `template` into `output`, never failing.
    ///
    /// Errors are logged and whatever was produced before them is kept.
    pub fn expand_into(&self, template: &str, output: &mut Vec<String>) -> usize {
        let start = output.len();
        match self.try_expand_into(template, output) {
            Ok(count) => count,
            Err(error) => {
                tracing::warn!(template, error = %error, "Expansion stopped early");
                output.len() - start
            }
        }
    }

    /// Expand `template` into a fresh list of sentences.
    pub fn expand(&self, template: &str) -> Vec<String> {
        let mut output = Vec::new();
        self.expand_into(template, &mut output);
        output
    }

    /// Produce the variants for one non-terminal classification, in push order.
    fn rewrite(
        &self,
        classification: &Classification<'_>,
        sentence: &str,
    ) -> ExpandResult<Vec<String>> {
        let span = classification.span.clone();
        let variants = match classification.rule {
            Rule::VariableRef => {
                let name = classification.body;
                let value = match self.variables.get(name) {
                    Some(value) => value,
                    None => match self.options.undefined_variables {
                        UndefinedVariablePolicy::Empty => {
                            self.observer.on_undefined_variable(name, sentence);
                            ""
                        }
                        UndefinedVariablePolicy::Strict => {
                            return Err(ExpandError::UndefinedVariable {
                                name: name.to_string(),
                                fragment: sentence.to_string(),
                            });
                        }
                    },
                };
                // Parentheses scope any '|' inside the value
                vec![splice(sentence, span, &format!("({value})"))]
            }
            Rule::RoundAlt | Rule::BareAlt => classification
                .alternatives()
                .map(|variant| splice(sentence, span.clone(), variant))
                .collect(),
            Rule::BracketOpt => {
                let mut variants: Vec<String> = classification
                    .alternatives()
                    .map(|variant| splice(sentence, span.clone(), variant))
                    .collect();
                variants.push(splice(sentence, span, ""));
                variants
            }
            Rule::Vanilla | Rule::SynonymLine | Rule::Unrecognized => Vec::new(),
        };
        Ok(variants)
    }
}

/// Expand `template` against `variables` with default options.
///
/// Sentences come out in worklist order (see the module docs) and may contain
/// duplicates.
pub fn expand(template: &str, variables: &VariableStore) -> Vec<String> {
    Expander::new(variables).expand(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{ExpansionEvent, RecordingObserver};
    use pretty_assertions::assert_eq;

    fn no_vars() -> VariableStore {
        VariableStore::new()
    }

    #[test]
    fn test_vanilla_is_emitted_unchanged() {
        assert_eq!(expand("turn on the light", &no_vars()), vec!["turn on the light"]);
    }

    #[test]
    fn test_bare_alternation_order() {
        assert_eq!(expand("a|b|c", &no_vars()), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_round_alternation_order() {
        assert_eq!(expand("x (a|b) y", &no_vars()), vec!["x b y", "x a y"]);
    }

    #[test]
    fn test_optional_keeps_double_space() {
        assert_eq!(
            expand("x [a|b] y", &no_vars()),
            vec!["x  y", "x b y", "x a y"]
        );
    }

    #[test]
    fn test_single_optional_drops_empty_line() {
        // The omission variant of a whole-line "[a]" is "", which matches nothing
        let observer = RecordingObserver::new();
        let vars = no_vars();
        let out = Expander::new(&vars).with_observer(&observer).expand("[a]");
        assert_eq!(out, vec!["a"]);
        assert_eq!(
            observer.warnings(),
            vec![ExpansionEvent::Unrecognized {
                fragment: String::new()
            }]
        );
    }

    #[test]
    fn test_alternation_then_optional_order() {
        assert_eq!(
            expand("(hi|hello) [there] friend", &no_vars()),
            vec![
                "hello  friend",
                "hello there friend",
                "hi  friend",
                "hi there friend",
            ]
        );
    }

    #[test]
    fn test_round_groups_resolve_before_square_groups() {
        assert_eq!(
            expand("[a|b] (c|d)", &no_vars()),
            vec![" d", "b d", "a d", " c", "b c", "a c"]
        );
    }

    #[test]
    fn test_nested_groups_may_duplicate() {
        assert_eq!(
            expand("((a|b)|c) x", &no_vars()),
            vec!["c x", "b x", "c x", "a x"]
        );
    }

    #[test]
    fn test_variable_is_wrapped_and_split() {
        let vars = VariableStore::from_pairs([("name", "Bob|Sue")]);
        assert_eq!(expand("Hello $name", &vars), vec!["Hello Sue", "Hello Bob"]);
    }

    #[test]
    fn test_variable_lookup_ignores_case() {
        let vars = VariableStore::from_pairs([("name", "Bob")]);
        assert_eq!(expand("Hello $NAME", &vars), vec!["Hello Bob"]);
    }

    #[test]
    fn test_variable_with_slot_value() {
        let vars = VariableStore::from_pairs([("drink", "<drink~tea>|coffee")]);
        assert_eq!(
            expand("a cup of $drink", &vars),
            vec!["a cup of coffee", "a cup of <drink~tea>"]
        );
    }

    #[test]
    fn test_optional_variable_value_cannot_be_omitted() {
        // "([big|small])": the omission leaves "()", which is dropped
        let vars = VariableStore::from_pairs([("size", "[big|small]")]);
        assert_eq!(
            expand("a $size cup", &vars),
            vec!["a small cup", "a big cup"]
        );
    }

    #[test]
    fn test_undefined_variable_drops_branch_and_reports() {
        let observer = RecordingObserver::new();
        let vars = no_vars();
        let out = Expander::new(&vars)
            .with_observer(&observer)
            .expand("Hello $nobody");

        assert!(out.is_empty());
        assert_eq!(
            observer.warnings(),
            vec![
                ExpansionEvent::UndefinedVariable {
                    name: "nobody".to_string(),
                    fragment: "Hello $nobody".to_string(),
                },
                ExpansionEvent::Unrecognized {
                    fragment: "Hello ()".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_undefined_variable_strict() {
        let vars = no_vars();
        let expander = Expander::new(&vars)
            .with_options(ExpandOptions::default().with_strict_variables(true));
        let mut out = Vec::new();
        let err = expander
            .try_expand_into("(a|b) $missing", &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            ExpandError::UndefinedVariable { ref name, .. } if name == "missing"
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_adversarial_input_does_not_fail() {
        assert!(expand("open ( $missing", &no_vars()).is_empty());
        assert!(expand("café (a|b", &no_vars()).is_empty());
    }

    #[test]
    fn test_default_substitution_depth() {
        assert_eq!(
            ExpandOptions::default().max_substitution_depth,
            DEFAULT_MAX_SUBSTITUTION_DEPTH
        );
        assert_eq!(DEFAULT_MAX_SUBSTITUTION_DEPTH, 1_000);
    }

    #[test]
    fn test_ten_three_way_groups_expand_fully() {
        let template = (0..10)
            .map(|i| format!("(a{i}|b{i}|c{i})"))
            .collect::<Vec<_>>()
            .join(" ");
        let out = expand(&template, &no_vars());
        assert_eq!(out.len(), 59_049);
        assert_eq!(out[0], "c0 c1 c2 c3 c4 c5 c6 c7 c8 c9");
        assert_eq!(out[out.len() - 1], "a0 a1 a2 a3 a4 a5 a6 a7 a8 a9");
    }

    #[test]
    fn test_self_referential_variable_hits_limit() {
        let vars = VariableStore::from_pairs([("x", "again $x")]);
        let observer = RecordingObserver::new();
        let expander = Expander::new(&vars)
            .with_observer(&observer)
            .with_options(ExpandOptions::default().with_max_substitution_depth(25));

        let mut out = Vec::new();
        let err = expander.try_expand_into("say $x", &mut out).unwrap_err();
        assert!(matches!(
            err,
            ExpandError::SubstitutionDepthExceeded { limit: 25, .. }
        ));
        assert_eq!(
            observer.warnings(),
            vec![ExpansionEvent::LimitReached {
                limit: 25,
                template: "say $x".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_reference_at_default_depth() {
        let vars = VariableStore::from_pairs([("x", "again $x")]);
        let mut out = Vec::new();
        let err = Expander::new(&vars)
            .try_expand_into("say $x", &mut out)
            .unwrap_err();
        assert!(matches!(
            err,
            ExpandError::SubstitutionDepthExceeded { limit: 1_000, .. }
        ));
    }

    #[test]
    fn test_alternations_do_not_count_toward_depth() {
        let vars = VariableStore::from_pairs([("a", "x|y"), ("b", "z")]);
        let expander = Expander::new(&vars)
            .with_options(ExpandOptions::default().with_max_substitution_depth(2));
        let mut out = Vec::new();
        let appended = expander
            .try_expand_into("(p|q) [r|s] $a $b (t|u|v)", &mut out)
            .unwrap();
        assert_eq!(appended, 2 * 3 * 2 * 3);
    }

    #[test]
    fn test_limit_keeps_existing_output() {
        let vars = VariableStore::from_pairs([("x", "more $x")]);
        let expander = Expander::new(&vars)
            .with_options(ExpandOptions::default().with_max_substitution_depth(3));
        let mut out = vec!["existing".to_string()];
        let appended = expander.expand_into("c|b $x", &mut out);
        assert_eq!(appended, 0);
        assert_eq!(out, vec!["existing"]);
    }

    #[test]
    fn test_expand_into_appends() {
        let vars = no_vars();
        let expander = Expander::new(&vars);
        let mut out = vec!["existing".to_string()];
        let appended = expander.try_expand_into("a|b", &mut out).unwrap();
        assert_eq!(appended, 2);
        assert_eq!(out, vec!["existing", "b", "a"]);
    }

    #[test]
    fn test_synonym_line_passes_through() {
        assert_eq!(
            expand("cat ~ feline animal", &no_vars()),
            vec!["cat ~ feline animal"]
        );
    }

    #[test]
    fn test_case_folded_synonym_prefix_is_dropped() {
        assert!(expand("\u{212A}at ~ cat", &no_vars()).is_empty());
        assert_eq!(expand("Cat ~ feline", &no_vars()), vec!["Cat ~ feline"]);
    }

    #[test]
    fn test_events_follow_worklist() {
        let observer = RecordingObserver::new();
        let vars = no_vars();
        Expander::new(&vars)
            .with_observer(&observer)
            .expand("x (a|b)");
        assert_eq!(
            observer.into_events(),
            vec![
                ExpansionEvent::Rewrite {
                    rule: Rule::RoundAlt,
                    fragment: "x (a|b)".to_string(),
                    variants: 2,
                },
                ExpansionEvent::Emit {
                    rule: Rule::Vanilla,
                    sentence: "x b".to_string(),
                },
                ExpansionEvent::Emit {
                    rule: Rule::Vanilla,
                    sentence: "x a".to_string(),
                },
            ]
        );
    }
}
