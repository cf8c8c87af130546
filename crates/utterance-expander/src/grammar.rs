/*
 * grammar.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template grammar matcher.
//!
//! A template string is classified into exactly one [`Rule`] by trying a fixed,
//! ordered list of patterns and stopping at the first that matches. Priority is
//! first-match-wins, not longest or most specific match:
//!
//! 1. [`Rule::Vanilla`]: the whole string is literal text and slots
//! 2. [`Rule::VariableRef`]: a `$name` reference anywhere
//! 3. [`Rule::RoundAlt`]: a `(a|b)` group anywhere
//! 4. [`Rule::BracketOpt`]: a `[a|b]` optional group anywhere
//! 5. [`Rule::BareAlt`]: the whole string is `a|b` with no brackets
//! 6. [`Rule::SynonymLine`]: `prefix ~ rest`
//! 7. [`Rule::Unrecognized`]: nothing matched
//!
//! For rules 2 to 4 only the left-most occurrence is reported. The expander
//! re-classifies each rewritten string, so remaining occurrences are handled on
//! later passes.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

/// Plain text run: letters, digits, spaces, apostrophes, hyphens.
const TEXT: &str = "[a-zA-Z0-9 '-]+";

/// Identifier used by slot and variable names.
const IDENTIFIER: &str = "[a-zA-Z_][a-zA-Z0-9_-]*";

/// `<name>` or `<name~example text>`.
static SLOT_SOURCE: LazyLock<String> =
    LazyLock::new(|| format!("<(({IDENTIFIER})(~{TEXT})?)>"));

/// One or more plain characters or slots.
static VANILLA_SOURCE: LazyLock<String> =
    LazyLock::new(|| format!("([a-zA-Z0-9 '-]|({}))+", *SLOT_SOURCE));

/// Same as [`VANILLA_SOURCE`], but the `|` separator is also allowed.
static VANILLA_WITH_BAR_SOURCE: LazyLock<String> =
    LazyLock::new(|| format!("([a-zA-Z0-9 '|-]|({}))+", *SLOT_SOURCE));

/// Compiled slot pattern, shared with slot extraction.
pub(crate) static SLOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&SLOT_SOURCE).expect("Invalid regex pattern for slot"));

static ALL_VANILLA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^({})$", *VANILLA_SOURCE)).expect("Invalid regex pattern for vanilla text")
});

static VARIABLE_USAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\$({IDENTIFIER})")).expect("Invalid regex pattern for variable usage")
});

static ROUND_ALTERNATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\(({})\)", *VANILLA_WITH_BAR_SOURCE))
        .expect("Invalid regex pattern for round alternation")
});

static SQUARE_OPTIONAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\[({})\]", *VANILLA_WITH_BAR_SOURCE))
        .expect("Invalid regex pattern for optional alternation")
});

static BARE_ALTERNATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^({})$", *VANILLA_WITH_BAR_SOURCE))
        .expect("Invalid regex pattern for bare alternation")
});

static SYNONYM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    // ASCII-only letters: Unicode case folding would admit e.g. KELVIN SIGN
    Regex::new(r"^([a-zA-Z0-9 _'-]+)\s*~\s*(.*)$").expect("Invalid regex pattern for synonym line")
});

/// The rewrite rule that applies to a template string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Entire string is literal text and slots. Emitted as-is.
    Vanilla,
    /// Contains `$name`. Replaced by the variable's value in parentheses.
    VariableRef,
    /// Contains `(a|b)`. One rewrite per alternative.
    RoundAlt,
    /// Contains `[a|b]`. One rewrite per alternative, plus one with the span removed.
    BracketOpt,
    /// Entire string is `a|b` with no brackets. One rewrite per alternative.
    BareAlt,
    /// `prefix ~ rest` entity-synonym declaration. Emitted as-is.
    SynonymLine,
    /// Matched nothing. Dropped.
    Unrecognized,
}

/// What the expander does with a string classified under a [`Rule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Append the string to the output.
    Emit,
    /// Push rewritten variants back on the worklist.
    Rewrite,
    /// Discard the string.
    Drop,
}

impl Rule {
    pub fn disposition(&self) -> Disposition {
        match self {
            Rule::Vanilla | Rule::SynonymLine => Disposition::Emit,
            Rule::VariableRef | Rule::RoundAlt | Rule::BracketOpt | Rule::BareAlt => {
                Disposition::Rewrite
            }
            Rule::Unrecognized => Disposition::Drop,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::Vanilla => "vanilla",
            Rule::VariableRef => "variable",
            Rule::RoundAlt => "round-alternation",
            Rule::BracketOpt => "optional",
            Rule::BareAlt => "bare-alternation",
            Rule::SynonymLine => "synonym",
            Rule::Unrecognized => "unrecognized",
        }
    }
}

/// Result of classifying one template string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'s> {
    /// The first rule that matched.
    pub rule: Rule,

    /// Byte span of the matched construct, including any `$` or brackets.
    ///
    /// Whole-line rules span the entire string.
    pub span: Range<usize>,

    /// The useful content of the match: the variable name for
    /// [`Rule::VariableRef`], the `|`-joined body for alternations, and the whole
    /// string otherwise.
    pub body: &'s str,
}

impl<'s> Classification<'s> {
    fn whole(rule: Rule, sentence: &'s str) -> Self {
        Self {
            rule,
            span: 0..sentence.len(),
            body: sentence,
        }
    }

    /// Split the body on `|`.
    ///
    /// A body without a separator yields itself as the single alternative.
    pub fn alternatives(&self) -> std::str::Split<'s, char> {
        self.body.split('|')
    }
}

/// Classify a template string by the first rule that matches it.
pub fn classify(sentence: &str) -> Classification<'_> {
    if ALL_VANILLA.is_match(sentence) {
        return Classification::whole(Rule::Vanilla, sentence);
    }

    for (rule, pattern) in [
        (Rule::VariableRef, &*VARIABLE_USAGE),
        (Rule::RoundAlt, &*ROUND_ALTERNATION),
        (Rule::BracketOpt, &*SQUARE_OPTIONAL),
        (Rule::BareAlt, &*BARE_ALTERNATION),
    ] {
        if let Some(caps) = pattern.captures(sentence) {
            // Group 0 always participates; group 1 is the body in every pattern above
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            return Classification {
                rule,
                span: whole.range(),
                body: &sentence[body.range()],
            };
        }
    }

    if SYNONYM_LINE.is_match(sentence) {
        return Classification::whole(Rule::SynonymLine, sentence);
    }

    Classification::whole(Rule::Unrecognized, sentence)
}
