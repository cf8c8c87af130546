/*
 * corpus.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Corpus command implementation
 */

//! Corpus command implementation.
//!
//! Loads a corpus file, expands every intent, reports slot references an
//! intent does not define, and prints the result as text or JSON.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use utterance_expander::{Corpus, ExpandedIntent, TracingObserver};

use super::{OutputFormat, expand_options, load_variables};

/// Arguments for the corpus command
#[derive(Debug)]
pub struct CorpusArgs {
    /// Corpus file
    pub input: String,
    /// Output format
    pub format: OutputFormat,
    /// KEY=VALUE overrides
    pub vars: Vec<String>,
    /// Fail on undefined variables
    pub strict: bool,
    /// Substitution depth ceiling override
    pub max_substitution_depth: Option<usize>,
    /// Fail when a sentence uses an undefined slot
    pub deny_undefined_slots: bool,
}

/// Execute the corpus command
pub fn execute(args: CorpusArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out)
}

/// Expand the corpus named by `args.input` and write it to `out`.
pub fn run(args: &CorpusArgs, out: &mut impl Write) -> Result<()> {
    let input_path = PathBuf::from(&args.input);
    if !input_path.exists() {
        anyhow::bail!("Input path does not exist: {}", input_path.display());
    }

    let overrides = load_variables(&args.vars, None)?;
    let corpus = Corpus::from_path(&input_path)
        .with_context(|| format!("Failed to load corpus: {}", input_path.display()))?
        .with_variables(overrides);

    let observer = TracingObserver::new();
    let expanded = corpus
        .expand(expand_options(args.strict, args.max_substitution_depth), &observer)
        .with_context(|| format!("Failed to expand corpus: {}", input_path.display()))?;

    let undefined = report_undefined_slots(&expanded);
    if undefined > 0 && args.deny_undefined_slots {
        anyhow::bail!("{} reference(s) to undefined slots", undefined);
    }

    match args.format {
        OutputFormat::Text => write_text(&expanded, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &expanded)?;
            writeln!(out)?;
        }
    }

    info!(
        intents = expanded.len(),
        sentences = expanded.iter().map(|i| i.sentences.len()).sum::<usize>(),
        "Expanded corpus"
    );
    Ok(())
}

/// Warn about each undefined slot reference and return how many there were.
fn report_undefined_slots(expanded: &[ExpandedIntent]) -> usize {
    let mut count = 0;
    for intent in expanded {
        for undefined in &intent.undefined_slots {
            warn!(
                intent = %intent.name,
                slot = %undefined.slot.name,
                sentence = %undefined.sentence,
                "Undefined slot referenced"
            );
            count += 1;
        }
    }
    count
}

fn write_text(expanded: &[ExpandedIntent], out: &mut impl Write) -> Result<()> {
    for (index, intent) in expanded.iter().enumerate() {
        if index > 0 {
            writeln!(out)?;
        }
        writeln!(out, "# {}", intent.name)?;
        for sentence in &intent.sentences {
            writeln!(out, "{}", sentence)?;
        }
    }
    Ok(())
}
