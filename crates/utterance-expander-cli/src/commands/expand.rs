/*
 * expand.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Expand command implementation
 */

//! Expand command implementation.
//!
//! Expands one template given on the command line and prints each sentence
//! on its own line, in expander order.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::debug;
use utterance_expander::{Expander, TracingObserver};

use super::{expand_options, load_variables};

/// Arguments for the expand command
#[derive(Debug)]
pub struct ExpandArgs {
    /// Template to expand
    pub template: String,
    /// KEY=VALUE assignments
    pub vars: Vec<String>,
    /// Variable file
    pub vars_file: Option<String>,
    /// Fail on undefined variables
    pub strict: bool,
    /// Substitution depth ceiling override
    pub max_substitution_depth: Option<usize>,
}

/// Execute the expand command
pub fn execute(args: ExpandArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&args, &mut out)
}

/// Expand `args.template` and write the sentences to `out`.
pub fn run(args: &ExpandArgs, out: &mut impl Write) -> Result<()> {
    let variables = load_variables(&args.vars, args.vars_file.as_deref())?;
    let observer = TracingObserver::new();
    let expander = Expander::new(&variables)
        .with_observer(&observer)
        .with_options(expand_options(args.strict, args.max_substitution_depth));

    let mut sentences = Vec::new();
    expander
        .try_expand_into(&args.template, &mut sentences)
        .with_context(|| format!("Failed to expand template: {}", args.template))?;
    debug!(count = sentences.len(), "Expanded template");

    for sentence in &sentences {
        writeln!(out, "{}", sentence)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(template: &str) -> ExpandArgs {
        ExpandArgs {
            template: template.to_string(),
            vars: Vec::new(),
            vars_file: None,
            strict: false,
            max_substitution_depth: None,
        }
    }

    fn run_to_string(args: &ExpandArgs) -> Result<String> {
        let mut buf = Vec::new();
        run(args, &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    #[test]
    fn test_prints_one_sentence_per_line() {
        let output = run_to_string(&args("x [a|b] y")).unwrap();
        assert_eq!(output, "x  y\nx b y\nx a y\n");
    }

    #[test]
    fn test_uses_assignments() {
        let mut a = args("Hello $name");
        a.vars = vec!["name=Bob|Sue".to_string()];
        assert_eq!(run_to_string(&a).unwrap(), "Hello Sue\nHello Bob\n");
    }

    #[test]
    fn test_strict_reports_undefined_variable() {
        let mut a = args("Hello $name");
        a.strict = true;
        let err = run_to_string(&a).unwrap_err();
        assert!(format!("{:#}", err).contains("Undefined variable '$name'"));
    }

    #[test]
    fn test_substitution_depth_ceiling() {
        let mut a = args("$x");
        a.vars = vec!["x=more $x".to_string()];
        a.max_substitution_depth = Some(10);
        let err = run_to_string(&a).unwrap_err();
        assert!(format!("{:#}", err).contains("exceeded 10 nested variable substitutions"));
    }
}
