//! Utterance expander CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "utterance-expander")]
#[command(version)]
#[command(about = "Expand sentence templates into every utterance they denote", long_about = None)]
struct Cli {
    /// Log every rewrite step (trace level) unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a single template and print one sentence per line
    Expand {
        /// Template to expand
        template: String,

        /// Variable value (KEY=VALUE)
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// YAML or JSON file with variable values
        #[arg(long = "vars", value_name = "FILE")]
        vars_file: Option<String>,

        /// Fail on undefined variables instead of substituting empty text
        #[arg(long)]
        strict: bool,

        /// Maximum nested variable substitutions per branch
        #[arg(long)]
        max_substitution_depth: Option<usize>,
    },

    /// Expand every intent of a corpus file
    Corpus {
        /// Corpus file (.yaml, .yml or .json)
        input: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Extra variable value (KEY=VALUE), overriding the corpus
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,

        /// Fail on undefined variables instead of substituting empty text
        #[arg(long)]
        strict: bool,

        /// Maximum nested variable substitutions per branch
        #[arg(long)]
        max_substitution_depth: Option<usize>,

        /// Exit with an error if any sentence uses a slot its intent does not define
        #[arg(long)]
        deny_undefined_slots: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "utterance_expander=trace"
    } else {
        "utterance_expander=info"
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Expand {
            template,
            vars,
            vars_file,
            strict,
            max_substitution_depth,
        } => commands::expand::execute(commands::expand::ExpandArgs {
            template,
            vars,
            vars_file,
            strict,
            max_substitution_depth,
        }),
        Commands::Corpus {
            input,
            format,
            vars,
            strict,
            max_substitution_depth,
            deny_undefined_slots,
        } => commands::corpus::execute(commands::corpus::CorpusArgs {
            input,
            format,
            vars,
            strict,
            max_substitution_depth,
            deny_undefined_slots,
        }),
    }
}
