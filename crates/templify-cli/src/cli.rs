//! Command-line argument definitions.

use std::path::PathBuf;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{Args, Parser, Subcommand, ValueEnum};
use templify::MissingKeyPolicy;

/// Render placeholders in text, data files and Jinja templates.
#[derive(Debug, Parser)]
#[command(name = "templify", version, about)]
pub struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace). Overridden by RUST_LOG.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render the placeholders in a template string.
    RenderText {
        /// Template text, e.g. "Hello {user.name}!"
        template: String,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Render every string in a JSON or YAML data file.
    RenderData {
        /// Data file (.json, .yaml or .yml)
        data: PathBuf,

        /// Output format for the rendered data
        #[arg(long, value_enum, default_value_t = DataFormat::Json)]
        format: DataFormat,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Render a Jinja template file.
    RenderJinja {
        /// Template file
        template: PathBuf,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Debug, Args)]
pub struct CommonArgs {
    /// Context file (.json, .yaml or .yml). Defaults to an empty context.
    #[arg(short, long)]
    pub context: Option<PathBuf>,

    /// How to handle placeholders missing from the context
    #[arg(
        short,
        long,
        value_parser = policy_parser(),
        default_value_t = MissingKeyPolicy::Keep
    )]
    pub missing: MissingKeyPolicy,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Parses `--missing` with the library's own names, listing them in `--help`.
fn policy_parser() -> impl TypedValueParser<Value = MissingKeyPolicy> {
    PossibleValuesParser::new(MissingKeyPolicy::ALL.map(|policy| policy.as_str()))
        .try_map(|name| name.parse::<MissingKeyPolicy>())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormat {
    Json,
    Yaml,
}
