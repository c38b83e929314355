use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level (defaults to the configured level)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Read configuration from this file instead of ~/.feeder/config.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for query and check results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned human-readable table
    #[default]
    Plain,
    /// JSON document
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a model and write it back out
    Roundtrip {
        /// Model file to read
        input: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply named transforms and write a signed model
    Transform {
        /// Source model; omit to start from an empty document
        input: Option<PathBuf>,
        /// Destination model (required unless --list)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Transform invocation such as "set class=recorder interval=120" (repeatable)
        #[arg(short, long = "transform", value_name = "INVOCATION")]
        transforms: Vec<String>,
        /// Do not insert the signature block
        #[arg(long)]
        no_sign: bool,
        /// List the available transforms and exit
        #[arg(long)]
        list: bool,
    },
    /// Find objects whose property equals a value
    Find {
        input: PathBuf,
        #[arg(long)]
        property: String,
        #[arg(long)]
        value: String,
        /// Fail unless exactly this many objects match
        #[arg(long)]
        count: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Show the objects feeding a named object
    Upstream {
        input: PathBuf,
        /// Name of the object to start from
        #[arg(long)]
        name: String,
        /// Accept more than one upstream object
        #[arg(long)]
        all: bool,
        /// Walk upstream until an object of this class is reached
        #[arg(long)]
        class: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Show the objects fed by a named object
    Downstream {
        input: PathBuf,
        /// Name of the object to start from
        #[arg(long)]
        name: String,
        /// Search downstream for the nearest objects of this class
        #[arg(long)]
        class: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Report dangling references, duplicate names and missing properties
    Check {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Topology statistics
    Graph {
        input: PathBuf,
        /// Also write a Graphviz rendering here
        #[arg(long)]
        dot: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
}
