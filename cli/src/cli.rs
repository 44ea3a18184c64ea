use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Target {
    Rust,
    Typescript,
}

#[derive(Parser)]
#[clap(version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Lowers one or more schemas to generated Rust data-binding code
    Generate(GenerateArgs),
    /// Crawls a schema's imports/includes and writes the fetched sources plus a manifest
    Fetch(FetchArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Schema source files (`.xsd`, `.dtd`, `.rng`, `.rnc`)
    #[clap(required = true)]
    pub schemas: Vec<String>,

    /// Directory generated files are written into
    #[clap(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// The language emitted code targets
    #[clap(long, default_value = "rust", value_enum)]
    pub target: Target,

    /// Type-map override file (namespace `http://xb.dev/typemap`)
    #[clap(short = 't', long)]
    pub typemap: Option<PathBuf>,

    /// Explicit namespace mapping, repeatable: `-n <uri>=<namespace-path>`
    #[clap(short = 'n', long = "namespace", value_name = "URI=PATH")]
    pub namespaces: Vec<String>,

    /// Emit one file per schema instead of a paired declarations/functions split
    #[clap(long, conflicts_with = "file_per_type")]
    pub header_only: bool,

    /// Emit one file per generated type plus an umbrella module file
    #[clap(long, conflicts_with = "header_only")]
    pub file_per_type: bool,

    /// Print the filenames that would be generated, without writing anything
    #[clap(long)]
    pub list_outputs: bool,
}

#[derive(Args)]
pub struct FetchArgs {
    /// The schema URL (or local path) to start crawling from
    pub root_url: String,

    /// Directory fetched schema sources are written into
    #[clap(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Path the fetch manifest is written to
    #[clap(long, default_value = "manifest.json")]
    pub manifest: PathBuf,

    /// Abort on the first unreachable import instead of warning and continuing
    #[clap(long)]
    pub fail_fast: bool,
}
