use std::path::PathBuf;

use clap::Parser;

/// Scrubs a source-code tree so it is safe to publish outside its original
/// environment: removes, replaces, or flags sensitive words, internal
/// usernames, author declarations, TODOs naming unknown people, and other
/// internal content, then emits a scrubbed output tree alongside originals,
/// a modified-only tree, unified diffs, and a human-readable findings
/// report.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The codebase directory to scrub.
    pub codebase: PathBuf,

    /// Apply changes in place to the source tree, in addition to writing
    /// the scratch-dir trees.
    #[arg(long)]
    pub modify: bool,

    /// Archive the `output/` tree to this path.
    #[arg(long = "output-tar", value_name = "PATH")]
    pub output_tar: Option<PathBuf>,

    /// Load the JSON configuration from this path.
    #[arg(long = "config-file", value_name = "PATH", conflicts_with = "config_data")]
    pub config_file: Option<PathBuf>,

    /// An inline JSON configuration string.
    #[arg(long = "config-data", value_name = "JSON", conflicts_with = "config_file")]
    pub config_data: Option<String>,

    /// A whitespace-separated list of input files (all under `codebase`) to
    /// scrub instead of the whole tree.
    #[arg(long = "explicit-inputfile-list", value_name = "FILES")]
    pub explicit_inputfile_list: Option<String>,

    /// Override the scratch/output root (defaults to a fresh temp dir).
    #[arg(long = "temp-dir", value_name = "PATH")]
    pub temp_dir: Option<PathBuf>,

    /// Emit a timing summary for each pipeline phase.
    #[arg(long)]
    pub stopwatch: bool,
}

/// Parses command-line arguments, returning a clap error on bad usage
/// instead of exiting directly: the caller maps that to exit code 3 per
/// spec.md §6, rather than clap's own default usage-error exit code.
pub fn try_parse_args() -> Result<Args, clap::Error> {
    Args::try_parse()
}
