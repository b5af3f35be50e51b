use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stubmerge")]
#[command(about = "Merge type annotations from stubs into Python sources", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Overlay the more informative annotations of ANNOTATIONS onto SOURCE
    Merge {
        /// Python source file or directory
        source: PathBuf,

        /// Annotation file or directory (stubs or a re-annotated copy)
        annotations: PathBuf,

        /// Output file, or output directory in directory mode (defaults to stdout).
        /// In directory mode sources without annotations are copied unchanged
        #[arg(short, long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Rewrite SOURCE in place
        #[arg(short, long)]
        in_place: bool,

        /// Placeholder type name; repeat to replace the configured set
        #[arg(long = "placeholder", value_name = "NAME")]
        placeholders: Vec<String>,

        /// Configuration file (defaults to the nearest .stubmerge.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// How to print the list of changed annotations
        #[arg(long, value_enum, default_value = "terminal")]
        report: ReportFormat,

        /// Write nothing; exit with an error if any annotation would change
        #[arg(long, conflicts_with_all = ["output", "in_place"])]
        check: bool,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum ReportFormat {
    /// One line per change on stderr
    Terminal,
    /// JSON document on stdout, or stderr when stdout carries the merged source
    Json,
    /// No report
    None,
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Merge { verbosity, .. } => *verbosity,
            Commands::Init { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_merge_with_placeholders() {
        let cli = Cli::try_parse_from([
            "stubmerge",
            "merge",
            "src/app.py",
            "stubs/app.pyi",
            "--placeholder",
            "Unknown",
            "--placeholder",
            "Any",
            "-vv",
        ])
        .unwrap();

        match cli.command {
            Commands::Merge {
                placeholders,
                verbosity,
                report,
                ..
            } => {
                assert_eq!(placeholders, vec!["Unknown", "Any"]);
                assert_eq!(verbosity, 2);
                assert_eq!(report, ReportFormat::Terminal);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_check_conflicts_with_in_place() {
        let result = Cli::try_parse_from(["stubmerge", "merge", "a.py", "a.pyi", "--check", "-i"]);
        assert!(result.is_err());
    }
}
