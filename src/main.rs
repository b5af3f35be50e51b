use anyhow::Result;
use clap::Parser;
use stubmerge::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

// Main orchestrator function
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity());

    match cli.command {
        Commands::Init { force } => stubmerge::commands::init_config(force),
        command @ Commands::Merge { .. } => handle_merge_command(command),
    }
}

// Side effect function for logging setup (I/O at edges)
fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Pure function to map -v count to a filter directive
fn default_log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn handle_merge_command(command: Commands) -> Result<()> {
    let Commands::Merge {
        source,
        annotations,
        output,
        in_place,
        placeholders,
        config,
        report,
        check,
        verbosity: _,
    } = command
    else {
        anyhow::bail!("Invalid command");
    };

    let summary = stubmerge::commands::handle_merge(stubmerge::commands::MergeConfig {
        source,
        annotations,
        output,
        in_place,
        placeholders,
        config,
        report,
        check,
    })?;

    if check && !summary.is_unchanged() {
        anyhow::bail!(
            "{} annotation(s) would change",
            summary.changed_slots()
        );
    }
    Ok(())
}
