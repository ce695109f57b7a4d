use anyhow::Result;
use cartconf::cli::{self, Cli};
use clap::Parser;

fn main() -> Result<()> {
    // Parse first so --help/--version output stays clean
    let cli = Cli::parse();

    // Routes all log::*!() calls to the debug log file. --log-level takes
    // precedence over DEBUG_LEVEL; RUST_LOG mirrors to stderr.
    cartconf::debug::init_log_bridge(cli.log_filter());

    log::info!("Starting cartconf {}", cartconf::VERSION);

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = cli::run_command(&cli, &mut stdout) {
        log::error!("Command failed: {e:#}");
        eprintln!("cartconf: error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
