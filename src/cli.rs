//! Command-line interface for cartconf.
//!
//! Every command opens the config storage, runs the normal initialization
//! (writing defaults on first use) and then acts on the loaded settings.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use cartconf_cart::Cartridge;
use cartconf_config::{
    CONFIG_FILE_NAME, ConfigManager, ConfigWatcher, DirFs, SaveOutcome, Settings,
};
use cartconf_scripting::LuaEngine;
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use crate::host::CliHost;

/// Manager type driven by the CLI.
pub type CliManager = ConfigManager<LuaEngine, DirFs, CliHost>;

/// cartconf - script-driven configuration for cartridge consoles
#[derive(Parser, Debug)]
#[command(name = "cartconf")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Storage root holding config.tic (default: $CARTCONF_DIR or the user config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Debug log level written to the debug log file
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the effective settings (default command)
    Show {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Restore the baseline config and overwrite the stored cartridge
    Reset,
    /// Adopt a cartridge (or a plain .lua script) as the config
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write the current config cartridge (or its script, for .lua) to a file
    Export {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print the path of the stored config cartridge
    Path,
    /// Reload and print settings whenever the stored cartridge changes
    Watch {
        /// Debounce window for file events
        #[arg(long, value_name = "MS", default_value_t = 100)]
        debounce_ms: u64,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    /// Level requested with `--log-level`, if any.
    pub fn log_filter(&self) -> Option<LevelFilter> {
        self.log_level.map(LevelFilter::from)
    }

    pub fn storage(&self) -> DirFs {
        match &self.root {
            Some(root) => DirFs::new(root),
            None => DirFs::default(),
        }
    }
}

/// Open and initialize the config stored in `fs`.
pub fn open_manager(fs: DirFs) -> CliManager {
    let mut manager = ConfigManager::new(LuaEngine::new(), fs, CliHost::default());
    manager.initialize();
    manager
}

/// Render settings in the requested format.
pub fn render_settings(settings: &Settings, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(settings).context("Failed to serialize settings")?
        }
        OutputFormat::Yaml => {
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings")?
        }
    };
    Ok(text)
}

fn is_script(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("lua"))
}

/// Read a cartridge from `path`; `.lua` files are wrapped as a code-only cartridge.
pub fn read_cartridge(path: &Path) -> Result<Cartridge> {
    if is_script(path) {
        let code = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        return Ok(Cartridge::with_code(code));
    }

    let bytes =
        fs::read(path).with_context(|| format!("Failed to read cartridge {}", path.display()))?;
    Cartridge::load(&bytes).with_context(|| format!("Invalid cartridge {}", path.display()))
}

/// Write `cart` to `path`; `.lua` files receive only the script text.
pub fn write_cartridge(cart: &Cartridge, path: &Path) -> Result<()> {
    let bytes = if is_script(path) {
        cart.code.clone().into_bytes()
    } else {
        cart.try_save()?
    };
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

/// Run a single command, writing user-facing output to `out`.
///
/// `watch` never returns unless the watcher fails.
pub fn run_command(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let fs = cli.storage();
    let command = cli.command.clone().unwrap_or(Commands::Show {
        format: OutputFormat::Json,
    });

    match command {
        Commands::Path => {
            writeln!(out, "{}", fs.path_of(CONFIG_FILE_NAME)?.display())?;
        }
        Commands::Show { format } => {
            let manager = open_manager(fs);
            writeln!(out, "{}", render_settings(manager.settings(), format)?)?;
        }
        Commands::Reset => {
            let mut manager = open_manager(fs);
            let outcome = manager.reset()?;
            report_save(out, outcome)?;
        }
        Commands::Import { file } => {
            let cart = read_cartridge(&file)?;
            let mut manager = open_manager(fs);
            let outcome = manager.persist_current_host_cartridge(&cart)?;
            report_save(out, outcome)?;
        }
        Commands::Export { file } => {
            let manager = open_manager(fs);
            write_cartridge(manager.cartridge(), &file)?;
            writeln!(out, "Exported config to {}", file.display())?;
        }
        Commands::Watch { debounce_ms } => {
            let mut manager = open_manager(fs);
            watch(&mut manager, debounce_ms, out)?;
        }
    }

    Ok(())
}

fn report_save(out: &mut impl Write, outcome: SaveOutcome) -> Result<()> {
    match outcome {
        SaveOutcome::Written => writeln!(out, "Config saved")?,
        SaveOutcome::Skipped => writeln!(out, "Config already present, left unchanged")?,
    }
    Ok(())
}

fn watch(manager: &mut CliManager, debounce_ms: u64, out: &mut impl Write) -> Result<()> {
    let watcher = ConfigWatcher::for_storage(manager.fs(), debounce_ms)?;
    writeln!(
        out,
        "Watching {} (Ctrl+C to stop)",
        manager.fs().root().join(CONFIG_FILE_NAME).display()
    )?;
    writeln!(out, "{}", render_settings(manager.settings(), OutputFormat::Json)?)?;

    loop {
        let Some(event) = watcher.recv_timeout(Duration::from_secs(1)) else {
            continue;
        };
        log::debug!("Reloading after change to {}", event.path.display());
        match manager.reload_from_storage() {
            Ok(true) => {
                writeln!(out, "{}", render_settings(manager.settings(), OutputFormat::Json)?)?;
                out.flush()?;
            }
            Ok(false) => log::warn!("Config file missing or empty; keeping current settings"),
            Err(e) => log::error!("Failed to reload config: {e}"),
        }
    }
}
