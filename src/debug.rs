//! Debug logging bridge for cartconf.
//!
//! Routes every `log::*!` call from the workspace crates to a log file so
//! that command output on stdout stays clean:
//! - `/tmp/cartconf_debug.log` on Unix, `%TEMP%\cartconf_debug.log` on Windows
//! - level from `--log-level`, else `RUST_LOG`, else `DEBUG_LEVEL` (0 off,
//!   1 error, 2 info, 3 debug, 4 trace), else off
//! - when `RUST_LOG` is set, lines are mirrored to stderr as well

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;

/// Most verbose level named in a `RUST_LOG` filter such as
/// `warn,cartconf_config=debug`. Directives without a level are ignored.
fn level_from_rust_log(filter: &str) -> Option<LevelFilter> {
    filter
        .split(',')
        .filter_map(|directive| {
            let level = directive.rsplit('=').next().unwrap_or(directive).trim();
            level.parse::<LevelFilter>().ok()
        })
        .max()
}

fn level_from_debug_level() -> LevelFilter {
    match std::env::var("DEBUG_LEVEL") {
        Ok(val) => match val.trim().parse::<u8>() {
            Ok(1) => LevelFilter::Error,
            Ok(2) => LevelFilter::Info,
            Ok(3) => LevelFilter::Debug,
            Ok(4) => LevelFilter::Trace,
            _ => LevelFilter::Off,
        },
        Err(_) => LevelFilter::Off,
    }
}

/// Location of the debug log file.
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/cartconf_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("cartconf_debug.log")
    }
}

struct DebugLogger {
    level: LevelFilter,
    file: Mutex<Option<File>>,
    mirror_stderr: bool,
}

impl DebugLogger {
    fn new(level: LevelFilter) -> Self {
        let file = if level != LevelFilter::Off {
            // Silently run without a file if it can't be opened
            OpenOptions::new()
                .write(true)
                .truncate(true)
                .create(true)
                .open(log_path())
                .ok()
        } else {
            None
        };

        let logger = Self {
            level,
            file: Mutex::new(file),
            mirror_stderr: std::env::var_os("RUST_LOG").is_some(),
        };
        logger.write_line(&format!(
            "{}\ncartconf debug session started at {} (level={})\n{}",
            "=".repeat(80),
            timestamp(),
            level,
            "=".repeat(80)
        ));
        logger
    }

    fn write_line(&self, line: &str) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = writeln!(file, "{line}");
            let _ = file.flush();
        }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:<5}] [{}] {}",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        self.write_line(&line);
        if self.mirror_stderr {
            eprintln!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

/// Install the bridge as the global `log` backend.
///
/// `cli_level` wins over `RUST_LOG`, which wins over `DEBUG_LEVEL`. Calling
/// this more than once keeps the first logger.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let level = cli_level
        .or_else(|| {
            std::env::var("RUST_LOG")
                .ok()
                .and_then(|filter| level_from_rust_log(&filter))
        })
        .unwrap_or_else(level_from_debug_level);
    let logger = LOGGER.get_or_init(|| DebugLogger::new(level));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(logger.level);
    }
}
