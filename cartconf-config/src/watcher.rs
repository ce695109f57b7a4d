//! Config cartridge watcher for automatic reload.
//!
//! Watches the storage root for writes to the config cartridge and emits
//! [`ConfigReloadEvent`]s. Events are debounced on the trailing edge: one
//! reload event is sent once the file has been quiet for the debounce window,
//! so a truncate-then-write save produces a single event after the write.
//! The host answers them with
//! [`ConfigManager::reload_from_storage`](crate::ConfigManager::reload_from_storage).

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, Event, EventKind, PollWatcher, RecursiveMode, Watcher};

use crate::fs::DirFs;
use crate::manager::CONFIG_FILE_NAME;

/// Poll interval used when the native backend is unavailable.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The config cartridge changed on disk.
#[derive(Debug, Clone)]
pub struct ConfigReloadEvent {
    pub path: PathBuf,
}

pub struct ConfigWatcher {
    /// Kept alive to keep watching. Dropping it ends the debounce thread.
    _watcher: Box<dyn Watcher + Send>,
    events: Receiver<ConfigReloadEvent>,
}

impl std::fmt::Debug for ConfigWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatcher").finish_non_exhaustive()
    }
}

/// Forwards relevant file events to the debounce thread.
#[derive(Clone)]
struct EventFilter {
    file_name: OsString,
    raw: Sender<()>,
}

impl EventFilter {
    fn handle(&self, result: notify::Result<Event>) {
        let event = match result {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Config watcher error: {e}");
                return;
            }
        };

        // Create covers the rename at the end of an atomic save.
        if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
            return;
        }
        if !event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.file_name.as_os_str()))
        {
            return;
        }

        log::trace!("Config file event: {:?}", event.kind);
        let _ = self.raw.send(());
    }
}

/// Collapse bursts of raw signals into one event per quiet period.
///
/// Returns when either channel disconnects.
fn debounce(raw: Receiver<()>, tx: Sender<ConfigReloadEvent>, path: PathBuf, window: Duration) {
    while raw.recv().is_ok() {
        loop {
            match raw.recv_timeout(window) {
                Ok(()) => continue,
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        log::info!("Config cartridge changed: {}", path.display());
        if tx.send(ConfigReloadEvent { path: path.clone() }).is_err() {
            return;
        }
    }
}

impl ConfigWatcher {
    /// Watch the config cartridge inside a [`DirFs`] root.
    pub fn for_storage(fs: &DirFs, debounce_delay_ms: u64) -> Result<Self> {
        Self::new(&fs.root().join(CONFIG_FILE_NAME), debounce_delay_ms)
    }

    /// Watch `config_path`, which must already exist.
    ///
    /// Uses the platform's native watcher and falls back to polling every
    /// 500 ms when that backend cannot be started.
    pub fn new(config_path: &Path, debounce_delay_ms: u64) -> Result<Self> {
        Self::start(config_path, debounce_delay_ms, None)
    }

    /// Watch `config_path` by polling its contents every `interval`.
    pub fn polling(
        config_path: &Path,
        debounce_delay_ms: u64,
        interval: Duration,
    ) -> Result<Self> {
        Self::start(config_path, debounce_delay_ms, Some(interval))
    }

    fn start(config_path: &Path, debounce_delay_ms: u64, poll: Option<Duration>) -> Result<Self> {
        if !config_path.exists() {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }

        let canonical = config_path
            .canonicalize()
            .unwrap_or_else(|_| config_path.to_path_buf());
        let file_name = canonical
            .file_name()
            .context("Config path has no filename")?
            .to_os_string();
        let parent_dir = canonical
            .parent()
            .context("Config path has no parent directory")?
            .to_path_buf();

        let (raw_tx, raw_rx) = channel();
        let (tx, rx) = channel();
        let filter = EventFilter {
            file_name,
            raw: raw_tx,
        };

        let mut watcher = match poll {
            Some(interval) => Self::create_poll_watcher(filter, interval)?,
            None => Self::create_watcher(filter)?,
        };
        watcher
            .watch(&parent_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", parent_dir.display()))?;

        let path = canonical.clone();
        let window = Duration::from_millis(debounce_delay_ms);
        thread::Builder::new()
            .name("cartconf-config-watch".to_string())
            .spawn(move || debounce(raw_rx, tx, path, window))
            .context("Failed to start config debounce thread")?;

        log::info!("Config hot reload: watching {}", canonical.display());

        Ok(Self {
            _watcher: watcher,
            events: rx,
        })
    }

    fn create_watcher(filter: EventFilter) -> Result<Box<dyn Watcher + Send>> {
        let fallback = filter.clone();
        match notify::recommended_watcher(move |res: notify::Result<Event>| filter.handle(res)) {
            Ok(w) => {
                log::debug!("Config watcher: using native backend");
                Ok(Box::new(w))
            }
            Err(e) => {
                log::warn!("Config watcher: native backend unavailable ({e}); polling instead");
                Self::create_poll_watcher(fallback, POLL_INTERVAL)
            }
        }
    }

    fn create_poll_watcher(
        filter: EventFilter,
        interval: Duration,
    ) -> Result<Box<dyn Watcher + Send>> {
        let poll = PollWatcher::new(
            move |res: notify::Result<Event>| filter.handle(res),
            NotifyConfig::default()
                .with_poll_interval(interval)
                .with_compare_contents(true),
        )
        .context("Failed to create PollWatcher")?;
        Ok(Box::new(poll))
    }

    /// Next pending reload event, without blocking.
    pub fn try_recv(&self) -> Option<ConfigReloadEvent> {
        self.events.try_recv().ok()
    }

    /// Wait up to `timeout` for a reload event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<ConfigReloadEvent> {
        self.events.recv_timeout(timeout).ok()
    }
}
