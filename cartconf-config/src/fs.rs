//! Root-relative file storage for the config cartridge.
//!
//! [`RootFs`] is the storage collaborator the lifecycle manager writes
//! through. [`DirFs`] is the directory-backed implementation:
//! - default root `$CARTCONF_DIR`, else `~/.config/cartconf` (XDG convention;
//!   the platform config dir on Windows)
//! - atomic saves (temp file + rename), creating the root on demand
//! - names restricted to plain file names so nothing escapes the root

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable overriding the default storage root.
pub const ROOT_ENV_VAR: &str = "CARTCONF_DIR";

/// What a save actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// `overwrite` was false and the file already existed.
    Skipped,
}

/// Storage addressed by file name relative to a fixed root.
pub trait RootFs {
    /// Read a file. `Ok(None)` means it does not exist.
    fn load_root(&self, name: &str) -> Result<Option<Vec<u8>>, ConfigError>;

    /// Write a file, replacing an existing one only when `overwrite` is set.
    fn save_root(&self, name: &str, bytes: &[u8], overwrite: bool)
    -> Result<SaveOutcome, ConfigError>;
}

/// [`RootFs`] backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirFs {
    root: PathBuf,
}

impl Default for DirFs {
    fn default() -> Self {
        Self::new(Self::default_root())
    }
}

impl DirFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default storage root.
    pub fn default_root() -> PathBuf {
        if let Ok(dir) = std::env::var(ROOT_ENV_VAR)
            && !dir.trim().is_empty()
        {
            return PathBuf::from(dir);
        }

        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("cartconf")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("cartconf")
            } else {
                PathBuf::from(".")
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of `name` under the root.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidName`] unless `name` is a single normal
    /// path component.
    pub fn path_of(&self, name: &str) -> Result<PathBuf, ConfigError> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.root.join(name)),
            _ => Err(ConfigError::InvalidName(name.to_string())),
        }
    }
}

impl RootFs for DirFs {
    fn load_root(&self, name: &str) -> Result<Option<Vec<u8>>, ConfigError> {
        let path = self.path_of(name)?;
        match fs::read(&path) {
            Ok(bytes) => {
                log::debug!("Read {} bytes from {}", bytes.len(), path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::io(path, e)),
        }
    }

    fn save_root(
        &self,
        name: &str,
        bytes: &[u8],
        overwrite: bool,
    ) -> Result<SaveOutcome, ConfigError> {
        let path = self.path_of(name)?;

        if !overwrite && path.exists() {
            log::debug!("Not overwriting existing {}", path.display());
            return Ok(SaveOutcome::Skipped);
        }

        fs::create_dir_all(&self.root).map_err(|e| ConfigError::io(&self.root, e))?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, bytes).map_err(|e| ConfigError::io(&temp_path, e))?;
        fs::rename(&temp_path, &path).map_err(|e| ConfigError::io(&path, e))?;

        log::debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(SaveOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().expect("temp dir");
        let fs = DirFs::new(dir.path());
        assert!(fs.load_root("config.tic").expect("load").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().expect("temp dir");
        let fs = DirFs::new(dir.path().join("nested"));
        assert_eq!(
            fs.save_root("config.tic", b"abc", false).expect("save"),
            SaveOutcome::Written
        );
        assert_eq!(
            fs.load_root("config.tic").expect("load").as_deref(),
            Some(&b"abc"[..])
        );
        assert!(!dir.path().join("nested").join("config.tmp").exists());
    }

    #[test]
    fn test_no_overwrite_skips_existing() {
        let dir = TempDir::new().expect("temp dir");
        let fs = DirFs::new(dir.path());
        fs.save_root("config.tic", b"first", true).expect("save");
        assert_eq!(
            fs.save_root("config.tic", b"second", false).expect("save"),
            SaveOutcome::Skipped
        );
        assert_eq!(
            fs.load_root("config.tic").expect("load").as_deref(),
            Some(&b"first"[..])
        );
        fs.save_root("config.tic", b"third", true).expect("save");
        assert_eq!(
            fs.load_root("config.tic").expect("load").as_deref(),
            Some(&b"third"[..])
        );
    }

    #[test]
    fn test_rejects_names_outside_root() {
        let dir = TempDir::new().expect("temp dir");
        let fs = DirFs::new(dir.path());
        for name in ["../escape.tic", "a/b.tic", "/etc/passwd", "", ".."] {
            assert!(
                matches!(fs.path_of(name), Err(ConfigError::InvalidName(_))),
                "{name:?} should be rejected"
            );
        }
    }
}
