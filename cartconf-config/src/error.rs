//! Typed error variants for the cartconf-config crate.
//!
//! Extraction never produces an error (a broken script just leaves settings
//! unchanged). These cover the persistence side: reading and writing the
//! config cartridge through a [`RootFs`](crate::fs::RootFs).

use std::path::PathBuf;

use cartconf_cart::CartError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing a file under the storage root.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The owning cartridge could not be serialized.
    #[error("cartridge error: {0}")]
    Cart(#[from] CartError),

    /// A file name would resolve outside the storage root.
    #[error("invalid config file name {0:?}: must be a plain file name")]
    InvalidName(String),
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}
