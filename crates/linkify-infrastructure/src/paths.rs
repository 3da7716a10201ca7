//! Unified path management for companion data files.
//!
//! All durable state lives under one data directory: `LINKIFY_DATA_DIR`
//! when set, `~/.linkify` otherwise.

use std::path::{Path, PathBuf};

use linkify_core::error::{LinkifyError, Result};

/// Resolves the locations of durable companion state.
///
/// # Directory Structure
///
/// ```text
/// ~/.linkify/
/// └── auth_token        # the single persisted credential key
/// ```
#[derive(Debug, Clone)]
pub struct LinkifyPaths {
    base_dir: PathBuf,
}

impl LinkifyPaths {
    /// Creates a path resolver over an explicit base directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Resolves the data directory: the override when given, `~/.linkify`
    /// otherwise.
    pub fn resolve(data_dir: Option<PathBuf>) -> Result<Self> {
        if let Some(dir) = data_dir {
            return Ok(Self::new(dir));
        }
        let home_dir = dirs::home_dir()
            .ok_or_else(|| LinkifyError::config("Cannot find home directory"))?;
        Ok(Self::new(home_dir.join(".linkify")))
    }

    /// The data directory itself.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the persisted credential token.
    pub fn token_file(&self) -> PathBuf {
        self.base_dir.join("auth_token")
    }
}
