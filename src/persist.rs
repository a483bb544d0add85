//! Save and resume growth progress as `<seed> <branches>`

use crate::error::PersistError;
use std::fs;
use std::path::{Path, PathBuf};

/// A seed plus how many branches of its tree had been shown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub seed: u64,
    pub branches: u32,
}

/// `$XDG_CACHE_HOME/termbonsai`, or `./termbonsai` without a cache dir
pub fn default_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("termbonsai")
}

pub fn load(path: &Path) -> Result<Progress, PersistError> {
    let content = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let malformed = || PersistError::Malformed {
        path: path.to_path_buf(),
    };

    let mut fields = content.split_whitespace();
    let seed = fields
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(malformed)?;
    let branches = fields
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(malformed)?;

    tracing::info!(?path, seed, branches, "loaded progress");
    Ok(Progress { seed, branches })
}

pub fn save(path: &Path, progress: &Progress) -> Result<(), PersistError> {
    let io_err = |source: std::io::Error| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, format!("{} {}\n", progress.seed, progress.branches)).map_err(io_err)?;

    tracing::info!(?path, seed = progress.seed, branches = progress.branches, "saved progress");
    Ok(())
}
