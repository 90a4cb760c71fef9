//! CLI state management.
//!
//! Persists the account store (sessions, credits, last route) to
//! `~/.futlink/accounts.json`.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use futlink_client::AccountStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persistent CLI state.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CliState {
    #[serde(default)]
    pub store: AccountStore,
}

impl CliState {
    /// Path to the state directory: `~/.futlink/`.
    pub fn state_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".futlink"))
    }

    /// Path to the state file: `~/.futlink/accounts.json`.
    pub fn state_path() -> Option<PathBuf> {
        Self::state_dir().map(|d| d.join("accounts.json"))
    }

    /// Load state from `path`. Returns default if the file doesn't exist or is invalid.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "ignoring unreadable state file");
            Self::default()
        })
    }

    /// Save state to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        let mut file = open_private(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Resolve the state file, preferring `explicit` over the default location.
    pub fn resolve_path(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(Self::state_path)
            .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))
    }
}

/// Open `path` for writing, readable by the owner only.
///
/// New files are created with mode 0600; an existing file is narrowed to
/// 0600 before anything is written to it.
#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}
