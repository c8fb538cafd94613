use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    loader::{Dataset, DirectorySource, EmbeddedSnapshot},
    store::Store,
};

pub const DATA_DIR_ENV: &str = "RATHE_DATA_DIR";

/// Where the card snapshot is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataDir {
    Directory(PathBuf),
    Embedded,
}

impl DataDir {
    /// Resolve the snapshot location from, in order of priority:
    /// 1. An explicit path (from --data-dir)
    /// 2. The RATHE_DATA_DIR environment variable
    /// 3. The XDG data directory (~/.local/share/rathe/english/), if it
    ///    holds a snapshot
    /// 4. The snapshot embedded in the binary
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let xdg = xdg::BaseDirectories::with_prefix("rathe")
            .get_data_home()
            .map(|home| home.join("english"));

        Self::resolve_from(explicit, from_env, xdg)
    }

    fn resolve_from(
        explicit: Option<&Path>,
        from_env: Option<PathBuf>,
        xdg: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(root) = explicit.map(Path::to_path_buf).or(from_env) {
            if !root.is_dir() {
                return Err(Error::DataDir(root));
            }
            return Ok(DataDir::Directory(root));
        }

        match xdg {
            Some(root) if root.join(Dataset::Cards.file_name()).is_file() => {
                Ok(DataDir::Directory(root))
            }
            _ => Ok(DataDir::Embedded),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataDir::Directory(root) => root.display().to_string(),
            DataDir::Embedded => "embedded snapshot".to_string(),
        }
    }

    /// Load and index the snapshot.
    pub fn open_store(&self) -> Result<Store> {
        match self {
            DataDir::Directory(root) => {
                Store::open(&DirectorySource::new(root))
            }
            DataDir::Embedded => Store::open(&EmbeddedSnapshot),
        }
    }
}
