// Alias map persistence: one JSON file holding every league's alias map,
// keyed by league id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use leaguebook_core::identity::AliasMap;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("alias store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("alias store {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// File-backed collection of alias maps.
///
/// Edits replace a league's whole map; nothing reaches disk until
/// [`AliasStore::save`] is called.
#[derive(Debug, Clone)]
pub struct AliasStore {
    path: PathBuf,
    leagues: BTreeMap<String, AliasMap>,
}

impl AliasStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let leagues = match std::fs::read_to_string(path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|e| StoreError::Json {
                path: path.to_path_buf(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("alias store {} does not exist yet", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        Ok(AliasStore {
            path: path.to_path_buf(),
            leagues,
        })
    }

    /// The alias map for a league, empty if none has been stored.
    ///
    /// Stored maps are returned as written. Maps saved by older versions may
    /// still contain chains; `AliasMap::canonicalize` walks them.
    pub fn get(&self, league_id: &str) -> AliasMap {
        self.leagues.get(league_id).cloned().unwrap_or_default()
    }

    /// Replace a league's alias map. The map is flattened before storing.
    pub fn set(&mut self, league_id: &str, map: &AliasMap) {
        let flat = map.flatten();
        if flat.is_empty() {
            self.leagues.remove(league_id);
        } else {
            self.leagues.insert(league_id.to_string(), flat);
        }
    }

    /// Write the store to disk, creating the parent directory if needed.
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(&self.leagues).map_err(|e| StoreError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        std::fs::write(&self.path, json + "\n").map_err(io_err)?;

        info!(
            "Saved alias maps for {} league(s) to {}",
            self.leagues.len(),
            self.path.display()
        );
        Ok(())
    }
}
