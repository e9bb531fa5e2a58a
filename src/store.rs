//! Persisted set of every listing ever seen, keyed by listing id.

use crate::error::StorageError;
use crate::models::Listing;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

pub struct BoatStore {
    path: PathBuf,
    boats: HashMap<String, Listing>,
}

impl BoatStore {
    /// Load the store at `path`. A missing file is an empty store.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let boats = match fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No existing store, starting empty");
                HashMap::new()
            }
            Err(source) => return Err(StorageError::Read { path, source }),
        };

        Ok(Self { path, boats })
    }

    /// Insert `listing` unless its id is already stored. Returns whether it was inserted.
    pub fn upsert_if_absent(&mut self, listing: Listing) -> bool {
        use std::collections::hash_map::Entry;

        match self.boats.entry(listing.id.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(listing);
                true
            }
        }
    }

    /// Write the whole store through a temp file and rename over the old one
    pub async fn save(&self) -> Result<(), StorageError> {
        // BTreeMap keeps the file in id order between runs
        let ordered: BTreeMap<&str, &Listing> =
            self.boats.iter().map(|(id, boat)| (id.as_str(), boat)).collect();
        let json = serde_json::to_string_pretty(&ordered).map_err(StorageError::Encode)?;

        write_atomic(&self.path, json.as_bytes())
            .await
            .map_err(|source| StorageError::Write {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), boats = self.boats.len(), "Saved store");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.boats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boats.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.boats.get(id)
    }

    pub fn known_ids(&self) -> HashSet<String> {
        self.boats.keys().cloned().collect()
    }

    pub fn listings(&self) -> impl Iterator<Item = &Listing> {
        self.boats.values()
    }
}

/// Write `contents` next to `path` first, then rename into place
pub(crate) async fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, contents).await?;
    fs::rename(&tmp, path).await
}
