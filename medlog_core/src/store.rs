//! Snapshot loading from the record store.
//!
//! Each collection is a JSON array in its own file under the data directory,
//! named after the collection key (`patients`, `medications`, `logs`). The
//! engine only reads; writers are external.

use crate::{Result, Snapshot};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const PATIENTS_KEY: &str = "patients";
pub const MEDICATIONS_KEY: &str = "medications";
pub const LOGS_KEY: &str = "logs";

/// Path of the file backing collection `key`
pub fn collection_path(data_dir: &Path, key: &str) -> PathBuf {
    data_dir.join(format!("{}.json", key))
}

/// Load one collection with shared locking
///
/// Returns an empty collection if the file doesn't exist.
/// If the file can't be read or parsed, logs a warning and returns empty.
pub fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        tracing::info!("No collection file at {:?}, treating as empty", path);
        return Ok(Vec::new());
    }

    let file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!("Unable to open {:?}: {}. Treating as empty.", path, e);
            return Ok(Vec::new());
        }
    };

    if let Err(e) = file.lock_shared() {
        tracing::warn!("Unable to lock {:?}: {}. Treating as empty.", path, e);
        return Ok(Vec::new());
    }

    let mut contents = String::new();
    let mut reader = std::io::BufReader::new(&file);
    if let Err(e) = reader.read_to_string(&mut contents) {
        let _ = file.unlock();
        tracing::warn!("Failed to read {:?}: {}. Treating as empty.", path, e);
        return Ok(Vec::new());
    }

    file.unlock()?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Vec<T>>(&contents) {
        Ok(records) => {
            tracing::debug!("Loaded {} records from {:?}", records.len(), path);
            Ok(records)
        }
        Err(e) => {
            tracing::warn!("Failed to parse {:?}: {}. Treating as empty.", path, e);
            Ok(Vec::new())
        }
    }
}

impl Snapshot {
    /// Load all three collections from `data_dir`
    pub fn load(data_dir: &Path) -> Result<Self> {
        let snapshot = Snapshot {
            patients: load_collection(&collection_path(data_dir, PATIENTS_KEY))?,
            medications: load_collection(&collection_path(data_dir, MEDICATIONS_KEY))?,
            logs: load_collection(&collection_path(data_dir, LOGS_KEY))?,
        };

        tracing::info!(
            "Loaded snapshot from {:?}: {} patients, {} medications, {} logs",
            data_dir,
            snapshot.patients.len(),
            snapshot.medications.len(),
            snapshot.logs.len()
        );
        Ok(snapshot)
    }
}
