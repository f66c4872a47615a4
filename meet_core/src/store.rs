//! Custom program-order persistence.
//!
//! The custom order is the only state the engine persists. It is read as a
//! whole and written as a full overwrite, keyed by event id. Callers must
//! not run two editors against the same event at once.

use crate::{Error, RaceKey, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key-value store for custom program orders
pub trait ProgramOrderStore {
    /// Saved order for an event, or None if the event uses the default order
    fn load(&self, event_id: &str) -> Result<Option<Vec<RaceKey>>>;

    /// Replace the saved order for an event
    fn save(&mut self, event_id: &str, order: &[RaceKey]) -> Result<()>;

    /// Forget the saved order, reverting the event to the default order
    fn clear(&mut self, event_id: &str) -> Result<()>;
}

/// In-memory store, mainly for tests and one-shot runs
#[derive(Clone, Debug, Default)]
pub struct MemoryOrderStore {
    orders: HashMap<String, Vec<RaceKey>>,
}

impl ProgramOrderStore for MemoryOrderStore {
    fn load(&self, event_id: &str) -> Result<Option<Vec<RaceKey>>> {
        Ok(self.orders.get(event_id).cloned())
    }

    fn save(&mut self, event_id: &str, order: &[RaceKey]) -> Result<()> {
        self.orders.insert(event_id.to_string(), order.to_vec());
        Ok(())
    }

    fn clear(&mut self, event_id: &str) -> Result<()> {
        self.orders.remove(event_id);
        Ok(())
    }
}

/// On-disk format of a saved order
#[derive(Debug, Serialize, Deserialize)]
struct StoredOrder {
    event_id: String,
    races: Vec<RaceKey>,
}

/// Directory-backed store: one JSON file per event
pub struct JsonOrderStore {
    dir: PathBuf,
}

impl JsonOrderStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the order for an event
    ///
    /// ASCII letters, digits and `-` are kept; every other byte is written
    /// as `_XX` hex, so distinct event ids never share a file and none can
    /// escape the store directory.
    pub fn path_for(&self, event_id: &str) -> PathBuf {
        let mut name = String::with_capacity(event_id.len());
        for byte in event_id.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(byte as char);
            } else {
                name.push_str(&format!("_{:02X}", byte));
            }
        }
        self.dir.join(format!("{}.json", name))
    }
}

impl ProgramOrderStore for JsonOrderStore {
    /// Missing files read as "no custom order". Unreadable or corrupt files
    /// are logged and also treated as absent.
    fn load(&self, event_id: &str) -> Result<Option<Vec<RaceKey>>> {
        let path = self.path_for(event_id);
        if !path.exists() {
            tracing::debug!("No custom order for event {}", event_id);
            return Ok(None);
        }

        let file = match File::open(&path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!("Unable to open order file {:?}: {}. Using default order.", path, e);
                return Ok(None);
            }
        };

        file.lock_shared()?;
        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;

        if let Err(e) = read {
            tracing::warn!("Failed to read order file {:?}: {}. Using default order.", path, e);
            return Ok(None);
        }

        match serde_json::from_str::<StoredOrder>(&contents) {
            Ok(stored) if stored.event_id != event_id => {
                tracing::warn!(
                    "Order file {:?} belongs to event {}, not {}. Using default order.",
                    path,
                    stored.event_id,
                    event_id
                );
                Ok(None)
            }
            Ok(stored) => {
                tracing::debug!(
                    "Loaded custom order of {} races for event {}",
                    stored.races.len(),
                    event_id
                );
                Ok(Some(stored.races))
            }
            Err(e) => {
                tracing::warn!("Failed to parse order file {:?}: {}. Using default order.", path, e);
                Ok(None)
            }
        }
    }

    /// Atomically replaces the order file via a locked temp file and rename
    fn save(&mut self, event_id: &str, order: &[RaceKey]) -> Result<()> {
        if event_id.is_empty() {
            return Err(Error::Store("cannot save an order without an event id".into()));
        }
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(event_id);

        let temp = NamedTempFile::new_in(&self.dir)?;
        temp.as_file().lock_exclusive()?;

        {
            let stored = StoredOrder {
                event_id: event_id.to_string(),
                races: order.to_vec(),
            };
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(&stored)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;
        temp.persist(&path).map_err(|e| {
            Error::Store(format!("Failed to replace {:?}: {}", path, e.error))
        })?;

        tracing::info!("Saved custom order of {} races to {:?}", order.len(), path);
        Ok(())
    }

    fn clear(&mut self, event_id: &str) -> Result<()> {
        let path = self.path_for(event_id);
        if path.exists() {
            std::fs::remove_file(&path)?;
            tracing::info!("Cleared custom order for event {}", event_id);
        }
        Ok(())
    }
}
