//! CSV-backed passenger store
//!
//! The file is reopened and parsed in full on every call; there is no cache
//! to invalidate and no state shared between callers.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use crate::passenger::Passenger;
use crate::storage::PassengerStore;
use crate::{Error, Result};

pub struct TabularStore {
    path: PathBuf,
}

impl TabularStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<Passenger>> {
        // A missing file is created empty and reads as zero records
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)
            .map_err(|e| {
                Error::StoreUnavailable(format!(
                    "error opening store path: {} error: {}",
                    self.path.display(),
                    e
                ))
            })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(file);

        reader
            .deserialize()
            .collect::<std::result::Result<Vec<Passenger>, csv::Error>>()
            .map_err(|e| {
                Error::StoreUnavailable(format!(
                    "error loading store data path: {} error: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

impl PassengerStore for TabularStore {
    fn fetch_all(&self) -> Result<Vec<Passenger>> {
        let passengers = self.load()?;
        tracing::debug!("Loaded {} passengers from {}", passengers.len(), self.path.display());
        Ok(passengers)
    }

    fn fetch(&self, id: i64) -> Result<Passenger> {
        self.load()?
            .into_iter()
            .find(|p| p.passenger_id == id)
            .ok_or(Error::NotFound(id))
    }
}
