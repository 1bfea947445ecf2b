//! Passenger query service
//!
//! The one seam the HTTP handlers and the CLI talk to. It owns a single
//! store for the lifetime of the process and behaves the same whichever
//! backend sits behind it.

use std::sync::Arc;
use crate::Result;
use crate::attribute::AttributeFilter;
use crate::histogram::{self, Histogram};
use crate::passenger::{self, Passenger};
use crate::storage::PassengerStore;

#[derive(Clone)]
pub struct PassengerService {
    store: Arc<dyn PassengerStore>,
}

impl PassengerService {
    pub fn new(store: Arc<dyn PassengerStore>) -> Self {
        Self { store }
    }

    /// All passengers, unfiltered and in store order
    pub fn get_all(&self) -> Result<Vec<Passenger>> {
        self.store.fetch_all()
    }

    pub fn get(&self, id: i64) -> Result<Passenger> {
        self.store.fetch(id)
    }

    /// Validate `attributes` before touching the store, then fetch `id`.
    pub fn get_filtered(&self, id: i64, attributes: &str) -> Result<(Passenger, AttributeFilter)> {
        let filter = AttributeFilter::parse(attributes)?;
        let passenger = self.store.fetch(id)?;
        Ok((passenger, filter))
    }

    /// Filtered fetch from raw caller input: attributes are validated
    /// first, then the id, and only then is the store touched.
    pub fn lookup(&self, raw_id: &str, attributes: &str) -> Result<(Passenger, AttributeFilter)> {
        let filter = AttributeFilter::parse(attributes)?;
        let id = passenger::parse_id(raw_id)?;
        let passenger = self.store.fetch(id)?;
        Ok((passenger, filter))
    }

    /// Percentile histogram over every passenger's fare
    pub fn fare_histogram(&self) -> Result<Histogram> {
        let fares: Vec<f64> = self.store.fetch_all()?.iter().map(|p| p.fare).collect();
        Ok(histogram::percentile(&fares))
    }
}
