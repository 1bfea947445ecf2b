//! # Titanic - passenger query service
//!
//! Read-only query and aggregation engine over the Titanic passenger dataset.
//!
//! Titanic provides:
//! - Two interchangeable record stores (CSV file, SQLite database)
//! - Attribute projection driven by one canonical name table
//! - Nearest-rank percentile histogram over passenger fares
//! - An HTTP API and a CLI on top of the same query service

pub mod passenger;
pub mod attribute;
pub mod histogram;
pub mod storage;
pub mod service;
pub mod config;
pub mod server;
pub mod ui;

// Re-exports for convenient access
pub use passenger::{Passenger, StoreType};
pub use attribute::{AttributeFilter, Projection};
pub use histogram::Histogram;
pub use storage::PassengerStore;
pub use service::PassengerService;

/// Result type alias for Titanic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Titanic operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("passenger not found: {0}")]
    NotFound(i64),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("unknown attribute filter provided: {0}")]
    InvalidAttribute(String),

    #[error("attribute filter provided more than once: {0}")]
    DuplicateAttribute(String),

    #[error("attributes query parameter is too long, max length {max}")]
    TooManyAttributes { max: usize },

    #[error("invalid passenger id: {0}")]
    InvalidIdentifier(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAttribute(_)
                | Error::DuplicateAttribute(_)
                | Error::TooManyAttributes { .. }
                | Error::InvalidIdentifier(_)
        )
    }
}
