//! Storage Layer - read-only passenger record stores
//!
//! Two backends share one contract:
//! - `TabularStore`: CSV file with a header row (`PassengerId,Survived,...`)
//! - `RelationalStore`: SQLite table `passengers` behind a lazy single connection
//!
//! Both report a missing id as `Error::NotFound` and any medium failure as
//! `Error::StoreUnavailable`; backend error types never cross this boundary.

pub mod schema;
pub mod tabular;
pub mod relational;

pub use tabular::TabularStore;
pub use relational::{Connector, RelationalStore, SharedConnection, SqliteConnector};

use std::path::Path;
use std::sync::Arc;
use crate::passenger::{Passenger, StoreType};
use crate::Result;

/// Read access to passenger records, safe to call from many threads at once.
pub trait PassengerStore: Send + Sync {
    /// Every record, in source order
    fn fetch_all(&self) -> Result<Vec<Passenger>>;

    /// The record whose id equals `id`
    fn fetch(&self, id: i64) -> Result<Passenger>;
}

/// Build the store for the configured backend.
pub fn open_store(store_type: StoreType, path: &Path) -> Arc<dyn PassengerStore> {
    tracing::info!("Using {} store at {}", store_type, path.display());
    match store_type {
        StoreType::Tabular => Arc::new(TabularStore::new(path)),
        StoreType::Relational => Arc::new(RelationalStore::new(SqliteConnector::new(path))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rusqlite::{params, Connection};

    // (id, survived, class, name, sex, age, sibsp, parch, ticket, fare, cabin, embarked)
    type Row = (i64, i64, i64, &'static str, &'static str, &'static str, i64, i64, &'static str, f64, &'static str, &'static str);

    const ROWS: [Row; 4] = [
        (1, 0, 3, "Braund, Mr. Owen Harris", "male", "22", 1, 0, "A/5 21171", 7.25, "", "S"),
        (2, 1, 1, "Cumings, Mrs. John Bradley (Florence Briggs Thayer)", "female", "38", 1, 0, "PC 17599", 71.2833, "C85", "C"),
        (6, 0, 3, "Moran, Mr. James", "male", "", 0, 0, "330877", 8.4583, "", "Q"),
        (79, 1, 2, "Caldwell, Master. Alden Gates", "male", "0.83", 0, 2, "248738", 29.0, "", "S"),
    ];

    fn write_csv(path: &Path) {
        let mut writer = csv::Writer::from_path(path).unwrap();
        writer.write_record(schema::PASSENGER_COLUMNS.split(", ")).unwrap();
        for (id, survived, class, name, sex, age, sib_sp, parch, ticket, fare, cabin, embarked) in ROWS {
            writer
                .write_record([
                    id.to_string(),
                    survived.to_string(),
                    class.to_string(),
                    name.to_string(),
                    sex.to_string(),
                    age.to_string(),
                    sib_sp.to_string(),
                    parch.to_string(),
                    ticket.to_string(),
                    fare.to_string(),
                    cabin.to_string(),
                    embarked.to_string(),
                ])
                .unwrap();
        }
        writer.flush().unwrap();
    }

    /// Blank text cells go in as NULL, the way an imported database stores them.
    fn write_sqlite(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute(schema::CREATE_PASSENGERS_TABLE, []).unwrap();
        let blank = |s: &'static str| (!s.is_empty()).then_some(s);
        for (id, survived, class, name, sex, age, sib_sp, parch, ticket, fare, cabin, embarked) in ROWS {
            conn.execute(
                &format!(
                    "INSERT INTO passengers ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    schema::PASSENGER_COLUMNS
                ),
                params![id, survived, class, name, sex, blank(age), sib_sp, parch, ticket, fare, blank(cabin), embarked],
            )
            .unwrap();
        }
    }

    #[test]
    fn test_backends_return_identical_records() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("titanic.csv");
        let db_path = dir.path().join("titanic.db");
        write_csv(&csv_path);
        write_sqlite(&db_path);

        let tabular = open_store(StoreType::Tabular, &csv_path);
        let relational = open_store(StoreType::Relational, &db_path);

        let all = tabular.fetch_all().unwrap();
        assert_eq!(all.len(), ROWS.len());
        assert_eq!(all, relational.fetch_all().unwrap());

        for (id, ..) in ROWS {
            assert_eq!(tabular.fetch(id).unwrap(), relational.fetch(id).unwrap());
        }
        assert_eq!(relational.fetch(6).unwrap().age, "");
        assert_eq!(relational.fetch(79).unwrap().age, "0.83");

        assert!(matches!(tabular.fetch(404), Err(Error::NotFound(404))));
        assert!(matches!(relational.fetch(404), Err(Error::NotFound(404))));
    }
}
