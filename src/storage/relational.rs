//! SQLite-backed passenger store
//!
//! All queries go through one shared connection. The connection is opened
//! lazily by the store's `Connector` on first use, and at most once even
//! when many callers race to be first.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, params};
use crate::passenger::Passenger;
use crate::storage::{PassengerStore, schema};
use crate::{Error, Result};

/// Upper bound on how long a query waits for the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The single connection shared by every caller.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Hands out the store's connection, opening it on first use.
pub trait Connector: Send + Sync {
    fn get(&self) -> Result<SharedConnection>;
}

type Opener = Box<dyn Fn() -> rusqlite::Result<Connection> + Send + Sync>;

/// Lazily opens exactly one SQLite connection.
///
/// The connection is opened on first use and then held for the life of the
/// connector. It is never recycled after sitting idle and never reopened
/// once established: if the database file is replaced underneath it (a
/// redeploy swapping `titanic.db`, say), queries keep reading the old
/// handle or fail with `StoreUnavailable` until the process restarts. Only
/// a failed open is retried, on the next call.
pub struct SqliteConnector {
    source: String,
    opener: Opener,
    conn: OnceLock<SharedConnection>,
    init: Mutex<()>,
}

impl SqliteConnector {
    /// Connector for a database file, opened read-only
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path: PathBuf = path.as_ref().to_path_buf();
        let source = path.display().to_string();
        Self::with_opener(source, move || {
            let conn = Connection::open_with_flags(
                &path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            conn.busy_timeout(BUSY_TIMEOUT)?;
            Ok(conn)
        })
    }

    /// Connector with a custom open function
    pub fn with_opener<F>(source: impl Into<String>, opener: F) -> Self
    where
        F: Fn() -> rusqlite::Result<Connection> + Send + Sync + 'static,
    {
        Self {
            source: source.into(),
            opener: Box::new(opener),
            conn: OnceLock::new(),
            init: Mutex::new(()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }
}

impl Connector for SqliteConnector {
    fn get(&self) -> Result<SharedConnection> {
        if let Some(conn) = self.conn.get() {
            return Ok(Arc::clone(conn));
        }

        let _guard = self
            .init
            .lock()
            .map_err(|_| Error::StoreUnavailable("sqlite connector lock poisoned".to_string()))?;

        // Another caller may have finished while we waited on the lock
        if let Some(conn) = self.conn.get() {
            return Ok(Arc::clone(conn));
        }

        let conn = (self.opener)().map_err(|e| {
            Error::StoreUnavailable(format!("error opening sqlite store: {} error: {}", self.source, e))
        })?;
        tracing::debug!("Opened sqlite connection to {}", self.source);

        let shared = Arc::new(Mutex::new(conn));
        let _ = self.conn.set(Arc::clone(&shared));
        Ok(shared)
    }
}

pub struct RelationalStore<C = SqliteConnector> {
    connector: C,
}

impl<C: Connector> RelationalStore<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let shared = self.connector.get()?;
        let conn = shared
            .lock()
            .map_err(|_| Error::StoreUnavailable("sqlite connection lock poisoned".to_string()))?;
        f(&conn)
    }
}

impl<C: Connector> PassengerStore for RelationalStore<C> {
    fn fetch_all(&self) -> Result<Vec<Passenger>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&schema::select_all()).map_err(query_failed)?;
            let passengers = stmt
                .query_map([], row_to_passenger)
                .map_err(query_failed)?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(query_failed)?;
            Ok(passengers)
        })
    }

    fn fetch(&self, id: i64) -> Result<Passenger> {
        self.with_connection(|conn| {
            conn.query_row(&schema::select_by_id(), params![id], row_to_passenger)
                .map_err(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => Error::NotFound(id),
                    other => query_failed(other),
                })
        })
    }
}

fn query_failed(e: rusqlite::Error) -> Error {
    Error::StoreUnavailable(format!("sqlite query failed: {}", e))
}

/// Helper to convert a row to a Passenger
fn row_to_passenger(row: &rusqlite::Row) -> rusqlite::Result<Passenger> {
    Ok(Passenger {
        passenger_id: row.get(0)?,
        survived: row.get::<_, Option<i64>>(1)?.unwrap_or_default(),
        pclass: row.get::<_, Option<i64>>(2)?.unwrap_or_default(),
        name: text_column(row, 3)?,
        sex: text_column(row, 4)?,
        age: text_column(row, 5)?,
        sib_sp: row.get::<_, Option<i64>>(6)?.unwrap_or_default(),
        parch: row.get::<_, Option<i64>>(7)?.unwrap_or_default(),
        ticket: text_column(row, 8)?,
        fare: row.get::<_, Option<f64>>(9)?.unwrap_or_default(),
        cabin: text_column(row, 10)?,
        embarked: text_column(row, 11)?,
    })
}

/// Text columns tolerate NULL and numeric affinity (an imported `Age` is often REAL).
fn text_column(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(v) => v.to_string(),
        ValueRef::Real(v) => v.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn seed(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute(schema::CREATE_PASSENGERS_TABLE, []).unwrap();
        let rows = [
            (1, 0, 3, "Braund, Mr. Owen Harris", "male", Some("22"), 7.25, None, "S"),
            (2, 1, 1, "Cumings, Mrs. John Bradley", "female", Some("38"), 71.2833, Some("C85"), "C"),
            (6, 0, 3, "Moran, Mr. James", "male", None, 8.4583, None, "Q"),
        ];
        for (id, survived, class, name, sex, age, fare, cabin, embarked) in rows {
            conn.execute(
                "INSERT INTO passengers (PassengerId, Survived, Pclass, Name, Sex, Age, SibSp, Parch, Ticket, Fare, Cabin, Embarked)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 0, 'T-1', ?7, ?8, ?9)",
                params![id, survived, class, name, sex, age, fare, cabin, embarked],
            )
            .unwrap();
        }
    }

    fn sample_store() -> (tempfile::TempDir, RelationalStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titanic.db");
        seed(&path);
        (dir, RelationalStore::new(SqliteConnector::new(&path)))
    }

    #[test]
    fn test_fetch_all() {
        let (_dir, store) = sample_store();

        let passengers = store.fetch_all().unwrap();
        assert_eq!(passengers.len(), 3);
        assert_eq!(passengers[0].name, "Braund, Mr. Owen Harris");
        assert_eq!(passengers[2].age, "");
        assert_eq!(passengers[2].cabin, "");
    }

    #[test]
    fn test_fetch_by_id() {
        let (_dir, store) = sample_store();

        let p = store.fetch(2).unwrap();
        assert_eq!(p.passenger_id, 2);
        assert_eq!(p.cabin, "C85");
        assert_eq!(p.ticket, "T-1");
        assert!(matches!(store.fetch(404), Err(Error::NotFound(404))));
    }

    #[test]
    fn test_connection_opened_lazily() {
        let (_dir, store) = sample_store();
        assert!(!store.connector().is_open());

        store.fetch(1).unwrap();
        assert!(store.connector().is_open());
    }

    #[test]
    fn test_missing_database_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = RelationalStore::new(SqliteConnector::new(dir.path().join("absent.db")));

        assert!(matches!(store.fetch_all(), Err(Error::StoreUnavailable(_))));
        assert!(matches!(store.fetch(1), Err(Error::StoreUnavailable(_))));
    }

    #[test]
    fn test_missing_table_fails_fetch_all() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path).unwrap().execute("CREATE TABLE other (x INTEGER)", []).unwrap();

        let store = RelationalStore::new(SqliteConnector::new(&path));
        assert!(matches!(store.fetch_all(), Err(Error::StoreUnavailable(_))));
    }

    #[test]
    fn test_concurrent_first_calls_open_once() {
        const CALLERS: usize = 16;

        let opens = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&opens);
        let connector = SqliteConnector::with_opener("memory", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(20));
            Connection::open_in_memory()
        });

        let barrier = Barrier::new(CALLERS);
        let handles: Vec<SharedConnection> = std::thread::scope(|s| {
            let workers: Vec<_> = (0..CALLERS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        connector.get().unwrap()
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert_eq!(handles.len(), CALLERS);
        assert!(handles.iter().all(|h| Arc::ptr_eq(h, &handles[0])));
    }

    #[test]
    fn test_failed_open_is_reported() {
        let connector = SqliteConnector::with_opener("broken", || {
            Err(rusqlite::Error::InvalidPath(PathBuf::from("/nowhere")))
        });
        let store = RelationalStore::new(connector);

        match store.fetch(1) {
            Err(Error::StoreUnavailable(msg)) => assert!(msg.contains("broken")),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(!store.connector().is_open());
    }

    #[test]
    fn test_established_connection_is_never_reopened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("titanic.db");
        seed(&path);

        let opens = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&opens);
        let source = path.display().to_string();
        let db = path.clone();
        let store = RelationalStore::new(SqliteConnector::with_opener(source, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Connection::open_with_flags(&db, OpenFlags::SQLITE_OPEN_READ_ONLY)
        }));

        let first = store.connector().get().unwrap();
        for _ in 0..5 {
            store.fetch_all().unwrap();
            store.fetch(2).unwrap();
        }
        assert!(matches!(store.fetch(404), Err(Error::NotFound(404))));

        assert_eq!(opens.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &store.connector().get().unwrap()));
    }

    #[test]
    fn test_open_retried_after_failure() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let connector = SqliteConnector::with_opener("flaky", move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(rusqlite::Error::InvalidPath(PathBuf::from("/nowhere")));
            }
            Connection::open_in_memory()
        });

        assert!(matches!(connector.get(), Err(Error::StoreUnavailable(_))));
        assert!(!connector.is_open());

        connector.get().unwrap();
        connector.get().unwrap();
        assert!(connector.is_open());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
