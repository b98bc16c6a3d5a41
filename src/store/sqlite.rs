use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use rusqlite_migration::{Migrations, M};
use tokio::sync::broadcast;

use crate::app::{Result, StashError};
use crate::domain::BookmarkRecord;
use crate::store::{Store, StoreEvent, BOOKMARKS_SLOT};

const EVENT_CAPACITY: usize = 64;

pub struct SqliteStore {
    conn: Mutex<Connection>,
    events: broadcast::Sender<StoreEvent>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let store = Self {
            conn: Mutex::new(conn),
            events,
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// Receive a [`StoreEvent`] after every committed mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| StashError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            StashError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn read_slot(conn: &Connection) -> Result<Vec<BookmarkRecord>> {
        let value = conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1",
                params![BOOKMARKS_SLOT],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        match value {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_slot(conn: &Connection, records: &[BookmarkRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        conn.execute(
            "INSERT INTO slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
            params![BOOKMARKS_SLOT, json],
        )?;
        Ok(())
    }
}

impl Store for SqliteStore {
    fn load(&self) -> Result<Vec<BookmarkRecord>> {
        let conn = self.conn()?;
        Self::read_slot(&conn)
    }

    fn with_store<T, F>(&self, mutator: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<BookmarkRecord>) -> Result<T>,
    {
        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front so other connections to
        // the same file cannot slip a write between our read and write.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut records = Self::read_slot(&tx)?;
        let output = mutator(&mut records)?;
        Self::write_slot(&tx, &records)?;
        tx.commit()?;

        Ok(output)
    }

    fn notify(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
