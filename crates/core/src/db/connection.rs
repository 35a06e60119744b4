use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};

use crate::Result;
use crate::db::migrations::run_migrations;

const IN_MEMORY: &str = ":memory:";

/// Shared handle to the SQLite database holding users, courses and rounds
#[derive(Clone)]
pub struct Database {
    path: PathBuf,
    connection: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if needed) the database at `path` without touching the schema
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::configure(&conn, true)?;

        Ok(Self {
            path,
            connection: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database at `path` and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = Self::new(path)?;
        db.with_connection(run_migrations)?;

        tracing::info!(path = %db.path.display(), "database ready");

        Ok(db)
    }

    /// Fully migrated private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn, false)?;

        let db = Self {
            path: PathBuf::from(IN_MEMORY),
            connection: Arc::new(Mutex::new(conn)),
        };
        db.with_connection(run_migrations)?;

        Ok(db)
    }

    fn configure(conn: &Connection, on_disk: bool) -> Result<()> {
        if on_disk {
            conn.execute_batch(
                r#"
                PRAGMA journal_mode = WAL;
                PRAGMA synchronous = NORMAL;
                "#,
            )?;
        }

        // Hole scores rely on ON DELETE CASCADE
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;
            PRAGMA cache_size = -20000;
            "#,
        )?;

        Ok(())
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut guard = self.connection.lock();
        f(&mut guard)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T>,
    {
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            let result = f(&tx)?;
            tx.commit()?;
            Ok(result)
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .finish()
    }
}
