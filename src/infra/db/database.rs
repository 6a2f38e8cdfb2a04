//! SQLite database setup and connection management for revstore.
//! Opens the database and hands out the shared connection; schema setup
//! belongs to the repositories.

use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::repository::DbConn;

/// Database wrapper that manages the SQLite connection.
pub struct Database {
    conn: DbConn,
}

impl Database {
    /// Create or open the database at the default location.
    pub fn open() -> Result<Self> {
        let path = Self::default_path();
        Self::open_at(path)
    }

    /// Create an in-memory database (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Create or open the database at a specific path.
    pub fn open_at(path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        log::debug!("opening database at {}", path.display());
        let conn = Connection::open(&path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init()?;
        Ok(db)
    }

    /// Get the default database path.
    fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("REVSTORE_DB_PATH") {
            return PathBuf::from(path);
        }

        let cwd = std::env::current_dir().unwrap_or_default();
        cwd.join(".revstore").join("db.sqlite")
    }

    /// Per-connection pragmas. Table creation is the repositories' job.
    fn init(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    }

    /// Get a reference to the connection.
    pub fn connection(&self) -> DbConn {
        self.conn.clone()
    }
}
