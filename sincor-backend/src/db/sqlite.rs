//! SQLite database - schema definition and connection management
//!
//! Table operations live in the tables/ subdirectory as `impl Database`
//! blocks; this file owns the connection and the schema.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

/// Database wrapper; the mutex serializes all reads and writes, which keeps
/// task id allocation and status transitions linearizable.
pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (creating if needed) the database file and initialize the schema
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    /// In-memory database, used by tests
    pub fn open_in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init()?;
        Ok(db)
    }

    /// Create tables and indexes
    fn init(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        // Task ledger - append-only; AUTOINCREMENT keeps ids strictly
        // increasing even across deletes (which we never do)
        conn.execute(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                task_type TEXT NOT NULL,
                archetype TEXT NOT NULL,
                assigned_agent_id TEXT,
                status TEXT NOT NULL DEFAULT 'assigned',
                payload TEXT NOT NULL DEFAULT '{}',
                result TEXT,
                error TEXT,
                created_at TEXT NOT NULL,
                completed_at TEXT
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_type ON tasks(task_type)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_tasks_agent ON tasks(assigned_agent_id)",
            [],
        )?;

        Ok(())
    }
}
