mod schema;
pub mod photos;
pub mod points;

use rusqlite::{ffi, Connection, ErrorCode};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use photos::Photo;
pub use points::{Point, PointWithPhotos};
pub use schema::SCHEMA;

/// Storage handle shared by the point and photo stores.
///
/// Opened once at startup and passed by reference to whatever needs it.
/// Dropping the handle closes the connection; [`Database::close`] does the
/// same but reports errors.
pub struct Database {
    pub(crate) conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        info!("Database opened at {:?}", path);
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(Self { conn })
    }

    /// Create the point and photo tables if they are missing.
    ///
    /// Runs as a single transaction, so either both tables exist afterwards
    /// or neither was touched.
    pub fn ensure_schema(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction().map_err(Error::Schema)?;
        tx.execute_batch(SCHEMA).map_err(Error::Schema)?;
        tx.commit().map_err(Error::Schema)?;
        debug!("Schema ensured");
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::Database(e))
    }
}

/// Extended result code of a failed statement, if it was a constraint
/// violation.
fn constraint_violation(err: &rusqlite::Error) -> Option<i32> {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Some(e.extended_code)
        }
        _ => None,
    }
}

fn is_primary_key_violation(err: &rusqlite::Error) -> bool {
    constraint_violation(err) == Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    constraint_violation(err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}
