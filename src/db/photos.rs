//! Photo store: durable photo references attached to points.

use rusqlite::params;
use serde::{Deserialize, Serialize};

use super::{is_foreign_key_violation, is_primary_key_violation, Database};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub point_id: String,
    pub uri: String,
}

impl Database {
    /// Record a photo for an existing point.
    ///
    /// The foreign key rejects unknown points; there is no separate lookup.
    pub fn insert_photo(&self, id: &str, point_id: &str, uri: &str) -> Result<Photo> {
        self.conn
            .execute(
                "INSERT INTO photos (id, point_id, uri) VALUES (?1, ?2, ?3)",
                params![id, point_id, uri],
            )
            .map_err(|e| {
                if is_primary_key_violation(&e) {
                    Error::PhotoExists(id.to_string())
                } else if is_foreign_key_violation(&e) {
                    Error::UnknownPoint(point_id.to_string())
                } else {
                    Error::Database(e)
                }
            })?;
        Ok(Photo {
            id: id.to_string(),
            point_id: point_id.to_string(),
            uri: uri.to_string(),
        })
    }

    pub fn list_photos_for_point(&self, point_id: &str) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uri FROM photos WHERE point_id = ?1 ORDER BY rowid")?;
        let uris = stmt
            .query_map([point_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(uris)
    }
}
