//! Point store: pins and their aggregated photo lists.

use rusqlite::{params, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::{is_primary_key_violation, Database};
use crate::error::{Error, Result};

/// A pin as stored in the points table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A pin together with the uris of its photos, in insertion order.
///
/// This is also the snapshot serialized into a detail route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointWithPhotos {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<Point> for PointWithPhotos {
    fn from(point: Point) -> Self {
        Self {
            id: point.id,
            latitude: point.latitude,
            longitude: point.longitude,
            images: Vec::new(),
        }
    }
}

impl Database {
    pub fn insert_point(&self, id: &str, latitude: f64, longitude: f64) -> Result<Point> {
        self.conn
            .execute(
                "INSERT INTO points (id, latitude, longitude) VALUES (?1, ?2, ?3)",
                params![id, latitude, longitude],
            )
            .map_err(|e| {
                if is_primary_key_violation(&e) {
                    Error::PointExists(id.to_string())
                } else {
                    Error::Database(e)
                }
            })?;
        Ok(Point {
            id: id.to_string(),
            latitude,
            longitude,
        })
    }

    /// Every point with its photo uris.
    ///
    /// Points come back in insertion order, photos within a point in
    /// insertion order. Points without photos carry an empty list.
    pub fn list_points_with_photos(&self) -> Result<Vec<PointWithPhotos>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.latitude, p.longitude, ph.uri
            FROM points p
            LEFT JOIN photos ph ON ph.point_id = p.id
            ORDER BY p.rowid, ph.rowid
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, f64>(1)?,
                row.get::<_, f64>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut points: Vec<PointWithPhotos> = Vec::new();
        for row in rows {
            let (id, latitude, longitude, uri) = row?;
            match points.last_mut() {
                Some(last) if last.id == id => {
                    if let Some(uri) = uri {
                        last.images.push(uri);
                    }
                }
                _ => points.push(PointWithPhotos {
                    id,
                    latitude,
                    longitude,
                    images: uri.into_iter().collect(),
                }),
            }
        }
        Ok(points)
    }

    pub fn get_point(&self, id: &str) -> Result<Option<PointWithPhotos>> {
        let point = self
            .conn
            .query_row(
                "SELECT id, latitude, longitude FROM points WHERE id = ?1",
                [id],
                |row| {
                    Ok(Point {
                        id: row.get(0)?,
                        latitude: row.get(1)?,
                        longitude: row.get(2)?,
                    })
                },
            )
            .optional()?;

        match point {
            Some(point) => {
                let mut point = PointWithPhotos::from(point);
                point.images = self.list_photos_for_point(&point.id)?;
                Ok(Some(point))
            }
            None => Ok(None),
        }
    }

    pub fn count_points(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM points", [], |row| row.get(0))?;
        Ok(count)
    }
}
