//! In-memory list of points held by the map screen.
//!
//! The list is a read-through cache of the point store. It changes only by
//! an explicit reload, by appending a point whose insert already succeeded,
//! or by merging a [`PointUpdate`] coming back from the detail screen.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::db::{Database, PointWithPhotos};
use crate::error::{Error, Result};

/// Message sent by the detail screen when it is done with a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PointUpdate {
    pub id: String,
    pub images: Vec<String>,
}

impl PointUpdate {
    pub fn to_payload(&self) -> String {
        // A struct of strings always serializes
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse and validate a payload received through navigation.
    pub fn from_payload(payload: &str) -> Result<Self> {
        let update: PointUpdate = parse_object(payload)?;
        if update.id.is_empty() {
            return Err(Error::MalformedPayload("empty point id".to_string()));
        }
        Ok(update)
    }
}

/// Parse a navigation payload that must be a JSON object.
///
/// Derived `Deserialize` also accepts a struct written as a sequence, so
/// `["a",[]]` would pass for `{"id":"a","images":[]}` without this check.
pub(crate) fn parse_object<T: DeserializeOwned>(payload: &str) -> Result<T> {
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| Error::MalformedPayload(e.to_string()))?;
    if !value.is_object() {
        return Err(Error::MalformedPayload("expected a JSON object".to_string()));
    }
    serde_json::from_value(value).map_err(|e| Error::MalformedPayload(e.to_string()))
}

/// What happened to an incoming update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied,
    UnknownPoint,
    AlreadyConsumed,
    Malformed,
}

/// Marker handed to the map widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Default)]
pub struct ViewState {
    points: Vec<PointWithPhotos>,
    last_payload: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[PointWithPhotos] {
        &self.points
    }

    pub fn get(&self, id: &str) -> Option<&PointWithPhotos> {
        self.points.iter().find(|p| p.id == id)
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.points
            .iter()
            .map(|p| Marker {
                id: p.id.clone(),
                latitude: p.latitude,
                longitude: p.longitude,
            })
            .collect()
    }

    pub fn replace_all(&mut self, points: Vec<PointWithPhotos>) {
        self.points = points;
    }

    /// Reload every point from the store. On error the list is untouched.
    pub fn reload(&mut self, db: &Database) -> Result<()> {
        let points = db.list_points_with_photos()?;
        debug!("Loaded {} points", points.len());
        self.replace_all(points);
        Ok(())
    }

    /// Append a point that is already stored.
    pub fn push(&mut self, point: PointWithPhotos) {
        self.points.push(point);
    }

    /// Replace the photo list of the matching point. Nothing else changes.
    pub fn apply_update(&mut self, update: &PointUpdate) -> SyncOutcome {
        match self.points.iter_mut().find(|p| p.id == update.id) {
            Some(point) => {
                point.images = update.images.clone();
                SyncOutcome::Applied
            }
            None => {
                warn!("Ignoring update for unknown point {}", update.id);
                SyncOutcome::UnknownPoint
            }
        }
    }

    /// Consume a serialized update from the detail screen.
    ///
    /// A payload equal to the last one consumed is not applied again.
    pub fn apply_payload(&mut self, payload: &str) -> SyncOutcome {
        if self.last_payload.as_deref() == Some(payload) {
            return SyncOutcome::AlreadyConsumed;
        }

        let update = match PointUpdate::from_payload(payload) {
            Ok(update) => update,
            Err(e) => {
                error!("Failed to parse point update: {}", e);
                return SyncOutcome::Malformed;
            }
        };

        self.last_payload = Some(payload.to_string());
        self.apply_update(&update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, lat: f64, lon: f64, images: &[&str]) -> PointWithPhotos {
        PointWithPhotos {
            id: id.to_string(),
            latitude: lat,
            longitude: lon,
            images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn sample() -> ViewState {
        let mut state = ViewState::new();
        state.replace_all(vec![
            point("a", 1.0, 2.0, &["/media/a1.jpg"]),
            point("b", 3.0, 4.0, &[]),
            point("c", 5.0, 6.0, &["/media/c1.jpg", "/media/c2.jpg"]),
        ]);
        state
    }

    #[test]
    fn test_update_changes_only_matching_point() {
        let mut state = sample();
        let before = state.points().to_vec();

        let update = PointUpdate {
            id: "b".to_string(),
            images: vec!["/media/b1.jpg".to_string(), "/media/b2.jpg".to_string()],
        };
        assert_eq!(state.apply_payload(&update.to_payload()), SyncOutcome::Applied);

        let after = state.points();
        assert_eq!(after.len(), 3);
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[1].id, "b");
        assert_eq!((after[1].latitude, after[1].longitude), (3.0, 4.0));
        assert_eq!(after[1].images, update.images);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut state = sample();
        let before = state.points().to_vec();

        let outcome = state.apply_payload(r#"{"id":"zzz","images":["/media/x.jpg"]}"#);
        assert_eq!(outcome, SyncOutcome::UnknownPoint);
        assert_eq!(state.points(), before.as_slice());
    }

    #[test]
    fn test_malformed_payloads_leave_list_unchanged() {
        let mut state = sample();
        let before = state.points().to_vec();

        for payload in [
            r#"{"id":"a","images":["/me"#,
            "not json",
            r#"{"id":"a"}"#,
            r#"{"id":"a","images":"x"}"#,
            r#"{"id":"","images":[]}"#,
            r#"["a",[]]"#,
        ] {
            assert_eq!(state.apply_payload(payload), SyncOutcome::Malformed);
        }
        assert_eq!(state.points(), before.as_slice());
    }

    #[test]
    fn test_sequence_payload_keeps_photos() {
        let mut state = sample();

        assert_eq!(state.apply_payload(r#"["a",[]]"#), SyncOutcome::Malformed);
        assert_eq!(state.get("a").unwrap().images, vec!["/media/a1.jpg"]);
        assert!(matches!(
            PointUpdate::from_payload(r#"["a",["/media/x.jpg"]]"#),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_payload_consumed_once() {
        let mut state = sample();
        let payload = r#"{"id":"a","images":["/media/new.jpg"]}"#;
        assert_eq!(state.apply_payload(payload), SyncOutcome::Applied);

        // The list changes again by reload; the stale signal must not win
        state.replace_all(vec![point("a", 1.0, 2.0, &["/media/newer.jpg"])]);
        assert_eq!(state.apply_payload(payload), SyncOutcome::AlreadyConsumed);
        assert_eq!(state.points()[0].images, vec!["/media/newer.jpg"]);
    }

    #[test]
    fn test_reload_from_store() {
        let db = Database::open_in_memory().unwrap();
        db.ensure_schema().unwrap();
        db.insert_point("a", 1.0, 2.0).unwrap();
        db.insert_photo("ph", "a", "/media/a.jpg").unwrap();

        let mut state = ViewState::new();
        state.reload(&db).unwrap();
        assert_eq!(state.points(), &[point("a", 1.0, 2.0, &["/media/a.jpg"])]);
        assert_eq!(
            state.markers(),
            vec![Marker {
                id: "a".to_string(),
                latitude: 1.0,
                longitude: 2.0
            }]
        );
    }

    #[test]
    fn test_failed_reload_keeps_previous_list() {
        let db = Database::open_in_memory().unwrap();
        let mut state = sample();
        assert!(state.reload(&db).is_err());
        assert_eq!(state.points().len(), 3);
    }
}
