use tracing::{error, info};

use crate::db::{Database, Point, PointWithPhotos};
use crate::error::Result;
use crate::ids::generate_id;
use crate::view_state::{Marker, SyncOutcome, ViewState};

/// Route to the detail screen: the point id plus a serialized snapshot of
/// the point as the map screen currently holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRoute {
    pub id: String,
    pub marker: String,
}

pub struct MapScreen<'a> {
    db: &'a Database,
    state: ViewState,
}

impl<'a> MapScreen<'a> {
    /// Ensure the schema and load every stored point.
    ///
    /// Schema failure is returned; without it nothing can be shown. A failed
    /// load only leaves the map empty.
    pub fn open(db: &'a Database) -> Result<Self> {
        if let Err(e) = db.ensure_schema() {
            error!("Cannot initialize map screen: {}", e);
            return Err(e);
        }

        let mut state = ViewState::new();
        if let Err(e) = state.reload(db) {
            error!("Error loading markers: {}", e);
        }
        Ok(Self { db, state })
    }

    pub fn markers(&self) -> Vec<Marker> {
        self.state.markers()
    }

    pub fn points(&self) -> &[PointWithPhotos] {
        self.state.points()
    }

    /// Drop a new pin. It shows up only after the insert succeeded.
    pub fn long_press(&mut self, latitude: f64, longitude: f64) -> Result<Point> {
        let id = generate_id();
        match self.db.insert_point(&id, latitude, longitude) {
            Ok(point) => {
                info!("Added point {} at ({}, {})", point.id, latitude, longitude);
                self.state.push(point.clone().into());
                Ok(point)
            }
            Err(e) => {
                error!("Error adding marker: {}", e);
                Err(e)
            }
        }
    }

    pub fn press_marker(&self, id: &str) -> Option<DetailRoute> {
        let point = self.state.get(id)?;
        match serde_json::to_string(point) {
            Ok(marker) => Some(DetailRoute {
                id: point.id.clone(),
                marker,
            }),
            Err(e) => {
                error!("Failed to serialize point {}: {}", id, e);
                None
            }
        }
    }

    /// Merge the payload the detail screen returned with.
    pub fn receive_update(&mut self, payload: &str) -> SyncOutcome {
        self.state.apply_payload(payload)
    }

    pub fn reload(&mut self) -> Result<()> {
        self.state.reload(self.db).inspect_err(|e| {
            error!("Error loading markers: {}", e);
        })
    }
}
