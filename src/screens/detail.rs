use tracing::{error, info, warn};

use super::map::DetailRoute;
use crate::db::{Database, PointWithPhotos};
use crate::error::{Error, Result};
use crate::import::{AssetImporter, ImportReport};
use crate::picker::{ImagePicker, PickRequest, PickResult};
use crate::view_state::{parse_object, PointUpdate};

/// Photos of one point, opened from a [`DetailRoute`].
pub struct DetailScreen {
    point: PointWithPhotos,
    images: Vec<String>,
}

impl DetailScreen {
    pub fn open(db: &Database, route: &DetailRoute) -> Result<Self> {
        let point: PointWithPhotos = parse_object(&route.marker)?;
        if point.id != route.id {
            return Err(Error::MalformedPayload(format!(
                "route id {} does not match snapshot id {}",
                route.id, point.id
            )));
        }

        let mut screen = Self {
            images: point.images.clone(),
            point,
        };
        screen.load_photos(db);
        Ok(screen)
    }

    pub fn point(&self) -> &PointWithPhotos {
        &self.point
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Refresh the displayed photos from the store. On error the current
    /// list stays.
    pub fn load_photos(&mut self, db: &Database) {
        match db.list_photos_for_point(&self.point.id) {
            Ok(images) => self.images = images,
            Err(e) => error!("Error loading photos for {}: {}", self.point.id, e),
        }
    }

    /// Ask the picker for images and import whatever it returns.
    ///
    /// Returns `None` when the pick was cancelled.
    pub fn add_images(
        &mut self,
        db: &Database,
        importer: &AssetImporter,
        picker: &dyn ImagePicker,
    ) -> Result<Option<ImportReport>> {
        let assets = match picker.pick(&PickRequest::default()) {
            PickResult::Cancelled => return Ok(None),
            PickResult::Selected(assets) => assets,
        };

        let report = match importer.import_images(db, &self.point.id, &assets) {
            Ok(report) => report,
            Err(e) => {
                error!("Error saving images: {}", e);
                self.load_photos(db);
                return Err(e);
            }
        };
        self.images = report.photos.clone();

        if report.is_complete() {
            info!("Added {} photos to {}", report.imported.len(), self.point.id);
        } else {
            warn!(
                "Added {} photos to {}, {} failed",
                report.imported.len(),
                self.point.id,
                report.failed.len()
            );
        }
        Ok(Some(report))
    }

    /// Payload to hand back to the map screen.
    pub fn save(&self) -> String {
        PointUpdate {
            id: self.point.id.clone(),
            images: self.images.clone(),
        }
        .to_payload()
    }
}
