//! Import picked images into the application's media directory.
//!
//! Each picked source is copied under a name derived from its new photo id
//! and then recorded in the photo store:
//! ```text
//! <media_dir>/
//! ├── 1718000000000-0.jpg
//! ├── 1718000000000-1.png
//! └── 1718000000123-2
//! ```
//! Copy and insert of one image form a unit. The bytes land in a `.part`
//! file first and only get their final name inside the transaction that
//! records the row, so a failure never leaves a row without a file or a
//! finished file without a row.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::db::{Database, Photo};
use crate::error::{Error, Result};
use crate::ids::generate_id;
use crate::picker::PickedAsset;

/// Result of an import batch
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Photos copied and recorded
    pub imported: Vec<ImportedPhoto>,
    /// Sources that failed, with the reason
    pub failed: Vec<(PathBuf, String)>,
    /// All photo uris of the point after the batch, as stored
    pub photos: Vec<String>,
}

impl ImportReport {
    /// True when every source in the batch was imported.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ImportedPhoto {
    pub source: PathBuf,
    pub photo: Photo,
}

pub struct AssetImporter {
    media_dir: PathBuf,
}

impl AssetImporter {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    pub fn media_dir(&self) -> &Path {
        &self.media_dir
    }

    /// Copy every source into durable storage and record it for `point_id`.
    ///
    /// Failures are collected per source and do not stop the batch. The
    /// returned report carries the point's photos re-read from the store.
    pub fn import_images(
        &self,
        db: &Database,
        point_id: &str,
        sources: &[PickedAsset],
    ) -> Result<ImportReport> {
        fs::create_dir_all(&self.media_dir)?;

        let mut report = ImportReport::default();
        for asset in sources {
            match self.import_one(db, point_id, asset) {
                Ok(photo) => {
                    debug!("Imported {:?} as {}", asset.uri, photo.uri);
                    report.imported.push(ImportedPhoto {
                        source: asset.uri.clone(),
                        photo,
                    });
                }
                Err(e) => {
                    warn!("Failed to import {:?} for point {}: {}", asset.uri, point_id, e);
                    report.failed.push((asset.uri.clone(), e.to_string()));
                }
            }
        }

        report.photos = db.list_photos_for_point(point_id)?;

        info!(
            "Imported {} of {} images for point {}",
            report.imported.len(),
            sources.len(),
            point_id
        );
        Ok(report)
    }

    fn import_one(&self, db: &Database, point_id: &str, asset: &PickedAsset) -> Result<Photo> {
        let source = asset.uri.as_path();
        let photo_id = generate_id();
        let destination = self.media_dir.join(durable_file_name(&photo_id, asset)?);
        let partial = partial_path(&destination);

        if let Err(e) = fs::copy(source, &partial) {
            let _ = fs::remove_file(&partial);
            return Err(Error::CopyFailed {
                path: source.to_path_buf(),
                source: e,
            });
        }

        let recorded = record(db, &photo_id, point_id, &partial, &destination);
        if recorded.is_err() {
            let _ = fs::remove_file(&partial);
            let _ = fs::remove_file(&destination);
        }
        recorded
    }
}

/// Insert the row and move the copy into place as one transaction.
fn record(
    db: &Database,
    photo_id: &str,
    point_id: &str,
    partial: &Path,
    destination: &Path,
) -> Result<Photo> {
    let uri = destination.to_string_lossy().to_string();
    let tx = db.conn.unchecked_transaction()?;
    let photo = db.insert_photo(photo_id, point_id, &uri)?;
    fs::rename(partial, destination)?;
    tx.commit()?;
    Ok(photo)
}

/// Name of the durable copy: the photo id plus the source's extension.
///
/// Two sources with the same file name therefore never overwrite each other.
fn durable_file_name(photo_id: &str, asset: &PickedAsset) -> Result<String> {
    let Some(file_name) = asset.file_name() else {
        return Err(Error::InvalidSource(asset.uri.clone()));
    };
    let name = match Path::new(&file_name).extension() {
        Some(ext) => format!("{}.{}", photo_id, ext.to_string_lossy().to_lowercase()),
        None => photo_id.to_string(),
    };
    Ok(name)
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn setup() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.ensure_schema().unwrap();
        db.insert_point("P", 44.0, 43.19).unwrap();
        db
    }

    fn write_source(dir: &Path, name: &str, contents: &[u8]) -> PickedAsset {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        PickedAsset::new(path)
    }

    fn photo_count(db: &Database, point_id: &str) -> i64 {
        db.conn
            .query_row(
                "SELECT COUNT(*) FROM photos WHERE point_id = ?1",
                [point_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[test]
    fn test_import_three_images() {
        let db = setup();
        let picked = tempdir().unwrap();
        let media = tempdir().unwrap();
        let sources = vec![
            write_source(picked.path(), "a.jpg", b"aaa"),
            write_source(picked.path(), "b.JPG", b"bbbb"),
            write_source(picked.path(), "c.png", b"c"),
        ];

        let importer = AssetImporter::new(media.path());
        let report = importer.import_images(&db, "P", &sources).unwrap();

        assert!(report.is_complete());
        assert_eq!(report.imported.len(), 3);
        assert_eq!(photo_count(&db, "P"), 3);

        let stored = db.list_photos_for_point("P").unwrap();
        assert_eq!(report.photos, stored);
        assert_eq!(stored.len(), 3);
        for (uri, source) in stored.iter().zip(&sources) {
            let uri = Path::new(uri);
            assert!(uri.starts_with(media.path()));
            assert_ne!(uri, source.uri.as_path());
            assert_eq!(fs::read(uri).unwrap(), fs::read(&source.uri).unwrap());
        }
        assert!(stored[1].ends_with(".jpg"));
    }

    #[test]
    fn test_import_single_image() {
        let db = setup();
        let picked = tempdir().unwrap();
        let media = tempdir().unwrap();
        let sources = vec![write_source(picked.path(), "only.jpg", b"x")];

        let report = AssetImporter::new(media.path())
            .import_images(&db, "P", &sources)
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.photos.len(), 1);
    }

    #[test]
    fn test_same_file_name_does_not_overwrite() {
        let db = setup();
        let first = tempdir().unwrap();
        let second = tempdir().unwrap();
        let media = tempdir().unwrap();
        let importer = AssetImporter::new(media.path());

        importer
            .import_images(&db, "P", &[write_source(first.path(), "IMG_0001.jpg", b"one")])
            .unwrap();
        let report = importer
            .import_images(&db, "P", &[write_source(second.path(), "IMG_0001.jpg", b"two")])
            .unwrap();

        assert_eq!(report.photos.len(), 2);
        assert_ne!(report.photos[0], report.photos[1]);
        assert_eq!(fs::read(&report.photos[0]).unwrap(), b"one");
        assert_eq!(fs::read(&report.photos[1]).unwrap(), b"two");
    }

    #[test]
    fn test_missing_source_is_reported_and_batch_continues() {
        let db = setup();
        let picked = tempdir().unwrap();
        let media = tempdir().unwrap();
        let sources = vec![
            write_source(picked.path(), "a.jpg", b"a"),
            PickedAsset::new(picked.path().join("gone.jpg")),
            write_source(picked.path(), "c.jpg", b"c"),
        ];

        let report = AssetImporter::new(media.path())
            .import_images(&db, "P", &sources)
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.imported.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, picked.path().join("gone.jpg"));
        assert_eq!(report.photos.len(), 2);
        assert_eq!(fs::read_dir(media.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_unknown_point_leaves_no_files() {
        let db = setup();
        let picked = tempdir().unwrap();
        let media = tempdir().unwrap();
        let sources = vec![write_source(picked.path(), "a.jpg", b"a")];

        let report = AssetImporter::new(media.path())
            .import_images(&db, "ghost", &sources)
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.photos.is_empty());
        assert_eq!(fs::read_dir(media.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_source_without_file_name_is_reported() {
        let db = setup();
        let media = tempdir().unwrap();

        let report = AssetImporter::new(media.path())
            .import_images(&db, "P", &[PickedAsset::new("/")])
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("no file name"));
        assert!(report.photos.is_empty());
    }

    #[test]
    fn test_creates_media_dir() {
        let db = setup();
        let picked = tempdir().unwrap();
        let root = tempdir().unwrap();
        let media = root.path().join("documents/media");
        let sources = vec![write_source(picked.path(), "a.jpg", b"a")];

        let report = AssetImporter::new(&media)
            .import_images(&db, "P", &sources)
            .unwrap();

        assert!(media.is_dir());
        assert!(Path::new(&report.photos[0]).exists());
    }

    #[test]
    fn test_durable_file_name() {
        assert_eq!(
            durable_file_name("123-0", &PickedAsset::new("/tmp/x/Photo.JPEG")).unwrap(),
            "123-0.jpeg"
        );
        assert_eq!(
            durable_file_name("123-0", &PickedAsset::new("/tmp/x/raw")).unwrap(),
            "123-0"
        );
        assert!(matches!(
            durable_file_name("123-0", &PickedAsset::new("/")),
            Err(Error::InvalidSource(_))
        ));
    }
}
