//! Image selection capability.
//!
//! The detail screen asks an [`ImagePicker`] for images and gets back either
//! a cancellation or the source locations of the picked assets. Sources may
//! be transient, so the importer copies them before recording anything.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Images,
}

/// What the caller asks the picker for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub allow_multiple: bool,
    /// Crop aspect hint, width by height.
    pub aspect: (u32, u32),
    pub media: MediaKind,
}

impl Default for PickRequest {
    fn default() -> Self {
        Self {
            allow_multiple: true,
            aspect: (1, 1),
            media: MediaKind::Images,
        }
    }
}

/// A single picked asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedAsset {
    /// Where the picker left the asset.
    pub uri: PathBuf,
}

impl PickedAsset {
    pub fn new(uri: impl Into<PathBuf>) -> Self {
        Self { uri: uri.into() }
    }

    pub fn file_name(&self) -> Option<String> {
        self.uri
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Cancelled,
    Selected(Vec<PickedAsset>),
}

pub trait ImagePicker {
    fn pick(&self, request: &PickRequest) -> PickResult;
}

/// Picker over a fixed set of files, used by the command line front end.
///
/// Files that do not exist or do not carry one of the configured image
/// extensions are skipped. Nothing left means the pick was cancelled.
pub struct FilePicker {
    paths: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl FilePicker {
    pub fn new(paths: Vec<PathBuf>, extensions: &[String]) -> Self {
        Self {
            paths,
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
        }
    }

    fn is_image(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.extensions.contains(&ext))
    }
}

impl ImagePicker for FilePicker {
    fn pick(&self, request: &PickRequest) -> PickResult {
        let mut assets: Vec<PickedAsset> = Vec::new();
        for path in &self.paths {
            if !path.is_file() {
                tracing::warn!("Skipping {:?}: not a file", path);
                continue;
            }
            if request.media == MediaKind::Images && !self.is_image(path) {
                tracing::warn!("Skipping {:?}: not an image", path);
                continue;
            }
            assets.push(PickedAsset::new(path.clone()));
        }

        if !request.allow_multiple {
            assets.truncate(1);
        }

        if assets.is_empty() {
            PickResult::Cancelled
        } else {
            PickResult::Selected(assets)
        }
    }
}
