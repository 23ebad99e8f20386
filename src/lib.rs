//! Pins on a map with photos attached, persisted locally.
//!
//! [`db::Database`] is the storage handle: points and photos live in two
//! SQLite tables. [`import::AssetImporter`] copies picked images into
//! durable storage, [`view_state::ViewState`] keeps the map screen's list in
//! step with edits coming back from the detail screen, and [`screens`] wires
//! these together the way the two screens use them.

pub mod config;
pub mod db;
pub mod error;
pub mod ids;
pub mod import;
pub mod logging;
pub mod picker;
pub mod screens;
pub mod view_state;

pub use error::{Error, Result};
