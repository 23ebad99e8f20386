//! Screen controllers: the map screen and the per-point detail screen.
//!
//! They own no rendering; the map widget, picker and navigation are handed
//! in as plain values or capabilities.

pub mod detail;
pub mod map;

pub use detail::DetailScreen;
pub use map::{DetailRoute, MapScreen};
