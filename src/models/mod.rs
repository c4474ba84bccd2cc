//! Data models for the package editor
//!
//! This module contains the backend records the editor works with:
//! - Package: the sellable offering and the draft handed to the save callback
//! - Itinerary: per-day descriptions keyed by package
//! - Place / Destination: read-only selection data

pub mod itinerary;
pub mod package;
pub mod place;

// Re-export all public types for convenient access
pub use itinerary::{Itinerary, ItineraryPayload};
pub use package::{Package, PackageDraft, PackageId};
pub use place::{Destination, DestinationId, Place, PlaceId};
