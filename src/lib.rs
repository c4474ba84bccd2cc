//! `travelpack` - travel package editor
//!
//! This library provides the editor behind the "create / edit package" modal:
//! form state with an itinerary derived from the duration, the place and
//! itinerary fetchers, and the save workflow that writes the package and then
//! its itinerary to a hosted REST backend.

pub mod backend;
pub mod config;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod form;
pub mod host;
pub mod logging;
pub mod models;
pub mod save;

// Re-export core types for public API
pub use backend::{PackageBackend, RestBackend};
pub use config::TravelPackConfig;
pub use editor::PackageEditor;
pub use error::{PackageError, ValidationError};
pub use form::{PackageForm, Phase};
pub use host::{BackendPackageHost, PackageHost};
pub use models::{
    Destination, DestinationId, Itinerary, ItineraryPayload, Package, PackageDraft, PackageId,
    Place, PlaceId,
};
pub use save::SubmitOutcome;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PackageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
