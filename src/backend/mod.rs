//! Backend table operations the editor depends on
//!
//! [`PackageBackend`] is the seam between the editor and the hosted database.
//! [`rest::RestBackend`] talks to a PostgREST endpoint; tests use in-memory
//! implementations.

use crate::Result;
use crate::models::{DestinationId, Itinerary, ItineraryPayload, PackageId, Place};

pub mod rest;

pub use rest::RestBackend;

pub trait PackageBackend {
    /// All places belonging to a destination
    async fn places_for_destination(&self, destination_id: DestinationId) -> Result<Vec<Place>>;

    /// Itinerary rows stored for a package, normally at most one
    async fn itinerary_for_package(&self, package_id: PackageId) -> Result<Vec<Itinerary>>;

    async fn insert_itinerary(&self, itinerary: &ItineraryPayload) -> Result<()>;

    /// Overwrite the itinerary row keyed by `itinerary.package_id`.
    ///
    /// When no row matches, nothing is written and the call still returns
    /// `Ok(())`; an update never creates a row.
    async fn update_itinerary(&self, itinerary: &ItineraryPayload) -> Result<()>;
}

impl<T: PackageBackend> PackageBackend for &T {
    async fn places_for_destination(&self, destination_id: DestinationId) -> Result<Vec<Place>> {
        (**self).places_for_destination(destination_id).await
    }

    async fn itinerary_for_package(&self, package_id: PackageId) -> Result<Vec<Itinerary>> {
        (**self).itinerary_for_package(package_id).await
    }

    async fn insert_itinerary(&self, itinerary: &ItineraryPayload) -> Result<()> {
        (**self).insert_itinerary(itinerary).await
    }

    async fn update_itinerary(&self, itinerary: &ItineraryPayload) -> Result<()> {
        (**self).update_itinerary(itinerary).await
    }
}
