//! Data fetchers feeding the form
//!
//! Read failures are never shown to the user: they are logged and the form
//! keeps an empty place list or its derived itinerary.

use tracing::{debug, warn};

use crate::backend::PackageBackend;
use crate::form::PackageForm;
use crate::models::{DestinationId, PackageId, Place};

async fn fetch_places<B: PackageBackend>(backend: &B, destination_id: DestinationId) -> Vec<Place> {
    match backend.places_for_destination(destination_id).await {
        Ok(places) => {
            debug!("Fetched {} places for destination {}", places.len(), destination_id);
            places
        }
        Err(err) => {
            warn!("Failed to fetch places for destination {}: {}", destination_id, err);
            Vec::new()
        }
    }
}

async fn fetch_itinerary<B: PackageBackend>(
    backend: &B,
    package_id: PackageId,
) -> Option<Vec<String>> {
    match backend.itinerary_for_package(package_id).await {
        Ok(rows) => match rows.into_iter().next() {
            Some(itinerary) => Some(itinerary.descriptions),
            None => {
                warn!(
                    "Package {} has no stored itinerary; saving will not create one",
                    package_id
                );
                None
            }
        },
        Err(err) => {
            warn!("Failed to fetch itinerary for package {}: {}", package_id, err);
            None
        }
    }
}

/// Reload the places of the selected destination; no destination means no
/// places.
pub async fn load_places<B: PackageBackend>(backend: &B, form: &mut PackageForm) {
    let places = match form.destination_id() {
        Some(destination_id) => {
            form.set_loading(true);
            let places = fetch_places(backend, destination_id).await;
            form.set_loading(false);
            places
        }
        None => Vec::new(),
    };
    form.set_places(places);
}

/// Replace the derived itinerary with the stored one when editing.
pub async fn load_itinerary<B: PackageBackend>(backend: &B, form: &mut PackageForm) {
    let Some(package_id) = form.existing().map(|package| package.id) else {
        return;
    };
    form.set_loading(true);
    if let Some(stored) = fetch_itinerary(backend, package_id).await {
        form.replace_itinerary(stored);
    }
    form.set_loading(false);
}

/// Initial load: places for the seeded destination and, when editing, the
/// stored itinerary. Both requests run concurrently.
pub async fn mount<B: PackageBackend>(backend: &B, form: &mut PackageForm) {
    let destination_id = form.destination_id();
    let package_id = form.existing().map(|package| package.id);

    form.set_loading(true);
    let places = async {
        match destination_id {
            Some(id) => Some(fetch_places(backend, id).await),
            None => None,
        }
    };
    let itinerary = async {
        match package_id {
            Some(id) => fetch_itinerary(backend, id).await,
            None => None,
        }
    };
    let (places, itinerary) = futures::join!(places, itinerary);

    if let Some(places) = places {
        form.set_places(places);
    }
    if let Some(stored) = itinerary {
        form.replace_itinerary(stored);
    }
    form.set_loading(false);
}
