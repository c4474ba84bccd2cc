//! The package editor component
//!
//! Ties the form to its data sources: mounting loads places and the stored
//! itinerary, changing destination reloads places, and submitting runs the
//! save workflow.

use tracing::{debug, info};

use crate::backend::PackageBackend;
use crate::fetch;
use crate::form::PackageForm;
use crate::host::PackageHost;
use crate::models::{Destination, DestinationId, Package, PlaceId};
use crate::save::{self, SubmitOutcome};

pub struct PackageEditor<B, H> {
    backend: B,
    host: H,
    destinations: Vec<Destination>,
    form: PackageForm,
}

impl<B: PackageBackend, H: PackageHost> PackageEditor<B, H> {
    /// Open the editor for a new package, or for `existing` when given.
    /// Call [`mount`](Self::mount) before interacting with it.
    pub fn open(
        backend: B,
        host: H,
        destinations: Vec<Destination>,
        existing: Option<Package>,
    ) -> Self {
        match &existing {
            Some(package) => info!("Editing package {} ({})", package.id, package.title),
            None => info!("Creating a new package"),
        }
        Self {
            backend,
            host,
            destinations,
            form: PackageForm::seeded(existing),
        }
    }

    pub async fn mount(&mut self) {
        fetch::mount(&self.backend, &mut self.form).await;
    }

    pub fn form(&self) -> &PackageForm {
        &self.form
    }

    /// Direct field access. Destination changes should go through
    /// [`select_destination`](Self::select_destination) so places are reloaded.
    pub fn form_mut(&mut self) -> &mut PackageForm {
        &mut self.form
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Select a destination and reload its places if the selection changed.
    pub async fn select_destination(&mut self, destination_id: Option<DestinationId>) {
        if let Some(id) = destination_id {
            if !self.destinations.is_empty() && !self.destinations.iter().any(|d| d.id == id) {
                debug!("Destination {} is not in the offered list", id);
            }
        }
        if self.form.select_destination(destination_id) {
            fetch::load_places(&self.backend, &mut self.form).await;
        }
    }

    pub fn toggle_place(&mut self, place_id: PlaceId) -> bool {
        self.form.toggle_place(place_id)
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        save::submit(&mut self.form, &self.backend, &self.host).await
    }
}
