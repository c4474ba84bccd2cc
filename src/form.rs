//! Form state for the package editor
//!
//! Holds the editable field values as typed by the user, the per-day itinerary
//! derived from the duration field, the local place selection and the UI
//! status. Every transition here is local; network work lives in
//! [`crate::fetch`] and [`crate::save`].

use std::collections::BTreeSet;

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::models::{
    DestinationId, ItineraryPayload, Package, PackageDraft, PackageId, Place, PlaceId,
};

/// Lifecycle of one editor instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// A submit is in flight
    Busy,
    /// Saved successfully and dismissed
    Closed,
}

/// Numeric fields that passed validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedFields {
    pub destination_id: DestinationId,
    pub duration: u32,
    pub price: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PackageForm {
    existing: Option<Package>,
    destination_id: Option<DestinationId>,
    title: String,
    description: String,
    duration: String,
    price: String,
    image_url: String,
    rating: f64,
    itinerary: Vec<String>,
    places: Vec<Place>,
    selected_places: BTreeSet<PlaceId>,
    phase: Phase,
    loading: bool,
    error: Option<String>,
}

/// Longest package the form accepts, in days
pub const MAX_DAYS: u32 = 365;

/// Number of itinerary slots implied by the duration text.
///
/// Anything that is not an unsigned integer yields no slots; larger values
/// are capped at [`MAX_DAYS`] and rejected on submit.
#[must_use]
pub fn parse_day_count(text: &str) -> usize {
    text.trim()
        .parse::<u64>()
        .map(|days| days.min(u64::from(MAX_DAYS)) as usize)
        .unwrap_or(0)
}

impl PackageForm {
    /// Empty form for creating a new package
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Form seeded from an optional existing package
    #[must_use]
    pub fn seeded(existing: Option<Package>) -> Self {
        match existing {
            Some(package) => Self::from_package(package),
            None => Self::new(),
        }
    }

    /// Form for editing `package`. Itinerary slots start empty until the stored
    /// itinerary is fetched.
    #[must_use]
    pub fn from_package(package: Package) -> Self {
        let mut form = Self {
            destination_id: Some(package.destination_id),
            title: package.title.clone(),
            description: package.description.clone(),
            price: package.price.to_string(),
            image_url: package.image_url.clone(),
            rating: package.rating,
            ..Self::default()
        };
        form.set_duration(package.duration.to_string());
        form.existing = Some(package);
        form
    }

    /// Package being edited; `None` when creating
    pub fn existing(&self) -> Option<&Package> {
        self.existing.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    pub fn destination_id(&self) -> Option<DestinationId> {
        self.destination_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn price(&self) -> &str {
        &self.price
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn itinerary(&self) -> &[String] {
        &self.itinerary
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn selected_places(&self) -> &BTreeSet<PlaceId> {
        &self.selected_places
    }

    /// Submit lifecycle: idle, busy while saving, closed after success
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase == Phase::Busy
    }

    pub fn is_closed(&self) -> bool {
        self.phase == Phase::Closed
    }

    /// A place or itinerary fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error shown under the form, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_price(&mut self, price: impl Into<String>) {
        self.price = price.into();
    }

    pub fn set_image_url(&mut self, image_url: impl Into<String>) {
        self.image_url = image_url.into();
    }

    /// Update the duration text and resize the itinerary to match.
    pub fn set_duration(&mut self, duration: impl Into<String>) {
        self.duration = duration.into();
        let days = parse_day_count(&self.duration);
        self.resize_itinerary(days);
    }

    /// Grow with empty days or truncate; retained days keep their text.
    fn resize_itinerary(&mut self, days: usize) {
        if days != self.itinerary.len() {
            debug!("Resizing itinerary from {} to {} days", self.itinerary.len(), days);
        }
        self.itinerary.resize(days, String::new());
    }

    /// Set the description for the zero-based `day`. Returns `false` when the
    /// itinerary has no such day.
    pub fn set_day(&mut self, day: usize, text: impl Into<String>) -> bool {
        match self.itinerary.get_mut(day) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    /// Replace the itinerary with stored descriptions, fitted to the current
    /// duration.
    pub fn replace_itinerary(&mut self, stored: Vec<String>) {
        let days = parse_day_count(&self.duration);
        if stored.len() != days {
            warn!(
                "Stored itinerary has {} days but duration is {}; fitting to duration",
                stored.len(),
                days
            );
        }
        self.itinerary = stored;
        self.resize_itinerary(days);
    }

    /// Change the selected destination. Returns whether the selection changed;
    /// a change drops the places and place selection of the old destination.
    pub fn select_destination(&mut self, destination_id: Option<DestinationId>) -> bool {
        if self.destination_id == destination_id {
            return false;
        }
        self.destination_id = destination_id;
        self.places.clear();
        self.selected_places.clear();
        true
    }

    pub fn set_places(&mut self, places: Vec<Place>) {
        self.places = places;
    }

    /// Add the place to the selection, or remove it if already selected.
    /// Returns whether the place is selected afterwards.
    pub fn toggle_place(&mut self, place_id: PlaceId) -> bool {
        if self.selected_places.remove(&place_id) {
            false
        } else {
            self.selected_places.insert(place_id);
            true
        }
    }

    pub fn is_place_selected(&self, place_id: PlaceId) -> bool {
        self.selected_places.contains(&place_id)
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Enter the busy phase, clearing any previous error.
    pub(crate) fn begin_submit(&mut self) {
        self.error = None;
        self.phase = Phase::Busy;
    }

    /// Back to idle with an inline error.
    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.phase = Phase::Idle;
    }

    pub(crate) fn close(&mut self) {
        self.error = None;
        self.phase = Phase::Closed;
    }

    /// Check the form in submit order: destination, itinerary days, then the
    /// numeric fields.
    pub fn validate(&self) -> Result<ValidatedFields, ValidationError> {
        let destination_id = self
            .destination_id
            .ok_or(ValidationError::MissingDestination)?;

        if let Some(blank) = self.itinerary.iter().position(|day| day.trim().is_empty()) {
            return Err(ValidationError::BlankDay { day: blank + 1 });
        }

        let duration = self
            .duration
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|days| (1..=MAX_DAYS).contains(days))
            .ok_or(ValidationError::InvalidDuration)?;

        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price >= 0.0)
            .ok_or(ValidationError::InvalidPrice)?;

        if self.itinerary.len() != duration as usize {
            return Err(ValidationError::ItineraryLength {
                expected: duration as usize,
                actual: self.itinerary.len(),
            });
        }

        Ok(ValidatedFields {
            destination_id,
            duration,
            price,
        })
    }

    /// Validate and build the payload for the save callback.
    pub fn package_draft(&self) -> Result<PackageDraft, ValidationError> {
        let fields = self.validate()?;
        Ok(PackageDraft {
            id: self.existing.as_ref().map(|package| package.id),
            destination_id: fields.destination_id,
            title: self.title.clone(),
            description: self.description.clone(),
            duration: fields.duration,
            price: fields.price,
            rating: self.rating,
            image_url: self.image_url.clone(),
        })
    }

    #[must_use]
    pub fn itinerary_payload(&self, package_id: PackageId) -> ItineraryPayload {
        ItineraryPayload::new(package_id, self.itinerary.clone())
    }
}
