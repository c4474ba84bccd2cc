//! Submit workflow: validate, save the package, then write its itinerary
//!
//! The two writes are not transactional. When the itinerary write fails the
//! package stays saved and the form reports the error; nothing is rolled back.

use tracing::{debug, error, info};

use crate::Result;
use crate::backend::PackageBackend;
use crate::error::PackageError;
use crate::form::PackageForm;
use crate::host::PackageHost;
use crate::models::Package;

/// Result of one submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Package and itinerary written; the editor is closed
    Saved(Package),
    /// Validation or a write failed; the message is shown inline
    Rejected(String),
    /// The editor is already closed
    Ignored,
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

pub async fn submit<B, H>(form: &mut PackageForm, backend: &B, host: &H) -> SubmitOutcome
where
    B: PackageBackend,
    H: PackageHost,
{
    // `&mut` serializes submits. A submit dropped mid-flight leaves the form
    // busy; the next one starts over.
    if form.is_closed() {
        debug!("Ignoring submit on a closed editor");
        return SubmitOutcome::Ignored;
    }

    form.begin_submit();

    match persist(form, backend, host).await {
        Ok(package) => {
            info!("Saved package {} ({})", package.id, package.title);
            form.close();
            host.close();
            SubmitOutcome::Saved(package)
        }
        Err(err) => {
            let message = err.user_message();
            match &err {
                PackageError::Validation(_) => debug!("Submit rejected: {}", message),
                _ => error!("Failed to save package: {}", err),
            }
            form.fail(message.clone());
            SubmitOutcome::Rejected(message)
        }
    }
}

async fn persist<B, H>(form: &PackageForm, backend: &B, host: &H) -> Result<Package>
where
    B: PackageBackend,
    H: PackageHost,
{
    let draft = form.package_draft()?;
    debug!("Saving package draft: {:?}", draft);

    let package = host.save_package(draft).await?;

    let itinerary = form.itinerary_payload(package.id);
    if form.is_editing() {
        backend.update_itinerary(&itinerary).await?;
    } else {
        backend.insert_itinerary(&itinerary).await?;
    }

    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DestinationId, Itinerary, ItineraryPayload, PackageDraft, PackageId, Place};

    /// Fails the test if validation lets a submit reach the network
    struct Unreachable;

    impl PackageBackend for Unreachable {
        async fn places_for_destination(&self, _: DestinationId) -> Result<Vec<Place>> {
            unreachable!("places fetched during submit")
        }

        async fn itinerary_for_package(&self, _: PackageId) -> Result<Vec<Itinerary>> {
            unreachable!("itinerary fetched during submit")
        }

        async fn insert_itinerary(&self, _: &ItineraryPayload) -> Result<()> {
            unreachable!("itinerary inserted for an invalid form")
        }

        async fn update_itinerary(&self, _: &ItineraryPayload) -> Result<()> {
            unreachable!("itinerary updated for an invalid form")
        }
    }

    impl PackageHost for Unreachable {
        async fn save_package(&self, _: PackageDraft) -> Result<Package> {
            unreachable!("package saved for an invalid form")
        }

        fn close(&self) {
            unreachable!("closed after an invalid submit")
        }
    }

    #[tokio::test]
    async fn test_submit_recovers_from_abandoned_busy_form() {
        let mut form = PackageForm::seeded(None);
        // a previous submit future was dropped before finishing
        form.begin_submit();
        assert!(form.is_busy());

        let outcome = submit(&mut form, &Unreachable, &Unreachable).await;

        assert_eq!(
            outcome,
            SubmitOutcome::Rejected("Please select a destination".to_string())
        );
        assert!(!form.is_busy());
        assert_eq!(form.error(), Some("Please select a destination"));
    }

    #[tokio::test]
    async fn test_submit_on_closed_form_is_ignored() {
        let mut form = PackageForm::seeded(None);
        form.close();

        let outcome = submit(&mut form, &Unreachable, &Unreachable).await;

        assert_eq!(outcome, SubmitOutcome::Ignored);
        assert!(form.is_closed());
    }
}
