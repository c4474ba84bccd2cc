//! The caller embedding the editor
//!
//! A host persists the package itself and is told when the editor closes.
//! [`BackendPackageHost`] is the default host used by the command line: it
//! writes packages straight to the REST backend.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::info;

use crate::Result;
use crate::backend::RestBackend;
use crate::models::{Package, PackageDraft};

pub trait PackageHost {
    /// Persist the package and return it with its backend id
    async fn save_package(&self, draft: PackageDraft) -> Result<Package>;

    /// The editor finished successfully and should be dismissed
    fn close(&self);
}

impl<T: PackageHost> PackageHost for &T {
    async fn save_package(&self, draft: PackageDraft) -> Result<Package> {
        (**self).save_package(draft).await
    }

    fn close(&self) {
        (**self).close();
    }
}

/// Saves packages through [`RestBackend`]: insert when the draft is new,
/// update otherwise.
pub struct BackendPackageHost<'a> {
    backend: &'a RestBackend,
    closed: AtomicBool,
}

impl<'a> BackendPackageHost<'a> {
    pub fn new(backend: &'a RestBackend) -> Self {
        Self {
            backend,
            closed: AtomicBool::new(false),
        }
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl PackageHost for BackendPackageHost<'_> {
    async fn save_package(&self, draft: PackageDraft) -> Result<Package> {
        if draft.is_new() {
            self.backend.insert_package(&draft).await
        } else {
            self.backend.update_package(&draft).await
        }
    }

    fn close(&self) {
        info!("Package editor closed");
        self.closed.store(true, Ordering::SeqCst);
    }
}
