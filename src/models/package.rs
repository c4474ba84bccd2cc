//! Package model and the save payload built from the form

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::DestinationId;

/// Nullable columns come back as `null`; treat them like missing ones.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend-assigned package identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(pub i64);

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted travel package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub destination_id: DestinationId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Length of the package in days
    pub duration: u32,
    pub price: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Package fields as submitted by the form.
///
/// `id` is set when an existing package is being edited and left out of the
/// serialized body otherwise, so the backend assigns one on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PackageId>,
    pub destination_id: DestinationId,
    pub title: String,
    pub description: String,
    pub duration: u32,
    pub price: f64,
    pub rating: f64,
    pub image_url: String,
}

impl PackageDraft {
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

impl Package {
    /// Format price for display
    #[must_use]
    pub fn format_price(&self) -> String {
        format!("{:.2}", self.price)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "#{} {}", self.id, self.title)?;
        writeln!(
            f,
            "   {} days, {} (rating {:.1})",
            self.duration,
            self.format_price(),
            self.rating
        )?;
        if !self.description.is_empty() {
            writeln!(f, "   {}", self.description)?;
        }
        Ok(())
    }
}
