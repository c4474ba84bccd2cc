//! Itinerary rows: one per package, one description per day

use serde::{Deserialize, Serialize};

use super::PackageId;
use super::package::null_as_default;

/// Stored itinerary row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub package_id: PackageId,
    pub days: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub descriptions: Vec<String>,
}

/// Body written on itinerary insert or update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryPayload {
    pub package_id: PackageId,
    pub days: u32,
    pub descriptions: Vec<String>,
}

impl ItineraryPayload {
    #[must_use]
    pub fn new(package_id: PackageId, descriptions: Vec<String>) -> Self {
        Self {
            package_id,
            days: u32::try_from(descriptions.len()).unwrap_or(u32::MAX),
            descriptions,
        }
    }
}
