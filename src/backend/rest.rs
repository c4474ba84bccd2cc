//! PostgREST client for the hosted package database
//!
//! Tables are addressed as `{url}/rest/v1/{table}`, rows are filtered with
//! `column=eq.value` and every request carries the project key both as
//! `apikey` and as a bearer token.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::PackageBackend;
use crate::config::{TablesConfig, TravelPackConfig};
use crate::error::{GENERIC_SAVE_ERROR, PackageError};
use crate::models::{
    Destination, DestinationId, Itinerary, ItineraryPayload, Package, PackageDraft, PackageId,
    Place,
};
use crate::Result;

const REST_PREFIX: &str = "rest/v1";

/// Error body returned by PostgREST and the gateway in front of it
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
    msg: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        [self.message, self.msg, self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

/// Pull a readable message out of an error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(ErrorBody::into_message)
        .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string())
}

/// Hosted backend reached over HTTP
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
    tables: TablesConfig,
}

impl RestBackend {
    /// Create a new backend client
    pub fn new(config: &TravelPackConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_seconds.into()))
            .user_agent(concat!("travelpack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PackageError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.backend.url.trim_end_matches('/').to_string(),
            api_key: config.backend.api_key.clone().unwrap_or_default(),
            tables: config.tables.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PREFIX, table)
    }

    fn filtered_url(&self, table: &str, column: &str, value: impl ToString) -> String {
        format!(
            "{}?{}=eq.{}&select=*",
            self.table_url(table),
            column,
            urlencoding::encode(&value.to_string())
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut request = self.client.request(method, url);
        if !self.api_key.is_empty() {
            request = request
                .header("apikey", &self.api_key)
                .bearer_auth(&self.api_key);
        }
        request
    }

    /// Send and fail on any non-success status, keeping the backend's message.
    async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        let start_time = Instant::now();
        let response = request.send().await?;
        let status = response.status();

        debug!(
            "Backend responded {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        warn!("Backend request failed with {}: {}", status, message);
        Err(PackageError::backend(status.as_u16(), message))
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, url: &str) -> Result<Vec<T>> {
        let response = self.execute(self.request(Method::GET, url)).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| PackageError::decode(format!("Failed to parse rows: {e}")))
    }

    async fn write_returning<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: &impl serde::Serialize,
    ) -> Result<Vec<T>> {
        let request = self
            .request(method, url)
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.execute(request).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| PackageError::decode(format!("Failed to parse written rows: {e}")))
    }

    /// Destinations available for selection
    #[instrument(skip(self))]
    pub async fn list_destinations(&self) -> Result<Vec<Destination>> {
        let url = format!("{}?select=id,name&order=name", self.table_url(&self.tables.destinations));
        let destinations: Vec<Destination> = self.fetch_rows(&url).await?;
        info!("Loaded {} destinations", destinations.len());
        Ok(destinations)
    }

    #[instrument(skip(self))]
    pub async fn fetch_package(&self, package_id: PackageId) -> Result<Option<Package>> {
        let url = self.filtered_url(&self.tables.packages, "id", package_id);
        let packages: Vec<Package> = self.fetch_rows(&url).await?;
        Ok(packages.into_iter().next())
    }

    /// Insert a new package and return it with its assigned id
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn insert_package(&self, draft: &PackageDraft) -> Result<Package> {
        let url = self.table_url(&self.tables.packages);
        let rows: Vec<Package> = self.write_returning(Method::POST, &url, draft).await?;
        let package = rows
            .into_iter()
            .next()
            .ok_or_else(|| PackageError::decode("Insert returned no package row"))?;
        info!("Created package {} ({})", package.id, package.title);
        Ok(package)
    }

    /// Update an existing package in place
    #[instrument(skip(self, draft), fields(id = ?draft.id))]
    pub async fn update_package(&self, draft: &PackageDraft) -> Result<Package> {
        let id = draft
            .id
            .ok_or_else(|| PackageError::save("Cannot update a package without an id"))?;
        let url = self.filtered_url(&self.tables.packages, "id", id);
        let rows: Vec<Package> = self.write_returning(Method::PATCH, &url, draft).await?;
        let package = rows
            .into_iter()
            .next()
            .ok_or_else(|| PackageError::backend(404, format!("Package {id} not found")))?;
        info!("Updated package {}", package.id);
        Ok(package)
    }
}

impl PackageBackend for RestBackend {
    #[instrument(skip(self))]
    async fn places_for_destination(&self, destination_id: DestinationId) -> Result<Vec<Place>> {
        let url = self.filtered_url(&self.tables.places, "destination_id", destination_id);
        let places: Vec<Place> = self.fetch_rows(&url).await?;
        debug!("Destination {} has {} places", destination_id, places.len());
        Ok(places)
    }

    #[instrument(skip(self))]
    async fn itinerary_for_package(&self, package_id: PackageId) -> Result<Vec<Itinerary>> {
        let url = self.filtered_url(&self.tables.itineraries, "package_id", package_id);
        self.fetch_rows(&url).await
    }

    #[instrument(skip(self, itinerary), fields(package_id = %itinerary.package_id))]
    async fn insert_itinerary(&self, itinerary: &ItineraryPayload) -> Result<()> {
        let url = self.table_url(&self.tables.itineraries);
        let request = self
            .request(Method::POST, &url)
            .header("Prefer", "return=minimal")
            .json(itinerary);
        self.execute(request).await?;
        info!(
            "Inserted {}-day itinerary for package {}",
            itinerary.days, itinerary.package_id
        );
        Ok(())
    }

    #[instrument(skip(self, itinerary), fields(package_id = %itinerary.package_id))]
    async fn update_itinerary(&self, itinerary: &ItineraryPayload) -> Result<()> {
        let url = self.filtered_url(&self.tables.itineraries, "package_id", itinerary.package_id);
        let rows: Vec<Itinerary> = self
            .write_returning(Method::PATCH, &url, itinerary)
            .await?;
        if rows.is_empty() {
            warn!(
                "No itinerary row matched package {}; nothing was updated",
                itinerary.package_id
            );
        } else {
            info!(
                "Updated {}-day itinerary for package {}",
                itinerary.days, itinerary.package_id
            );
        }
        Ok(())
    }
}
