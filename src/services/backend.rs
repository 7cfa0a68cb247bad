use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{CityOption, FilterCriteria};

/// Errors from the remote search/chat collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    Api(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Remote search collaborator.
///
/// Raw payloads are returned as untyped JSON; shape tolerance lives in
/// the response adapter, not here.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn fetch_listings(&self, criteria: &FilterCriteria) -> Result<Value, BackendError>;
    async fn fetch_candidates(&self, criteria: &FilterCriteria) -> Result<Value, BackendError>;
    async fn lookup_cities(&self, query: &str) -> Result<Vec<CityOption>, BackendError>;
}

/// Remote chat collaborator. Ack content beyond success/failure is unused.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn fetch_conversation(&self, peer_id: &str) -> Result<Value, BackendError>;
    async fn send_message(&self, peer_id: &str, body: &str) -> Result<(), BackendError>;
}

/// HTTP implementation of both collaborator traits.
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, url: &str) -> Result<Value, BackendError> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(format!(
                "Request to {} failed: {}",
                url,
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn fetch_listings(&self, criteria: &FilterCriteria) -> Result<Value, BackendError> {
        let url = format!(
            "{}?{}",
            self.url("/properties/search"),
            encode_query(&query_params(criteria))
        );
        self.get_json(&url).await
    }

    async fn fetch_candidates(&self, criteria: &FilterCriteria) -> Result<Value, BackendError> {
        let url = format!(
            "{}?{}",
            self.url("/roommates/search"),
            encode_query(&query_params(criteria))
        );
        self.get_json(&url).await
    }

    async fn lookup_cities(&self, query: &str) -> Result<Vec<CityOption>, BackendError> {
        let url = format!(
            "{}?q={}",
            self.url("/cities"),
            urlencoding::encode(query.trim())
        );
        let json = self.get_json(&url).await?;

        let items = json
            .as_array()
            .or_else(|| json.get("data").and_then(Value::as_array))
            .ok_or_else(|| BackendError::InvalidResponse("Missing city list".into()))?;

        serde_json::from_value(Value::Array(items.clone()))
            .map_err(|e| BackendError::InvalidResponse(format!("Failed to parse cities: {}", e)))
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn fetch_conversation(&self, peer_id: &str) -> Result<Value, BackendError> {
        let url = self.url(&format!("/chat/{}", urlencoding::encode(peer_id)));
        self.get_json(&url).await
    }

    async fn send_message(&self, peer_id: &str, body: &str) -> Result<(), BackendError> {
        let url = self.url(&format!("/chat/{}/messages", urlencoding::encode(peer_id)));
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Api(format!(
                "Failed to send message: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Project the effective (non-default) criteria fields into wire params.
///
/// Mirrors what the backend expects: city lowercased, "Any" selections
/// omitted, tag lists comma-joined, unset fields absent.
fn query_params(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let Some(city) = effective(&criteria.city) {
        params.push(("city", city.to_lowercase()));
    }
    if let Some(locality) = effective(&criteria.locality) {
        params.push(("locality", locality));
    }
    if let Some(bhk) = effective(&criteria.bhk) {
        params.push(("BHK", bhk));
    }
    if let Some(rent) = criteria.rent_lower {
        params.push(("rentLowerBound", rent.to_string()));
    }
    if let Some(rent) = criteria.rent_upper {
        params.push(("rentUpperBound", rent.to_string()));
    }
    if let Some(furnishing) = effective_choice(&criteria.furnishing_type) {
        params.push(("furnishingType", furnishing));
    }
    if let Some(area) = effective(&criteria.area_size) {
        params.push(("areaSize", area));
    }
    if let Some(transport) = criteria.transport_availability {
        params.push(("transportAvailability", transport.to_string()));
    }
    if let Some(house) = effective_choice(&criteria.house_type) {
        params.push(("houseType", house));
    }
    if !criteria.nearby_places.is_empty() {
        params.push(("nearbyPlaces", criteria.nearby_places.join(",")));
    }
    if let Some(gender) = effective_choice(&criteria.gender) {
        params.push(("gender", gender));
    }
    if let Some(age) = criteria.min_age {
        params.push(("minAge", age.to_string()));
    }
    if let Some(age) = criteria.max_age {
        params.push(("maxAge", age.to_string()));
    }
    if let Some(food) = effective_choice(&criteria.food_preference) {
        params.push(("foodPreference", food));
    }
    if let Some(religion) = effective_choice(&criteria.religion) {
        params.push(("religion", religion));
    }
    if let Some(alcohol) = criteria.alcohol {
        params.push(("alcohol", alcohol.to_string()));
    }
    if let Some(smoking) = criteria.smoking {
        params.push(("smoking", smoking.to_string()));
    }
    if let Some(nationality) = effective(&criteria.nationality) {
        params.push(("nationality", nationality));
    }
    if let Some(status) = effective_choice(&criteria.professional_status) {
        params.push(("professionalStatus", status));
    }
    if let Some(status) = effective_choice(&criteria.marital_status) {
        params.push(("maritalStatus", status));
    }
    if let Some(family) = criteria.family {
        params.push(("family", family.to_string()));
    }
    if let Some(language) = effective(&criteria.language) {
        params.push(("language", language));
    }
    if let Some(months) = criteria.min_stay_months {
        params.push(("minStayDuration", months.to_string()));
    }
    if !criteria.hobbies.is_empty() {
        params.push(("hobbies", criteria.hobbies.join(",")));
    }
    if !criteria.allergies.is_empty() {
        params.push(("allergies", criteria.allergies.join(",")));
    }

    let flags = [
        ("nightOwl", criteria.night_owl),
        ("earlybird", criteria.early_bird),
        ("Pet_lover", criteria.pet_lover),
        ("fitness_freak", criteria.fitness_freak),
        ("studious", criteria.studious),
        ("party_lover", criteria.party_lover),
        ("sporty", criteria.sporty),
        ("traveller", criteria.traveller),
        ("music_lover", criteria.music_lover),
    ];
    for (key, flag) in flags {
        if let Some(value) = flag {
            params.push((key, value.to_string()));
        }
    }

    if let Some(description) = effective(&criteria.description) {
        params.push(("description", description));
    }

    params
}

fn encode_query(params: &[(&'static str, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn effective(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn effective_choice(field: &Option<String>) -> Option<String> {
    effective(field).filter(|s| !s.eq_ignore_ascii_case("any"))
}
