use serde::{Deserialize, Serialize};

use crate::models::FilterCriteria;

/// Which search surface an entity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Listing,
    Candidate,
}

/// Normalized search result record.
///
/// One fixed contract for both rental listings and roommate candidates,
/// regardless of which field names or shapes the backend used. Tag lists
/// are always materialized as string vectors, never raw delimited strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Identity field, present on every adapted record.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub age: Option<i64>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub rent: Option<i64>,
    #[serde(rename = "BHK", default)]
    pub bhk: Option<String>,
    #[serde(rename = "furnishingType", default)]
    pub furnishing_type: Option<String>,
    #[serde(rename = "houseType", default)]
    pub house_type: Option<String>,
    #[serde(rename = "areaSize", default)]
    pub area_size: Option<String>,
    #[serde(rename = "parkingArea", default)]
    pub parking_area: Option<String>,
    #[serde(rename = "transportAvailability", default)]
    pub transport_availability: Option<bool>,
    #[serde(default)]
    pub family: Option<bool>,
    #[serde(rename = "minStayDuration", default)]
    pub min_stay_months: Option<i64>,
    #[serde(rename = "foodPreference", default)]
    pub food_preference: Option<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(rename = "nearbyPlaces", default)]
    pub nearby_places: Vec<String>,
    /// Personality trait flags that were set on the raw record.
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Ordered image URLs, possibly empty.
    #[serde(default)]
    pub images: Vec<String>,
}

impl Entity {
    pub fn new(kind: EntityKind, id: String) -> Self {
        Self {
            kind,
            id,
            name: String::new(),
            city: String::new(),
            locality: None,
            age: None,
            gender: None,
            rent: None,
            bhk: None,
            furnishing_type: None,
            house_type: None,
            area_size: None,
            parking_area: None,
            transport_availability: None,
            family: None,
            min_stay_months: None,
            food_preference: None,
            hobbies: Vec::new(),
            allergies: Vec::new(),
            nearby_places: Vec::new(),
            traits: Vec::new(),
            description: None,
            images: Vec::new(),
        }
    }
}

/// Persisted cache entry: the last search's filters and results for a scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    #[serde(rename = "scopeId")]
    pub scope_id: String,
    pub filters: FilterCriteria,
    pub results: Vec<Entity>,
    #[serde(rename = "storedAt")]
    pub stored_at: chrono::DateTime<chrono::Utc>,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "senderId")]
    pub sender_id: String,
    pub body: String,
}

/// Autocomplete option from the city lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityOption {
    pub label: String,
    pub value: String,
}
