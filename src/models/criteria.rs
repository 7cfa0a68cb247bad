use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

/// Search filter criteria covering both listing and roommate searches.
///
/// Every field is optional; absent, empty-string and `"Any"` values are
/// treated as "no constraint". The schema is closed: unknown keys on the
/// wire are ignored. Numeric fields are signed so that non-negativity is
/// a validation rule rather than a silent truncation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = crate::core::validate::filter_rules))]
pub struct FilterCriteria {
    #[serde(deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub locality: Option<String>,

    // Listing filters
    #[serde(rename = "BHK", deserialize_with = "lenient_string")]
    pub bhk: Option<String>,
    #[serde(rename = "rentLowerBound", deserialize_with = "lenient_i64")]
    pub rent_lower: Option<i64>,
    #[serde(rename = "rentUpperBound", deserialize_with = "lenient_i64")]
    pub rent_upper: Option<i64>,
    #[serde(rename = "furnishingType", deserialize_with = "lenient_string")]
    pub furnishing_type: Option<String>,
    #[serde(rename = "areaSize", deserialize_with = "lenient_string")]
    pub area_size: Option<String>,
    #[serde(rename = "transportAvailability", deserialize_with = "lenient_bool")]
    pub transport_availability: Option<bool>,
    #[serde(rename = "houseType", deserialize_with = "lenient_string")]
    pub house_type: Option<String>,
    #[serde(rename = "nearbyPlaces", deserialize_with = "lenient_tags")]
    pub nearby_places: Vec<String>,
    #[serde(rename = "googleLink", deserialize_with = "lenient_string")]
    pub google_link: Option<String>,

    // Roommate filters
    #[serde(deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(rename = "minAge", deserialize_with = "lenient_i64")]
    pub min_age: Option<i64>,
    #[serde(rename = "maxAge", deserialize_with = "lenient_i64")]
    pub max_age: Option<i64>,
    #[serde(rename = "foodPreference", deserialize_with = "lenient_string")]
    pub food_preference: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub religion: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub alcohol: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub smoking: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub nationality: Option<String>,
    #[serde(rename = "professionalStatus", deserialize_with = "lenient_string")]
    pub professional_status: Option<String>,
    #[serde(rename = "maritalStatus", deserialize_with = "lenient_string")]
    pub marital_status: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub family: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    pub language: Option<String>,
    #[serde(rename = "minStayDuration", deserialize_with = "lenient_i64")]
    pub min_stay_months: Option<i64>,
    #[serde(deserialize_with = "lenient_tags")]
    pub hobbies: Vec<String>,
    #[serde(deserialize_with = "lenient_tags")]
    pub allergies: Vec<String>,

    // Personality trait flags
    #[serde(rename = "nightOwl", deserialize_with = "lenient_bool")]
    pub night_owl: Option<bool>,
    #[serde(rename = "earlybird", deserialize_with = "lenient_bool")]
    pub early_bird: Option<bool>,
    #[serde(rename = "Pet_lover", deserialize_with = "lenient_bool")]
    pub pet_lover: Option<bool>,
    #[serde(rename = "fitness_freak", deserialize_with = "lenient_bool")]
    pub fitness_freak: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub studious: Option<bool>,
    #[serde(rename = "party_lover", deserialize_with = "lenient_bool")]
    pub party_lover: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub sporty: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    pub traveller: Option<bool>,
    #[serde(rename = "music_lover", deserialize_with = "lenient_bool")]
    pub music_lover: Option<bool>,

    #[serde(deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from an arbitrary JSON object.
    ///
    /// Unknown keys are ignored, numbers and booleans arriving as strings
    /// are coerced, malformed values degrade to "unset" instead of failing.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Criteria with only a city set, used for initial loads.
    pub fn for_city(city: &str) -> Self {
        Self {
            city: Some(city.trim().to_string()),
            ..Self::default()
        }
    }
}

fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(coerce_string))
}

fn lenient_i64<'de, D>(de: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(coerce_i64))
}

fn lenient_bool<'de, D>(de: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(value.as_ref().and_then(coerce_bool))
}

fn lenient_tags<'de, D>(de: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_string).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_coerces_string_numbers() {
        let criteria = FilterCriteria::from_value(json!({
            "city": "Pune",
            "minAge": "18",
            "maxAge": 30,
        }));

        assert_eq!(criteria.city.as_deref(), Some("Pune"));
        assert_eq!(criteria.min_age, Some(18));
        assert_eq!(criteria.max_age, Some(30));
    }

    #[test]
    fn test_from_value_ignores_unknown_keys() {
        let criteria = FilterCriteria::from_value(json!({
            "city": "Pune",
            "someFutureField": {"nested": true},
        }));

        assert_eq!(criteria.city.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_from_value_splits_comma_joined_tags() {
        let criteria = FilterCriteria::from_value(json!({
            "city": "Pune",
            "hobbies": "Reading, Gaming, ",
        }));

        assert_eq!(criteria.hobbies, vec!["Reading", "Gaming"]);
    }

    #[test]
    fn test_from_value_malformed_value_degrades_to_unset() {
        let criteria = FilterCriteria::from_value(json!({
            "city": "Pune",
            "minAge": {"weird": true},
        }));

        assert_eq!(criteria.min_age, None);
        assert_eq!(criteria.city.as_deref(), Some("Pune"));
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let criteria = FilterCriteria::from_value(json!({
            "city": "  ",
            "locality": "",
        }));

        assert_eq!(criteria.city, None);
        assert_eq!(criteria.locality, None);
    }
}
