use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::FilterCriteria;

/// Sentinel used by enum-like selects to mean "no constraint".
const ANY_SENTINEL: &str = "any";

/// Default rent bounds substituted when the criteria leave them unset.
pub const DEFAULT_RENT_LOWER: i64 = 0;
pub const DEFAULT_RENT_UPPER: i64 = 100_000;

/// Canonicalize filter criteria into a deterministic cache key.
///
/// Builds a fixed-schema projection with explicit defaults for every
/// recognized field, sorts order-irrelevant tag lists, and serializes it
/// as sorted-key JSON. Two criteria that are filter-equivalent (differing
/// only in field presence, whitespace, array order or default sentinels)
/// produce an identical key; any effective difference changes the key.
///
/// Pure and total: never fails, never touches the network or the store.
pub fn normalize(criteria: &FilterCriteria) -> String {
    let mut proj: BTreeMap<&'static str, Value> = BTreeMap::new();

    proj.insert("city", city_value(&criteria.city));
    proj.insert("locality", text_value(&criteria.locality));

    // Listing fields
    proj.insert("bhk", text_value(&criteria.bhk));
    proj.insert(
        "rentLowerBound",
        Value::from(criteria.rent_lower.unwrap_or(DEFAULT_RENT_LOWER)),
    );
    proj.insert(
        "rentUpperBound",
        Value::from(criteria.rent_upper.unwrap_or(DEFAULT_RENT_UPPER)),
    );
    proj.insert("furnishingType", choice_value(&criteria.furnishing_type));
    proj.insert("areaSize", text_value(&criteria.area_size));
    proj.insert(
        "transportAvailability",
        tri_state_value(criteria.transport_availability),
    );
    proj.insert("houseType", choice_value(&criteria.house_type));
    proj.insert("nearbyPlaces", tag_value(&criteria.nearby_places));
    proj.insert("googleLink", text_value(&criteria.google_link));

    // Roommate fields
    proj.insert("gender", choice_value(&criteria.gender));
    proj.insert("minAge", Value::from(criteria.min_age));
    proj.insert("maxAge", Value::from(criteria.max_age));
    proj.insert("foodPreference", choice_value(&criteria.food_preference));
    proj.insert("religion", choice_value(&criteria.religion));
    proj.insert("alcohol", flag_value(criteria.alcohol));
    proj.insert("smoking", flag_value(criteria.smoking));
    proj.insert("nationality", text_value(&criteria.nationality));
    proj.insert(
        "professionalStatus",
        choice_value(&criteria.professional_status),
    );
    proj.insert("maritalStatus", choice_value(&criteria.marital_status));
    proj.insert("family", tri_state_value(criteria.family));
    proj.insert("language", text_value(&criteria.language));
    proj.insert("minStayDuration", Value::from(criteria.min_stay_months));
    proj.insert("hobbies", tag_value(&criteria.hobbies));
    proj.insert("allergies", tag_value(&criteria.allergies));

    // Personality trait flags
    proj.insert("nightOwl", flag_value(criteria.night_owl));
    proj.insert("earlybird", flag_value(criteria.early_bird));
    proj.insert("petLover", flag_value(criteria.pet_lover));
    proj.insert("fitnessFreak", flag_value(criteria.fitness_freak));
    proj.insert("studious", flag_value(criteria.studious));
    proj.insert("partyLover", flag_value(criteria.party_lover));
    proj.insert("sporty", flag_value(criteria.sporty));
    proj.insert("traveller", flag_value(criteria.traveller));
    proj.insert("musicLover", flag_value(criteria.music_lover));

    proj.insert("description", text_value(&criteria.description));

    // BTreeMap keys serialize in sorted order; serializing a map of plain
    // JSON values cannot fail.
    serde_json::to_string(&proj).unwrap_or_default()
}

/// City comparison is case-insensitive; unset becomes the empty string.
fn city_value(city: &Option<String>) -> Value {
    Value::String(
        city.as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default(),
    )
}

/// Free-text field: trimmed, unset and empty are equivalent.
fn text_value(text: &Option<String>) -> Value {
    Value::String(
        text.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("")
            .to_string(),
    )
}

/// Enum-like select: the "Any" sentinel collapses to unset.
fn choice_value(choice: &Option<String>) -> Value {
    Value::String(
        choice
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ANY_SENTINEL))
            .unwrap_or("")
            .to_string(),
    )
}

/// Checkbox flag: unset is equivalent to unchecked.
fn flag_value(flag: Option<bool>) -> Value {
    Value::Bool(flag.unwrap_or(false))
}

/// Tri-state field where "unset" genuinely differs from both yes and no.
fn tri_state_value(flag: Option<bool>) -> Value {
    Value::from(flag)
}

/// Order-irrelevant tag list: trimmed, empties dropped, sorted.
fn tag_value(tags: &[String]) -> Value {
    let mut cleaned: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    cleaned.sort();
    Value::from(cleaned)
}
