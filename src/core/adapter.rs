use serde_json::Value;

use crate::models::{ChatMessage, Entity, EntityKind};

/// Field alias tables, probed in priority order: the first defined value
/// wins. Different backend deployments have historically used different
/// names for the same concept.
const IDENTITY_ALIASES: &[&str] = &["email", "emailId", "contact"];
const NAME_ALIASES: &[&str] = &["username", "name", "fullName"];
const GENDER_ALIASES: &[&str] = &["gender", "sex", "Gender"];
const DESCRIPTION_ALIASES: &[&str] = &["description", "descriptions"];
const IMAGE_ALIASES: &[&str] = &["imgLink", "images", "image", "profilePic"];
const SENDER_ALIASES: &[&str] = &["senderId", "senderEmail", "sender"];
const BODY_ALIASES: &[&str] = &["body", "text", "message"];

/// Personality trait flags carried through verbatim from the raw record.
const TRAIT_KEYS: &[&str] = &[
    "nightOwl",
    "earlybird",
    "Pet_lover",
    "fitness_freak",
    "studious",
    "party_lover",
    "sporty",
    "traveller",
    "music_lover",
];

/// Adapt a raw listing-search payload into normalized entities.
///
/// Tolerates any of the known wrapper shapes and drops records that have
/// no derivable identity instead of failing the batch. Never panics.
pub fn adapt_listings(raw: &Value) -> Vec<Entity> {
    items_of(raw)
        .iter()
        .filter_map(|record| adapt_record(record, EntityKind::Listing))
        .collect()
}

/// Adapt a raw roommate-search payload into normalized entities.
pub fn adapt_candidates(raw: &Value) -> Vec<Entity> {
    items_of(raw)
        .iter()
        .filter_map(|record| adapt_record(record, EntityKind::Candidate))
        .collect()
}

/// Adapt a raw conversation payload into an ordered message list.
///
/// Messages without a body are dropped; a missing or malformed payload
/// yields an empty conversation.
pub fn adapt_conversation(raw: &Value) -> Vec<ChatMessage> {
    let container = raw
        .pointer("/data/data")
        .or_else(|| raw.get("data"))
        .unwrap_or(raw);

    let Some(messages) = container.get("messages").and_then(Value::as_array) else {
        return Vec::new();
    };

    messages
        .iter()
        .filter_map(|msg| {
            let body = probe_string(msg, BODY_ALIASES)?;
            Some(ChatMessage {
                sender_id: probe_string(msg, SENDER_ALIASES).unwrap_or_default(),
                body,
            })
        })
        .collect()
}

/// Unwrap the record list from whichever wrapper the backend used.
///
/// Probing order: bare array, `data.data`, `data.roommates`, `data`.
fn items_of(raw: &Value) -> Vec<Value> {
    if let Some(items) = raw.as_array() {
        return items.clone();
    }
    let Some(data) = raw.get("data") else {
        return Vec::new();
    };
    for candidate in [data.get("data"), data.get("roommates"), Some(data)] {
        if let Some(items) = candidate.and_then(Value::as_array) {
            return items.clone();
        }
    }
    Vec::new()
}

fn adapt_record(record: &Value, kind: EntityKind) -> Option<Entity> {
    let Some(id) = probe_string(record, IDENTITY_ALIASES) else {
        tracing::warn!("dropping record with no derivable identity");
        return None;
    };

    let mut entity = Entity::new(kind, id);
    entity.name = probe_string(record, NAME_ALIASES).unwrap_or_default();
    entity.city = field_string(record, "city").unwrap_or_default();
    entity.locality = field_string(record, "locality");
    entity.age = field_i64(record, "age");
    entity.gender = probe_string(record, GENDER_ALIASES);
    entity.rent = field_i64(record, "rent");
    entity.bhk = field_string(record, "BHK");
    entity.furnishing_type = field_string(record, "furnishingType");
    entity.house_type = field_string(record, "houseType");
    entity.area_size = field_string(record, "areaSize");
    entity.parking_area = field_string(record, "parkingArea");
    entity.transport_availability = field_bool(record, "transportAvailability");
    entity.family = field_bool(record, "family");
    entity.min_stay_months = field_i64(record, "minStayDuration");
    entity.food_preference = field_string(record, "foodPreference");
    entity.hobbies = tag_list(record.get("hobbies"));
    entity.allergies = tag_list(record.get("allergies"));
    entity.nearby_places = tag_list(record.get("nearbyPlaces"));
    entity.traits = TRAIT_KEYS
        .iter()
        .filter(|key| field_bool(record, key).unwrap_or(false))
        .map(|key| key.to_string())
        .collect();
    entity.description = probe_string(record, DESCRIPTION_ALIASES);
    entity.images = image_list(probe(record, IMAGE_ALIASES));

    Some(entity)
}

/// Probe aliased keys in priority order, returning the first defined value.
fn probe<'a>(record: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| record.get(key))
        .find(|v| !v.is_null())
}

fn probe_string(record: &Value, aliases: &[&str]) -> Option<String> {
    probe(record, aliases).and_then(coerce_string)
}

fn field_string(record: &Value, key: &str) -> Option<String> {
    record.get(key).and_then(coerce_string)
}

fn field_i64(record: &Value, key: &str) -> Option<i64> {
    match record.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn field_bool(record: &Value, key: &str) -> Option<bool> {
    match record.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Some(true),
            "false" | "no" => Some(false),
            _ => None,
        },
        _ => None,
    }
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

/// Materialize a tag-list field as an ordered string vector.
///
/// Arrays pass through element-wise; comma-joined strings are split,
/// trimmed and stripped of empties; anything else yields an empty list.
fn tag_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_string).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Image references arrive as an array of URLs or a single URL string.
fn image_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(coerce_string).collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
