use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

use crate::models::FilterCriteria;

/// Schema-level validation for [`FilterCriteria`].
///
/// Checks run in a fixed order and stop at the first violated rule, so
/// the surfaced message is deterministic. Wired into the `Validate`
/// derive on the criteria struct.
pub fn filter_rules(criteria: &FilterCriteria) -> Result<(), ValidationError> {
    if criteria
        .city
        .as_deref()
        .map_or(true, |s| s.trim().is_empty())
    {
        return Err(rule("city_required", "City is required"));
    }

    if criteria.min_age.is_some_and(|age| age < 0) {
        return Err(rule("min_age_negative", "Minimum age cannot be negative"));
    }
    if criteria.max_age.is_some_and(|age| age < 0) {
        return Err(rule("max_age_negative", "Maximum age cannot be negative"));
    }
    if let (Some(min), Some(max)) = (criteria.min_age, criteria.max_age) {
        if min > max {
            return Err(rule(
                "age_range_inverted",
                "Minimum age cannot be greater than maximum age",
            ));
        }
    }

    if criteria.min_stay_months.is_some_and(|months| months < 0) {
        return Err(rule(
            "min_stay_negative",
            "Minimum stay duration cannot be negative",
        ));
    }

    if criteria.rent_lower.is_some_and(|rent| rent < 0)
        || criteria.rent_upper.is_some_and(|rent| rent < 0)
    {
        return Err(rule("rent_negative", "Rent bounds cannot be negative"));
    }
    if let (Some(lower), Some(upper)) = (criteria.rent_lower, criteria.rent_upper) {
        if lower > upper {
            return Err(rule(
                "rent_range_inverted",
                "Minimum rent cannot be greater than maximum rent",
            ));
        }
    }

    Ok(())
}

/// Extract the first violated rule's user-facing message.
pub fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|field| field.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| "Invalid filters".to_string())
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}
