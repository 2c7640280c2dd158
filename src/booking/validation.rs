//! Field validation for the booking draft

use super::draft::BookingDraft;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Minimum trimmed length of a location under the strict profile
pub const MIN_LOCATION_LEN: usize = 3;

pub const SAME_LOCATION_MESSAGE: &str = "Pickup and Destination cannot be the same.";

/// Which rule set the form enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationProfile {
    /// Presence checks only
    Basic,
    /// Presence, length and character set checks
    Strict,
    /// Strict checks plus pickup and destination must differ
    #[default]
    StrictDistinct,
}

/// A validated location field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Pickup,
    Destination,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Pickup => "Pickup",
            Field::Destination => "Destination",
        }
    }

    fn missing_message(&self, profile: ValidationProfile) -> String {
        match (profile, self) {
            (ValidationProfile::Basic, Field::Pickup) => "Please enter a pickup location.".to_string(),
            (ValidationProfile::Basic, Field::Destination) => "Please enter a destination.".to_string(),
            _ => format!("{} is required.", self.label()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inline error text per field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub pickup: Option<String>,
    pub destination: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.pickup.is_none() && self.destination.is_none()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Pickup => self.pickup.as_deref(),
            Field::Destination => self.destination.as_deref(),
        }
    }

    pub fn clear(&mut self) {
        self.pickup = None;
        self.destination = None;
    }

    /// Errors in field order, labelled
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        [Field::Pickup, Field::Destination]
            .into_iter()
            .filter_map(move |field| self.get(field).map(|e| (field, e)))
    }
}

fn location_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z\s]+$").expect("location pattern is valid"))
}

/// Check a single field in isolation, returning the first failing rule
pub fn validate_field(field: Field, value: &str, profile: ValidationProfile) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(field.missing_message(profile));
    }

    if profile == ValidationProfile::Basic {
        return None;
    }

    if trimmed.chars().count() < MIN_LOCATION_LEN {
        return Some(format!(
            "{} must be at least {} characters long.",
            field.label(),
            MIN_LOCATION_LEN
        ));
    }

    if !location_pattern().is_match(value) {
        return Some(format!("{} can only contain letters and spaces.", field.label()));
    }

    None
}

/// Trim and case-fold comparison of the two locations
pub fn same_location(pickup: &str, destination: &str) -> bool {
    pickup.trim().to_lowercase() == destination.trim().to_lowercase()
}

/// Destination error, including the duplicate check when the profile asks for it
pub fn validate_destination(draft: &BookingDraft, profile: ValidationProfile) -> Option<String> {
    if let Some(error) = validate_field(Field::Destination, &draft.destination, profile) {
        return Some(error);
    }

    let pickup_ok = validate_field(Field::Pickup, &draft.pickup, profile).is_none();
    if profile == ValidationProfile::StrictDistinct
        && pickup_ok
        && same_location(&draft.pickup, &draft.destination)
    {
        return Some(SAME_LOCATION_MESSAGE.to_string());
    }

    None
}

/// Validate the whole draft
pub fn validate_draft(draft: &BookingDraft, profile: ValidationProfile) -> ValidationErrors {
    ValidationErrors {
        pickup: validate_field(Field::Pickup, &draft.pickup, profile),
        destination: validate_destination(draft, profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::ride::RideType;

    fn draft(pickup: &str, destination: &str) -> BookingDraft {
        BookingDraft::new(pickup, destination, RideType::Single)
    }

    #[test]
    fn test_required_fields() {
        for blank in ["", "   ", "\t"] {
            let errors = validate_draft(&draft(blank, blank), ValidationProfile::StrictDistinct);
            assert_eq!(errors.pickup.as_deref(), Some("Pickup is required."));
            assert_eq!(errors.destination.as_deref(), Some("Destination is required."));
        }
    }

    #[test]
    fn test_minimum_length_is_trimmed() {
        let error = validate_field(Field::Pickup, "  ab  ", ValidationProfile::Strict);
        assert_eq!(error.as_deref(), Some("Pickup must be at least 3 characters long."));
        assert!(validate_field(Field::Pickup, "Yab", ValidationProfile::Strict).is_none());
    }

    #[test]
    fn test_character_set() {
        for value in ["Lagos 2", "Ikeja!", "Yaba-Ikoyi", "Lekki_Phase"] {
            let error = validate_field(Field::Destination, value, ValidationProfile::Strict);
            assert_eq!(
                error.as_deref(),
                Some("Destination can only contain letters and spaces."),
                "{value}"
            );
        }
        assert!(validate_field(Field::Destination, "Victoria Island", ValidationProfile::Strict).is_none());
    }

    #[test]
    fn test_same_location_rejected() {
        let errors = validate_draft(&draft("Lagos", "Lagos"), ValidationProfile::StrictDistinct);
        assert!(errors.pickup.is_none());
        assert_eq!(errors.destination.as_deref(), Some(SAME_LOCATION_MESSAGE));

        let errors = validate_draft(&draft("  lagos ", "LAGOS"), ValidationProfile::StrictDistinct);
        assert_eq!(errors.destination.as_deref(), Some(SAME_LOCATION_MESSAGE));

        // Only the distinct profile compares the two fields
        let errors = validate_draft(&draft("Lagos", "Lagos"), ValidationProfile::Strict);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_basic_profile_only_checks_presence() {
        let errors = validate_draft(&draft("1", ""), ValidationProfile::Basic);
        assert!(errors.pickup.is_none());
        assert_eq!(errors.destination.as_deref(), Some("Please enter a destination."));
    }

    #[test]
    fn test_valid_distinct_locations() {
        let errors = validate_draft(&draft("Ikeja", "Yaba"), ValidationProfile::StrictDistinct);
        assert!(errors.is_empty());
        assert_eq!(errors.iter().count(), 0);
    }
}
