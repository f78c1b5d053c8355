//! Field-level validation for patient records.
//!
//! Each helper checks a single raw value and returns the typed value on success. Errors are
//! [`PatientError::Validation`] and name the field that failed so callers can surface the
//! message unchanged.

use crate::constants::{MAX_AGE_EXCLUSIVE, MIN_AGE_EXCLUSIVE};
use crate::{NonEmptyText, PatientError, PatientResult};

/// Validates a caller-supplied patient id.
///
/// Ids are used verbatim as storage keys, so they are not trimmed; an id made only of
/// whitespace is rejected.
pub fn validate_patient_id(id: &str) -> PatientResult<()> {
    if id.trim().is_empty() {
        return Err(PatientError::field("id", "cannot be empty"));
    }
    Ok(())
}

/// Validates a required free-text field such as `name` or `city`.
pub fn validate_text(field: &str, value: &str) -> PatientResult<NonEmptyText> {
    NonEmptyText::new(value).map_err(|e| PatientError::field(field, e))
}

/// Validates an age in whole years, exclusive on both bounds.
pub fn validate_age(age: i64) -> PatientResult<u32> {
    if age <= MIN_AGE_EXCLUSIVE || age >= MAX_AGE_EXCLUSIVE {
        return Err(PatientError::field(
            "age",
            format!(
                "must be greater than {MIN_AGE_EXCLUSIVE} and less than {MAX_AGE_EXCLUSIVE}, got {age}"
            ),
        ));
    }
    u32::try_from(age).map_err(|e| PatientError::field("age", e))
}

/// Validates a strictly positive, finite measurement such as `height` or `weight`.
pub fn validate_positive(field: &str, value: f64) -> PatientResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PatientError::field(
            field,
            format!("must be greater than 0, got {value}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_age_bounds_are_exclusive() {
        assert!(validate_age(0).is_err());
        assert_eq!(validate_age(1).unwrap(), 1);
        assert_eq!(validate_age(119).unwrap(), 119);
        assert!(validate_age(120).is_err());
        assert!(validate_age(-5).is_err());
    }

    #[test]
    fn test_validate_positive_rejects_zero_negative_and_non_finite() {
        assert!(validate_positive("height", 0.0).is_err());
        assert!(validate_positive("height", -1.0).is_err());
        assert!(validate_positive("weight", f64::NAN).is_err());
        assert!(validate_positive("weight", f64::INFINITY).is_err());
        assert_eq!(validate_positive("weight", 0.5).unwrap(), 0.5);
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = validate_positive("weight", 0.0).unwrap_err();
        assert!(
            err.to_string().contains("weight"),
            "message should name the field: {err}"
        );
    }

    #[test]
    fn test_validate_patient_id_rejects_blank() {
        assert!(validate_patient_id("").is_err());
        assert!(validate_patient_id("   ").is_err());
        assert!(validate_patient_id("P001").is_ok());
    }

    #[test]
    fn test_validate_text_trims() {
        let city = validate_text("city", " Pune ").unwrap();
        assert_eq!(city.as_str(), "Pune");
        assert!(validate_text("name", "").is_err());
    }
}
