//! Constants used throughout the patient management core crate.

/// Default file for patient data storage when no explicit file is configured.
pub const DEFAULT_PATIENT_DATA_FILE: &str = "patients.json";

/// Exclusive lower bound for a patient's age in years.
pub const MIN_AGE_EXCLUSIVE: i64 = 0;

/// Exclusive upper bound for a patient's age in years.
pub const MAX_AGE_EXCLUSIVE: i64 = 120;

/// Stored heights are centimeters; BMI needs meters.
pub const CENTIMETERS_PER_METER: f64 = 100.0;

/// Field names accepted by sort operations.
pub const SORTABLE_FIELDS: [&str; 3] = ["height", "weight", "bmi"];
