//! Patient record model.
//!
//! A [`Patient`] can only be obtained by validating a [`NewPatient`], so every value of the type
//! satisfies the field constraints:
//!
//! - `id` is non-blank
//! - `name` and `city` are non-empty (trimmed)
//! - `0 < age < 120`
//! - `gender` is one of `Male`, `Female`, `Others`
//! - `height` (centimeters) and `weight` (kilograms) are finite and strictly positive
//!
//! Body mass index and its verdict are derived on demand from `height` and `weight` and are never
//! stored.

use crate::constants::CENTIMETERS_PER_METER;
use crate::validation::{validate_age, validate_patient_id, validate_positive, validate_text};
use crate::{NonEmptyText, PatientError, PatientResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

/// Patient gender as accepted on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Others => "Others",
        }
    }
}

impl FromStr for Gender {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Others" => Ok(Gender::Others),
            other => Err(PatientError::field(
                "gender",
                format!("must be one of 'Male', 'Female', 'Others', got '{other}'"),
            )),
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a body mass index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub enum Verdict {
    Underweight,
    #[serde(rename = "Normal weight")]
    NormalWeight,
    Overweight,
    Obesity,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::NormalWeight => "Normal weight",
            Verdict::Overweight => "Overweight",
            Verdict::Obesity => "Obesity",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computes body mass index from a height in centimeters and a weight in kilograms.
///
/// The result is rounded to two decimal places.
pub fn compute_bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let height_m = height_cm / CENTIMETERS_PER_METER;
    let bmi = weight_kg / (height_m * height_m);
    (bmi * 100.0).round() / 100.0
}

/// Classifies a (rounded) body mass index.
///
/// Values in `[24.9, 25)` and `[29.9, ..)` match neither bounded band and fall through to
/// [`Verdict::Obesity`].
pub fn compute_verdict(bmi: f64) -> Verdict {
    if bmi < 18.5 {
        Verdict::Underweight
    } else if (18.5..24.9).contains(&bmi) {
        Verdict::NormalWeight
    } else if (25.0..29.9).contains(&bmi) {
        Verdict::Overweight
    } else {
        Verdict::Obesity
    }
}

/// Unvalidated patient fields, as supplied by a caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewPatient {
    /// Id of the patient
    #[schema(example = "P001")]
    pub id: String,
    /// Name of the patient
    #[schema(example = "John Doe")]
    pub name: String,
    /// City of the patient
    #[schema(example = "New York")]
    pub city: String,
    /// Age of the patient in years
    #[schema(example = 30)]
    pub age: i64,
    /// Gender of the patient: `Male`, `Female` or `Others`
    #[schema(example = "Male")]
    pub gender: String,
    /// Height of the patient in centimeters
    #[schema(example = 175.5)]
    pub height: f64,
    /// Weight of the patient in kilograms
    #[schema(example = 70.5)]
    pub weight: f64,
}

impl NewPatient {
    /// Checks every field and builds a [`Patient`].
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Validation`] for the first field that violates its constraint, or
    /// when height and weight are individually valid but give a non-finite bmi.
    pub fn validate(self) -> PatientResult<Patient> {
        validate_patient_id(&self.id)?;
        let name = validate_text("name", &self.name)?;
        let city = validate_text("city", &self.city)?;
        let age = validate_age(self.age)?;
        let gender = self.gender.parse()?;
        let height = validate_positive("height", self.height)?;
        let weight = validate_positive("weight", self.weight)?;
        // Each value can be finite and positive while their ratio overflows.
        if !compute_bmi(height, weight).is_finite() {
            return Err(PatientError::Validation(
                "height, weight: bmi is not a finite number".into(),
            ));
        }
        Ok(Patient {
            id: self.id,
            name,
            city,
            age,
            gender,
            height,
            weight,
        })
    }
}

/// A validated patient record.
#[derive(Clone, Debug, PartialEq)]
pub struct Patient {
    id: String,
    name: NonEmptyText,
    city: NonEmptyText,
    age: u32,
    gender: Gender,
    height: f64,
    weight: f64,
}

impl Patient {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &NonEmptyText {
        &self.name
    }

    pub fn city(&self) -> &NonEmptyText {
        &self.city
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Height in centimeters.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Weight in kilograms.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn bmi(&self) -> f64 {
        compute_bmi(self.height, self.weight)
    }

    pub fn verdict(&self) -> Verdict {
        compute_verdict(self.bmi())
    }

    /// Converts the record back into raw fields, e.g. to merge a partial update and validate the
    /// result again.
    pub fn to_draft(&self) -> NewPatient {
        NewPatient {
            id: self.id.clone(),
            name: self.name.as_str().to_owned(),
            city: self.city.as_str().to_owned(),
            age: i64::from(self.age),
            gender: self.gender.as_str().to_owned(),
            height: self.height,
            weight: self.weight,
        }
    }

    /// Read representation with derived fields computed now.
    pub fn view(&self) -> PatientView {
        let bmi = self.bmi();
        PatientView {
            id: self.id.clone(),
            name: self.name.clone(),
            city: self.city.clone(),
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
            bmi,
            verdict: compute_verdict(bmi),
        }
    }
}

/// Patient record as returned to callers, including derived fields.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct PatientView {
    #[schema(example = "P001")]
    pub id: String,
    #[schema(value_type = String, example = "John Doe")]
    pub name: NonEmptyText,
    #[schema(value_type = String, example = "New York")]
    pub city: NonEmptyText,
    #[schema(example = 30)]
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    #[schema(example = 175.5)]
    pub height: f64,
    /// Weight in kilograms
    #[schema(example = 70.5)]
    pub weight: f64,
    /// Body mass index, rounded to two decimal places
    #[schema(example = 22.89)]
    pub bmi: f64,
    pub verdict: Verdict,
}
