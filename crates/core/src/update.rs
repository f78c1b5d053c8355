//! Partial updates.
//!
//! Every field of a [`PatientUpdate`] is a [`Patch`], which keeps "not sent" apart from "sent as
//! `null`". Merging copies present values onto the stored record and validates the merged result
//! as a whole, so an update either yields a fully valid [`Patient`] or changes nothing.

use crate::record::Patient;
use crate::{PatientError, PatientResult};
use serde::{Deserialize, Deserializer};
use utoipa::ToSchema;

/// A single field of a partial update.
#[derive(Clone, Debug, PartialEq)]
pub enum Patch<T> {
    /// The field was not part of the request.
    Absent,
    /// The field was sent as an explicit `null`.
    Null,
    /// The field was sent with a value.
    Value(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Writes the value, if any, into `target`.
    ///
    /// Required fields cannot be cleared, so [`Patch::Null`] is a validation error.
    pub fn apply_to(self, field: &str, target: &mut T) -> PatientResult<()> {
        match self {
            Patch::Absent => Ok(()),
            Patch::Null => Err(PatientError::field(field, "cannot be null")),
            Patch::Value(value) => {
                *target = value;
                Ok(())
            }
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    /// `None` means "leave unchanged".
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Absent, Patch::Value)
    }
}

// Only called for keys present in the input; missing keys fall back to `Default` via
// `#[serde(default)]` on each field.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(|value| match value {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// Fields to change on an existing patient. The id is taken from the request path and cannot be
/// changed.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
pub struct PatientUpdate {
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "John Doe")]
    pub name: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "New York")]
    pub city: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i64>, example = 30)]
    pub age: Patch<i64>,
    /// `Male`, `Female` or `Others`
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "Male")]
    pub gender: Patch<String>,
    /// Height in centimeters
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 175.5)]
    pub height: Patch<f64>,
    /// Weight in kilograms
    #[serde(default)]
    #[schema(value_type = Option<f64>, example = 70.5)]
    pub weight: Patch<f64>,
}

impl PatientUpdate {
    /// Returns `true` when the update carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_absent()
            && self.city.is_absent()
            && self.age.is_absent()
            && self.gender.is_absent()
            && self.height.is_absent()
            && self.weight.is_absent()
    }

    /// Names of the fields present in the update, for logging.
    pub fn present_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_absent()),
            ("city", self.city.is_absent()),
            ("age", self.age.is_absent()),
            ("gender", self.gender.is_absent()),
            ("height", self.height.is_absent()),
            ("weight", self.weight.is_absent()),
        ]
        .into_iter()
        .filter(|(_, absent)| !absent)
        .map(|(field, _)| field)
        .collect()
    }

    /// Merges the update onto `existing` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Validation`] if a field is `null` or the merged record violates
    /// any constraint. `existing` is never modified.
    pub fn merge_into(self, existing: &Patient) -> PatientResult<Patient> {
        let mut draft = existing.to_draft();

        self.name.apply_to("name", &mut draft.name)?;
        self.city.apply_to("city", &mut draft.city)?;
        self.age.apply_to("age", &mut draft.age)?;
        self.gender.apply_to("gender", &mut draft.gender)?;
        self.height.apply_to("height", &mut draft.height)?;
        self.weight.apply_to("weight", &mut draft.weight)?;

        draft.validate()
    }
}
