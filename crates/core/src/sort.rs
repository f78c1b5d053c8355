//! Sort keys for patient listings.

use crate::constants::SORTABLE_FIELDS;
use crate::record::PatientView;
use crate::{PatientError, PatientResult};
use std::cmp::Ordering;
use std::str::FromStr;

/// Numeric field a listing can be sorted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    fn key(self, view: &PatientView) -> f64 {
        match self {
            SortField::Height => view.height,
            SortField::Weight => view.weight,
            SortField::Bmi => view.bmi,
        }
    }
}

impl FromStr for SortField {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height" => Ok(SortField::Height),
            "weight" => Ok(SortField::Weight),
            "bmi" => Ok(SortField::Bmi),
            _ => Err(PatientError::InvalidArgument(format!(
                "Invalid field, select from {}",
                SORTABLE_FIELDS.join(", ")
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PatientError::InvalidArgument(
                "Invalid order, select between asc and desc".into(),
            )),
        }
    }
}

/// Parses a field and order pair, checking the field first.
pub fn parse_sort(field: &str, order: &str) -> PatientResult<(SortField, SortOrder)> {
    Ok((field.parse()?, order.parse()?))
}

/// Sorts `views` in place. The sort is stable in both directions: equal keys keep their
/// original relative order.
pub fn sort_views(views: &mut [PatientView], field: SortField, order: SortOrder) {
    views.sort_by(|a, b| {
        let ordering: Ordering = field.key(a).total_cmp(&field.key(b));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}
