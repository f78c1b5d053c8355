//! # PMS Core
//!
//! Core business logic for the patient management system.
//!
//! This crate contains pure data operations:
//! - The validated patient record model and its derived BMI/verdict attributes
//! - Partial-update merging with whole-record re-validation
//! - Storage backends behind the [`PatientStore`] trait (JSON file, in-memory)
//! - The record store operations in [`PatientService`]
//!
//! **No API concerns**: HTTP servers, routing and response shaping belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod record;
pub mod sort;
pub mod store;
pub mod update;
pub mod validation;

pub use config::CoreConfig;
pub use constants::DEFAULT_PATIENT_DATA_FILE;
pub use error::{PatientError, PatientResult};
pub use patient::PatientService;
pub use pms_types::{NonEmptyText, TextError};
pub use record::{compute_bmi, compute_verdict, Gender, NewPatient, Patient, PatientView, Verdict};
pub use sort::{SortField, SortOrder};
pub use store::{JsonFileStore, MemoryStore, PatientMap, PatientStore};
pub use update::{Patch, PatientUpdate};
