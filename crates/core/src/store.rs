//! Patient storage backends.
//!
//! The service layer only talks to [`PatientStore`]: it loads a full [`PatientMap`] snapshot,
//! applies one change and saves the full snapshot back. Two backends are provided:
//!
//! - [`JsonFileStore`]: a single JSON file, rewritten in full on every save
//! - [`MemoryStore`]: an in-process map, used by tests and embedders
//!
//! ## File Layout
//!
//! ```text
//! {
//!   "P001": {"name": "...", "city": "...", "age": 30, "gender": "Male", "height": 175.5, "weight": 70.5},
//!   ...
//! }
//! ```
//!
//! The id is the object key and is not repeated inside the value. Derived fields (`bmi`,
//! `verdict`) are never written; if an older file contains them, or an `id` key, they are ignored
//! on load.

use crate::record::{NewPatient, Patient};
use crate::{NonEmptyText, PatientError, PatientResult};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Backend holding the authoritative copy of all patient records.
pub trait PatientStore: Send + Sync {
    /// Reads every record.
    fn load(&self) -> PatientResult<PatientMap>;

    /// Replaces every record with `patients`.
    fn save(&self, patients: &PatientMap) -> PatientResult<()>;
}

impl<T: PatientStore + ?Sized> PatientStore for Box<T> {
    fn load(&self) -> PatientResult<PatientMap> {
        (**self).load()
    }

    fn save(&self, patients: &PatientMap) -> PatientResult<()> {
        (**self).save(patients)
    }
}

/// Ordered mapping from patient id to record.
///
/// Iteration follows storage order: records loaded from a file keep the file's order, inserts
/// append, and removals keep the relative order of the remaining records.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PatientMap {
    records: Vec<Patient>,
}

impl PatientMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&Patient> {
        self.records.iter().find(|p| p.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Patient> {
        self.records.iter()
    }

    /// Appends a new record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Conflict`] if a record with the same id exists.
    pub fn insert(&mut self, patient: Patient) -> PatientResult<()> {
        if self.contains(patient.id()) {
            return Err(PatientError::Conflict(patient.id().to_owned()));
        }
        self.records.push(patient);
        Ok(())
    }

    /// Replaces the record with the same id, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record has that id.
    pub fn replace(&mut self, patient: Patient) -> PatientResult<()> {
        let index = self
            .position(patient.id())
            .ok_or_else(|| PatientError::NotFound(patient.id().to_owned()))?;
        self.records[index] = patient;
        Ok(())
    }

    /// Removes and returns the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record has that id.
    pub fn remove(&mut self, id: &str) -> PatientResult<Patient> {
        let index = self
            .position(id)
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))?;
        Ok(self.records.remove(index))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|p| p.id() == id)
    }
}

impl<'a> IntoIterator for &'a PatientMap {
    type Item = &'a Patient;
    type IntoIter = std::slice::Iter<'a, Patient>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// JSON WIRE FORMAT
// ============================================================================

/// Stored value for one patient: the record minus its id and derived fields.
#[derive(Debug, Serialize, Deserialize)]
struct StoredPatient {
    name: NonEmptyText,
    city: NonEmptyText,
    age: i64,
    gender: String,
    height: f64,
    weight: f64,
}

impl StoredPatient {
    fn from_patient(patient: &Patient) -> Self {
        Self {
            name: patient.name().clone(),
            city: patient.city().clone(),
            age: i64::from(patient.age()),
            gender: patient.gender().as_str().to_owned(),
            height: patient.height(),
            weight: patient.weight(),
        }
    }

    fn into_new_patient(self, id: String) -> NewPatient {
        NewPatient {
            id,
            name: self.name.into_inner(),
            city: self.city.into_inner(),
            age: self.age,
            gender: self.gender,
            height: self.height,
            weight: self.weight,
        }
    }
}

/// Serialises a [`PatientMap`] as a JSON object keyed by id, in storage order.
struct PatientFileRef<'a>(&'a PatientMap);

impl Serialize for PatientFileRef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for patient in self.0 {
            map.serialize_entry(patient.id(), &StoredPatient::from_patient(patient))?;
        }
        map.end()
    }
}

/// Entries of the JSON object in document order.
struct PatientFileWire(Vec<(String, StoredPatient)>);

impl<'de> Deserialize<'de> for PatientFileWire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = PatientFileWire;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a JSON object mapping patient ids to records")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((id, record)) = access.next_entry::<String, StoredPatient>()? {
                    entries.push((id, record));
                }
                Ok(PatientFileWire(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parses the JSON file layout into a validated [`PatientMap`].
///
/// This uses `serde_path_to_error` to surface the path of the failing value (e.g. `P001.age`)
/// when the JSON does not match the stored schema.
///
/// # Errors
///
/// Returns [`PatientError::Deserialization`] if the text is not a JSON object of stored patients,
/// if a stored record fails validation, or if an id appears twice.
pub fn parse_patients(json_text: &str) -> PatientResult<PatientMap> {
    if json_text.trim().is_empty() {
        return Ok(PatientMap::new());
    }

    let mut deserializer = serde_json::Deserializer::from_str(json_text);
    let wire = match serde_path_to_error::deserialize::<_, PatientFileWire>(&mut deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            return Err(PatientError::Deserialization(format!(
                "patient file schema mismatch at {path}: {source}"
            )));
        }
    };
    deserializer
        .end()
        .map_err(|e| PatientError::Deserialization(format!("trailing data: {e}")))?;

    let mut patients = PatientMap::new();
    for (id, stored) in wire.0 {
        let patient = stored
            .into_new_patient(id.clone())
            .validate()
            .map_err(|e| PatientError::Deserialization(format!("invalid record {id}: {e}")))?;
        patients
            .insert(patient)
            .map_err(|_| PatientError::Deserialization(format!("duplicate patient id {id}")))?;
    }

    Ok(patients)
}

/// Renders a [`PatientMap`] in the JSON file layout.
pub fn render_patients(patients: &PatientMap) -> PatientResult<String> {
    serde_json::to_string_pretty(&PatientFileRef(patients)).map_err(PatientError::Serialization)
}

// ============================================================================
// BACKENDS
// ============================================================================

/// Stores all patients in one JSON file.
///
/// A missing file loads as an empty store and is created by the first save. Saves write a
/// sibling temporary file and rename it over the target, so readers see either the old or the
/// new contents in full.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PatientStore for JsonFileStore {
    fn load(&self) -> PatientResult<PatientMap> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    "patient file {} does not exist yet, starting empty",
                    self.path.display()
                );
                return Ok(PatientMap::new());
            }
            Err(e) => return Err(PatientError::FileRead(e)),
        };
        parse_patients(&contents)
    }

    fn save(&self, patients: &PatientMap) -> PatientResult<()> {
        let rendered = render_patients(patients)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, rendered).map_err(PatientError::FileWrite)?;
        fs::rename(&temp_path, &self.path).map_err(PatientError::FileWrite)?;
        tracing::debug!(
            "wrote {} patients to {}",
            patients.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Keeps all patients in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    patients: Mutex<PatientMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PatientStore for MemoryStore {
    fn load(&self) -> PatientResult<PatientMap> {
        let patients = self
            .patients
            .lock()
            .map_err(|_| PatientError::LockPoisoned)?;
        Ok(patients.clone())
    }

    fn save(&self, patients: &PatientMap) -> PatientResult<()> {
        let mut stored = self
            .patients
            .lock()
            .map_err(|_| PatientError::LockPoisoned)?;
        *stored = patients.clone();
        Ok(())
    }
}
