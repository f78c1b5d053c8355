//! Patient service.
//!
//! [`PatientService`] implements the record store operations on top of any [`PatientStore`].
//! Every operation reads the full snapshot from the store; mutations apply a single change and
//! write the full snapshot back. A failed operation never writes.
//!
//! All operations, reads included, run under one store-wide lock so that concurrent requests
//! within a process cannot interleave their load/save cycles and lose updates. Several processes
//! sharing one backing file are not coordinated.

use crate::record::{NewPatient, PatientView};
use crate::sort::{parse_sort, sort_views};
use crate::store::{PatientMap, PatientStore};
use crate::update::PatientUpdate;
use crate::{PatientError, PatientResult};
use std::sync::{Arc, Mutex, MutexGuard};

/// Pure patient data operations - no API concerns
pub struct PatientService<S> {
    store: Arc<S>,
    lock: Arc<Mutex<()>>,
}

impl<S> Clone for PatientService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            lock: Arc::clone(&self.lock),
        }
    }
}

impl<S: PatientStore> PatientService<S> {
    /// Creates a service over `store`.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    fn guard(&self) -> PatientResult<MutexGuard<'_, ()>> {
        self.lock.lock().map_err(|_| PatientError::LockPoisoned)
    }

    fn load(&self) -> PatientResult<PatientMap> {
        self.store.load()
    }

    /// Lists every patient with derived fields, in storage order.
    pub fn list_all(&self) -> PatientResult<Vec<PatientView>> {
        let _guard = self.guard()?;
        Ok(self.load()?.iter().map(|p| p.view()).collect())
    }

    /// Returns one patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no patient has the given id.
    pub fn get_by_id(&self, id: &str) -> PatientResult<PatientView> {
        let _guard = self.guard()?;
        self.load()?
            .get(id)
            .map(|p| p.view())
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))
    }

    /// Lists every patient sorted on `field` (`height`, `weight` or `bmi`) in `order` (`asc` or
    /// `desc`).
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidArgument`] for an unknown field or order. Arguments are
    /// checked before the store is read.
    pub fn sort_by(&self, field: &str, order: &str) -> PatientResult<Vec<PatientView>> {
        let (field, order) = parse_sort(field, order)?;
        let mut views = self.list_all()?;
        sort_views(&mut views, field, order);
        Ok(views)
    }

    /// Creates a patient.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`PatientError::Conflict`] if the id already exists,
    /// - [`PatientError::Validation`] if any field is invalid,
    /// - a storage error if the store cannot be read or written.
    pub fn create(&self, new_patient: NewPatient) -> PatientResult<()> {
        let _guard = self.guard()?;
        let mut patients = self.load()?;

        if patients.contains(&new_patient.id) {
            return Err(PatientError::Conflict(new_patient.id));
        }

        let patient = new_patient.validate()?;
        let id = patient.id().to_owned();
        patients.insert(patient)?;
        self.store.save(&patients)?;

        tracing::info!("created patient {}", id);
        Ok(())
    }

    /// Applies a partial update to an existing patient.
    ///
    /// Present fields are merged onto the stored record and the merged record is validated in
    /// full; if it is invalid nothing is written.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`PatientError::NotFound`] if the id does not exist,
    /// - [`PatientError::Validation`] if a field is `null` or the merged record is invalid,
    /// - a storage error if the store cannot be read or written.
    pub fn update(&self, id: &str, update: PatientUpdate) -> PatientResult<()> {
        let _guard = self.guard()?;
        let mut patients = self.load()?;

        let existing = patients
            .get(id)
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))?;
        let fields = update.present_fields();
        let merged = update.merge_into(existing)?;
        patients.replace(merged)?;
        self.store.save(&patients)?;

        tracing::info!("updated patient {} fields {:?}", id, fields);
        Ok(())
    }

    /// Deletes a patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if the id does not exist, or a storage error if the
    /// store cannot be read or written.
    pub fn delete(&self, id: &str) -> PatientResult<()> {
        let _guard = self.guard()?;
        let mut patients = self.load()?;

        patients.remove(id)?;
        self.store.save(&patients)?;

        tracing::info!("deleted patient {}", id);
        Ok(())
    }
}
