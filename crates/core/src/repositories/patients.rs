//! Patient record management.
//!
//! Patients are stored under their bare id. A patient is created once and afterwards only
//! grows: each medical record addition appends one history entry and one access log entry
//! and rewrites the whole document in a single put.

use crate::constants::RECORD_ADDITION_PURPOSE;
use crate::error::{LedgerError, LedgerResult, RecordKind};
use crate::invocation::TransactionContext;
use crate::records::{Access, Patient, Record};
use crate::storage::{patient_key, read_document, write_document};

/// Patient operations over a transaction context. Holds no state between invocations.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatientService;

impl PatientService {
    pub fn new() -> Self {
        Self
    }

    /// Returns whether a document is stored under `id`.
    pub fn exists<C>(&self, ctx: &C, id: &str) -> LedgerResult<bool>
    where
        C: TransactionContext + ?Sized,
    {
        Ok(ctx.get_state(&patient_key(id))?.is_some())
    }

    /// Creates a patient with an empty history and access log.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AlreadyExists`] if anything is already stored under `id`; the
    /// stored document is left untouched.
    pub fn create<C>(&self, ctx: &mut C, id: &str, name: &str, dob: &str) -> LedgerResult<()>
    where
        C: TransactionContext + ?Sized,
    {
        if self.exists(ctx, id)? {
            tracing::warn!("refusing to create patient {}: already exists", id);
            return Err(LedgerError::AlreadyExists(id.to_string()));
        }

        let patient = Patient::new(id, name, dob);
        write_document(ctx, &patient_key(id), &patient)?;
        tracing::info!("created patient {}", id);
        Ok(())
    }

    /// Reads the patient stored under `id`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if nothing is stored under `id`
    /// - [`LedgerError::Decode`] if the stored bytes are not a patient document
    pub fn fetch<C>(&self, ctx: &C, id: &str) -> LedgerResult<Patient>
    where
        C: TransactionContext + ?Sized,
    {
        read_document(ctx, &patient_key(id))?
            .ok_or_else(|| LedgerError::not_found(RecordKind::Patient, id))
    }

    /// Appends a medical record written by the calling identity.
    ///
    /// The record and its access log entry share the caller identity and the transaction
    /// timestamp, and reach storage in the same document write.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::IdentityUnavailable`] if the caller identity cannot be resolved
    /// - any error from [`PatientService::fetch`]
    pub fn add_medical_record<C>(
        &self,
        ctx: &mut C,
        patient_id: &str,
        diagnosis: &str,
        treatment: &str,
    ) -> LedgerResult<()>
    where
        C: TransactionContext + ?Sized,
    {
        let caller = ctx.client_identity()?;
        let mut patient = self.fetch(ctx, patient_id)?;
        let now = ctx.tx_timestamp();

        patient.append_entry(
            Record {
                date: now,
                diagnosis: diagnosis.to_string(),
                doctor_id: caller.to_string(),
                treatment: treatment.to_string(),
            },
            Access {
                entity_id: caller.to_string(),
                purpose: RECORD_ADDITION_PURPOSE.to_string(),
                timestamp: now,
            },
        );

        write_document(ctx, &patient_key(patient_id), &patient)?;
        tracing::info!(
            "added medical record {} to patient {}",
            patient.medical_history().len(),
            patient_id
        );
        Ok(())
    }
}
