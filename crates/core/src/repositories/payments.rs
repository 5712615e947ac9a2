//! Payment record management.
//!
//! Which key a payment is written to and read from is decided by the configured
//! [`PaymentKeyLayout`](crate::PaymentKeyLayout). Under the default legacy layout the two
//! differ, so a payment written by [`PaymentService::create`] is not visible to
//! [`PaymentService::fetch`] unless a document also exists under the prefixed key.

use crate::config::CoreConfig;
use crate::error::{LedgerError, LedgerResult, RecordKind};
use crate::invocation::TransactionContext;
use crate::records::Payment;
use crate::storage::{read_document, write_document};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Payment operations over a transaction context.
#[derive(Clone, Debug)]
pub struct PaymentService {
    cfg: Arc<CoreConfig>,
}

impl PaymentService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Writes a new `PENDING` payment dated at the transaction timestamp.
    ///
    /// There is no existence check: any document already at the write key is replaced.
    pub fn create<C>(
        &self,
        ctx: &mut C,
        payment_id: &str,
        amount: Decimal,
        patient_id: &str,
        provider_id: &str,
    ) -> LedgerResult<()>
    where
        C: TransactionContext + ?Sized,
    {
        let payment = Payment::new(
            payment_id,
            amount,
            patient_id,
            provider_id,
            ctx.tx_timestamp(),
        );
        self.store(ctx, &payment)?;
        tracing::info!(
            "created payment {} of {} for patient {}",
            payment_id,
            amount,
            patient_id
        );
        Ok(())
    }

    /// Reads the payment with the given id from its read key.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotFound`] if nothing is stored under the read key
    /// - [`LedgerError::Decode`] if the stored bytes are not a payment document
    pub fn fetch<C>(&self, ctx: &C, id: &str) -> LedgerResult<Payment>
    where
        C: TransactionContext + ?Sized,
    {
        let key = self.cfg.payment_key_layout().read_key(id);
        tracing::debug!("reading payment {} from key {}", id, key);
        read_document(ctx, &key)?.ok_or_else(|| LedgerError::not_found(RecordKind::Payment, id))
    }

    /// Applies a status change and writes the payment back to its write key.
    ///
    /// # Errors
    ///
    /// - any error from [`PaymentService::fetch`]
    /// - [`LedgerError::InvalidTransition`] if the change is not permitted
    pub fn update_status<C>(&self, ctx: &mut C, payment_id: &str, new_status: &str) -> LedgerResult<()>
    where
        C: TransactionContext + ?Sized,
    {
        let mut payment = self.fetch(ctx, payment_id)?;
        let previous = payment.status;

        if let Err(e) = payment.transition(new_status) {
            tracing::warn!("rejected status change for payment {}: {}", payment_id, e);
            return Err(e);
        }

        // The document's own id may differ from the requested one; the caller's id picks the key.
        let key = self.cfg.payment_key_layout().write_key(payment_id);
        write_document(ctx, &key, &payment)?;
        tracing::info!(
            "payment {} moved from {} to {}",
            payment_id,
            previous,
            payment.status
        );
        Ok(())
    }

    pub(crate) fn store<C>(&self, ctx: &mut C, payment: &Payment) -> LedgerResult<()>
    where
        C: TransactionContext + ?Sized,
    {
        let key = self.cfg.payment_key_layout().write_key(&payment.id);
        write_document(ctx, &key, payment)
    }
}
