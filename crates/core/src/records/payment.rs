//! Payment documents and the payment status machine.
//!
//! Allowed status changes are listed in [`TRANSITIONS`]. A status that never appears as
//! the source of a transition is terminal. Adding a state means adding a variant and its
//! rows in the table.

use crate::error::{LedgerError, LedgerResult};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Denied,
}

/// Every permitted `(from, to)` status change.
pub const TRANSITIONS: &[(PaymentStatus, PaymentStatus)] = &[
    (PaymentStatus::Pending, PaymentStatus::Paid),
    (PaymentStatus::Pending, PaymentStatus::Denied),
];

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Denied => "DENIED",
        }
    }

    pub fn can_transition_to(self, next: PaymentStatus) -> bool {
        TRANSITIONS.contains(&(self, next))
    }

    pub fn is_terminal(self) -> bool {
        !TRANSITIONS.iter().any(|(from, _)| *from == self)
    }
}

impl FromStr for PaymentStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PaymentStatus::Pending),
            "PAID" => Ok(PaymentStatus::Paid),
            "DENIED" => Ok(PaymentStatus::Denied),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown payment status '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider payment.
///
/// `patient_id` and `provider_id` are advisory references; nothing checks that they name
/// existing records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Decimal,
    pub id: String,
    #[serde(rename = "patientId")]
    pub patient_id: String,
    #[serde(rename = "providerId")]
    pub provider_id: String,
    #[serde(rename = "serviceDate")]
    pub service_date: DateTime<Utc>,
    pub status: PaymentStatus,
}

impl Payment {
    /// A new payment in the `PENDING` state.
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        patient_id: impl Into<String>,
        provider_id: impl Into<String>,
        service_date: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            id: id.into(),
            patient_id: patient_id.into(),
            provider_id: provider_id.into(),
            service_date,
            status: PaymentStatus::Pending,
        }
    }

    /// Moves the payment to `requested`, which may be any caller-supplied string.
    ///
    /// Unknown status names and changes missing from [`TRANSITIONS`] both fail with
    /// [`LedgerError::InvalidTransition`] and leave the payment unchanged.
    pub fn transition(&mut self, requested: &str) -> LedgerResult<()> {
        let invalid = || LedgerError::InvalidTransition {
            from: self.status.to_string(),
            to: requested.to_string(),
        };

        if self.status.is_terminal() {
            return Err(invalid());
        }
        let next = requested.parse::<PaymentStatus>().map_err(|_| invalid())?;
        if !self.status.can_transition_to(next) {
            return Err(invalid());
        }

        self.status = next;
        Ok(())
    }
}
