//! Ledger document types.
//!
//! These are the JSON documents persisted in the world state. Field names on the wire
//! are fixed; see each type for its layout.

pub mod patient;
pub mod payment;

pub use patient::{Access, Patient, Record};
pub use payment::{Payment, PaymentStatus};
