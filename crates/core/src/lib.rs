//! # EHR Ledger Core
//!
//! Business logic for patient medical histories and provider payments kept as JSON
//! documents in a transactional key-value ledger.
//!
//! This crate contains:
//! - the world state capability and its in-memory and file-backed backends
//! - the per-invocation transaction context with a buffered write set
//! - patient and payment record management, including the payment status machine
//! - ledger seeding and the named contract entry points
//!
//! **No hosting concerns**: consensus, peer networking and identity verification belong to
//! the environment that invokes the contract. The caller identity arrives here as an
//! already-authenticated string.

pub mod config;
pub mod constants;
pub mod contract;
pub mod error;
pub mod invocation;
pub mod records;
pub mod repositories;
pub mod seed;
pub mod storage;
pub mod world_state;

pub use config::{payment_key_layout_from_env_value, CoreConfig, PaymentKeyLayout};
pub use contract::{Chaincode, ContractFunction};
pub use error::{LedgerError, LedgerResult, RecordKind};
pub use invocation::{Invocation, TransactionContext};
pub use records::{Access, Patient, Payment, PaymentStatus, Record};
pub use repositories::patients::PatientService;
pub use repositories::payments::PaymentService;
pub use world_state::{FileWorldState, MemoryWorldState, StoreError, StoreResult, WorldState};

pub use ehr_ledger_types::{NonEmptyText, TextError};
