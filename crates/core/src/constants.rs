//! Constants used throughout the ledger core crate.
//!
//! Key prefixes, audit literals and default locations live here so that every
//! read and write path agrees on them.

/// Prefix applied to payment ids when a payment key is namespaced.
pub const PAYMENT_KEY_PREFIX: &str = "Payment_";

/// Purpose recorded in the access log when a medical record is appended.
pub const RECORD_ADDITION_PURPOSE: &str = "Record addition";

/// Default path of the file-backed world state used by the CLI.
pub const DEFAULT_LEDGER_PATH: &str = "ledger.json";

/// Environment variable selecting the payment key layout.
pub const PAYMENT_KEYS_ENV: &str = "EHR_LEDGER_PAYMENT_KEYS";

/// Environment variable overriding the world state file path.
pub const LEDGER_PATH_ENV: &str = "EHR_LEDGER_PATH";

/// Environment variable supplying the caller identity for CLI invocations.
pub const IDENTITY_ENV: &str = "EHR_LEDGER_IDENTITY";
