//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Services never read process-wide environment variables while handling an invocation.

use crate::constants::PAYMENT_KEY_PREFIX;
use crate::{LedgerError, LedgerResult};
use std::str::FromStr;

/// Which keys payment documents are written to and read from.
///
/// Historic deployments write payments under the bare id but read them back under
/// `Payment_<id>`, so a freshly written payment is not visible to `GetPayment`. That
/// behaviour is kept as the default; the other layouts are opt-in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PaymentKeyLayout {
    /// Write under `<id>`, read under `Payment_<id>`.
    #[default]
    Legacy,
    /// Read and write under `Payment_<id>`.
    Prefixed,
    /// Read and write under `<id>`.
    Bare,
}

impl PaymentKeyLayout {
    pub fn write_key(self, id: &str) -> String {
        match self {
            PaymentKeyLayout::Legacy | PaymentKeyLayout::Bare => id.to_string(),
            PaymentKeyLayout::Prefixed => format!("{PAYMENT_KEY_PREFIX}{id}"),
        }
    }

    pub fn read_key(self, id: &str) -> String {
        match self {
            PaymentKeyLayout::Legacy | PaymentKeyLayout::Prefixed => {
                format!("{PAYMENT_KEY_PREFIX}{id}")
            }
            PaymentKeyLayout::Bare => id.to_string(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentKeyLayout::Legacy => "legacy",
            PaymentKeyLayout::Prefixed => "prefixed",
            PaymentKeyLayout::Bare => "bare",
        }
    }
}

impl FromStr for PaymentKeyLayout {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(PaymentKeyLayout::Legacy),
            "prefixed" => Ok(PaymentKeyLayout::Prefixed),
            "bare" => Ok(PaymentKeyLayout::Bare),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown payment key layout '{other}' (expected legacy, prefixed or bare)"
            ))),
        }
    }
}

impl std::fmt::Display for PaymentKeyLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    payment_key_layout: PaymentKeyLayout,
}

impl CoreConfig {
    pub fn new(payment_key_layout: PaymentKeyLayout) -> Self {
        Self { payment_key_layout }
    }

    pub fn payment_key_layout(&self) -> PaymentKeyLayout {
        self.payment_key_layout
    }
}

/// Parse the payment key layout from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`PaymentKeyLayout::Legacy`].
pub fn payment_key_layout_from_env_value(value: Option<String>) -> LedgerResult<PaymentKeyLayout> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<PaymentKeyLayout>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}
