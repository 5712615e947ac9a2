//! Patient documents.
//!
//! A patient document carries two append-only audit trails: the medical history and the
//! access log. They are private to [`Patient`] and can only grow through
//! [`Patient::append_entry`], which adds one entry to each so the two stay in step.
//!
//! Wire layout:
//!
//! ```json
//! {"accessLog": [...], "dob": "1990-01-01", "id": "patient1", "history": [...], "name": "John Doe"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single medical history entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: DateTime<Utc>,
    pub diagnosis: String,
    #[serde(rename = "doctorId")]
    pub doctor_id: String,
    pub treatment: String,
}

/// A single access log entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    #[serde(rename = "entityId")]
    pub entity_id: String,
    pub purpose: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(rename = "accessLog", default, deserialize_with = "null_as_empty")]
    access_log: Vec<Access>,
    pub dob: String,
    pub id: String,
    #[serde(rename = "history", default, deserialize_with = "null_as_empty")]
    medical_history: Vec<Record>,
    pub name: String,
}

impl Patient {
    /// A new patient with empty history and access log.
    pub fn new(id: impl Into<String>, name: impl Into<String>, dob: impl Into<String>) -> Self {
        Self {
            access_log: Vec::new(),
            dob: dob.into(),
            id: id.into(),
            medical_history: Vec::new(),
            name: name.into(),
        }
    }

    pub fn medical_history(&self) -> &[Record] {
        &self.medical_history
    }

    pub fn access_log(&self) -> &[Access] {
        &self.access_log
    }

    /// Appends one history record together with the access entry that accounts for it.
    pub fn append_entry(&mut self, record: Record, access: Access) {
        self.medical_history.push(record);
        self.access_log.push(access);
    }
}

// Older writers emit `null` for empty sequences.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
