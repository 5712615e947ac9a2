//! Per-invocation transaction context.
//!
//! Every entry point runs against a [`TransactionContext`]: the storage primitives, the
//! caller identity asserted by the hosting environment, and the transaction timestamp.
//!
//! [`Invocation`] is the concrete context used by the contract. Writes are buffered in a
//! write set and only reach the underlying [`WorldState`] on [`Invocation::commit`]. An
//! invocation dropped without committing leaves the world state untouched, so a failed
//! operation never leaves a partial write behind.

use crate::error::{LedgerError, LedgerResult};
use crate::world_state::WorldState;
use chrono::{DateTime, Utc};
use ehr_ledger_types::NonEmptyText;
use std::collections::BTreeMap;

/// Capabilities the hosting environment supplies to a single invocation.
pub trait TransactionContext {
    /// Reads a key. Empty values are reported as absent.
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()>;

    /// The already-authenticated identity of the caller.
    fn client_identity(&self) -> LedgerResult<NonEmptyText>;

    /// The time the invocation is executing at.
    fn tx_timestamp(&self) -> DateTime<Utc>;
}

/// A single transaction invocation over a world state.
pub struct Invocation<'a, W: WorldState + ?Sized> {
    world: &'a mut W,
    writes: BTreeMap<String, Vec<u8>>,
    identity: Option<String>,
    timestamp: DateTime<Utc>,
}

impl<'a, W: WorldState + ?Sized> Invocation<'a, W> {
    /// Starts an invocation stamped with the current time.
    ///
    /// `identity` is the caller identity as asserted by the environment; `None` means the
    /// environment could not supply one.
    pub fn new(world: &'a mut W, identity: Option<String>) -> Self {
        Self {
            world,
            writes: BTreeMap::new(),
            identity,
            timestamp: Utc::now(),
        }
    }

    /// Overrides the transaction timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Applies the write set to the world state, returning the number of keys written.
    pub fn commit(self) -> LedgerResult<usize> {
        let count = self.writes.len();
        if count == 0 {
            return Ok(0);
        }
        self.world.put_batch(self.writes.into_iter().collect())?;
        tracing::debug!("committed {} key(s) to world state", count);
        Ok(count)
    }
}

impl<W: WorldState + ?Sized> TransactionContext for Invocation<'_, W> {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        let value = match self.writes.get(key) {
            Some(pending) => Some(pending.clone()),
            None => self.world.get_state(key)?,
        };
        Ok(value.filter(|bytes| !bytes.is_empty()))
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn client_identity(&self) -> LedgerResult<NonEmptyText> {
        let raw = self.identity.as_deref().ok_or_else(|| {
            LedgerError::IdentityUnavailable("no client identity in transaction context".into())
        })?;
        NonEmptyText::verbatim(raw)
            .map_err(|_| LedgerError::IdentityUnavailable("client identity is empty".into()))
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
