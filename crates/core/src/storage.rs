//! Storage adapter: key construction and the document codec.
//!
//! Documents are JSON objects stored whole under a single key. Reads decode the entire
//! document and writes replace it; nothing below document granularity is addressable.
//! Storage failures are surfaced unchanged as [`LedgerError::Infrastructure`] and are
//! never retried here.

use crate::error::{LedgerError, LedgerResult};
use crate::invocation::TransactionContext;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Key under which a patient document lives. Patients use the bare id.
pub fn patient_key(id: &str) -> String {
    id.to_string()
}

/// Reads and decodes the document at `key`, or `None` if the key is absent.
pub fn read_document<T, C>(ctx: &C, key: &str) -> LedgerResult<Option<T>>
where
    T: DeserializeOwned,
    C: TransactionContext + ?Sized,
{
    let Some(bytes) = ctx.get_state(key)? else {
        tracing::debug!("no document at key {}", key);
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(LedgerError::Decode)
}

/// Encodes `document` and stores it at `key`, replacing whatever was there.
pub fn write_document<T, C>(ctx: &mut C, key: &str, document: &T) -> LedgerResult<()>
where
    T: Serialize,
    C: TransactionContext + ?Sized,
{
    let bytes = serde_json::to_vec(document).map_err(LedgerError::Encode)?;
    ctx.put_state(key, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::Invocation;
    use crate::world_state::{MemoryWorldState, WorldState};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        id: String,
    }

    #[test]
    fn test_patient_key_is_bare_id() {
        assert_eq!(patient_key("patient1"), "patient1");
    }

    #[test]
    fn test_write_then_read_document() {
        let mut world = MemoryWorldState::new();
        let mut inv = Invocation::new(&mut world, None);
        let doc = Doc { id: "a".into() };

        write_document(&mut inv, "a", &doc).unwrap();
        let read: Option<Doc> = read_document(&inv, "a").unwrap();
        assert_eq!(read, Some(doc));
    }

    #[test]
    fn test_read_malformed_document_is_decode_error() {
        let mut world = MemoryWorldState::new();
        world.put_state("bad", b"{not json".to_vec()).unwrap();
        let inv = Invocation::new(&mut world, None);

        let err = read_document::<Doc, _>(&inv, "bad").expect_err("should fail to decode");
        assert!(matches!(err, LedgerError::Decode(_)));
    }
}
