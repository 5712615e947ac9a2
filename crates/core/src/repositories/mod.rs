//! Record managers.
//!
//! One service per record kind. Services are stateless apart from configuration and
//! operate on whatever [`TransactionContext`](crate::TransactionContext) they are handed.

pub mod patients;
pub mod payments;
