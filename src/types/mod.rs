//! Shared types used across layers.

mod pagination;

pub use pagination::{PageQuery, Paginated, UserLedgerPage};
