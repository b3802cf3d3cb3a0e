//! Pagination types for ledger endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::UserLedgerEntry;
use crate::errors::{AppError, AppResult};

/// Page query parameter (zero-based, absent means the first page)
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn new(page: u64) -> Self {
        Self { page: Some(page) }
    }

    /// Rows to skip for a fixed page size.
    ///
    /// Rejects pages whose offset does not fit the store's signed 64-bit range.
    pub fn offset(&self, page_size: u64) -> AppResult<u64> {
        let page = self.page.unwrap_or(0);
        page_size
            .checked_mul(page)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| AppError::validation(format!("page: {} is out of range", page)))
    }
}

/// One page of rows plus the unpaginated match count
#[derive(Debug, Serialize, ToSchema)]
#[aliases(UserLedgerPage = Paginated<UserLedgerEntry>)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total_count: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total_count: u64) -> Self {
        Self { data, total_count }
    }
}
