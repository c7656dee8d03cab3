use rostrum_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::CompiledExpression;

/// Page size accepted by list screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Creates a validated page size.
    pub fn new(value: u32) -> AppResult<Self> {
        if value == 0 {
            return Err(AppError::Validation(
                "page size must be greater than zero".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the page size.
    #[must_use]
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for PageSize {
    type Error = AppError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for u32 {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

/// One page request sent to the list-fetch collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page_index: u32,
    /// Rows per page.
    pub page_size: PageSize,
    /// Backend filter expression; empty means no filtering.
    pub expression: CompiledExpression,
}

impl PageRequest {
    /// Returns the number of rows preceding this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size.get())
    }
}

/// One page of rows returned by the list-fetch collaborator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    /// Rows in backend order.
    pub rows: Vec<Value>,
    /// Total matching rows when the backend reported one.
    pub total_count: Option<u64>,
}

/// Total row count as known to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TotalCount {
    /// Exact count reported by the backend.
    Known(u64),
    /// The backend did not report a usable count.
    Unknown,
}

impl TotalCount {
    /// Returns the exact count, when known.
    #[must_use]
    pub fn known(&self) -> Option<u64> {
        match self {
            Self::Known(count) => Some(*count),
            Self::Unknown => None,
        }
    }

    /// Returns the number of pages for `page_size`, when the count is known.
    ///
    /// An empty result still has one (empty) page.
    #[must_use]
    pub fn page_count(&self, page_size: PageSize) -> Option<u64> {
        self.known()
            .map(|count| count.div_ceil(u64::from(page_size.get())).max(1))
    }
}
