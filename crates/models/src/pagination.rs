use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default number of rows per page in every dashboard table
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest page a caller may ask for
pub const MAX_LIMIT: u64 = 500;

/// A limit/offset window over an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Window {
    /// Builds a window from optional query parameters, falling back to the defaults.
    /// A zero limit would never return rows, so it is treated as absent.
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: clamp_limit(limit),
            // OFFSET is a signed 64-bit value in SQL
            offset: offset.unwrap_or(0).min(i64::MAX as u64),
        }
    }

    /// Builds a window from a 1-based page number
    pub fn from_page(page: Option<u64>, limit: Option<u64>) -> Self {
        let limit = clamp_limit(limit);
        let page = page.filter(|p| *p > 0).unwrap_or(1);

        Self {
            limit,
            offset: (page - 1).saturating_mul(limit).min(i64::MAX as u64),
        }
    }

    /// The 1-based page this window starts on
    pub fn page(&self) -> u64 {
        self.offset / self.limit + 1
    }
}

fn clamp_limit(limit: Option<u64>) -> u64 {
    limit
        .filter(|l| *l > 0)
        .map_or(DEFAULT_LIMIT, |l| l.min(MAX_LIMIT))
}

/// One window of a filtered listing plus the number of rows matching the filters
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn page_count(&self, limit: u64) -> u64 {
        if limit == 0 {
            return 0;
        }

        self.total.div_ceil(limit)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Page-based pagination metadata returned by the graduation listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: u64,
    pub page_count: u64,
    pub page: u64,
    pub limit: u64,
}

impl PaginationMeta {
    pub fn new(window: Window, total: u64) -> Self {
        Self {
            total,
            page_count: total.div_ceil(window.limit),
            page: window.page(),
            limit: window.limit,
        }
    }
}
