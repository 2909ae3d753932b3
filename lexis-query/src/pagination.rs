use serde::{Deserialize, Serialize};

/// Largest row count or offset a store can address (SQLite integers are `i64`).
pub const MAX_ROWS: u64 = i64::MAX as u64;

/// Paging defaults applied to searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSettings {
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    #[serde(default = "default_max_per_page")]
    pub max_per_page: u64,
}

fn default_per_page() -> u64 {
    25
}

fn default_max_per_page() -> u64 {
    200
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            max_per_page: default_max_per_page(),
        }
    }
}

impl PageSettings {
    /// Bounds a requested page size to `1..=max_per_page`.
    pub fn clamp(&self, requested: u64) -> u64 {
        requested.clamp(1, self.max_per_page.clamp(1, MAX_ROWS))
    }
}

/// Page arithmetic for one search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_count: u64,
    pub current_page: u64,
    pub per_page: u64,
}

impl Pagination {
    /// Pages and page sizes below one are raised to one.
    pub fn new(total_count: u64, current_page: u64, per_page: u64) -> Self {
        Self {
            total_count,
            current_page: current_page.max(1),
            per_page: per_page.max(1),
        }
    }

    pub fn page_count(&self) -> u64 {
        self.total_count.div_ceil(self.per_page)
    }

    pub fn previous_page(&self) -> Option<u64> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u64> {
        (self.current_page < self.page_count()).then(|| self.current_page + 1)
    }

    /// Rows to skip before the current page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1).saturating_mul(self.per_page).min(MAX_ROWS)
    }
}
