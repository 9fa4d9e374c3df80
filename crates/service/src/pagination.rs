//! Pagination utilities for the service layer.
//!
//! Provides a simple `Pagination` struct, input normalization, and the
//! `pagination` object every list response carries.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }

    pub fn current(self) -> u32 {
        if self.page == 0 { 1 } else { self.page }
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 10 } }
}

/// `pagination` object in list responses. `pages` is `ceil(total/limit)`,
/// which makes it 0 when the result set is empty.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PageInfo {
    pub current: u32,
    pub pages: u64,
    pub total: u64,
}

impl PageInfo {
    pub fn new(current: u32, total: u64, per_page: u64) -> Self {
        Self { current, pages: total.div_ceil(per_page.max(1)), total }
    }
}
