use serde::Serialize;

use crate::client::{PaginatedResponse, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub current_page: u32,
    pub page_size: u32,
    pub total: u64,
    pub total_pages: u64,
    pub from: u64,
    pub to: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl PaginationState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size,
            total: 0,
            total_pages: 0,
            from: 0,
            to: 0,
        }
    }

    /// Take the totals of a list response and recompute the visible range.
    pub fn apply(&mut self, response: &PaginatedResponse) {
        let page = u64::from(response.page.max(1));
        let size = u64::from(response.page_size);

        self.total = response.total;
        self.total_pages = response.total_pages;
        self.from = (page - 1) * size + 1;
        self.to = (page * size).min(response.total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(total: u64, page: u32, page_size: u32) -> PaginatedResponse {
        PaginatedResponse {
            data: Vec::new(),
            total,
            page,
            page_size,
            total_pages: total.div_ceil(u64::from(page_size)),
        }
    }

    #[test]
    fn test_apply_computes_range() {
        let mut state = PaginationState::default();
        state.apply(&response(45, 3, 20));
        assert_eq!((state.from, state.to, state.total_pages), (41, 45, 3));

        state.apply(&response(45, 2, 20));
        assert_eq!((state.from, state.to, state.total_pages), (21, 40, 3));

        state.apply(&response(45, 1, 20));
        assert_eq!((state.from, state.to), (1, 20));
    }

    #[test]
    fn test_defaults() {
        let state = PaginationState::default();
        assert_eq!(state.current_page, 1);
        assert_eq!(state.page_size, 20);
        assert_eq!(state.total, 0);
    }
}
