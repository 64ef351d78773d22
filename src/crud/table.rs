//! Paging, sorting and filter state of a data table.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::watch;

use crate::client::{QueryParams, SortOrder, DEFAULT_PAGE_SIZE};
use crate::models::{is_empty_value, Record};

/// Delay after the last keystroke before a search is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    current_page: u32,
    page_size: u32,
    default_page_size: u32,
    sort_field: Option<String>,
    sort_order: SortOrder,
    filters: Record,
    global_search: String,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl TableState {
    pub fn new(page_size: u32) -> Self {
        Self {
            current_page: 1,
            page_size,
            default_page_size: page_size,
            sort_field: None,
            sort_order: SortOrder::Asc,
            filters: Record::new(),
            global_search: String::new(),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn filters(&self) -> &Record {
        &self.filters
    }

    pub fn global_search(&self) -> &str {
        &self.global_search
    }

    pub fn set_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
        self.current_page = 1;
    }

    /// Sort by `field` ascending, or flip the order if it is already the
    /// sort field.
    pub fn toggle_sort(&mut self, field: &str) {
        if self.sort_field.as_deref() == Some(field) {
            self.sort_order = match self.sort_order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
        } else {
            self.sort_field = Some(field.to_string());
            self.sort_order = SortOrder::Asc;
        }
    }

    /// Set or, for an empty value, remove a filter. Always back to page 1.
    pub fn set_filter(&mut self, field: &str, value: Value) {
        if is_empty_value(Some(&value)) {
            self.filters.remove(field);
        } else {
            self.filters.insert(field.to_string(), value);
        }
        self.current_page = 1;
    }

    pub fn clear_filter(&mut self, field: &str) {
        self.filters.remove(field);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.global_search.clear();
        self.current_page = 1;
    }

    pub fn set_global_search(&mut self, term: impl Into<String>) {
        self.global_search = term.into();
        self.current_page = 1;
    }

    pub fn query_params(&self) -> QueryParams {
        QueryParams {
            page: Some(self.current_page),
            page_size: Some(self.page_size),
            sort_field: self.sort_field.clone(),
            sort_order: Some(self.sort_order),
            search: Some(self.global_search.clone()).filter(|s| !s.is_empty()),
            filters: self.filters.clone(),
        }
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
        self.page_size = self.default_page_size;
        self.sort_field = None;
        self.sort_order = SortOrder::Asc;
        self.clear_filters();
    }
}

/// Feeds keystrokes into a [`SearchDebouncer`].
#[derive(Debug, Clone)]
pub struct SearchInput(Arc<watch::Sender<String>>);

impl SearchInput {
    pub fn send(&self, term: impl Into<String>) {
        self.0.send_replace(term.into());
    }
}

/// Settles a stream of search keystrokes into the latest term once input
/// has been quiet for the configured delay.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    input: SearchInput,
    rx: watch::Receiver<String>,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = watch::channel(String::new());
        Self {
            delay,
            input: SearchInput(Arc::new(tx)),
            rx,
        }
    }

    pub fn input(&self) -> SearchInput {
        self.input.clone()
    }

    /// Wait for the next keystroke, then until no further keystroke arrives
    /// within the delay. Returns the latest term.
    pub async fn settled(&mut self) -> Option<String> {
        self.rx.changed().await.ok()?;
        loop {
            match tokio::time::timeout(self.delay, self.rx.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) => return None,
                Err(_) => return Some(self.rx.borrow_and_update().clone()),
            }
        }
    }
}
