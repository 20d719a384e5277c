use log::{debug, info, warn};

use crate::api::ApiError;
use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::filters::{FilterPatch, FilterState};
use crate::models::{Prompt, PromptPage};
use crate::query::{ListRequest, PageCursor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// First page under new filters; replaces the accumulated list.
    Replace,
    /// Next page under the current filters; appended to the list.
    Append,
}

/// A fetch the caller must perform and hand back to [`ListState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub cursor: PageCursor,
    pub mode: FetchMode,
    pub request: ListRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Committed,
    /// Superseded by a newer filter change; dropped untouched.
    Stale,
    /// The fetch failed; previous items and total are kept.
    Failed,
}

/// Filter selection, page cursor and accumulated results of one list view.
///
/// Every replace fetch bumps `generation`; results carrying an older
/// generation are discarded, so a slow response for old filters can never
/// overwrite the results of newer ones.
///
/// `items` and `page` always describe a committed result set under
/// `loaded_filters`. Paging is only offered while that matches `filters`.
#[derive(Debug, Clone)]
pub struct ListState {
    filters: FilterState,
    loaded_filters: FilterState,
    page_size: u32,
    page: u32,
    items: Vec<Prompt>,
    total: u64,
    loading: bool,
    loading_more: bool,
    generation: u64,
    last_error: Option<String>,
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListState {
    pub fn new(page_size: u32) -> Self {
        Self {
            filters: FilterState::default(),
            loaded_filters: FilterState::default(),
            page_size: page_size.max(1),
            page: 1,
            items: Vec::new(),
            total: 0,
            loading: false,
            loading_more: false,
            generation: 0,
            last_error: None,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn items(&self) -> &[Prompt] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False while the visible items were loaded under other filters than
    /// the current ones, e.g. after a failed filter change.
    pub fn has_more(&self) -> bool {
        self.filters == self.loaded_filters && (self.items.len() as u64) < self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_loading_more(&self) -> bool {
        self.loading_more
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.loading_more
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Re-fetches the first page under the current filters.
    pub fn refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        self.loading_more = false;
        let cursor = PageCursor::first(self.page_size);
        FetchTicket {
            generation: self.generation,
            cursor,
            mode: FetchMode::Replace,
            request: ListRequest::build(&self.filters, cursor),
        }
    }

    pub fn set_filters(&mut self, patch: FilterPatch) -> FetchTicket {
        self.filters.apply(patch);
        self.refresh()
    }

    pub fn reset(&mut self) -> FetchTicket {
        self.filters = FilterState::default();
        self.refresh()
    }

    /// Requests the next page. Refused while any fetch is outstanding or once
    /// every item has been loaded.
    pub fn load_more(&mut self) -> Option<FetchTicket> {
        if self.is_busy() || !self.has_more() {
            return None;
        }
        self.loading_more = true;
        let cursor = PageCursor::new(self.page, self.page_size).next();
        Some(FetchTicket {
            generation: self.generation,
            cursor,
            mode: FetchMode::Append,
            request: ListRequest::build(&self.filters, cursor),
        })
    }

    pub fn apply(&mut self, ticket: &FetchTicket, result: Result<PromptPage, ApiError>) -> Applied {
        let in_flight = match ticket.mode {
            FetchMode::Replace => self.loading,
            FetchMode::Append => self.loading_more,
        };
        if ticket.generation != self.generation || !in_flight {
            debug!(
                "discarding stale page {} (generation {}, current {})",
                ticket.cursor.page(),
                ticket.generation,
                self.generation
            );
            return Applied::Stale;
        }

        match ticket.mode {
            FetchMode::Replace => self.loading = false,
            FetchMode::Append => self.loading_more = false,
        }

        match result {
            Ok(page) => {
                info!(
                    "loaded page {} with {} prompts (total {})",
                    ticket.cursor.page(),
                    page.items.len(),
                    page.total
                );
                match ticket.mode {
                    FetchMode::Replace => {
                        self.items = page.items;
                        self.loaded_filters = self.filters.clone();
                    }
                    FetchMode::Append => self.items.extend(page.items),
                }
                self.total = page.total;
                self.page = ticket.cursor.page();
                self.last_error = None;
                Applied::Committed
            }
            Err(err) => {
                warn!("failed to load page {}: {err}", ticket.cursor.page());
                self.last_error = Some(err.to_string());
                Applied::Failed
            }
        }
    }
}
