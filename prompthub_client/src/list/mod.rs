use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crate::api::PromptBackend;
use crate::filters::{FilterPatch, FilterState};
use crate::models::{Meta, Prompt};

mod messages;
mod state;
mod tasks;

pub use messages::ListMessage;
pub use state::{Applied, FetchMode, FetchTicket, ListState};

/// Drives one prompt list view: fetches run on worker threads and report back
/// over a channel, and [`poll`](Self::poll) folds their results into the
/// [`ListState`].
pub struct ListController<B: PromptBackend> {
    backend: B,
    state: ListState,
    meta: Option<Meta>,
    meta_loading: bool,
    tx: Sender<ListMessage>,
    rx: Receiver<ListMessage>,
}

impl<B: PromptBackend> ListController<B> {
    pub fn new(backend: B, page_size: u32) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            state: ListState::new(page_size),
            meta: None,
            meta_loading: false,
            tx,
            rx,
        }
    }

    /// Loads the catalog and the first page under default filters.
    pub fn start(&mut self) {
        if self.meta.is_none() && !self.meta_loading {
            self.meta_loading = true;
            tasks::load_meta(self.backend.clone(), self.tx.clone());
        }
        self.refresh();
    }

    pub fn refresh(&mut self) {
        let ticket = self.state.refresh();
        tasks::fetch_page(self.backend.clone(), self.tx.clone(), ticket);
    }

    pub fn set_filters(&mut self, patch: FilterPatch) {
        let ticket = self.state.set_filters(patch);
        tasks::fetch_page(self.backend.clone(), self.tx.clone(), ticket);
    }

    pub fn reset(&mut self) {
        let ticket = self.state.reset();
        tasks::fetch_page(self.backend.clone(), self.tx.clone(), ticket);
    }

    /// Returns `false` when the request was ignored because a fetch is still
    /// outstanding or nothing is left to load.
    pub fn load_more(&mut self) -> bool {
        match self.state.load_more() {
            Some(ticket) => {
                tasks::fetch_page(self.backend.clone(), self.tx.clone(), ticket);
                true
            }
            None => false,
        }
    }

    /// Applies every result that has arrived so far without blocking.
    pub fn poll(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(message) = self.rx.try_recv() {
            messages::process_message(self, message);
            handled += 1;
        }
        handled
    }

    /// Blocks until no fetch is outstanding. Returns `false` on timeout.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll();
        while self.is_busy() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(message) => messages::process_message(self, message),
                Err(RecvTimeoutError::Timeout) => return false,
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    pub fn is_busy(&self) -> bool {
        self.state.is_busy() || self.meta_loading
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn filters(&self) -> &FilterState {
        self.state.filters()
    }

    pub fn items(&self) -> &[Prompt] {
        self.state.items()
    }

    pub fn total(&self) -> u64 {
        self.state.total()
    }

    pub fn page(&self) -> u32 {
        self.state.page()
    }

    pub fn has_more(&self) -> bool {
        self.state.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    pub fn is_loading_more(&self) -> bool {
        self.state.is_loading_more()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error()
    }

    pub fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }
}
