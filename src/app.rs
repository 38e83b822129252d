//! Application state for the terminal front end.
//!
//! `App` is the loader's consumer: loader events are dispatched into it via
//! [`LoaderCallbacks`], and [`crate::ui`] renders whatever it holds.

use ratatui::widgets::ListState;

use crate::loader::{LoadResult, LoaderCallbacks};
use crate::source::NewsItem;

pub const NO_NEWS: &str = "No news found.";
pub const NO_CONNECTION: &str = "No internet connection.";

pub struct App {
    /// Articles of the last successful load, in server order.
    pub items: Vec<NewsItem>,
    /// List selection state for scrolling.
    pub list_state: ListState,
    /// Whether a load is in flight (drives the loading indicator).
    pub loading: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Status / empty-state message.
    pub status: String,
    reload_requested: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            list_state: ListState::default(),
            loading: false,
            quit: false,
            status: String::new(),
            reload_requested: false,
        }
    }

    /// Shown instead of loading when the connectivity probe fails.
    pub fn show_offline(&mut self) {
        self.loading = false;
        self.status = NO_CONNECTION.into();
    }

    pub fn request_reload(&mut self) {
        self.reload_requested = true;
    }

    /// Returns `true` once per reload request.
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    pub fn selected_item(&self) -> Option<&NewsItem> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(self.items.len() - 1));
        }
    }

    fn clear_items(&mut self) {
        self.items.clear();
        self.list_state.select(None);
    }
}

impl LoaderCallbacks for App {
    fn on_load_started(&mut self) {
        self.loading = true;
        self.status = "Loading…".into();
    }

    fn on_load_finished(&mut self, result: LoadResult) {
        self.loading = false;
        self.clear_items();

        match result {
            LoadResult::Success(items) if !items.is_empty() => {
                self.status = format!("Fetched {} articles", items.len());
                self.items = items;
                self.select_first();
            }
            LoadResult::Success(_) => self.status = NO_NEWS.into(),
            // Every failure reads as "no results"; the cause goes alongside.
            LoadResult::Failure(e) => self.status = format!("{NO_NEWS} ({e})"),
        }
    }

    fn on_reset(&mut self) {
        self.loading = false;
        self.clear_items();
        self.status.clear();
    }
}
