use marquee_model::{DiscoverFilters, SortBy};
use tracing::debug;

use super::types::{BrowseMode, CatalogRequest, FetchTicket, PageCount};
use crate::catalog::clamp_total_pages;

/// Browse-mode state machine for one session.
///
/// Every transition that changes what should be on screen bumps `version`
/// and hands back the [`FetchTicket`] to issue. Transitions that change
/// nothing return `None` and issue no fetch.
#[derive(Debug, Clone)]
pub struct QueryState {
    mode: BrowseMode,
    filters: DiscoverFilters,
    default_sort: SortBy,
    search_text: String,
    page: u32,
    total_pages: u32,
    max_page: u32,
    version: u64,
}

impl QueryState {
    pub fn new(max_page: u32) -> Self {
        Self {
            mode: BrowseMode::Discover,
            filters: DiscoverFilters::default(),
            default_sort: SortBy::default(),
            search_text: String::new(),
            page: 1,
            total_pages: 1,
            max_page: max_page.max(1),
            version: 0,
        }
    }

    pub fn with_default_sort(mut self, sort_by: SortBy) -> Self {
        self.default_sort = sort_by;
        self.filters.sort_by = sort_by;
        self
    }

    pub fn mode(&self) -> BrowseMode {
        self.mode
    }

    pub fn filters(&self) -> &DiscoverFilters {
        &self.filters
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn current_request(&self) -> CatalogRequest {
        match self.mode {
            BrowseMode::Discover => CatalogRequest::Discover {
                filters: self.filters.clone(),
                page: self.page,
            },
            BrowseMode::Search => CatalogRequest::Search {
                query: self.search_text.clone(),
                page: self.page,
            },
        }
    }

    /// Ticket for the current state without transitioning.
    pub fn ticket(&self) -> FetchTicket {
        FetchTicket {
            version: self.version,
            request: self.current_request(),
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.version == self.version
    }

    /// Replace the filters and return to discovery at page 1.
    pub fn set_filters(&mut self, filters: DiscoverFilters) -> FetchTicket {
        self.mode = BrowseMode::Discover;
        self.search_text.clear();
        self.filters = filters;
        self.page = 1;
        self.advance()
    }

    pub fn clear_filters(&mut self) -> FetchTicket {
        let defaults = DiscoverFilters::default().with_sort(self.default_sort);
        self.set_filters(defaults)
    }

    /// Blank text leaves search mode (or does nothing in discovery).
    pub fn submit_search(&mut self, text: &str) -> Option<FetchTicket> {
        let text = text.trim();
        if text.is_empty() {
            if self.mode == BrowseMode::Discover {
                return None;
            }
            self.mode = BrowseMode::Discover;
            self.search_text.clear();
        } else {
            self.mode = BrowseMode::Search;
            self.search_text = text.to_string();
        }
        self.page = 1;
        Some(self.advance())
    }

    /// Move to `page`, or do nothing when it is out of range.
    pub fn go_to_page(&mut self, page: u32) -> Option<FetchTicket> {
        if page < 1 || page > self.total_pages {
            debug!(page, total_pages = self.total_pages, "page out of range");
            return None;
        }
        self.page = page;
        Some(self.advance())
    }

    /// Record the service-reported page count from a completed fetch.
    ///
    /// Ignored for stale tickets. When the fetched page no longer exists
    /// the state moves to the last page and returns the ticket for it.
    pub fn apply_total_pages(
        &mut self,
        ticket: &FetchTicket,
        reported: u32,
    ) -> PageCount {
        if !self.is_current(ticket) {
            return PageCount::Stale;
        }
        self.total_pages = clamp_total_pages(reported, self.max_page);
        if self.page <= self.total_pages {
            return PageCount::Current;
        }

        debug!(
            requested = self.page,
            total = self.total_pages,
            "page past the end; moving to the last page"
        );
        self.page = self.total_pages;
        PageCount::Clamped(self.advance())
    }

    fn advance(&mut self) -> FetchTicket {
        self.version += 1;
        self.ticket()
    }
}
