use tracing::warn;

use crate::config::config;

/// The mutable controls of one list screen: search needle, entity-specific
/// equality filters, sort key, and pagination.
///
/// Changing what the list shows (search, filters, sort, page size) always
/// snaps back to page 1. A page number retained across a narrowing change
/// can point past the new end and would render blank; resetting first makes
/// that state unrepresentable.
#[derive(Debug, Clone)]
pub struct ListState<F, S> {
    search: String,
    filters: F,
    sort: S,
    page: u32,
    per_page: u32,
}

impl<F: Default, S: Default> ListState<F, S> {
    pub fn new() -> Self {
        Self {
            search: String::new(),
            filters: F::default(),
            sort: S::default(),
            page: 1,
            per_page: config().list.per_page,
        }
    }
}

impl<F: Default, S: Default> Default for ListState<F, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F, S> ListState<F, S> {
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.page = 1;
    }

    pub fn set_filters(&mut self, filters: F) {
        self.filters = filters;
        self.page = 1;
    }

    pub fn update_filters(&mut self, apply: impl FnOnce(&mut F)) {
        apply(&mut self.filters);
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: S) {
        self.sort = sort;
        self.page = 1;
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        let max = config().list.max_per_page;
        self.per_page = if per_page == 0 {
            warn!("page size 0 requested, using 1");
            1
        } else if per_page > max {
            warn!("page size {} exceeds maximum, capping at {}", per_page, max);
            max
        } else {
            per_page
        };
        self.page = 1;
    }

    /// Navigation only; never widens or narrows the list.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn sort(&self) -> &S {
        &self.sort
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Filters {
        status: Option<&'static str>,
    }

    #[derive(Debug, Default, Clone, Copy, PartialEq)]
    enum Sort {
        #[default]
        Latest,
        Oldest,
    }

    #[test]
    fn narrowing_changes_reset_page() {
        let mut state: ListState<Filters, Sort> = ListState::new();

        state.set_page(4);
        assert_eq!(state.page(), 4);
        state.set_search("acme");
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.update_filters(|f| f.status = Some("completed"));
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_sort(Sort::Oldest);
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_per_page(25);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn plain_navigation_keeps_everything_else() {
        let mut state: ListState<Filters, Sort> = ListState::new();
        state.set_search("dune");
        state.set_page(3);

        assert_eq!(state.search(), "dune");
        assert_eq!(state.page(), 3);
        assert_eq!(*state.sort(), Sort::Latest);
    }

    #[test]
    fn per_page_is_clamped_to_configured_bounds() {
        let mut state: ListState<Filters, Sort> = ListState::new();

        state.set_per_page(0);
        assert_eq!(state.per_page(), 1);

        state.set_per_page(100_000);
        assert_eq!(state.per_page(), config().list.max_per_page);
    }

    #[test]
    fn page_zero_is_normalized_to_first() {
        let mut state: ListState<Filters, Sort> = ListState::new();
        state.set_page(0);
        assert_eq!(state.page(), 1);
    }
}
