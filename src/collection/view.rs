use std::cmp::Ordering;

use serde::Serialize;

use super::error::CollectionError;

/// Borrowing pipeline over an already-fetched slice of records.
///
/// Stages apply in a fixed order regardless of call order in the caller:
/// construct with the full slice, narrow it with `search`/`filter` (all
/// predicates AND together), order it with `sort_by`, then cut one page.
/// The source slice is never copied or mutated; a page borrows from it.
pub struct CollectionView<'a, T> {
    items: Vec<&'a T>,
}

impl<'a, T> CollectionView<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self {
            items: items.iter().collect(),
        }
    }

    /// Case-insensitive substring match over the fields the accessor
    /// designates. An empty or whitespace needle keeps every item.
    pub fn search<F>(mut self, term: &str, fields: F) -> Self
    where
        F: Fn(&T) -> Vec<&str>,
    {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return self;
        }
        self.items.retain(|&item| {
            fields(item)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
        self
    }

    /// Keeps items the predicate accepts. Chained calls AND together.
    pub fn filter<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&T) -> bool,
    {
        self.items.retain(|&item| predicate(item));
        self
    }

    /// Orders the remaining items. The underlying sort is stable, so items
    /// that compare equal keep their fetch order and re-sorting with the
    /// same comparator never reshuffles.
    pub fn sort_by<C>(mut self, comparator: C) -> Self
    where
        C: Fn(&T, &T) -> Ordering,
    {
        self.items.sort_by(|&a, &b| comparator(a, b));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cuts the 1-based `page` out of the narrowed, ordered items.
    ///
    /// A page past the end is not an error: it yields an empty `items` with
    /// the totals intact, and the caller renders its explicit empty state.
    pub fn page(self, page: u32, per_page: u32) -> Result<Page<'a, T>, CollectionError> {
        if page == 0 {
            return Err(CollectionError::InvalidPage);
        }
        if per_page == 0 {
            return Err(CollectionError::InvalidPageSize);
        }

        let total_filtered = self.items.len();
        let per = per_page as usize;
        let total_pages = ((total_filtered + per - 1) / per) as u32;

        let start = (page as usize - 1) * per;
        let items = if start >= total_filtered {
            Vec::new()
        } else {
            self.items[start..(start + per).min(total_filtered)].to_vec()
        };

        Ok(Page {
            items,
            total_filtered,
            total_pages,
            page,
            per_page,
        })
    }
}

/// One rendered page plus the navigation facts derived from the whole
/// filtered set. `total_pages` is zero when nothing matched.
#[derive(Debug, Serialize)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    pub total_filtered: usize,
    pub total_pages: u32,
    pub page: u32,
    pub per_page: u32,
}

impl<'a, T> Page<'a, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1 && self.total_pages > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Row {
        name: &'static str,
        status: &'static str,
        count: u32,
    }

    fn row(name: &'static str, status: &'static str, count: u32) -> Row {
        Row { name, status, count }
    }

    fn fixture() -> Vec<Row> {
        vec![
            row("Acme", "completed", 12),
            row("Borealis", "running", 0),
            row("Cascade", "completed", 7),
            row("Dune", "failed", 0),
            row("Ember", "completed", 7),
        ]
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let rows = fixture();
        let view = CollectionView::new(&rows).search("ACM", |r| vec![r.name, r.status]);
        assert_eq!(view.len(), 1);

        let view = CollectionView::new(&rows).search("  ", |r| vec![r.name]);
        assert_eq!(view.len(), 5);
    }

    #[test]
    fn chained_filters_and_together() {
        let rows = fixture();
        let page = CollectionView::new(&rows)
            .filter(|r| r.status == "completed")
            .filter(|r| r.count > 7)
            .page(1, 10)
            .unwrap();

        assert_eq!(page.total_filtered, 1);
        assert_eq!(page.items[0].name, "Acme");
    }

    #[test]
    fn sort_is_stable_and_idempotent() {
        let rows = fixture();
        let by_count = |a: &Row, b: &Row| b.count.cmp(&a.count);

        let once: Vec<&str> = CollectionView::new(&rows)
            .sort_by(by_count)
            .page(1, 10)
            .unwrap()
            .items
            .iter()
            .map(|r| r.name)
            .collect();
        // Ties (7, 7 and 0, 0) keep fetch order.
        assert_eq!(once, vec!["Acme", "Cascade", "Ember", "Borealis", "Dune"]);

        let twice: Vec<&str> = CollectionView::new(&rows)
            .sort_by(by_count)
            .sort_by(by_count)
            .page(1, 10)
            .unwrap()
            .items
            .iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn page_math_rounds_up_and_overshoot_is_empty() {
        let rows: Vec<Row> = (0..23).map(|i| row("x", if i < 15 { "completed" } else { "running" }, i)).collect();

        let first = CollectionView::new(&rows)
            .filter(|r| r.status == "completed")
            .page(1, 10)
            .unwrap();
        assert_eq!(first.total_filtered, 15);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.len(), 10);
        assert!(first.has_next());
        assert!(!first.has_prev());

        let second = CollectionView::new(&rows)
            .filter(|r| r.status == "completed")
            .page(2, 10)
            .unwrap();
        assert_eq!(second.len(), 5);
        assert!(!second.has_next());

        // A page that was valid before the filter narrowed the set.
        let stale = CollectionView::new(&rows)
            .filter(|r| r.status == "completed")
            .page(3, 10)
            .unwrap();
        assert!(stale.is_empty());
        assert_eq!(stale.total_filtered, 15);
        assert_eq!(stale.total_pages, 2);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let rows: Vec<Row> = (0..20).map(|i| row("x", "completed", i)).collect();
        let page = CollectionView::new(&rows).page(2, 10).unwrap();
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.len(), 10);
        assert!(!page.has_next());
    }

    #[test]
    fn empty_input_yields_zero_pages() {
        let rows: Vec<Row> = Vec::new();
        let page = CollectionView::new(&rows).page(1, 10).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_filtered, 0);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
        assert!(!page.has_prev());
    }

    #[test]
    fn rejects_zero_page_and_zero_size() {
        let rows = fixture();
        assert_eq!(
            CollectionView::new(&rows).page(0, 10).unwrap_err(),
            CollectionError::InvalidPage
        );
        assert_eq!(
            CollectionView::new(&rows).page(1, 0).unwrap_err(),
            CollectionError::InvalidPageSize
        );
    }
}
