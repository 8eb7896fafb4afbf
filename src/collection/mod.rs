//! List-screen mechanics shared by every resource: search, filters,
//! sorting, and pagination over records already fetched from the backend.
//!
//! The backend list endpoints return whole result sets; narrowing and
//! paging happen client-side. Every list screen runs the same fixed
//! pipeline so they cannot drift apart: filter (all predicates AND
//! together), stable sort, then slice one page.
//!
//! ```
//! use orm_console_rust::collection::CollectionView;
//!
//! let names = vec![
//!     "Acme".to_string(),
//!     "Borealis".to_string(),
//!     "Cascade".to_string(),
//! ];
//! let page = CollectionView::new(&names)
//!     .search("cas", |n| vec![n.as_str()])
//!     .page(1, 10)
//!     .unwrap();
//!
//! assert_eq!(page.total_filtered, 1);
//! assert_eq!(page.items[0], "Cascade");
//! ```

mod error;
mod state;
mod view;

pub use error::CollectionError;
pub use state::ListState;
pub use view::{CollectionView, Page};
