use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("page numbers start at 1")]
    InvalidPage,

    #[error("page size must be at least 1")]
    InvalidPageSize,
}
