//! Error taxonomy for every Catalogue operation.
//!
//! Every public [`crate::catalogue::Catalogue`] method returns
//! `Result<T, CatalogueError>`. A failed call has no observable effect on
//! the catalogue except [`CatalogueError::OutOfStock`], whose sale-miss
//! bookkeeping is recorded before the error is returned (see
//! `Catalogue::buy_books`).

use crate::types::Isbn;
use thiserror::Error;

/// Everything that can go wrong calling into the catalogue.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogueError {
    /// A required set argument was `None`.
    #[error("input set was null")]
    NullInput,

    /// An ISBN was not a positive integer.
    #[error("invalid isbn {0}: must be >= 1")]
    InvalidIsbn(Isbn),

    /// A `StockBook`'s title, author, or price failed validation.
    #[error("invalid book fields for isbn {isbn}: {reason}")]
    InvalidBookFields { isbn: Isbn, reason: String },

    /// Attempted to insert an ISBN that is already present.
    #[error("isbn {0} already present")]
    DuplicateIsbn(Isbn),

    /// Referenced an ISBN that is not present in the catalogue.
    #[error("isbn {0} not present")]
    IsbnNotPresent(Isbn),

    /// A copy-count delta was less than 1.
    #[error("invalid copy count {count} for isbn {isbn}: must be >= 1")]
    InvalidCopyCount { isbn: Isbn, count: i64 },

    /// A rating fell outside `[0, 5]`.
    #[error("invalid rating {rating} for isbn {isbn}: must be in [0, 5]")]
    InvalidRating { isbn: Isbn, rating: i64 },

    /// `buy_books` requested more copies than were available.
    ///
    /// By the time this is returned, `num_sale_misses` has already been
    /// incremented for every ISBN that fell short, including this one.
    #[error("out of stock for isbn {isbn}: requested {requested}, available {available}")]
    OutOfStock {
        isbn: Isbn,
        requested: i64,
        available: i64,
    },

    /// An argument outside the operation's valid domain (e.g. a negative
    /// sample size).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
