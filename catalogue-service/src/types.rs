//! Wire DTOs for the REST surface. These mirror the `catalogue` crate's
//! value types field-for-field; kept separate so the wire format can
//! evolve (e.g. renamed JSON keys) without touching the core crate.

use catalogue::{Book, BookCopy, BookEditorPick, BookRating, StockBook};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockBookDto {
    pub isbn: i64,
    pub title: String,
    pub author: String,
    pub price: f64,
    pub num_copies: i64,
    pub num_sale_misses: i64,
    pub total_rating: i64,
    pub num_times_rated: i64,
    pub editor_pick: bool,
}

impl From<StockBook> for StockBookDto {
    fn from(b: StockBook) -> Self {
        Self {
            isbn: b.isbn,
            title: b.title,
            author: b.author,
            price: b.price,
            num_copies: b.num_copies,
            num_sale_misses: b.num_sale_misses,
            total_rating: b.total_rating,
            num_times_rated: b.num_times_rated,
            editor_pick: b.editor_pick,
        }
    }
}

impl From<StockBookDto> for StockBook {
    fn from(b: StockBookDto) -> Self {
        Self {
            isbn: b.isbn,
            title: b.title,
            author: b.author,
            price: b.price,
            num_copies: b.num_copies,
            num_sale_misses: b.num_sale_misses,
            total_rating: b.total_rating,
            num_times_rated: b.num_times_rated,
            editor_pick: b.editor_pick,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDto {
    pub isbn: i64,
    pub title: String,
    pub author: String,
    pub price: f64,
}

impl From<Book> for BookDto {
    fn from(b: Book) -> Self {
        Self { isbn: b.isbn, title: b.title, author: b.author, price: b.price }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookCopyDto {
    pub isbn: i64,
    pub count: i64,
}

impl From<BookCopyDto> for BookCopy {
    fn from(c: BookCopyDto) -> Self {
        BookCopy::new(c.isbn, c.count)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookRatingDto {
    pub isbn: i64,
    pub rating: u8,
}

impl From<BookRatingDto> for BookRating {
    fn from(r: BookRatingDto) -> Self {
        BookRating::new(r.isbn, r.rating)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BookEditorPickDto {
    pub isbn: i64,
    pub editor_pick: bool,
}

impl From<BookEditorPickDto> for BookEditorPick {
    fn from(p: BookEditorPickDto) -> Self {
        BookEditorPick::new(p.isbn, p.editor_pick)
    }
}

/// Shared shape for every `set<isbn>`-style request body.
#[derive(Debug, Clone, Deserialize)]
pub struct IsbnSetRequest {
    pub isbns: Vec<i64>,
}

/// Shared shape for the `int` argument operations take (`k` picks / top-rated).
#[derive(Debug, Clone, Deserialize)]
pub struct CountQuery {
    pub k: i64,
}
