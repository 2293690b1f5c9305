//! Bookstore Catalogue Stress & Throughput Lab
//!
//! Runs latency microbenchmarks against the catalogue core followed by a
//! sustained multi-threaded mixed-workload run, then a small functional
//! demo of the core operations.

use catalogue::{BookCopy, BookEditorPick, BookRating, Catalogue, StockBook};

mod stress;

fn main() {
    println!("=== Bookstore Catalogue Stress Lab ===");

    stress::run_latency_tests();

    println!("=== Sustained Throughput Test ===");
    stress::run_concurrency_test(8, 50_000);

    println!("=== Basic Demo ===");
    run_basic_demo();
}

/// Demonstrates basic catalogue functionality end to end.
fn run_basic_demo() {
    let catalogue = Catalogue::new();

    println!("Bookstore Catalogue - Demo");

    let books = vec![
        StockBook::new(9780140283334, "The Great Gatsby", "F. Scott Fitzgerald", 10.99, 5),
        StockBook::new(9780061120084, "To Kill a Mockingbird", "Harper Lee", 12.50, 3),
    ];

    println!("Adding {} titles", books.len());
    catalogue.add_books(Some(books)).unwrap();

    println!("Buying 2 copies of isbn 9780140283334");
    catalogue.buy_books(Some(vec![BookCopy::new(9780140283334, 2)])).unwrap();

    println!("Rating isbn 9780061120084 as 5");
    catalogue.rate_books(Some(vec![BookRating::new(9780061120084, 5)])).unwrap();

    println!("Flagging isbn 9780061120084 as an editor pick");
    catalogue.update_editor_picks(Some(vec![BookEditorPick::new(9780061120084, true)])).unwrap();

    for book in catalogue.get_books() {
        println!(
            "  {} by {} - {} copies, {:.2} avg rating, editor_pick={}",
            book.title,
            book.author,
            book.num_copies,
            book.average_rating(),
            book.editor_pick
        );
    }

    println!("Attempting to buy 100 copies of isbn 9780061120084 (expect OutOfStock)");
    match catalogue.buy_books(Some(vec![BookCopy::new(9780061120084, 100)])) {
        Ok(()) => unreachable!(),
        Err(e) => println!("  got expected error: {e}"),
    }

    println!("Books in demand: {:?}", catalogue.get_books_in_demand().unwrap().iter().map(|b| b.isbn).collect::<Vec<_>>());
}
