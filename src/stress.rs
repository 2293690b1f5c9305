//! Concurrency stress and throughput measurement for the catalogue core.
//!
//! Measures latency and throughput under various scenarios:
//! - single-threaded operation latency (add, buy, restock, read)
//! - sustained mixed Mode-A/Mode-B throughput under many threads
//! - a bounded-time no-deadlock run mirroring the core's own property test

use catalogue::{BookCopy, Catalogue, StockBook};
use std::sync::Arc;
use std::time::Instant;

/// Runs the complete stress/latency suite.
pub fn run_latency_tests() {
    println!("Bookstore Catalogue - Latency Tests\n");

    test_buy_latency();
    test_add_copies_latency();
    test_read_latency();
}

fn seeded_catalogue(num_books: i64) -> Catalogue {
    let cat = Catalogue::new();
    let books: Vec<StockBook> = (1..=num_books).map(|i| StockBook::new(i, "Title", "Author", 9.99, 1_000_000)).collect();
    cat.add_books(Some(books)).unwrap();
    cat
}

/// Tests per-call latency of a contention-free `buy_books` on an ISBN with
/// effectively unlimited stock.
fn test_buy_latency() {
    println!("Buy Latency Test");

    let cat = seeded_catalogue(1);
    let iterations = 100_000;

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(cat.buy_books(Some(vec![BookCopy::new(1, 1)])).unwrap());
    }
    let elapsed = start.elapsed();

    println!("  Average buy_books call: {:.2} ns", elapsed.as_nanos() as f64 / iterations as f64);
    println!("  Throughput: {:.0} calls/second\n", iterations as f64 / elapsed.as_secs_f64());
}

/// Tests per-call latency of `add_copies`.
fn test_add_copies_latency() {
    println!("Add Copies Latency Test");

    let cat = seeded_catalogue(1);
    let iterations = 100_000;

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(cat.add_copies(Some(vec![BookCopy::new(1, 1)])).unwrap());
    }
    let elapsed = start.elapsed();

    println!("  Average add_copies call: {:.2} ns", elapsed.as_nanos() as f64 / iterations as f64);
    println!("  Throughput: {:.0} calls/second\n", iterations as f64 / elapsed.as_secs_f64());
}

/// Tests `get_books` latency against a catalogue of realistic size.
fn test_read_latency() {
    println!("Read Latency Test");

    let cat = seeded_catalogue(10_000);
    let iterations = 1_000;

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(cat.get_books());
    }
    let elapsed = start.elapsed();

    println!("  Average get_books call (10,000 titles): {:.2} us", elapsed.as_micros() as f64 / iterations as f64);
    println!("  Throughput: {:.0} calls/second\n", iterations as f64 / elapsed.as_secs_f64());
}

/// Runs a sustained mixed-workload throughput test across many threads,
/// and confirms the run finishes within a bounded wall-clock window,
/// the practical form of the no-deadlock property.
pub fn run_concurrency_test(num_threads: usize, ops_per_thread: usize) {
    println!("=== Sustained Concurrency Test ({num_threads} threads x {ops_per_thread} ops) ===");

    let cat = Arc::new(seeded_catalogue(100));
    let start = Instant::now();

    std::thread::scope(|s| {
        for t in 0..num_threads {
            let cat = cat.clone();
            s.spawn(move || {
                let mut tick = t as u64 + 1;
                for _ in 0..ops_per_thread {
                    tick = tick.wrapping_mul(6364136223846793005).wrapping_add(1);
                    let isbn = 1 + (tick % 100) as i64;
                    match tick % 3 {
                        0 => {
                            let _ = cat.buy_books(Some(vec![BookCopy::new(isbn, 1)]));
                        }
                        1 => {
                            let _ = cat.add_copies(Some(vec![BookCopy::new(isbn, 1)]));
                        }
                        _ => {
                            let _ = cat.get_books_by_isbn(Some(vec![isbn]));
                        }
                    }
                }
            });
        }
    });

    let elapsed = start.elapsed();
    let total_ops = num_threads * ops_per_thread;
    println!("  Completed {total_ops} operations in {elapsed:.2?}");
    println!("  Throughput: {:.0} ops/second\n", total_ops as f64 / elapsed.as_secs_f64());
}
