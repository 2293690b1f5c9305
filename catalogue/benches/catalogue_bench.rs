use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use catalogue::{BookCopy, Catalogue, StockBook};

fn populated_catalogue(num_books: usize) -> Catalogue {
    let cat = Catalogue::new();
    let books: Vec<StockBook> = (0..num_books as i64)
        .map(|i| StockBook::new(i + 1, "Title", "Author", 9.99, 100))
        .collect();
    cat.add_books(Some(books)).unwrap();
    cat
}

fn bench_add_books(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_books");

    for &num_books in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("bulk_insert", num_books), &num_books, |b, &num_books| {
            b.iter(|| {
                let cat = Catalogue::new();
                let books: Vec<StockBook> = (0..num_books as i64)
                    .map(|i| StockBook::new(i + 1, "Title", "Author", 9.99, 100))
                    .collect();
                black_box(cat.add_books(Some(books)).unwrap());
            })
        });
    }

    group.finish();
}

fn bench_buy_books(c: &mut Criterion) {
    let mut group = c.benchmark_group("buy_books");

    for &num_books in [10, 100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("single_isbn_repeated", num_books), &num_books, |b, &num_books| {
            b.iter_batched(
                || populated_catalogue(num_books),
                |cat| {
                    black_box(cat.buy_books(Some(vec![BookCopy::new(1, 1)])).unwrap());
                },
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_add_copies_same_isbn_duplicated(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_copies");

    group.bench_function("duplicate_isbn_set_sums_deltas", |b| {
        let cat = populated_catalogue(1);
        b.iter(|| {
            black_box(
                cat.add_copies(Some(vec![BookCopy::new(1, 1), BookCopy::new(1, 1), BookCopy::new(1, 1)]))
                    .unwrap(),
            )
        });
    });

    group.finish();
}

fn bench_get_books(c: &mut Criterion) {
    let mut group = c.benchmark_group("reads");

    for &num_books in [100, 1_000, 10_000].iter() {
        let cat = populated_catalogue(num_books);
        group.bench_with_input(BenchmarkId::new("get_books", num_books), &num_books, |b, _| {
            b.iter(|| black_box(cat.get_books()))
        });

        let isbns: Vec<i64> = (1..=num_books as i64).collect();
        group.bench_with_input(BenchmarkId::new("get_books_by_isbn", num_books), &num_books, |b, _| {
            b.iter(|| black_box(cat.get_books_by_isbn(Some(isbns.clone())).unwrap()))
        });
    }

    group.finish();
}

fn bench_contended_mixed_workload(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended_mixed_workload");

    group.bench_function("concurrent_buy_and_read", |b| {
        b.iter_batched(
            || std::sync::Arc::new(populated_catalogue(16)),
            |cat| {
                std::thread::scope(|s| {
                    for isbn in 1..=8 {
                        let cat = cat.clone();
                        s.spawn(move || {
                            for _ in 0..50 {
                                let _ = cat.buy_books(Some(vec![BookCopy::new(isbn, 1)]));
                            }
                        });
                    }
                    for _ in 0..4 {
                        let cat = cat.clone();
                        s.spawn(move || {
                            for _ in 0..50 {
                                black_box(cat.get_books());
                            }
                        });
                    }
                });
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_add_books,
    bench_buy_books,
    bench_add_copies_same_isbn_duplicated,
    bench_get_books,
    bench_contended_mixed_workload,
);
criterion_main!(benches);
