//! The Catalogue: owns the ISBN → Lockable Record map and implements every
//! public operation under the two-level locking protocol.
//!
//! Mode-A operations ([`Catalogue::add_books`], [`Catalogue::remove_books`],
//! [`Catalogue::remove_all_books`]) take the catalogue-wide write lock;
//! no per-record locks are needed because no other operation can be in
//! flight while one runs. Mode-B operations take the catalogue-wide read
//! lock, which freezes the key set for the call's duration, and then
//! acquire per-record locks, in ascending-ISBN order, for exactly the
//! records touched. No call path ever takes a per-record lock without
//! first holding the catalogue-wide read lock, and no call path takes the
//! catalogue-wide write lock while holding any per-record lock; together
//! these rule out the only two ways a cycle could form between the two
//! lock levels.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::error::CatalogueError;
use crate::lockable_record::LockableRecord;
use crate::record::Record;
use crate::sampling::sample_distinct_indices;
use crate::types::{Book, BookCopy, BookEditorPick, BookRating, Isbn, StockBook};

/// The in-memory bookstore catalogue. Safe for arbitrary concurrent use
/// by any number of threads.
pub struct Catalogue {
    records: RwLock<BTreeMap<Isbn, Arc<LockableRecord>>>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalogue {
    /// Creates an empty catalogue.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn map_read(&self) -> RwLockReadGuard<'_, BTreeMap<Isbn, Arc<LockableRecord>>> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn map_write(&self) -> RwLockWriteGuard<'_, BTreeMap<Isbn, Arc<LockableRecord>>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ----------------------------------------------------------------
    // Mode A - catalogue-exclusive
    // ----------------------------------------------------------------

    /// Validates and inserts every book in `books`. All-or-nothing: if any
    /// entry fails validation, against the existing catalogue or against
    /// the rest of this same input set, none is inserted.
    pub fn add_books(&self, books: Option<Vec<StockBook>>) -> Result<(), CatalogueError> {
        let books = books.ok_or(CatalogueError::NullInput)?;
        debug!(count = books.len(), "add_books entered");

        let mut map = self.map_write();

        let mut seen_in_call = HashSet::new();
        for book in &books {
            validate_isbn(book.isbn)?;
            if book.title.trim().is_empty() {
                return Err(CatalogueError::InvalidBookFields {
                    isbn: book.isbn,
                    reason: "title is empty".into(),
                });
            }
            if book.author.trim().is_empty() {
                return Err(CatalogueError::InvalidBookFields {
                    isbn: book.isbn,
                    reason: "author is empty".into(),
                });
            }
            if book.price < 0.0 {
                return Err(CatalogueError::InvalidBookFields {
                    isbn: book.isbn,
                    reason: "price is negative".into(),
                });
            }
            if book.num_copies < 0 {
                return Err(CatalogueError::InvalidBookFields {
                    isbn: book.isbn,
                    reason: "num_copies is negative".into(),
                });
            }
            if map.contains_key(&book.isbn) || !seen_in_call.insert(book.isbn) {
                warn!(isbn = book.isbn, "add_books rejected: duplicate isbn");
                return Err(CatalogueError::DuplicateIsbn(book.isbn));
            }
        }

        for book in &books {
            map.insert(book.isbn, Arc::new(LockableRecord::new(Record::from_stock_book(book))));
        }
        debug!(total = map.len(), "add_books applied");
        Ok(())
    }

    /// Validates and removes every ISBN in `isbns`. All-or-nothing.
    pub fn remove_books(&self, isbns: Option<Vec<Isbn>>) -> Result<(), CatalogueError> {
        let isbns = isbns.ok_or(CatalogueError::NullInput)?;
        let mut map = self.map_write();

        for &isbn in &isbns {
            validate_isbn(isbn)?;
            if !map.contains_key(&isbn) {
                return Err(CatalogueError::IsbnNotPresent(isbn));
            }
        }

        for isbn in &isbns {
            map.remove(isbn);
        }
        debug!(count = isbns.len(), "remove_books applied");
        Ok(())
    }

    /// Empties the catalogue.
    pub fn remove_all_books(&self) {
        let mut map = self.map_write();
        map.clear();
        debug!("remove_all_books applied");
    }

    // ----------------------------------------------------------------
    // Mode B - catalogue-shared + per-record
    // ----------------------------------------------------------------

    /// Restocks copies. Validates the whole set, acquires a per-record
    /// write lock for each touched ISBN (ascending order), applies every
    /// delta, then releases the locks (descending order).
    pub fn add_copies(&self, copies: Option<Vec<BookCopy>>) -> Result<(), CatalogueError> {
        let copies = copies.ok_or(CatalogueError::NullInput)?;
        let map = self.map_read();

        for c in &copies {
            validate_isbn(c.isbn)?;
            if !map.contains_key(&c.isbn) {
                return Err(CatalogueError::IsbnNotPresent(c.isbn));
            }
            if c.count < 1 {
                return Err(CatalogueError::InvalidCopyCount { isbn: c.isbn, count: c.count });
            }
        }

        let grouped = group_by_isbn(copies.into_iter().map(|c| (c.isbn, c.count)));
        let mut guards = Vec::with_capacity(grouped.len());
        for (isbn, counts) in &grouped {
            let total: i64 = counts.iter().sum();
            let rec = map.get(isbn).expect("isbn validated above");
            guards.push((*isbn, total, rec.write()));
        }
        for (_, total, guard) in guards.iter_mut() {
            guard.add_copies(*total);
        }
        debug!(count = grouped.len(), "add_copies applied");
        release_in_reverse(guards);
        Ok(())
    }

    /// Attempts to buy every requested copy. Observably atomic across the
    /// whole input: either every purchase succeeds, or the call fails and
    /// the only mutation is per-ISBN sale-miss bookkeeping for the records
    /// that fell short (`requested - available` added to
    /// `num_sale_misses` for each such ISBN).
    pub fn buy_books(&self, copies: Option<Vec<BookCopy>>) -> Result<(), CatalogueError> {
        let copies = copies.ok_or(CatalogueError::NullInput)?;
        let map = self.map_read();

        for c in &copies {
            validate_isbn(c.isbn)?;
            if !map.contains_key(&c.isbn) {
                return Err(CatalogueError::IsbnNotPresent(c.isbn));
            }
            if c.count < 1 {
                return Err(CatalogueError::InvalidCopyCount { isbn: c.isbn, count: c.count });
            }
        }

        let grouped = group_by_isbn(copies.into_iter().map(|c| (c.isbn, c.count)));
        let mut guards = Vec::with_capacity(grouped.len());
        for (isbn, counts) in &grouped {
            let requested: i64 = counts.iter().sum();
            let rec = map.get(isbn).expect("isbn validated above");
            guards.push((*isbn, requested, rec.write()));
        }

        // Snapshot shortages under the held write locks before mutating
        // anything, so the decision to buy or record misses is made
        // against one consistent view.
        let mut first_shortfall: Option<(Isbn, i64, i64)> = None;
        for (isbn, requested, guard) in &guards {
            let available = guard.num_copies();
            if available < *requested && first_shortfall.is_none() {
                first_shortfall = Some((*isbn, *requested, available));
            }
        }

        if let Some((isbn, requested, available)) = first_shortfall {
            for (_, requested, guard) in guards.iter_mut() {
                let available = guard.num_copies();
                if available < *requested {
                    guard.add_sale_miss(*requested - available);
                }
            }
            warn!(isbn, requested, available, "buy_books: out of stock");
            release_in_reverse(guards);
            return Err(CatalogueError::OutOfStock { isbn, requested, available });
        }

        for (_, requested, guard) in guards.iter_mut() {
            guard.buy(*requested);
        }
        debug!(count = grouped.len(), "buy_books applied");
        release_in_reverse(guards);
        Ok(())
    }

    /// Applies one or more ratings to each touched book.
    pub fn rate_books(&self, ratings: Option<Vec<BookRating>>) -> Result<(), CatalogueError> {
        let ratings = ratings.ok_or(CatalogueError::NullInput)?;
        let map = self.map_read();

        for r in &ratings {
            validate_isbn(r.isbn)?;
            if !map.contains_key(&r.isbn) {
                return Err(CatalogueError::IsbnNotPresent(r.isbn));
            }
            if r.rating > 5 {
                return Err(CatalogueError::InvalidRating { isbn: r.isbn, rating: r.rating as i64 });
            }
        }

        let grouped = group_by_isbn(ratings.into_iter().map(|r| (r.isbn, r.rating)));
        let mut guards = Vec::with_capacity(grouped.len());
        for (isbn, values) in &grouped {
            let rec = map.get(isbn).expect("isbn validated above");
            guards.push((*isbn, values.clone(), rec.write()));
        }
        for (_, values, guard) in guards.iter_mut() {
            for &v in values.iter() {
                guard.add_rating(v);
            }
        }
        debug!(count = grouped.len(), "rate_books applied");
        release_in_reverse(guards);
        Ok(())
    }

    /// Sets the editor-pick flag on each touched book. When the same ISBN
    /// appears more than once in `picks`, the last flag in input order
    /// wins, an idempotent re-application, not an XOR or count.
    pub fn update_editor_picks(&self, picks: Option<Vec<BookEditorPick>>) -> Result<(), CatalogueError> {
        let picks = picks.ok_or(CatalogueError::NullInput)?;
        let map = self.map_read();

        for p in &picks {
            validate_isbn(p.isbn)?;
            if !map.contains_key(&p.isbn) {
                return Err(CatalogueError::IsbnNotPresent(p.isbn));
            }
        }

        let grouped = group_by_isbn(picks.into_iter().map(|p| (p.isbn, p.editor_pick)));
        let mut guards = Vec::with_capacity(grouped.len());
        for (isbn, flags) in &grouped {
            let rec = map.get(isbn).expect("isbn validated above");
            let flag = *flags.last().expect("group is never empty");
            guards.push((*isbn, flag, rec.write()));
        }
        for (_, flag, guard) in guards.iter_mut() {
            guard.set_editor_pick(*flag);
        }
        debug!(count = grouped.len(), "update_editor_picks applied");
        release_in_reverse(guards);
        Ok(())
    }

    /// Returns a snapshot of every book in the catalogue.
    pub fn get_books(&self) -> Vec<StockBook> {
        let map = self.map_read();
        map.values().map(|rec| rec.read().to_stock_book()).collect()
    }

    /// Returns snapshots for the requested ISBNs, in request order. Fails
    /// if any ISBN is invalid or absent.
    ///
    /// Holds a read guard on every requested record, ascending-ISBN order,
    /// for the whole snapshot rather than one at a time, so a concurrent
    /// `buy_books`/`add_copies` (which takes its write guards all at once
    /// too) can never land between two of these reads and hand back a
    /// split view of the set.
    pub fn get_books_by_isbn(&self, isbns: Option<Vec<Isbn>>) -> Result<Vec<StockBook>, CatalogueError> {
        let isbns = isbns.ok_or(CatalogueError::NullInput)?;
        let map = self.map_read();

        for &isbn in &isbns {
            validate_isbn(isbn)?;
            if !map.contains_key(&isbn) {
                return Err(CatalogueError::IsbnNotPresent(isbn));
            }
        }

        let unique: BTreeSet<Isbn> = isbns.iter().copied().collect();
        let mut guards = Vec::with_capacity(unique.len());
        for isbn in &unique {
            let rec = map.get(isbn).expect("isbn validated above");
            guards.push((*isbn, rec.read()));
        }

        let snapshots: HashMap<Isbn, StockBook> =
            guards.iter().map(|(isbn, guard)| (*isbn, guard.to_stock_book())).collect();
        let out = isbns.iter().map(|isbn| snapshots[isbn].clone()).collect();

        release_in_reverse(guards);
        Ok(out)
    }

    /// Returns the client-facing projection for the requested ISBNs, in
    /// request order. Fails if any ISBN is invalid or absent.
    ///
    /// Same hold-all-then-snapshot discipline as `get_books_by_isbn`, for
    /// the same reason: a multi-ISBN lookup must not observe a half-applied
    /// Mode-B mutation across the set.
    pub fn get_books_for_clients(&self, isbns: Option<Vec<Isbn>>) -> Result<Vec<Book>, CatalogueError> {
        let isbns = isbns.ok_or(CatalogueError::NullInput)?;
        let map = self.map_read();

        for &isbn in &isbns {
            validate_isbn(isbn)?;
            if !map.contains_key(&isbn) {
                return Err(CatalogueError::IsbnNotPresent(isbn));
            }
        }

        let unique: BTreeSet<Isbn> = isbns.iter().copied().collect();
        let mut guards = Vec::with_capacity(unique.len());
        for isbn in &unique {
            let rec = map.get(isbn).expect("isbn validated above");
            guards.push((*isbn, rec.read()));
        }

        let snapshots: HashMap<Isbn, Book> =
            guards.iter().map(|(isbn, guard)| (*isbn, guard.to_book())).collect();
        let out = isbns.iter().map(|isbn| snapshots[isbn].clone()).collect();

        release_in_reverse(guards);
        Ok(out)
    }

    /// Returns up to `k` editor picks. If at most `k` books are flagged,
    /// returns all of them; otherwise samples `k` distinct ones uniformly
    /// at random without replacement.
    pub fn get_editor_picks(&self, k: i64) -> Result<Vec<Book>, CatalogueError> {
        if k < 0 {
            return Err(CatalogueError::InvalidArgument(format!("k must be >= 0, got {k}")));
        }
        let map = self.map_read();
        let picks: Vec<Book> = map
            .values()
            .filter_map(|rec| {
                let guard = rec.read();
                guard.editor_pick().then(|| guard.to_book())
            })
            .collect();

        let k = k as usize;
        if picks.len() <= k {
            return Ok(picks);
        }
        let indices = sample_distinct_indices(picks.len(), k);
        Ok(indices.into_iter().map(|i| picks[i].clone()).collect())
    }

    /// Returns the `k` books with the greatest average rating, excluding
    /// unrated books, ties broken by ISBN ascending.
    pub fn get_top_rated_books(&self, k: i64) -> Result<Vec<Book>, CatalogueError> {
        if k < 0 {
            return Err(CatalogueError::InvalidArgument(format!("k must be >= 0, got {k}")));
        }
        let map = self.map_read();
        let mut rated: Vec<(Isbn, f64, Book)> = map
            .values()
            .filter_map(|rec| {
                let guard = rec.read();
                let avg = guard.average_rating();
                (avg >= 0.0).then(|| (guard.isbn(), avg, guard.to_book()))
            })
            .collect();

        rated.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));

        Ok(rated.into_iter().take(k as usize).map(|(_, _, book)| book).collect())
    }

    /// Returns snapshots of every book with at least one sale miss.
    pub fn get_books_in_demand(&self) -> Result<Vec<StockBook>, CatalogueError> {
        let map = self.map_read();
        Ok(map
            .values()
            .filter_map(|rec| {
                let guard = rec.read();
                (guard.num_sale_misses() > 0).then(|| guard.to_stock_book())
            })
            .collect())
    }
}

fn validate_isbn(isbn: Isbn) -> Result<(), CatalogueError> {
    if isbn < 1 {
        Err(CatalogueError::InvalidIsbn(isbn))
    } else {
        Ok(())
    }
}

/// Groups same-ISBN input entries together, in ascending-ISBN order,
/// exactly the order per-record locks must be acquired in.
fn group_by_isbn<T>(items: impl Iterator<Item = (Isbn, T)>) -> BTreeMap<Isbn, Vec<T>> {
    let mut grouped: BTreeMap<Isbn, Vec<T>> = BTreeMap::new();
    for (isbn, item) in items {
        grouped.entry(isbn).or_default().push(item);
    }
    grouped
}

/// Drops a set of per-record guards in the reverse of their acquisition
/// order, per the lock-ordering discipline.
fn release_in_reverse<T>(guards: Vec<T>) {
    for guard in guards.into_iter().rev() {
        drop(guard);
    }
}
