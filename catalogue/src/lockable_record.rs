//! Wraps a [`Record`] with the reader/writer lock that controls access to
//! that record only.
//!
//! The protocol never re-enters this lock within a single call path (no
//! path takes both a read and a write guard on the same record at once),
//! so `std::sync::RwLock` - not re-entrant, platform-fair-ish - is the
//! right tool rather than a hand-rolled lock. Acquisition returns a guard
//! whose `Drop` releases the lock on every exit path, including panics and
//! early returns from `?`; this is the "scoped mechanism" the protocol
//! requires, expressed the idiomatic Rust way rather than as paired
//! `lock_*`/`unlock_*` calls a caller could forget to balance.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::record::Record;

/// A read guard on a record. Reading any field through this guard is safe:
/// a writer cannot be interleaved for as long as the guard lives.
pub type RecordReadGuard<'a> = RwLockReadGuard<'a, Record>;

/// A write guard on a record. Exclusive: no other reader or writer can
/// observe the record until this guard drops.
pub type RecordWriteGuard<'a> = RwLockWriteGuard<'a, Record>;

/// One catalogue entry plus its per-record lock.
pub struct LockableRecord {
    inner: RwLock<Record>,
}

impl LockableRecord {
    pub fn new(record: Record) -> Self {
        Self {
            inner: RwLock::new(record),
        }
    }

    /// Acquires the per-record read lock. Blocks if a writer holds it.
    ///
    /// A poisoned lock (a prior holder panicked mid-mutation) is recovered
    /// rather than propagated: no `Catalogue` operation panics while
    /// holding this lock, so poisoning here would only ever come from an
    /// already-reported bug elsewhere, and refusing every future reader
    /// because of it would turn one bad state into a permanent outage.
    pub fn read(&self) -> RecordReadGuard<'_> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires the per-record write lock. Blocks until no reader or
    /// writer holds it.
    pub fn write(&self) -> RecordWriteGuard<'_> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
