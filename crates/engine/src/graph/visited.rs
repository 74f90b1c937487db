//! Generation-stamped visited set
//!
//! `clear()` bumps a generation counter instead of zeroing the array, so a
//! traversal pays O(1) to reset. The array is only wiped on wrap-around.
//! Workers keep one set each in a thread-local pool.

use std::cell::RefCell;

use acorn_core::VectorId;

pub(crate) struct VisitedSet {
    stamps: Vec<u16>,
    generation: u16,
}

impl VisitedSet {
    pub(crate) fn new(capacity: usize) -> Self {
        VisitedSet {
            stamps: vec![0; capacity],
            generation: 1,
        }
    }

    /// Start a fresh traversal over `capacity` nodes
    pub(crate) fn reset(&mut self, capacity: usize) {
        if capacity > self.stamps.len() {
            self.stamps.resize(capacity, 0);
        }
        if self.generation == u16::MAX {
            self.stamps.fill(0);
            self.generation = 1;
        } else {
            self.generation += 1;
        }
    }

    /// Mark `id`; returns true if it was not yet visited in this generation
    #[inline]
    pub(crate) fn insert(&mut self, id: VectorId) -> bool {
        match self.stamps.get_mut(id.as_usize()) {
            Some(stamp) if *stamp != self.generation => {
                *stamp = self.generation;
                true
            }
            // Out-of-range ids are treated as already visited
            _ => false,
        }
    }
}

thread_local! {
    static POOL: RefCell<VisitedSet> = RefCell::new(VisitedSet::new(0));
}

/// Run `f` with this thread's visited set, reset for `capacity` nodes
pub(crate) fn with_visited<R>(capacity: usize, f: impl FnOnce(&mut VisitedSet) -> R) -> R {
    POOL.with(|cell| match cell.try_borrow_mut() {
        Ok(mut visited) => {
            visited.reset(capacity);
            f(&mut visited)
        }
        // Re-entrant use on the same thread gets a private set
        Err(_) => {
            let mut visited = VisitedSet::new(capacity);
            f(&mut visited)
        }
    })
}
