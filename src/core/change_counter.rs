//! Versioned wrapper for mutable packet sub-objects.
//!
//! [`ChangeCounter`] counts replacements of the held value and, when polled
//! with [`ChangeCounter::check_changed`], internal mutations that the value
//! reports through its own [`ChangeCount`]. Counters live in `Cell`s so
//! polling works from `&self`; the wrapper is therefore not `Sync`.

use std::cell::Cell;

/// A value that counts its own mutations.
///
/// The count must increase on every mutation and never decrease.
pub trait ChangeCount {
    fn change_count(&self) -> u64;
}

/// Owns a `T` and tracks whether it changed since last observed
#[derive(Debug, Clone)]
pub struct ChangeCounter<T> {
    value: T,
    change_count: Cell<u64>,
    /// `value.change_count()` as of the last replacement or poll
    target_change_count: Cell<u64>,
}

impl<T: ChangeCount> ChangeCounter<T> {
    pub fn new(value: T) -> Self {
        let target = value.change_count();
        Self {
            value,
            change_count: Cell::new(0),
            target_change_count: Cell::new(target),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Mutable access; the mutation is counted on the next poll
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.value
    }

    /// Replace the value wholesale. Always counts as a change, even when the
    /// new value equals the old one.
    pub fn set(&mut self, value: T) {
        self.target_change_count.set(value.change_count());
        self.value = value;
        self.bump();
    }

    /// Poll the held value. Returns `true` and increments this counter if the
    /// value's own count moved since the last poll.
    pub fn check_changed(&self) -> bool {
        let current = self.value.change_count();
        if current == self.target_change_count.get() {
            return false;
        }
        self.target_change_count.set(current);
        self.bump();
        true
    }

    /// Number of replacements and polled mutations so far
    pub fn change_count(&self) -> u64 {
        self.change_count.get()
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    fn bump(&self) {
        self.change_count.set(self.change_count.get() + 1);
    }
}

impl<T: ChangeCount + Default> Default for ChangeCounter<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: PartialEq> PartialEq for ChangeCounter<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
