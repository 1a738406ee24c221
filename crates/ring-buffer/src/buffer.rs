//! Ring Buffer Implementation

use std::collections::VecDeque;

/// Fixed-capacity FIFO that overwrites its oldest entry when full
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Entries, oldest at the front
    data: VecDeque<T>,
    /// Maximum number of entries retained
    capacity: usize,
    /// Total entries ever pushed (for statistics)
    total_written: usize,
}

impl<T> RingBuffer<T> {
    /// Create a new ring buffer holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Ring buffer capacity must be > 0");
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
            total_written: 0,
        }
    }

    /// Push an entry, returning the evicted oldest entry if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.data.len() >= self.capacity {
            self.data.pop_front()
        } else {
            None
        };
        self.data.push_back(item);
        self.total_written += 1;
        evicted
    }

    /// Drop entries from the front while `predicate` holds
    pub fn evict_while<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        while self.data.front().is_some_and(&mut predicate) {
            self.data.pop_front();
        }
    }

    /// Remove and return the oldest entry
    pub fn pop_front(&mut self) -> Option<T> {
        self.data.pop_front()
    }

    /// Most recent entry
    pub fn back(&self) -> Option<&T> {
        self.data.back()
    }

    /// Oldest entry
    pub fn front(&self) -> Option<&T> {
        self.data.front()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.data.iter()
    }

    /// Get the number of entries currently held
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get total entries pushed (for statistics)
    pub fn total_written(&self) -> usize {
        self.total_written
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

impl<T: PartialEq> RingBuffer<T> {
    /// Whether the buffer is full and every entry equals `value`
    pub fn all_equal_to(&self, value: &T) -> bool {
        self.is_full() && self.data.iter().all(|v| v == value)
    }
}
