//! Stable binary min-heap.
//!
//! `std::collections::BinaryHeap` makes no ordering promise between equal
//! keys, but the outward search depends on FIFO behavior for ties so that
//! identical inputs always explore candidates in the same order. This heap is
//! array-backed with explicit up/down sifting and stamps every entry with an
//! insertion sequence number used as the tie-break.

/// A min-heap over `f64` keys with FIFO ordering for equal keys.
#[derive(Debug, Clone)]
pub struct StableMinHeap<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    key: f64,
    seq: u64,
    value: T,
}

impl<T> Entry<T> {
    fn precedes(&self, other: &Entry<T>) -> bool {
        self.key < other.key || (self.key == other.key && self.seq < other.seq)
    }
}

impl<T> StableMinHeap<T> {
    /// Creates an empty heap.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pushes a value with the given priority key.
    pub fn push(&mut self, key: f64, value: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { key, seq, value });
        self.sift_up(self.entries.len() - 1);
    }

    /// Removes and returns the minimum-key value, FIFO among equal keys.
    pub fn pop(&mut self) -> Option<T> {
        if self.entries.is_empty() {
            return None;
        }
        let last = self.entries.len() - 1;
        self.entries.swap(0, last);
        let entry = self.entries.pop()?;
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Some(entry.value)
    }

    /// Key of the minimum entry without removing it.
    pub fn peek_key(&self) -> Option<f64> {
        self.entries.first().map(|e| e.key)
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if self.entries[idx].precedes(&self.entries[parent]) {
                self.entries.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.entries.len();
        loop {
            let left = idx * 2 + 1;
            let right = left + 1;
            let mut smallest = idx;
            if left < len && self.entries[left].precedes(&self.entries[smallest]) {
                smallest = left;
            }
            if right < len && self.entries[right].precedes(&self.entries[smallest]) {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.entries.swap(idx, smallest);
            idx = smallest;
        }
    }
}

impl<T> Default for StableMinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
