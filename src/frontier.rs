// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Indexed binary min-heap used as the shortest-path frontier
//!
//! Keys are `(distance, seq)` pairs: `seq` is assigned on first insertion so
//! ties pop in discovery order, and a decrease-key keeps it. A position map
//! makes `contains` and `decrease_key` O(1) lookups instead of linear scans.

use crate::types::Distance;

#[derive(Debug, Clone, Copy)]
struct Entry {
    item: usize,
    distance: Distance,
    seq: u64,
}

impl Entry {
    fn key(&self) -> (Distance, u64) {
        (self.distance, self.seq)
    }
}

/// Min-priority queue over dense item ids `0..capacity`
#[derive(Debug)]
pub struct Frontier {
    heap: Vec<Entry>,
    positions: Vec<Option<usize>>,
    next_seq: u64,
}

impl Frontier {
    /// Create a frontier for item ids below `capacity`
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            positions: vec![None; capacity],
            next_seq: 0,
        }
    }

    /// Check if nothing is queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of queued items
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check whether an item is queued
    #[must_use]
    pub fn contains(&self, item: usize) -> bool {
        self.positions.get(item).copied().flatten().is_some()
    }

    /// Current key of a queued item
    #[must_use]
    pub fn distance(&self, item: usize) -> Option<Distance> {
        self.positions
            .get(item)
            .copied()
            .flatten()
            .map(|pos| self.heap[pos].distance)
    }

    /// Queue an item, or lower its key if it is already queued.
    ///
    /// A larger key for a queued item is ignored. Items outside the capacity
    /// grow the position map.
    pub fn push_or_decrease(&mut self, item: usize, distance: Distance) {
        if self.contains(item) {
            self.decrease_key(item, distance);
        } else {
            self.push(item, distance);
        }
    }

    /// Queue a new item
    pub fn push(&mut self, item: usize, distance: Distance) {
        if item >= self.positions.len() {
            self.positions.resize(item + 1, None);
        }
        debug_assert!(self.positions[item].is_none(), "item already queued");
        let seq = self.next_seq;
        self.next_seq += 1;
        let pos = self.heap.len();
        self.heap.push(Entry { item, distance, seq });
        self.positions[item] = Some(pos);
        self.sift_up(pos);
    }

    /// Lower the key of a queued item; no-op if absent or not lower
    pub fn decrease_key(&mut self, item: usize, distance: Distance) {
        let Some(pos) = self.positions.get(item).copied().flatten() else {
            return;
        };
        if distance >= self.heap[pos].distance {
            return;
        }
        self.heap[pos].distance = distance;
        self.sift_up(pos);
    }

    /// Remove and return the item with the smallest key
    pub fn pop_min(&mut self) -> Option<(usize, Distance)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let entry = self.heap.pop()?;
        self.positions[entry.item] = None;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((entry.item, entry.distance))
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.heap[pos].key() < self.heap[parent].key() {
                self.swap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * pos + 1;
            let right = left + 1;
            let mut smallest = pos;
            if left < len && self.heap[left].key() < self.heap[smallest].key() {
                smallest = left;
            }
            if right < len && self.heap[right].key() < self.heap[smallest].key() {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap(pos, smallest);
            pos = smallest;
        }
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.positions[self.heap[i].item] = Some(i);
        self.positions[self.heap[j].item] = Some(j);
    }
}
