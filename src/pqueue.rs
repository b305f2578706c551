//! A min-heap priority queue.
//!
//! Entries are ordered by `(weight, order)`. Callers supply a distinct
//! `order` per entry so that equal weights pop in a reproducible sequence.

/// An entry in the priority queue.
#[derive(Debug, Clone)]
struct HeapEntry<T> {
    weight: u64,
    order: u32,
    data: T,
}

impl<T> HeapEntry<T> {
    fn key(&self) -> (u64, u32) {
        (self.weight, self.order)
    }
}

/// A min-heap priority queue that pops the lowest `(weight, order)` first.
///
/// Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2.
#[derive(Debug, Clone)]
pub struct MinHeap<T> {
    nodes: Vec<HeapEntry<T>>,
}

impl<T> MinHeap<T> {
    /// Create a new, empty min-heap.
    pub fn new() -> Self {
        MinHeap { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Push an element with the given weight and tie-break order.
    pub fn push(&mut self, weight: u64, order: u32, data: T) {
        self.nodes.push(HeapEntry {
            weight,
            order,
            data,
        });
        self.sift_up(self.nodes.len() - 1);
    }

    /// Pop the minimum element, returning its weight and payload.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<(u64, T)> {
        if self.nodes.is_empty() {
            return None;
        }
        let last = self.nodes.len() - 1;
        self.nodes.swap(0, last);
        let result = self.nodes.pop()?;
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some((result.weight, result.data))
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].key() < self.nodes[parent].key() {
                self.nodes.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.nodes[left].key() < self.nodes[smallest].key() {
                smallest = left;
            }
            if right < len && self.nodes[right].key() < self.nodes[smallest].key() {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.nodes.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
