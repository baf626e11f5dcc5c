//! Binary min-heap with stable handles and O(log n) removal.
//!
//! The optimizer needs to re-score edges that are already queued, which a
//! plain `BinaryHeap` cannot do. Each inserted entry gets a [`NodeHandle`]
//! that stays valid until the entry is popped or removed; internally a slab
//! of nodes tracks each entry's current position in the heap order.

/// Handle to a live heap entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NodeHandle(usize);

struct Node<T> {
    score: f64,
    value: T,
    /// Position of this node in `order`.
    pos: usize,
}

/// A min-heap keyed by `f64` score.
///
/// Scores must not be NaN; ordering uses `partial_cmp` and treats ties
/// arbitrarily.
pub struct MinHeap<T> {
    nodes: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    /// Heap-ordered slab indices.
    order: Vec<usize>,
}

impl<T> MinHeap<T> {
    /// Create an empty heap.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
        }
    }

    /// Create an empty heap with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            free: Vec::new(),
            order: Vec::with_capacity(capacity),
        }
    }

    /// Number of entries in the heap.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Insert a value with the given score, returning a handle that can be
    /// used to remove it while it is still queued.
    pub fn insert(&mut self, score: f64, value: T) -> NodeHandle {
        debug_assert!(!score.is_nan());
        let pos = self.order.len();
        let slot = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(Node { score, value, pos });
                slot
            }
            None => {
                self.nodes.push(Some(Node { score, value, pos }));
                self.nodes.len() - 1
            }
        };
        self.order.push(slot);
        self.sift_up(pos);
        NodeHandle(slot)
    }

    /// Pop the entry with the smallest score.
    pub fn pop_min(&mut self) -> Option<(f64, T)> {
        if self.order.is_empty() {
            return None;
        }
        let node = self.detach(0);
        Some((node.score, node.value))
    }

    /// Score of the smallest entry without removing it.
    pub fn peek_min(&self) -> Option<f64> {
        self.order
            .first()
            .map(|&slot| self.nodes[slot].as_ref().unwrap().score)
    }

    /// Remove the entry behind `handle` and return its value.
    ///
    /// # Panics
    /// Panics if the handle is stale (its entry was already popped or
    /// removed).
    pub fn remove(&mut self, handle: NodeHandle) -> T {
        let pos = self.nodes[handle.0]
            .as_ref()
            .expect("stale heap handle")
            .pos;
        self.detach(pos).value
    }

    /// Unlink the node at heap position `pos` and restore heap order.
    fn detach(&mut self, pos: usize) -> Node<T> {
        let last = self.order.len() - 1;
        self.swap_order(pos, last);
        let slot = self.order.pop().expect("detach from empty heap");
        let node = self.nodes[slot].take().expect("heap slab corrupted");
        self.free.push(slot);
        if pos < self.order.len() {
            let pos = self.sift_up(pos);
            self.sift_down(pos);
        }
        node
    }

    fn score_at(&self, pos: usize) -> f64 {
        self.nodes[self.order[pos]].as_ref().unwrap().score
    }

    fn swap_order(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.order.swap(a, b);
        let slot_a = self.order[a];
        let slot_b = self.order[b];
        self.nodes[slot_a].as_mut().unwrap().pos = a;
        self.nodes[slot_b].as_mut().unwrap().pos = b;
    }

    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = (pos - 1) / 2;
            if self.score_at(pos) >= self.score_at(parent) {
                break;
            }
            self.swap_order(pos, parent);
            pos = parent;
        }
        pos
    }

    fn sift_down(&mut self, mut pos: usize) {
        let len = self.order.len();
        loop {
            let left = 2 * pos + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let mut smallest = pos;
            if self.score_at(left) < self.score_at(smallest) {
                smallest = left;
            }
            if right < len && self.score_at(right) < self.score_at(smallest) {
                smallest = right;
            }
            if smallest == pos {
                break;
            }
            self.swap_order(pos, smallest);
            pos = smallest;
        }
    }
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_order() {
        let mut heap = MinHeap::new();
        for (score, value) in [(3.0, 'c'), (1.0, 'a'), (2.0, 'b'), (0.5, 'z')] {
            heap.insert(score, value);
        }
        assert_eq!(heap.len(), 4);
        assert_eq!(heap.pop_min(), Some((0.5, 'z')));
        assert_eq!(heap.pop_min(), Some((1.0, 'a')));
        assert_eq!(heap.pop_min(), Some((2.0, 'b')));
        assert_eq!(heap.pop_min(), Some((3.0, 'c')));
        assert_eq!(heap.pop_min(), None);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_remove_by_handle() {
        let mut heap = MinHeap::new();
        let _a = heap.insert(1.0, 'a');
        let b = heap.insert(2.0, 'b');
        let _c = heap.insert(3.0, 'c');

        assert_eq!(heap.remove(b), 'b');
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.pop_min(), Some((1.0, 'a')));
        assert_eq!(heap.pop_min(), Some((3.0, 'c')));
    }

    #[test]
    fn test_remove_min_by_handle() {
        let mut heap = MinHeap::new();
        let a = heap.insert(1.0, 'a');
        heap.insert(2.0, 'b');
        assert_eq!(heap.remove(a), 'a');
        assert_eq!(heap.peek_min(), Some(2.0));
    }

    #[test]
    fn test_slot_reuse() {
        let mut heap = MinHeap::new();
        let a = heap.insert(1.0, 0);
        heap.remove(a);
        let b = heap.insert(2.0, 1);
        // The freed slab slot is reused for the new entry.
        assert_eq!(a, b);
        assert_eq!(heap.pop_min(), Some((2.0, 1)));
    }

    #[test]
    fn test_negative_infinity_sorts_first() {
        let mut heap = MinHeap::new();
        heap.insert(-1.0, 'a');
        heap.insert(f64::NEG_INFINITY, 'b');
        heap.insert(-2.0, 'c');
        assert_eq!(heap.pop_min(), Some((f64::NEG_INFINITY, 'b')));
        assert_eq!(heap.pop_min(), Some((-2.0, 'c')));
    }

    #[test]
    fn test_interleaved_stress() {
        let mut heap = MinHeap::new();
        let mut handles = Vec::new();
        for i in 0..100 {
            // A scrambled but deterministic score sequence.
            let score = ((i * 37) % 100) as f64;
            handles.push(heap.insert(score, i));
        }
        // Remove every third entry by handle.
        let mut removed = 0;
        for (i, &h) in handles.iter().enumerate() {
            if i % 3 == 0 {
                heap.remove(h);
                removed += 1;
            }
        }
        assert_eq!(heap.len(), 100 - removed);

        let mut last = f64::NEG_INFINITY;
        while let Some((score, _)) = heap.pop_min() {
            assert!(score >= last);
            last = score;
        }
    }
}
