use std::cmp::Ordering;
use std::fmt;

const INITIAL_CAPACITY: usize = 10;

/// Array-backed binary min-heap ordered by a caller-supplied comparator.
///
/// Entries that compare `Equal` come out in no particular order. The queue
/// owns its entries: dropping it releases whatever is still queued, and
/// [`into_vec`](PriorityQueue::into_vec) hands them back instead.
pub struct PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    slots: Vec<T>,
    compare: F,
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left(i: usize) -> usize {
    2 * i + 1
}

fn right(i: usize) -> usize {
    2 * i + 2
}

impl<T, F> PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: F) -> Self {
        Self::with_capacity(INITIAL_CAPACITY, compare)
    }

    pub fn with_capacity(capacity: usize, compare: F) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.max(1)),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// The current minimum, if any.
    pub fn peek(&self) -> Option<&T> {
        self.slots.first()
    }

    /// Adds `entry` and sifts it up. O(log n).
    pub fn insert(&mut self, entry: T) {
        if self.slots.len() == self.slots.capacity() {
            // double, never by less
            let extra = self.slots.capacity();
            self.slots.reserve_exact(extra);
        }
        self.slots.push(entry);

        let mut index = self.slots.len() - 1;
        while index > 0 {
            let up = parent(index);
            if !self.less(index, up) {
                break;
            }
            self.slots.swap(index, up);
            index = up;
        }
        debug_assert!(self.is_heap());
    }

    /// Removes and returns the minimum entry. O(log n).
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty. Extracting from an empty queue is a
    /// caller bug, not a runtime condition.
    pub fn extract_min(&mut self) -> T {
        assert!(
            !self.slots.is_empty(),
            "extract_min called on an empty priority queue"
        );

        // The last entry moves into the root; everything below sifts within
        // the shortened heap.
        let min = self.slots.swap_remove(0);
        self.sift_down(0);
        debug_assert!(self.is_heap());
        min
    }

    fn less(&self, a: usize, b: usize) -> bool {
        (self.compare)(&self.slots[a], &self.slots[b]) == Ordering::Less
    }

    fn sift_down(&mut self, mut index: usize) {
        let size = self.slots.len();
        while left(index) < size {
            let mut smallest = left(index);
            let r = right(index);
            if r < size && self.less(r, smallest) {
                smallest = r;
            }
            if !self.less(smallest, index) {
                break;
            }
            self.slots.swap(smallest, index);
            index = smallest;
        }
    }

    /// Checks that every parent compares `<=` each of its children.
    pub fn is_heap(&self) -> bool {
        (1..self.slots.len()).all(|i| {
            (self.compare)(&self.slots[parent(i)], &self.slots[i]) != Ordering::Greater
        })
    }

    /// Consumes the queue, returning the remaining entries in heap order.
    pub fn into_vec(self) -> Vec<T> {
        self.slots
    }
}

impl<T: fmt::Debug, F> fmt::Debug for PriorityQueue<T, F>
where
    F: Fn(&T, &T) -> Ordering,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("slots", &self.slots)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn ascending(a: &u32, b: &u32) -> Ordering {
        a.cmp(b)
    }

    #[test]
    fn single_entry_roundtrip() {
        let mut pq = PriorityQueue::new(ascending);
        pq.insert(7);
        assert_eq!(pq.len(), 1);
        assert_eq!(pq.extract_min(), 7);
        assert!(pq.is_empty());
    }

    #[test]
    #[should_panic(expected = "empty priority queue")]
    fn extract_from_drained_queue_panics() {
        let mut pq = PriorityQueue::new(ascending);
        pq.insert(1);
        pq.extract_min();
        pq.extract_min();
    }

    #[test]
    fn extraction_is_non_decreasing() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..20 {
            let n = 1 + round * 13;
            let mut pq = PriorityQueue::new(ascending);
            for _ in 0..n {
                pq.insert(rng.gen_range(0..50));
            }
            let mut prev = 0;
            for _ in 0..n {
                let v = pq.extract_min();
                assert!(v >= prev, "{} came after {}", v, prev);
                prev = v;
            }
            assert!(pq.is_empty());
        }
    }

    #[test]
    fn heap_order_survives_interleaving() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pq = PriorityQueue::new(ascending);
        let mut shadow: Vec<u32> = Vec::new();
        for _ in 0..2000 {
            if shadow.is_empty() || rng.gen_bool(0.6) {
                let v = rng.gen_range(0..1000);
                pq.insert(v);
                shadow.push(v);
            } else {
                let v = pq.extract_min();
                let expected = *shadow.iter().min().unwrap();
                assert_eq!(v, expected);
                let pos = shadow.iter().position(|&x| x == v).unwrap();
                shadow.swap_remove(pos);
            }
            assert!(pq.is_heap());
            assert_eq!(pq.len(), shadow.len());
        }
    }

    #[test]
    fn capacity_doubles_and_never_shrinks() {
        let mut pq = PriorityQueue::new(ascending);
        assert_eq!(pq.capacity(), 10);
        for i in 0..10 {
            pq.insert(i);
        }
        assert_eq!(pq.capacity(), 10);
        pq.insert(10);
        assert!(pq.capacity() >= 20);
        let grown = pq.capacity();
        while !pq.is_empty() {
            pq.extract_min();
        }
        assert_eq!(pq.capacity(), grown);
    }

    #[test]
    fn equal_children_prefer_left() {
        // Order by key only; the tag shows which slot was promoted.
        let mut pq = PriorityQueue::new(|a: &(u32, char), b: &(u32, char)| a.0.cmp(&b.0));
        pq.insert((0, 'r'));
        pq.insert((5, 'L'));
        pq.insert((5, 'R'));
        pq.insert((9, 'x'));
        assert_eq!(pq.extract_min(), (0, 'r'));
        // 9 moved to the root and compared against two equal children
        assert_eq!(pq.peek(), Some(&(5, 'L')));
        assert!(pq.is_heap());
    }

    #[test]
    fn comparator_can_reverse_order() {
        let mut pq = PriorityQueue::new(|a: &i64, b: &i64| b.cmp(a));
        for v in [3, -1, 8, 0] {
            pq.insert(v);
        }
        assert_eq!(pq.extract_min(), 8);
        assert_eq!(pq.extract_min(), 3);
    }

    #[test]
    fn into_vec_returns_remaining_entries() {
        let mut pq = PriorityQueue::new(ascending);
        for v in [4, 2, 9] {
            pq.insert(v);
        }
        pq.extract_min();
        let mut rest = pq.into_vec();
        rest.sort();
        assert_eq!(rest, vec![4, 9]);
    }
}
