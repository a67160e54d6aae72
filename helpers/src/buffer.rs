/// RingBuffer provides a buffer with a user-defined capacity. As soon as the capacity is reached,
/// the buffer overwrites the oldest values when new values are pushed to it.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    vals: Vec<T>,
    capacity: usize,
    idx: usize, // index of the oldest value once the buffer is full
}

impl<T> RingBuffer<T> {
    pub fn new(capacity: usize) -> RingBuffer<T> {
        RingBuffer {
            vals: Vec::with_capacity(capacity),
            capacity: capacity.max(1),
            idx: 0,
        }
    }
    pub fn push(&mut self, val: T) {
        if self.vals.len() < self.capacity {
            self.vals.push(val);
        } else {
            self.vals[self.idx] = val;
            self.idx = (self.idx + 1) % self.capacity;
        }
    }
    pub fn len(&self) -> usize {
        self.vals.len()
    }
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }
    pub fn clear(&mut self) {
        self.vals.clear();
        self.idx = 0;
    }
    /// iter returns the values from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let (newer, older) = self.vals.split_at(self.idx);
        older.iter().chain(newer.iter())
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        let (newer, older) = self.vals.split_at_mut(self.idx);
        older.iter_mut().chain(newer.iter_mut())
    }
    /// retain keeps only the values for which f returns true (insertion order is preserved).
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, mut f: F) {
        self.vals.rotate_left(self.idx);
        self.idx = 0;
        self.vals.retain(|val| f(val));
    }
}

impl<T: Into<f64> + Copy> RingBuffer<T> {
    pub fn get_avg(&self) -> Option<f64> {
        if self.vals.is_empty() {
            return None;
        }
        Some(self.get_sum() / self.vals.len() as f64)
    }
    fn get_sum(&self) -> f64 {
        self.vals.iter().map(|&val| Into::<f64>::into(val)).sum()
    }
}
