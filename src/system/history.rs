/// Widest window accepted; about a week of one-second rounds.
pub const MAX_CAPACITY: usize = 1 << 20;

/// Fixed-width history of one metric, oldest value first.
///
/// The window is pre-filled with zeros so a chart has a full-width flat
/// baseline from the first frame. A capacity below 1 is quietly raised to 1
/// and one above [`MAX_CAPACITY`] is lowered to it.
///
/// Values live in a backing `Vec` of twice the capacity. Pushes append to the
/// tail; once the tail reaches the end, the newest `capacity` values are
/// moved back to the front in one pass. That keeps the visible window
/// contiguous (it is handed to the renderer as a plain slice) while a push
/// costs O(1) amortized.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    buf: Vec<f64>,
    capacity: usize,
}

impl SlidingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_CAPACITY);
        let mut buf = Vec::with_capacity(capacity.saturating_mul(2));
        buf.resize(capacity, 0.0);
        Self { buf, capacity }
    }

    /// Append `value`, evicting the oldest one, and return the new contents.
    pub fn push(&mut self, value: f64) -> &[f64] {
        if self.buf.len() == self.capacity * 2 {
            self.buf.drain(..self.capacity);
        }
        self.buf.push(value);
        self.as_slice()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.buf[self.buf.len() - self.capacity..]
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn latest(&self) -> f64 {
        self.as_slice()[self.capacity - 1]
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Always equal to [`capacity`](Self::capacity).
    pub fn len(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}
