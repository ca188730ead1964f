//! Bounded sample history for plotted and FFT series.

use std::collections::VecDeque;

/// Fixed-capacity FIFO of raw samples. The oldest sample is evicted first.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRing {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest-first iterator over the retained samples
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    /// Copy the newest `out.len()` samples into `out`, oldest first.
    ///
    /// Returns `false` and leaves `out` untouched when fewer samples are held.
    pub fn copy_latest(&self, out: &mut [f64]) -> bool {
        let n = out.len();
        if self.samples.len() < n {
            return false;
        }

        let skip = self.samples.len() - n;
        for (dst, src) in out.iter_mut().zip(self.samples.iter().skip(skip)) {
            *dst = *src;
        }
        true
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_evicts_oldest() {
        let mut ring = SampleRing::new(3);
        for v in 1..=5 {
            ring.push(v as f64);
        }
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_copy_latest() {
        let mut ring = SampleRing::new(8);
        for v in 0..6 {
            ring.push(v as f64);
        }

        let mut out = [0.0; 4];
        assert!(ring.copy_latest(&mut out));
        assert_eq!(out, [2.0, 3.0, 4.0, 5.0]);

        let mut too_many = [-1.0; 7];
        assert!(!ring.copy_latest(&mut too_many));
        assert_eq!(too_many, [-1.0; 7]);
    }

    #[test]
    fn test_zero_capacity_ring_stays_empty() {
        let mut ring = SampleRing::new(0);
        ring.push(1.0);
        assert!(ring.is_empty());
    }
}
