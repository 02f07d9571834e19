//! Sliding loss window.
//!
//! # Responsibilities
//! - Retain the most recent loss samples for one backend, FIFO-evicted
//! - Compute the smoothed (integer mean) loss over retained samples
//!
//! # Design Decisions
//! - The window bounds retained history only; no sample is dropped before
//!   being recorded
//! - The average is recomputed from current contents, not incrementally
//!   maintained, so it is deterministic given the window state
//! - No internal locking: the caller holds the per-target lock across
//!   record + average + evaluate

use std::collections::VecDeque;

/// Bounded FIFO of recent loss samples for a single backend.
#[derive(Debug)]
pub struct LossWindow {
    samples: VecDeque<u8>,
    capacity: usize,
}

impl LossWindow {
    /// Create an empty window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest once the window is full.
    pub fn record(&mut self, sample: u8) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Mean of retained samples, truncated toward zero; 0 when empty.
    pub fn average(&self) -> u8 {
        if self.samples.is_empty() {
            return 0;
        }
        let sum: u32 = self.samples.iter().map(|&s| u32::from(s)).sum();
        (sum / self.samples.len() as u32) as u8
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
