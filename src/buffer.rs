use std::collections::VecDeque;
use crate::types::{AngleChannel, AngleSample};

/// Default number of samples kept in the angle chart window.
pub const MAX_DATA_POINTS: usize = 50;

/// Fixed-capacity FIFO of angle samples feeding the line chart.
///
/// The buffer owns the timestamp counter: every appended sample is stamped
/// with the number of appends since the last [`reset`](Self::reset).
#[derive(Debug, Clone)]
pub struct RollingSeriesBuffer {
    samples: VecDeque<AngleSample>,
    capacity: usize,
    next_timestamp: u64,
}

impl RollingSeriesBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
            next_timestamp: 0,
        }
    }

    /// Timestamp the next appended sample will receive.
    pub fn next_timestamp(&self) -> u64 {
        self.next_timestamp
    }

    /// Appends at the tail and evicts the oldest sample once over capacity.
    /// Returns the timestamp stored with the sample.
    pub fn append(&mut self, sample: AngleSample) -> u64 {
        let timestamp = self.next_timestamp;
        self.samples.push_back(AngleSample { timestamp, ..sample });
        self.next_timestamp += 1;

        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        timestamp
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.next_timestamp = 0;
    }

    /// Owned copy of the window, oldest first.
    pub fn snapshot(&self) -> Vec<AngleSample> {
        self.samples.iter().copied().collect()
    }

    /// `[timestamp, value]` points of one channel, oldest first.
    pub fn series(&self, channel: AngleChannel) -> Vec<[f64; 2]> {
        self.samples
            .iter()
            .map(|sample| [sample.timestamp as f64, sample.value(channel)])
            .collect()
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
}

impl Default for RollingSeriesBuffer {
    fn default() -> Self {
        Self::new(MAX_DATA_POINTS)
    }
}
