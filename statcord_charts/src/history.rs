use std::collections::VecDeque;

/// Fixed capacity buffer of the most recent latency samples, in milliseconds.
#[derive(Debug, Clone)]
pub struct LatencyHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl LatencyHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a sample, evicting the oldest one once full. Non-finite samples are dropped.
    pub fn push(&mut self, millis: f64) {
        if !millis.is_finite() || self.capacity == 0 {
            return;
        }

        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }

        self.samples.push_back(millis);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }

        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    /// Samples from oldest to newest.
    pub fn snapshot(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}

impl Default for LatencyHistory {
    fn default() -> Self {
        Self::new(statcord_config::LATENCY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn evicts_oldest_when_full() {
        let mut history = LatencyHistory::new(3);
        for sample in [1.0, 2.0, 3.0, 4.0] {
            history.push(sample);
        }

        assert!(history.is_full());
        assert_eq!(history.snapshot(), vec![2.0, 3.0, 4.0]);
        assert_eq!(history.latest(), Some(4.0));
        assert_eq!(history.average(), Some(3.0));
    }

    #[test]
    fn ignores_non_finite_samples() {
        let mut history = LatencyHistory::default();
        history.push(f64::NAN);
        history.push(f64::INFINITY);

        assert!(history.is_empty());
        assert_eq!(history.average(), None);
    }

    #[test]
    fn default_holds_a_full_window() {
        let mut history = LatencyHistory::default();
        for i in 0..statcord_config::LATENCY_WINDOW + 5 {
            history.push(i as f64);
        }

        assert_eq!(history.len(), statcord_config::LATENCY_WINDOW);
        assert_eq!(history.snapshot()[0], 5.0);
    }
}
