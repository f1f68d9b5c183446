//! ADWIN: adaptive windowing change detector.
//!
//! Keeps a variable-length window over a stream of reals, stored as an
//! exponential histogram: row `i` holds buckets summarizing `2^i` items each,
//! with at most `MAX_BUCKETS` buckets per row. Whenever two sub-windows
//! (split at a bucket boundary) have means that differ by more than the
//! variance-aware bound for confidence `delta`, the oldest bucket is dropped.

use std::collections::VecDeque;

/// Buckets per row before the two oldest are merged into the next row.
const MAX_BUCKETS: usize = 5;

/// Minimum length of each sub-window considered for a cut.
const MIN_SUB_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy)]
struct Bucket {
    total: f64,
    /// Sum of squared deviations from the bucket mean
    variance: f64,
}

/// Adaptive windowing detector.
#[derive(Debug, Clone)]
pub struct Adwin {
    delta: f64,

    /// `rows[i]` holds buckets of `2^i` items, oldest at the front
    rows: Vec<VecDeque<Bucket>>,

    width: usize,
    total: f64,
    variance: f64,
    detections: usize,
}

impl Adwin {
    /// Creates a detector with confidence parameter `delta` (e.g. 0.01).
    pub fn new(delta: f64) -> Self {
        Self {
            delta,
            rows: Vec::new(),
            width: 0,
            total: 0.0,
            variance: 0.0,
            detections: 0,
        }
    }

    /// Adds an observation. Returns `true` if the window shrank.
    pub fn add(&mut self, x: f64) -> bool {
        self.insert(x);
        self.compress();
        let changed = self.shrink();
        if changed {
            self.detections += 1;
        }
        changed
    }

    /// Sum of the items currently in the window.
    pub fn sum(&self) -> f64 {
        self.total
    }

    /// Number of items currently in the window.
    pub fn size(&self) -> usize {
        self.width
    }

    /// Mean of the window (0 when empty).
    pub fn mean(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        self.total / self.width as f64
    }

    /// Population variance of the window (0 when empty).
    pub fn variance(&self) -> f64 {
        if self.width == 0 {
            return 0.0;
        }
        self.variance / self.width as f64
    }

    /// Number of `add` calls that shrank the window.
    pub fn detections(&self) -> usize {
        self.detections
    }

    fn insert(&mut self, x: f64) {
        if self.rows.is_empty() {
            self.rows.push(VecDeque::new());
        }
        self.rows[0].push_back(Bucket {
            total: x,
            variance: 0.0,
        });

        if self.width > 0 {
            let n = self.width as f64;
            let delta = x - self.total / n;
            self.variance += n / (n + 1.0) * delta * delta;
        }
        self.width += 1;
        self.total += x;
    }

    fn compress(&mut self) {
        let mut i = 0;
        while i < self.rows.len() {
            if self.rows[i].len() <= MAX_BUCKETS {
                break;
            }
            let (Some(a), Some(b)) = (self.rows[i].pop_front(), self.rows[i].pop_front()) else {
                break;
            };
            let n = (1u64 << i) as f64;
            let diff = a.total / n - b.total / n;
            let merged = Bucket {
                total: a.total + b.total,
                variance: a.variance + b.variance + n / 2.0 * diff * diff,
            };
            if i + 1 == self.rows.len() {
                self.rows.push(VecDeque::new());
            }
            // Merged items are newer than everything already in the next row
            self.rows[i + 1].push_back(merged);
            i += 1;
        }
    }

    fn shrink(&mut self) -> bool {
        let mut shrunk = false;
        while self.width > 2 * MIN_SUB_WINDOW && self.find_cut() {
            self.drop_oldest();
            shrunk = true;
        }
        shrunk
    }

    /// Scans split points from oldest to newest.
    fn find_cut(&self) -> bool {
        let mut n0 = 0usize;
        let mut t0 = 0.0;
        for (i, row) in self.rows.iter().enumerate().rev() {
            let size = 1usize << i;
            for bucket in row {
                n0 += size;
                t0 += bucket.total;
                let n1 = self.width - n0;
                if n1 < MIN_SUB_WINDOW {
                    return false;
                }
                if n0 >= MIN_SUB_WINDOW && self.should_cut(n0, n1, t0, self.total - t0) {
                    return true;
                }
            }
        }
        false
    }

    fn should_cut(&self, n0: usize, n1: usize, t0: f64, t1: f64) -> bool {
        let (n0, n1) = (n0 as f64, n1 as f64);
        let diff = (t0 / n0 - t1 / n1).abs();
        let v = self.variance();
        let dd = (2.0 * (self.width as f64).ln() / self.delta).ln();
        let m = 1.0 / n0 + 1.0 / n1;
        let epsilon = (2.0 * m * v * dd).sqrt() + 2.0 / 3.0 * dd * m;
        diff > epsilon
    }

    fn drop_oldest(&mut self) {
        let Some(i) = self.rows.iter().rposition(|row| !row.is_empty()) else {
            return;
        };
        let Some(bucket) = self.rows[i].pop_front() else {
            return;
        };
        let n = (1usize << i) as f64;
        let old_width = self.width as f64;

        self.width -= 1usize << i;
        self.total -= bucket.total;

        if self.width == 0 {
            self.variance = 0.0;
        } else {
            let rest = self.width as f64;
            let diff = bucket.total / n - self.total / rest;
            self.variance -= bucket.variance + n * rest / old_width * diff * diff;
            self.variance = self.variance.max(0.0);
        }

        while self.rows.last().is_some_and(VecDeque::is_empty) {
            self.rows.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn test_empty_window() {
        let adwin = Adwin::new(0.01);
        assert_eq!(adwin.size(), 0);
        assert_eq!(adwin.sum(), 0.0);
        assert_eq!(adwin.mean(), 0.0);
    }

    #[test]
    fn test_stationary_stream_keeps_everything() {
        let mut adwin = Adwin::new(0.01);
        for i in 0..1000 {
            // Small deterministic wiggle around 0.5
            let x = 0.5 + if i % 2 == 0 { 0.01 } else { -0.01 };
            assert!(!adwin.add(x));
        }

        assert_eq!(adwin.size(), 1000);
        assert!(close(adwin.sum(), 500.0));
        assert!(close(adwin.mean(), 0.5));
        assert!(close(adwin.variance(), 0.0001));
        assert_eq!(adwin.detections(), 0);
    }

    #[test]
    fn test_histogram_stays_logarithmic() {
        let mut adwin = Adwin::new(0.01);
        for _ in 0..10_000 {
            adwin.add(1.0);
        }

        assert_eq!(adwin.size(), 10_000);
        assert!(adwin.rows.iter().all(|row| row.len() <= MAX_BUCKETS));
        let counted: usize = adwin
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| row.len() << i)
            .sum();
        assert_eq!(counted, adwin.size());
    }

    #[test]
    fn test_abrupt_change_is_detected() {
        let mut adwin = Adwin::new(0.01);
        for _ in 0..1000 {
            adwin.add(0.8);
        }

        let mut detected_at = None;
        for t in 0..1000 {
            if adwin.add(0.4) && detected_at.is_none() {
                detected_at = Some(t);
            }
        }

        assert!(detected_at.is_some());
        assert!(adwin.detections() >= 1);
        // The stale 0.8 regime has been forgotten
        assert!(adwin.size() < 1500);
        assert!((adwin.mean() - 0.4).abs() < 0.05);
    }
}
