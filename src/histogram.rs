//! Nearest-rank percentile histogram
//!
//! Values are sorted, one threshold is picked per bound at rank
//! `floor((n - 1) * p / 100)`, and each value is counted in the first bound
//! whose threshold is at least the value, except that values equal to the
//! maximum always land in the top band. Bounds that receive nothing are
//! left out of the result.

use serde::{Deserialize, Serialize};

/// Fixed percentile bounds, ascending.
pub const PERCENTILES: [u32; 4] = [25, 50, 75, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub bin: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub entries: Vec<Entry>,
}

impl Histogram {
    /// Sum of all bucket counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn count(&self, bin: u32) -> Option<usize> {
        self.entries.iter().find(|e| e.bin == bin).map(|e| e.count)
    }
}

/// Bucket `data` into the fixed percentile bands.
///
/// Empty input yields an empty histogram.
pub fn percentile(data: &[f64]) -> Histogram {
    if data.is_empty() {
        return Histogram::default();
    }

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);

    let last = sorted.len() - 1;
    let thresholds: Vec<f64> = PERCENTILES
        .iter()
        .map(|&p| sorted[last * p as usize / 100])
        .collect();

    let top = PERCENTILES.len() - 1;
    let max = thresholds[top];
    let mut counts = [0usize; PERCENTILES.len()];
    for value in &sorted {
        // The last threshold is the max, so only NaN can miss every band
        let idx = if *value == max {
            top
        } else {
            thresholds.iter().position(|t| value <= t).unwrap_or(top)
        };
        counts[idx] += 1;
    }

    let entries = PERCENTILES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(&bin, count)| Entry { bin, count })
        .collect();

    Histogram { entries }
}
