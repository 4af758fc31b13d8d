// src/models/report.rs
use serde::Serialize;

/// One bucket of the User Score distribution.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramBin {
    /// Preformatted bin label for printing.
    pub label: &'static str,
    /// Frequency count of the bin.
    pub count: u64,
}

/// Distribution of all tracked users' scores. Derived and ephemeral;
/// never persisted.
///
/// Thirteen bins:
///
/// ```text
///           x = -1.0 (Unassigned)
///           x = 0.0
///     0.0 < x ≤ 0.1
///     0.1 < x ≤ 0.2
///     0.2 < x ≤ 0.3
///     0.3 < x ≤ 0.4
///     0.4 < x ≤ 0.5
///     0.5 < x ≤ 0.6
///     0.6 < x ≤ 0.7
///     0.7 < x ≤ 0.8
///     0.8 < x ≤ 0.9
///     0.9 < x < 1.0 (Exclude 1.0)
///           x = 1.0
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Histogram {
    /// Total number of tracked users processed.
    pub count: u64,
    /// Number of users with an assigned score.
    pub count_scored: u64,
    /// The thirteen bins, unassigned sentinel first.
    pub bins: Vec<HistogramBin>,
    /// False when the scan processed fewer users than the index holds.
    pub is_complete: bool,
    /// Mean over users with an assigned score.
    pub mean: f64,
    /// Median over users with an assigned score.
    pub median: f64,
}

pub const BIN_LABELS: [&str; 13] = [
    "      x =-1.0",
    "      x = 0.0",
    "0.0 < x \u{2264} 0.1",
    "0.1 < x \u{2264} 0.2",
    "0.2 < x \u{2264} 0.3",
    "0.3 < x \u{2264} 0.4",
    "0.4 < x \u{2264} 0.5",
    "0.5 < x \u{2264} 0.6",
    "0.6 < x \u{2264} 0.7",
    "0.7 < x \u{2264} 0.8",
    "0.8 < x \u{2264} 0.9",
    "0.9 < x < 1.0",
    "      x = 1.0",
];

impl Histogram {
    pub fn empty() -> Self {
        Self {
            count: 0,
            count_scored: 0,
            bins: BIN_LABELS.iter().map(|&label| HistogramBin { label, count: 0 }).collect(),
            is_complete: true,
            mean: 0.0,
            median: 0.0,
        }
    }
}
