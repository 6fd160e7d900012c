use serde::Serialize;

/// One plotted line: a label and its window contents, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<f64>,
}

impl Series {
    pub fn latest(&self) -> f64 {
        self.values.last().copied().unwrap_or(0.0)
    }
}

/// Immutable copy of every window, published once per sampling round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSnapshot {
    /// Completed rounds so far.
    pub round: u64,
    /// One series per core, ascending core id.
    pub cores: Vec<Series>,
    pub memory: Series,
    /// Error of the latest round if it was skipped.
    pub last_error: Option<String>,
    pub consecutive_failures: u32,
}

impl ChartSnapshot {
    pub fn width(&self) -> usize {
        self.memory.values.len()
    }
}
