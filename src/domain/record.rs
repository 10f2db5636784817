// ============================================================
// Layer 3 — Record Domain Type
// ============================================================
// One parsed input line: a dense feature vector and, when the
// input format carries one, a label.

/// A single training record produced by a `RecordReader`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Dense features, always exactly as wide as the first layer's input
    pub features: Vec<f32>,

    /// The label written in the record, if the format has one
    pub label: Option<f64>,
}

impl Record {
    pub fn new(features: Vec<f32>, label: Option<f64>) -> Self {
        Self { features, label }
    }

    pub fn width(&self) -> usize {
        self.features.len()
    }
}
