use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One (context, target) training row: N context ids followed
/// by the id the model must predict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowItem {
    pub context: Vec<u32>,
    pub target: u32,
}

pub struct WindowDataset {
    rows: Vec<WindowItem>,
}

impl WindowDataset {
    pub fn new(rows: Vec<WindowItem>) -> Self {
        Self { rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl Dataset<WindowItem> for WindowDataset {
    fn get(&self, index: usize) -> Option<WindowItem> {
        self.rows.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
