//! Labelled dataset rows and the sources that load them.
//!
//! Label indices are validated against [`LABELS`] when a [`Dataset`] is
//! built, so everything downstream can map indices to names infallibly.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{EvalError, EvalResult};
use crate::labels::LABELS;

pub mod hub;
pub mod jsonl;

/// One labelled row as exposed by a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRow {
    pub text: String,
    pub label: i64,
}

/// Ordered, indexable rows with labels checked against the label table.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// Build a dataset, rejecting label indices the table cannot name.
    pub fn new(rows: Vec<DatasetRow>) -> EvalResult<Self> {
        if let Some((dataset_index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| !label_in_range(row.label))
        {
            return Err(EvalError::LabelOutOfRange {
                dataset_index,
                label: row.label,
                classes: LABELS.len(),
            });
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DatasetRow> {
        self.rows.get(index)
    }
}

fn label_in_range(label: i64) -> bool {
    usize::try_from(label).is_ok_and(|l| l < LABELS.len())
}

/// Check a dataset's declared class names against the label table.
///
/// Names must match positionally; a longer or reordered list would silently
/// corrupt gold labels.
pub fn check_label_names(found: &[String]) -> EvalResult<()> {
    if found.iter().map(String::as_str).eq(LABELS.iter().copied()) {
        return Ok(());
    }
    Err(EvalError::LabelTableMismatch {
        expected: LABELS.iter().map(|l| l.to_string()).collect(),
        found: found.to_vec(),
    })
}

/// Anything that can load a split of the emotion dataset.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Load at most `limit` rows of `split`, in dataset order.
    async fn load(&self, split: &str, limit: usize) -> EvalResult<Dataset>;

    fn source_name(&self) -> &'static str;
}
