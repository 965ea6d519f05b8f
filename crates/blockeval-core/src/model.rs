use serde::Serialize;

/// One dataset row placed inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub dataset_index: usize,
    pub sentence: String,
    pub gold_emotion: String,
    /// 1-based position inside the block.
    pub local_id: usize,
}

/// A full group of samples sent to the model in one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Sequential, 1-based.
    pub id: usize,
    pub samples: Vec<Sample>,
}

impl Block {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One entry of the model's `results` array after extraction.
///
/// Only `local_id` and `predicted_emotion` are used for scoring; the echoed
/// fields are kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionEntry {
    pub local_id: i64,
    pub dataset_index: Option<i64>,
    pub sentence: Option<String>,
    pub predicted_emotion: String,
}

/// Per-sample outcome recorded by the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRecord {
    pub block: usize,
    pub dataset_index: usize,
    pub sentence: String,
    pub gold_emotion: String,
    /// Normalized prediction, empty when the model gave none.
    pub predicted_emotion: String,
    pub is_match: bool,
}

impl ResultRecord {
    /// Drop block id, dataset index and match flag for export.
    pub fn export(&self) -> ExportedResult {
        ExportedResult {
            sentence: self.sentence.clone(),
            gold_emotion: self.gold_emotion.clone(),
            predicted_emotion: self.predicted_emotion.clone(),
        }
    }
}

/// Result fields exposed in the summary document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedResult {
    pub sentence: String,
    pub gold_emotion: String,
    pub predicted_emotion: String,
}

impl ExportedResult {
    pub fn is_match(&self) -> bool {
        self.gold_emotion == self.predicted_emotion
    }
}

/// Aggregate outcome of a run, printed as the final JSON document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub model: String,
    pub block_size: usize,
    pub blocks_processed: usize,
    pub total_sentences: usize,
    /// Percentage, rounded to two decimals.
    pub accuracy: f64,
    pub correct: usize,
    pub results: Vec<ExportedResult>,
}

/// Raw reply from a model provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub meta: serde_json::Value,
}
