//! Block loop: prompt, call, parse, score, summarize.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::blocks::render_prompt;
use crate::errors::{EvalError, EvalResult};
use crate::model::{Block, ExportedResult, ResultRecord, Summary};
use crate::parse::{extract_predictions, parse_block_response};
use crate::providers::llm::LlmClient;

/// `100 * correct / total` rounded half-to-even to two decimals; 0.0 for an
/// empty run.
pub fn accuracy_percent(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = 100.0 * correct as f64 / total as f64;
    (pct * 100.0).round_ties_even() / 100.0
}

/// Accuracy recomputed from exported results.
pub fn accuracy_from_results(results: &[ExportedResult]) -> f64 {
    let matches = results.iter().filter(|r| r.is_match()).count();
    accuracy_percent(matches, results.len())
}

/// Accuracy recomputed from a summary document.
///
/// `results` must be a list. Entries that are not objects count towards the
/// total but never as matches.
pub fn accuracy_from_json(summary: &Value) -> EvalResult<f64> {
    let results = match summary.get("results") {
        None => return Ok(0.0),
        Some(Value::Array(results)) => results,
        Some(_) => {
            return Err(EvalError::Config {
                message: "expected 'results' to be a list in the provided JSON payload".to_string(),
            })
        }
    };

    let matches = results
        .iter()
        .filter(|entry| {
            entry.is_object() && entry.get("gold_emotion") == entry.get("predicted_emotion")
        })
        .count();
    Ok(accuracy_percent(matches, results.len()))
}

/// Runs blocks through a model one at a time and scores the replies.
pub struct Evaluator {
    client: Arc<dyn LlmClient>,
    block_size: usize,
}

impl Evaluator {
    pub fn new(client: Arc<dyn LlmClient>, block_size: usize) -> Self {
        Self { client, block_size }
    }

    /// Evaluate every block in order. The first block-level failure aborts
    /// the run and no summary is produced.
    ///
    /// Every block must hold exactly `block_size` samples.
    pub async fn evaluate<I>(&self, blocks: I) -> EvalResult<Summary>
    where
        I: IntoIterator<Item = Block>,
    {
        let mut processed = 0;
        let mut total = 0;
        let mut correct = 0;
        let mut records: Vec<ResultRecord> = Vec::new();

        for block in blocks {
            let block_records = self.evaluate_block(&block).await?;

            let block_correct = block_records.iter().filter(|r| r.is_match).count();
            correct += block_correct;
            total += block_records.len();
            processed += 1;
            records.extend(block_records);

            info!(
                block = block.id,
                block_correct,
                correct,
                total,
                "block evaluated"
            );
        }

        let mut summary = Summary {
            model: self.client.model_name().to_string(),
            block_size: self.block_size,
            blocks_processed: processed,
            total_sentences: total,
            accuracy: accuracy_percent(correct, total),
            correct,
            results: records.iter().map(ResultRecord::export).collect(),
        };

        // The reported figure is always derived from the exported rows.
        let recomputed = accuracy_from_results(&summary.results);
        if recomputed != summary.accuracy {
            tracing::warn!(
                tallied = summary.accuracy,
                recomputed,
                "accuracy drift between tally and exported results"
            );
        }
        summary.accuracy = recomputed;

        Ok(summary)
    }

    async fn evaluate_block(&self, block: &Block) -> EvalResult<Vec<ResultRecord>> {
        if block.len() != self.block_size {
            return Err(EvalError::Config {
                message: format!(
                    "block {} has {} samples, expected {}",
                    block.id,
                    block.len(),
                    self.block_size
                ),
            });
        }

        let prompt = render_prompt(block);
        debug!(block = block.id, samples = block.len(), "dispatching block");

        let response = self
            .client
            .complete(&prompt)
            .await
            .map_err(|source| EvalError::ModelCallFailed {
                block: block.id,
                source,
            })?;

        let parsed =
            parse_block_response(&response.text).map_err(|source| EvalError::MalformedResponse {
                block: block.id,
                source,
            })?;
        let predictions = extract_predictions(&parsed);

        Ok(block
            .samples
            .iter()
            .map(|sample| {
                let predicted = i64::try_from(sample.local_id)
                    .ok()
                    .and_then(|id| predictions.get(&id))
                    .cloned()
                    .unwrap_or_default();
                let is_match = predicted == sample.gold_emotion;
                ResultRecord {
                    block: block.id,
                    dataset_index: sample.dataset_index,
                    sentence: sample.sentence.clone(),
                    gold_emotion: sample.gold_emotion.clone(),
                    predicted_emotion: predicted,
                    is_match,
                }
            })
            .collect())
    }
}
