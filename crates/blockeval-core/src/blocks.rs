//! Grouping dataset rows into fixed-size blocks and rendering block prompts.

use std::fmt::Write as _;

use crate::dataset::Dataset;
use crate::labels::{label_for_index, LABELS};
use crate::model::{Block, Sample};

pub const DEFAULT_BLOCK_SIZE: usize = 4;

/// Lazily yields full blocks from a dataset, in order.
///
/// Block ids start at 1. A trailing partial block is dropped, never padded.
#[derive(Debug)]
pub struct BlockIter<'a> {
    dataset: &'a Dataset,
    block_size: usize,
    block_limit: usize,
    next_index: usize,
    emitted: usize,
}

impl<'a> BlockIter<'a> {
    pub fn new(dataset: &'a Dataset, block_size: usize, block_limit: usize) -> Self {
        Self {
            dataset,
            block_size,
            block_limit,
            next_index: 0,
            emitted: 0,
        }
    }
}

impl Iterator for BlockIter<'_> {
    type Item = Block;

    fn next(&mut self) -> Option<Block> {
        if self.block_size == 0 || self.emitted >= self.block_limit {
            return None;
        }

        let mut samples = Vec::with_capacity(self.block_size);
        while samples.len() < self.block_size {
            let dataset_index = self.next_index;
            let row = self.dataset.get(dataset_index)?;
            self.next_index += 1;

            // Dataset::new guarantees the label is in range.
            let gold = usize::try_from(row.label)
                .ok()
                .and_then(label_for_index)
                .unwrap_or_default();

            samples.push(Sample {
                dataset_index,
                sentence: row.text.clone(),
                gold_emotion: gold.to_string(),
                local_id: samples.len() + 1,
            });
        }

        self.emitted += 1;
        Some(Block {
            id: self.emitted,
            samples,
        })
    }
}

/// Render the classification prompt for one block.
pub fn render_prompt(block: &Block) -> String {
    let mut prompt = String::from(
        "You are an emotion classifier. Classify each sentence independently and respond with JSON only.\n",
    );
    let _ = writeln!(prompt, "Allowed labels: {}.", LABELS.join(", "));
    prompt.push_str("Required JSON schema:\n");
    prompt.push_str("{\n");
    prompt.push_str("  \"block\": <block_id>,\n");
    prompt.push_str("  \"results\": [\n");
    let _ = writeln!(
        prompt,
        "    {{\"local_id\": <1-{}>, \"dataset_index\": <int>, \"sentence\": \"<original text>\", \"predicted_emotion\": \"<label>\"}}",
        block.len()
    );
    prompt.push_str("  ]\n");
    prompt.push_str("}\n");
    prompt.push_str("Do not omit any sentences and keep the sentence text verbatim.\n");
    let _ = write!(prompt, "Block #{} sentences:", block.id);

    for sample in &block.samples {
        let _ = write!(
            prompt,
            "\n{}. dataset_index={} :: {}",
            sample.local_id, sample.dataset_index, sample.sentence
        );
    }
    prompt
}
