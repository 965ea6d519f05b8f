//! Block-batched emotion classification harness.
//!
//! Sentences from an emotion-labelled dataset are grouped into fixed-size
//! blocks, each block is rendered into one prompt, and the model's JSON reply
//! is parsed, normalized and scored against the gold labels.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use blockeval_core::{
//!     BlockIter, DatasetSource, Evaluator, GeminiClient, HubDatasetSource, ModelConfig,
//!     DEFAULT_BLOCK_SIZE,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ModelConfig::from_env().with_api_key("key");
//! let client = Arc::new(GeminiClient::new(config, DEFAULT_BLOCK_SIZE)?);
//!
//! let dataset = HubDatasetSource::default().load("test", 8).await?;
//! let summary = Evaluator::new(client, DEFAULT_BLOCK_SIZE)
//!     .evaluate(BlockIter::new(&dataset, DEFAULT_BLOCK_SIZE, 2))
//!     .await?;
//! println!("accuracy: {}", summary.accuracy);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `GEMINI_API_KEY` | API credential (first choice) |
//! | `VITE_GEMINI_API_KEY` | API credential (fallback) |
//! | `BLOCKEVAL_GEMINI_URL` | Model API base URL (default: `https://generativelanguage.googleapis.com/v1beta`) |
//! | `BLOCKEVAL_TIMEOUT` | Model request timeout in seconds (default: 120) |
//! | `BLOCKEVAL_DATASETS_URL` | Datasets-server base URL (default: `https://datasets-server.huggingface.co`) |

pub mod blocks;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod evaluator;
pub mod labels;
pub mod model;
pub mod parse;
pub mod providers;

pub use blocks::{render_prompt, BlockIter, DEFAULT_BLOCK_SIZE};
pub use config::{resolve_api_key, resolve_api_key_with, GenerationConfig, ModelConfig};
pub use dataset::{
    hub::HubDatasetSource, jsonl::JsonlDatasetSource, Dataset, DatasetRow, DatasetSource,
};
pub use errors::{EvalError, EvalResult, MalformedResponse};
pub use evaluator::{accuracy_from_json, accuracy_from_results, accuracy_percent, Evaluator};
pub use labels::{label_for_index, normalize_label, LABELS};
pub use model::{Block, ExportedResult, LlmResponse, PredictionEntry, ResultRecord, Sample, Summary};
pub use parse::{extract_predictions, parse_block_response, sanitize_json_text};
pub use providers::llm::{gemini::GeminiClient, tracing::TracingLlmClient, LlmClient};
