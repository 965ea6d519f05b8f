//! Error types for the evaluation pipeline.
//!
//! Block-level failures abort the run. Per-entry problems in a model reply
//! (missing `local_id`, odd labels) never surface here; they count as misses.

/// Model output that could not be decoded as JSON.
#[derive(Debug, thiserror::Error)]
#[error("failed to parse model JSON: {raw}")]
pub struct MalformedResponse {
    /// Reply text exactly as the model returned it.
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

/// Evaluation errors.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// No API key from the command line or the environment.
    #[error(
        "missing Gemini API key: provide --api-key or set GEMINI_API_KEY/VITE_GEMINI_API_KEY"
    )]
    MissingCredential,

    /// The requested configuration yields zero blocks.
    #[error("no samples found for the requested configuration")]
    NoSamplesAvailable,

    /// The model provider failed for a block.
    #[error("model request failed for block {block}")]
    ModelCallFailed {
        block: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The model reply for a block was not valid JSON.
    #[error("block {block}: malformed model response")]
    MalformedResponse {
        block: usize,
        #[source]
        source: MalformedResponse,
    },

    /// A dataset row carries a label index outside the label table.
    #[error("dataset row {dataset_index} has label index {label}, but only {classes} classes are known")]
    LabelOutOfRange {
        dataset_index: usize,
        label: i64,
        classes: usize,
    },

    /// The dataset declares label names that differ from the label table.
    #[error("dataset label names {found:?} do not match the label table {expected:?}")]
    LabelTableMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    /// The dataset could not be read or fetched.
    #[error("dataset error: {message}")]
    Dataset { message: String },

    /// Invalid configuration.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl EvalError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoSamplesAvailable => 1,

            Self::MissingCredential => 2,
            Self::Config { .. } => 2,
            Self::LabelOutOfRange { .. } => 2,
            Self::LabelTableMismatch { .. } => 2,

            Self::ModelCallFailed { .. } => 3,
            Self::MalformedResponse { .. } => 3,

            Self::Dataset { .. } => 4,
        }
    }

    /// Block the error belongs to, if any.
    pub fn block(&self) -> Option<usize> {
        match self {
            Self::ModelCallFailed { block, .. } | Self::MalformedResponse { block, .. } => {
                Some(*block)
            }
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EvalError {
    fn from(err: reqwest::Error) -> Self {
        Self::Dataset {
            message: err.to_string(),
        }
    }
}

/// Result type for evaluation operations.
pub type EvalResult<T> = Result<T, EvalError>;
