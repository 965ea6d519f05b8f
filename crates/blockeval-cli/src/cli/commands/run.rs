use std::sync::Arc;

use anyhow::Context;
use blockeval_core::{
    resolve_api_key, BlockIter, DatasetSource, EvalError, Evaluator, GeminiClient,
    HubDatasetSource, JsonlDatasetSource, LlmClient, ModelConfig, TracingLlmClient,
};
use tracing::info;

use crate::cli::args::RunArgs;
use crate::exit_codes::SUCCESS;

fn dataset_source(args: &RunArgs) -> Box<dyn DatasetSource> {
    match &args.dataset_dir {
        Some(dir) => Box::new(JsonlDatasetSource::new(dir)),
        None => Box::new(HubDatasetSource::from_env(
            args.dataset.as_str(),
            args.dataset_config.as_str(),
        )),
    }
}

pub(crate) async fn run(args: RunArgs) -> anyhow::Result<i32> {
    // Credential problems must surface before any network traffic.
    let api_key = resolve_api_key(args.api_key.as_deref())?;

    let config = ModelConfig::from_env()
        .with_model(args.model.as_str())
        .with_api_key(api_key);
    let gemini = GeminiClient::new(config, args.block_size)?;
    let client: Arc<dyn LlmClient> = Arc::new(TracingLlmClient::new(Arc::new(gemini)));

    let source = dataset_source(&args);
    let limit = args.blocks.saturating_mul(args.block_size);
    info!(
        source = source.source_name(),
        split = %args.split,
        blocks = args.blocks,
        block_size = args.block_size,
        "loading dataset"
    );
    let dataset = source.load(&args.split, limit).await?;

    let mut blocks = BlockIter::new(&dataset, args.block_size, args.blocks).peekable();
    if blocks.peek().is_none() {
        return Err(EvalError::NoSamplesAvailable.into());
    }

    let summary = Evaluator::new(client, args.block_size)
        .evaluate(blocks)
        .await?;

    let rendered = serde_json::to_string_pretty(&summary)?;
    if let Some(path) = &args.output {
        std::fs::write(path, &rendered)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }
    println!("{rendered}");

    info!(
        accuracy = summary.accuracy,
        correct = summary.correct,
        total = summary.total_sentences,
        "run complete"
    );
    Ok(SUCCESS)
}
