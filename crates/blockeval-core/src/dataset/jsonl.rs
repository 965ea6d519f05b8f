//! Local dataset snapshots stored as `<dir>/<split>.jsonl`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{Dataset, DatasetRow, DatasetSource};
use crate::errors::{EvalError, EvalResult};

/// Reads one `{"text": ..., "label": ...}` object per line.
#[derive(Debug, Clone)]
pub struct JsonlDatasetSource {
    dir: PathBuf,
}

impl JsonlDatasetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn split_path(&self, split: &str) -> PathBuf {
        self.dir.join(format!("{split}.jsonl"))
    }
}

fn parse_rows(path: &Path, content: &str, limit: usize) -> EvalResult<Vec<DatasetRow>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .take(limit)
        .map(|(lineno, line)| {
            serde_json::from_str::<DatasetRow>(line).map_err(|e| EvalError::Dataset {
                message: format!("{}:{}: invalid row: {}", path.display(), lineno + 1, e),
            })
        })
        .collect()
}

#[async_trait]
impl DatasetSource for JsonlDatasetSource {
    async fn load(&self, split: &str, limit: usize) -> EvalResult<Dataset> {
        if limit == 0 {
            return Ok(Dataset::default());
        }

        let path = self.split_path(split);
        debug!(path = %path.display(), limit, "reading dataset snapshot");

        let content =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| EvalError::Dataset {
                    message: format!("failed to read {}: {}", path.display(), e),
                })?;

        Dataset::new(parse_rows(&path, &content, limit)?)
    }

    fn source_name(&self) -> &'static str {
        "jsonl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_split(dir: &Path, split: &str, body: &str) {
        std::fs::write(dir.join(format!("{split}.jsonl")), body).unwrap();
    }

    #[tokio::test]
    async fn loads_rows_up_to_limit() {
        let tmp = tempdir().unwrap();
        write_split(
            tmp.path(),
            "test",
            "{\"text\": \"i feel great\", \"label\": 1}\n\n{\"text\": \"so alone\", \"label\": 0}\n{\"text\": \"boo\", \"label\": 4}\n",
        );

        let source = JsonlDatasetSource::new(tmp.path());
        let ds = source.load("test", 2).await.unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(0).unwrap().label, 1);
        assert_eq!(ds.get(1).unwrap().text, "so alone");

        let all = source.load("test", usize::MAX).await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn zero_limit_touches_nothing() {
        let source = JsonlDatasetSource::new("/nonexistent/blockeval");
        let ds = source.load("test", 0).await.unwrap();
        assert!(ds.is_empty());
    }

    #[tokio::test]
    async fn missing_split_is_a_dataset_error() {
        let tmp = tempdir().unwrap();
        let source = JsonlDatasetSource::new(tmp.path());
        let err = source.load("validation", 4).await.unwrap_err();
        assert!(matches!(err, EvalError::Dataset { .. }));
        assert!(err.to_string().contains("validation.jsonl"));
    }

    #[tokio::test]
    async fn bad_line_reports_location() {
        let tmp = tempdir().unwrap();
        write_split(tmp.path(), "train", "{\"text\": \"ok\", \"label\": 2}\n{\"text\": 3}\n");

        let err = JsonlDatasetSource::new(tmp.path())
            .load("train", 10)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("train.jsonl:2"), "{err}");
    }

    #[tokio::test]
    async fn out_of_range_label_fails_at_load() {
        let tmp = tempdir().unwrap();
        write_split(tmp.path(), "test", "{\"text\": \"meh\", \"label\": 9}\n");

        let err = JsonlDatasetSource::new(tmp.path())
            .load("test", 10)
            .await
            .unwrap_err();
        assert!(matches!(err, EvalError::LabelOutOfRange { label: 9, .. }));
    }
}
