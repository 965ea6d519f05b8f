//! Hugging Face datasets-server source.
//!
//! Pages through `GET {base}/rows` so that only the rows a run needs are
//! downloaded.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{check_label_names, Dataset, DatasetRow, DatasetSource};
use crate::errors::{EvalError, EvalResult};

pub const DEFAULT_DATASET: &str = "dair-ai/emotion";
pub const DEFAULT_CONFIG: &str = "split";

/// Largest page the rows endpoint serves.
pub const MAX_PAGE_LENGTH: usize = 100;

fn default_base_url() -> String {
    "https://datasets-server.huggingface.co".to_string()
}

#[derive(Debug, Deserialize)]
struct RowsPage {
    #[serde(default)]
    features: Vec<Feature>,
    rows: Vec<RowEntry>,
    #[serde(default)]
    num_rows_total: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    name: String,
    #[serde(rename = "type")]
    kind: FeatureType,
}

#[derive(Debug, Deserialize)]
struct FeatureType {
    #[serde(default)]
    names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RowEntry {
    row: DatasetRow,
}

impl RowsPage {
    fn label_names(&self) -> Option<&[String]> {
        self.features
            .iter()
            .find(|f| f.name == "label")
            .and_then(|f| f.kind.names.as_deref())
    }
}

/// Dataset rows served by the Hugging Face datasets-server API.
#[derive(Debug, Clone)]
pub struct HubDatasetSource {
    client: reqwest::Client,
    base_url: String,
    dataset: String,
    config: String,
}

impl Default for HubDatasetSource {
    fn default() -> Self {
        Self::new(DEFAULT_DATASET, DEFAULT_CONFIG)
    }
}

impl HubDatasetSource {
    pub fn new(dataset: impl Into<String>, config: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: default_base_url(),
            dataset: dataset.into(),
            config: config.into(),
        }
    }

    /// Like [`HubDatasetSource::new`], honouring `BLOCKEVAL_DATASETS_URL`.
    pub fn from_env(dataset: impl Into<String>, config: impl Into<String>) -> Self {
        let source = Self::new(dataset, config);
        match std::env::var("BLOCKEVAL_DATASETS_URL") {
            Ok(url) => source.with_base_url(url),
            Err(_) => source,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn fetch_page(&self, split: &str, offset: usize, length: usize) -> EvalResult<RowsPage> {
        let url = format!("{}/rows", self.base_url);
        debug!(url = %url, dataset = %self.dataset, split, offset, length, "fetching dataset rows");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("dataset", self.dataset.as_str()),
                ("config", self.config.as_str()),
                ("split", split),
            ])
            .query(&[("offset", offset), ("length", length)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EvalError::Dataset {
                message: format!(
                    "datasets-server returned HTTP {} for {}/{}: {}",
                    status.as_u16(),
                    self.dataset,
                    split,
                    body
                ),
            });
        }

        response.json().await.map_err(|e| EvalError::Dataset {
            message: format!("failed to parse rows response: {}", e),
        })
    }
}

#[async_trait]
impl DatasetSource for HubDatasetSource {
    async fn load(&self, split: &str, limit: usize) -> EvalResult<Dataset> {
        let mut rows: Vec<DatasetRow> = Vec::new();
        let mut offset = 0;
        let mut labels_checked = false;

        while rows.len() < limit {
            let length = (limit - rows.len()).min(MAX_PAGE_LENGTH);
            let page = self.fetch_page(split, offset, length).await?;

            if !labels_checked {
                if let Some(names) = page.label_names() {
                    check_label_names(names)?;
                }
                labels_checked = true;
            }

            if page.rows.is_empty() {
                break;
            }
            offset += page.rows.len();
            rows.extend(page.rows.into_iter().map(|entry| entry.row));

            if page.num_rows_total.is_some_and(|total| offset >= total) {
                break;
            }
        }
        rows.truncate(limit);

        info!(dataset = %self.dataset, split, rows = rows.len(), "dataset rows loaded");
        Dataset::new(rows)
    }

    fn source_name(&self) -> &'static str {
        "huggingface"
    }
}
