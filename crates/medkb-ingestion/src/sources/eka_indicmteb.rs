//! Eka-IndicMTEB term corpus (Hugging Face dataset).
//!
//! Multilingual medical term benchmark for Indian languages.
//! Dataset: https://huggingface.co/datasets/ekacare/Eka-IndicMTEB
//!
//! Rows are read through the datasets-server REST API:
//!   GET /splits?dataset=<id>                       → available config/split pairs
//!   GET /rows?dataset=<id>&config=..&split=..&offset=..&length=..  (≤ 100 rows per page)
//!
//! The source is optional. The loader is compiled in by the `hf-datasets`
//! feature; without it, or when disabled in config, the source is skipped.

use std::time::Duration;

use medkb_common::sandbox::DEFAULT_TIMEOUT;
use medkb_common::{MedicalEntity, MedkbError, SourceMetadata};
use tracing::{info, warn};

use super::LoaderCapability;
use crate::models::RawRecord;
use crate::normalise::{self, term};

pub const DATASET_ID: &str = "ekacare/Eka-IndicMTEB";
pub const DATASETS_SERVER_URL: &str = "https://datasets-server.huggingface.co";
/// Rows consumed when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 100;

/// How the term corpus should be reached, as resolved from configuration.
#[derive(Debug, Clone)]
pub struct TermDatasetSettings {
    pub enabled: bool,
    pub dataset: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for TermDatasetSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            dataset: DATASET_ID.to_string(),
            base_url: DATASETS_SERVER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ── Capability detection ──────────────────────────────────────────────────────

impl LoaderCapability {
    /// Decide once whether the term corpus can be loaded.
    pub fn detect(settings: &TermDatasetSettings) -> LoaderCapability {
        if !settings.enabled {
            return LoaderCapability::Unavailable("disabled in configuration".to_string());
        }
        detect_loader(settings)
    }
}

#[cfg(feature = "hf-datasets")]
fn detect_loader(settings: &TermDatasetSettings) -> LoaderCapability {
    match hf::HfDatasetLoader::new(settings) {
        Ok(loader) => {
            if !loader.has_token() {
                info!("No Hugging Face token found; gated datasets will be refused");
            }
            LoaderCapability::Available(Box::new(loader))
        }
        Err(e) => LoaderCapability::Unavailable(format!("loader could not start: {e}")),
    }
}

#[cfg(not(feature = "hf-datasets"))]
fn detect_loader(_settings: &TermDatasetSettings) -> LoaderCapability {
    LoaderCapability::Unavailable("built without the `hf-datasets` feature".to_string())
}

#[cfg(feature = "hf-datasets")]
pub use hf::HfDatasetLoader;

#[cfg(feature = "hf-datasets")]
mod hf {
    use std::future::Future;

    use async_trait::async_trait;
    use medkb_common::sandbox::SandboxClient as Client;
    use medkb_common::{MedkbError, Result};
    use secrecy::{ExposeSecret, SecretString};
    use serde_json::Value;
    use tracing::{debug, instrument};

    use super::TermDatasetSettings;
    use crate::models::RawTermRecord;
    use crate::sources::CorpusLoader;

    /// datasets-server refuses pages longer than this.
    pub(super) const MAX_PAGE: usize = 100;

    pub struct HfDatasetLoader {
        client: Client,
        base_url: String,
        dataset: String,
        token: Option<SecretString>,
    }

    impl HfDatasetLoader {
        pub fn new(settings: &TermDatasetSettings) -> Result<Self> {
            Ok(Self {
                client: Client::with_timeout(settings.timeout)?,
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                dataset: settings.dataset.clone(),
                token: resolve_token(),
            })
        }

        pub fn has_token(&self) -> bool {
            self.token.is_some()
        }

        async fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value> {
            let mut req = self.client.get(url)?.query(params);
            if let Some(token) = &self.token {
                req = req.bearer_auth(token.expose_secret());
            }
            let resp = req.send().await?;
            if !resp.status().is_success() {
                return Err(MedkbError::Status {
                    status: resp.status().as_u16(),
                    url: url.to_string(),
                });
            }
            Ok(resp.json().await?)
        }

        #[instrument(skip(self))]
        async fn resolve_split(&self) -> Result<(String, String)> {
            let url = format!("{}/splits", self.base_url);
            let json = self
                .get_json(&url, &[("dataset", self.dataset.clone())])
                .await?;
            choose_split(&json)
        }
    }

    #[async_trait]
    impl CorpusLoader for HfDatasetLoader {
        fn dataset(&self) -> &str {
            &self.dataset
        }

        #[instrument(skip(self))]
        async fn load(&self, limit: usize) -> Result<Vec<RawTermRecord>> {
            if limit == 0 {
                return Ok(Vec::new());
            }

            let (config, split) = self.resolve_split().await?;
            let rows_url = format!("{}/rows", self.base_url);
            let url = rows_url.as_str();
            let dataset = self.dataset.as_str();
            let (config, split) = (config.as_str(), split.as_str());

            collect_pages(limit, move |offset, length| {
                let params = [
                    ("dataset", dataset.to_string()),
                    ("config", config.to_string()),
                    ("split", split.to_string()),
                    ("offset", offset.to_string()),
                    ("length", length.to_string()),
                ];
                async move { self.get_json(url, &params).await }
            })
            .await
        }
    }

    /// Pick the `train` split from a `/splits` response if there is one,
    /// else the first listed. Returns `(config, split)`.
    pub(super) fn choose_split(json: &Value) -> Result<(String, String)> {
        let splits = json["splits"].as_array().map(Vec::as_slice).unwrap_or_default();
        let chosen = splits
            .iter()
            .find(|s| s["split"].as_str() == Some("train"))
            .or_else(|| splits.first())
            .ok_or_else(|| MedkbError::MalformedRecord("no splits listed".to_string()))?;

        match (chosen["config"].as_str(), chosen["split"].as_str()) {
            (Some(config), Some(split)) => Ok((config.to_string(), split.to_string())),
            _ => Err(MedkbError::MalformedRecord(
                "split entry without config/split".to_string(),
            )),
        }
    }

    /// Rows of one `/rows` page. A missing `rows` array reads as empty.
    pub(super) fn page_rows(page: &Value) -> Vec<RawTermRecord> {
        page["rows"]
            .as_array()
            .map(|rows| rows.iter().map(|r| RawTermRecord::from_value(&r["row"])).collect())
            .unwrap_or_default()
    }

    /// Request pages of at most `MAX_PAGE` rows until `limit` rows are held
    /// or a page comes back short. `fetch_page` gets `(offset, length)`.
    pub(super) async fn collect_pages<F, Fut>(limit: usize, mut fetch_page: F) -> Result<Vec<RawTermRecord>>
    where
        F: FnMut(usize, usize) -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        let mut rows = Vec::new();

        while rows.len() < limit {
            let length = (limit - rows.len()).min(MAX_PAGE);
            let page = fetch_page(rows.len(), length).await?;
            let fetched = page_rows(&page);
            debug!(offset = rows.len(), count = fetched.len(), "Fetched dataset rows");

            let short_page = fetched.len() < length;
            rows.extend(fetched);
            if short_page {
                break;
            }
        }

        rows.truncate(limit);
        Ok(rows)
    }

    /// `HF_TOKEN` from the environment, else the token saved by
    /// `huggingface-cli login`.
    fn resolve_token() -> Option<SecretString> {
        std::env::var("HF_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| hf_hub::Cache::from_env().token())
            .map(SecretString::from)
    }
}

// ── Fetcher ───────────────────────────────────────────────────────────────────

/// Result of trying the term corpus.
#[derive(Debug)]
pub enum TermFetch {
    /// Capability absent; nothing was attempted.
    Skipped(String),
    /// Attempted, but the load failed. Contributes nothing.
    Failed(MedkbError),
    /// Loaded; may be empty (e.g. `limit = 0`).
    Loaded(Vec<MedicalEntity>),
}

impl TermFetch {
    pub fn into_entities(self) -> Vec<MedicalEntity> {
        match self {
            TermFetch::Loaded(entities) => entities,
            TermFetch::Skipped(_) | TermFetch::Failed(_) => Vec::new(),
        }
    }
}

pub struct TermDatasetFetcher<'a> {
    capability: &'a LoaderCapability,
}

impl<'a> TermDatasetFetcher<'a> {
    pub fn new(capability: &'a LoaderCapability) -> Self {
        Self { capability }
    }

    /// Load up to `limit` rows and normalise them. Never fails: absence and
    /// load errors both soft-skip the source.
    pub async fn fetch(&self, limit: usize) -> TermFetch {
        let loader = match self.capability {
            LoaderCapability::Available(loader) => loader,
            LoaderCapability::Unavailable(reason) => {
                warn!(reason = %reason, "⚠️ Eka-IndicMTEB loader unavailable, skipping term dataset");
                return TermFetch::Skipped(reason.clone());
            }
        };

        info!(dataset = loader.dataset(), limit, "Fetching Eka-IndicMTEB dataset");
        let rows = match loader.load(limit).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "Failed to fetch Eka-IndicMTEB; continuing without it");
                return TermFetch::Failed(e);
            }
        };

        let entities: Vec<MedicalEntity> = rows
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(index, record)| normalise::normalise(&RawRecord::Term { index, record }))
            .collect();

        info!(terms = entities.len(), "✅ Eka-IndicMTEB terms fetched");
        TermFetch::Loaded(entities)
    }

    pub fn metadata(entries: usize) -> SourceMetadata {
        SourceMetadata {
            name: term::SOURCE_NAME.to_string(),
            entries,
            url: term::DATASET_URL.to_string(),
            licence: term::LICENCE.to_string(),
        }
    }
}
