//! Configuration loading for medkb.
//! Reads medkb.toml from the current directory or the path in the MEDKB_CONFIG
//! env var. Every setting has a default, so the file itself is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use medkb_common::sandbox::DEFAULT_TIMEOUT;
use medkb_ingestion::pipeline::{IngestionJob, OboReleaseJob};
use medkb_ingestion::report::{DEFAULT_REPORT_PATH, DEFAULT_SAMPLE_SIZE};
use medkb_ingestion::sources::obo_release::ReleaseLocation;
use medkb_ingestion::sources::{disease_ontology, eka_indicmteb, obo_release};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub disease_ontology: DiseaseOntologyConfig,
    #[serde(default)]
    pub term_dataset: TermDatasetConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiseaseOntologyConfig {
    #[serde(default = "default_do_base_url")]
    pub base_url: String,
    #[serde(default = "disease_ontology::default_codes")]
    pub codes: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// doid.obo release to download and ingest in bulk,
    /// e.g. `obo_release::DOID_OBO_URL`.
    pub obo_url: Option<String>,
    /// Local doid.obo release. Takes precedence over `obo_url`.
    pub obo_path: Option<PathBuf>,
    #[serde(default = "default_obo_limit")]
    pub obo_limit: usize,
}

fn default_do_base_url()  -> String { disease_ontology::DO_METADATA_URL.to_string() }
fn default_timeout_secs() -> u64    { DEFAULT_TIMEOUT.as_secs() }
fn default_obo_limit()    -> usize  { obo_release::DEFAULT_LIMIT }

impl Default for DiseaseOntologyConfig {
    fn default() -> Self {
        Self {
            base_url: default_do_base_url(),
            codes: disease_ontology::default_codes(),
            timeout_secs: default_timeout_secs(),
            obo_url: None,
            obo_path: None,
            obo_limit: default_obo_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermDatasetConfig {
    #[serde(default = "bool_true")]
    pub enabled: bool,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_term_limit")]
    pub limit: usize,
    #[serde(default = "default_datasets_server")]
    pub base_url: String,
}

fn bool_true()               -> bool   { true }
fn default_dataset()         -> String { eka_indicmteb::DATASET_ID.to_string() }
fn default_term_limit()      -> usize  { 50 }
fn default_datasets_server() -> String { eka_indicmteb::DATASETS_SERVER_URL.to_string() }

impl Default for TermDatasetConfig {
    fn default() -> Self {
        Self {
            enabled: bool_true(),
            dataset: default_dataset(),
            limit: default_term_limit(),
            base_url: default_datasets_server(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

fn default_output_path() -> PathBuf { PathBuf::from(DEFAULT_REPORT_PATH) }
fn default_sample_size() -> usize   { DEFAULT_SAMPLE_SIZE }

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            sample_size: default_sample_size(),
        }
    }
}


impl Config {
    /// Load configuration from medkb.toml.
    /// Checks MEDKB_CONFIG env var first, then current directory.
    /// A missing file means defaults; an unreadable or invalid one is an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("MEDKB_CONFIG")
            .unwrap_or_else(|_| "medkb.toml".to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn term_dataset_settings(&self) -> eka_indicmteb::TermDatasetSettings {
        eka_indicmteb::TermDatasetSettings {
            enabled: self.term_dataset.enabled,
            dataset: self.term_dataset.dataset.clone(),
            base_url: self.term_dataset.base_url.clone(),
            timeout: Duration::from_secs(self.disease_ontology.timeout_secs),
        }
    }

    /// The configured OBO release, if any. A local path wins over a URL.
    pub fn obo_release_location(&self) -> Option<ReleaseLocation> {
        let d = &self.disease_ontology;
        match (&d.obo_path, &d.obo_url) {
            (Some(path), _) => Some(ReleaseLocation::File(path.clone())),
            (None, Some(url)) => Some(ReleaseLocation::Url(url.clone())),
            (None, None) => None,
        }
    }

    pub fn ingestion_job(&self) -> IngestionJob {
        IngestionJob {
            ontology_codes: self.disease_ontology.codes.clone(),
            obo_release: self.obo_release_location().map(|location| OboReleaseJob {
                location,
                limit: self.disease_ontology.obo_limit,
            }),
            term_limit: self.term_dataset.limit,
            sample_size: self.report.sample_size,
            output_path: self.report.output_path.clone(),
        }
    }
}
