//! Terminology source clients.

pub mod disease_ontology;
pub mod eka_indicmteb;
pub mod obo_release;

use async_trait::async_trait;
use medkb_common::Result;

use crate::models::{RawOntologyRecord, RawTermRecord};

/// Per-code lookup against an ontology service.
#[async_trait]
pub trait OntologyLookup: Send + Sync {
    /// Fetch the raw record for one ontology code.
    /// Any failure (transport, status, body shape) is an `Err` for that code only.
    async fn lookup(&self, code: &str) -> Result<RawOntologyRecord>;
}

/// Bulk loader for a term corpus.
#[async_trait]
pub trait CorpusLoader: Send + Sync {
    /// Dataset identifier, e.g. `ekacare/Eka-IndicMTEB`.
    fn dataset(&self) -> &str;

    /// Load at most `limit` rows in corpus order.
    async fn load(&self, limit: usize) -> Result<Vec<RawTermRecord>>;
}

/// Whether the optional term corpus can be loaded in this build and config.
/// Detected once up front; fetchers branch on it instead of probing.
pub enum LoaderCapability {
    Available(Box<dyn CorpusLoader>),
    Unavailable(String),
}

impl LoaderCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, LoaderCapability::Available(_))
    }
}

impl std::fmt::Debug for LoaderCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoaderCapability::Available(loader) => {
                f.debug_tuple("Available").field(&loader.dataset()).finish()
            }
            LoaderCapability::Unavailable(reason) => {
                f.debug_tuple("Unavailable").field(reason).finish()
            }
        }
    }
}
