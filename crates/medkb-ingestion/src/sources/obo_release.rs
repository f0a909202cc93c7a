//! Disease Ontology release file (`doid.obo`).
//!
//! Release files: https://github.com/DiseaseOntology/HumanDiseaseOntology
//! Bulk alternative to per-code API lookups. The release is downloaded from
//! GitHub, or read from local disk when a path is configured. Terms go
//! through the same disease normaliser as API records.

use std::fmt;
use std::path::PathBuf;

use medkb_common::sandbox::SandboxClient as Client;
use medkb_common::{MedicalEntity, MedkbError, Result, SourceMetadata};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::models::RawRecord;
use crate::normalise::{self, disease, parse_obo};

pub const SOURCE_NAME: &str = "Disease Ontology (OBO release)";
pub const RELEASE_URL: &str = "https://github.com/DiseaseOntology/HumanDiseaseOntology";
/// Raw `doid.obo` on the main branch.
pub const DOID_OBO_URL: &str =
    "https://raw.githubusercontent.com/DiseaseOntology/HumanDiseaseOntology/main/src/ontology/doid.obo";
/// Terms taken from a release when the caller gives no limit.
pub const DEFAULT_LIMIT: usize = 50;

/// Where the release is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseLocation {
    File(PathBuf),
    Url(String),
}

impl Default for ReleaseLocation {
    fn default() -> Self {
        ReleaseLocation::Url(DOID_OBO_URL.to_string())
    }
}

impl fmt::Display for ReleaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseLocation::File(path) => write!(f, "{}", path.display()),
            ReleaseLocation::Url(url) => f.write_str(url),
        }
    }
}

pub struct OboReleaseSource {
    location: ReleaseLocation,
    client: Client,
}

impl OboReleaseSource {
    pub fn new(location: ReleaseLocation) -> Result<Self> {
        Ok(Self::with_client(location, Client::new()?))
    }

    /// Use a preconfigured client, e.g. one with extra allowed hosts.
    pub fn with_client(location: ReleaseLocation, client: Client) -> Self {
        Self { location, client }
    }

    /// Read the release and normalise the first `limit` live terms.
    /// Unlike per-code lookups this is all-or-nothing: an unreadable file
    /// or failed download is an error for the whole source.
    #[instrument(skip(self), fields(location = %self.location))]
    pub async fn fetch(&self, limit: usize) -> Result<Vec<MedicalEntity>> {
        let text = self.read_release().await?;
        let entities: Vec<MedicalEntity> = parse_obo(&text)
            .into_iter()
            .take(limit)
            .map(|t| normalise::normalise(&RawRecord::Ontology { code: t.code, record: t.record }))
            .collect();

        info!(terms = entities.len(), "✅ Disease Ontology release parsed");
        Ok(entities)
    }

    async fn read_release(&self) -> Result<String> {
        match &self.location {
            ReleaseLocation::File(path) => Ok(tokio::fs::read_to_string(path).await?),
            ReleaseLocation::Url(url) => {
                info!("📥 Downloading Disease Ontology release");
                let resp = self.client.get(url)?.send().await?;
                if !resp.status().is_success() {
                    return Err(MedkbError::Status {
                        status: resp.status().as_u16(),
                        url: url.clone(),
                    });
                }
                Ok(resp.text().await?)
            }
        }
    }

    pub fn metadata(entries: usize) -> SourceMetadata {
        SourceMetadata {
            name: SOURCE_NAME.to_string(),
            entries,
            url: RELEASE_URL.to_string(),
            licence: disease::LICENCE.to_string(),
        }
    }
}
