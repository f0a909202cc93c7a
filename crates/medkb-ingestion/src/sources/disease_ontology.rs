//! Disease Ontology metadata API client.
//!
//! Endpoint: https://www.disease-ontology.org/api/metadata/<DOID>
//!
//! Returns JSON with (at least) `name`, and optionally `synonyms` (array)
//! and `def` (string). Each code is looked up on its own; a failed code
//! is reported and skipped, never fatal to the batch.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use medkb_common::sandbox::{SandboxClient as Client, DEFAULT_TIMEOUT};
use medkb_common::{MedicalEntity, MedkbError, Result, SourceMetadata};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::OntologyLookup;
use crate::models::{ItemOutcome, RawOntologyRecord, RawRecord};
use crate::normalise::{self, disease};

pub const DO_METADATA_URL: &str = "https://www.disease-ontology.org/api/metadata";
pub const DO_HOME_URL: &str = "https://www.disease-ontology.org/";

/// Codes looked up when the caller supplies none.
pub const DEFAULT_CODES: [&str; 6] = [
    "DOID:0081086", // COVID-19
    "DOID:8469",    // influenza
    "DOID:552",     // pneumonia
    "DOID:9351",    // diabetes mellitus
    "DOID:1816",    // measles
    "DOID:4195",    // tuberculosis
];

pub fn default_codes() -> Vec<String> {
    DEFAULT_CODES.iter().map(|c| c.to_string()).collect()
}

// ── HTTP client ───────────────────────────────────────────────────────────────

pub struct DiseaseOntologyClient {
    client: Client,
    base_url: String,
}

impl DiseaseOntologyClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DO_METADATA_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::with_timeout(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl OntologyLookup for DiseaseOntologyClient {
    #[instrument(skip(self))]
    async fn lookup(&self, code: &str) -> Result<RawOntologyRecord> {
        let url = format!("{}/{}", self.base_url, code);
        debug!(url = %url, "Fetching Disease Ontology metadata");

        let resp = self.client.get(&url)?.send().await?;
        if !resp.status().is_success() {
            return Err(MedkbError::Status {
                status: resp.status().as_u16(),
                url,
            });
        }

        let body: Value = resp.json().await?;
        parse_metadata(&body)
    }
}

/// Accept a metadata body only if it is an object carrying a string `name`.
/// Everything else in it is optional.
pub fn parse_metadata(body: &Value) -> Result<RawOntologyRecord> {
    if !body.is_object() {
        return Err(MedkbError::MalformedRecord(
            "metadata body is not a JSON object".to_string(),
        ));
    }
    let record = RawOntologyRecord::from_value(body);
    if record.name.is_none() {
        return Err(MedkbError::MalformedRecord(
            "metadata body has no string `name`".to_string(),
        ));
    }
    Ok(record)
}

// ── Fetcher ───────────────────────────────────────────────────────────────────

/// Entities from one fetch, plus what happened to each requested code.
#[derive(Debug, Default)]
pub struct FetchBatch {
    pub entities: Vec<MedicalEntity>,
    pub outcomes: Vec<ItemOutcome>,
}

impl FetchBatch {
    pub fn failures(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// Looks up a list of codes and normalises each success.
pub struct DiseaseOntologyFetcher<'a> {
    lookup: &'a dyn OntologyLookup,
}

impl<'a> DiseaseOntologyFetcher<'a> {
    pub fn new(lookup: &'a dyn OntologyLookup) -> Self {
        Self { lookup }
    }

    /// Fetch the six default codes.
    pub async fn fetch_defaults(&self) -> FetchBatch {
        self.fetch(&default_codes()).await
    }

    /// One lookup per code, in order. Failed codes are logged, recorded in
    /// `outcomes`, and left out of `entities`. Codes that map to an entity id
    /// already attempted in this batch are skipped.
    pub async fn fetch(&self, codes: &[String]) -> FetchBatch {
        info!(codes = codes.len(), "Fetching Disease Ontology");
        let mut batch = FetchBatch::default();
        let mut seen = HashSet::new();

        for code in codes {
            if !seen.insert(disease::entity_id(code)) {
                debug!(code = %code, "Skipping repeated code");
                continue;
            }

            match self.lookup.lookup(code).await {
                Ok(record) => {
                    let entity = normalise::normalise(&RawRecord::Ontology {
                        code: code.clone(),
                        record,
                    });
                    info!(code = %code, name = %entity.name, "✓ fetched");
                    batch.outcomes.push(ItemOutcome::Fetched {
                        code: code.clone(),
                        name: entity.name.clone(),
                    });
                    batch.entities.push(entity);
                }
                Err(e) => {
                    warn!(code = %code, error = %e, "✗ failed to fetch");
                    batch.outcomes.push(ItemOutcome::Failed {
                        code: code.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            fetched = batch.entities.len(),
            failed = batch.failures().count(),
            "Disease Ontology fetch complete"
        );
        batch
    }

    pub fn metadata(entries: usize) -> SourceMetadata {
        SourceMetadata {
            name: disease::SOURCE_NAME.to_string(),
            entries,
            url: DO_HOME_URL.to_string(),
            licence: disease::LICENCE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory ontology keyed by code; unknown codes fail like a 404.
    struct StubOntology {
        records: HashMap<String, Value>,
        calls: Mutex<Vec<String>>,
    }

    impl StubOntology {
        fn new(records: &[(&str, Value)]) -> Self {
            Self {
                records: records
                    .iter()
                    .map(|(code, body)| (code.to_string(), body.clone()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl OntologyLookup for StubOntology {
        async fn lookup(&self, code: &str) -> Result<RawOntologyRecord> {
            self.calls.lock().unwrap().push(code.to_string());
            match self.records.get(code) {
                Some(body) => parse_metadata(body),
                None => Err(MedkbError::Status {
                    status: 404,
                    url: format!("{DO_METADATA_URL}/{code}"),
                }),
            }
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| c.to_string()).collect()
    }

    #[tokio::test]
    async fn test_invalid_code_skipped() {
        let stub = StubOntology::new(&[(
            "DOID:0081086",
            json!({"name": "COVID-19", "synonyms": ["2019 novel coronavirus"], "def": "A disease."}),
        )]);
        let fetcher = DiseaseOntologyFetcher::new(&stub);

        let batch = fetcher.fetch(&codes(&["DOID:0081086", "DOID:XXXX-INVALID"])).await;

        assert_eq!(batch.entities.len(), 1);
        let e = &batch.entities[0];
        assert_eq!(e.id, "disease_0081086");
        assert_eq!(e.confidence, 0.85);
        assert_eq!(e.severity.as_str(), "unknown");

        let failures: Vec<_> = batch.failures().collect();
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], ItemOutcome::Failed { code, .. } if code == "DOID:XXXX-INVALID"));
    }

    #[tokio::test]
    async fn test_order_preserved() {
        let stub = StubOntology::new(&[
            ("DOID:8469", json!({"name": "influenza"})),
            ("DOID:552", json!({"name": "pneumonia"})),
            ("DOID:1816", json!({"name": "measles"})),
        ]);
        let fetcher = DiseaseOntologyFetcher::new(&stub);

        let batch = fetcher
            .fetch(&codes(&["DOID:1816", "DOID:0000", "DOID:8469", "DOID:552"]))
            .await;

        let names: Vec<&str> = batch.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["measles", "influenza", "pneumonia"]);
        assert_eq!(batch.outcomes.len(), 4);
    }

    #[tokio::test]
    async fn test_malformed_body_is_item_failure() {
        let stub = StubOntology::new(&[
            ("DOID:1", json!(["not", "an", "object"])),
            ("DOID:2", json!({"synonyms": ["no name"]})),
            ("DOID:3", json!({"name": "ok"})),
        ]);
        let fetcher = DiseaseOntologyFetcher::new(&stub);

        let batch = fetcher.fetch(&codes(&["DOID:1", "DOID:2", "DOID:3"])).await;

        assert_eq!(batch.entities.len(), 1);
        assert_eq!(batch.failures().count(), 2);
    }

    #[tokio::test]
    async fn test_repeated_code_looked_up_once() {
        let stub = StubOntology::new(&[("DOID:552", json!({"name": "pneumonia"}))]);
        let fetcher = DiseaseOntologyFetcher::new(&stub);

        let batch = fetcher.fetch(&codes(&["DOID:552", "DOID:552"])).await;

        assert_eq!(batch.entities.len(), 1);
        assert_eq!(stub.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_codes_with_same_entity_id_looked_up_once() {
        let stub = StubOntology::new(&[("DOID:552", json!({"name": "pneumonia"}))]);
        let fetcher = DiseaseOntologyFetcher::new(&stub);

        let batch = fetcher.fetch(&codes(&["DOID:552", "doid:552 ", "DOID:8469"])).await;

        assert_eq!(batch.entities.len(), 1);
        assert_eq!(batch.entities[0].id, "disease_552");
        assert_eq!(*stub.calls.lock().unwrap(), vec!["DOID:552", "DOID:8469"]);
        assert_eq!(batch.outcomes.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_defaults_requests_six_codes() {
        let stub = StubOntology::new(&[]);
        let fetcher = DiseaseOntologyFetcher::new(&stub);

        let batch = fetcher.fetch_defaults().await;

        assert!(batch.entities.is_empty());
        assert_eq!(*stub.calls.lock().unwrap(), default_codes());
    }

    #[tokio::test]
    async fn test_client_rejects_host_outside_allowlist() {
        let client = DiseaseOntologyClient::with_base_url(
            "https://example.com/api/metadata",
            DEFAULT_TIMEOUT,
        )
        .unwrap();
        let err = client.lookup("DOID:8469").await.unwrap_err();
        assert!(matches!(err, MedkbError::Security(_)));
    }

    #[test]
    fn test_parse_metadata_requires_name() {
        assert!(parse_metadata(&json!({"name": "measles"})).is_ok());
        assert!(matches!(
            parse_metadata(&json!({"def": "x"})),
            Err(MedkbError::MalformedRecord(_))
        ));
        assert!(matches!(
            parse_metadata(&json!(null)),
            Err(MedkbError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_metadata_entry() {
        let m = DiseaseOntologyFetcher::metadata(1);
        assert_eq!(m.name, "Disease Ontology");
        assert_eq!(m.entries, 1);
        assert_eq!(m.url, DO_HOME_URL);
    }
}
