//! Live source checks against the real services.
//!
//! Run with: cargo test --package medkb-ingestion --test test_live_sources -- --ignored --nocapture

use medkb_ingestion::sources::disease_ontology::{DiseaseOntologyClient, DiseaseOntologyFetcher};
use medkb_ingestion::sources::eka_indicmteb::{TermDatasetFetcher, TermDatasetSettings};
use medkb_ingestion::sources::obo_release::{OboReleaseSource, ReleaseLocation};
use medkb_ingestion::sources::LoaderCapability;

#[tokio::test]
#[ignore] // Requires network access
async fn test_disease_ontology_lookup() {
    let client = DiseaseOntologyClient::new().expect("client");
    let fetcher = DiseaseOntologyFetcher::new(&client);

    let codes = vec!["DOID:0081086".to_string(), "DOID:XXXX-INVALID".to_string()];
    let batch = fetcher.fetch(&codes).await;

    for outcome in &batch.outcomes {
        println!("{outcome:?}");
    }
    assert_eq!(batch.entities.len(), 1);
    assert_eq!(batch.entities[0].id, "disease_0081086");
    assert_eq!(batch.failures().count(), 1);
}

#[tokio::test]
#[ignore] // Requires network access and possibly HF_TOKEN
async fn test_eka_indicmteb_sample() {
    let capability = LoaderCapability::detect(&TermDatasetSettings::default());
    let entities = TermDatasetFetcher::new(&capability).fetch(5).await.into_entities();

    for e in &entities {
        println!("{} → {} {:?}", e.id, e.name, e.languages);
    }
    assert!(entities.len() <= 5);
}

#[tokio::test]
#[ignore] // Requires network access
async fn test_obo_release_download() {
    let source = OboReleaseSource::new(ReleaseLocation::default()).expect("client");
    let entities = source.fetch(5).await.expect("release");

    for e in &entities {
        println!("{} → {}", e.id, e.name);
    }
    assert_eq!(entities.len(), 5);
    assert!(entities.iter().all(|e| e.id.starts_with("disease_")));
}
