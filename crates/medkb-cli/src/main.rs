//! medkb — Medical terminology ingestion.
//! Runs the full ingestion pipeline once and writes the report.

mod config;

use std::time::Duration;

use anyhow::Context;
use medkb_ingestion::pipeline::run_ingestion;
use medkb_ingestion::sources::disease_ontology::DiseaseOntologyClient;
use medkb_ingestion::sources::LoaderCapability;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // HF_TOKEN and friends may live in .env
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medkb=debug,info")),
        )
        .init();

    info!("🏥 medkb ingestion starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::load().context("Failed to load configuration")?;
    info!(
        "Configuration loaded. Codes: {}, term limit: {}, report: {}",
        config.disease_ontology.codes.len(),
        config.term_dataset.limit,
        config.report.output_path.display()
    );

    let ontology = DiseaseOntologyClient::with_base_url(
        &config.disease_ontology.base_url,
        Duration::from_secs(config.disease_ontology.timeout_secs),
    )
    .context("Failed to build Disease Ontology client")?;

    let capability = LoaderCapability::detect(&config.term_dataset_settings());
    match &capability {
        LoaderCapability::Available(_) => info!("✅ Eka-IndicMTEB loader available"),
        LoaderCapability::Unavailable(reason) => warn!("Eka-IndicMTEB loader unavailable: {reason}"),
    }

    let job = config.ingestion_job();
    let report = run_ingestion(&job, &ontology, &capability)
        .await
        .with_context(|| format!("Failed to write report to {}", job.output_path.display()))?;

    info!(
        "✅ Ingestion complete! Retrieved {} entities from {} sources",
        report.summary.total_entities, report.summary.sources_count
    );
    Ok(())
}
