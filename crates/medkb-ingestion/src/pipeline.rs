//! End-to-end ingestion pipeline.
//!
//! Runs each source to completion, one after another:
//!   1. Disease Ontology metadata API (per-code, partial failure tolerated)
//!   2. Disease Ontology OBO release, if a release file is configured
//!   3. Eka-IndicMTEB term corpus (optional; soft-skipped when unavailable)
//!   4. Aggregate into an `IngestionReport` and write it to disk
//!
//! Source problems only reduce the counts. The one fatal error is failing
//! to write the report.

use std::path::PathBuf;

use medkb_common::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::context::RunContext;
use crate::report::{IngestionReport, DEFAULT_REPORT_PATH, DEFAULT_SAMPLE_SIZE};
use crate::sources::disease_ontology::{default_codes, DiseaseOntologyFetcher};
use crate::sources::eka_indicmteb::{TermDatasetFetcher, TermFetch};
use crate::sources::obo_release::{self, OboReleaseSource, ReleaseLocation};
use crate::sources::{LoaderCapability, OntologyLookup};

// ── Job config ────────────────────────────────────────────────────────────────

/// Parameters for a single ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionJob {
    pub ontology_codes: Vec<String>,
    /// `doid.obo` release to ingest in bulk alongside the API lookups.
    pub obo_release: Option<OboReleaseJob>,
    pub term_limit: usize,
    pub sample_size: usize,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OboReleaseJob {
    pub location: ReleaseLocation,
    pub limit: usize,
}

impl Default for IngestionJob {
    fn default() -> Self {
        Self {
            ontology_codes: default_codes(),
            obo_release: None,
            term_limit: 50,
            sample_size: DEFAULT_SAMPLE_SIZE,
            output_path: PathBuf::from(DEFAULT_REPORT_PATH),
        }
    }
}

impl Default for OboReleaseJob {
    fn default() -> Self {
        Self {
            location: ReleaseLocation::default(),
            limit: obo_release::DEFAULT_LIMIT,
        }
    }
}

// ── Stages ────────────────────────────────────────────────────────────────────

/// Disease Ontology API stage. Always records its source entry, even when
/// every code failed.
pub async fn ingest_disease_ontology(
    ctx: &mut RunContext,
    lookup: &dyn OntologyLookup,
    codes: &[String],
) {
    let batch = DiseaseOntologyFetcher::new(lookup).fetch(codes).await;
    let kept = ctx.add_entities(batch.entities);
    ctx.record_source(DiseaseOntologyFetcher::metadata(kept));
}

/// OBO release stage. An unreadable file or failed download soft-skips
/// the source.
pub async fn ingest_obo_release(ctx: &mut RunContext, job: &OboReleaseJob) {
    let source = match OboReleaseSource::new(job.location.clone()) {
        Ok(source) => source,
        Err(e) => {
            warn!(error = %e, "❌ Disease Ontology release client could not start");
            return;
        }
    };
    match source.fetch(job.limit).await {
        Ok(entities) => {
            let kept = ctx.add_entities(entities);
            ctx.record_source(OboReleaseSource::metadata(kept));
        }
        Err(e) => {
            warn!(location = %job.location, error = %e, "❌ Disease Ontology release ingestion failed");
        }
    }
}

/// Term corpus stage. Records a source entry only when the corpus loaded.
pub async fn ingest_term_dataset(ctx: &mut RunContext, capability: &LoaderCapability, limit: usize) {
    match TermDatasetFetcher::new(capability).fetch(limit).await {
        TermFetch::Loaded(entities) => {
            let kept = ctx.add_entities(entities);
            ctx.record_source(TermDatasetFetcher::metadata(kept));
        }
        TermFetch::Skipped(_) | TermFetch::Failed(_) => {
            info!("This source is optional; continuing with Disease Ontology data");
        }
    }
}

// ── Pipeline orchestrator ─────────────────────────────────────────────────────

/// Run every stage once, write the report, and return it.
#[instrument(skip(lookup, capability), fields(output = %job.output_path.display()))]
pub async fn run_ingestion(
    job: &IngestionJob,
    lookup: &dyn OntologyLookup,
    capability: &LoaderCapability,
) -> Result<IngestionReport> {
    info!("🏥 Starting medical knowledge base ingestion");
    let mut ctx = RunContext::new();

    ingest_disease_ontology(&mut ctx, lookup, &job.ontology_codes).await;
    if let Some(obo) = &job.obo_release {
        ingest_obo_release(&mut ctx, obo).await;
    }
    ingest_term_dataset(&mut ctx, capability, job.term_limit).await;

    info!(
        entities = ctx.entities().len(),
        sources = ctx.sources().len(),
        started = %ctx.ingested_at(),
        "📊 Generating ingestion report"
    );
    let report = ctx.into_report(job.sample_size);
    report.write_to(&job.output_path)?;
    report.log_summary();
    Ok(report)
}
