//! Ingestion report: summary counts, source provenance, a sample of
//! entities, and derived statistics.
//!
//! Written as one pretty-printed UTF-8 JSON document (2-space indent,
//! non-ASCII left unescaped) for downstream tooling and human review.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use medkb_common::{MedicalEntity, Result, SourceMetadata};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_REPORT_PATH: &str = "ingestion-report.json";
pub const DEFAULT_SAMPLE_SIZE: usize = 5;

const NEXT_STEPS: [&str; 6] = [
    "1. Review sample entities for correctness",
    "2. Validate disease definitions",
    "3. Add multilingual translations",
    "4. Create vector embeddings",
    "5. Load into the medical knowledge base",
    "6. Integrate with the chat service",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionReport {
    pub summary: ReportSummary,
    pub metadata: ReportMetadata,
    pub sample_entities: Vec<MedicalEntity>,
    pub next_steps: Vec<String>,
    pub statistics: ReportStatistics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_entities: usize,
    pub total_mappings: usize,
    pub timestamp: DateTime<Utc>,
    pub sources_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    pub ingested_at: DateTime<Utc>,
    pub sources: Vec<SourceMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatistics {
    pub by_type: BTreeMap<String, usize>,
    pub by_severity: BTreeMap<String, usize>,
    pub emergency_conditions: usize,
}

impl ReportStatistics {
    /// Counts by type and by severity each sum to `entities.len()`.
    pub fn from_entities(entities: &[MedicalEntity]) -> Self {
        let mut stats = Self::default();
        for e in entities {
            *stats.by_type.entry(e.entity_type.as_str().to_string()).or_default() += 1;
            *stats.by_severity.entry(e.severity.as_str().to_string()).or_default() += 1;
            if e.emergency_flag {
                stats.emergency_conditions += 1;
            }
        }
        stats
    }
}

impl IngestionReport {
    /// Aggregate a run's entities. The sample is the first `sample_size`
    /// entities in aggregation order, not a representative draw.
    pub fn build(
        entities: &[MedicalEntity],
        sources: Vec<SourceMetadata>,
        ingested_at: DateTime<Utc>,
        total_mappings: usize,
        sample_size: usize,
    ) -> Self {
        Self {
            summary: ReportSummary {
                total_entities: entities.len(),
                total_mappings,
                timestamp: Utc::now(),
                sources_count: sources.len(),
            },
            metadata: ReportMetadata { ingested_at, sources },
            sample_entities: entities.iter().take(sample_size).cloned().collect(),
            next_steps: NEXT_STEPS.iter().map(|s| s.to_string()).collect(),
            statistics: ReportStatistics::from_entities(entities),
        }
    }

    /// Write the report as pretty JSON. A failed write is returned as is;
    /// there is no retry or fallback location.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        info!(path = %path.display(), "💾 Report saved");
        Ok(())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn log_summary(&self) {
        info!("============================================================");
        info!("INGESTION SUMMARY");
        info!("============================================================");
        info!("Total Entities: {}", self.summary.total_entities);
        info!("Total Mappings: {}", self.summary.total_mappings);
        info!("Sources: {}", self.summary.sources_count);
        for source in &self.metadata.sources {
            info!("  {} — {} entries", source.name, source.entries);
        }
        info!("Emergency Conditions: {}", self.statistics.emergency_conditions);
        info!("Next Steps:");
        for step in &self.next_steps {
            info!("  {}", step);
        }
        info!("============================================================");
    }
}
