//! Per-run accumulation state.
//!
//! One `RunContext` is created per ingestion run and handed to each stage
//! by `&mut`. It owns the entity and source lists exclusively; nothing is
//! shared or persisted beyond the report built from it.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use medkb_common::{MedicalEntity, SourceMetadata};
use tracing::warn;

use crate::report::IngestionReport;

#[derive(Debug)]
pub struct RunContext {
    ingested_at: DateTime<Utc>,
    entities: Vec<MedicalEntity>,
    seen_ids: HashSet<String>,
    sources: Vec<SourceMetadata>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::started_at(Utc::now())
    }

    pub fn started_at(ingested_at: DateTime<Utc>) -> Self {
        Self {
            ingested_at,
            entities: Vec::new(),
            seen_ids: HashSet::new(),
            sources: Vec::new(),
        }
    }

    /// Append a source's entities in order. An entity whose id is already
    /// present is dropped (first one wins). Returns how many were kept.
    pub fn add_entities(&mut self, entities: Vec<MedicalEntity>) -> usize {
        let before = self.entities.len();
        for entity in entities {
            if !self.seen_ids.insert(entity.id.clone()) {
                warn!(id = %entity.id, source = %entity.source, "Dropping entity with duplicate id");
                continue;
            }
            self.entities.push(entity);
        }
        self.entities.len() - before
    }

    pub fn record_source(&mut self, metadata: SourceMetadata) {
        self.sources.push(metadata);
    }

    pub fn entities(&self) -> &[MedicalEntity] {
        &self.entities
    }

    pub fn sources(&self) -> &[SourceMetadata] {
        &self.sources
    }

    pub fn ingested_at(&self) -> DateTime<Utc> {
        self.ingested_at
    }

    /// Cross-source entity links. No linking exists yet, so this is always 0.
    pub fn total_mappings(&self) -> usize {
        0
    }

    pub fn into_report(self, sample_size: usize) -> IngestionReport {
        let total_mappings = self.total_mappings();
        IngestionReport::build(
            &self.entities,
            self.sources,
            self.ingested_at,
            total_mappings,
            sample_size,
        )
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
