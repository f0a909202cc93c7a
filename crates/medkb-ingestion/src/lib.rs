//! medkb-ingestion — Medical terminology ingestion pipeline.
//! - Source clients (Disease Ontology API, OBO release, Eka-IndicMTEB)
//! - Normalisation of raw source records into `MedicalEntity`
//! - Per-run aggregation context
//! - Ingestion report with derived statistics

pub mod sources;
pub mod context;
pub mod models;
pub mod normalise;
pub mod pipeline;
pub mod report;
