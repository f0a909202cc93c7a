//! Per-source confidence heuristics for normalised entities.
//! Each source gets one fixed value; no per-record scoring happens at ingestion.

/// Curated ontology record with a stable identifier and definition.
pub const ONTOLOGY_CONFIDENCE: f64 = 0.85;

/// Benchmark corpus sample: a surface form without curation or definition.
pub const TERM_DATASET_CONFIDENCE: f64 = 0.80;

/// Clamp a confidence into [0.0, 1.0]. NaN maps to 0.0.
pub fn clamp(confidence: f64) -> f64 {
    if confidence.is_nan() {
        return 0.0;
    }
    confidence.clamp(0.0, 1.0)
}
