//! Term corpus row → canonical term entity.

use medkb_common::confidence::TERM_DATASET_CONFIDENCE;
use medkb_common::{EntityType, MedicalEntity};

use crate::models::RawTermRecord;

pub const SOURCE_NAME: &str = "Eka-IndicMTEB";
pub const LICENCE: &str = "CC-BY-SA-4.0";
pub const DATASET_URL: &str = "https://huggingface.co/datasets/ekacare/Eka-IndicMTEB";

pub fn entity_id(index: usize) -> String {
    format!("eka_term_{index}")
}

/// Map one corpus row to a term entity.
///
/// Name priority: query text, then the generic text field, then a
/// positional placeholder. The row's own language tag keys the name
/// when present; otherwise the name is filed under `en`.
pub fn normalise_term(index: usize, record: &RawTermRecord) -> MedicalEntity {
    let id = entity_id(index);
    let name = record
        .query
        .clone()
        .or_else(|| record.text.clone())
        .unwrap_or_else(|| format!("Term {index}"));
    let language = record.language.as_deref().unwrap_or("en");
    let reference_id = record.reference_id.clone().unwrap_or_else(|| id.clone());

    MedicalEntity::builder(id, EntityType::Term, name.clone())
        .language(language, name)
        .source_reference_id(reference_id)
        .provenance(SOURCE_NAME, LICENCE)
        .reference(DATASET_URL)
        .confidence(TERM_DATASET_CONFIDENCE)
        .build()
}
