//! Disease Ontology record → canonical disease entity.

use medkb_common::confidence::ONTOLOGY_CONFIDENCE;
use medkb_common::{EntityType, MedicalEntity};

use crate::models::RawOntologyRecord;

pub const SOURCE_NAME: &str = "Disease Ontology";
pub const LICENCE: &str = "https://www.disease-ontology.org/about/DO_FAIR";
const TERM_PAGE_URL: &str = "https://www.disease-ontology.org/DO_";
const UNKNOWN_NAME: &str = "Unknown";

/// `DOID:0081086` → `disease_0081086`. A code without a prefix is used whole.
pub fn entity_id(code: &str) -> String {
    let local = code.split_once(':').map_or(code, |(_, local)| local);
    format!("disease_{}", local.trim().to_lowercase())
}

/// Map one ontology record to a disease entity.
///
/// Ontology data carries no severity signal, so severity stays `unknown`
/// and the emergency flag stays off. Only the English name is known.
pub fn normalise_disease(code: &str, record: &RawOntologyRecord) -> MedicalEntity {
    let name = record.name.as_deref().unwrap_or(UNKNOWN_NAME);

    MedicalEntity::builder(entity_id(code), EntityType::Disease, name)
        .aliases(record.synonyms.clone().unwrap_or_default())
        .language("en", name)
        .source_reference_id(code)
        .description(record.definition.clone().unwrap_or_default())
        .provenance(SOURCE_NAME, LICENCE)
        .reference(format!("{TERM_PAGE_URL}{code}"))
        .confidence(ONTOLOGY_CONFIDENCE)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use medkb_common::Severity;

    #[test]
    fn test_full_record() {
        let record = RawOntologyRecord {
            name: Some("COVID-19".to_string()),
            synonyms: Some(vec!["2019-nCoV infection".to_string()]),
            definition: Some("A beta-coronavirus infectious disease.".to_string()),
        };
        let e = normalise_disease("DOID:0081086", &record);
        assert_eq!(e.id, "disease_0081086");
        assert_eq!(e.name, "COVID-19");
        assert_eq!(e.aliases, vec!["2019-nCoV infection"]);
        assert_eq!(e.languages.get("en").map(String::as_str), Some("COVID-19"));
        assert_eq!(e.languages.len(), 1);
        assert_eq!(e.source_reference_id, "DOID:0081086");
        assert_eq!(e.references, vec!["https://www.disease-ontology.org/DO_DOID:0081086"]);
        assert_eq!(e.source, "Disease Ontology");
        assert_eq!(e.licence, LICENCE);
    }

    #[test]
    fn test_missing_optional_fields() {
        let record = RawOntologyRecord {
            name: Some("pneumonia".to_string()),
            ..Default::default()
        };
        let e = normalise_disease("DOID:552", &record);
        assert!(e.aliases.is_empty());
        assert_eq!(e.description, "");
    }

    #[test]
    fn test_empty_record_degrades() {
        let e = normalise_disease("DOID:9351", &RawOntologyRecord::default());
        assert_eq!(e.name, "Unknown");
        assert_eq!(e.languages.get("en").map(String::as_str), Some("Unknown"));
    }

    #[test]
    fn test_fixed_defaults() {
        let e = normalise_disease("DOID:1816", &RawOntologyRecord::default());
        assert_eq!(e.confidence, 0.85);
        assert_eq!(e.severity, Severity::Unknown);
        assert!(!e.emergency_flag);
        assert_eq!(e.entity_type, EntityType::Disease);
    }

    #[test]
    fn test_entity_id_lowercases_suffix() {
        assert_eq!(entity_id("DOID:4195"), "disease_4195");
        assert_eq!(entity_id("DOID:ABC"), "disease_abc");
        assert_eq!(entity_id("4195"), "disease_4195");
    }
}
