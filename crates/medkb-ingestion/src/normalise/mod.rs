//! Entity normalisation.
//!
//! Each source has its own total mapping into `MedicalEntity`:
//! - `disease`: Disease Ontology record + code → disease entity
//! - `term`: corpus row + index → term entity
//! - `obo`: Disease Ontology OBO release → raw ontology records

pub mod disease;
pub mod obo;
pub mod term;

use medkb_common::MedicalEntity;

use crate::models::RawRecord;

pub use disease::normalise_disease;
pub use obo::{parse_obo, OboTerm};
pub use term::normalise_term;

/// Normalise any raw record. Never fails: missing fields take defaults.
pub fn normalise(raw: &RawRecord) -> MedicalEntity {
    match raw {
        RawRecord::Ontology { code, record } => normalise_disease(code, record),
        RawRecord::Term { index, record }    => normalise_term(*index, record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RawOntologyRecord, RawTermRecord};
    use medkb_common::EntityType;

    #[test]
    fn test_dispatch_by_variant() {
        let disease = normalise(&RawRecord::Ontology {
            code: "DOID:552".to_string(),
            record: RawOntologyRecord::default(),
        });
        let term = normalise(&RawRecord::Term {
            index: 3,
            record: RawTermRecord::default(),
        });
        assert_eq!(disease.entity_type, EntityType::Disease);
        assert_eq!(disease.id, "disease_552");
        assert_eq!(term.entity_type, EntityType::Term);
        assert_eq!(term.id, "eka_term_3");
    }
}
