//! Canonical entity schema every ingestion source is normalised into.
//! These are the records a knowledge base consumes from the ingestion report.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::confidence;

// ---------------------------------------------------------------------------
// Entity type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Disease,
    Term,
    #[default]
    #[serde(other)]
    Unknown,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Disease => "disease",
            EntityType::Term    => "term",
            EntityType::Unknown => "unknown",
        }
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Clinical severity. No current source supplies it, so ingestion always
/// produces `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Unknown  => "unknown",
            Severity::Low      => "low",
            Severity::Medium   => "medium",
            Severity::High     => "high",
            Severity::Critical => "critical",
        }
    }
}

// ---------------------------------------------------------------------------
// Medical entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalEntity {
    pub id: String,
    #[serde(rename = "type", default)]
    pub entity_type: EntityType,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Language code → localised name.
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    #[serde(default)]
    pub source_reference_id: String,
    #[serde(default)]
    pub description: String,
    pub source: String,
    pub licence: String,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub emergency_flag: bool,
    pub confidence: f64,
}

impl MedicalEntity {
    /// Start an entity with the required identity and provenance fields.
    /// Everything else takes its ingestion-time default.
    pub fn builder(
        id: impl Into<String>,
        entity_type: EntityType,
        name: impl Into<String>,
    ) -> MedicalEntityBuilder {
        MedicalEntityBuilder {
            entity: MedicalEntity {
                id: id.into(),
                entity_type,
                name: name.into(),
                aliases: Vec::new(),
                languages: BTreeMap::new(),
                source_reference_id: String::new(),
                description: String::new(),
                source: String::new(),
                licence: String::new(),
                references: Vec::new(),
                severity: Severity::Unknown,
                emergency_flag: false,
                confidence: 0.0,
            },
        }
    }
}

/// One-shot builder; entities are never mutated once `build` returns.
#[derive(Debug)]
pub struct MedicalEntityBuilder {
    entity: MedicalEntity,
}

impl MedicalEntityBuilder {
    pub fn aliases(mut self, aliases: Vec<String>) -> Self {
        self.entity.aliases = aliases;
        self
    }

    pub fn language(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.entity.languages.insert(code.into(), name.into());
        self
    }

    pub fn source_reference_id(mut self, id: impl Into<String>) -> Self {
        self.entity.source_reference_id = id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.entity.description = description.into();
        self
    }

    pub fn provenance(mut self, source: impl Into<String>, licence: impl Into<String>) -> Self {
        self.entity.source = source.into();
        self.entity.licence = licence.into();
        self
    }

    pub fn reference(mut self, url: impl Into<String>) -> Self {
        self.entity.references.push(url.into());
        self
    }

    pub fn confidence(mut self, value: f64) -> Self {
        self.entity.confidence = confidence::clamp(value);
        self
    }

    pub fn build(self) -> MedicalEntity {
        self.entity
    }
}

// ---------------------------------------------------------------------------
// Source metadata
// ---------------------------------------------------------------------------

/// Provenance record for one attempted source in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    pub name: String,
    pub entries: usize,
    pub url: String,
    pub licence: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn influenza() -> MedicalEntity {
        MedicalEntity::builder("disease_8469", EntityType::Disease, "influenza")
            .aliases(vec!["flu".to_string(), "grippe".to_string()])
            .language("en", "influenza")
            .source_reference_id("DOID:8469")
            .provenance("Disease Ontology", "https://www.disease-ontology.org/about/DO_FAIR")
            .reference("https://www.disease-ontology.org/DO_DOID:8469")
            .confidence(0.85)
            .build()
    }

    #[test]
    fn test_entity_serializes_camel_case() {
        let json = serde_json::to_value(influenza()).unwrap();
        assert_eq!(json["type"], "disease");
        assert_eq!(json["sourceReferenceId"], "DOID:8469");
        assert_eq!(json["emergencyFlag"], false);
        assert_eq!(json["severity"], "unknown");
        assert_eq!(json["languages"]["en"], "influenza");
        assert!(json.get("entity_type").is_none());
    }

    #[test]
    fn test_builder_defaults() {
        let e = MedicalEntity::builder("term_1", EntityType::Term, "bukhar").build();
        assert!(e.aliases.is_empty());
        assert!(e.description.is_empty());
        assert_eq!(e.severity, Severity::Unknown);
        assert!(!e.emergency_flag);
    }

    #[test]
    fn test_confidence_clamped() {
        let high = MedicalEntity::builder("a", EntityType::Term, "a").confidence(1.7).build();
        let low = MedicalEntity::builder("b", EntityType::Term, "b").confidence(-0.2).build();
        assert_eq!(high.confidence, 1.0);
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn test_unrecognised_type_reads_as_unknown() {
        let json = r#"{"id":"x","type":"procedure","name":"x","source":"s","licence":"l","confidence":0.5,"severity":"extreme"}"#;
        let e: MedicalEntity = serde_json::from_str(json).unwrap();
        assert_eq!(e.entity_type, EntityType::Unknown);
        assert_eq!(e.severity, Severity::Unknown);
    }

    #[test]
    fn test_known_severities_parse() {
        let sev: Vec<Severity> =
            serde_json::from_str(r#"["low","medium","high","critical","unknown"]"#).unwrap();
        assert_eq!(
            sev,
            vec![Severity::Low, Severity::Medium, Severity::High, Severity::Critical, Severity::Unknown]
        );
        assert_eq!(Severity::default(), Severity::Unknown);
    }

    #[test]
    fn test_entity_deserializes_back() {
        let original = influenza();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: MedicalEntity = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
