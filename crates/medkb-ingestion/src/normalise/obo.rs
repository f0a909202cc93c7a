//! Disease Ontology OBO release parsing.
//!
//! Reads the `doid.obo` flat file published with each ontology release and
//! turns every live `[Term]` stanza into the same raw record the metadata
//! API returns, so both paths share one normaliser.
//!
//! Only the tags the canonical schema uses are read:
//! ```text
//! [Term]
//! id: DOID:8469
//! name: influenza
//! def: "A viral infectious disease ..." [url:https\://...]
//! synonym: "flu" EXACT []
//! is_obsolete: true
//! ```

use crate::models::RawOntologyRecord;

/// One live term from an OBO release.
#[derive(Debug, Clone, PartialEq)]
pub struct OboTerm {
    pub code: String,
    pub record: RawOntologyRecord,
}

#[derive(Default)]
struct Stanza {
    id: Option<String>,
    name: Option<String>,
    definition: Option<String>,
    synonyms: Vec<String>,
    obsolete: bool,
}

impl Stanza {
    fn finish(self) -> Option<OboTerm> {
        if self.obsolete {
            return None;
        }
        let code = self.id?;
        Some(OboTerm {
            code,
            record: RawOntologyRecord {
                name: self.name,
                synonyms: Some(self.synonyms),
                definition: self.definition,
            },
        })
    }
}

/// Parse an OBO document into live terms, in file order.
/// Obsolete terms, terms without an `id`, and non-`[Term]` stanzas are dropped.
pub fn parse_obo(text: &str) -> Vec<OboTerm> {
    let mut terms = Vec::new();
    // None while outside a [Term] stanza (header or [Typedef])
    let mut current: Option<Stanza> = None;

    for line in text.lines() {
        let line = line.trim_end();

        if line.starts_with('[') {
            if let Some(term) = current.take().and_then(Stanza::finish) {
                terms.push(term);
            }
            if line == "[Term]" {
                current = Some(Stanza::default());
            }
            continue;
        }

        let Some(stanza) = current.as_mut() else { continue };
        let Some((tag, value)) = line.split_once(':') else { continue };
        let value = value.trim();

        match tag {
            "id"          => stanza.id = Some(value.to_string()),
            "name"        => stanza.name = Some(value.to_string()),
            "def"         => stanza.definition = quoted(value),
            "synonym"     => stanza.synonyms.extend(quoted(value)),
            "is_obsolete" => stanza.obsolete = value == "true",
            _ => {}
        }
    }

    if let Some(term) = current.and_then(Stanza::finish) {
        terms.push(term);
    }

    tracing::debug!(terms = terms.len(), "Parsed OBO release");
    terms
}

/// Leading double-quoted string with OBO backslash escapes resolved.
/// `None` if the value does not start with a quote or never closes it.
fn quoted(value: &str) -> Option<String> {
    let mut chars = value.strip_prefix('"')?.chars();
    let mut out = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(chars.next()?),
            '"'  => return Some(out),
            _    => out.push(c),
        }
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
