use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;
use crate::error::MedkbError;

/// Per-request timeout applied to every source lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// An HTTP client that only allows requests to approved terminology hosts.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client with the default allowlist and the 10 s timeout.
    pub fn new() -> Result<Self, MedkbError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, MedkbError> {
        let mut allowlist = HashSet::new();
        let domains = [
            "disease-ontology.org",           // Disease Ontology metadata API
            "datasets-server.huggingface.co", // HuggingFace dataset rows
            "huggingface.co",                 // HuggingFace hub
            "raw.githubusercontent.com",      // Disease Ontology OBO releases
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("medkb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MedkbError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else { return false };
        let Some(host) = parsed.host_str() else { return false };
        // Exact match or a subdomain of an allowed domain
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Exposes the inner `reqwest::Client` builder for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, MedkbError> {
        if !self.is_allowed(url) {
            tracing::warn!(url, "Blocked request outside the sandbox allowlist");
            return Err(MedkbError::Security(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlist() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://www.disease-ontology.org/api/metadata/DOID:8469"));
        assert!(client.is_allowed("https://datasets-server.huggingface.co/rows?dataset=x"));
        assert!(!client.is_allowed("https://example.com/api"));
    }

    #[test]
    fn test_obo_release_host_allowed() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed(
            "https://raw.githubusercontent.com/DiseaseOntology/HumanDiseaseOntology/main/src/ontology/doid.obo"
        ));
        assert!(!client.is_allowed("https://github.com/DiseaseOntology/HumanDiseaseOntology"));
    }

    #[test]
    fn test_suffix_is_not_subdomain() {
        let client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://evil-disease-ontology.org/api"));
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("not a url"));
    }

    #[test]
    fn test_allow_domain() {
        let mut client = SandboxClient::new().unwrap();
        client.allow_domain("localhost");
        assert!(client.is_allowed("http://localhost:8080/api/metadata/DOID:1"));
    }

    #[test]
    fn test_blocked_get_is_security_error() {
        let client = SandboxClient::new().unwrap();
        let err = client.get("https://example.com/").unwrap_err();
        assert!(matches!(err, MedkbError::Security(_)));
    }
}
