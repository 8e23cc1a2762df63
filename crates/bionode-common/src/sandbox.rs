use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

use crate::config::SourcesConfig;
use crate::error::BionodeError;

/// An HTTP client that only issues requests to approved domains.
///
/// Cloning is cheap: the inner `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a client for the default public endpoints.
    pub fn new() -> Result<Self, BionodeError> {
        Self::from_config(&SourcesConfig::default())
    }

    /// Creates a client with the default allowlist plus the hosts of every
    /// base URL in `config`, honouring its request timeout.
    pub fn from_config(config: &SourcesConfig) -> Result<Self, BionodeError> {
        let mut allowlist = HashSet::new();
        let domains = [
            "bdcw.org",       // MetGENE
            "api.glygen.org", // GlyGen
            "www.ebi.ac.uk",  // ChEMBL
            "localhost",
            "127.0.0.1",
        ];
        for d in domains {
            allowlist.insert(d.to_string());
        }

        let mut builder = ClientBuilder::new();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BionodeError::Config(format!("Failed to build HTTP client: {}", e)))?;

        let mut sandbox = Self { client, allowlist };
        for base in config.service_urls() {
            sandbox.allow_url_host(base)?;
        }
        debug!(
            allowlist = ?sandbox.allowlist,
            timeout_secs = config.http_timeout_secs,
            "sandbox client built"
        );
        Ok(sandbox)
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Appends the host of `url` to the allowlist.
    pub fn allow_url_host(&mut self, url: &str) -> Result<(), BionodeError> {
        let parsed = Url::parse(url)
            .map_err(|e| BionodeError::Config(format!("Invalid service URL {}: {}", url, e)))?;
        match parsed.host_str() {
            Some(host) => {
                self.allow_domain(host);
                Ok(())
            }
            None => Err(BionodeError::Config(format!("Service URL {} has no host", url))),
        }
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Exact match or subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, BionodeError> {
        self.request(reqwest::Method::GET, url)
    }

    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, BionodeError> {
        self.request(reqwest::Method::POST, url)
    }

    pub fn request(&self, method: reqwest::Method, url: &str) -> Result<reqwest::RequestBuilder, BionodeError> {
        if !self.is_allowed(url) {
            warn!(url, "blocked request to domain outside allowlist");
            return Err(BionodeError::Sandbox(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.request(method, url))
    }
}
