//! Endpoint configuration for the lookup nodes.
//!
//! Every remote service is addressed through a base URL so that the same
//! resolvers can run against the public APIs or a local mock. The record is
//! built once at startup (usually `SourcesConfig::default()`) and shared
//! read-only afterwards.
//!
//! ```toml
//! http_timeout_secs = 60
//!
//! [glygen]
//! base_url = "https://api.glygen.org"
//!
//! [chembl]
//! batch_size = 100
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BionodeError, Result};

/// Complete source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Opt-in per-request timeout in seconds; `0` (the default) means none.
    #[serde(default = "default_timeout")]
    pub http_timeout_secs: u64,

    #[serde(default)]
    pub metgene: MetGeneConfig,

    #[serde(default)]
    pub glygen: GlyGenConfig,

    #[serde(default)]
    pub chembl: ChemblConfig,

    #[serde(default)]
    pub ranking: RankingConfig,
}

fn default_timeout() -> u64 { 0 }

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            http_timeout_secs: default_timeout(),
            metgene: MetGeneConfig::default(),
            glygen: GlyGenConfig::default(),
            chembl: ChemblConfig::default(),
            ranking: RankingConfig::default(),
        }
    }
}

// ── MetGENE ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetGeneConfig {
    /// REST root, e.g. `https://bdcw.org/MetGENE/rest`
    #[serde(default = "default_metgene_url")]
    pub base_url: String,

    /// KEGG organism code
    #[serde(default = "default_species")]
    pub species: String,

    #[serde(default = "default_gene_id_type")]
    pub gene_id_type: String,
}

fn default_metgene_url() -> String { "https://bdcw.org/MetGENE/rest".to_string() }
fn default_species() -> String { "hsa".to_string() }
fn default_gene_id_type() -> String { "SYMBOL_OR_ALIAS".to_string() }

impl Default for MetGeneConfig {
    fn default() -> Self {
        Self {
            base_url: default_metgene_url(),
            species: default_species(),
            gene_id_type: default_gene_id_type(),
        }
    }
}

// ── GlyGen ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlyGenConfig {
    #[serde(default = "default_glygen_url")]
    pub base_url: String,
}

fn default_glygen_url() -> String { "https://api.glygen.org".to_string() }

impl Default for GlyGenConfig {
    fn default() -> Self {
        Self { base_url: default_glygen_url() }
    }
}

// ── ChEMBL ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemblConfig {
    /// Host only; pagination links returned by ChEMBL are relative to it.
    #[serde(default = "default_chembl_host")]
    pub host: String,

    /// Drug names per `molecule_pref_name__in` query
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Page size requested from the activity endpoint
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Minimum pChEMBL value (-log10 of IC50/XC50/AC50/Ki/Kd/potency)
    #[serde(default = "default_min_pchembl")]
    pub min_pchembl: f64,

    /// Assay type filter; `T` selects toxicity assays
    #[serde(default = "default_assay_type")]
    pub assay_type: String,
}

fn default_chembl_host() -> String { "https://www.ebi.ac.uk".to_string() }
fn default_batch_size() -> usize { 100 }
fn default_page_limit() -> usize { 1000 }
fn default_min_pchembl() -> f64 { 1.0 }
fn default_assay_type() -> String { "T".to_string() }

impl Default for ChemblConfig {
    fn default() -> Self {
        Self {
            host: default_chembl_host(),
            batch_size: default_batch_size(),
            page_limit: default_page_limit(),
            min_pchembl: default_min_pchembl(),
            assay_type: default_assay_type(),
        }
    }
}

// ── External ranking process ──────────────────────────────────────────────────

/// Command that runs the drug ranking entrypoint.
///
/// The default `python3 -m bionode.runner` is a placeholder: this crate ships
/// no runner module, so hosts must install one under that name or point
/// `program`/`args` at their own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Interpreter or executable to spawn
    #[serde(default = "default_program")]
    pub program: String,

    /// Arguments placed before the request is written to stdin. Setting this
    /// replaces the placeholder list entirely.
    #[serde(default = "default_program_args")]
    pub args: Vec<String>,
}

fn default_program() -> String { "python3".to_string() }
fn default_program_args() -> Vec<String> { vec!["-m".to_string(), "bionode.runner".to_string()] }

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_program_args(),
        }
    }
}

// ── Helper Methods ────────────────────────────────────────────────────────────

impl SourcesConfig {
    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| BionodeError::Config(e.to_string()))
    }

    /// Load from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.http_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Base URLs of every configured service, for the HTTP allowlist.
    pub fn service_urls(&self) -> Vec<&str> {
        vec![
            self.metgene.base_url.as_str(),
            self.glygen.base_url.as_str(),
            self.chembl.host.as_str(),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SourcesConfig::default();
        assert_eq!(config.metgene.species, "hsa");
        assert_eq!(config.glygen.base_url, "https://api.glygen.org");
        assert_eq!(config.chembl.batch_size, 100);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SourcesConfig::from_toml_str(
            "http_timeout_secs = 45\n[glygen]\nbase_url = \"http://127.0.0.1:9000\"\n",
        )
        .unwrap();
        assert_eq!(config.glygen.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.metgene.gene_id_type, "SYMBOL_OR_ALIAS");
        assert_eq!(config.timeout(), Some(Duration::from_secs(45)));
    }

    #[test]
    fn test_ranking_command_override() {
        let config = SourcesConfig::from_toml_str(
            "[ranking]\nprogram = \"/opt/rank/bin/python\"\nargs = [\"/opt/rank/run.py\"]\n",
        )
        .unwrap();
        assert_eq!(config.ranking.program, "/opt/rank/bin/python");
        assert_eq!(config.ranking.args, vec!["/opt/rank/run.py"]);
        assert_eq!(SourcesConfig::default().ranking.args, vec!["-m", "bionode.runner"]);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = SourcesConfig::from_toml_str("http_timeout_secs = \"soon\"").unwrap_err();
        assert!(matches!(err, BionodeError::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chembl]\nbatch_size = 25").unwrap();
        let config = SourcesConfig::from_file(file.path()).unwrap();
        assert_eq!(config.chembl.batch_size, 25);
        assert_eq!(config.chembl.assay_type, "T");
    }
}
