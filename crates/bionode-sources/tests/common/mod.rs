//! Shared fixtures for the mock-server tests.

#![allow(dead_code)]

use bionode_common::SourcesConfig;
use bionode_core::ResolveContext;
use serde_json::{json, Map, Value};
use wiremock::MockServer;

/// Every service pointed at the mock server.
pub fn config_for(server: &MockServer) -> SourcesConfig {
    let mut config = SourcesConfig::default();
    config.metgene.base_url = server.uri();
    config.glygen.base_url = server.uri();
    config.chembl.host = server.uri();
    config.http_timeout_secs = 5;
    config
}

pub fn ctx_for(server: &MockServer) -> ResolveContext {
    bionode_common::telemetry::init_tracing();
    ResolveContext::new(config_for(server)).unwrap()
}

const NULLABLE_ACTIVITY_KEYS: &[&str] = &[
    "activity_comment", "assay_chembl_id", "assay_description", "assay_variant_accession",
    "assay_variant_mutation", "bao_endpoint", "bao_format", "bao_label", "canonical_smiles",
    "data_validity_comment", "data_validity_description", "document_chembl_id", "document_journal",
    "document_year", "parent_molecule_chembl_id", "potential_duplicate", "qudt_units", "record_id",
    "relation", "src_id", "standard_flag", "standard_relation", "standard_text_value", "standard_type",
    "standard_units", "standard_upper_value", "standard_value", "target_chembl_id", "target_organism",
    "target_pref_name", "target_tax_id", "text_value", "toid", "type", "units", "uo_units",
    "upper_value", "value",
];

/// Minimal ChEMBL activity row: identifying fields set, the rest null.
pub fn activity(id: u64, drug: &str, pchembl: &str) -> Value {
    let mut row: Map<String, Value> = NULLABLE_ACTIVITY_KEYS.iter().map(|k| (k.to_string(), Value::Null)).collect();
    row.insert("activity_id".into(), json!(id));
    row.insert("assay_type".into(), json!("T"));
    row.insert("molecule_chembl_id".into(), json!(format!("CHEMBL{}", id)));
    row.insert("molecule_pref_name".into(), json!(drug));
    row.insert("pchembl_value".into(), json!(pchembl));
    Value::Object(row)
}

pub fn protein_detail(gene: &str, accession: &str) -> Value {
    json!({
        "gene": { "name": gene, "locus": { "chromosome": "17", "start_pos": 43044295, "end_pos": 43125483, "strand": "-" } },
        "uniprot": { "uniprot_id": format!("{}_HUMAN", gene), "uniprot_canonical_ac": accession, "length": 1863 },
        "protein_names": { "name": "Breast cancer type 1 susceptibility protein" },
        "species": { "name": "Homo sapiens", "common_name": "Human", "taxid": "9606" },
        "glycoprotein": { "glycosylation": false },
        "phosphorylation": { "phosphorylation": false }
    })
}
