//! GlyGen two-stage searches against a mock server.

mod common;

use bionode_common::BionodeError;
use bionode_core::terms::{GeneInfo, GeneTerm, GlycanSet, ProteinSet};
use bionode_core::ProcessNode;
use bionode_sources::glygen::{GlyGenClient, ListKind};
use bionode_sources::{GlyGenGlycanSet, GlyGenProteinInformation, GlyGenProteinProduct, GlyGenProteinSet};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_search(server: &MockServer, kind: &str, query: serde_json::Value, list_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/{}/search/", kind)))
        .and(body_json(query))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "list_id": list_id })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_list(server: &MockServer, kind: &str, list_id: &str, results: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(format!("/{}/list/", kind)))
        .and(body_json(json!({ "id": list_id })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_gene_lookup_keeps_only_exact_gene_match() {
    let server = MockServer::start().await;
    mount_search(&server, "protein", json!({ "gene_name": "BRCA1" }), "L1").await;
    mount_list(
        &server,
        "protein",
        "L1",
        json!([
            { "gene": { "name": "BRCA1" }, "uniprot_canonical_ac": "P38398-1" },
            { "gene": { "name": "TP53" }, "uniprot_canonical_ac": "P04637-1" }
        ]),
    )
    .await;

    let client = GlyGenClient::from_context(&common::ctx_for(&server));
    let rows = client.protein_records_for_gene("BRCA1").await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["uniprot_canonical_ac"], "P38398-1");
}

#[tokio::test]
async fn test_gene_term_resolves_to_protein_detail() {
    let server = MockServer::start().await;
    mount_search(&server, "protein", json!({ "gene_name": "BRCA1" }), "L1").await;
    mount_list(
        &server,
        "protein",
        "L1",
        json!([
            { "gene": "TP53", "uniprot_canonical_ac": "P04637-1" },
            { "gene": "BRCA1", "uniprot_canonical_ac": "P38398-1" }
        ]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/protein/detail/P38398-1/"))
        .and(body_json(json!({ "uniprot_canonical_ac": "P38398-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::protein_detail("BRCA1", "P38398-1")))
        .expect(1)
        .mount(&server)
        .await;

    let protein = GlyGenProteinInformation
        .resolve(GeneTerm::new("BRCA1"), &common::ctx_for(&server))
        .await
        .unwrap();

    assert_eq!(protein.gene.name, "BRCA1");
    assert_eq!(protein.uniprot.uniprot_canonical_ac, "P38398-1");
}

#[tokio::test]
async fn test_gene_info_symbol_is_trimmed() {
    let server = MockServer::start().await;
    mount_search(&server, "protein", json!({ "gene_name": "BRCA1" }), "L2").await;
    mount_list(&server, "protein", "L2", json!([{ "gene": "BRCA1", "uniprot_canonical_ac": "P38398-1" }])).await;
    Mock::given(method("POST"))
        .and(path("/protein/detail/P38398-1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::protein_detail("BRCA1", "P38398-1")))
        .expect(1)
        .mount(&server)
        .await;

    let protein = GlyGenProteinProduct
        .resolve(GeneInfo::from_symbol(" BRCA1\n"), &common::ctx_for(&server))
        .await
        .unwrap();
    assert_eq!(protein.gene.name, "BRCA1");
}

#[tokio::test]
async fn test_empty_list_is_empty_not_error() {
    let server = MockServer::start().await;
    mount_search(&server, "protein", json!({ "gene_name": "NOPE1" }), "L0").await;
    mount_list(&server, "protein", "L0", json!([])).await;

    let client = GlyGenClient::from_context(&common::ctx_for(&server));
    assert!(client.protein_records_for_gene("NOPE1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_no_matching_product_is_not_found() {
    let server = MockServer::start().await;
    mount_search(&server, "protein", json!({ "gene_name": "NOPE1" }), "L0").await;
    mount_list(&server, "protein", "L0", json!([{ "gene": "TP53", "uniprot_canonical_ac": "P04637-1" }])).await;

    let err = GlyGenProteinInformation
        .resolve(GeneTerm::new("NOPE1"), &common::ctx_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, BionodeError::NotFound { node: "GlyGenProteinResponse", .. }));
}

#[tokio::test]
async fn test_search_without_list_id_is_missing_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/glycan/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error_list": [] })))
        .mount(&server)
        .await;

    let client = GlyGenClient::from_context(&common::ctx_for(&server));
    let err = client.search(ListKind::Glycan, &json!({})).await.unwrap_err();
    assert!(matches!(err, BionodeError::MissingField { field: "list_id", .. }));
}

#[tokio::test]
async fn test_protein_set_sends_joined_accessions() {
    let server = MockServer::start().await;
    mount_search(&server, "protein", json!({ "uniprot_canonical_ac": "P04637-1,P38398-1" }), "S1").await;
    mount_list(
        &server,
        "protein",
        "S1",
        json!([{
            "gene": { "name": "TP53" },
            "uniprot": { "uniprot_canonical_ac": "P04637-1" },
            "protein_names": { "name": "Cellular tumor antigen p53" },
            "species": { "name": "Homo sapiens", "taxid": "9606" },
            "bools": { "total_n_glycosites": 0, "total_o_glycosites": 2, "reported_phosphosites": 30, "reported_snv": 0 }
        }]),
    )
    .await;

    let set = GlyGenProteinSet
        .resolve(ProteinSet::new(["P04637-1", "P38398-1"]), &common::ctx_for(&server))
        .await
        .unwrap();

    assert_eq!(set.0.len(), 1);
    assert_eq!(set.0[0].uniprot.uniprot_canonical_ac, "P04637-1");
}

#[tokio::test]
async fn test_glycan_set_sends_joined_accessions() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "glycan",
        json!({ "glycan_identifier": { "glycan_id": "G17689DH,G00912UN", "subsumption": "none" } }),
        "G1",
    )
    .await;
    mount_list(
        &server,
        "glycan",
        "G1",
        json!([{
            "glytoucan": { "glytoucan_ac": "G17689DH" },
            "hit_score": 1.2,
            "mass": 1931.69,
            "mass_pme": 2250.12,
            "sugar_count": 11,
            "glycoprotein_count": 120,
            "associated_enzymes": 8
        }]),
    )
    .await;

    let set = GlyGenGlycanSet
        .resolve(GlycanSet::new(["G17689DH", "G00912UN"]), &common::ctx_for(&server))
        .await
        .unwrap();

    assert_eq!(set.0.len(), 1);
    assert_eq!(set.0[0].glytoucan.glytoucan_ac, "G17689DH");
}

#[tokio::test]
async fn test_search_failure_is_upstream_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/glycan/search/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = GlyGenGlycanSet
        .resolve(GlycanSet::new(["G17689DH"]), &common::ctx_for(&server))
        .await
        .unwrap_err();
    match err {
        BionodeError::UpstreamStatus { url, status } => {
            assert_eq!(status, 500);
            assert!(url.ends_with("/glycan/search/"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
