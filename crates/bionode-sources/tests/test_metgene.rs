//! MetGENE study lookups against a mock server.

mod common;

use bionode_common::BionodeError;
use bionode_core::terms::{GeneSet, MetGeneSummary};
use bionode_core::{DataNode, ProcessNode};
use bionode_sources::{MetGeneStudies, MetGeneStudiesGeneSet};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TAIL: &str = "anatomy/NA/disease/NA/phenotype/NA/viewType/json";

#[tokio::test]
async fn test_studies_passed_through_unchanged() {
    let server = MockServer::start().await;
    let body = json!([
        { "KEGG_COMPOUND_ID": "C00031", "REFMET_NAME": "Glucose", "STUDY_ID": "ST000001 ST000002" },
        { "KEGG_COMPOUND_ID": "C00668", "REFMET_NAME": "Glucose 6-phosphate", "STUDY_ID": null }
    ]);
    Mock::given(method("GET"))
        .and(path(format!("/studies/species/hsa/GeneIDType/SYMBOL_OR_ALIAS/GeneInfoStr/HK1/{}", TAIL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let table = MetGeneStudies
        .resolve(MetGeneSummary { gene: "HK1".into() }, &common::ctx_for(&server))
        .await
        .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.encode().unwrap(), body);
    assert_eq!(table.columns(), vec!["KEGG_COMPOUND_ID", "REFMET_NAME", "STUDY_ID"]);
}

#[tokio::test]
async fn test_gene_is_trimmed_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/studies/species/hsa/GeneIDType/SYMBOL_OR_ALIAS/GeneInfoStr/HK1/{}", TAIL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let table = MetGeneStudies
        .resolve(MetGeneSummary { gene: "  HK1 ".into() }, &common::ctx_for(&server))
        .await
        .unwrap();
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_gene_set_is_comma_joined_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/studies/species/hsa/GeneIDType/SYMBOL_OR_ALIAS/GeneInfoStr/HK1,PKM,TP53/{}", TAIL)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let table = MetGeneStudiesGeneSet
        .resolve(GeneSet::new(["HK1", "PKM", "TP53"]), &common::ctx_for(&server))
        .await
        .unwrap();

    assert!(table.is_empty());
    assert!(table.view().render_text().contains("No studies found"));
}

#[tokio::test]
async fn test_non_object_rows_are_schema_mismatch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(["HK1"])))
        .mount(&server)
        .await;

    let err = MetGeneStudies
        .resolve(MetGeneSummary { gene: "HK1".into() }, &common::ctx_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, BionodeError::SchemaMismatch { node: "MetGeneStudyTable", .. }));
}

#[tokio::test]
async fn test_server_error_is_not_empty_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = MetGeneStudies
        .resolve(MetGeneSummary { gene: "HK1".into() }, &common::ctx_for(&server))
        .await
        .unwrap_err();
    assert!(matches!(err, BionodeError::UpstreamStatus { status: 500, .. }));
}

#[tokio::test]
async fn test_independent_resolutions_run_concurrently() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    for gene in ["HK1", "PKM"] {
        Mock::given(method("GET"))
            .and(path(format!("/studies/species/hsa/GeneIDType/SYMBOL_OR_ALIAS/GeneInfoStr/{}/{}", gene, TAIL)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "GENE": gene }])))
            .expect(1)
            .mount(&server)
            .await;
    }

    let ctx = common::ctx_for(&server);
    let (hk1, pkm) = futures::join!(
        MetGeneStudies.resolve(MetGeneSummary { gene: "HK1".into() }, &ctx),
        MetGeneStudies.resolve(MetGeneSummary { gene: "PKM".into() }, &ctx),
    );

    assert_eq!(hk1?.0[0]["GENE"], "HK1");
    assert_eq!(pkm?.0[0]["GENE"], "PKM");
    Ok(())
}
