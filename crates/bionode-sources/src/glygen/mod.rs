//! GlyGen REST client.
//!
//! GlyGen integrates glycan, glycoprotein and glycoenzyme data.
//!
//! API docs: https://api.glygen.org
//!
//! All calls are POSTs with a JSON body. Searches are two-stage: a `search`
//! call returns a `list_id`, and the matching `list` call returns the records
//! for that id under `results`.

pub mod models;
pub mod nodes;

use bionode_common::{BionodeError, GlyGenConfig, Result, SandboxClient};
use bionode_core::{DataNode, ResolveContext};
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::filter::{filter_records, str_at};
use crate::http::{join_url, post_json};
use models::{GlyGenGlycanSetResponse, GlyGenProteinResponse, GlyGenProteinSetResponse, GlycanViewResponse};

/// Record kinds with search/list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Protein,
    Glycan,
}

impl ListKind {
    fn path(&self) -> &'static str {
        match self {
            ListKind::Protein => "protein",
            ListKind::Glycan => "glycan",
        }
    }
}

pub struct GlyGenClient {
    client: SandboxClient,
    config: GlyGenConfig,
}

impl GlyGenClient {
    pub fn new(client: SandboxClient, config: GlyGenConfig) -> Self {
        Self { client, config }
    }

    pub fn from_context(ctx: &ResolveContext) -> Self {
        Self::new(ctx.client.clone(), ctx.config.glygen.clone())
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.config.base_url, path)
    }

    // ── Two-stage search ─────────────────────────────────────────────────────

    /// Runs a search and returns the `list_id` GlyGen assigned to it.
    #[instrument(skip(self, query))]
    pub async fn search(&self, kind: ListKind, query: &Value) -> Result<String> {
        let url = self.url(&format!("{}/search/", kind.path()));
        let json = post_json(&self.client, &url, query).await?;
        let list_id = json
            .get("list_id")
            .and_then(Value::as_str)
            .ok_or(BionodeError::MissingField { node: "GlyGenSearch", field: "list_id" })?;
        debug!(list_id, "GlyGen search resolved");
        Ok(list_id.to_string())
    }

    /// Fetches the records of a search list. Accepts either the documented
    /// `{ results: [...] }` envelope or a bare array.
    #[instrument(skip(self))]
    pub async fn list(&self, kind: ListKind, list_id: &str) -> Result<Vec<Value>> {
        let url = self.url(&format!("{}/list/", kind.path()));
        let json = post_json(&self.client, &url, &json!({ "id": list_id })).await?;
        let records = match json {
            Value::Array(rows) => rows,
            Value::Object(mut obj) => match obj.remove("results") {
                Some(Value::Array(rows)) => rows,
                _ => return Err(BionodeError::MissingField { node: "GlyGenList", field: "results" }),
            },
            _ => return Err(BionodeError::MissingField { node: "GlyGenList", field: "results" }),
        };
        debug!(n = records.len(), "GlyGen list retrieved");
        Ok(records)
    }

    // ── Proteins ─────────────────────────────────────────────────────────────

    /// Protein detail record for a UniProtKB canonical accession.
    #[instrument(skip(self))]
    pub async fn protein_detail(&self, accession: &str) -> Result<GlyGenProteinResponse> {
        let url = self.url(&format!("protein/detail/{}/", accession));
        let json = post_json(&self.client, &url, &json!({ "uniprot_canonical_ac": accession })).await?;
        GlyGenProteinResponse::decode(json)
    }

    /// Protein list rows whose gene matches `symbol` exactly. Zero matches is
    /// an empty vector.
    #[instrument(skip(self))]
    pub async fn protein_records_for_gene(&self, symbol: &str) -> Result<Vec<Value>> {
        let list_id = self.search(ListKind::Protein, &json!({ "gene_name": symbol })).await?;
        let records = self.list(ListKind::Protein, &list_id).await?;
        let matched = filter_records(&records, "gene", symbol);
        debug!(total = records.len(), matched = matched.len(), "GlyGen protein rows filtered");
        Ok(matched)
    }

    /// Detail record of the first protein product of `symbol`.
    ///
    /// The list rows are summaries, while the output node is a full protein
    /// record, so the first matching accession costs one more detail call.
    /// With no single record to return, zero matches is `NotFound` rather
    /// than an empty value.
    pub async fn protein_product(&self, symbol: &str) -> Result<GlyGenProteinResponse> {
        let matched = self.protein_records_for_gene(symbol).await?;
        let accession = matched
            .iter()
            .find_map(row_accession)
            .ok_or_else(|| BionodeError::NotFound {
                node: GlyGenProteinResponse::META.id,
                query: symbol.to_string(),
            })?;
        self.protein_detail(accession).await
    }

    /// Protein rows for a set of accessions, searched as one comma-joined query.
    #[instrument(skip(self))]
    pub async fn protein_set(&self, joined_accessions: &str) -> Result<GlyGenProteinSetResponse> {
        let list_id = self
            .search(ListKind::Protein, &json!({ "uniprot_canonical_ac": joined_accessions }))
            .await?;
        let records = self.list(ListKind::Protein, &list_id).await?;
        GlyGenProteinSetResponse::decode(Value::Array(records))
    }

    // ── Glycans ──────────────────────────────────────────────────────────────

    /// Glycan detail record for a GlyTouCan accession.
    #[instrument(skip(self))]
    pub async fn glycan_detail(&self, accession: &str) -> Result<GlycanViewResponse> {
        let url = self.url(&format!("glycan/detail/{}", accession));
        let json = post_json(&self.client, &url, &json!({ "glytoucan_ac": accession })).await?;
        GlycanViewResponse::decode(json)
    }

    /// Glycan rows for a set of accessions, searched as one comma-joined query.
    #[instrument(skip(self))]
    pub async fn glycan_set(&self, joined_accessions: &str) -> Result<GlyGenGlycanSetResponse> {
        let query = json!({
            "glycan_identifier": { "glycan_id": joined_accessions, "subsumption": "none" }
        });
        let list_id = self.search(ListKind::Glycan, &query).await?;
        let records = self.list(ListKind::Glycan, &list_id).await?;
        GlyGenGlycanSetResponse::decode(Value::Array(records))
    }
}

/// Canonical accession of a protein list row, flat or nested.
fn row_accession(row: &Value) -> Option<&str> {
    str_at(row, "uniprot_canonical_ac").or_else(|| str_at(row, "uniprot.uniprot_canonical_ac"))
}
