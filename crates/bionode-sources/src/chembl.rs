//! ChEMBL activity client for drug cytotoxicity.
//!
//! ChEMBL is a database of bioactive molecules with drug-like properties.
//! Cytotoxicity is read from the activity model restricted to toxicity
//! assays (`assay_type=T`) above a pChEMBL threshold.
//!
//! API docs: https://chembl.gitbook.io/chembl-interface-documentation/web-resources/chembl-api
//! Endpoint: https://www.ebi.ac.uk/chembl/api/data/activity
//!
//! Drug names are upper-cased and sent in batches through
//! `molecule_pref_name__in`. Each batch follows `page_meta.next` (a path
//! relative to the host) until it is null.

use async_trait::async_trait;
use bionode_common::{BionodeError, ChemblConfig, Result, SandboxClient};
use bionode_core::schema::{nullable, nullable_flag, nullable_number, number};
use bionode_core::terms::ScoredDrugs;
use bionode_core::{Cell, DataNode, Icon, NodeMeta, Notifier, ProcessNode, ResolveContext, Story, Table, View};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::http::{get_json, get_json_query, join_url};

const ACTIVITY_PATH: &str = "chembl/api/data/activity";

// ── Activity record ───────────────────────────────────────────────────────────

/// One ChEMBL activity row. All keys must be present; only the identifying
/// fields and `pchembl_value` must be non-null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(deserialize_with = "nullable")]
    pub activity_comment: Option<String>,
    #[serde(deserialize_with = "number")]
    pub activity_id: f64,
    #[serde(deserialize_with = "nullable")]
    pub assay_chembl_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub assay_description: Option<String>,
    pub assay_type: String,
    #[serde(deserialize_with = "nullable")]
    pub assay_variant_accession: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub assay_variant_mutation: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub bao_endpoint: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub bao_format: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub bao_label: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub canonical_smiles: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub data_validity_comment: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub data_validity_description: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_chembl_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub document_journal: Option<String>,
    #[serde(deserialize_with = "nullable_number")]
    pub document_year: Option<f64>,
    pub molecule_chembl_id: String,
    pub molecule_pref_name: String,
    #[serde(deserialize_with = "nullable")]
    pub parent_molecule_chembl_id: Option<String>,
    #[serde(deserialize_with = "number")]
    pub pchembl_value: f64,
    #[serde(deserialize_with = "nullable_flag")]
    pub potential_duplicate: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub qudt_units: Option<String>,
    #[serde(deserialize_with = "nullable_number")]
    pub record_id: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub relation: Option<String>,
    #[serde(deserialize_with = "nullable_number")]
    pub src_id: Option<f64>,
    #[serde(deserialize_with = "nullable_flag")]
    pub standard_flag: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub standard_relation: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub standard_text_value: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub standard_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub standard_units: Option<String>,
    #[serde(deserialize_with = "nullable_number")]
    pub standard_upper_value: Option<f64>,
    #[serde(deserialize_with = "nullable_number")]
    pub standard_value: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub target_chembl_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub target_organism: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub target_pref_name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub target_tax_id: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub text_value: Option<String>,
    #[serde(deserialize_with = "nullable_number")]
    pub toid: Option<f64>,
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub activity_type: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub units: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub uo_units: Option<String>,
    #[serde(deserialize_with = "nullable_number")]
    pub upper_value: Option<f64>,
    #[serde(deserialize_with = "nullable_number")]
    pub value: Option<f64>,
}

/// Cytotoxicity activities, sorted by drug name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrugCytotoxicityTable(pub Vec<ActivityRecord>);

impl DrugCytotoxicityTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Stable sort by `molecule_pref_name`.
    pub fn sort_by_drug(&mut self) {
        self.0.sort_by(|a, b| a.molecule_pref_name.cmp(&b.molecule_pref_name));
    }
}

impl DataNode for DrugCytotoxicityTable {
    const META: NodeMeta = NodeMeta {
        id: "[DrugCytotoxictyChemblTable]",
        label: "Drug Cytotoxicity (CHEMBL)",
        description: "Drug Cytotoxicity CHEMBL",
        icons: &[Icon::Drug],
        color: Some("#98D7C2"),
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let mut table = Table::new([
            "Drug Name",
            "PCHEMBL Value",
            "Molecule CHEMBL ID",
            "Parent Molecule CHEMBL ID",
            "Activity ID",
            "Assay CHEMBL ID",
            "Target CHEMBL ID",
            "Standard Units",
            "Standard Value",
        ]);
        for a in &self.0 {
            table.push_row(vec![
                Cell::text(a.molecule_pref_name.clone()),
                Cell::text(a.pchembl_value.to_string()),
                Cell::text(a.molecule_chembl_id.clone()),
                Cell::opt(a.parent_molecule_chembl_id.as_deref()),
                Cell::text(a.activity_id.to_string()),
                Cell::opt(a.assay_chembl_id.as_deref()),
                Cell::opt(a.target_chembl_id.as_deref()),
                Cell::opt(a.standard_units.as_deref()),
                Cell::opt(a.standard_value),
            ]);
        }
        View::Table(table)
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// ChEMBL client for activity data.
pub struct ChemblClient {
    client: SandboxClient,
    config: ChemblConfig,
}

impl ChemblClient {
    pub fn new(client: SandboxClient, config: ChemblConfig) -> Self {
        Self { client, config }
    }

    pub fn from_context(ctx: &ResolveContext) -> Self {
        Self::new(ctx.client.clone(), ctx.config.chembl.clone())
    }

    /// Query parameters for one batch of upper-cased drug names.
    pub fn activity_query(&self, drugs: &[String]) -> Vec<(&'static str, String)> {
        vec![
            ("molecule_pref_name__in", drugs.join(",")),
            ("pchembl_value__gte", self.config.min_pchembl.to_string()),
            ("assay_type", self.config.assay_type.clone()),
            ("format", "json".to_string()),
            ("limit", self.config.page_limit.to_string()),
        ]
    }

    /// All cytotoxicity activities for one batch, following pagination.
    #[instrument(skip(self, drugs), fields(n = drugs.len()))]
    pub async fn fetch_batch(&self, drugs: &[String]) -> Result<Vec<ActivityRecord>> {
        let url = join_url(&self.config.host, ACTIVITY_PATH);
        let mut page = get_json_query(&self.client, &url, &self.activity_query(drugs)).await?;
        let mut activities = Vec::new();
        let mut pages = 1usize;

        loop {
            let (rows, next) = split_page(page)?;
            activities.extend(DrugCytotoxicityTable::decode(rows)?.0);
            match next {
                Some(path) => {
                    pages += 1;
                    page = get_json(&self.client, &join_url(&self.config.host, &path)).await?;
                }
                None => break,
            }
        }

        debug!(pages, activities = activities.len(), "ChEMBL batch complete");
        Ok(activities)
    }

    /// Cytotoxicity activities for every drug name, sorted by drug name.
    pub async fn cytotoxicity<'a, I>(&self, drugs: I, notifier: &Notifier) -> Result<DrugCytotoxicityTable>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<String> = drugs
            .into_iter()
            .map(|d| d.trim().to_uppercase())
            .filter(|d| !d.is_empty())
            .collect();
        if names.is_empty() {
            return Err(BionodeError::InvalidInput("no drug names to query".to_string()));
        }

        let batches: Vec<&[String]> = names.chunks(self.config.batch_size.max(1)).collect();
        let mut table = DrugCytotoxicityTable::default();
        for (i, batch) in batches.iter().enumerate() {
            notifier.info(format!("Querying CHEMBL activities, batch {}/{}", i + 1, batches.len()));
            table.0.extend(self.fetch_batch(batch).await?);
        }
        table.sort_by_drug();

        info!(drugs = names.len(), activities = table.len(), "ChEMBL cytotoxicity retrieved");
        Ok(table)
    }
}

/// Splits an activity page into its rows and the next-page path.
fn split_page(page: Value) -> Result<(Value, Option<String>)> {
    let Value::Object(mut obj) = page else {
        return Err(BionodeError::MissingField { node: "ChemblActivityPage", field: "activities" });
    };
    let rows = match obj.remove("activities") {
        Some(rows @ Value::Array(_)) => rows,
        _ => return Err(BionodeError::MissingField { node: "ChemblActivityPage", field: "activities" }),
    };
    let next = obj
        .get("page_meta")
        .and_then(|m| m.get("next"))
        .and_then(Value::as_str)
        .map(String::from);
    Ok((rows, next))
}

// ── Process node ──────────────────────────────────────────────────────────────

pub struct QueryDrugCytotoxicityChembl;

#[async_trait]
impl ProcessNode for QueryDrugCytotoxicityChembl {
    const META: NodeMeta = NodeMeta {
        id: "QueryDrugCytotoxocityCHEMBL",
        label: "Query CHEMBL Drug Cytotoxicity",
        description: "Use CHEMBL API Activity Model to obtain drug cytotoxicity data",
        pagerank: Some(1),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("ScoredDrugs", "ScoredDrugs")];

    type Input = ScoredDrugs;
    type Output = DrugCytotoxicityTable;

    #[instrument(skip(self, input, ctx), fields(n = input.0.len()))]
    async fn resolve(&self, input: ScoredDrugs, ctx: &ResolveContext) -> Result<DrugCytotoxicityTable> {
        ChemblClient::from_context(ctx).cytotoxicity(input.terms(), &ctx.notifier).await
    }

    fn story(&self, _input: Option<&ScoredDrugs>) -> Story {
        Story::new(
            "Cytotoxicity results were queried for the drugs from the CHEMBL activity model\\ref{doi:10.1093/nar/gkad1004}, restricted to toxicity assays.",
        )
    }
}
