//! MetGENE REST client and study lookup nodes.
//!
//! MetGENE connects a gene (or gene set) to Metabolomics Workbench studies:
//! gene → KEGG pathways → reactions → metabolites → studies measuring them.
//!
//! Endpoint template:
//! `{base}/studies/species/{species}/GeneIDType/{id_type}/GeneInfoStr/{genes}/anatomy/NA/disease/NA/phenotype/NA/viewType/json`
//!
//! The study table is returned exactly as MetGENE serves it.

use async_trait::async_trait;
use bionode_common::{MetGeneConfig, Result, SandboxClient};
use bionode_core::schema::require_non_empty;
use bionode_core::terms::{GeneSet, MetGeneSummary};
use bionode_core::{Cell, DataNode, Icon, NodeMeta, ProcessNode, ResolveContext, Story, Table, View};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::http::{get_json, join_url};

// ── Data node ─────────────────────────────────────────────────────────────────

/// Rows of the MetGENE studies response. Each row must be a JSON object; its
/// keys are kept as served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetGeneStudyTable(pub Vec<Map<String, Value>>);

impl MetGeneStudyTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names in first-seen order across all rows.
    pub fn columns(&self) -> Vec<&str> {
        let mut cols: Vec<&str> = Vec::new();
        for row in &self.0 {
            for key in row.keys() {
                if !cols.contains(&key.as_str()) {
                    cols.push(key.as_str());
                }
            }
        }
        cols
    }
}

impl DataNode for MetGeneStudyTable {
    const META: NodeMeta = NodeMeta {
        id: "MetGeneStudyTable",
        label: "MetGENE Study Table",
        description: "Metabolomics Workbench studies related to the gene",
        icons: &[Icon::MetGene],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        if self.is_empty() {
            return View::Message("No studies found".to_string());
        }
        let columns = self.columns();
        let mut table = Table::new(columns.iter().copied());
        for row in &self.0 {
            table.push_row(
                columns
                    .iter()
                    .map(|c| match row.get(*c) {
                        Some(Value::String(s)) => Cell::text(s.clone()),
                        Some(Value::Null) | None => Cell::default(),
                        Some(other) => Cell::text(other.to_string()),
                    })
                    .collect(),
            );
        }
        View::Table(table)
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

pub struct MetGeneClient {
    client: SandboxClient,
    config: MetGeneConfig,
}

impl MetGeneClient {
    pub fn new(client: SandboxClient, config: MetGeneConfig) -> Self {
        Self { client, config }
    }

    pub fn from_context(ctx: &ResolveContext) -> Self {
        Self::new(ctx.client.clone(), ctx.config.metgene.clone())
    }

    /// Studies URL for one gene or a comma-joined list of genes.
    pub fn studies_url(&self, gene_ids: &str) -> String {
        join_url(
            &self.config.base_url,
            &format!(
                "studies/species/{}/GeneIDType/{}/GeneInfoStr/{}/anatomy/NA/disease/NA/phenotype/NA/viewType/json",
                self.config.species, self.config.gene_id_type, gene_ids
            ),
        )
    }

    #[instrument(skip(self))]
    pub async fn fetch_studies(&self, gene_ids: &str) -> Result<MetGeneStudyTable> {
        let url = self.studies_url(gene_ids);
        let json = get_json(&self.client, &url).await?;
        let table = MetGeneStudyTable::decode(json)?;
        debug!(rows = table.len(), "MetGENE studies retrieved");
        Ok(table)
    }
}

// ── Process nodes ─────────────────────────────────────────────────────────────

const METGENE_METHODS: &str = "Given a gene, MetGENE provides REST API to extract information regarding all the studies in the MW by obtaining first the pathways where the gene participates and the reactions within the pathways, followed by the metabolites participating in the reaction and the corresponding metabolomics studies in which the metabolite is measured. e.g. for human species (hsa), with anatomy blood and disease diabetes, [\\ref https://bdcw.org/MetGENE/rest/studies/species/hsa/GeneIDType/SYMBOL/GeneInfoStr/HK1/anatomy/blood/disease/diabetes/phenotype/NA/viewType/json], returns the KEGG Compound IDS, KEGG Reaction names as well as KEGG Reaction equations for the corresponding gene in the form of a JSON output.";

const METGENE_INTRODUCTION: &str = "MetGENE is a information retrieval tool that connects a gene or a set of genes to metabolomic studies in the Metabolomic Workbench. It uses a knowledge based approach where the gene is connected to pathways it regulates, followed by reactions within the pathways and metabolites participating in the reactions. The metabolites are connected to studies in Metabolomics Workbench.";

/// Studies for the gene of a MetGENE summary.
pub struct MetGeneStudies;

#[async_trait]
impl ProcessNode for MetGeneStudies {
    const META: NodeMeta = NodeMeta {
        id: "MetGeneStudies",
        label: "MetGENE Studies",
        description: "Extract Metabolomics studies for the gene from MetGENE",
        icons: &[Icon::MetGene],
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("summary", "MetGeneSummary")];

    type Input = MetGeneSummary;
    type Output = MetGeneStudyTable;

    #[instrument(skip(self, ctx), fields(gene = %input.gene))]
    async fn resolve(&self, input: MetGeneSummary, ctx: &ResolveContext) -> Result<MetGeneStudyTable> {
        require_non_empty(Self::META.id, std::slice::from_ref(&input.gene))?;
        MetGeneClient::from_context(ctx).fetch_studies(input.gene.trim()).await
    }

    fn story(&self, input: Option<&MetGeneSummary>) -> Story {
        let gene = input.map(|s| s.gene.as_str()).unwrap_or("The gene");
        Story::new(format!(
            "{} was then searched in the Metabolomics Workbench\\ref{{The Metabolomics Workbench, https://www.metabolomicsworkbench.org/}} to identify relevant studies related to the gene.",
            gene
        ))
        .with_introduction(METGENE_INTRODUCTION)
        .with_methods(METGENE_METHODS)
    }
}

/// Studies for every gene of a set, queried in one call.
pub struct MetGeneStudiesGeneSet;

#[async_trait]
impl ProcessNode for MetGeneStudiesGeneSet {
    const META: NodeMeta = NodeMeta {
        id: "MetGeneStudiesGeneSet",
        label: "MetGENE Studies with gene set",
        description: "Compute the MetGENE studies function for a gene set",
        icons: &[Icon::Gene, Icon::Set, Icon::AdditionalInfo],
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("geneset", "GeneSet")];

    type Input = GeneSet;
    type Output = MetGeneStudyTable;

    #[instrument(skip(self, input, ctx), fields(n = input.set.len()))]
    async fn resolve(&self, input: GeneSet, ctx: &ResolveContext) -> Result<MetGeneStudyTable> {
        require_non_empty(Self::META.id, &input.set)?;
        MetGeneClient::from_context(ctx).fetch_studies(&input.joined()).await
    }

    fn story(&self, _input: Option<&GeneSet>) -> Story {
        Story::new(
            "The gene set was then searched in the Metabolomics Workbench\\ref{The Metabolomics Workbench, https://www.metabolomicsworkbench.org/} to identify relevant studies related to the genes.",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bionode_common::SourcesConfig;
    use serde_json::json;

    fn client() -> MetGeneClient {
        let config = SourcesConfig::default();
        MetGeneClient::new(SandboxClient::from_config(&config).unwrap(), config.metgene)
    }

    #[test]
    fn test_studies_url_single_gene() {
        assert_eq!(
            client().studies_url("HK1"),
            "https://bdcw.org/MetGENE/rest/studies/species/hsa/GeneIDType/SYMBOL_OR_ALIAS/GeneInfoStr/HK1/anatomy/NA/disease/NA/phenotype/NA/viewType/json"
        );
    }

    #[test]
    fn test_studies_url_gene_set() {
        let set = GeneSet::new(["HK1", "PFKL", "ALDOA"]);
        assert!(client().studies_url(&set.joined()).contains("/GeneInfoStr/HK1,PFKL,ALDOA/anatomy/"));
    }

    #[test]
    fn test_table_requires_objects() {
        assert!(MetGeneStudyTable::decode(json!(["ST000001"])).is_err());
        assert!(MetGeneStudyTable::decode(json!({ "rows": [] })).is_err());
    }

    #[test]
    fn test_view_columns_first_seen() {
        let table = MetGeneStudyTable::decode(json!([
            { "KEGG_COMPOUND_ID": "C00031", "STUDY_ID": "ST000001" },
            { "KEGG_COMPOUND_ID": "C00092", "REFMET_NAME": "Glucose 6-phosphate", "STUDY_ID": null }
        ]))
        .unwrap();
        match table.view() {
            View::Table(t) => {
                assert_eq!(t.columns.len(), 3);
                assert_eq!(t.rows[1].len(), 3);
                let study = t.column("STUDY_ID").unwrap();
                assert_eq!(study[0].text, "ST000001");
                assert_eq!(study[1].text, "");
            }
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn test_story_mentions_gene() {
        let story = MetGeneStudies.story(Some(&MetGeneSummary { gene: "HK1".into() }));
        assert!(story.abstract_text.starts_with("HK1 was then searched"));
        assert!(story.methods.is_some());
        assert!(MetGeneStudies.story(None).abstract_text.starts_with("The gene"));
    }
}
