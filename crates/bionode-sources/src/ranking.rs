//! Ranked list of drug candidates.
//!
//! Ranking combines the scored drug list, ChEMBL cytotoxicity and blood-brain
//! barrier permeability. The computation itself lives in an external program;
//! this module only hands it the three tables and decodes what comes back.
//!
//! Wire protocol of [`CommandProcess`]: one JSON object
//! `{"entrypoint": ..., "kargs": [...]}` on stdin, progress lines on stderr,
//! one JSON document on stdout.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use bionode_common::{BionodeError, RankingConfig, Result};
use bionode_core::terms::ScoredDrugs;
use bionode_core::{Cell, DataNode, Icon, NodeMeta, Notifier, ProcessNode, ResolveContext, Story, Table, View};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::chembl::DrugCytotoxicityTable;

pub const RANKING_ENTRYPOINT: &str = "components.service.drugtoxicity.produce_ranked_drug_candidates";

/// Lines of stderr kept for the error message of a failed run.
const STDERR_TAIL: usize = 20;

// ── External process ──────────────────────────────────────────────────────────

/// Opaque computation invoked with positional JSON arguments.
#[async_trait]
pub trait ExternalProcess: Send + Sync {
    async fn invoke(&self, entrypoint: &str, kargs: Vec<Value>, notifier: &Notifier) -> Result<Value>;
}

/// Spawns a configured command per invocation.
#[derive(Debug, Clone)]
pub struct CommandProcess {
    program: String,
    args: Vec<String>,
}

impl CommandProcess {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }
}

#[async_trait]
impl ExternalProcess for CommandProcess {
    #[instrument(skip(self, kargs, notifier), fields(program = %self.program))]
    async fn invoke(&self, entrypoint: &str, kargs: Vec<Value>, notifier: &Notifier) -> Result<Value> {
        let request = serde_json::to_vec(&json!({ "entrypoint": entrypoint, "kargs": kargs }))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BionodeError::ExternalProcess(format!("failed to spawn {}: {}", self.program, e)))?;

        let (Some(mut stdin), Some(stdout), Some(stderr)) = (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(BionodeError::ExternalProcess("child stdio not captured".to_string()));
        };

        let write = async move {
            match stdin.write_all(&request).await {
                // The program may exit without draining stdin; its status decides.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };
        let read = async move {
            let mut buf = Vec::new();
            BufReader::new(stdout).read_to_end(&mut buf).await.map(|_| buf)
        };
        let relay = async move {
            let mut lines = BufReader::new(stderr).lines();
            let mut tail: Vec<String> = Vec::new();
            while let Some(line) = lines.next_line().await? {
                notifier.info(line.clone());
                if tail.len() == STDERR_TAIL {
                    tail.remove(0);
                }
                tail.push(line);
            }
            Ok::<_, std::io::Error>(tail)
        };

        let (written, output, tail) = tokio::join!(write, read, relay);
        written?;
        let output = output?;
        let tail = tail?;
        let status = child.wait().await?;

        if !status.success() {
            warn!(%status, "external process failed");
            return Err(BionodeError::ExternalProcess(format!(
                "{} exited with {}: {}",
                entrypoint,
                status,
                tail.join("\n")
            )));
        }

        debug!(bytes = output.len(), "external process finished");
        serde_json::from_slice(&output)
            .map_err(|e| BionodeError::ExternalProcess(format!("{} returned invalid JSON: {}", entrypoint, e)))
    }
}

// ── Data nodes ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermeabilityRow {
    pub drug_name: String,
    /// Predictor outputs, passed through as received
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Blood-brain barrier permeability predictions per drug.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BbbPermeabilityTable(pub Vec<PermeabilityRow>);

impl DataNode for BbbPermeabilityTable {
    const META: NodeMeta = NodeMeta {
        id: "BbbPermeabilityTable",
        label: "Blood Brain Barrier Permeability",
        description: "Predicted blood brain barrier permeability per drug",
        icons: &[Icon::Drug],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let mut columns = vec!["Drug Name".to_string()];
        for row in &self.0 {
            for key in row.properties.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        let mut table = Table::new(columns.clone());
        for row in &self.0 {
            let mut cells = vec![Cell::text(row.drug_name.clone())];
            cells.extend(columns[1..].iter().map(|key| match row.properties.get(key) {
                None | Some(Value::Null) => Cell::default(),
                Some(Value::String(s)) => Cell::text(s.clone()),
                Some(other) => Cell::text(other.to_string()),
            }));
            table.push_row(cells);
        }
        View::Table(table)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedDrugRow {
    pub drug_name: String,
    pub confidence_zscore: String,
    pub cytotoxicity_mean: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedDrugToxicityTable(pub Vec<RankedDrugRow>);

impl DataNode for RankedDrugToxicityTable {
    const META: NodeMeta = NodeMeta {
        id: "[RankedDrugToxicityTable]",
        label: "Ranked Drug Toxicity",
        description: "Drugs Ranked by Cytotoxicity, Blood Brain Barrier and DrugShot",
        icons: &[Icon::Drug],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let mut table = Table::new(["Drug Name", "Confidence ZScore", "Cytotoxicity Mean"]);
        for r in &self.0 {
            table.push_row(vec![
                Cell::text(r.drug_name.clone()),
                Cell::text(r.confidence_zscore.clone()),
                Cell::text(r.cytotoxicity_mean.clone()),
            ]);
        }
        View::Table(table)
    }
}

// ── Process node ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RankedListInputs {
    pub scored_drugs: ScoredDrugs,
    pub cytotoxicity: DrugCytotoxicityTable,
    pub permeability: BbbPermeabilityTable,
}

pub struct RankedListDrugToxicity {
    process: Arc<dyn ExternalProcess>,
}

impl RankedListDrugToxicity {
    pub fn new(process: Arc<dyn ExternalProcess>) -> Self {
        Self { process }
    }

    pub fn from_config(config: &RankingConfig) -> Self {
        Self::new(Arc::new(CommandProcess::from_config(config)))
    }
}

#[async_trait]
impl ProcessNode for RankedListDrugToxicity {
    const META: NodeMeta = NodeMeta {
        id: "[RankedListOfDrugsCandidates]",
        label: "Ranked List of Drug Candidates",
        description: "Rank List of Drug Candidates via Cytotoxicity, Blood Brain Barrier, and Confidence Score",
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[
        ("ScoredDrugs", "ScoredDrugs"),
        ("DrugCytotoxictyChembl", "[DrugCytotoxictyChemblTable]"),
        ("BbbPermeability", "BbbPermeabilityTable"),
    ];

    type Input = RankedListInputs;
    type Output = RankedDrugToxicityTable;

    #[instrument(skip(self, input, ctx), fields(drugs = input.scored_drugs.0.len()))]
    async fn resolve(&self, input: RankedListInputs, ctx: &ResolveContext) -> Result<RankedDrugToxicityTable> {
        let kargs = vec![
            input.scored_drugs.encode()?,
            input.cytotoxicity.encode()?,
            input.permeability.encode()?,
        ];
        let ranked = self.process.invoke(RANKING_ENTRYPOINT, kargs, &ctx.notifier).await?;
        let table = RankedDrugToxicityTable::decode(ranked)?;
        info!(rows = table.0.len(), "drug candidates ranked");
        Ok(table)
    }

    fn story(&self, _input: Option<&RankedListInputs>) -> Story {
        Story::new(
            "Drug candidates were ranked by combining their confidence z-scores with CHEMBL cytotoxicity and predicted blood brain barrier permeability.",
        )
    }
}
