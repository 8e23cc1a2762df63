//! Node declaration records and the read-only node catalogue.

use std::collections::HashMap;

use serde::Serialize;

use crate::node::{DataNode, ProcessNode};

/// Icons attached to nodes. Asset paths are fixed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    GlyGen,
    MetGene,
    Gene,
    Protein,
    Glycan,
    Set,
    AdditionalInfo,
    Drug,
}

impl Icon {
    pub fn asset_path(&self) -> &'static str {
        match self {
            Icon::GlyGen => "/icons/glygen.png",
            Icon::MetGene => "/icons/metgene.png",
            Icon::Gene => "/icons/gene.svg",
            Icon::Protein => "/icons/protein.svg",
            Icon::Glycan => "/icons/glycan.svg",
            Icon::Set => "/icons/set.svg",
            Icon::AdditionalInfo => "/icons/additional_info.svg",
            Icon::Drug => "/icons/drug.svg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Data,
    Process,
}

/// Declaration record of a node. Built as a `const` per node type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeMeta {
    /// Unique id within the catalogue
    pub id: &'static str,
    pub kind: NodeKind,
    pub label: &'static str,
    pub description: &'static str,
    pub icons: &'static [Icon],
    /// Ordering hint for suggestion lists; higher sorts first
    pub pagerank: Option<u32>,
    pub color: Option<&'static str>,
}

impl NodeMeta {
    pub const DATA: NodeMeta = NodeMeta {
        id: "",
        kind: NodeKind::Data,
        label: "",
        description: "",
        icons: &[],
        pagerank: None,
        color: None,
    };

    pub const PROCESS: NodeMeta = NodeMeta { kind: NodeKind::Process, ..NodeMeta::DATA };
}

/// Catalogue entry: the node's meta plus its typed edges.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub meta: NodeMeta,
    /// Argument name -> data node id
    pub inputs: Vec<(&'static str, &'static str)>,
    /// Output data node id; `None` for data nodes
    pub output: Option<&'static str>,
}

impl CatalogEntry {
    pub fn data<D: DataNode>() -> Self {
        Self { meta: D::META, inputs: Vec::new(), output: None }
    }

    pub fn process<P: ProcessNode>() -> Self {
        Self {
            meta: P::META,
            inputs: P::INPUTS.to_vec(),
            output: Some(<P::Output as DataNode>::META.id),
        }
    }
}

/// Read-only index of every declared node.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<&'static str, usize>,
}

impl Catalog {
    /// Builds the catalogue. Later duplicates of an id are ignored with a warning.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut kept = Vec::with_capacity(entries.len());
        let mut by_id = HashMap::new();
        for entry in entries {
            if by_id.contains_key(entry.meta.id) {
                tracing::warn!(id = entry.meta.id, "duplicate node id ignored");
                continue;
            }
            by_id.insert(entry.meta.id, kept.len());
            kept.push(entry);
        }
        Self { entries: kept, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Process nodes that accept `data_id` as one of their inputs, highest
    /// pagerank first.
    pub fn consumers_of(&self, data_id: &str) -> Vec<&CatalogEntry> {
        let mut found: Vec<&CatalogEntry> = self
            .entries
            .iter()
            .filter(|e| e.inputs.iter().any(|(_, ty)| *ty == data_id))
            .collect();
        found.sort_by(|a, b| b.meta.pagerank.unwrap_or(0).cmp(&a.meta.pagerank.unwrap_or(0)));
        found
    }

    /// Process nodes producing `data_id`.
    pub fn producers_of(&self, data_id: &str) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.output == Some(data_id))
            .collect()
    }
}
