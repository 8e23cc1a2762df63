//! Input terms and sets: the identifiers a lookup starts from.

use serde::{Deserialize, Serialize};

use crate::meta::{Icon, NodeMeta};
use crate::node::DataNode;
use crate::view::{Cell, Field, Table, View};

// ── Single terms ──────────────────────────────────────────────────────────────

macro_rules! term_node {
    ($name:ident, $id:literal, $label:literal, $icon:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(term: impl Into<String>) -> Self {
                Self(term.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl DataNode for $name {
            const META: NodeMeta = NodeMeta {
                id: $id,
                label: $label,
                description: concat!("A ", $label),
                icons: &[$icon],
                ..NodeMeta::DATA
            };

            fn view(&self) -> View {
                View::Summary(vec![Field::text($label, self.0.clone())])
            }
        }
    };
}

term_node!(GeneTerm, "GeneTerm", "Gene Term", Icon::Gene);
term_node!(ProteinTerm, "ProteinTerm", "Protein Term", Icon::Protein);
term_node!(GlycanTerm, "GlycanTerm", "Glycan Term", Icon::Glycan);

// ── Sets ──────────────────────────────────────────────────────────────────────

macro_rules! set_node {
    ($name:ident, $id:literal, $label:literal, $column:literal, $icon:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            pub set: Vec<String>,
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub description: Option<String>,
        }

        impl $name {
            pub fn new<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
                Self { set: ids.into_iter().map(Into::into).collect(), description: None }
            }

            /// Identifiers joined by `,` in input order.
            pub fn joined(&self) -> String {
                self.set.join(",")
            }
        }

        impl DataNode for $name {
            const META: NodeMeta = NodeMeta {
                id: $id,
                label: $label,
                description: concat!("A ", $label),
                icons: &[$icon, Icon::Set],
                ..NodeMeta::DATA
            };

            fn view(&self) -> View {
                let mut table = Table::new([$column]);
                for id in &self.set {
                    table.push_row(vec![Cell::text(id.clone())]);
                }
                View::Table(table)
            }
        }
    };
}

set_node!(GeneSet, "GeneSet", "Gene Set", "Gene", Icon::Gene);
set_node!(ProteinSet, "ProteinSet", "Protein Set", "Protein", Icon::Protein);
set_node!(GlycanSet, "GlycanSet", "Glycan Set", "Glycan", Icon::Glycan);

// ── Resolved gene records ─────────────────────────────────────────────────────

/// Gene record as produced by an upstream gene-info node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneInfo {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl GeneInfo {
    pub fn from_symbol(symbol: impl Into<String>) -> Self {
        Self { symbol: symbol.into(), name: None, summary: None }
    }
}

impl From<&GeneTerm> for GeneInfo {
    fn from(term: &GeneTerm) -> Self {
        Self::from_symbol(term.as_str().trim())
    }
}

impl DataNode for GeneInfo {
    const META: NodeMeta = NodeMeta {
        id: "GeneInfo",
        label: "Gene Information",
        description: "A gene record with its approved symbol",
        icons: &[Icon::Gene],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let mut fields = vec![Field::text("Symbol", self.symbol.clone())];
        if let Some(name) = &self.name {
            fields.push(Field::text("Name", name.clone()));
        }
        if let Some(summary) = &self.summary {
            fields.push(Field::text("Summary", summary.clone()));
        }
        View::Summary(fields)
    }
}

/// MetGENE gene summary; only the queried gene is consumed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetGeneSummary {
    pub gene: String,
}

impl DataNode for MetGeneSummary {
    const META: NodeMeta = NodeMeta {
        id: "MetGeneSummary",
        label: "MetGENE Summary",
        description: "MetGENE gene summary",
        icons: &[Icon::MetGene],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        View::Summary(vec![Field::text("Gene", self.gene.clone())])
    }
}

// ── Scored drugs ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDrug {
    pub term: String,
    pub zscore: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoredDrugs(pub Vec<ScoredDrug>);

impl ScoredDrugs {
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|d| d.term.as_str())
    }
}

impl DataNode for ScoredDrugs {
    const META: NodeMeta = NodeMeta {
        id: "ScoredDrugs",
        label: "Scored Drugs",
        description: "Drugs with a significance z-score",
        icons: &[Icon::Drug],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let mut table = Table::new(["Drug", "ZScore"]);
        for d in &self.0 {
            table.push_row(vec![Cell::text(d.term.clone()), Cell::text(format!("{:.3}", d.zscore))]);
        }
        View::Table(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_joined_in_input_order() {
        let set = GeneSet::new(["TP53", "BRCA1", "HK1"]);
        assert_eq!(set.joined(), "TP53,BRCA1,HK1");
    }

    #[test]
    fn test_set_decodes_host_shape() {
        let set = GlycanSet::decode(serde_json::json!({ "set": ["G17689DH", "G00912UN"] })).unwrap();
        assert_eq!(set.set.len(), 2);
        assert!(set.description.is_none());
    }

    #[test]
    fn test_term_is_transparent_string() {
        let term = GeneTerm::decode(serde_json::json!("HK1")).unwrap();
        assert_eq!(term.as_str(), "HK1");
        assert_eq!(GeneInfo::from(&GeneTerm::new(" HK1 ")).symbol, "HK1");
    }

    #[test]
    fn test_scored_drugs_require_zscore() {
        assert!(ScoredDrugs::decode(serde_json::json!([{ "term": "imatinib" }])).is_err());
        let drugs = ScoredDrugs::decode(serde_json::json!([{ "term": "imatinib", "zscore": 2.5 }])).unwrap();
        assert_eq!(drugs.terms().collect::<Vec<_>>(), vec!["imatinib"]);
    }
}
