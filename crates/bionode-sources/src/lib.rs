//! MetGENE, GlyGen and ChEMBL lookup nodes.
//!
//! Each process node wraps one remote lookup: it builds a request from its
//! typed inputs, dispatches it through the sandboxed client, and validates the
//! response against its output data node. [`catalog`] lists every node so a
//! host can discover which processes accept a given data type.

pub mod chembl;
pub mod filter;
pub mod glygen;
pub mod http;
pub mod metgene;
pub mod ranking;

use bionode_core::terms::{
    GeneInfo, GeneSet, GeneTerm, GlycanSet, GlycanTerm, MetGeneSummary, ProteinSet, ProteinTerm, ScoredDrugs,
};
use bionode_core::{Catalog, CatalogEntry};
use lazy_static::lazy_static;

pub use chembl::{ChemblClient, DrugCytotoxicityTable, QueryDrugCytotoxicityChembl};
pub use glygen::models::{
    GlyGenGlycanSetResponse, GlyGenProteinResponse, GlyGenProteinSetResponse, GlycanViewResponse,
    GlycosylationViewResponse,
};
pub use glygen::nodes::{
    GlyGenGlycanSet, GlyGenProtein, GlyGenProteinInformation, GlyGenProteinProduct, GlyGenProteinSet,
    GlycanInformation, GlycosylationInformation,
};
pub use glygen::GlyGenClient;
pub use metgene::{MetGeneClient, MetGeneStudies, MetGeneStudiesGeneSet, MetGeneStudyTable};
pub use ranking::{
    BbbPermeabilityTable, CommandProcess, ExternalProcess, RankedDrugToxicityTable, RankedListDrugToxicity,
};

lazy_static! {
    static ref CATALOG: Catalog = Catalog::new(vec![
        // inputs
        CatalogEntry::data::<GeneTerm>(),
        CatalogEntry::data::<GeneInfo>(),
        CatalogEntry::data::<GeneSet>(),
        CatalogEntry::data::<MetGeneSummary>(),
        CatalogEntry::data::<ProteinTerm>(),
        CatalogEntry::data::<ProteinSet>(),
        CatalogEntry::data::<GlycanTerm>(),
        CatalogEntry::data::<GlycanSet>(),
        CatalogEntry::data::<ScoredDrugs>(),
        CatalogEntry::data::<BbbPermeabilityTable>(),
        // outputs
        CatalogEntry::data::<MetGeneStudyTable>(),
        CatalogEntry::data::<GlyGenProteinResponse>(),
        CatalogEntry::data::<GlyGenProteinSetResponse>(),
        CatalogEntry::data::<GlycosylationViewResponse>(),
        CatalogEntry::data::<GlycanViewResponse>(),
        CatalogEntry::data::<GlyGenGlycanSetResponse>(),
        CatalogEntry::data::<DrugCytotoxicityTable>(),
        CatalogEntry::data::<RankedDrugToxicityTable>(),
        // processes
        CatalogEntry::process::<MetGeneStudies>(),
        CatalogEntry::process::<MetGeneStudiesGeneSet>(),
        CatalogEntry::process::<GlyGenProtein>(),
        CatalogEntry::process::<GlyGenProteinSet>(),
        CatalogEntry::process::<GlyGenProteinProduct>(),
        CatalogEntry::process::<GlyGenProteinInformation>(),
        CatalogEntry::process::<GlycosylationInformation>(),
        CatalogEntry::process::<GlycanInformation>(),
        CatalogEntry::process::<GlyGenGlycanSet>(),
        CatalogEntry::process::<QueryDrugCytotoxicityChembl>(),
        CatalogEntry::process::<RankedListDrugToxicity>(),
    ]);
}

/// Every node declared by this crate.
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use bionode_core::NodeKind;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_ids_unique() {
        let ids: HashSet<&str> = catalog().entries().iter().map(|e| e.meta.id).collect();
        assert_eq!(ids.len(), catalog().len());
        assert_eq!(catalog().len(), 29);
    }

    #[test]
    fn test_every_edge_names_a_known_data_node() {
        for entry in catalog().entries() {
            for (_, ty) in &entry.inputs {
                let input = catalog().get(ty).unwrap_or_else(|| panic!("{} input {} undeclared", entry.meta.id, ty));
                assert_eq!(input.meta.kind, NodeKind::Data);
            }
            if let Some(out) = entry.output {
                assert!(catalog().get(out).is_some(), "{} output {} undeclared", entry.meta.id, out);
            }
        }
    }

    #[test]
    fn test_protein_response_consumers() {
        let ids: Vec<&str> = catalog()
            .consumers_of("GlyGenProteinResponse")
            .iter()
            .map(|e| e.meta.id)
            .collect();
        assert_eq!(ids, vec!["GlycosylationInformation"]);
        assert_eq!(catalog().producers_of("GlyGenProteinResponse").len(), 3);
    }
}
