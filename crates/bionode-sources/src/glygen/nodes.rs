//! GlyGen process nodes.

use async_trait::async_trait;
use bionode_common::Result;
use bionode_core::schema::require_non_empty;
use bionode_core::terms::{GeneInfo, GeneTerm, GlycanSet, GlycanTerm, ProteinSet, ProteinTerm};
use bionode_core::{Icon, NodeMeta, ProcessNode, ResolveContext, Story};
use tracing::{info, instrument};

use super::models::{
    GlyGenGlycanSetResponse, GlyGenProteinResponse, GlyGenProteinSetResponse, GlycanViewResponse,
    GlycosylationViewResponse,
};
use super::GlyGenClient;

const GLYGEN_REF: &str = "The GlyGen database [\\ref{doi:10.1093/glycob/cwz080}]";

fn single_term(node: &str, term: &str) -> Result<()> {
    require_non_empty(node, &[term.to_string()]).map(|_| ())
}

/// Protein products for one UniProtKB accession.
pub struct GlyGenProtein;

#[async_trait]
impl ProcessNode for GlyGenProtein {
    const META: NodeMeta = NodeMeta {
        id: "GGP",
        label: "Search GlyGen by Protein Name for Protein Products",
        description: "Find protein product records in GlyGen for the gene",
        icons: &[Icon::GlyGen],
        pagerank: Some(2),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("protein_uniprot_canonical_ac", "ProteinTerm")];

    type Input = ProteinTerm;
    type Output = GlyGenProteinResponse;

    #[instrument(skip(self, ctx))]
    async fn resolve(&self, input: ProteinTerm, ctx: &ResolveContext) -> Result<GlyGenProteinResponse> {
        single_term(Self::META.id, input.as_str())?;
        GlyGenClient::from_context(ctx).protein_detail(input.as_str().trim()).await
    }

    fn story(&self, input: Option<&ProteinTerm>) -> Story {
        let protein = input.map(|p| p.as_str()).unwrap_or("the protein");
        Story::new(format!(
            "Next, {} was searched to identify the protein product record for {}.",
            GLYGEN_REF, protein
        ))
    }
}

/// Protein products for a set of UniProtKB accessions.
pub struct GlyGenProteinSet;

#[async_trait]
impl ProcessNode for GlyGenProteinSet {
    const META: NodeMeta = NodeMeta {
        id: "GGPS",
        label: "Search GlyGen by Protein Name for Protein Products",
        description: "Find protein product records in GlyGen.",
        icons: &[Icon::GlyGen],
        pagerank: Some(2),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("protein_uniprot_canonical_acs", "ProteinSet")];

    type Input = ProteinSet;
    type Output = GlyGenProteinSetResponse;

    #[instrument(skip(self, input, ctx), fields(n = input.set.len()))]
    async fn resolve(&self, input: ProteinSet, ctx: &ResolveContext) -> Result<GlyGenProteinSetResponse> {
        require_non_empty(Self::META.id, &input.set)?;
        info!(proteins = %input.joined(), "GlyGen protein set lookup");
        GlyGenClient::from_context(ctx).protein_set(&input.joined()).await
    }

    fn story(&self, _input: Option<&ProteinSet>) -> Story {
        Story::new(format!(
            "Next, {} was searched to identify the protein product records for the protein set.",
            GLYGEN_REF
        ))
    }
}

/// Protein products for a resolved gene record.
pub struct GlyGenProteinProduct;

#[async_trait]
impl ProcessNode for GlyGenProteinProduct {
    const META: NodeMeta = NodeMeta {
        id: "GGPP",
        label: "Search GlyGen by Gene Name for Protein Products",
        description: "Find protein product records in GlyGen for the gene",
        icons: &[Icon::GlyGen],
        pagerank: Some(2),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("gene", "GeneInfo")];

    type Input = GeneInfo;
    type Output = GlyGenProteinResponse;

    #[instrument(skip(self, input, ctx), fields(gene = %input.symbol))]
    async fn resolve(&self, input: GeneInfo, ctx: &ResolveContext) -> Result<GlyGenProteinResponse> {
        single_term(Self::META.id, &input.symbol)?;
        GlyGenClient::from_context(ctx).protein_product(input.symbol.trim()).await
    }

    fn story(&self, input: Option<&GeneInfo>) -> Story {
        let gene = input.map(|g| g.symbol.as_str()).unwrap_or("the gene");
        Story::new(format!(
            "Next, {} was searched to identify a relevant set of proteins that originate from {}.",
            GLYGEN_REF, gene
        ))
    }
}

/// Protein products for a gene term; the term is taken as the gene symbol.
pub struct GlyGenProteinInformation;

#[async_trait]
impl ProcessNode for GlyGenProteinInformation {
    const META: NodeMeta = NodeMeta {
        id: "GlyGenProteinInformation",
        label: "Search GlyGen for Protein Products",
        description: "Find protein product records in GlyGen for the gene",
        icons: &[Icon::GlyGen],
        pagerank: Some(2),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("gene", "GeneTerm")];

    type Input = GeneTerm;
    type Output = GlyGenProteinResponse;

    #[instrument(skip(self, ctx))]
    async fn resolve(&self, input: GeneTerm, ctx: &ResolveContext) -> Result<GlyGenProteinResponse> {
        GlyGenProteinProduct.resolve(GeneInfo::from(&input), ctx).await
    }

    fn story(&self, input: Option<&GeneTerm>) -> Story {
        let gene = input.map(|g| g.as_str()).unwrap_or("the gene");
        Story::new(format!(
            "{} was searched to identify a relevant set of protein products that originate from {}.",
            GLYGEN_REF, gene
        ))
    }
}

/// Re-labels a protein record so its glycosylation sites get their own view.
pub struct GlycosylationInformation;

#[async_trait]
impl ProcessNode for GlycosylationInformation {
    const META: NodeMeta = NodeMeta {
        id: "GlycosylationInformation",
        label: "Get Glycosylation Data from GlyGen Protein Products",
        description: "Glycosylation information for Glycoproteins",
        icons: &[Icon::GlyGen],
        pagerank: Some(2),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("glygenProteinResponse", "GlyGenProteinResponse")];

    type Input = GlyGenProteinResponse;
    type Output = GlycosylationViewResponse;

    async fn resolve(&self, input: GlyGenProteinResponse, _ctx: &ResolveContext) -> Result<GlycosylationViewResponse> {
        Ok(GlycosylationViewResponse(input))
    }

    fn story(&self, _input: Option<&GlyGenProteinResponse>) -> Story {
        Story::new(
            "The glycosylation data was extracted from the GlyGen protein response and prepared for presentation in the view metanode.",
        )
    }
}

/// Glycan detail for one GlyTouCan accession.
pub struct GlycanInformation;

#[async_trait]
impl ProcessNode for GlycanInformation {
    const META: NodeMeta = NodeMeta {
        id: "GlycanInformation",
        label: "Search GlyGen by GlyTouCan Accession",
        description: "Search for Glycan information",
        pagerank: Some(2),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("glycan", "GlycanTerm")];

    type Input = GlycanTerm;
    type Output = GlycanViewResponse;

    #[instrument(skip(self, ctx))]
    async fn resolve(&self, input: GlycanTerm, ctx: &ResolveContext) -> Result<GlycanViewResponse> {
        single_term(Self::META.id, input.as_str())?;
        GlyGenClient::from_context(ctx).glycan_detail(input.as_str().trim()).await
    }

    fn story(&self, input: Option<&GlycanTerm>) -> Story {
        let glycan = input.map(|g| g.as_str()).unwrap_or("the glycan");
        Story::new(format!("{} was searched to identify information about {}.", GLYGEN_REF, glycan))
    }
}

/// Glycan records for a set of GlyTouCan accessions.
pub struct GlyGenGlycanSet;

#[async_trait]
impl ProcessNode for GlyGenGlycanSet {
    const META: NodeMeta = NodeMeta {
        id: "GGGS",
        label: "Search GlyGen by GlyTouCan Accession for Glycans",
        description: "Find glycan records in GlyGen.",
        icons: &[Icon::GlyGen],
        pagerank: Some(2),
        ..NodeMeta::PROCESS
    };
    const INPUTS: &'static [(&'static str, &'static str)] = &[("glycan_glytoucan_acc_set", "GlycanSet")];

    type Input = GlycanSet;
    type Output = GlyGenGlycanSetResponse;

    #[instrument(skip(self, input, ctx), fields(n = input.set.len()))]
    async fn resolve(&self, input: GlycanSet, ctx: &ResolveContext) -> Result<GlyGenGlycanSetResponse> {
        require_non_empty(Self::META.id, &input.set)?;
        info!(glycans = %input.joined(), "GlyGen glycan set lookup");
        GlyGenClient::from_context(ctx).glycan_set(&input.joined()).await
    }

    fn story(&self, _input: Option<&GlycanSet>) -> Story {
        Story::new(format!(
            "Next, {} was searched to identify the glycan records for the glycan set.",
            GLYGEN_REF
        ))
    }
}
