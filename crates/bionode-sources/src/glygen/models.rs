//! GlyGen response schemas and their views.

use bionode_core::{Cell, DataNode, Field, Icon, NodeMeta, Table, View};
use serde::{Deserialize, Serialize};

/// Web portal root used for record links.
pub const GLYGEN_PORTAL: &str = "http://www.glygen.org";
/// Rendered glycan cartoons.
pub const GLYGEN_IMAGE_URL: &str = "https://api.glygen.org/glycan/image";

/// Glycosylation rows shown before the preview is truncated.
const GLYCOSYLATION_PREVIEW_ROWS: usize = 5;

pub fn protein_link(ac: &str) -> String {
    format!("{}/protein/{}", GLYGEN_PORTAL, ac)
}

pub fn glycan_link(ac: &str) -> String {
    format!("{}/glycan/{}", GLYGEN_PORTAL, ac)
}

pub fn glycan_image(ac: &str) -> String {
    format!("{}/{}/", GLYGEN_IMAGE_URL, ac)
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn true_false(flag: bool) -> &'static str {
    if flag { "True" } else { "False" }
}

// ── Protein record ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlycosylationEntry {
    pub site_lbl: String,
    pub site_category: String,
    #[serde(rename = "type")]
    pub glycosylation_type: String,
    /// Empty when the site has no assigned glycan
    pub glytoucan_ac: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhosphorylationEntry {
    pub start_pos: f64,
    pub end_pos: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinase_uniprot_canonical_ac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kinase_gene_name: Option<String>,
    pub residue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Locus {
    pub chromosome: String,
    pub start_pos: f64,
    pub end_pos: f64,
    pub strand: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinGene {
    pub name: String,
    pub locus: Locus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniProt {
    pub uniprot_id: String,
    pub uniprot_canonical_ac: String,
    pub length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    pub common_name: String,
    pub taxid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Glycoprotein {
    pub glycosylation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glycosylation_data: Option<Vec<GlycosylationEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phosphorylation {
    pub phosphorylation: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phosphorylation_data: Option<Vec<PhosphorylationEntry>>,
}

/// Full GlyGen protein detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyGenProteinResponse {
    pub gene: ProteinGene,
    pub uniprot: UniProt,
    pub protein_names: Named,
    pub species: Species,
    pub glycoprotein: Glycoprotein,
    pub phosphorylation: Phosphorylation,
}

impl GlyGenProteinResponse {
    pub fn glycosylation_data(&self) -> &[GlycosylationEntry] {
        self.glycoprotein.glycosylation_data.as_deref().unwrap_or_default()
    }

    pub fn phosphorylation_data(&self) -> &[PhosphorylationEntry] {
        self.phosphorylation.phosphorylation_data.as_deref().unwrap_or_default()
    }

    fn accession_field(&self) -> Field {
        let ac = &self.uniprot.uniprot_canonical_ac;
        Field::new("UniProtKB Accession", Cell::link(ac.clone(), protein_link(ac)))
    }
}

fn glycosylation_table(rows: &[GlycosylationEntry]) -> Table {
    let mut table = Table::new(["Site", "Site Category", "Type", "GlyTouCan Accession"]);
    for row in rows {
        let glycan = if row.glytoucan_ac.is_empty() {
            Cell::default()
        } else {
            Cell::link(row.glytoucan_ac.clone(), glycan_link(&row.glytoucan_ac))
        };
        table.push_row(vec![
            Cell::text(row.site_lbl.clone()),
            Cell::text(row.site_category.clone()),
            Cell::text(row.glycosylation_type.clone()),
            glycan,
        ]);
    }
    table
}

fn phosphorylation_table(rows: &[PhosphorylationEntry]) -> Table {
    let mut table = Table::new(["Start", "End", "Residue", "Kinase Accession", "Kinase Gene", "Comment"]);
    for row in rows {
        let kinase = match &row.kinase_uniprot_canonical_ac {
            Some(ac) => Cell::link(ac.clone(), protein_link(ac)),
            None => Cell::default(),
        };
        table.push_row(vec![
            Cell::text(row.start_pos.to_string()),
            Cell::text(row.end_pos.to_string()),
            Cell::text(row.residue.clone()),
            kinase,
            Cell::opt(row.kinase_gene_name.as_deref()),
            Cell::opt(row.comment.as_deref()),
        ]);
    }
    table
}

impl DataNode for GlyGenProteinResponse {
    const META: NodeMeta = NodeMeta {
        id: "GlyGenProteinResponse",
        label: "GlyGen Protein Products",
        description: "Protein product records in GlyGen",
        icons: &[Icon::GlyGen],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let locus = &self.gene.locus;
        let summary = View::Summary(vec![
            Field::text("Gene Name", self.gene.name.clone()),
            self.accession_field(),
            Field::text(
                "Gene location",
                format!(
                    "Chromosome: {} ({} - {}, '{}' strand)",
                    locus.chromosome, locus.start_pos, locus.end_pos, locus.strand
                ),
            ),
            Field::text("UniProtKB ID", self.uniprot.uniprot_id.clone()),
            Field::text("Protein Length", self.uniprot.length.to_string()),
            Field::text("UniProtKB Protein Name(s)", self.protein_names.name.clone()),
            Field::text(
                "Organism",
                format!("{} ({}; TaxID: {})", self.species.name, self.species.common_name, self.species.taxid),
            ),
            Field::text("Phosphoprotein", true_false(self.phosphorylation.phosphorylation)),
            Field::text("Glycoprotein", true_false(self.glycoprotein.glycosylation)),
        ]);

        let mut views = vec![summary];

        let glyco = self.glycosylation_data();
        if self.glycoprotein.glycosylation && !glyco.is_empty() {
            let shown = &glyco[..glyco.len().min(GLYCOSYLATION_PREVIEW_ROWS)];
            views.push(View::Table(glycosylation_table(shown)));
            if glyco.len() > GLYCOSYLATION_PREVIEW_ROWS {
                views.push(View::Message(format!(
                    "Showing {} of {} glycosylation records",
                    GLYCOSYLATION_PREVIEW_ROWS,
                    glyco.len()
                )));
            }
        }

        let phospho = self.phosphorylation_data();
        if self.phosphorylation.phosphorylation && !phospho.is_empty() {
            views.push(View::Table(phosphorylation_table(phospho)));
        }

        View::Stack(views)
    }
}

/// The protein record, viewed for its glycosylation sites only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlycosylationViewResponse(pub GlyGenProteinResponse);

impl GlycosylationViewResponse {
    /// Sites without an assigned GlyTouCan accession.
    pub fn missing_glytoucan_count(&self) -> usize {
        self.0.glycosylation_data().iter().filter(|e| e.glytoucan_ac.is_empty()).count()
    }
}

impl DataNode for GlycosylationViewResponse {
    const META: NodeMeta = NodeMeta {
        id: "GlycosylationViewResponse",
        label: "Glycosylation Information for Glycoproteins",
        description: "Glycosylation product records in GlyGen",
        icons: &[Icon::GlyGen],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let records = self.0.glycosylation_data();
        if records.is_empty() {
            return View::Stack(vec![
                View::Summary(vec![self.0.accession_field()]),
                View::Message("No Glycosylation Information to Display".to_string()),
            ]);
        }
        View::Stack(vec![
            View::Summary(vec![
                self.0.accession_field(),
                Field::text("Total Records", records.len().to_string()),
                Field::text("Records Without GlyTouCan Accessions", self.missing_glytoucan_count().to_string()),
            ]),
            View::Table(glycosylation_table(records)),
        ])
    }
}

// ── Protein set ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetUniProt {
    pub uniprot_canonical_ac: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetSpecies {
    pub name: String,
    pub taxid: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCounts {
    pub total_n_glycosites: f64,
    pub total_o_glycosites: f64,
    pub reported_phosphosites: f64,
    pub reported_snv: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinSetEntry {
    pub gene: Named,
    pub uniprot: SetUniProt,
    pub protein_names: Named,
    pub species: SetSpecies,
    pub bools: SiteCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyGenProteinSetResponse(pub Vec<ProteinSetEntry>);

impl DataNode for GlyGenProteinSetResponse {
    const META: NodeMeta = NodeMeta {
        id: "GlyGenProteinSetResponse",
        label: "GlyGen Protein Products",
        description: "Protein product records in GlyGen",
        icons: &[Icon::GlyGen],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let mut table = Table::new([
            "Gene name",
            "Uniprot Accession",
            "Protein Name",
            "Species",
            "Glycosylation",
            "Phosphorylation",
            "SNV",
        ]);
        for entry in &self.0 {
            let ac = &entry.uniprot.uniprot_canonical_ac;
            let counts = &entry.bools;
            table.push_row(vec![
                Cell::text(entry.gene.name.clone()),
                Cell::link(ac.clone(), protein_link(ac)),
                Cell::text(entry.protein_names.name.clone()),
                Cell::text(format!("{} (TaxID: {})", entry.species.name, entry.species.taxid)),
                Cell::text(yes_no(counts.total_n_glycosites + counts.total_o_glycosites > 0.0)),
                Cell::text(yes_no(counts.reported_phosphosites > 0.0)),
                Cell::text(yes_no(counts.reported_snv > 0.0)),
            ]);
        }
        View::Table(table)
    }
}

// ── Glycan record ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyTouCan {
    pub glytoucan_ac: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "type")]
    pub glycan_type: Named,
    pub subtype: Named,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub database: String,
}

/// GlyGen glycan detail record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlycanViewResponse {
    pub glytoucan: GlyTouCan,
    pub mass: f64,
    pub mass_pme: f64,
    pub classification: Vec<Classification>,
    pub crossref: Vec<CrossRef>,
}

impl GlycanViewResponse {
    /// `Type / Subtype` pairs, `; `-separated.
    pub fn classification_label(&self) -> String {
        self.classification
            .iter()
            .map(|c| format!("{} / {}", c.glycan_type.name, c.subtype.name))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl DataNode for GlycanViewResponse {
    const META: NodeMeta = NodeMeta {
        id: "GlycanViewResponse",
        label: "Glycan information",
        description: "Glycan information from GlyGen",
        icons: &[Icon::Glycan],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let ac = &self.glytoucan.glytoucan_ac;
        let summary = View::Summary(vec![
            Field::new("GlyTouCan Accession", Cell::link(ac.clone(), glycan_link(ac))),
            Field::text("Monoisotopic Mass", format!("{} Da", self.mass)),
            Field::text("Monoisotopic Mass-pMe (Da)", format!("{} Da", self.mass_pme)),
            Field::text("Glycan Type / Glycan Subtype", self.classification_label()),
            Field::new("Glycan Image", Cell::image("Glycan Image", glycan_image(ac))),
        ]);

        let mut crossrefs = Table::new(["Database", "ID"]);
        for x in &self.crossref {
            let id = match &x.url {
                Some(url) => Cell::link(x.id.clone(), url.clone()),
                None => Cell::text(x.id.clone()),
            };
            crossrefs.push_row(vec![Cell::text(x.database.clone()), id]);
        }

        View::Stack(vec![summary, View::Table(crossrefs)])
    }
}

// ── Glycan set ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlycanSetEntry {
    pub glytoucan: GlyTouCan,
    pub hit_score: f64,
    pub mass: f64,
    pub mass_pme: f64,
    pub sugar_count: f64,
    pub glycoprotein_count: f64,
    pub associated_enzymes: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlyGenGlycanSetResponse(pub Vec<GlycanSetEntry>);

impl DataNode for GlyGenGlycanSetResponse {
    const META: NodeMeta = NodeMeta {
        id: "GlyGenGlycanSetResponse",
        label: "GlyGen Glycans",
        description: "Glycan records in GlyGen",
        icons: &[Icon::GlyGen],
        ..NodeMeta::DATA
    };

    fn view(&self) -> View {
        let mut table = Table::new([
            "Glycan ID",
            "Glycan Image",
            "Hit Score",
            "Monoisotopic Mass",
            "Monoisotopic Mass-pMe (Da)",
            "No of Sugars",
            "No of Glycoproteins",
            "No of Enzymes",
        ]);
        for entry in &self.0 {
            let ac = &entry.glytoucan.glytoucan_ac;
            table.push_row(vec![
                Cell::link(ac.clone(), glycan_link(ac)),
                Cell::image("Glycan Image", glycan_image(ac)),
                Cell::text(entry.hit_score.to_string()),
                Cell::text(entry.mass.to_string()),
                Cell::text(entry.mass_pme.to_string()),
                Cell::text(entry.sugar_count.to_string()),
                Cell::text(entry.glycoprotein_count.to_string()),
                Cell::text(entry.associated_enzymes.to_string()),
            ]);
        }
        View::Table(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bionode_common::BionodeError;
    use serde_json::{json, Value};

    fn protein_json(glyco_rows: usize) -> Value {
        let rows: Vec<Value> = (0..glyco_rows)
            .map(|i| json!({
                "site_lbl": format!("N{}", 100 + i),
                "site_category": "reported",
                "type": "N-linked",
                "glytoucan_ac": if i % 2 == 0 { "G17689DH" } else { "" }
            }))
            .collect();
        json!({
            "gene": { "name": "TP53", "locus": { "chromosome": "17", "start_pos": 7661779, "end_pos": 7687538, "strand": "-" } },
            "uniprot": { "uniprot_id": "P53_HUMAN", "uniprot_canonical_ac": "P04637-1", "length": 393 },
            "protein_names": { "name": "Cellular tumor antigen p53" },
            "species": { "name": "Homo sapiens", "common_name": "Human", "taxid": "9606" },
            "glycoprotein": { "glycosylation": glyco_rows > 0, "glycosylation_data": rows },
            "phosphorylation": { "phosphorylation": false },
            "sequence": { "length": 393 }
        })
    }

    #[test]
    fn test_protein_decodes_and_drops_unknown() {
        let p = GlyGenProteinResponse::decode(protein_json(2)).unwrap();
        assert_eq!(p.gene.name, "TP53");
        assert_eq!(p.glycosylation_data().len(), 2);
        assert!(p.phosphorylation_data().is_empty());
        assert!(p.encode().unwrap().get("sequence").is_none());
    }

    #[test]
    fn test_protein_view_previews_five_sites() {
        let p = GlyGenProteinResponse::decode(protein_json(7)).unwrap();
        let View::Stack(views) = p.view() else { panic!("expected stack") };
        let View::Table(sites) = &views[1] else { panic!("expected sites table") };
        assert_eq!(sites.rows.len(), 5);
        assert!(matches!(&views[2], View::Message(m) if m.contains("5 of 7")));
        assert!(p.view().render_text().contains("Chromosome: 17 (7661779 - 7687538, '-' strand)"));
    }

    #[test]
    fn test_glycosylation_view_counts_missing_accessions() {
        let v = GlycosylationViewResponse(GlyGenProteinResponse::decode(protein_json(5)).unwrap());
        assert_eq!(v.missing_glytoucan_count(), 2);
        let text = v.view().render_text();
        assert!(text.contains("Total Records: 5"));
        assert!(text.contains("Records Without GlyTouCan Accessions: 2"));
    }

    #[test]
    fn test_glycosylation_view_empty() {
        let v = GlycosylationViewResponse(GlyGenProteinResponse::decode(protein_json(0)).unwrap());
        assert!(v.view().render_text().contains("No Glycosylation Information to Display"));
    }

    #[test]
    fn test_glycan_missing_mass_rejected() {
        let err = GlycanViewResponse::decode(json!({
            "glytoucan": { "glytoucan_ac": "G17689DH" },
            "mass_pme": 1032.5,
            "classification": [],
            "crossref": []
        }))
        .unwrap_err();
        assert!(matches!(err, BionodeError::SchemaMismatch { node: "GlycanViewResponse", .. }));
    }

    #[test]
    fn test_glycan_view() {
        let g = GlycanViewResponse::decode(json!({
            "glytoucan": { "glytoucan_ac": "G17689DH" },
            "mass": 910.33,
            "mass_pme": 1032.5,
            "classification": [{ "type": { "name": "N-glycan" }, "subtype": { "name": "High mannose" } }],
            "crossref": [{ "id": "1234", "database": "PubChem", "url": "https://pubchem.ncbi.nlm.nih.gov/1234" }]
        }))
        .unwrap();
        assert_eq!(g.classification_label(), "N-glycan / High mannose");
        let text = g.view().render_text();
        assert!(text.contains("Monoisotopic Mass: 910.33 Da"));
        assert!(text.contains("PubChem | 1234"));
    }

    #[test]
    fn test_protein_set_view_flags() {
        let set = GlyGenProteinSetResponse::decode(json!([{
            "gene": { "name": "TP53" },
            "uniprot": { "uniprot_canonical_ac": "P04637-1" },
            "protein_names": { "name": "Cellular tumor antigen p53" },
            "species": { "name": "Homo sapiens", "taxid": "9606" },
            "bools": { "total_n_glycosites": 0, "total_o_glycosites": 1, "reported_phosphosites": 0, "reported_snv": 3 }
        }]))
        .unwrap();
        let View::Table(t) = set.view() else { panic!("expected table") };
        assert_eq!(t.rows[0][3].text, "Homo sapiens (TaxID: 9606)");
        assert_eq!(t.rows[0][4].text, "Yes");
        assert_eq!(t.rows[0][5].text, "No");
        assert_eq!(t.rows[0][6].text, "Yes");
        assert_eq!(t.rows[0][1].link.as_deref(), Some("http://www.glygen.org/protein/P04637-1"));
    }

    #[test]
    fn test_glycan_set_image_url() {
        let set = GlyGenGlycanSetResponse::decode(json!([{
            "glytoucan": { "glytoucan_ac": "G00912UN" },
            "hit_score": 1.2, "mass": 1000.0, "mass_pme": 1100.0,
            "sugar_count": 5, "glycoprotein_count": 2, "associated_enzymes": 0
        }]))
        .unwrap();
        let View::Table(t) = set.view() else { panic!("expected table") };
        assert_eq!(t.columns.len(), t.rows[0].len());
        assert_eq!(t.rows[0][1].image.as_deref(), Some("https://api.glygen.org/glycan/image/G00912UN/"));
    }
}
