//! Case-law research: issues, precedents, and arguments for both sides.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{required, Schema};

const SYSTEM: &str = r#"You are CourtIQ Research Head, an expert in Constitutional and Statutory interpretation.

RESEARCH PROTOCOLS:
1. RATIO DECIDENDI: Extract the core legal principle established by the court.
2. OBITER DICTA: Identify persuasive but non-binding remarks that could support creative arguments.
3. DOCTRINAL ANALYSIS: Identify if the case touches upon 'Basic Structure', 'Doctrine of Pith and Substance', 'Doctrine of Colorable Legislation', etc.
4. ARGUMENT CONSTRUCTION: Build arguments that are not just factual but grounded in 'Procedural Due Process' and 'Substantive Justice'.
5. CITATION VERIFICATION: Flag any citations that seem outdated or potentially overruled by larger benches."#;

const TEMPLATE: &str = r#"Perform a deep legal analysis of the provided Indian case summary. Identify core issues, relevant precedents, and structured arguments for both sides.

Case Law Summary:
"""{{caseSummary}}""""#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchInput {
    pub case_summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Precedent {
    pub name: String,
    pub citation: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentBuilder {
    pub plaintiff: Vec<String>,
    pub defendant: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchOutput {
    pub legal_issues: Vec<String>,
    pub similar_precedents: Vec<Precedent>,
    pub argument_builder: ArgumentBuilder,
    pub citation_notes: Vec<String>,
    pub research_gaps: Vec<String>,
}

pub struct ResearchCaseLaw;

impl Flow for ResearchCaseLaw {
    type Input = ResearchInput;
    type Output = ResearchOutput;

    const NAME: &'static str = "researchCaseLaw";
    const PATH: &'static str = "research-case-law";
    const TAB: Tab = Tab::Research;
    const SYSTEM: Option<&'static str> = Some(SYSTEM);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([required("caseSummary", Schema::string().non_empty())
            .describe("The full text summary of a court judgment.")])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("legalIssues", Schema::string_list()),
            required(
                "similarPrecedents",
                Schema::array(Schema::object([
                    required("name", Schema::string()),
                    required("citation", Schema::string()),
                    required("summary", Schema::string()),
                ])),
            ),
            required(
                "argumentBuilder",
                Schema::object([
                    required("plaintiff", Schema::string_list()),
                    required("defendant", Schema::string_list()),
                ]),
            ),
            required("citationNotes", Schema::string_list()),
            required("researchGaps", Schema::string_list()),
        ])
    }
}
