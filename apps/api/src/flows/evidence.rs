//! Evidence analysis for an uploaded FIR, contract or affidavit.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{required, Schema};

const SYSTEM: &str = r#"You are CourtIQ AI Evidence Specialist, an expert in Forensic Linguistics and Judicial Fact-Finding.

ANALYTICAL RIGOR:
1. FACT EXTRACTION: Isolate verifiable assertions of date, time, location, and action.
2. CONTRADICTION DETECTION: Cross-reference statements within the document to find internal inconsistencies (e.g., witness claiming to be in two places simultaneously).
3. TIMELINE MAPPING: Identify 'Temporal Gaps' where actions are unaccounted for.
4. EVIDENTIARY WEIGHT: Assess document strength based on Section 3 of the Indian Evidence Act (or Section 2 of BSA).
5. MISSING LINKS: Highlight missing corroborative documents (e.g., Medical reports for injury claims, bank statements for financial disputes)."#;

const TEMPLATE: &str = r#"Analyze the provided {{documentType}} with clinical precision:

Document Content:
"""{{documentText}}"""

1. Extract all key facts that are admissible.
2. Identify specific contradictions or inconsistencies.
3. Find gaps in the timeline of events.
4. Calculate an overall Evidence Strength Score (0-100).
5. List missing documentation that would strengthen this evidence."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceInput {
    pub document_text: String,
    pub document_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceAnalysis {
    pub extracted_facts: Vec<String>,
    pub contradictions: Vec<String>,
    pub timeline_gaps: Vec<String>,
    pub evidence_strength: f64,
    pub missing_documentation: Vec<String>,
}

pub struct AnalyzeEvidence;

impl Flow for AnalyzeEvidence {
    type Input = EvidenceInput;
    type Output = EvidenceAnalysis;

    const NAME: &'static str = "analyzeEvidence";
    const PATH: &'static str = "analyze-evidence";
    const TAB: Tab = Tab::Evidence;
    const SYSTEM: Option<&'static str> = Some(SYSTEM);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required("documentText", Schema::string().non_empty())
                .describe("Text of the uploaded FIR, contract, or affidavit."),
            required("documentType", Schema::string().non_empty()),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("extractedFacts", Schema::string_list()),
            required("contradictions", Schema::string_list()),
            required("timelineGaps", Schema::string_list()),
            required("evidenceStrength", Schema::score()),
            required("missingDocumentation", Schema::string_list()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::{render_prompt, run_flow, FlowError};
    use crate::llm_client::fake::ScriptedModel;
    use serde_json::json;

    fn input() -> EvidenceInput {
        EvidenceInput {
            document_text: "On 12 March at 9 PM the complainant was at home. At 9 PM he was also seen at the market.".to_string(),
            document_type: "FIR".to_string(),
        }
    }

    #[test]
    fn test_prompt_quotes_document() {
        let prompt = render_prompt::<AnalyzeEvidence>(&input()).unwrap();
        assert!(prompt.starts_with("Analyze the provided FIR with clinical precision"));
        assert!(prompt.contains("\"\"\"On 12 March at 9 PM"));
    }

    #[tokio::test]
    async fn test_analysis_with_strength_in_range() {
        let model = ScriptedModel::new().with_response(json!({
            "extractedFacts": ["Complainant at home at 9 PM"],
            "contradictions": ["Complainant placed at home and market at 9 PM"],
            "timelineGaps": [],
            "evidenceStrength": 42,
            "missingDocumentation": ["CCTV footage from the market"]
        }));
        let output = run_flow::<AnalyzeEvidence>(&model, &input()).await.unwrap();
        assert_eq!(output.contradictions.len(), 1);
        assert!((0.0..=100.0).contains(&output.evidence_strength));
    }

    #[tokio::test]
    async fn test_negative_strength_is_rejected() {
        let model = ScriptedModel::new().with_response(json!({
            "extractedFacts": [],
            "contradictions": [],
            "timelineGaps": [],
            "evidenceStrength": -5,
            "missingDocumentation": []
        }));
        let err = run_flow::<AnalyzeEvidence>(&model, &input()).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_empty_document_is_rejected() {
        let model = ScriptedModel::new();
        let err = run_flow::<AnalyzeEvidence>(
            &model,
            &EvidenceInput {
                document_text: String::new(),
                document_type: "Affidavit".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
    }
}
