//! Case outcome prediction from case parameters and evidence strength sliders.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{required, Schema};

const SYSTEM: &str = r#"You are the CourtIQ Predictive Intelligence Engine, specialized in Indian Jurisprudence.

ANALYTICAL FRAMEWORK:
1. EVIDENTIARY WEIGHTAGE: In Civil cases, prioritize 'Preponderance of Probabilities'. In Criminal cases, use the 'Beyond Reasonable Doubt' standard.
2. SECTIONAL ANALYSIS: Correlate facts with specific provisions of the IPC/BNS or relevant Special Acts (NDPS, PMLA, etc.).
3. BURDEN OF PROOF: Identify which party carries the burden as per Section 101-106 of the Indian Evidence Act (or corresponding BSA sections).
4. PRECEDENTIAL MATCHING: Scan historical data for Supreme Court cases with similar 'Facts-in-issue'.

DETERMINATION GUIDELINES:
- If Documentary evidence is high (>80) but Witness is low (<30), civil success probability is high, but criminal conviction risk is higher.
- If Opponent strength is high (>70), highlight specific 'Rebuttal Strategies'.
- CITATIONS: You MUST provide real or highly probable historical citations (e.g., 'AIR 2023 SC 456') that anchor your logic."#;

const TEMPLATE: &str = r#"Analyze the following Indian legal case parameters:

Case Type: {{caseType}}
Court Level: {{courtLevel}}
Jurisdiction: {{jurisdiction}}
Facts:
{{facts}}

Evidence Strengths (0-100 scale):
- Documentary: {{evidenceStrengthSliders.documentary}}
- Witness: {{evidenceStrengthSliders.witness}}
- Legal Precedents: {{evidenceStrengthSliders.precedents}}
- Opponent: {{evidenceStrengthSliders.opponent}}

Provide a detailed prediction including outcome, confidence, strategic analysis, and the historical citations that support this reasoning."#;

/// Slider values, each on a 0–100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceStrength {
    pub documentary: u32,
    pub witness: u32,
    pub precedents: u32,
    pub opponent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeInput {
    pub case_type: String,
    pub court_level: String,
    /// Indian state or union territory.
    pub jurisdiction: String,
    pub facts: String,
    pub evidence_strength_sliders: EvidenceStrength,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReference {
    pub case_name: String,
    pub citation: String,
    pub relevance: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomePrediction {
    pub predicted_outcome: String,
    pub confidence_score: f64,
    pub key_strengths: Vec<String>,
    pub key_risks: Vec<String>,
    pub strategy_suggestions: Vec<String>,
    pub references: Vec<CaseReference>,
}

/// Whole-number position of one evidence slider.
fn slider() -> Schema {
    Schema::integer().range(0.0, 100.0)
}

pub struct PredictOutcome;

impl Flow for PredictOutcome {
    type Input = OutcomeInput;
    type Output = OutcomePrediction;

    const NAME: &'static str = "predictCaseOutcome";
    const PATH: &'static str = "predict-outcome";
    const TAB: Tab = Tab::Predictor;
    const SYSTEM: Option<&'static str> = Some(SYSTEM);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required("caseType", Schema::string().min_length(2))
                .describe("The type of the legal case (e.g., Civil, Criminal)."),
            required("courtLevel", Schema::string().min_length(2))
                .describe("The level of the court (e.g., High Court)."),
            required("jurisdiction", Schema::string().min_length(2))
                .describe("The Indian state or union territory."),
            required("facts", Schema::string().min_length(10))
                .describe("Detailed facts of the case."),
            required(
                "evidenceStrengthSliders",
                Schema::object([
                    required("documentary", slider()),
                    required("witness", slider()),
                    required("precedents", slider()),
                    required("opponent", slider()),
                ]),
            ),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("predictedOutcome", Schema::string()),
            required("confidenceScore", Schema::score()),
            required("keyStrengths", Schema::string_list()),
            required("keyRisks", Schema::string_list()),
            required("strategySuggestions", Schema::string_list()),
            required(
                "references",
                Schema::array(Schema::object([
                    required("caseName", Schema::string()),
                    required("citation", Schema::string()),
                    required("relevance", Schema::string()),
                ])),
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::{render_prompt, run_flow, FlowError};
    use crate::llm_client::fake::ScriptedModel;
    use serde_json::json;

    fn input() -> OutcomeInput {
        OutcomeInput {
            case_type: "Cheque Bounce".to_string(),
            court_level: "High Court".to_string(),
            jurisdiction: "Delhi".to_string(),
            facts: "Cheque of ₹2,00,000 dishonoured for insufficient funds; notice served."
                .to_string(),
            evidence_strength_sliders: EvidenceStrength {
                documentary: 85,
                witness: 20,
                precedents: 60,
                opponent: 75,
            },
        }
    }

    fn prediction() -> serde_json::Value {
        json!({
            "predictedOutcome": "Conviction under Section 138 NI Act likely",
            "confidenceScore": 78,
            "keyStrengths": ["Dishonour memo on record"],
            "keyRisks": ["Witness testimony is weak"],
            "strategySuggestions": ["Prepare rebuttal to legally enforceable debt defence"],
            "references": [{
                "caseName": "Rangappa v. Sri Mohan",
                "citation": "(2010) 11 SCC 441",
                "relevance": "Presumption under Section 139"
            }]
        })
    }

    #[test]
    fn test_prompt_interpolates_every_slider() {
        let prompt = render_prompt::<PredictOutcome>(&input()).unwrap();
        assert!(prompt.contains("Case Type: Cheque Bounce"));
        assert!(prompt.contains("- Documentary: 85\n"));
        assert!(prompt.contains("- Opponent: 75"));
        assert!(!prompt.contains("85.0"));
        assert!(!prompt.contains("{{"));
    }

    #[tokio::test]
    async fn test_well_formed_prediction_is_returned() {
        let model = ScriptedModel::new().with_response(prediction());
        let output = run_flow::<PredictOutcome>(&model, &input()).await.unwrap();

        assert!((0.0..=100.0).contains(&output.confidence_score));
        assert_eq!(output.references[0].citation, "(2010) 11 SCC 441");

        let request = &model.requests()[0];
        assert_eq!(request.flow, "predictCaseOutcome");
        assert!(request
            .system
            .as_deref()
            .is_some_and(|s| s.contains("Predictive Intelligence Engine")));
    }

    #[tokio::test]
    async fn test_slider_out_of_range_is_rejected_before_model_call() {
        let mut bad = input();
        bad.evidence_strength_sliders.witness = 140;
        let model = ScriptedModel::new().with_response(prediction());

        let err = run_flow::<PredictOutcome>(&model, &bad).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert!(err.to_string().contains("evidenceStrengthSliders.witness"));
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_short_facts_are_rejected() {
        let mut bad = input();
        bad.facts = "unpaid".to_string();
        let model = ScriptedModel::new();
        let err = run_flow::<PredictOutcome>(&model, &bad).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_confidence_out_of_range_is_a_flow_failure() {
        let mut response = prediction();
        response["confidenceScore"] = json!(130);
        let model = ScriptedModel::new().with_response(response);

        let err = run_flow::<PredictOutcome>(&model, &input()).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_missing_references_is_a_flow_failure() {
        let mut response = prediction();
        response.as_object_mut().unwrap().remove("references");
        let model = ScriptedModel::new().with_response(response);

        let err = run_flow::<PredictOutcome>(&model, &input()).await.unwrap_err();
        assert!(err.to_string().contains("references: is required"));
    }
}
