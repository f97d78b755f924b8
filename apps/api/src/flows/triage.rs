//! Case triage: routing category and Justice Acceleration Index (JAI).

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{optional, required, Schema};

const SYSTEM: &str = r#"You are CourtIQ AI, a Senior Judicial Administrator and Case Triage Specialist.

TRIAGE CRITERIA:
1. JUSTICE ACCELERATION INDEX (JAI): A composite score (0-100). High scores given to cases involving senior citizens (Article 21 priority), minors, or matters of significant public importance.
2. PENDENCY WEIGHTAGE: Cases older than 5 years (Standard) or 10 years (Critical) are prioritized.
3. HUMAN IMPACT: Identify risks to livelihood, custody, or physical liberty.
4. ROUTING LOGIC:
   - CRITICAL: Immediate hearing required (e.g., Habeas Corpus, stay on demolition).
   - FAST_TRACK: Summary trials, senior citizen matters.
   - MEDIATION: Civil/Family disputes where settlement is viable.
   - STANDARD: Routine procedural matters."#;

const TEMPLATE: &str = r#"Analyze the following case for triage:

Case Summary: {{caseSummary}}
Days Pending: {{ageInDays}}
{{#if partyTypes}}Parties: {{#each partyTypes}}{{this}}{{#unless @last}}, {{/unless}}{{/each}}
{{/if}}
Calculate the JAI score and provide a clinical routing recommendation based on Judicial efficiency and human impact."#;

const CATEGORIES: [&str; 4] = ["CRITICAL", "FAST_TRACK", "MEDIATION", "STANDARD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriageCategory {
    Critical,
    FastTrack,
    Mediation,
    Standard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageInput {
    pub case_summary: String,
    pub age_in_days: u32,
    /// e.g. "Senior Citizen", "Minor"
    pub party_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResult {
    pub triage_category: TriageCategory,
    pub jai_score: f64,
    pub human_impact_indicators: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bail_risk_assessment: Option<String>,
    pub recommended_routing: String,
}

pub struct TriageCase;

impl Flow for TriageCase {
    type Input = TriageInput;
    type Output = TriageResult;

    const NAME: &'static str = "triageCase";
    const PATH: &'static str = "triage-case";
    const TAB: Tab = Tab::Triage;
    const SYSTEM: Option<&'static str> = Some(SYSTEM);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required("caseSummary", Schema::string().non_empty())
                .describe("Summary of the case facts and current status."),
            required("ageInDays", Schema::integer().min(0.0))
                .describe("How long the case has been pending."),
            required("partyTypes", Schema::string_list())
                .describe("Types of parties involved (e.g., Senior Citizen, Minor)."),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("triageCategory", Schema::enumeration(&CATEGORIES)),
            required("jaiScore", Schema::score()).describe("Justice Acceleration Index Score."),
            required("humanImpactIndicators", Schema::string_list()),
            optional("bailRiskAssessment", Schema::string()),
            required("recommendedRouting", Schema::string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::flows::{render_prompt, run_flow, FlowError};
    use crate::llm_client::fake::ScriptedModel;
    use crate::llm_client::LlmError;
    use serde_json::json;

    fn input() -> TriageInput {
        TriageInput {
            case_summary: "Eviction of an 82-year-old tenant pending since 2013.".to_string(),
            age_in_days: 4100,
            party_types: vec!["Senior Citizen".to_string(), "Landlord".to_string()],
        }
    }

    fn result(category: &str, score: u32) -> serde_json::Value {
        json!({
            "triageCategory": category,
            "jaiScore": score,
            "humanImpactIndicators": ["Risk of homelessness for a senior citizen"],
            "recommendedRouting": "List before the senior citizens' fast-track bench"
        })
    }

    #[test]
    fn test_parties_are_joined() {
        let prompt = render_prompt::<TriageCase>(&input()).unwrap();
        assert!(prompt.contains("Days Pending: 4100\n"));
        assert!(prompt.contains("Parties: Senior Citizen, Landlord\n"));
    }

    #[test]
    fn test_no_parties_omits_line() {
        let mut no_parties = input();
        no_parties.party_types.clear();
        let prompt = render_prompt::<TriageCase>(&no_parties).unwrap();
        assert!(!prompt.contains("Parties:"));
    }

    #[tokio::test]
    async fn test_category_and_score_are_parsed() {
        let model = ScriptedModel::new().with_response(result("FAST_TRACK", 88));
        let output = run_flow::<TriageCase>(&model, &input()).await.unwrap();
        assert_eq!(output.triage_category, TriageCategory::FastTrack);
        assert_eq!(output.jai_score, 88.0);
        assert!(output.bail_risk_assessment.is_none());
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let model = ScriptedModel::new().with_response(result("URGENT", 88));
        let err = run_flow::<TriageCase>(&model, &input()).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput(_)));
    }

    #[tokio::test]
    async fn test_jai_score_above_range_is_rejected() {
        let model = ScriptedModel::new().with_response(result("CRITICAL", 140));
        let err = run_flow::<TriageCase>(&model, &input()).await.unwrap_err();
        assert!(err.to_string().contains("jaiScore"));
    }

    #[tokio::test]
    async fn test_quota_exhaustion_is_reported_as_rate_limit() {
        let model = ScriptedModel::new().with_error(LlmError::Api {
            status: 429,
            message: "Resource has been exhausted (e.g. check quota).".to_string(),
        });
        let err = run_flow::<TriageCase>(&model, &input()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::RateLimit);
    }

    #[tokio::test]
    async fn test_no_result_is_a_generic_failure() {
        let model = ScriptedModel::new();
        let err = run_flow::<TriageCase>(&model, &input()).await.unwrap_err();
        assert!(matches!(err, FlowError::Llm(LlmError::EmptyContent)));
        assert_eq!(err.kind(), FailureKind::Generic);
    }

    #[tokio::test]
    async fn test_resubmission_may_differ() {
        let model = ScriptedModel::new()
            .with_response(result("FAST_TRACK", 88))
            .with_response(result("CRITICAL", 93));

        let first = run_flow::<TriageCase>(&model, &input()).await.unwrap();
        let second = run_flow::<TriageCase>(&model, &input()).await.unwrap();

        let prompts: Vec<_> = model.requests().into_iter().map(|r| r.prompt).collect();
        assert_eq!(prompts[0], prompts[1]);
        assert_ne!(first.jai_score, second.jai_score);
        assert!((0.0..=100.0).contains(&second.jai_score));
    }
}
