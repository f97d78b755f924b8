//! Adjournment pattern analysis for a single case.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{required, Schema};

const TEMPLATE: &str = r#"You are CourtIQ Delay Prevention Expert. Analyze the adjournment pattern for Case {{caseId}}:

Adjournment History:
{{#each adjournmentHistory}}- Date: {{this.date}}, Reason: {{this.reason}}, Requested By: {{this.requestedBy}}
{{/each}}
1. Calculate the probability of future delays (0-100).
2. Identify specific delay patterns (e.g., specific party requesting frequent postponements).
3. Analyze the cumulative impact on the judicial timeline.
4. Provide actionable recommendations to prevent further unnecessary adjournments."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjournment {
    pub date: String,
    pub reason: String,
    pub requested_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjournmentInput {
    pub case_id: String,
    pub adjournment_history: Vec<Adjournment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjournmentAnalysis {
    pub delay_probability: f64,
    pub pattern_alerts: Vec<String>,
    pub impact_analysis: String,
    pub recommendations: Vec<String>,
}

pub struct AnalyzeAdjournments;

impl Flow for AnalyzeAdjournments {
    type Input = AdjournmentInput;
    type Output = AdjournmentAnalysis;

    const NAME: &'static str = "analyzeAdjournments";
    const PATH: &'static str = "analyze-adjournments";
    const TAB: Tab = Tab::Adjournments;
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required("caseId", Schema::string().non_empty())
                .describe("The identifier for the case."),
            required(
                "adjournmentHistory",
                Schema::array(Schema::object([
                    required("date", Schema::string()),
                    required("reason", Schema::string()),
                    required("requestedBy", Schema::string()),
                ])),
            )
            .describe("List of past adjournments for this case."),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("delayProbability", Schema::score()),
            required("patternAlerts", Schema::string_list()),
            required("impactAnalysis", Schema::string()),
            required("recommendations", Schema::string_list()),
        ])
    }
}
