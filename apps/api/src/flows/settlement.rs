//! Settlement and ADR pathway recommendation.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{optional, required, Schema};

const TEMPLATE: &str = r#"You are CourtIQ Mediation Expert. Analyze this dispute for settlement potential:

Dispute: {{disputeDetails}}
Financial Exposure: {{financialExposure}}
{{#if historicalSettlementData}}Historical Settlement Data: {{historicalSettlementData}}
{{/if}}
1. Estimate settlement probability (0-100).
2. Suggest a fair negotiation range.
3. Forecast mediation success rate.
4. Recommend the best Alternative Dispute Resolution (ADR) pathway."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementInput {
    pub dispute_details: String,
    pub financial_exposure: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_settlement_data: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementPlan {
    pub settlement_probability: f64,
    pub suggested_negotiation_range: String,
    pub mediation_success_rate_forecast: f64,
    pub adr_pathway_recommendation: String,
}

pub struct OptimizeSettlement;

impl Flow for OptimizeSettlement {
    type Input = SettlementInput;
    type Output = SettlementPlan;

    const NAME: &'static str = "optimizeSettlement";
    const PATH: &'static str = "optimize-settlement";
    const TAB: Tab = Tab::Settlement;
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required("disputeDetails", Schema::string().non_empty()),
            required("financialExposure", Schema::string().non_empty()),
            optional("historicalSettlementData", Schema::string()),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("settlementProbability", Schema::score()),
            required("suggestedNegotiationRange", Schema::string()),
            required("mediationSuccessRateForecast", Schema::score()),
            required("adrPathwayRecommendation", Schema::string()),
        ])
    }
}
