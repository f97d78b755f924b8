//! Plain-language explanation of legal text for citizens.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{required, Schema};

const TEMPLATE: &str = r#"You are CourtIQ AI Citizen Assistant. Convert the following complex legal text into plain, simple language for a non-lawyer:

Legal Text:
{{legalText}}

Provide:
1. A very simple summary.
2. The implications for the citizen (what this means for them).
3. Clear, step-by-step next procedural actions."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifyInput {
    pub legal_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainExplanation {
    pub plain_summary: String,
    pub implications: Vec<String>,
    pub next_steps: Vec<String>,
}

pub struct SimplifyLegal;

impl Flow for SimplifyLegal {
    type Input = SimplifyInput;
    type Output = PlainExplanation;

    const NAME: &'static str = "simplifyLegal";
    const PATH: &'static str = "simplify-legal";
    const TAB: Tab = Tab::Citizen;
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([required("legalText", Schema::string().non_empty())
            .describe("Complex legal order or judgment.")])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("plainSummary", Schema::string()),
            required("implications", Schema::string_list()),
            required("nextSteps", Schema::string_list()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::run_flow;
    use crate::llm_client::fake::ScriptedModel;
    use serde_json::json;

    #[tokio::test]
    async fn test_legal_text_is_simplified() {
        let model = ScriptedModel::new().with_response(json!({
            "plainSummary": "The court has paused the eviction until the next hearing.",
            "implications": ["You can keep living in the house for now"],
            "nextSteps": ["Attend the hearing on the listed date", "Bring your rent receipts"]
        }));
        let input = SimplifyInput {
            legal_text: "Status quo qua possession shall be maintained till the next date of hearing."
                .to_string(),
        };
        let output = run_flow::<SimplifyLegal>(&model, &input).await.unwrap();
        assert_eq!(output.next_steps.len(), 2);
        assert!(model.last_prompt().contains("Status quo qua possession"));
    }
}
