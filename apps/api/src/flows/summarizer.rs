//! Judgment summarization.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::llm_client::prompts::ASSOCIATE_PERSONA;
use crate::schema::{required, Schema};

/// Longest judgment text accepted, in characters.
pub const MAX_JUDGMENT_CHARS: usize = 50_000;

const TEMPLATE: &str = r#"Summarize the following court judgment concisely, highlighting key information, legal issues, findings, and the final decision. Ensure the summary is accurate and retains a formal, legal tone.

Court Judgment Text:
{{fullTextJudgment}}"#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryInput {
    pub full_text_judgment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentSummary {
    pub summary: String,
}

pub struct SummarizeJudgment;

impl Flow for SummarizeJudgment {
    type Input = SummaryInput;
    type Output = JudgmentSummary;

    const NAME: &'static str = "summarizeJudgment";
    const PATH: &'static str = "summarize-judgment";
    const TAB: Tab = Tab::Summarizer;
    const SYSTEM: Option<&'static str> = Some(ASSOCIATE_PERSONA);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([required(
            "fullTextJudgment",
            Schema::string().non_empty().max_length(MAX_JUDGMENT_CHARS),
        )
        .describe("The full text of a court judgment to be summarized.")])
    }

    fn output_schema() -> Schema {
        Schema::object([required("summary", Schema::string())
            .describe("A concise, accurate summary of the court judgment.")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::{run_flow, FlowError};
    use crate::llm_client::fake::ScriptedModel;
    use serde_json::json;

    #[tokio::test]
    async fn test_judgment_is_summarized() {
        let model = ScriptedModel::new()
            .with_response(json!({"summary": "Appeal allowed; conviction set aside."}));
        let input = SummaryInput {
            full_text_judgment: "JUDGMENT. The appellant was convicted under Section 302...".to_string(),
        };
        let output = run_flow::<SummarizeJudgment>(&model, &input).await.unwrap();
        assert_eq!(output.summary, "Appeal allowed; conviction set aside.");
        assert!(model.last_prompt().ends_with("The appellant was convicted under Section 302..."));
    }

    #[tokio::test]
    async fn test_judgment_at_limit_is_accepted() {
        let model = ScriptedModel::new().with_response(json!({"summary": "ok"}));
        let input = SummaryInput {
            full_text_judgment: "a".repeat(MAX_JUDGMENT_CHARS),
        };
        assert!(run_flow::<SummarizeJudgment>(&model, &input).await.is_ok());
    }

    #[tokio::test]
    async fn test_overlong_judgment_is_rejected_before_model_call() {
        let model = ScriptedModel::new().with_response(json!({"summary": "ok"}));
        let input = SummaryInput {
            full_text_judgment: "a".repeat(MAX_JUDGMENT_CHARS + 1),
        };
        let err = run_flow::<SummarizeJudgment>(&model, &input).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidInput(_)));
        assert!(model.requests().is_empty());
    }
}
