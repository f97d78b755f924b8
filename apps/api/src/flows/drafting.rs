//! Legal document drafting with an attached review of risks and gaps.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{optional, required, Schema};

const SYSTEM: &str = r#"You are the CourtIQ Drafting Specialist, master of Indian Courtroom Pleadings and Conveyancing.

DRAFTING STANDARDS:
1. FORMAL STRUCTURE: Use standard Indian headings (e.g., 'IN THE COURT OF...', 'MEMORANDUM OF PARTIES', 'PRAYER').
2. STATUTORY COMPLIANCE: Ensure petitions mention the correct enabling provision (e.g., Article 226 for High Court Writs, Section 138 of NI Act for Cheque Bounce notices).
3. VERIFICATION & AFFIDAVITS: Include placeholders for 'Verification' and 'Affidavit' as per the High Court Rules.
4. REVIEW METRICS: Identify 'Stamp Duty' requirements, 'Registration' necessity under the Registration Act, and potential 'Limitation' issues under the Limitation Act.
5. LANGUAGE: Use formal, precise legal English. Avoid passive voice in the 'Facts' section to ensure clarity of allegations."#;

const TEMPLATE: &str = r#"Generate a structured legal document draft and provide an AI legal review for the following parameters:

Document Type: {{documentType}}
Party Details: {{partyDetails}}
Facts: {{facts}}
{{#if financialInfo}}Financial Information: {{financialInfo}}
{{/if}}
Ensure the draft follows the formal standards of the Indian Judiciary."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftingInput {
    /// e.g. "Writ Petition", "Legal Notice"
    pub document_type: String,
    pub party_details: String,
    pub facts: String,
    /// Financial terms in INR.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_info: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftReview {
    pub risks: Vec<String>,
    pub missing_information: Vec<String>,
    pub suggested_clauses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftingOutput {
    pub draft: String,
    pub ai_review: DraftReview,
}

pub struct DraftDocument;

impl Flow for DraftDocument {
    type Input = DraftingInput;
    type Output = DraftingOutput;

    const NAME: &'static str = "automateLegalDrafting";
    const PATH: &'static str = "draft-document";
    const TAB: Tab = Tab::Drafting;
    const SYSTEM: Option<&'static str> = Some(SYSTEM);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required("documentType", Schema::string().non_empty()).describe(
                "The type of Indian legal document (e.g., \"Writ Petition\", \"Legal Notice\").",
            ),
            required("partyDetails", Schema::string().non_empty())
                .describe("Detailed info about parties."),
            required("facts", Schema::string().non_empty()).describe("Relevant facts."),
            optional("financialInfo", Schema::string()).describe("Financial terms in INR (₹)."),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("draft", Schema::string().non_empty()),
            required(
                "aiReview",
                Schema::object([
                    required("risks", Schema::string_list()),
                    required("missingInformation", Schema::string_list()),
                    required("suggestedClauses", Schema::string_list()),
                ]),
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

    fn legal_notice() -> DraftingInput {
        DraftingInput {
            document_type: "Legal Notice".to_string(),
            party_details: "A vs B".to_string(),
            facts: "non-payment of dues".to_string(),
            financial_info: None,
        }
    }

    #[test]
    fn test_absent_financial_info_leaves_no_placeholder() {
        let prompt = render_prompt::<DraftDocument>(&legal_notice()).unwrap();
        assert!(!prompt.contains("Financial Information"));
        assert!(prompt.contains("Facts: non-payment of dues\n\nEnsure the draft"));
    }

    #[test]
    fn test_blank_financial_info_is_treated_as_absent() {
        let mut input = legal_notice();
        input.financial_info = Some("  ".to_string());
        let prompt = render_prompt::<DraftDocument>(&input).unwrap();
        assert!(!prompt.contains("Financial Information"));
    }

    #[test]
    fn test_present_financial_info_is_rendered() {
        let mut input = legal_notice();
        input.financial_info = Some("₹3,50,000 outstanding since April".to_string());
        let prompt = render_prompt::<DraftDocument>(&input).unwrap();
        assert!(prompt.contains("Financial Information: ₹3,50,000 outstanding since April\n"));
    }

    #[test]
    fn test_input_accepts_missing_optional_field() {
        let input: DraftingInput = serde_json::from_value(json!({
            "documentType": "Legal Notice",
            "partyDetails": "A vs B",
            "facts": "non-payment of dues"
        }))
        .unwrap();
        assert!(input.financial_info.is_none());
    }

    #[tokio::test]
    async fn test_legal_notice_yields_draft_and_review() {
        let model = ScriptedModel::new().with_response(json!({
            "draft": "LEGAL NOTICE\nUnder instructions from my client A, I hereby call upon you B...",
            "aiReview": {
                "risks": ["Limitation period for recovery may be close to expiry"],
                "missingInformation": [],
                "suggestedClauses": ["Interest at 18% per annum from due date"]
            }
        }));
        let output = run_flow::<DraftDocument>(&model, &legal_notice()).await.unwrap();

        assert!(!output.draft.is_empty());
        assert_eq!(output.ai_review.risks.len(), 1);
        assert!(output.ai_review.missing_information.is_empty());
        assert_eq!(output.ai_review.suggested_clauses.len(), 1);
    }

    #[tokio::test]
    async fn test_review_lists_must_be_present() {
        let model = ScriptedModel::new().with_response(json!({
            "draft": "LEGAL NOTICE",
            "aiReview": {"risks": []}
        }));
        let err = run_flow::<DraftDocument>(&model, &legal_notice())
            .await
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidOutput(_)));
        assert!(err.to_string().contains("aiReview.missingInformation"));
        assert!(err.to_string().contains("aiReview.suggestedClauses"));
    }

    #[tokio::test]
    async fn test_empty_draft_is_rejected() {
        let model = ScriptedModel::new().with_response(json!({
            "draft": "",
            "aiReview": {"risks": [], "missingInformation": [], "suggestedClauses": []}
        }));
        assert!(run_flow::<DraftDocument>(&model, &legal_notice()).await.is_err());
    }
}
