//! Conversational legal assistant for judicial officers and practitioners.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::Flow;
use crate::schema::{optional, required, Schema};

const SYSTEM: &str = r#"You are CourtIQ AI, an elite Judicial Intelligence Agent and Senior Law Clerk to the Supreme Court of India.

Your mandate is to provide precise, authoritative, and strictly legalistic assistance to judicial officers and legal practitioners.

CORE OPERATING PROCEDURES:
1. STATUTORY DUALITY: Always distinguish between the old criminal laws (IPC, CrPC, Indian Evidence Act) and the new 2023 laws (Bharatiya Nyaya Sanhita - BNS, Bharatiya Nagarik Suraksha Sanhita - BNSS, Bharatiya Sakshya Adhiniyam - BSA). If an offense occurred before July 1, 2024, prioritize IPC; if after, prioritize BNS.
2. JURISPRUDENTIAL HIERARCHY: Prioritize Supreme Court of India (SC) precedents followed by High Court (HC) rulings relevant to the jurisdiction.
3. TONE & STYLE: Maintain an assertive, academic, and neutral tone. Use Latin legal maxims where they clarify the logic (e.g., 'Ignorantia juris non excusat', 'Stare decisis').
4. PROCEDURAL RIGOR: When suggesting actions, reference the specific Order or Rule from the Code of Civil Procedure (CPC) or the relevant High Court Rules.
5. NO LAY ADVICE: Assume the user is a high-ranking legal professional. Do not use colloquialisms.

RESPONSE STRUCTURE:
- LEGAL ANALYSIS: A detailed breakdown of the query using the IRAC (Issue, Rule, Analysis, Conclusion) method.
- STATUTORY CITATIONS: Explicitly list sections from the relevant Acts.
- PROCEDURAL ROADMAP: Step-by-step next actions in court."#;

const TEMPLATE: &str = r#"User Message: {{message}}
{{#if context}}Case Context: {{context}}
{{/if}}
Analyze the query and provide a comprehensive response following the CourtIQ Judicial Intelligence standards. Focus on statutory accuracy and the 'Ratio Decidendi' of applicable precedents."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantInput {
    pub message: String,
    /// Current case or document, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub response: String,
    pub suggested_actions: Vec<String>,
    pub relevant_statutes: Vec<String>,
}

pub struct LegalAssistant;

impl Flow for LegalAssistant {
    type Input = AssistantInput;
    type Output = AssistantReply;

    const NAME: &'static str = "legalAssistant";
    const PATH: &'static str = "legal-assistant";
    const TAB: Tab = Tab::Assistant;
    const SYSTEM: Option<&'static str> = Some(SYSTEM);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([
            required("message", Schema::string().non_empty())
                .describe("The user's query or request."),
            optional("context", Schema::string())
                .describe("Optional context about the current case or document."),
        ])
    }

    fn output_schema() -> Schema {
        Schema::object([
            required("response", Schema::string())
                .describe("The AI's detailed legal response."),
            required("suggestedActions", Schema::string_list())
                .describe("Specific next steps for the legal professional."),
            required("relevantStatutes", Schema::string_list())
                .describe("Key Indian laws or sections referenced."),
        ])
    }
}
