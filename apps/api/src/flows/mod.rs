//! Feature flows: typed input → rendered prompt → structured completion → typed output.
//!
//! Every flow goes through `run_flow`, which enforces the declared contract on both sides
//! of the model call. A flow never returns a partially valid result.

pub mod adjournments;
pub mod assistant;
pub mod calendar;
pub mod drafting;
pub mod evidence;
pub mod handlers;
pub mod outcome;
pub mod reform;
pub mod research;
pub mod settlement;
pub mod simplify;
pub mod summarizer;
pub mod transcription;
pub mod triage;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dashboard::Tab;
use crate::errors::FailureKind;
use crate::llm_client::{CompletionModel, CompletionRequest, LlmError};
use crate::media::{Media, MediaError};
use crate::schema::{Schema, SchemaError};
use crate::template::{Template, TemplateError};

pub const FLOWS_PREFIX: &str = "/api/v1/flows";

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("invalid input: {0}")]
    InvalidInput(SchemaError),

    #[error("invalid media: {0}")]
    Media(#[from] MediaError),

    #[error("prompt template error: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("model output does not match the declared schema: {0}")]
    InvalidOutput(SchemaError),

    #[error("model output rejected: {0}")]
    Rejected(String),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl FlowError {
    pub fn kind(&self) -> FailureKind {
        match self {
            FlowError::InvalidInput(_) | FlowError::Media(_) => FailureKind::Validation,
            FlowError::Llm(e) if e.is_quota() => FailureKind::RateLimit,
            _ => FailureKind::Generic,
        }
    }
}

/// One feature's contract with the model.
pub trait Flow: Send + Sync + 'static {
    type Input: Serialize + DeserializeOwned + Send + Sync;
    type Output: Serialize + DeserializeOwned + Send;

    const NAME: &'static str;
    /// Route segment under `FLOWS_PREFIX`.
    const PATH: &'static str;
    /// Dashboard tab whose panel tracks this flow's submissions.
    const TAB: Tab;
    const SYSTEM: Option<&'static str> = None;
    const TEMPLATE: &'static str;

    fn input_schema() -> Schema;
    fn output_schema() -> Schema;

    /// Values the template is rendered against. Defaults to the serialized input.
    fn context(input: &Self::Input) -> Result<Value, FlowError> {
        Ok(serde_json::to_value(input)?)
    }

    fn media(_input: &Self::Input) -> Result<Option<Media>, FlowError> {
        Ok(None)
    }

    /// Checks that relate the output to the input and cannot be expressed in a schema.
    fn check_output(_input: &Self::Input, _output: &Self::Output) -> Result<(), FlowError> {
        Ok(())
    }
}

/// Renders the user instruction for `input` without calling the model.
pub fn render_prompt<F: Flow>(input: &F::Input) -> Result<String, FlowError> {
    let template = Template::compile(F::TEMPLATE)?;
    Ok(template.render(&F::context(input)?)?)
}

pub async fn run_flow<F: Flow>(
    model: &dyn CompletionModel,
    input: &F::Input,
) -> Result<F::Output, FlowError> {
    F::input_schema()
        .validate(&serde_json::to_value(input)?)
        .map_err(FlowError::InvalidInput)?;

    let media = F::media(input)?;
    let prompt = render_prompt::<F>(input)?;
    let output_schema = F::output_schema();

    info!(
        flow = F::NAME,
        model = model.model_name(),
        prompt_chars = prompt.len(),
        media_bytes = media.as_ref().map_or(0, Media::decoded_len),
        "Running flow"
    );

    let request = CompletionRequest {
        flow: F::NAME,
        system: F::SYSTEM.map(str::to_string),
        prompt,
        media,
        response_schema: output_schema.clone(),
    };
    let value = model.complete(&request).await?;

    if let Err(e) = output_schema.validate(&value) {
        warn!(flow = F::NAME, "Model output failed schema validation: {e}");
        return Err(FlowError::InvalidOutput(e));
    }
    let output: F::Output = serde_json::from_value(value)?;
    F::check_output(input, &output)?;

    debug!(flow = F::NAME, "Flow completed");
    Ok(output)
}

/// Serializable description of a flow's contract, served at `GET /api/v1/flows`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDescriptor {
    pub name: &'static str,
    pub endpoint: String,
    pub tab: Tab,
    pub has_system_instruction: bool,
    pub input_schema: Schema,
    pub output_schema: Schema,
}

pub fn endpoint<F: Flow>() -> String {
    format!("{FLOWS_PREFIX}/{}", F::PATH)
}

pub fn describe<F: Flow>() -> FlowDescriptor {
    FlowDescriptor {
        name: F::NAME,
        endpoint: endpoint::<F>(),
        tab: F::TAB,
        has_system_instruction: F::SYSTEM.is_some(),
        input_schema: F::input_schema(),
        output_schema: F::output_schema(),
    }
}

pub fn catalog() -> Vec<FlowDescriptor> {
    vec![
        describe::<outcome::PredictOutcome>(),
        describe::<evidence::AnalyzeEvidence>(),
        describe::<drafting::DraftDocument>(),
        describe::<research::ResearchCaseLaw>(),
        describe::<transcription::TranscribeProceedings>(),
        describe::<adjournments::AnalyzeAdjournments>(),
        describe::<calendar::OptimizeCalendar>(),
        describe::<settlement::OptimizeSettlement>(),
        describe::<triage::TriageCase>(),
        describe::<summarizer::SummarizeJudgment>(),
        describe::<assistant::LegalAssistant>(),
        describe::<reform::SimulateReform>(),
        describe::<simplify::SimplifyLegal>(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_and_endpoints_are_unique() {
        let catalog = catalog();
        let names: HashSet<_> = catalog.iter().map(|d| d.name).collect();
        let endpoints: HashSet<_> = catalog.iter().map(|d| d.endpoint.clone()).collect();
        assert_eq!(names.len(), catalog.len());
        assert_eq!(endpoints.len(), catalog.len());
        assert!(catalog.iter().all(|d| d.endpoint.starts_with(FLOWS_PREFIX)));
    }

    #[test]
    fn test_every_flow_has_its_own_tab() {
        let catalog = catalog();
        let tabs: HashSet<_> = catalog.iter().map(|d| d.tab).collect();
        assert_eq!(tabs.len(), catalog.len());
        assert!(!tabs.contains(&Tab::Dashboard));
    }

    #[test]
    fn test_every_template_compiles() {
        for source in [
            outcome::PredictOutcome::TEMPLATE,
            evidence::AnalyzeEvidence::TEMPLATE,
            drafting::DraftDocument::TEMPLATE,
            research::ResearchCaseLaw::TEMPLATE,
            transcription::TranscribeProceedings::TEMPLATE,
            adjournments::AnalyzeAdjournments::TEMPLATE,
            calendar::OptimizeCalendar::TEMPLATE,
            settlement::OptimizeSettlement::TEMPLATE,
            triage::TriageCase::TEMPLATE,
            summarizer::SummarizeJudgment::TEMPLATE,
            assistant::LegalAssistant::TEMPLATE,
            reform::SimulateReform::TEMPLATE,
            simplify::SimplifyLegal::TEMPLATE,
        ] {
            assert!(Template::compile(source).is_ok(), "template failed: {source}");
        }
    }

    #[test]
    fn test_output_schemas_are_objects() {
        for descriptor in catalog() {
            assert!(
                matches!(descriptor.output_schema, Schema::Object { .. }),
                "{} output is not an object",
                descriptor.name
            );
        }
    }
}
