//! Axum route handlers for the Flow API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::dashboard::{Panel, Ticket};
use crate::errors::{AppError, FailureKind, GENERIC_FAILURE_MESSAGE};
use crate::flows::transcription::{TranscribeProceedings, TranscriptionInput};
use crate::flows::{catalog, run_flow, Flow, FlowDescriptor};
use crate::media::Media;
use crate::state::AppState;

/// GET /api/v1/flows
///
/// Lists every flow with its input and output contract.
pub async fn handle_list_flows() -> Json<Vec<FlowDescriptor>> {
    Json(catalog())
}

/// POST /api/v1/flows/<flow>
///
/// Runs one flow. The body is the flow's input record; the response is its output record.
pub async fn handle_flow<F: Flow>(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<F::Output>, AppError> {
    let guard = PanelGuard::begin::<F>(&state);
    let input = match parse_input::<F>(body) {
        Ok(input) => input,
        Err(err) => {
            guard.fail(FailureKind::Validation, err.user_message());
            return Err(err);
        }
    };
    submit::<F>(&state, guard, input).await.map(Json)
}

/// Checks the raw body against the flow's declared input schema, then deserializes it.
fn parse_input<F: Flow>(body: Value) -> Result<F::Input, AppError> {
    F::input_schema()
        .validate(&body)
        .map_err(|e| AppError::Validation(format!("invalid {} input: {e}", F::NAME)))?;
    serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("invalid {} input: {e}", F::NAME)))
}

/// POST /api/v1/flows/transcribe/upload
///
/// Multipart variant of transcription: the `file` part is encoded into a data URI.
pub async fn handle_transcribe_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<<TranscribeProceedings as Flow>::Output>, AppError> {
    let guard = PanelGuard::begin::<TranscribeProceedings>(&state);
    let input = match read_upload(multipart).await {
        Ok(input) => input,
        Err(err) => {
            guard.fail(FailureKind::Validation, err.user_message());
            return Err(err);
        }
    };
    submit::<TranscribeProceedings>(&state, guard, input)
        .await
        .map(Json)
}

async fn read_upload(mut multipart: Multipart) -> Result<TranscriptionInput, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let mime_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no content type".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let media = Media::from_bytes(&mime_type, &bytes)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        info!("Received {} byte {} upload for transcription", bytes.len(), media.mime_type);

        return Ok(TranscriptionInput {
            audio_data_uri: media.to_data_uri(),
        });
    }

    Err(AppError::Validation(
        "Multipart body must contain a 'file' field".to_string(),
    ))
}

/// A submission's hold on its panel. Settling consumes the guard; dropping it unsettled
/// (the request future was cancelled) records a generic failure so the panel never stays
/// `loading`.
struct PanelGuard<'a> {
    panel: &'a Panel,
    ticket: Ticket,
    flow: &'static str,
    settled: bool,
}

impl<'a> PanelGuard<'a> {
    fn begin<F: Flow>(state: &'a AppState) -> Self {
        let panel = state.dashboard.panel(F::TAB);
        Self {
            panel,
            ticket: panel.begin(),
            flow: F::NAME,
            settled: false,
        }
    }

    fn succeed(mut self, result: Value) {
        self.settled = true;
        if !self.panel.succeed(self.ticket, result) {
            info!(flow = self.flow, "Result superseded; panel left unchanged");
        }
    }

    fn fail(mut self, kind: FailureKind, message: String) {
        self.settled = true;
        self.panel.fail(self.ticket, kind, message);
    }
}

impl Drop for PanelGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!(flow = self.flow, "Request dropped before the flow settled");
            self.panel.fail(
                self.ticket,
                FailureKind::Generic,
                GENERIC_FAILURE_MESSAGE.to_string(),
            );
        }
    }
}

/// Runs a flow and settles its dashboard panel with the outcome.
async fn submit<F: Flow>(
    state: &AppState,
    guard: PanelGuard<'_>,
    input: F::Input,
) -> Result<F::Output, AppError> {
    match run_flow::<F>(state.llm.as_ref(), &input).await {
        Ok(output) => match serde_json::to_value(&output) {
            Ok(snapshot) => {
                guard.succeed(snapshot);
                Ok(output)
            }
            Err(e) => {
                let err = AppError::Internal(anyhow::anyhow!(
                    "Failed to serialize {} output: {e}",
                    F::NAME
                ));
                guard.fail(FailureKind::Generic, err.user_message());
                Err(err)
            }
        },
        Err(e) => {
            let kind = e.kind();
            warn!(flow = F::NAME, ?kind, "Flow failed: {e}");
            let err = AppError::from(e);
            guard.fail(kind, err.user_message());
            Err(err)
        }
    }
}
