//! Transcription of recorded court proceedings.
//!
//! The recording travels as a base64 data URI and is forwarded to the model as inline audio.

use serde::{Deserialize, Serialize};

use crate::dashboard::Tab;
use crate::flows::{Flow, FlowError};
use crate::llm_client::prompts::ASSOCIATE_PERSONA;
use crate::media::Media;
use crate::schema::{required, Schema};

const TEMPLATE: &str = r#"Transcribe the following audio recording of court proceedings into text. Ensure accuracy and include speaker turns if identifiable, such as "Speaker 1: ...", "Judge: ...", etc. If the audio is unclear, indicate with [unclear audio]. Focus solely on the transcription, do not add any additional commentary or analysis."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionInput {
    /// `data:<mimetype>;base64,<encoded_data>`
    pub audio_data_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionOutput {
    pub transcription: String,
}

pub struct TranscribeProceedings;

impl Flow for TranscribeProceedings {
    type Input = TranscriptionInput;
    type Output = TranscriptionOutput;

    const NAME: &'static str = "transcribeCourtProceedings";
    const PATH: &'static str = "transcribe";
    const TAB: Tab = Tab::Stenographer;
    const SYSTEM: Option<&'static str> = Some(ASSOCIATE_PERSONA);
    const TEMPLATE: &'static str = TEMPLATE;

    fn input_schema() -> Schema {
        Schema::object([required("audioDataUri", Schema::string().non_empty()).describe(
            "An audio recording of court proceedings, as a data URI that must include a MIME type and use Base64 encoding. Expected format: 'data:<mimetype>;base64,<encoded_data>'.",
        )])
    }

    fn output_schema() -> Schema {
        Schema::object([required("transcription", Schema::string())
            .describe("The transcribed text of the court proceedings.")])
    }

    /// The audio is not interpolated into the prompt; it is attached as a separate part.
    fn context(_input: &Self::Input) -> Result<serde_json::Value, FlowError> {
        Ok(serde_json::Value::Object(Default::default()))
    }

    fn media(input: &Self::Input) -> Result<Option<Media>, FlowError> {
        let media = Media::from_data_uri(&input.audio_data_uri)?.ensure_audio()?;
        Ok(Some(media))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::FailureKind;
    use crate::llm_client::fake::ScriptedModel;
    use crate::flows::run_flow;
    use serde_json::json;

    // "RIFF" header bytes, enough to stand in for a recording
    const WAV_URI: &str = "data:audio/wav;base64,UklGRg==";

    #[tokio::test]
    async fn test_audio_is_attached_as_media() {
        let model = ScriptedModel::new().with_response(json!({
            "transcription": "Judge: Call the next matter.\nSpeaker 1: [unclear audio]"
        }));
        let input = TranscriptionInput {
            audio_data_uri: WAV_URI.to_string(),
        };
        let output = run_flow::<TranscribeProceedings>(&model, &input).await.unwrap();
        assert!(output.transcription.starts_with("Judge:"));

        let request = &model.requests()[0];
        let media = request.media.as_ref().unwrap();
        assert_eq!(media.mime_type, "audio/wav");
        assert_eq!(media.decoded_len(), 4);
        assert!(!request.prompt.contains("base64"));
        assert_eq!(request.system.as_deref(), Some(ASSOCIATE_PERSONA));
    }

    #[tokio::test]
    async fn test_malformed_data_uri_never_reaches_model() {
        let model = ScriptedModel::new();
        let input = TranscriptionInput {
            audio_data_uri: "https://example.com/hearing.mp3".to_string(),
        };
        let err = run_flow::<TranscribeProceedings>(&model, &input).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Validation);
        assert!(model.requests().is_empty());
    }

    #[tokio::test]
    async fn test_non_audio_payload_is_rejected() {
        let model = ScriptedModel::new();
        let input = TranscriptionInput {
            audio_data_uri: "data:application/pdf;base64,JVBERi0=".to_string(),
        };
        let err = run_flow::<TranscribeProceedings>(&model, &input).await.unwrap_err();
        assert!(matches!(err, FlowError::Media(_)));
    }

    #[tokio::test]
    async fn test_missing_transcription_is_a_failure() {
        let model = ScriptedModel::new().with_response(json!({}));
        let input = TranscriptionInput {
            audio_data_uri: WAV_URI.to_string(),
        };
        let err = run_flow::<TranscribeProceedings>(&model, &input).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Generic);
    }
}
