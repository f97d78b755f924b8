//! Inline media payloads passed to the model alongside the prompt.
//!
//! Audio arrives as a data URI (`data:<mime>;base64,<payload>`), either directly in a JSON
//! body or built from a multipart upload.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("expected a data URI of the form 'data:<mimetype>;base64,<data>'")]
    NotADataUri,

    #[error("data URI is missing a MIME type")]
    MissingMimeType,

    #[error("data URI must use base64 encoding")]
    NotBase64,

    #[error("payload is not valid base64: {0}")]
    InvalidPayload(String),

    #[error("payload is empty")]
    Empty,

    #[error("expected an audio file, got '{0}'")]
    NotAudio(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub mime_type: String,
    /// Base64 payload, exactly as forwarded to the model.
    pub data: String,
}

impl Media {
    pub fn from_data_uri(uri: &str) -> Result<Self, MediaError> {
        let rest = uri
            .trim()
            .strip_prefix("data:")
            .ok_or(MediaError::NotADataUri)?;
        let (header, payload) = rest.split_once(',').ok_or(MediaError::NotADataUri)?;

        // header: <mime>[;param=value]*;base64
        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default().trim().to_ascii_lowercase();
        if mime_type.is_empty() {
            return Err(MediaError::MissingMimeType);
        }
        if !params.any(|p| p.trim().eq_ignore_ascii_case("base64")) {
            return Err(MediaError::NotBase64);
        }

        let payload = payload.trim();
        if payload.is_empty() {
            return Err(MediaError::Empty);
        }
        let decoded = STANDARD
            .decode(payload)
            .map_err(|e| MediaError::InvalidPayload(e.to_string()))?;
        if decoded.is_empty() {
            return Err(MediaError::Empty);
        }

        Ok(Media {
            mime_type,
            data: payload.to_string(),
        })
    }

    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Result<Self, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        Ok(Media {
            mime_type: mime_type.trim().to_ascii_lowercase(),
            data: STANDARD.encode(bytes),
        })
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    pub fn ensure_audio(self) -> Result<Self, MediaError> {
        if self.mime_type.starts_with("audio/") {
            Ok(self)
        } else {
            Err(MediaError::NotAudio(self.mime_type))
        }
    }

    /// Size of the decoded payload, computed from the base64 length.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4) * 3 - padding.min(2)
    }
}
