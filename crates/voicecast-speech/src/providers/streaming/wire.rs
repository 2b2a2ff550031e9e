//! Request and response shapes of the streaming provider's JSON protocol

use super::config::StreamingConfig;
use crate::error::{SynthesisError, SynthesisResult};
use crate::params::StreamingProsody;
use crate::types::{DocumentKind, SynthesisRequest};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct RequestBody {
    pub app: AppGroup,
    pub user: UserGroup,
    pub audio: AudioGroup,
    pub request: RequestGroup,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppGroup {
    pub appid: String,
    pub token: String,
    pub cluster: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserGroup {
    pub uid: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AudioGroup {
    pub voice_type: String,
    pub encoding: &'static str,
    pub speed_ratio: f64,
    pub volume_ratio: f64,
    pub pitch_ratio: f64,
    pub emotion: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestGroup {
    pub reqid: String,
    pub text: String,
    pub text_type: &'static str,
    pub operation: &'static str,
    pub with_frontend: u8,
    pub frontend_type: &'static str,
}

fn text_type(document: DocumentKind) -> &'static str {
    match document {
        DocumentKind::Plain => "plain",
        DocumentKind::Markup => "ssml",
    }
}

/// Build the JSON body for one call, with a fresh request id.
///
/// Markup documents carry their own prosody, so they are sent with native identity ratios.
pub fn build_request(config: &StreamingConfig, request: &SynthesisRequest) -> RequestBody {
    let params = &request.parameters;
    let prosody = match request.document {
        DocumentKind::Markup => StreamingProsody::identity(),
        DocumentKind::Plain => StreamingProsody::from(params),
    };

    RequestBody {
        app: AppGroup {
            appid: request.credentials.key.clone(),
            token: request.credentials.secret.clone(),
            cluster: config.cluster.clone(),
        },
        user: UserGroup {
            uid: config.uid.clone(),
        },
        audio: AudioGroup {
            voice_type: params.voice_id().to_string(),
            encoding: "wav",
            speed_ratio: prosody.speed_ratio,
            volume_ratio: prosody.volume_ratio,
            pitch_ratio: prosody.pitch_ratio,
            emotion: params.style().to_string(),
        },
        request: RequestGroup {
            reqid: uuid::Uuid::new_v4().to_string(),
            text: request.text.clone(),
            text_type: text_type(request.document),
            operation: "query",
            with_frontend: 1,
            frontend_type: "unitTson",
        },
    }
}

/// Decode a response body into WAV bytes.
///
/// Success carries a base64 `data` string. Anything else is an invalid response that
/// keeps the provider's `code` for diagnostics.
pub fn decode_response(body: &[u8]) -> SynthesisResult<Vec<u8>> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SynthesisError::invalid_response(format!("Response is not JSON: {e}")))?;
    let Some(object) = value.as_object() else {
        return Err(SynthesisError::invalid_response(
            "Response is not a JSON object",
        ));
    };

    if let Some(data) = object.get("data").and_then(Value::as_str) {
        return BASE64.decode(data).map_err(|e| {
            SynthesisError::invalid_response(format!("Audio data is not valid base64: {e}"))
        });
    }

    let code = object
        .get("code")
        .and_then(|c| c.as_i64().or_else(|| c.as_str().and_then(|s| s.parse().ok())));
    let message = object
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Response has no audio data");
    log::warn!("Streaming provider returned no audio (code: {code:?}): {message}");

    Err(SynthesisError::InvalidResponse {
        message: message.to_string(),
        code,
    })
}
