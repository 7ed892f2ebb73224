/// Vision inference: send a math-problem picture to a chat-completions
/// endpoint and return the tutor's explanation.
use std::io::{Read, Seek};
use std::time::Instant;

use async_trait::async_trait;
use mathtutor_core::{Analyzer, Credential, ImageBlob, ResultText, TutorError};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::prompt::is_unrecognized_reply;
use crate::request::{build_request, encode};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-5";

/// Client for one credential. Holds the key for its whole lifetime.
pub struct InferenceClient {
    client: Client,
    credential: Credential,
    base_url: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl InferenceClient {
    pub fn new(credential: Credential) -> Self {
        Self {
            client: Client::new(),
            credential,
            base_url: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Encode `image`, POST it once, and return the reply verbatim.
    pub async fn analyze_stream<R: Read + Seek + Send>(
        &self,
        image: &mut R,
    ) -> Result<ResultText, TutorError> {
        let encoded = encode(image)?;
        let body = build_request(&self.model, &encoded);

        info!(
            model = %self.model,
            encoded_bytes = encoded.as_str().len(),
            "[Vision] Sending math problem"
        );
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(self.credential.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| TutorError::Transport(describe(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TutorError::Transport(describe(&e)))?;
        let latency_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(status = status.as_u16(), latency_ms, "[Vision] Remote rejected request");
            return Err(TutorError::Remote {
                status: status.as_u16(),
                body: text,
            });
        }

        let content = extract_content(&text)?;
        debug!(
            latency_ms,
            unrecognized = is_unrecognized_reply(&content),
            "[Vision] Reply received"
        );
        Ok(ResultText::new(content))
    }
}

#[async_trait]
impl Analyzer for InferenceClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, image: &ImageBlob) -> Result<ResultText, TutorError> {
        let mut cursor = image.cursor();
        self.analyze_stream(&mut cursor).await
    }
}

/// `choices[0].message.content`, or a format error. Never a default.
fn extract_content(body: &str) -> Result<String, TutorError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| TutorError::ResponseFormat(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| TutorError::ResponseFormat("response has no choices".into()))?;
    choice
        .message
        .content
        .ok_or_else(|| TutorError::ResponseFormat("first choice has no message content".into()))
}

/// reqwest's Display stops at the outer error; walk the source chain.
fn describe(err: &reqwest::Error) -> String {
    let mut msg = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
