//! The remote model collaborator: a small trait the controller talks to, and
//! its Gemini implementation over reqwest.

use async_trait::async_trait;
use std::error::Error as StdError;
use std::fmt;
use tracing::{debug, warn};

use crate::api::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    SystemInstruction, Tool,
};
use crate::core::config::Config;
use crate::core::message::{Attachment, Message, SearchSource};
use crate::core::settings::Language;
use crate::utils::url::generate_content_url;

/// Messages considered when generating a title.
pub const TITLE_CONTEXT_MESSAGES: usize = 4;

const EMPTY_REPLY_TEXT: &str = "No response text generated.";
const EMPTY_TURN_TEXT: &str = "...";
const DEFAULT_SOURCE_TITLE: &str = "Source";

/// Everything needed for one chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// Earlier messages, oldest first, not including the new one.
    pub history: Vec<Message>,
    pub text: String,
    pub instruction: String,
    pub attachment: Option<Attachment>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelReply {
    pub text: String,
    pub search_sources: Vec<SearchSource>,
}

#[derive(Debug)]
pub enum ModelError {
    MissingApiKey,
    Transport(String),
    Api { status: u16, message: String },
    Decode(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::MissingApiKey => write!(
                f,
                "No API key configured. Set GEMINI_API_KEY or run `chairchat auth`."
            ),
            ModelError::Transport(message) => write!(f, "{message}"),
            ModelError::Api { status, message } => write!(f, "HTTP {status}: {message}"),
            ModelError::Decode(message) => write!(f, "Unexpected response: {message}"),
        }
    }
}

impl StdError for ModelError {}

impl From<reqwest::Error> for ModelError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ModelError::Transport(format!("request timed out ({err})"))
        } else {
            ModelError::Transport(err.to_string())
        }
    }
}

/// Text of the synthetic AI message shown when a turn fails.
pub fn error_reply_text(err: &ModelError) -> String {
    format!(
        "Error: the connection to the model was interrupted. Check your network or base URL settings. (Details: {err})"
    )
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn send_message(&self, request: ModelRequest) -> Result<ModelReply, ModelError>;

    /// Best effort: an empty string means "leave the title alone".
    async fn generate_title(
        &self,
        history: Vec<Message>,
        language: Language,
        base_url: Option<String>,
    ) -> String;
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base_url: String,
    model: String,
    temperature: f32,
    history_window: usize,
}

impl GeminiClient {
    pub fn from_config(config: &Config, api_key: Option<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http,
            api_key,
            api_base_url: config.api_base_url().to_string(),
            model: config.model().to_string(),
            temperature: config.temperature(),
            history_window: config.history_window(),
        })
    }

    fn endpoint(&self, base_override: Option<&str>) -> String {
        let base = base_override
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(&self.api_base_url);
        generate_content_url(base, &self.model)
    }

    pub fn build_chat_request(&self, request: &ModelRequest) -> GenerateContentRequest {
        let mut contents = history_contents(&request.history, self.history_window);
        contents.push(Content::new(
            "user",
            outgoing_parts(&request.text, request.attachment.as_ref()),
        ));

        GenerateContentRequest {
            contents,
            system_instruction: Some(SystemInstruction {
                parts: vec![Part::text(request.instruction.clone())],
            }),
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
            }),
            tools: vec![Tool::google_search()],
        }
    }

    async fn post(
        &self,
        base_override: Option<&str>,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ModelError> {
        let api_key = self.api_key.as_deref().ok_or(ModelError::MissingApiKey)?;
        let url = self.endpoint(base_override);
        debug!(%url, contents = body.contents.len(), "posting generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;
        if !status.is_success() {
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: format_api_error(&raw),
            });
        }

        serde_json::from_str(&raw).map_err(|err| ModelError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn send_message(&self, request: ModelRequest) -> Result<ModelReply, ModelError> {
        let body = self.build_chat_request(&request);
        let response = self.post(request.base_url.as_deref(), &body).await?;
        Ok(reply_from_response(&response))
    }

    async fn generate_title(
        &self,
        history: Vec<Message>,
        language: Language,
        base_url: Option<String>,
    ) -> String {
        let body = GenerateContentRequest {
            contents: vec![Content::new("user", vec![Part::text(title_prompt(&history, language))])],
            system_instruction: None,
            generation_config: None,
            tools: Vec::new(),
        };
        match self.post(base_url.as_deref(), &body).await {
            Ok(response) => response.text().trim().to_string(),
            Err(err) => {
                debug!(error = %err, "title generation failed");
                String::new()
            }
        }
    }
}

/// The last `window` messages as role-tagged content blocks.
pub fn history_contents(history: &[Message], window: usize) -> Vec<Content> {
    let start = history.len().saturating_sub(window);
    history[start..]
        .iter()
        .map(|message| {
            let mut parts = Vec::new();
            if let Some(attachment) = &message.attachment {
                parts.push(Part::inline(&attachment.mime_type, &attachment.data));
            }
            if !message.text.trim().is_empty() {
                parts.push(Part::text(message.text.clone()));
            } else if message.attachment.is_none() {
                parts.push(Part::text(EMPTY_TURN_TEXT));
            }
            Content::new(message.sender.to_api_role(), parts)
        })
        .collect()
}

/// Note asking for whole-file output when the user attached a named file.
pub fn attachment_note(attachment: &Attachment) -> Option<String> {
    let file_name = attachment.file_name.as_deref()?;
    let language = attachment.extension().unwrap_or("text");
    Some(format!(
        "\n\n[SYSTEM NOTE: User attached file \"{file_name}\". If the user asks to edit or fix this file, output the FULL content (not a diff) in a code block using the language tag \"{language}\" or the appropriate language.]"
    ))
}

/// Parts for the new user turn: the attachment first, then the text.
pub fn outgoing_parts(text: &str, attachment: Option<&Attachment>) -> Vec<Part> {
    let mut text = text.to_string();
    if let Some(note) = attachment.and_then(attachment_note) {
        text.push_str(&note);
    }

    match attachment {
        Some(attachment) => {
            let mut parts = vec![Part::inline(&attachment.mime_type, &attachment.data)];
            if !text.trim().is_empty() {
                parts.push(Part::text(text));
            }
            parts
        }
        None if text.is_empty() => vec![Part::text(EMPTY_TURN_TEXT)],
        None => vec![Part::text(text)],
    }
}

pub fn reply_from_response(response: &GenerateContentResponse) -> ModelReply {
    let text = response.text();
    let text = if text.is_empty() {
        warn!("model returned no text");
        EMPTY_REPLY_TEXT.to_string()
    } else {
        text
    };

    let search_sources = response
        .web_sources()
        .into_iter()
        .map(|(title, uri)| SearchSource {
            title: title
                .filter(|title| !title.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE_TITLE.to_string()),
            uri,
        })
        .collect();

    ModelReply {
        text,
        search_sources,
    }
}

pub fn title_prompt(history: &[Message], language: Language) -> String {
    let conversation = history
        .iter()
        .take(TITLE_CONTEXT_MESSAGES)
        .map(|message| format!("{}: {}", message.sender, message.text))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the conversation start and generate a chat title.\n\
         RULES:\n\
         1. EXTREMELY SHORT (max 2-4 words).\n\
         2. No quotes. No punctuation.\n\
         3. Language: \"{}\" (must match this language code).\n\n\
         Conversation:\n{}",
        language.code(),
        conversation
    )
}

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Condense an error body into one line, preferring the provider's message.
pub fn format_api_error(error_text: &str) -> String {
    let trimmed = error_text.trim();

    if trimmed.is_empty() {
        return "<empty response body>".to_string();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
        return json_value.to_string();
    }

    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}
