use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }

    /// Role name used by the remote API for conversation history.
    pub fn to_api_role(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "model",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "type")]
    pub kind: AttachmentKind,
    /// Base64 payload without a data-URL prefix.
    pub data: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Attachment {
    pub fn new(bytes: &[u8], mime_type: impl Into<String>, file_name: Option<String>) -> Self {
        let mime_type = mime_type.into();
        let kind = if mime_type.starts_with("image/") {
            AttachmentKind::Image
        } else {
            AttachmentKind::File
        };
        Self {
            kind,
            data: BASE64.encode(bytes),
            mime_type,
            file_name,
        }
    }

    /// Read a file from disk into an attachment, guessing its MIME type from
    /// the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Ok(Self::new(&bytes, mime_type, file_name))
    }

    /// Extension of the attached file name, if it has one.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name.as_deref()?;
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext)
        }
    }

    pub fn display_name(&self) -> &str {
        match (&self.file_name, self.kind) {
            (Some(name), _) => name,
            (None, AttachmentKind::Image) => "image",
            (None, AttachmentKind::File) => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_sources: Option<Vec<SearchSource>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_mode: Option<String>,
}

impl Message {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
            sender,
            timestamp: now_millis(),
            is_error: false,
            attachment: None,
            search_sources: None,
            detected_mode: None,
        }
    }

    pub fn user(text: impl Into<String>, attachment: Option<Attachment>) -> Self {
        Self {
            attachment,
            ..Self::new(Sender::User, text)
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text)
    }

    pub fn ai_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::new(Sender::Ai, text)
        }
    }

    /// Seed message placed at the start of a fresh conversation.
    pub fn welcome(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::ai(text)
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    pub fn is_ai(&self) -> bool {
        self.sender == Sender::Ai
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_kind_follows_mime_type() {
        let image = Attachment::new(b"png", "image/png", Some("cat.png".into()));
        let file = Attachment::new(b"a,b", "text/csv", Some("data.csv".into()));
        assert_eq!(image.kind, AttachmentKind::Image);
        assert_eq!(file.kind, AttachmentKind::File);
        assert_eq!(file.data, "YSxi");
    }

    #[test]
    fn attachment_extension_handles_missing_and_trailing_dots() {
        let mut attachment = Attachment::new(b"", "text/plain", Some("notes.tar.gz".into()));
        assert_eq!(attachment.extension(), Some("gz"));
        attachment.file_name = Some("Makefile".into());
        assert_eq!(attachment.extension(), None);
        attachment.file_name = Some("odd.".into());
        assert_eq!(attachment.extension(), None);
        attachment.file_name = None;
        assert_eq!(attachment.extension(), None);
    }

    #[test]
    fn attachment_from_path_reads_and_guesses_mime() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("script.py");
        fs::write(&path, "print('hi')\n").expect("write");

        let attachment = Attachment::from_path(&path).expect("attachment");
        assert_eq!(attachment.kind, AttachmentKind::File);
        assert_eq!(attachment.file_name.as_deref(), Some("script.py"));
        assert_eq!(
            BASE64.decode(&attachment.data).expect("base64"),
            b"print('hi')\n"
        );
    }

    #[test]
    fn message_serializes_with_camel_case_and_skips_empty_fields() {
        let message = Message::welcome("welcome", "Hello");
        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["id"], "welcome");
        assert_eq!(json["sender"], "ai");
        assert!(json.get("isError").is_none());
        assert!(json.get("detectedMode").is_none());

        let error = Message::ai_error("boom");
        let json = serde_json::to_value(&error).expect("serialize");
        assert_eq!(json["isError"], true);
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Message::user("a", None);
        let b = Message::user("a", None);
        assert_ne!(a.id, b.id);
    }
}
