//! Plain-text presentation of conversations and the session list.

use chrono::{DateTime, Local};
use std::fmt::Write as _;

use crate::core::app::{App, SessionRegistry};
use crate::core::message::{Message, SearchSource, Sender};
use crate::core::persona::{detected_mode_label, AppMode};
use crate::core::tags::split_thinking;

pub fn mode_badge(detected_mode: &str) -> String {
    format!("[{}]", detected_mode_label(detected_mode))
}

fn format_sources(sources: &[SearchSource]) -> String {
    let mut out = String::from("Sources:\n");
    for (index, source) in sources.iter().enumerate() {
        let _ = writeln!(out, "  {}. {} <{}>", index + 1, source.title, source.uri);
    }
    out
}

pub fn render_message(message: &Message) -> String {
    let mut out = String::new();
    match message.sender {
        Sender::User => {
            out.push_str("You: ");
            out.push_str(&message.text);
            if let Some(attachment) = &message.attachment {
                if !message.text.is_empty() {
                    out.push(' ');
                }
                let _ = write!(out, "[attached: {}]", attachment.display_name());
            }
            out.push('\n');
        }
        Sender::Ai if message.is_error => {
            let _ = writeln!(out, "AI (error): {}", message.text);
        }
        Sender::Ai => {
            out.push_str("AI");
            if let Some(mode) = &message.detected_mode {
                out.push(' ');
                out.push_str(&mode_badge(mode));
            }
            out.push_str(":\n");

            let split = split_thinking(&message.text);
            if let Some(reasoning) = split.reasoning.filter(|r| !r.is_empty()) {
                out.push_str("Reasoning:\n");
                for line in reasoning.lines() {
                    let _ = writeln!(out, "  | {line}");
                }
                out.push('\n');
            }
            out.push_str(&split.answer);
            out.push('\n');

            if let Some(sources) = message.search_sources.as_deref().filter(|s| !s.is_empty()) {
                out.push('\n');
                out.push_str(&format_sources(sources));
            }
        }
    }
    out
}

pub fn render_conversation(messages: &[Message]) -> String {
    messages
        .iter()
        .map(render_message)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_timestamp(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|time| time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn render_session_list(registry: &SessionRegistry) -> String {
    if registry.is_empty() {
        return "No sessions yet. Use /new to start one.\n".to_string();
    }
    let current = registry.current_id();
    let mut out = String::new();
    for (index, session) in registry.sessions().iter().enumerate() {
        let marker = if Some(session.id.as_str()) == current {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{marker} {:>2}. {}  ({} messages, {})  {}",
            index + 1,
            session.title,
            session.messages.len(),
            format_timestamp(session.last_modified),
            session.id
        );
    }
    out
}

/// One-line summary of where input will go.
pub fn render_status_line(app: &App) -> String {
    let location = match app.mode() {
        AppMode::Home => "Home".to_string(),
        AppMode::Chair => "The Chair".to_string(),
        AppMode::Chat => match app.registry().current() {
            Some(session) => format!("Chat: {}", session.title),
            None => "Chat".to_string(),
        },
    };
    let mut line = format!("[{location} | persona: {}", app.persona());
    if let Some(attachment) = app.compose_attachment() {
        let _ = write!(line, " | attached: {}", attachment.display_name());
    }
    line.push(']');
    line
}
