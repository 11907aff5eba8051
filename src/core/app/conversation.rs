use std::collections::HashSet;
use std::fmt;

use crate::core::message::{Attachment, Message, SearchSource};
use crate::core::model_client::{error_reply_text, ModelError, ModelReply};
use crate::core::persona::Persona;
use crate::core::tags::extract_mode_tag;

/// Which message list a turn belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationTarget {
    Session(String),
    Chair,
}

impl fmt::Display for ConversationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationTarget::Session(id) => write!(f, "session {id}"),
            ConversationTarget::Chair => f.write_str("The Chair"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Idle,
    Sending,
}

/// Tracks which conversations have a request in flight.
#[derive(Debug, Default)]
pub struct TurnTracker {
    sending: HashSet<ConversationTarget>,
}

impl TurnTracker {
    pub fn state(&self, target: &ConversationTarget) -> ConversationState {
        if self.sending.contains(target) {
            ConversationState::Sending
        } else {
            ConversationState::Idle
        }
    }

    pub fn is_sending(&self, target: &ConversationTarget) -> bool {
        self.state(target) == ConversationState::Sending
    }

    /// Mark a turn as started. Returns `false` if one was already running.
    pub fn begin(&mut self, target: ConversationTarget) -> bool {
        self.sending.insert(target)
    }

    pub fn finish(&mut self, target: &ConversationTarget) {
        self.sending.remove(target);
    }

    pub fn any_sending(&self) -> bool {
        !self.sending.is_empty()
    }
}

/// Build the outgoing user message, or `None` when there is nothing to send.
pub fn compose_user_message(text: &str, attachment: Option<Attachment>) -> Option<Message> {
    if text.trim().is_empty() && attachment.is_none() {
        return None;
    }
    Some(Message::user(text, attachment))
}

/// Turn the outcome of a model call into the AI message to append.
pub fn reply_message(persona: Persona, result: Result<ModelReply, ModelError>) -> Message {
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => return Message::ai_error(error_reply_text(&err)),
    };

    let (text, detected_mode) = if persona.tags_mode() {
        let tagged = extract_mode_tag(&reply.text);
        (tagged.text, tagged.detected_mode)
    } else {
        (reply.text, None)
    };

    let mut message = Message::ai(text);
    message.detected_mode = detected_mode;
    message.search_sources = non_empty(reply.search_sources);
    message
}

fn non_empty(sources: Vec<SearchSource>) -> Option<Vec<SearchSource>> {
    if sources.is_empty() {
        None
    } else {
        Some(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(text: &str) -> Result<ModelReply, ModelError> {
        Ok(ModelReply {
            text: text.to_string(),
            search_sources: Vec::new(),
        })
    }

    #[test]
    fn blank_text_without_attachment_composes_nothing() {
        assert!(compose_user_message("  \n", None).is_none());
        let attachment = Attachment::new(b"x", "image/png", None);
        let message = compose_user_message("", Some(attachment)).expect("message");
        assert!(message.is_user());
        assert!(message.attachment.is_some());
    }

    #[test]
    fn auto_persona_strips_mode_marker() {
        let message = reply_message(Persona::Auto, reply("<mode>MEME</mode>hello"));
        assert_eq!(message.text, "hello");
        assert_eq!(message.detected_mode.as_deref(), Some("MEME"));
        assert!(!message.is_error);
    }

    #[test]
    fn other_personas_leave_markers_alone() {
        let message = reply_message(Persona::Regular, reply("<mode>MEME</mode>hello"));
        assert_eq!(message.text, "<mode>MEME</mode>hello");
        assert_eq!(message.detected_mode, None);
    }

    #[test]
    fn sources_are_attached_only_when_present() {
        let message = reply_message(
            Persona::Regular,
            Ok(ModelReply {
                text: "x".into(),
                search_sources: vec![SearchSource {
                    title: "A".into(),
                    uri: "https://a.example".into(),
                }],
            }),
        );
        assert_eq!(message.search_sources.map(|s| s.len()), Some(1));
        assert_eq!(reply_message(Persona::Regular, reply("x")).search_sources, None);
    }

    #[test]
    fn failures_become_error_messages() {
        let message = reply_message(
            Persona::Auto,
            Err(ModelError::Transport("connection reset".into())),
        );
        assert!(message.is_error);
        assert!(message.is_ai());
        assert!(message.text.contains("connection reset"));
    }

    #[test]
    fn tracker_serializes_turns_per_target() {
        let mut tracker = TurnTracker::default();
        let session = ConversationTarget::Session("a".into());
        assert!(tracker.begin(session.clone()));
        assert!(!tracker.begin(session.clone()));
        assert!(tracker.begin(ConversationTarget::Chair));
        assert_eq!(tracker.state(&session), ConversationState::Sending);
        tracker.finish(&session);
        assert_eq!(tracker.state(&session), ConversationState::Idle);
        tracker.finish(&ConversationTarget::Chair);
        assert!(!tracker.any_sending());
    }
}
