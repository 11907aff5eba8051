use serde::{Deserialize, Serialize};

use crate::core::message::{new_id, Message};

/// Messages a session holds when its title is generated.
pub const AUTO_TITLE_MESSAGE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    /// Milliseconds since the Unix epoch.
    pub last_modified: i64,
    #[serde(default)]
    pub is_custom_title: bool,
}

/// Ordered session list (newest first) plus the current-session pointer.
///
/// The pointer always names a session in the list, or is empty exactly when
/// the list is.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
    current: Option<String>,
}

impl SessionRegistry {
    /// Rebuild from persisted sessions. The first one becomes current.
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        let current = sessions.first().map(|session| session.id.clone());
        Self { sessions, current }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn current_id(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    pub fn get(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|session| session.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|session| session.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Resolve a user reference: a 1-based list position or an id prefix
    /// that matches exactly one session.
    pub fn resolve(&self, reference: &str) -> Option<&str> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        if let Ok(index) = reference.parse::<usize>() {
            if let Some(session) = index.checked_sub(1).and_then(|i| self.sessions.get(i)) {
                return Some(&session.id);
            }
        }
        if let Some(session) = self.get(reference) {
            return Some(&session.id);
        }
        let mut matches = self
            .sessions
            .iter()
            .filter(|session| session.id.starts_with(reference));
        match (matches.next(), matches.next()) {
            (Some(session), None) => Some(&session.id),
            _ => None,
        }
    }

    /// Insert a new session seeded with a welcome message and make it current.
    pub fn create(&mut self, title: &str, welcome: Message, now: i64) -> String {
        let id = new_id();
        self.sessions.insert(
            0,
            Session {
                id: id.clone(),
                title: title.to_string(),
                messages: vec![welcome],
                last_modified: now,
                is_custom_title: false,
            },
        );
        self.current = Some(id.clone());
        id
    }

    pub fn select(&mut self, id: &str) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.current = Some(id.to_string());
        true
    }

    /// Remove a session. Deleting the current one moves the pointer to the
    /// new first session, or clears it when none remain.
    pub fn delete(&mut self, id: &str) -> bool {
        let Some(position) = self.sessions.iter().position(|session| session.id == id) else {
            return false;
        };
        self.sessions.remove(position);
        if self.current.as_deref() == Some(id) {
            self.current = self.sessions.first().map(|session| session.id.clone());
        }
        true
    }

    pub fn rename(&mut self, id: &str, title: &str) -> bool {
        let title = title.trim();
        if title.is_empty() {
            return false;
        }
        let Some(session) = self.get_mut(id) else {
            return false;
        };
        session.title = title.to_string();
        session.is_custom_title = true;
        true
    }

    /// Replace a session's messages. Returns `true` when this update crosses
    /// the auto-title edge.
    pub fn update_messages(&mut self, id: &str, messages: Vec<Message>, now: i64) -> bool {
        let Some(session) = self.get_mut(id) else {
            return false;
        };
        let crossed = !session.is_custom_title && messages.len() == AUTO_TITLE_MESSAGE_COUNT;
        session.messages = messages;
        session.last_modified = now;
        crossed
    }

    /// Patch a generated title. Ignored when the session is gone, the title
    /// is blank, or the user has named the session in the meantime.
    pub fn apply_generated_title(&mut self, id: &str, title: &str) -> bool {
        let title = clean_generated_title(title);
        if title.is_empty() {
            return false;
        }
        match self.get_mut(id) {
            Some(session) if !session.is_custom_title => {
                session.title = title;
                true
            }
            _ => false,
        }
    }
}

/// Models occasionally wrap titles in quotes despite being asked not to.
fn clean_generated_title(title: &str) -> String {
    title
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '«' | '»' | '“' | '”'))
        .trim()
        .to_string()
}
