//! One-shot session management for `chairchat sessions/rename/delete`.

use std::fmt;

use crate::cli::render::render_session_list;
use crate::core::app::{Session, SessionRegistry};
use crate::core::store::{Store, StoreKey};

#[derive(Debug)]
pub enum SessionCommandError {
    NotFound(String),
    EmptyTitle,
    Store(String),
}

impl fmt::Display for SessionCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionCommandError::NotFound(reference) => write!(
                f,
                "No session matches '{reference}'. Run 'chairchat sessions' to list them."
            ),
            SessionCommandError::EmptyTitle => write!(f, "Title must not be empty"),
            SessionCommandError::Store(message) => write!(f, "Failed to save sessions: {message}"),
        }
    }
}

impl std::error::Error for SessionCommandError {}

fn load(store: &Store) -> SessionRegistry {
    SessionRegistry::from_sessions(
        store
            .load::<Vec<Session>>(StoreKey::Sessions)
            .unwrap_or_default(),
    )
}

fn save(store: &Store, registry: &SessionRegistry) -> Result<(), SessionCommandError> {
    store
        .save(StoreKey::Sessions, registry.sessions())
        .map_err(|err| SessionCommandError::Store(err.to_string()))
}

pub fn list(store: &Store) -> String {
    render_session_list(&load(store))
}

/// Resolve a reference to `(id, title)`.
pub fn find(store: &Store, reference: &str) -> Option<(String, String)> {
    let registry = load(store);
    let id = registry.resolve(reference)?;
    registry
        .get(id)
        .map(|session| (session.id.clone(), session.title.clone()))
}

pub fn rename(store: &Store, reference: &str, title: &str) -> Result<(), SessionCommandError> {
    let mut registry = load(store);
    let id = registry
        .resolve(reference)
        .map(str::to_string)
        .ok_or_else(|| SessionCommandError::NotFound(reference.to_string()))?;
    if !registry.rename(&id, title) {
        return Err(SessionCommandError::EmptyTitle);
    }
    save(store, &registry)
}

pub fn delete(store: &Store, id: &str) -> Result<(), SessionCommandError> {
    let mut registry = load(store);
    if !registry.delete(id) {
        return Err(SessionCommandError::NotFound(id.to_string()));
    }
    save(store, &registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use tempfile::TempDir;

    fn seeded_store(dir: &TempDir) -> (Store, Vec<String>) {
        let store = Store::new(dir.path());
        let mut registry = SessionRegistry::default();
        let ids = vec![
            registry.create("Old", Message::ai("hi"), 1),
            registry.create("New", Message::ai("hi"), 2),
        ];
        save(&store, &registry).expect("seed");
        (store, ids)
    }

    #[test]
    fn rename_by_position_marks_custom_title() {
        let dir = TempDir::new().expect("tempdir");
        let (store, ids) = seeded_store(&dir);

        rename(&store, "2", "Renamed").expect("rename");
        let registry = load(&store);
        let session = registry.get(&ids[0]).expect("session");
        assert_eq!(session.title, "Renamed");
        assert!(session.is_custom_title);

        assert!(matches!(
            rename(&store, "1", "  "),
            Err(SessionCommandError::EmptyTitle)
        ));
        assert!(matches!(
            rename(&store, "zzz", "x"),
            Err(SessionCommandError::NotFound(_))
        ));
    }

    #[test]
    fn find_and_delete() {
        let dir = TempDir::new().expect("tempdir");
        let (store, ids) = seeded_store(&dir);

        assert_eq!(find(&store, "1"), Some((ids[1].clone(), "New".to_string())));
        delete(&store, &ids[1]).expect("delete");
        assert_eq!(load(&store).len(), 1);
        assert!(list(&store).contains("Old"));
        assert!(matches!(
            delete(&store, &ids[1]),
            Err(SessionCommandError::NotFound(_))
        ));
    }

    #[test]
    fn missing_store_lists_nothing() {
        let dir = TempDir::new().expect("tempdir");
        let store = Store::new(dir.path().join("nothing"));
        assert!(list(&store).starts_with("No sessions yet"));
    }
}
