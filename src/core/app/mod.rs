use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::core::message::{now_millis, Attachment, Message};
use crate::core::model_client::{ModelClient, ModelError, ModelReply, ModelRequest};
use crate::core::persona::{resolve_persona, AppMode, Persona};
use crate::core::settings::{Language, SettingToggle, Settings};
use crate::core::store::{Store, StoreKey};

pub mod conversation;
pub mod registry;

pub use conversation::{ConversationState, ConversationTarget, TurnTracker};
pub use registry::{Session, SessionRegistry, AUTO_TITLE_MESSAGE_COUNT};

/// Id of the seed message of a fresh Chair log.
pub const CHAIR_WELCOME_ID: &str = "welcome-chair";

/// Results delivered back to the controller by spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    ReplyReady {
        target: ConversationTarget,
        persona: Persona,
        result: Result<ModelReply, ModelError>,
    },
    TitleReady {
        session_id: String,
        title: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Home mode, or Chat without a current session.
    NoConversation,
    /// The conversation is still waiting on its previous reply.
    Busy,
    /// Nothing to send.
    Empty,
    Sent(ConversationTarget),
}

/// What applying an event changed, for the caller to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    ReplyAppended(ConversationTarget),
    TitleApplied { session_id: String, title: String },
    Ignored,
}

/// Owner of all client state. Model calls run in spawned tasks which report
/// back through the event channel; only the controller mutates state.
pub struct App {
    settings: Settings,
    registry: SessionRegistry,
    chair_log: Vec<Message>,
    mode: AppMode,
    store: Store,
    client: Arc<dyn ModelClient>,
    events: UnboundedSender<AppEvent>,
    compose_attachment: Option<Attachment>,
    turns: TurnTracker,
    title_tasks: HashMap<String, JoinHandle<()>>,
    pending_delete: Option<String>,
}

impl App {
    /// Load state from `store`. `default_settings` is only consulted when no
    /// settings record exists yet.
    pub fn load(
        store: Store,
        client: Arc<dyn ModelClient>,
        default_settings: impl FnOnce() -> Settings,
    ) -> (Self, UnboundedReceiver<AppEvent>) {
        let settings = store
            .load::<Settings>(StoreKey::Settings)
            .unwrap_or_else(default_settings);
        let sessions = store
            .load::<Vec<Session>>(StoreKey::Sessions)
            .unwrap_or_default();
        let chair_log = store
            .load::<Vec<Message>>(StoreKey::ChairLog)
            .unwrap_or_else(|| vec![chair_seed(settings.language)]);

        let registry = SessionRegistry::from_sessions(sessions);
        let mode = if registry.is_empty() {
            AppMode::Home
        } else {
            AppMode::Chat
        };
        debug!(
            sessions = registry.len(),
            chair_messages = chair_log.len(),
            "state loaded from {}",
            store.root().display()
        );

        let (events, receiver) = mpsc::unbounded_channel();
        let app = Self {
            settings,
            registry,
            chair_log,
            mode,
            store,
            client,
            events,
            compose_attachment: None,
            turns: TurnTracker::default(),
            title_tasks: HashMap::new(),
            pending_delete: None,
        };
        (app, receiver)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn chair_log(&self) -> &[Message] {
        &self.chair_log
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn persona(&self) -> Persona {
        resolve_persona(self.mode, &self.settings)
    }

    pub fn compose_attachment(&self) -> Option<&Attachment> {
        self.compose_attachment.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn state_of(&self, target: &ConversationTarget) -> ConversationState {
        self.turns.state(target)
    }

    pub fn any_sending(&self) -> bool {
        self.turns.any_sending()
    }

    /// Conversation the current mode writes to, if any.
    pub fn current_target(&self) -> Option<ConversationTarget> {
        match self.mode {
            AppMode::Home => None,
            AppMode::Chair => Some(ConversationTarget::Chair),
            AppMode::Chat => self
                .registry
                .current_id()
                .map(|id| ConversationTarget::Session(id.to_string())),
        }
    }

    pub fn messages(&self, target: &ConversationTarget) -> Option<&[Message]> {
        match target {
            ConversationTarget::Chair => Some(&self.chair_log),
            ConversationTarget::Session(id) => self
                .registry
                .get(id)
                .map(|session| session.messages.as_slice()),
        }
    }

    pub fn current_messages(&self) -> Option<&[Message]> {
        self.current_target()
            .and_then(|target| self.messages(&target))
    }

    // ---- modes ----

    pub fn enter_chair(&mut self) {
        self.mode = AppMode::Chair;
    }

    /// Switch to Chat. Fails (staying put) when there is no session to show.
    pub fn enter_chat(&mut self) -> bool {
        if self.registry.current_id().is_none() {
            return false;
        }
        self.mode = AppMode::Chat;
        true
    }

    pub fn go_home(&mut self) {
        self.mode = AppMode::Home;
    }

    // ---- sessions ----

    pub fn new_session(&mut self) -> String {
        let language = self.settings.language;
        let welcome = Message::ai(language.welcome());
        let id = self
            .registry
            .create(language.new_chat_title(), welcome, now_millis());
        self.mode = AppMode::Chat;
        self.save_sessions();
        id
    }

    pub fn select_session(&mut self, id: &str) -> bool {
        if !self.registry.select(id) {
            return false;
        }
        self.mode = AppMode::Chat;
        true
    }

    pub fn rename_session(&mut self, id: &str, title: &str) -> bool {
        if !self.registry.rename(id, title) {
            return false;
        }
        self.save_sessions();
        true
    }

    /// First step of a deletion; nothing changes until it is confirmed.
    pub fn request_delete(&mut self, id: &str) -> bool {
        if !self.registry.contains(id) {
            return false;
        }
        self.pending_delete = Some(id.to_string());
        true
    }

    pub fn cancel_delete(&mut self) -> bool {
        self.pending_delete.take().is_some()
    }

    /// Apply the pending deletion, returning the removed session's id.
    pub fn confirm_delete(&mut self) -> Option<String> {
        let id = self.pending_delete.take()?;
        if !self.registry.delete(&id) {
            return None;
        }
        if let Some(task) = self.title_tasks.remove(&id) {
            task.abort();
        }
        if self.mode == AppMode::Chat && self.registry.current_id().is_none() {
            self.mode = AppMode::Home;
        }
        self.save_sessions();
        Some(id)
    }

    // ---- settings ----

    pub fn toggle(&mut self, toggle: SettingToggle) -> bool {
        let value = self.settings.toggle(toggle);
        self.save_settings();
        value
    }

    pub fn set_flag(&mut self, toggle: SettingToggle, value: bool) {
        self.settings.set_flag(toggle, value);
        self.save_settings();
    }

    pub fn set_language(&mut self, language: Language) {
        self.settings.language = language;
        self.save_settings();
    }

    pub fn set_base_url(&mut self, base_url: Option<String>) {
        self.settings.base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        self.save_settings();
    }

    // ---- compose buffer ----

    pub fn attach(&mut self, attachment: Attachment) {
        self.compose_attachment = Some(attachment);
    }

    pub fn detach(&mut self) -> Option<Attachment> {
        self.compose_attachment.take()
    }

    // ---- turns ----

    pub fn submit(&mut self, text: &str) -> SubmitOutcome {
        let Some(target) = self.current_target() else {
            return SubmitOutcome::NoConversation;
        };
        if self.turns.is_sending(&target) {
            return SubmitOutcome::Busy;
        }
        let Some(message) =
            conversation::compose_user_message(text, self.compose_attachment.take())
        else {
            return SubmitOutcome::Empty;
        };

        let history = self.messages(&target).map(<[Message]>::to_vec).unwrap_or_default();
        let persona = self.persona();
        let request = ModelRequest {
            history,
            text: message.text.clone(),
            instruction: persona.instruction(),
            attachment: message.attachment.clone(),
            base_url: self.settings.base_url_override().map(str::to_string),
        };

        self.append(&target, message);
        self.turns.begin(target.clone());
        debug!(%target, %persona, "sending message");

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        let task_target = target.clone();
        tokio::spawn(async move {
            let result = client.send_message(request).await;
            let event = AppEvent::ReplyReady {
                target: task_target,
                persona,
                result,
            };
            if events.send(event).is_err() {
                debug!("controller gone before reply arrived");
            }
        });

        SubmitOutcome::Sent(target)
    }

    pub fn handle_event(&mut self, event: AppEvent) -> EventOutcome {
        match event {
            AppEvent::ReplyReady {
                target,
                persona,
                result,
            } => {
                self.turns.finish(&target);
                if let Err(err) = &result {
                    error!(%target, error = %err, "model request failed");
                }
                if self.messages(&target).is_none() {
                    debug!(%target, "dropping reply for deleted conversation");
                    return EventOutcome::Ignored;
                }
                let message = conversation::reply_message(persona, result);
                self.append(&target, message);
                EventOutcome::ReplyAppended(target)
            }
            AppEvent::TitleReady { session_id, title } => {
                self.title_tasks.remove(&session_id);
                if !self.registry.apply_generated_title(&session_id, &title) {
                    debug!(session = %session_id, "generated title discarded");
                    return EventOutcome::Ignored;
                }
                self.save_sessions();
                let title = self
                    .registry
                    .get(&session_id)
                    .map(|session| session.title.clone())
                    .unwrap_or(title);
                EventOutcome::TitleApplied { session_id, title }
            }
        }
    }

    fn append(&mut self, target: &ConversationTarget, message: Message) {
        match target {
            ConversationTarget::Chair => {
                self.chair_log.push(message);
                self.save_chair_log();
            }
            ConversationTarget::Session(id) => {
                let Some(session) = self.registry.get(id) else {
                    return;
                };
                let mut messages = session.messages.clone();
                messages.push(message);
                let crossed = self
                    .registry
                    .update_messages(id, messages, now_millis());
                self.save_sessions();
                if crossed {
                    self.spawn_title_task(id);
                }
            }
        }
    }

    fn spawn_title_task(&mut self, session_id: &str) {
        let Some(session) = self.registry.get(session_id) else {
            return;
        };
        if self
            .title_tasks
            .get(session_id)
            .is_some_and(|task| !task.is_finished())
        {
            return;
        }

        let history = session.messages.clone();
        let language = self.settings.language;
        let base_url = self.settings.base_url_override().map(str::to_string);
        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        let id = session_id.to_string();
        debug!(session = %id, "requesting generated title");

        let task = tokio::spawn(async move {
            let title = client.generate_title(history, language, base_url).await;
            let _ = events.send(AppEvent::TitleReady {
                session_id: id,
                title,
            });
        });
        self.title_tasks.insert(session_id.to_string(), task);
    }

    // ---- persistence ----

    fn save_settings(&self) {
        if let Err(err) = self.store.save(StoreKey::Settings, &self.settings) {
            error!(error = %err, "failed to persist settings");
        }
    }

    fn save_sessions(&self) {
        if let Err(err) = self.store.save(StoreKey::Sessions, self.registry.sessions()) {
            error!(error = %err, "failed to persist sessions");
        }
    }

    fn save_chair_log(&self) {
        if let Err(err) = self.store.save(StoreKey::ChairLog, &self.chair_log) {
            error!(error = %err, "failed to persist chair log");
        }
    }
}

fn chair_seed(language: Language) -> Message {
    Message::welcome(CHAIR_WELCOME_ID, language.welcome())
}
