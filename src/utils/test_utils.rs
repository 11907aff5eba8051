use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::Semaphore;

use crate::core::app::{App, AppEvent, EventOutcome};
use crate::core::message::Message;
use crate::core::model_client::{ModelClient, ModelError, ModelReply, ModelRequest};
use crate::core::settings::{Language, Settings};
use crate::core::store::Store;

/// A title request as seen by the test double.
#[derive(Debug, Clone)]
pub struct TitleCall {
    pub history: Vec<Message>,
    pub language: Language,
    pub base_url: Option<String>,
}

/// Model client that replays queued replies and records every call.
#[derive(Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<ModelReply, ModelError>>>,
    requests: Mutex<Vec<ModelRequest>>,
    title_calls: Mutex<Vec<TitleCall>>,
    title: Mutex<String>,
    /// When set, title requests wait for a permit before answering.
    title_gate: Option<Arc<Semaphore>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title_gate(gate: Arc<Semaphore>) -> Self {
        Self {
            title_gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn push_reply(&self, text: &str) {
        self.replies.lock().unwrap().push_back(Ok(ModelReply {
            text: text.to_string(),
            search_sources: Vec::new(),
        }));
    }

    pub fn push_result(&self, result: Result<ModelReply, ModelError>) {
        self.replies.lock().unwrap().push_back(result);
    }

    pub fn set_title(&self, title: &str) {
        *self.title.lock().unwrap() = title.to_string();
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn title_calls(&self) -> Vec<TitleCall> {
        self.title_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn send_message(&self, request: ModelRequest) -> Result<ModelReply, ModelError> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ModelReply::default()))
    }

    async fn generate_title(
        &self,
        history: Vec<Message>,
        language: Language,
        base_url: Option<String>,
    ) -> String {
        self.title_calls.lock().unwrap().push(TitleCall {
            history,
            language,
            base_url,
        });
        if let Some(gate) = &self.title_gate {
            let _permit = gate.acquire().await;
        }
        self.title.lock().unwrap().clone()
    }
}

pub struct TestApp {
    pub app: App,
    pub events: UnboundedReceiver<AppEvent>,
    pub client: Arc<ScriptedClient>,
    pub dir: TempDir,
}

impl TestApp {
    pub fn store(&self) -> Store {
        Store::new(self.dir.path())
    }

    /// Apply events until a reply has been appended.
    pub async fn next_reply(&mut self) -> EventOutcome {
        loop {
            let event = self.events.recv().await.expect("event channel open");
            let is_reply = matches!(event, AppEvent::ReplyReady { .. });
            let outcome = self.app.handle_event(event);
            if is_reply {
                return outcome;
            }
        }
    }

    /// Apply events until a title event has been handled.
    pub async fn next_title(&mut self) -> EventOutcome {
        loop {
            let event = self.events.recv().await.expect("event channel open");
            let is_title = matches!(event, AppEvent::TitleReady { .. });
            let outcome = self.app.handle_event(event);
            if is_title {
                return outcome;
            }
        }
    }
}

pub fn test_settings() -> Settings {
    Settings::with_system(Language::En, true)
}

pub fn create_test_app_with(client: ScriptedClient) -> TestApp {
    let dir = TempDir::new().expect("tempdir");
    let client = Arc::new(client);
    let (app, events) = App::load(
        Store::new(dir.path()),
        Arc::clone(&client) as Arc<dyn ModelClient>,
        test_settings,
    );
    TestApp {
        app,
        events,
        client,
        dir,
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(ScriptedClient::new())
}
