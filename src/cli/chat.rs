//! The interactive loop: reads lines from stdin and applies controller events
//! as they arrive.

use std::error::Error;
use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::cli::render::{render_conversation, render_message, render_session_list, render_status_line};
use crate::commands::{process_input, CommandResult};
use crate::core::app::{App, EventOutcome, SubmitOutcome};
use crate::core::config::Config;
use crate::core::keyring::resolve_api_key;
use crate::core::model_client::{GeminiClient, ModelClient};
use crate::core::persona::AppMode;
use crate::core::settings::Settings;
use crate::core::store::Store;

/// What the loop should do after a line of input.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LineResponse {
    pub output: Option<String>,
    pub quit: bool,
}

impl LineResponse {
    fn show(text: impl Into<String>) -> Self {
        Self {
            output: Some(text.into()),
            quit: false,
        }
    }
}

/// Apply one line of user input.
pub fn respond_to_line(app: &mut App, line: &str) -> LineResponse {
    match process_input(app, line) {
        CommandResult::Continue => LineResponse::default(),
        CommandResult::Output(text) => LineResponse::show(text),
        CommandResult::Quit => LineResponse {
            output: None,
            quit: true,
        },
        CommandResult::ProcessAsMessage(text) => match app.submit(&text) {
            SubmitOutcome::Sent(target) => {
                debug!(%target, "message queued");
                LineResponse::show("…")
            }
            SubmitOutcome::Empty => LineResponse::default(),
            SubmitOutcome::Busy => {
                LineResponse::show("Still waiting for the previous reply in this conversation.")
            }
            SubmitOutcome::NoConversation => {
                LineResponse::show("No conversation open. Use /new, /chat or /chair.")
            }
        },
    }
}

/// Text to show after the controller applied an event.
pub fn describe_event(app: &App, outcome: &EventOutcome) -> Option<String> {
    match outcome {
        EventOutcome::ReplyAppended(target) => {
            if app.current_target().as_ref() == Some(target) {
                app.messages(target)
                    .and_then(<[_]>::last)
                    .map(render_message)
            } else {
                Some(format!("(new reply in {target})"))
            }
        }
        EventOutcome::TitleApplied { title, .. } => Some(format!("(session titled \"{title}\")")),
        EventOutcome::Ignored => None,
    }
}

fn intro(app: &App) -> String {
    match app.mode() {
        AppMode::Home => format!(
            "Welcome to chairchat. Type /new to start a session, /chair for The Chair, /help for commands.\n\n{}",
            render_session_list(app.registry())
        ),
        _ => app
            .current_messages()
            .map(render_conversation)
            .unwrap_or_default(),
    }
}

fn prompt(app: &App) {
    print!("{} > ", render_status_line(app));
    let _ = std::io::stdout().flush();
}

pub async fn run_chat(config: &Config, start_in_chair: bool) -> Result<(), Box<dyn Error>> {
    let store = Store::new(config.data_dir()?);
    let api_key = resolve_api_key();
    if api_key.is_none() {
        eprintln!("⚠️  No API key found. Set GEMINI_API_KEY or run 'chairchat auth'.");
    }
    let client: Arc<dyn ModelClient> = Arc::new(GeminiClient::from_config(config, api_key)?);
    let (mut app, mut events) = App::load(store, client, Settings::detect);
    if start_in_chair {
        app.enter_chair();
    }

    println!("{}", intro(&app));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&app);
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!();
                    break;
                };
                let response = respond_to_line(&mut app, &line);
                if let Some(output) = response.output {
                    println!("{output}");
                }
                if response.quit {
                    break;
                }
            }
            Some(event) = events.recv() => {
                let outcome = app.handle_event(event);
                if let Some(text) = describe_event(&app, &outcome) {
                    println!("\n{text}");
                }
            }
        }
    }

    if app.any_sending() {
        warn!("exiting with replies still pending; they will not be saved");
    }
    Ok(())
}
