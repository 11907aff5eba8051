mod registry;

pub use registry::{all_commands, matching_commands, CommandInvocation};

use std::path::Path;

use crate::cli::render::{render_conversation, render_session_list};
use crate::core::app::App;
use crate::core::message::Attachment;
use crate::core::settings::{Language, SettingToggle};

#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    /// Text for the user.
    Output(String),
    ProcessAsMessage(String),
    Quit,
}

pub fn process_input(app: &mut App, input: &str) -> CommandResult {
    let trimmed = input.trim();

    if !trimmed.starts_with('/') {
        return CommandResult::ProcessAsMessage(input.to_string());
    }

    let mut parts = trimmed[1..].splitn(2, char::is_whitespace);
    let command_name = match parts.next() {
        Some(name) if !name.is_empty() => name,
        _ => return CommandResult::ProcessAsMessage(input.to_string()),
    };
    let args = parts.next().unwrap_or("").trim();

    if let Some(command) = registry::find_command(command_name) {
        let invocation = CommandInvocation {
            input: trimmed,
            args,
        };
        (command.handler)(app, invocation)
    } else {
        CommandResult::Output(format!(
            "Unknown command /{command_name}. Type /help for a list."
        ))
    }
}

fn output(text: impl Into<String>) -> CommandResult {
    CommandResult::Output(text.into())
}

pub(super) fn handle_help(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Commands:\n");
    for command in all_commands() {
        help.push_str(&format!("  {:<22} {}\n", command.usage, command.help));
    }
    help.push_str("Anything else is sent as a message.");
    output(help)
}

pub(super) fn handle_new(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.new_session();
    match app.current_messages() {
        Some(messages) => output(render_conversation(messages)),
        None => CommandResult::Continue,
    }
}

pub(super) fn handle_sessions(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    output(render_session_list(app.registry()))
}

pub(super) fn handle_select(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return output("Usage: /select <number|id>");
    }
    let Some(id) = app.registry().resolve(invocation.args).map(str::to_string) else {
        return output(format!("No session matches '{}'.", invocation.args));
    };
    app.select_session(&id);
    match app.current_messages() {
        Some(messages) => output(render_conversation(messages)),
        None => CommandResult::Continue,
    }
}

pub(super) fn handle_rename(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let Some(id) = app.registry().current_id().map(str::to_string) else {
        return output("No session selected.");
    };
    if invocation.args.is_empty() {
        return output("Usage: /rename <title>");
    }
    if app.rename_session(&id, invocation.args) {
        output(format!("Renamed to: {}", invocation.args))
    } else {
        output("Title must not be empty.")
    }
}

pub(super) fn handle_delete(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    let id = if invocation.args.is_empty() {
        app.registry().current_id().map(str::to_string)
    } else {
        app.registry().resolve(invocation.args).map(str::to_string)
    };
    let Some(id) = id else {
        return output("No session to delete.");
    };
    app.request_delete(&id);
    let title = app
        .registry()
        .get(&id)
        .map(|session| session.title.clone())
        .unwrap_or_default();
    output(format!(
        "Delete \"{title}\"? Type /confirm to delete or /cancel to keep it."
    ))
}

pub(super) fn handle_confirm(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    match app.confirm_delete() {
        Some(_) => output(format!(
            "Session deleted.\n{}",
            render_session_list(app.registry())
        )),
        None => output("Nothing to confirm."),
    }
}

pub(super) fn handle_cancel(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if app.cancel_delete() {
        output("Deletion cancelled.")
    } else {
        output("Nothing to cancel.")
    }
}

pub(super) fn handle_chair(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.enter_chair();
    output(render_conversation(app.chair_log()))
}

pub(super) fn handle_chat(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    if !app.enter_chat() {
        return output("No session yet. Use /new to start one.");
    }
    match app.current_messages() {
        Some(messages) => output(render_conversation(messages)),
        None => CommandResult::Continue,
    }
}

pub(super) fn handle_home(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    app.go_home();
    output(render_session_list(app.registry()))
}

pub(super) fn handle_attach(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return output("Usage: /attach <path>");
    }
    match Attachment::from_path(Path::new(invocation.args)) {
        Ok(attachment) => {
            let summary = format!(
                "Attached {} ({}).",
                attachment.display_name(),
                attachment.mime_type
            );
            app.attach(attachment);
            output(summary)
        }
        Err(err) => output(format!("Could not read {}: {err}", invocation.args)),
    }
}

pub(super) fn handle_detach(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    match app.detach() {
        Some(attachment) => output(format!("Removed {}.", attachment.display_name())),
        None => output("Nothing attached."),
    }
}

fn toggle(app: &mut App, toggle: SettingToggle, label: &str) -> CommandResult {
    let enabled = app.toggle(toggle);
    let state = if enabled { "on" } else { "off" };
    let mut message = format!("{label}: {state}");
    if toggle != SettingToggle::DarkMode {
        message.push_str(&format!(" (persona: {})", app.persona()));
    }
    output(message)
}

pub(super) fn handle_memes(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    toggle(app, SettingToggle::Memes, "Memes")
}

pub(super) fn handle_aggressive(
    app: &mut App,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    toggle(app, SettingToggle::Aggressive, "Aggressive")
}

pub(super) fn handle_auto(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    toggle(app, SettingToggle::Auto, "Auto-Mode")
}

pub(super) fn handle_dark(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    toggle(app, SettingToggle::DarkMode, "Dark mode")
}

pub(super) fn handle_lang(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        return output(format!("Language: {}", app.settings().language));
    }
    match invocation.args.parse::<Language>() {
        Ok(language) => {
            app.set_language(language);
            output(format!("Language set to {language}."))
        }
        Err(err) => output(err),
    }
}

pub(super) fn handle_base_url(app: &mut App, invocation: CommandInvocation<'_>) -> CommandResult {
    if invocation.args.is_empty() {
        app.set_base_url(None);
        return output("Base URL reset to the default.");
    }
    app.set_base_url(Some(invocation.args.to_string()));
    output(format!("Base URL set to {}.", invocation.args))
}

pub(super) fn handle_show(app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    match app.current_messages() {
        Some(messages) => output(render_conversation(messages)),
        None => output(render_session_list(app.registry())),
    }
}

pub(super) fn handle_quit(_app: &mut App, _invocation: CommandInvocation<'_>) -> CommandResult {
    CommandResult::Quit
}

#[cfg(test)]
mod tests;
