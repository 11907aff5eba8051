use super::CommandResult;
use crate::core::app::App;

pub type CommandHandler = fn(&mut App, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage: &'static str,
    pub help: &'static str,
    pub handler: CommandHandler,
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub input: &'a str,
    pub args: &'a str,
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

/// Commands whose name starts with `prefix`, for completion hints.
pub fn matching_commands(prefix: &str) -> Vec<&'static Command> {
    let prefix = prefix.trim_start_matches('/').to_ascii_lowercase();
    all_commands()
        .iter()
        .filter(|command| command.name.starts_with(&prefix))
        .collect()
}

const COMMANDS: &[Command] = &[
    Command {
        name: "help",
        usage: "/help",
        help: "Show available commands.",
        handler: super::handle_help,
    },
    Command {
        name: "new",
        usage: "/new",
        help: "Start a new session and switch to it.",
        handler: super::handle_new,
    },
    Command {
        name: "sessions",
        usage: "/sessions",
        help: "List sessions, newest first.",
        handler: super::handle_sessions,
    },
    Command {
        name: "select",
        usage: "/select <number|id>",
        help: "Open a session by list position or id prefix.",
        handler: super::handle_select,
    },
    Command {
        name: "rename",
        usage: "/rename <title>",
        help: "Rename the current session.",
        handler: super::handle_rename,
    },
    Command {
        name: "delete",
        usage: "/delete [number|id]",
        help: "Ask to delete a session (the current one by default).",
        handler: super::handle_delete,
    },
    Command {
        name: "confirm",
        usage: "/confirm",
        help: "Confirm a pending deletion.",
        handler: super::handle_confirm,
    },
    Command {
        name: "cancel",
        usage: "/cancel",
        help: "Cancel a pending deletion.",
        handler: super::handle_cancel,
    },
    Command {
        name: "chair",
        usage: "/chair",
        help: "Talk to The Chair.",
        handler: super::handle_chair,
    },
    Command {
        name: "chat",
        usage: "/chat",
        help: "Return to the current session.",
        handler: super::handle_chat,
    },
    Command {
        name: "home",
        usage: "/home",
        help: "Leave the conversation view.",
        handler: super::handle_home,
    },
    Command {
        name: "attach",
        usage: "/attach <path>",
        help: "Attach a file or image to the next message.",
        handler: super::handle_attach,
    },
    Command {
        name: "detach",
        usage: "/detach",
        help: "Drop the pending attachment.",
        handler: super::handle_detach,
    },
    Command {
        name: "memes",
        usage: "/memes",
        help: "Toggle meme mode.",
        handler: super::handle_memes,
    },
    Command {
        name: "aggressive",
        usage: "/aggressive",
        help: "Toggle aggressive mode.",
        handler: super::handle_aggressive,
    },
    Command {
        name: "auto",
        usage: "/auto",
        help: "Toggle Auto-Mode, letting the model pick its persona.",
        handler: super::handle_auto,
    },
    Command {
        name: "dark",
        usage: "/dark",
        help: "Toggle the dark theme preference.",
        handler: super::handle_dark,
    },
    Command {
        name: "lang",
        usage: "/lang <code>",
        help: "Set the interface language (en, ru, es, fr, de, zh, ar, pt, hi).",
        handler: super::handle_lang,
    },
    Command {
        name: "baseurl",
        usage: "/baseurl [url]",
        help: "Route requests through a proxy; no argument restores the default.",
        handler: super::handle_base_url,
    },
    Command {
        name: "show",
        usage: "/show",
        help: "Reprint the current conversation.",
        handler: super::handle_show,
    },
    Command {
        name: "quit",
        usage: "/quit",
        help: "Exit chairchat.",
        handler: super::handle_quit,
    },
];
