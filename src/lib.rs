//! Chairchat is a terminal chat client for the Gemini API with switchable
//! personas, locally persisted sessions and a standalone "Chair" log.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns runtime state: the session registry, the conversation
//!   controller, persona selection, persistence and the model client.
//! - [`commands`] implements slash-command parsing and execution for the
//!   interactive loop.
//! - [`cli`] parses arguments, runs one-shot subcommands and drives the
//!   interactive loop.
//! - [`api`] defines the `generateContent` request and response payloads.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod utils;
