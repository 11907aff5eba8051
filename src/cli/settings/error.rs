//! Error types for settings operations.

use std::fmt;

/// Errors that can occur when editing the settings record from the command line.
#[derive(Debug)]
pub enum SettingError {
    /// The provided setting key is not recognized.
    UnknownKey(String),
    /// The provided value could not be parsed as a boolean.
    InvalidBoolean(String),
    /// The provided language code is not supported.
    UnknownLanguage(String),
    /// Required arguments are missing.
    MissingArgs {
        hint: &'static str,
        example: &'static str,
    },
    /// The settings record could not be written.
    StoreError(String),
}

impl SettingError {
    /// Print the error message to stderr with appropriate formatting.
    pub fn print(&self) {
        match self {
            SettingError::UnknownKey(key) => {
                eprintln!("❌ Unknown setting: {key}");
                eprintln!("   Run 'chairchat settings' to see available settings.");
            }
            SettingError::InvalidBoolean(input) => {
                eprintln!("❌ Invalid boolean value: {input}");
                eprintln!("   Use 'on' or 'off' (also accepts true/false, yes/no)");
            }
            SettingError::UnknownLanguage(message) => {
                eprintln!("❌ {message}");
            }
            SettingError::MissingArgs { hint, example } => {
                eprintln!("⚠️  {hint}");
                eprintln!("Example: {example}");
            }
            SettingError::StoreError(msg) => {
                eprintln!("❌ Failed to save settings: {msg}");
            }
        }
    }

    /// Returns the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::UnknownKey(key) => write!(f, "Unknown setting: {key}"),
            SettingError::InvalidBoolean(input) => write!(f, "Invalid boolean value: {input}"),
            SettingError::UnknownLanguage(message) => write!(f, "{message}"),
            SettingError::MissingArgs { hint, .. } => write!(f, "{hint}"),
            SettingError::StoreError(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for SettingError {}
