//! Registry of setting handlers.

use std::collections::HashMap;

use super::handlers::{BaseUrlHandler, BooleanHandler, LanguageHandler};
use super::SettingHandler;
use crate::core::settings::{SettingToggle, Settings};

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `chairchat settings` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    /// Create a new registry with all handlers registered.
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };

        registry.register(Box::new(LanguageHandler));
        for toggle in SettingToggle::ALL {
            registry.register(Box::new(BooleanHandler::new(toggle)));
        }
        registry.register(Box::new(BaseUrlHandler));

        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    /// Get a handler by key, accepting the aliases the REPL toggles use.
    pub fn get(&self, key: &str) -> Option<&dyn SettingHandler> {
        let key = key.trim().to_ascii_lowercase();
        let canonical = SettingToggle::from_key(&key)
            .map(SettingToggle::key)
            .unwrap_or(key.as_str());
        self.handlers.get(canonical).map(|h| h.as_ref())
    }

    /// Get all keys in display order.
    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Every setting, one per line.
    pub fn format_all(&self, settings: &Settings) -> String {
        self.display_order
            .iter()
            .filter_map(|key| self.handlers.get(key))
            .map(|handler| handler.format(settings))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}
