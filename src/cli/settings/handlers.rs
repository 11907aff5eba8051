//! Handlers for the individual settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::SettingHandler;
use crate::core::settings::{parse_switch, Language, SettingToggle, Settings};

fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Data-driven handler for the on/off toggles.
pub struct BooleanHandler {
    toggle: SettingToggle,
    hint: &'static str,
    example: &'static str,
}

impl BooleanHandler {
    pub fn new(toggle: SettingToggle) -> Self {
        let (hint, example) = match toggle {
            SettingToggle::DarkMode => (
                "To set the theme preference, specify on or off:",
                "chairchat set dark-mode off",
            ),
            SettingToggle::Memes => (
                "To set meme mode, specify on or off:",
                "chairchat set memes off",
            ),
            SettingToggle::Aggressive => (
                "To set aggressive mode, specify on or off:",
                "chairchat set aggressive on",
            ),
            SettingToggle::Auto => (
                "To set Auto-Mode, specify on or off:",
                "chairchat set auto on",
            ),
        };
        Self {
            toggle,
            hint,
            example,
        }
    }

    fn default_value(&self) -> bool {
        Settings::default().flag(self.toggle)
    }
}

impl SettingHandler for BooleanHandler {
    fn key(&self) -> &'static str {
        self.toggle.key()
    }

    fn set(&self, args: &[String], settings: &mut Settings) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let input = args.join(" ");
        let value = parse_switch(&input).ok_or(SettingError::InvalidBoolean(input))?;
        settings.set_flag(self.toggle, value);
        Ok(format!("✅ Set {} to: {}", self.key(), format_bool(value)))
    }

    fn unset(&self, settings: &mut Settings) -> Result<String, SettingError> {
        let value = if self.toggle == SettingToggle::DarkMode {
            Settings::detect().dark_mode
        } else {
            self.default_value()
        };
        settings.set_flag(self.toggle, value);
        Ok(format!(
            "✅ Unset {} (now: {})",
            self.key(),
            format_bool(value)
        ))
    }

    fn format(&self, settings: &Settings) -> String {
        format!(
            "  {}: {}",
            self.key(),
            format_bool(settings.flag(self.toggle))
        )
    }
}

pub struct LanguageHandler;

impl SettingHandler for LanguageHandler {
    fn key(&self) -> &'static str {
        "language"
    }

    fn set(&self, args: &[String], settings: &mut Settings) -> Result<String, SettingError> {
        let Some(code) = args.first() else {
            return Err(SettingError::MissingArgs {
                hint: "To set the language, specify a language code:",
                example: "chairchat set language de",
            });
        };
        let language: Language = code.parse().map_err(SettingError::UnknownLanguage)?;
        settings.language = language;
        Ok(format!("✅ Set language to: {language}"))
    }

    fn unset(&self, settings: &mut Settings) -> Result<String, SettingError> {
        settings.language = Language::detect();
        Ok(format!(
            "✅ Unset language (detected: {})",
            settings.language
        ))
    }

    fn format(&self, settings: &Settings) -> String {
        format!("  language: {}", settings.language)
    }
}

pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], settings: &mut Settings) -> Result<String, SettingError> {
        let url = args.join(" ");
        let url = url.trim();
        if url.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To route requests through a proxy, specify its URL:",
                example: "chairchat set base-url https://proxy.example",
            });
        }
        settings.base_url = Some(url.to_string());
        Ok(format!("✅ Set base-url to: {url}"))
    }

    fn unset(&self, settings: &mut Settings) -> Result<String, SettingError> {
        settings.base_url = None;
        Ok("✅ Unset base-url (requests go to the configured API)".to_string())
    }

    fn format(&self, settings: &Settings) -> String {
        match settings.base_url_override() {
            Some(url) => format!("  base-url: {url}"),
            None => "  base-url: (unset, default API)".to_string(),
        }
    }
}
