use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::appearance::system_prefers_dark;

/// Interface language. Also steers the language of generated chat titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Ru,
    Es,
    Fr,
    De,
    Zh,
    Ar,
    Pt,
    Hi,
}

impl Language {
    pub const ALL: [Language; 9] = [
        Language::En,
        Language::Ru,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Zh,
        Language::Ar,
        Language::Pt,
        Language::Hi,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Zh => "zh",
            Language::Ar => "ar",
            Language::Pt => "pt",
            Language::Hi => "hi",
        }
    }

    /// Greeting used to seed new sessions and the Chair log.
    pub fn welcome(self) -> &'static str {
        match self {
            Language::En => "Hello! I'm the Chair. Type any request and I will answer.",
            Language::Ru => "Привет! Я Кресло. Напишите любой запрос, и я отвечу.",
            Language::Es => "¡Hola! Soy la Silla. Escribe cualquier petición y responderé.",
            Language::Fr => "Bonjour ! Je suis la Chaise. Écrivez une demande et je répondrai.",
            Language::De => "Hallo! Ich bin der Stuhl. Schreib eine Anfrage und ich antworte.",
            Language::Zh => "你好！我是椅子。输入任何请求，我都会回答。",
            Language::Ar => "مرحبًا! أنا الكرسي. اكتب أي طلب وسأجيب.",
            Language::Pt => "Olá! Eu sou a Cadeira. Digite qualquer pedido e eu responderei.",
            Language::Hi => "नमस्ते! मैं कुर्सी हूँ। कोई भी अनुरोध लिखें और मैं उत्तर दूँगा।",
        }
    }

    /// Placeholder title for sessions that have not been titled yet.
    pub fn new_chat_title(self) -> &'static str {
        match self {
            Language::En => "New Chat",
            Language::Ru => "Новый чат",
            Language::Es => "Nuevo chat",
            Language::Fr => "Nouvelle discussion",
            Language::De => "Neuer Chat",
            Language::Zh => "新对话",
            Language::Ar => "محادثة جديدة",
            Language::Pt => "Novo Chat",
            Language::Hi => "नई चैट",
        }
    }

    /// Pick the language from a POSIX locale string such as `ru_RU.UTF-8`.
    pub fn from_locale(locale: &str) -> Option<Self> {
        let primary = locale
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        primary.parse().ok()
    }

    /// Detect the language from the environment, falling back to English.
    pub fn detect() -> Self {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .and_then(|locale| Self::from_locale(&locale))
            .unwrap_or(Language::En)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                let codes: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
                format!(
                    "Unknown language '{}'. Supported: {}",
                    value,
                    codes.join(", ")
                )
            })
    }
}

/// User-facing toggles persisted as the settings record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub language: Language,
    pub dark_mode: bool,
    pub memes_enabled: bool,
    pub aggressive_mode: bool,
    pub auto_mode: bool,
    /// Overrides the API base URL, e.g. to route through a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_system(Language::En, true)
    }
}

impl Settings {
    pub fn with_system(language: Language, dark_mode: bool) -> Self {
        Self {
            language,
            dark_mode,
            memes_enabled: true,
            aggressive_mode: false,
            auto_mode: false,
            base_url: None,
        }
    }

    /// Defaults for a first launch, probing the OS for language and theme.
    pub fn detect() -> Self {
        Self::with_system(Language::detect(), system_prefers_dark())
    }

    /// The base URL override, ignoring blank values.
    pub fn base_url_override(&self) -> Option<&str> {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn toggle(&mut self, toggle: SettingToggle) -> bool {
        let flag = match toggle {
            SettingToggle::DarkMode => &mut self.dark_mode,
            SettingToggle::Memes => &mut self.memes_enabled,
            SettingToggle::Aggressive => &mut self.aggressive_mode,
            SettingToggle::Auto => &mut self.auto_mode,
        };
        *flag = !*flag;
        *flag
    }

    pub fn set_flag(&mut self, toggle: SettingToggle, value: bool) {
        match toggle {
            SettingToggle::DarkMode => self.dark_mode = value,
            SettingToggle::Memes => self.memes_enabled = value,
            SettingToggle::Aggressive => self.aggressive_mode = value,
            SettingToggle::Auto => self.auto_mode = value,
        }
    }

    pub fn flag(&self, toggle: SettingToggle) -> bool {
        match toggle {
            SettingToggle::DarkMode => self.dark_mode,
            SettingToggle::Memes => self.memes_enabled,
            SettingToggle::Aggressive => self.aggressive_mode,
            SettingToggle::Auto => self.auto_mode,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    DarkMode,
    Memes,
    Aggressive,
    Auto,
}

impl SettingToggle {
    pub const ALL: [SettingToggle; 4] = [
        SettingToggle::DarkMode,
        SettingToggle::Memes,
        SettingToggle::Aggressive,
        SettingToggle::Auto,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SettingToggle::DarkMode => "dark-mode",
            SettingToggle::Memes => "memes",
            SettingToggle::Aggressive => "aggressive",
            SettingToggle::Auto => "auto",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_lowercase();
        match key.as_str() {
            "dark" | "dark-mode" | "dark_mode" => Some(SettingToggle::DarkMode),
            "memes" | "meme" => Some(SettingToggle::Memes),
            "aggressive" => Some(SettingToggle::Aggressive),
            "auto" | "auto-mode" | "auto_mode" => Some(SettingToggle::Auto),
            _ => None,
        }
    }
}

/// Parse the on/off spellings accepted on the command line.
pub fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_strings_map_to_languages() {
        assert_eq!(Language::from_locale("ru_RU.UTF-8"), Some(Language::Ru));
        assert_eq!(Language::from_locale("pt-BR"), Some(Language::Pt));
        assert_eq!(Language::from_locale("de"), Some(Language::De));
        assert_eq!(Language::from_locale("C.UTF-8"), None);
        assert_eq!(Language::from_locale("ja_JP"), None);
    }

    #[test]
    fn language_parse_is_case_insensitive_and_reports_choices() {
        assert_eq!("ZH".parse::<Language>(), Ok(Language::Zh));
        let err = "xx".parse::<Language>().unwrap_err();
        assert!(err.contains("en, ru, es"));
    }

    #[test]
    fn default_settings_enable_memes_only() {
        let settings = Settings::with_system(Language::Fr, false);
        assert!(settings.memes_enabled);
        assert!(!settings.aggressive_mode);
        assert!(!settings.auto_mode);
        assert!(!settings.dark_mode);
        assert_eq!(settings.base_url, None);
    }

    #[test]
    fn blank_base_url_is_not_an_override() {
        let mut settings = Settings::default();
        settings.base_url = Some("   ".into());
        assert_eq!(settings.base_url_override(), None);
        settings.base_url = Some(" https://proxy.example ".into());
        assert_eq!(settings.base_url_override(), Some("https://proxy.example"));
    }

    #[test]
    fn toggles_flip_and_report_new_value() {
        let mut settings = Settings::default();
        assert!(settings.toggle(SettingToggle::Auto));
        assert!(settings.auto_mode);
        assert!(!settings.toggle(SettingToggle::Memes));
        assert!(!settings.memes_enabled);
        settings.set_flag(SettingToggle::Aggressive, true);
        assert!(settings.flag(SettingToggle::Aggressive));
    }

    #[test]
    fn toggle_keys_round_trip() {
        for toggle in SettingToggle::ALL {
            assert_eq!(SettingToggle::from_key(toggle.key()), Some(toggle));
        }
        assert_eq!(SettingToggle::from_key("theme"), None);
        assert_eq!(parse_switch("ON"), Some(true));
        assert_eq!(parse_switch("0"), Some(false));
        assert_eq!(parse_switch("maybe"), None);
    }
}
