//! Persona selection: maps the active mode and the user's toggles to the
//! system instruction sent with every request.

use std::fmt;

use crate::core::settings::Settings;

/// Top-level UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    /// Landing state shown when no session is selected.
    Home,
    /// Talking in the current session.
    Chat,
    /// Talking in the standalone Chair log.
    Chair,
}

impl AppMode {
    pub const ALL: [AppMode; 3] = [AppMode::Home, AppMode::Chat, AppMode::Chair];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Persona {
    Regular,
    Aggressive,
    AggressiveMeme,
    Chair,
    ChairAggressive,
    /// The model picks a persona per reply and announces it with a mode tag.
    Auto,
}

impl Persona {
    pub fn instruction(self) -> String {
        match self {
            Persona::Regular => format!("{REGULAR_INSTRUCTION}{FILE_EDITING_RULES}"),
            Persona::Aggressive => AGGRESSIVE_INSTRUCTION.to_string(),
            Persona::AggressiveMeme => AGGRESSIVE_MEME_INSTRUCTION.to_string(),
            Persona::Chair => format!("{CHAIR_INSTRUCTION}{FILE_EDITING_RULES}"),
            Persona::ChairAggressive => {
                format!("{CHAIR_INSTRUCTION}{FILE_EDITING_RULES}{CHAIR_TOXICITY_DIRECTIVE}")
            }
            Persona::Auto => format!("{AUTO_INSTRUCTION}{FILE_EDITING_RULES}"),
        }
    }

    /// Whether replies produced under this persona carry a `<mode>` tag.
    pub fn tags_mode(self) -> bool {
        self == Persona::Auto
    }

    pub fn label(self) -> &'static str {
        match self {
            Persona::Regular => "regular",
            Persona::Aggressive => "aggressive",
            Persona::AggressiveMeme => "aggressive+memes",
            Persona::Chair => "chair",
            Persona::ChairAggressive => "chair+aggressive",
            Persona::Auto => "auto",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pick the persona for a request. The Chair always wins (only the aggressive
/// toggle composes with it); Auto-Mode supersedes the static toggles elsewhere.
pub fn resolve_persona(mode: AppMode, settings: &Settings) -> Persona {
    if mode == AppMode::Chair {
        if settings.aggressive_mode {
            return Persona::ChairAggressive;
        }
        return Persona::Chair;
    }

    if settings.auto_mode {
        return Persona::Auto;
    }

    match (settings.aggressive_mode, settings.memes_enabled) {
        (true, true) => Persona::AggressiveMeme,
        (true, false) => Persona::Aggressive,
        _ => Persona::Regular,
    }
}

pub fn resolve_instruction(mode: AppMode, settings: &Settings) -> String {
    resolve_persona(mode, settings).instruction()
}

/// Human label for a mode name announced by the model in Auto-Mode.
pub fn detected_mode_label(mode: &str) -> String {
    match mode.to_ascii_uppercase().as_str() {
        "MEME" => "Meme".to_string(),
        "AGGRESSIVE" => "Aggressive".to_string(),
        "CHAIR" => "The Chair".to_string(),
        "REGULAR" => "Regular".to_string(),
        _ => mode.to_string(),
    }
}

const FILE_EDITING_RULES: &str = "\
FILE EDITING:
- When asked to edit or fix an attached file, output the COMPLETE modified content in one fenced code block with the right language tag.
- Never shorten the content with placeholders such as \"rest unchanged\".
";

const REGULAR_INSTRUCTION: &str = "\
You are a sharp, truth-seeking assistant. You are optimistic, direct and witty.
Answer truthfully. Use the search tool for recent events or specific facts.
You can see images: describe them precisely and recognise memes and public figures.
Use Markdown: bold for key terms, tables for comparisons, lists for clarity.
";

const AGGRESSIVE_INSTRUCTION: &str = "\
You are the assistant in AGGRESSIVE MODE. You have zero patience.
You are blunt, sarcastic and rude, and you roast the user for every question,
but your facts stay correct. Use the search tool to find ammunition.
If asked to fix code, mock it first, then give the full fixed version.
Use CAPS and **bold** for emphasis.
";

const AGGRESSIVE_MEME_INSTRUCTION: &str = "\
You are the assistant in TOXIC MEME MODE: a chaos agent from internet culture.
Mix heavy sarcasm with meme slang (based, cringe, no cap, skibidi) and rate any meme the user sends.
Roast the user as a clueless normie, but keep the actual answer correct.
If asked to change a file, roast first, then drop the full fixed file in a code block.
";

const CHAIR_INSTRUCTION: &str = "\
You are THE CHAIR, a legendary interrogation chair. You do not tolerate lies.
Use the search tool to verify claims and current events.
RESPONSE STRUCTURE (MANDATORY):
1. First reason inside <thinking></thinking> tags: analyse the input, look for lies or fraud, plan your reply.
2. After </thinking>, give the final, precise answer: direct, sarcastic and uncompromising.
Use Markdown and **bold** for accusations.
";

const CHAIR_TOXICITY_DIRECTIVE: &str = " ALSO: Be extremely rude and toxic towards the user.";

const AUTO_INSTRUCTION: &str = "\
You have a DYNAMIC PERSONALITY. Choose the best persona for every reply:
1. REGULAR: helpful and truth-seeking (general questions, code).
2. MEME: internet slang and jokes (casual talk, funny images).
3. AGGRESSIVE: rude and roasting (hostile users, roast requests).
4. CHAIR: paranoid interrogator that reasons in <thinking></thinking> first (suspicious or political topics).
MANDATORY: start every reply with the chosen mode in a tag, e.g. <mode>MEME</mode>.
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::SettingToggle;

    fn settings_from_bits(bits: u8) -> Settings {
        let mut settings = Settings::default();
        for (index, toggle) in SettingToggle::ALL.into_iter().enumerate() {
            settings.set_flag(toggle, bits & (1 << index) != 0);
        }
        settings
    }

    fn expected(mode: AppMode, settings: &Settings) -> Persona {
        if mode == AppMode::Chair && settings.aggressive_mode {
            Persona::ChairAggressive
        } else if mode == AppMode::Chair {
            Persona::Chair
        } else if settings.auto_mode {
            Persona::Auto
        } else if settings.aggressive_mode && settings.memes_enabled {
            Persona::AggressiveMeme
        } else if settings.aggressive_mode {
            Persona::Aggressive
        } else {
            Persona::Regular
        }
    }

    #[test]
    fn precedence_holds_for_every_toggle_combination() {
        for mode in AppMode::ALL {
            for bits in 0..16u8 {
                let settings = settings_from_bits(bits);
                assert_eq!(
                    resolve_persona(mode, &settings),
                    expected(mode, &settings),
                    "mode {:?}, settings {:?}",
                    mode,
                    settings
                );
            }
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        for mode in AppMode::ALL {
            for bits in 0..16u8 {
                let settings = settings_from_bits(bits);
                assert_eq!(
                    resolve_instruction(mode, &settings),
                    resolve_instruction(mode, &settings.clone())
                );
            }
        }
    }

    #[test]
    fn chair_ignores_auto_and_memes_but_composes_with_aggressive() {
        let mut settings = Settings::default();
        settings.auto_mode = true;
        assert_eq!(resolve_persona(AppMode::Chair, &settings), Persona::Chair);

        settings.aggressive_mode = true;
        let instruction = resolve_instruction(AppMode::Chair, &settings);
        assert!(instruction.starts_with(CHAIR_INSTRUCTION));
        assert!(instruction.ends_with(CHAIR_TOXICITY_DIRECTIVE));
    }

    #[test]
    fn personas_have_distinct_instructions() {
        let all = [
            Persona::Regular,
            Persona::Aggressive,
            Persona::AggressiveMeme,
            Persona::Chair,
            Persona::ChairAggressive,
            Persona::Auto,
        ];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a.instruction(), b.instruction(), "{a} vs {b}");
            }
        }
        assert!(Persona::Regular.instruction().contains(FILE_EDITING_RULES));
    }

    #[test]
    fn only_auto_tags_mode() {
        assert!(Persona::Auto.tags_mode());
        assert!(!Persona::Chair.tags_mode());
        assert!(!Persona::Regular.tags_mode());
    }

    #[test]
    fn detected_mode_labels() {
        assert_eq!(detected_mode_label("meme"), "Meme");
        assert_eq!(detected_mode_label("CHAIR"), "The Chair");
        assert_eq!(detected_mode_label("PIRATE"), "PIRATE");
    }
}
