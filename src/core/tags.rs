//! Inline markers the model embeds in reply text: `<mode>NAME</mode>` in
//! Auto-Mode and `<thinking>...</thinking>` reasoning blocks.

const MODE_OPEN: &str = "<mode>";
const MODE_CLOSE: &str = "</mode>";
const THINKING_OPEN: &str = "<thinking>";
const THINKING_CLOSE: &str = "</thinking>";

/// Reply text with the mode marker removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedReply {
    pub text: String,
    pub detected_mode: Option<String>,
}

/// Extract the first `<mode>NAME</mode>` marker. The name is taken as-is
/// (trimmed); an absent, unterminated or empty marker leaves the text alone.
pub fn extract_mode_tag(raw: &str) -> TaggedReply {
    let untouched = || TaggedReply {
        text: raw.to_string(),
        detected_mode: None,
    };

    let Some(open) = raw.find(MODE_OPEN) else {
        return untouched();
    };
    let name_start = open + MODE_OPEN.len();
    let Some(close_offset) = raw[name_start..].find(MODE_CLOSE) else {
        return untouched();
    };
    let name_end = name_start + close_offset;
    let name = raw[name_start..name_end].trim();
    // The name must stay on one line, otherwise this is not a tag we emitted.
    if name.is_empty() || name.contains('\n') {
        return untouched();
    }

    let marker_end = name_end + MODE_CLOSE.len();
    let mut text = String::with_capacity(raw.len());
    text.push_str(&raw[..open]);
    text.push_str(&raw[marker_end..]);

    TaggedReply {
        text: text.trim().to_string(),
        detected_mode: Some(name.to_string()),
    }
}

/// A stored AI message split into its reasoning and final answer for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingSplit {
    pub reasoning: Option<String>,
    pub answer: String,
}

/// Split off the first complete `<thinking>` block. Without one, the whole
/// text is the answer.
pub fn split_thinking(text: &str) -> ThinkingSplit {
    let whole = || ThinkingSplit {
        reasoning: None,
        answer: text.to_string(),
    };

    let Some(open) = text.find(THINKING_OPEN) else {
        return whole();
    };
    let body_start = open + THINKING_OPEN.len();
    let Some(close_offset) = text[body_start..].find(THINKING_CLOSE) else {
        return whole();
    };
    let body_end = body_start + close_offset;

    let mut answer = String::with_capacity(text.len());
    answer.push_str(&text[..open]);
    answer.push_str(&text[body_end + THINKING_CLOSE.len()..]);

    ThinkingSplit {
        reasoning: Some(text[body_start..body_end].trim().to_string()),
        answer: answer.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_prefix_is_extracted_and_stripped() {
        let reply = extract_mode_tag("<mode>MEME</mode>hello");
        assert_eq!(reply.text, "hello");
        assert_eq!(reply.detected_mode.as_deref(), Some("MEME"));
    }

    #[test]
    fn text_without_marker_is_unchanged() {
        let reply = extract_mode_tag("  plain reply \n");
        assert_eq!(reply.text, "  plain reply \n");
        assert_eq!(reply.detected_mode, None);
    }

    #[test]
    fn marker_in_the_middle_is_honoured() {
        let reply = extract_mode_tag("Sure. <mode> chair </mode>\nStop lying.");
        assert_eq!(reply.text, "Sure. \nStop lying.");
        assert_eq!(reply.detected_mode.as_deref(), Some("chair"));
    }

    #[test]
    fn unknown_mode_names_are_trusted() {
        let reply = extract_mode_tag("<mode>PIRATE</mode> Arr");
        assert_eq!(reply.detected_mode.as_deref(), Some("PIRATE"));
        assert_eq!(reply.text, "Arr");
    }

    #[test]
    fn malformed_markers_leave_mode_unset() {
        for raw in [
            "<mode>MEME hello",
            "<mode></mode>hello",
            "<mode>  </mode>hello",
            "</mode>MEME<mode>",
            "<mode>ME\nME</mode>x",
        ] {
            let reply = extract_mode_tag(raw);
            assert_eq!(reply.detected_mode, None, "{raw}");
            assert_eq!(reply.text, raw);
        }
    }

    #[test]
    fn only_first_marker_is_removed() {
        let reply = extract_mode_tag("<mode>A</mode>x<mode>B</mode>");
        assert_eq!(reply.detected_mode.as_deref(), Some("A"));
        assert_eq!(reply.text, "x<mode>B</mode>");
    }

    #[test]
    fn thinking_block_splits_reasoning_from_answer() {
        let split = split_thinking("<thinking>\n99% fraud.\n</thinking>\nStop lying.");
        assert_eq!(split.reasoning.as_deref(), Some("99% fraud."));
        assert_eq!(split.answer, "Stop lying.");
    }

    #[test]
    fn thinking_split_is_independent_of_mode_tag() {
        let tagged = extract_mode_tag("<mode>CHAIR</mode><thinking>hmm</thinking>No.");
        let split = split_thinking(&tagged.text);
        assert_eq!(tagged.detected_mode.as_deref(), Some("CHAIR"));
        assert_eq!(split.reasoning.as_deref(), Some("hmm"));
        assert_eq!(split.answer, "No.");
    }

    #[test]
    fn unterminated_thinking_is_all_answer() {
        let split = split_thinking("<thinking>never closed");
        assert_eq!(split.reasoning, None);
        assert_eq!(split.answer, "<thinking>never closed");
    }
}
