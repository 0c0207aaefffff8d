use regex::Regex;
use std::sync::LazyLock;

static BOLD_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));
static ITALIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic pattern"));
static INLINE_CODE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.*?)`").expect("valid code pattern"));
static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{1,6}\s*(.*?)(?:\n|$)").expect("valid heading pattern"));
static LINK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("valid link pattern"));
static LIST_BULLET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").expect("valid bullet pattern"));
static NUMBERED_LIST_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+\.\s+").expect("valid numbered list pattern"));
static PARAGRAPH_BREAK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{2,}").expect("valid paragraph pattern"));
static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Strip markdown, emoji and list syntax so the text reads naturally when spoken.
///
/// LLM answers are formatted for the chat UI (bold, headings, bullets); none of
/// that should reach the synthesizer. Paragraph breaks become sentence breaks so
/// the voice still pauses between them.
pub fn normalize(text: &str) -> String {
    let text = BOLD_PATTERN.replace_all(text, "${1}");
    let text = ITALIC_PATTERN.replace_all(&text, "${1}");
    let text = INLINE_CODE_PATTERN.replace_all(&text, "${1}");
    let text = HEADING_PATTERN.replace_all(&text, "${1}. ");
    let text = LINK_PATTERN.replace_all(&text, "${1}");
    let text = LIST_BULLET_PATTERN.replace_all(&text, "");
    let text = NUMBERED_LIST_PATTERN.replace_all(&text, "");

    let text: String = text
        .chars()
        .filter(|c| !is_emoji(*c) && !is_bullet_glyph(*c))
        .collect();
    let text = text.replace("---", "");

    let text = PARAGRAPH_BREAK_PATTERN.replace_all(&text, ". ");
    let text = text.replace('\n', " ");
    let text = WHITESPACE_PATTERN.replace_all(&text, " ");

    text.trim().to_string()
}

fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F600..=0x1F64F // emoticons
            | 0x1F300..=0x1F5FF // symbols & pictographs
            | 0x1F680..=0x1F6FF // transport & map
            | 0x1F1E0..=0x1F1FF // flags
            | 0x2600..=0x26FF // misc symbols
            | 0x2700..=0x27BF // dingbats
            | 0x1F900..=0x1F9FF
            | 0x1FA70..=0x1FAFF
    )
}

fn is_bullet_glyph(c: char) -> bool {
    matches!(c, '•' | '◦' | '▪' | '▫')
}
