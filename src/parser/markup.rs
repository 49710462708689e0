use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMPTY_PARAGRAPH: Regex = Regex::new(r"(?i)^<p[^>]*>\s*</p>").unwrap();
    static ref BLOCK_TAG: Regex = Regex::new(
        r"(?i)^</?(?:div|p|h[1-6]|li|ul|ol|blockquote|pre|section|article|header|footer|main|aside)\b[^>]*>"
    )
    .unwrap();
    static ref LINE_BREAK: Regex = Regex::new(r"(?i)^<br\s*/?>").unwrap();
    static ref ANY_TAG: Regex = Regex::new(r"^<[^<>]*>").unwrap();
    static ref ENTITY: Regex = Regex::new(r"^&(?:nbsp|amp|lt|gt|quot|#39);").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

fn decode_entity(entity: &str) -> char {
    match entity {
        "&nbsp;" => ' ',
        "&amp;" => '&',
        "&lt;" => '<',
        "&gt;" => '>',
        "&quot;" => '"',
        _ => '\'',
    }
}

/// What a piece of markup at the current position turns into.
enum Markup {
    /// Replaced by a single space.
    Boundary(usize),
    /// Deleted.
    Inline(usize),
    Entity(usize, char),
}

fn markup_at(rest: &str) -> Option<Markup> {
    if rest.starts_with('<') {
        if let Some(m) = EMPTY_PARAGRAPH
            .find(rest)
            .or_else(|| BLOCK_TAG.find(rest))
            .or_else(|| LINE_BREAK.find(rest))
        {
            return Some(Markup::Boundary(m.end()));
        }
        return ANY_TAG.find(rest).map(|m| Markup::Inline(m.end()));
    }
    if rest.starts_with('&') {
        return ENTITY
            .find(rest)
            .map(|m| Markup::Entity(m.end(), decode_entity(m.as_str())));
    }
    None
}

/// Markup-free text with, for every character, the character range of the
/// original input it was produced from.
#[derive(Debug, Clone)]
pub struct StrippedText {
    pub text: String,
    origins: Vec<(usize, usize)>,
    original_len: usize,
}

impl StrippedText {
    /// Map a character range of the stripped text back onto the original.
    pub fn original_range(&self, start: usize, end: usize) -> (usize, usize) {
        let origin_start = self
            .origins
            .get(start)
            .map(|&(s, _)| s)
            .unwrap_or(self.original_len);
        if end <= start {
            return (origin_start, origin_start);
        }
        let origin_end = self
            .origins
            .get(end - 1)
            .map(|&(_, e)| e)
            .unwrap_or(self.original_len);
        (origin_start, origin_end)
    }
}

/// Strip markup, keeping an offset map. Block boundaries become one space,
/// inline tags vanish, entities decode to a single character. Whitespace is
/// left as written so offsets stay meaningful.
pub fn strip_with_offsets(content: &str) -> StrippedText {
    let mut text = String::with_capacity(content.len());
    let mut origins = Vec::with_capacity(content.len());
    let mut byte = 0;
    let mut char_pos = 0;

    while byte < content.len() {
        let rest = &content[byte..];
        match markup_at(rest) {
            Some(markup) => {
                let (len, replacement) = match markup {
                    Markup::Boundary(len) => (len, Some(' ')),
                    Markup::Inline(len) => (len, None),
                    Markup::Entity(len, ch) => (len, Some(ch)),
                };
                let chars = rest[..len].chars().count();
                if let Some(ch) = replacement {
                    text.push(ch);
                    origins.push((char_pos, char_pos + chars));
                }
                byte += len;
                char_pos += chars;
            }
            None => {
                let ch = rest.chars().next().unwrap_or_default();
                text.push(ch);
                origins.push((char_pos, char_pos + 1));
                byte += ch.len_utf8().max(1);
                char_pos += 1;
            }
        }
    }

    StrippedText {
        text,
        origins,
        original_len: char_pos,
    }
}

/// Strip markup for counting: same substitutions as [`strip_with_offsets`],
/// then whitespace runs collapse to one space and the ends are trimmed.
pub fn strip_html(content: &str) -> String {
    let stripped = strip_with_offsets(content).text;
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}
