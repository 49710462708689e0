pub mod markup;
pub mod plaintext;

use unicode_segmentation::UnicodeSegmentation;

pub use markup::{strip_html, strip_with_offsets, StrippedText};
pub use plaintext::{sentences, tokenize, words, Words};

/// Graphemes of surrounding text kept on each side of an error span.
const CONTEXT_WINDOW: usize = 20;

/// Byte/character offset conversion for one text.
///
/// Regex matches report byte offsets; every public offset in this crate is a
/// character offset, so rules build one index per `check` call.
#[derive(Debug, Clone)]
pub struct TextIndex<'a> {
    text: &'a str,
    boundaries: Vec<usize>,
}

impl<'a> TextIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let boundaries = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, boundaries }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Character offset of a byte offset. Offsets inside a multi-byte
    /// character resolve to the next character boundary.
    pub fn char_offset(&self, byte: usize) -> usize {
        self.boundaries.partition_point(|&b| b < byte)
    }

    pub fn byte_offset(&self, char_offset: usize) -> usize {
        self.boundaries[char_offset.min(self.char_len())]
    }

    pub fn slice_chars(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.byte_offset(start)..self.byte_offset(end.max(start))]
    }
}

/// Surrounding text for a byte range, with `...` where the window was cut.
pub fn get_context(text: &str, start: usize, end: usize) -> String {
    let before: Vec<&str> = text[..start].graphemes(true).collect();
    let after: Vec<&str> = text[end..].graphemes(true).collect();

    let lead = before.len().saturating_sub(CONTEXT_WINDOW);
    let trail = after.len().min(CONTEXT_WINDOW);
    let context = format!(
        "{}{}{}",
        before[lead..].concat(),
        &text[start..end],
        after[..trail].concat()
    );

    match (lead > 0, trail < after.len()) {
        (true, true) => format!("...{}...", context),
        (true, false) => format!("...{}", context),
        (false, true) => format!("{}...", context),
        (false, false) => context,
    }
}
