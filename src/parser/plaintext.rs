use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

use crate::parser::markup::{strip_with_offsets, StrippedText};
use crate::parser::TextIndex;
use crate::{SentenceSpan, Token};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\p{L}+").unwrap();
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]+(?:\s+|$)").unwrap();
}

/// Lazy word iterator. Offsets always address the original input, even when
/// markup was stripped first; `text` is the word as it reads after stripping.
pub struct Words<'a> {
    source: Cow<'a, str>,
    stripped: Option<StrippedText>,
    byte: usize,
    chars_seen: usize,
}

impl<'a> Iterator for Words<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let m = WORD.find_at(&self.source, self.byte)?;
        let text = m.as_str().to_string();

        self.chars_seen += self.source[self.byte..m.start()].chars().count();
        let start = self.chars_seen;
        let end = start + text.chars().count();
        self.chars_seen = end;
        self.byte = m.end();

        let (start, end) = match &self.stripped {
            Some(map) => map.original_range(start, end),
            None => (start, end),
        };
        Some(Token { text, start, end })
    }
}

/// Words of raw text, no markup handling.
pub fn words(text: &str) -> Words<'_> {
    Words {
        source: Cow::Borrowed(text),
        stripped: None,
        byte: 0,
        chars_seen: 0,
    }
}

pub fn tokenize(text: &str, strip_markup: bool) -> Words<'_> {
    if !strip_markup {
        return words(text);
    }
    let mut stripped = strip_with_offsets(text);
    let source = std::mem::take(&mut stripped.text);
    Words {
        source: Cow::Owned(source),
        stripped: Some(stripped),
        byte: 0,
        chars_seen: 0,
    }
}

/// Split into sentences on runs of `.`, `!`, `?` followed by whitespace or
/// the end of text. The terminal punctuation belongs to the sentence; the
/// whitespace around it does not. A trailing fragment is kept.
pub fn sentences(text: &str, strip_markup: bool) -> Vec<SentenceSpan> {
    if strip_markup {
        let stripped = strip_with_offsets(text);
        split_sentences(&stripped.text, Some(&stripped))
    } else {
        split_sentences(text, None)
    }
}

fn split_sentences(source: &str, map: Option<&StrippedText>) -> Vec<SentenceSpan> {
    let index = TextIndex::new(source);
    let mut spans = Vec::new();

    let mut push = |from: usize, to: usize| {
        let slice = &source[from..to];
        let trimmed_start = from + (slice.len() - slice.trim_start().len());
        let trimmed_end = from + slice.trim_end().len();
        if trimmed_start >= trimmed_end {
            return;
        }
        let start = index.char_offset(trimmed_start);
        let end = index.char_offset(trimmed_end);
        let (start, end) = map.map_or((start, end), |m| m.original_range(start, end));
        spans.push(SentenceSpan {
            text: source[trimmed_start..trimmed_end].to_string(),
            start,
            end,
        });
    };

    let mut last = 0;
    for m in SENTENCE_END.find_iter(source) {
        let punctuation = m.as_str().trim_end().len();
        push(last, m.start() + punctuation);
        last = m.end();
    }
    if last < source.len() {
        push(last, source.len());
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str, start: usize, end: usize) -> String {
        text.chars().skip(start).take(end - start).collect()
    }

    #[test]
    fn test_words_with_offsets() {
        let text = "Он сказал, что придёт.";
        let tokens: Vec<Token> = words(text).collect();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Он", "сказал", "что", "придёт"]);
        for token in &tokens {
            assert_eq!(chars(text, token.start, token.end), token.text);
        }
        assert_eq!(tokens[2].start, 11);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(words("").count(), 0);
        assert!(sentences("", false).is_empty());
        assert!(sentences("   ", true).is_empty());
    }

    #[test]
    fn test_words_skip_digits_and_punctuation() {
        let texts: Vec<String> = words("test123 hello_world, 42!").map(|t| t.text).collect();
        assert_eq!(texts, vec!["test", "hello", "world"]);
    }

    #[test]
    fn test_markup_tokens_map_to_original() {
        let text = "<p>Привет <i>мир</i></p>";
        let tokens: Vec<Token> = tokenize(text, true).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "мир");
        assert_eq!(chars(text, tokens[1].start, tokens[1].end), "мир");
        assert_eq!(chars(text, tokens[0].start, tokens[0].end), "Привет");
    }

    #[test]
    fn test_sentence_spans() {
        let text = "Привет, мир!  Как дела? Хорошо";
        let spans = sentences(text, false);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].text, "Привет, мир!");
        assert_eq!(spans[1].text, "Как дела?");
        assert_eq!(spans[2].text, "Хорошо");
        for span in &spans {
            assert_eq!(chars(text, span.start, span.end), span.text);
        }
    }

    #[test]
    fn test_sentence_needs_whitespace_after_terminator() {
        let spans = sentences("Версия 1.2 вышла... Ура!", false);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "Версия 1.2 вышла...");
    }

    #[test]
    fn test_sentences_through_markup() {
        let text = "<p>Первое.</p><p>Второе.</p>";
        let spans = sentences(text, true);
        assert_eq!(spans.len(), 2);
        assert_eq!(chars(text, spans[1].start, spans[1].end), "Второе.");
    }
}
