//! Document statistics shown next to the grammar findings: word, character,
//! paragraph and sentence counts plus an estimated reading time.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::checker::cache::{cache_key, AnalysisCache, CacheStats, DEFAULT_CACHE_SIZE};
use crate::config::AnalysisOptions;
use crate::error::EngineError;
use crate::parser::strip_html;

/// Words per minute used when no reading speed is given.
pub const DEFAULT_READING_SPEED: u32 = 200;
const MIN_WORDS_PER_SENTENCE: usize = 1;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}]{2,}").unwrap();
    static ref SENTENCE_SEPARATORS: Regex = Regex::new(r"[.!?]+").unwrap();
    static ref PARAGRAPH_BREAK: Regex =
        Regex::new(r"(?i)</p>|<br\s*/?>\s*<br\s*/?>|\n\s*\n").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s").unwrap();
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStatistics {
    pub words: usize,
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub paragraphs: usize,
    pub sentences: usize,
    /// Minutes, rounded up.
    pub reading_time: usize,
    pub average_words_per_sentence: f64,
    pub average_sentences_per_paragraph: f64,
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn plain_text(content: &str, include_html: bool) -> String {
    if include_html {
        content.to_string()
    } else {
        strip_html(content)
    }
}

/// A compiled override pattern. Invalid patterns are logged and ignored.
fn separator_override(pattern: Result<Option<Regex>, EngineError>) -> Option<Regex> {
    pattern.unwrap_or_else(|err| {
        warn!(error = %err, "ignoring invalid separator pattern");
        None
    })
}

/// Counts words in already plain text.
fn count_words(text: &str, separators: Option<&Regex>) -> usize {
    if text.trim().is_empty() {
        return 0;
    }
    match separators {
        Some(separators) => separators
            .split(text)
            .filter(|piece| piece.chars().any(char::is_alphanumeric))
            .count(),
        None => WORD.find_iter(text).count(),
    }
}

/// Text statistics with a bounded result cache for [`TextAnalyzer::analyze_text`].
#[derive(Debug)]
pub struct TextAnalyzer {
    cache: AnalysisCache<TextStatistics>,
}

impl TextAnalyzer {
    pub fn new(cache_size: usize) -> Self {
        Self {
            cache: AnalysisCache::new(cache_size),
        }
    }

    /// Runs of two or more letters or digits. Markup is stripped first
    /// unless `includeHtml` is set; `wordSeparators` replaces the matcher
    /// with a splitter.
    pub fn word_count(&self, content: &str, options: &AnalysisOptions) -> usize {
        let text = plain_text(content, options.include_html());
        let separators = separator_override(options.word_pattern());
        count_words(&text, separators.as_ref())
    }

    pub fn character_count(&self, content: &str, include_spaces: bool, include_html: bool) -> usize {
        let text = plain_text(content, include_html);
        if include_spaces {
            text.chars().count()
        } else {
            WHITESPACE.replace_all(&text, "").chars().count()
        }
    }

    /// Minutes needed at `reading_speed` words per minute, rounded up.
    pub fn reading_time(&self, content: &str, reading_speed: Option<u32>) -> usize {
        let speed = reading_speed.filter(|&s| s > 0).unwrap_or(DEFAULT_READING_SPEED) as usize;
        let words = self.word_count(content, &AnalysisOptions::default());
        words.div_ceil(speed)
    }

    /// Blocks separated by blank lines. With `include_html` the raw markup
    /// also splits on `</p>` and double `<br>`; otherwise each piece is
    /// stripped before deciding whether it is empty.
    pub fn paragraph_count(&self, content: &str, include_html: bool) -> usize {
        if include_html {
            return PARAGRAPH_BREAK
                .split(content)
                .filter(|p| !p.trim().is_empty())
                .count();
        }
        PARAGRAPH_BREAK
            .split(content)
            .filter(|p| !strip_html(p).is_empty())
            .count()
    }

    pub fn sentence_count(&self, content: &str, options: &AnalysisOptions) -> usize {
        let text = plain_text(content, options.include_html());
        if text.trim().is_empty() {
            return 0;
        }

        let custom = separator_override(options.sentence_pattern());
        let separators = custom.as_ref().unwrap_or(&*SENTENCE_SEPARATORS);
        let word_separators = separator_override(options.word_pattern());
        let min_words = options
            .min_words_per_sentence
            .filter(|&n| n > 0)
            .unwrap_or(MIN_WORDS_PER_SENTENCE);

        separators
            .split(&text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter(|s| count_words(s, word_separators.as_ref()) >= min_words)
            .count()
    }

    /// All statistics at once, cached by content and options.
    pub fn analyze_text(&self, content: &str, options: &AnalysisOptions) -> TextStatistics {
        let key = cache_key(content, options);
        if let Some(stats) = self.cache.get(&key) {
            return stats;
        }

        let include_html = options.include_html();
        let words = self.word_count(content, options);
        let paragraphs = self.paragraph_count(content, include_html);
        let sentences = self.sentence_count(content, options);
        let speed = options.reading_speed.filter(|&s| s > 0).unwrap_or(DEFAULT_READING_SPEED) as usize;

        let stats = TextStatistics {
            words,
            characters: self.character_count(content, true, include_html),
            characters_no_spaces: self.character_count(content, false, include_html),
            paragraphs,
            sentences,
            reading_time: words.div_ceil(speed),
            average_words_per_sentence: if sentences > 0 {
                round_tenths(words as f64 / sentences as f64)
            } else {
                0.0
            },
            average_sentences_per_paragraph: if paragraphs > 0 {
                round_tenths(sentences as f64 / paragraphs as f64)
            } else {
                0.0
            },
        };

        self.cache.set(key, stats);
        stats
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}
