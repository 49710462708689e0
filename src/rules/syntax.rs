use lazy_static::lazy_static;
use regex::{Match, Regex};

use super::{is_verb_like, Example, GrammarRule, RuleMeta};
use crate::parser::{sentences, TextIndex};
use crate::{ErrorType, GrammarError, Severity};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"\p{L}+").unwrap();
    static ref SUBORDINATE: Regex =
        Regex::new(r"([а-яёА-ЯЁ]+)(\s+)(что|чтобы|когда|если|хотя|потому что|так как)\s").unwrap();
    static ref COMPOUND: Regex =
        Regex::new(r"(\p{L}+)(\s+)(а|но|или|либо|да)\s+(\p{L}+)(?:\s+(\p{L}+))?").unwrap();
    static ref APPOSITION: Regex = Regex::new(
        r"\b([а-яё]{2,}ой)\s+([а-яё]+(?:ицей|ельницей|телем|ником|ницей|истом|исткой))\b"
    )
    .unwrap();
    static ref LINKING_WORD: Regex =
        Regex::new(r"([А-ЯЁа-яё]+)(\s+)(это|вот|значит)\s+[а-яё]").unwrap();
    static ref RELATIVE_PRONOUN: Regex = Regex::new(
        r"(?i)([а-яё]+)(\s+)(?:(?:в|на|со|с|об|о|по|ко|к|у|из|за|от|до|для|при|про|без|под|над|через|перед|между)\s+)?(котор(?:ый|ая|ое|ые|ого|ой|ому|ым|ом|ую|ых|ыми))\b"
    )
    .unwrap();
    static ref RELATIVE_PRONOUN_AFTER_COMMA: Regex =
        Regex::new(r"(?i),\s*(?:[а-яё]+\s+)?котор(?:ый|ая|ое|ые|ого|ой|ому|ым|ом|ую|ых|ыми)\b").unwrap();
    static ref TEMPORAL_OPENER: Regex =
        Regex::new(r"^(?:Когда|Пока|После того как|До того как|В то время как)\s").unwrap();
    static ref COLON_LIST: Regex = Regex::new(r"(\p{L}+):\s*(\p{L}+):\s*(\p{L}+)").unwrap();
    static ref MISSING_QUOTES: Regex = Regex::new(
        r"(?:сказал|сказала|говорил|говорила|спросил|спросила|ответил|ответила|крикнул|крикнула|шепнул|шепнула):\s+([А-ЯЁ][а-яё\s]*[.!?])"
    )
    .unwrap();
    static ref STRAIGHT_QUOTES: Regex = Regex::new(r#""([^"]+)""#).unwrap();
    static ref AUTHOR_AFTER_SPEECH: Regex = Regex::new(
        r#"(?:«[^»]+»|"[^"]+")([,.!?]?)(\s*)(—?)\s*(?:сказал|сказала|говорил|говорила|спросил|спросила|ответил|ответила|крикнул|крикнула|шепнул|шепнула|воскликнул|воскликнула)\b"#
    )
    .unwrap();
}

/// The first character of a whitespace run as a byte range.
fn first_whitespace(gap: Match<'_>) -> Option<(usize, usize)> {
    let c = gap.as_str().chars().next().filter(|c| c.is_whitespace())?;
    Some((gap.start(), gap.start() + c.len_utf8()))
}

fn at_sentence_start(text: &str, byte: usize) -> bool {
    let before = text[..byte].trim_end();
    before.is_empty() || before.ends_with(['.', '!', '?'])
}

static PUNCTUATION_META: RuleMeta = RuleMeta {
    id: "punctuation_rule",
    error_type: ErrorType::Punctuation,
    subtype: Some("comma"),
    description: "Запятые и тире в сложных предложениях",
    explanation: "Придаточные части и части сложносочинённого предложения отделяются запятыми",
    examples: &[
        Example {
            wrong: "Я знаю что ты прав",
            correct: "Я знаю, что ты прав",
        },
        Example {
            wrong: "Москва столица России",
            correct: "Москва — столица России",
        },
        Example {
            wrong: "Он пришёл а она ушла",
            correct: "Он пришёл, а она ушла",
        },
    ],
    severity: Severity::Warning,
    confidence: 0.8,
    enabled: true,
};

const NO_COMMA_BEFORE: &[&str] = &[
    "потому", "так", "и", "а", "но", "или", "да", "не", "лишь", "только", "даже", "именно", "как",
    "чем",
];

const NOT_A_SUBJECT: &[&str] = &[
    "что", "кто", "как", "где", "это", "вот", "и", "а", "но", "я", "ты", "он", "она", "оно", "мы",
    "вы", "они", "так", "все", "всё", "тут", "там",
];

const PREDICATE_NOUNS: &[&str] = &[
    "столица", "город", "страна", "река", "птица", "зверь", "планета", "наука", "учительница",
    "учитель", "врач", "писатель", "поэт", "инженер", "дерево",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct PunctuationRule;

impl PunctuationRule {
    fn subordinate_clauses(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        let text = index.text();
        for caps in SUBORDINATE.captures_iter(text) {
            let (Some(word), Some(gap), Some(conjunction)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            if NO_COMMA_BEFORE.contains(&word.as_str().to_lowercase().as_str()) {
                continue;
            }
            let Some((start, end)) = first_whitespace(gap) else { continue };
            errors.push(PUNCTUATION_META.error_bytes(
                index,
                start,
                end,
                format!("Перед союзом \"{}\" нужна запятая", conjunction.as_str()),
                vec![", ".to_string()],
            ));
        }
    }

    fn compound_clauses(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        let text = index.text();
        for caps in COMPOUND.captures_iter(text) {
            let (Some(left), Some(gap), Some(conjunction)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            let right_is_verb = caps.get(4).is_some_and(|w| is_verb_like(w.as_str()))
                || caps.get(5).is_some_and(|w| is_verb_like(w.as_str()));
            if !is_verb_like(left.as_str()) || !right_is_verb {
                continue;
            }
            let Some((start, end)) = first_whitespace(gap) else { continue };
            errors.push(
                PUNCTUATION_META
                    .error_bytes(
                        index,
                        start,
                        end,
                        format!("Перед союзом \"{}\" в сложном предложении нужна запятая", conjunction.as_str()),
                        vec![", ".to_string()],
                    )
                    .with_confidence(PUNCTUATION_META.confidence * 0.7),
            );
        }
    }

    fn apposition(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        const ADJECTIVE_LIKE: &[&str] = &["ской", "цкой", "ной", "шой", "жой", "чой", "щой", "кой", "гой", "хой"];
        for caps in APPOSITION.captures_iter(index.text()) {
            let (Some(whole), Some(head), Some(attached)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            if ADJECTIVE_LIKE.iter().any(|e| head.as_str().ends_with(e)) {
                continue;
            }
            errors.push(
                PUNCTUATION_META
                    .error_bytes(
                        index,
                        whole.start(),
                        whole.end(),
                        "Приложение присоединяется через дефис",
                        vec![format!("{}-{}", head.as_str(), attached.as_str())],
                    )
                    .with_subtype("dash")
                    .with_confidence(PUNCTUATION_META.confidence * 0.8),
            );
        }
    }

    fn linking_dash(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        let text = index.text();
        for caps in LINKING_WORD.captures_iter(text) {
            let (Some(subject), Some(gap), Some(link)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            if !at_sentence_start(text, subject.start())
                || NOT_A_SUBJECT.contains(&subject.as_str().to_lowercase().as_str())
            {
                continue;
            }
            let Some((start, end)) = first_whitespace(gap) else { continue };
            errors.push(
                PUNCTUATION_META
                    .error_bytes(
                        index,
                        start,
                        end,
                        format!("Перед словом \"{}\" ставится тире", link.as_str()),
                        vec![" — ".to_string()],
                    )
                    .with_subtype("dash")
                    .with_confidence(PUNCTUATION_META.confidence * 0.9),
            );
        }
    }

    fn subject_predicate_dash(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        let text = index.text();
        for sentence in sentences(text, false) {
            let base = index.byte_offset(sentence.start);
            let mut found = WORD.find_iter(&sentence.text);
            let (Some(subject), Some(predicate)) = (found.next(), found.next()) else { continue };

            let starts_upper = subject.as_str().chars().next().is_some_and(char::is_uppercase);
            if subject.start() != 0
                || !starts_upper
                || NOT_A_SUBJECT.contains(&subject.as_str().to_lowercase().as_str())
                || !PREDICATE_NOUNS.contains(&predicate.as_str())
            {
                continue;
            }
            let gap = &sentence.text[subject.end()..predicate.start()];
            if gap.is_empty() || !gap.chars().all(char::is_whitespace) {
                continue;
            }
            let start = base + subject.end();
            let width = gap.chars().next().map_or(1, char::len_utf8);
            errors.push(
                PUNCTUATION_META
                    .error_bytes(
                        index,
                        start,
                        start + width,
                        "Между подлежащим и сказуемым, выраженными существительными, ставится тире",
                        vec![" — ".to_string()],
                    )
                    .with_subtype("dash")
                    .with_confidence(PUNCTUATION_META.confidence * 0.6),
            );
        }
    }
}

impl GrammarRule for PunctuationRule {
    fn meta(&self) -> &RuleMeta {
        &PUNCTUATION_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();
        self.subordinate_clauses(&index, &mut errors);
        self.compound_clauses(&index, &mut errors);
        self.apposition(&index, &mut errors);
        self.linking_dash(&index, &mut errors);
        self.subject_predicate_dash(&index, &mut errors);
        errors
    }
}

static COMPLEX_SENTENCE_META: RuleMeta = RuleMeta {
    id: "complex_sentence_rule",
    error_type: ErrorType::Syntax,
    subtype: Some("clause_structure"),
    description: "Пунктуация в сложноподчинённых предложениях",
    explanation: "Придаточное предложение выделяется запятыми с обеих сторон",
    examples: &[
        Example {
            wrong: "Дом который построил Джек",
            correct: "Дом, который построил Джек",
        },
        Example {
            wrong: "Когда я пришёл домой все спали",
            correct: "Когда я пришёл домой, все спали",
        },
    ],
    severity: Severity::Warning,
    confidence: 0.75,
    enabled: true,
};

const PREPOSITIONS: &[&str] = &[
    "в", "на", "с", "со", "о", "об", "по", "к", "ко", "у", "из", "за", "от", "до", "для", "при", "про",
    "без", "под", "над", "через", "перед", "между",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct ComplexSentenceRule;

impl ComplexSentenceRule {
    fn relative_clauses(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        let text = index.text();
        for caps in RELATIVE_PRONOUN.captures_iter(text) {
            let (Some(word), Some(gap), Some(pronoun)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            // ", в котором": the comma already stands before the preposition.
            if PREPOSITIONS.contains(&word.as_str().to_lowercase().as_str()) {
                continue;
            }
            if let Some((start, end)) = first_whitespace(gap) {
                errors.push(COMPLEX_SENTENCE_META.error_bytes(
                    index,
                    start,
                    end,
                    format!("Перед словом \"{}\" нужна запятая", pronoun.as_str()),
                    vec![", ".to_string()],
                ));
            }
            self.clause_end(index, pronoun.end(), errors);
        }

        // Relative clauses already opened with a comma still need closing.
        for pronoun in RELATIVE_PRONOUN_AFTER_COMMA.find_iter(text) {
            self.clause_end(index, pronoun.end(), errors);
        }
    }

    /// The comma after the first verb of a relative clause, when the
    /// sentence continues past it.
    fn clause_end(&self, index: &TextIndex<'_>, from: usize, errors: &mut Vec<GrammarError>) {
        let text = index.text();
        let rest = &text[from..];
        let clause = &rest[..rest.find(['.', '!', '?', ';']).unwrap_or(rest.len())];
        let found: Vec<Match<'_>> = WORD.find_iter(clause).collect();
        let Some(verb) = found.iter().position(|w| is_verb_like(w.as_str())) else { return };
        let Some(next) = found.get(verb + 1) else { return };

        let gap = &clause[found[verb].end()..next.start()];
        if gap.is_empty() || !gap.chars().all(char::is_whitespace) {
            return;
        }
        let start = from + found[verb].end();
        let width = gap.chars().next().map_or(1, char::len_utf8);
        errors.push(
            COMPLEX_SENTENCE_META
                .error_bytes(
                    index,
                    start,
                    start + width,
                    "Придаточное предложение нужно закрыть запятой",
                    vec![", ".to_string()],
                )
                .with_confidence(COMPLEX_SENTENCE_META.confidence * 0.8),
        );
    }

    fn temporal_clauses(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        for sentence in sentences(index.text(), false) {
            let Some(opener) = TEMPORAL_OPENER.find(&sentence.text) else { continue };
            let rest = &sentence.text[opener.end()..];
            let segment_len = rest.find([',', ';', ':', '—', '.', '!', '?']).unwrap_or(rest.len());
            if rest[segment_len..].starts_with([',', ';', ':', '—']) {
                continue;
            }
            let segment = &rest[..segment_len];
            let found: Vec<Match<'_>> = WORD.find_iter(segment).collect();

            let Some(first_verb) = found.iter().position(|w| is_verb_like(w.as_str())) else { continue };
            let second_verb = found
                .iter()
                .skip(first_verb + 1)
                .position(|w| is_verb_like(w.as_str()))
                .map(|p| p + first_verb + 1);
            // Comma before the main clause: ahead of the word preceding its
            // verb, or ahead of the verb itself when that word is the first verb.
            let boundary = match second_verb {
                Some(second) if second - 1 > first_verb => second - 1,
                Some(second) => second,
                None if first_verb + 1 < found.len() => first_verb + 1,
                None => continue,
            };

            let gap_start = found[boundary - 1].end();
            let gap = &segment[gap_start..found[boundary].start()];
            if gap.is_empty() || !gap.chars().all(char::is_whitespace) {
                continue;
            }
            let start = index.byte_offset(sentence.start) + opener.end() + gap_start;
            let width = gap.chars().next().map_or(1, char::len_utf8);
            errors.push(COMPLEX_SENTENCE_META.error_bytes(
                index,
                start,
                start + width,
                "Придаточное времени отделяется запятой",
                vec![", ".to_string()],
            ));
        }
    }

    fn colon_lists(&self, index: &TextIndex<'_>, errors: &mut Vec<GrammarError>) {
        for caps in COLON_LIST.captures_iter(index.text()) {
            let items: Vec<&str> = (1..=3).filter_map(|i| caps.get(i)).map(|m| m.as_str()).collect();
            let Some(whole) = caps.get(0) else { continue };
            let lengths: Vec<usize> = items.iter().map(|w| w.chars().count()).collect();
            let (Some(&min), Some(&max)) = (lengths.iter().min(), lengths.iter().max()) else {
                continue;
            };
            if items.len() != 3 || max > 15 || max - min > 5 {
                continue;
            }
            errors.push(
                COMPLEX_SENTENCE_META
                    .error_bytes(
                        index,
                        whole.start(),
                        whole.end(),
                        "Однородные члены разделяются запятыми, а не двоеточиями",
                        vec![items.join(", ")],
                    )
                    .with_confidence(COMPLEX_SENTENCE_META.confidence * 0.7),
            );
        }
    }
}

impl GrammarRule for ComplexSentenceRule {
    fn meta(&self) -> &RuleMeta {
        &COMPLEX_SENTENCE_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();
        self.relative_clauses(&index, &mut errors);
        self.temporal_clauses(&index, &mut errors);
        self.colon_lists(&index, &mut errors);
        errors
    }
}

static DIRECT_SPEECH_META: RuleMeta = RuleMeta {
    id: "direct_speech_rule",
    error_type: ErrorType::Punctuation,
    subtype: Some("quotes"),
    description: "Оформление прямой речи",
    explanation: "Прямая речь заключается в кавычки «ёлочки» и отделяется от слов автора запятой и тире",
    examples: &[
        Example {
            wrong: "\"Привет\" сказал он",
            correct: "«Привет», — сказал он",
        },
        Example {
            wrong: "Мама спросила: Ты дома?",
            correct: "Мама спросила: «Ты дома?»",
        },
    ],
    severity: Severity::Error,
    confidence: 0.85,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct DirectSpeechRule;

impl GrammarRule for DirectSpeechRule {
    fn meta(&self) -> &RuleMeta {
        &DIRECT_SPEECH_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for caps in MISSING_QUOTES.captures_iter(text) {
            let Some(speech) = caps.get(1) else { continue };
            errors.push(DIRECT_SPEECH_META.error_bytes(
                &index,
                speech.start(),
                speech.end(),
                "Прямая речь должна быть заключена в кавычки",
                vec![format!("«{}»", speech.as_str())],
            ));
        }

        for caps in STRAIGHT_QUOTES.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else { continue };
            errors.push(
                DIRECT_SPEECH_META
                    .error_bytes(
                        &index,
                        whole.start(),
                        whole.end(),
                        "В русском тексте используются кавычки «ёлочки»",
                        vec![format!("«{}»", inner.as_str())],
                    )
                    .with_severity(Severity::Warning),
            );
        }

        for caps in AUTHOR_AFTER_SPEECH.captures_iter(text) {
            let (Some(punct), Some(gap), Some(dash)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            if !dash.as_str().is_empty() {
                continue;
            }
            let Some((start, end)) = first_whitespace(gap) else { continue };
            let suggestion = if punct.as_str().is_empty() { ", — " } else { " — " };
            errors.push(DIRECT_SPEECH_META.error_bytes(
                &index,
                start,
                end,
                "Слова автора после прямой речи отделяются запятой и тире",
                vec![suggestion.to_string()],
            ));
        }

        errors
    }
}
