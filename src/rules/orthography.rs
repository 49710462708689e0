use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use super::{capitalize, match_case, Example, GrammarRule, RuleMeta};
use crate::parser::{sentences, TextIndex};
use crate::{ErrorType, GrammarError, Severity};

lazy_static! {
    static ref SIBILANT_VOWEL: Regex = Regex::new(r"(?i)[жш]ы|[чщ][яю]").unwrap();
    static ref SOFT_SIGN: Regex = Regex::new(r"(?i)[чщ]ь[кн]|[нр]ь[чщ]").unwrap();
    static ref DOUBLE_N: Regex = Regex::new(r"(?i)\b(стекл|олов|дерев)ян([а-яё]*)").unwrap();
    static ref PREFIX_Z_S: Regex =
        Regex::new(r"(?i)\b(бе|ра|во|ни|и)([зс])([бвгджзйклмнпрстфхцчшщ][а-яё]+)").unwrap();
    static ref PO_ADVERB: Regex =
        Regex::new(r"(?i)\b(по)\s+([а-яё]+(?:ому|ему|ски|цки|ьи))\b").unwrap();
    static ref NEXT_WORD: Regex = Regex::new(r"^\s+(\p{L}+)").unwrap();
    static ref PLACE_NAME: Regex = Regex::new(
        r"\b(росси(?:я|и|ей|ю)|москв(?:а|ы|е|у|ой)|германи(?:я|и|ей|ю)|итали(?:я|и|ей|ю)|франци(?:я|и|ей|ю)|испани(?:я|и|ей|ю)|чехи(?:я|и|ей|ю)|польш(?:а|и|е|у|ей)|[а-яё]+стан(?:а|е|у|ом)?|[а-яё]+(?:град|бург)(?:а|е|у|ом)?|киев(?:а|е|у|ом)?|минск(?:а|е|у|ом)?|варшав(?:а|ы|е|у|ой)|праг(?:а|и|е|у|ой)|берлин(?:а|е|у|ом)?|париж(?:а|е|у|ем)?|лондон(?:а|е|у|ом)?)\b"
    )
    .unwrap();
    static ref PATRONYMIC: Regex =
        Regex::new(r"\b[А-ЯЁ][а-яё]+\s+([а-яё]+(?:ович|евич|овна|евна))\b").unwrap();
    static ref TITLED_NAME: Regex = Regex::new(
        r"\b(?:господин|госпожа|товарищ|доктор|профессор|президент)\s+([а-яё]+(?:ов|ев|ин|ын|ова|ева|ина|ская|ский|цкий))\b"
    )
    .unwrap();
    static ref FULL_NAME: Regex = Regex::new(
        r"(?i)\b(иван|пётр|петр|сергей|алексей|андрей|дмитрий|николай|михаил|александр|владимир|анна|мария|елена|ольга|наталья|татьяна)\s+([а-яё]+(?:ов|ев|ин|ын|ова|ева|ина|ский|цкий|ская|цкая))\b"
    )
    .unwrap();
    static ref GEOGRAPHIC_FEATURE: Regex =
        Regex::new(r"(?i)\b(?:река|реки|море|озеро|гора|хребет|остров)\s+([а-яё]+)\b").unwrap();
    static ref GEOGRAPHIC_ADJECTIVE: Regex =
        Regex::new(r"\b([а-яё]+(?:ское|ский|ская|цкое|цкий|цкая))\s+(?:море|озеро|поле|плато)\b").unwrap();
    static ref PRESENT_VERB_ENDING: Regex = Regex::new(r"(?:ет|ёт|ит|ут|ют|ат|ят)$").unwrap();
}

static SENTENCE_CAPITALIZATION: RuleMeta = RuleMeta {
    id: "sentence_capitalization",
    error_type: ErrorType::Orthography,
    subtype: Some("capitalization"),
    description: "Заглавная буква в начале предложения",
    explanation: "Первое слово предложения пишется с заглавной буквы",
    examples: &[Example {
        wrong: "предложение начинается",
        correct: "Предложение начинается",
    }],
    severity: Severity::Error,
    confidence: 0.9,
    enabled: true,
};

/// Lowercase Cyrillic letter at the start of a sentence.
#[derive(Debug, Clone)]
pub struct SentenceCapitalizationRule {
    meta: &'static RuleMeta,
}

impl SentenceCapitalizationRule {
    pub fn new() -> Self {
        Self::with_meta(&SENTENCE_CAPITALIZATION)
    }

    pub fn with_meta(meta: &'static RuleMeta) -> Self {
        Self { meta }
    }
}

impl Default for SentenceCapitalizationRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarRule for SentenceCapitalizationRule {
    fn meta(&self) -> &RuleMeta {
        self.meta
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for sentence in sentences(text, false) {
            let first = match sentence.text.chars().next() {
                Some(c) => c,
                None => continue,
            };
            if !matches!(first, 'а'..='я' | 'ё') {
                continue;
            }
            // A sentence continued after an ellipsis keeps its lowercase.
            let before = index.slice_chars(0, sentence.start).trim_end();
            if before.ends_with("...") || before.ends_with('…') {
                continue;
            }

            errors.push(self.meta.error(
                &index,
                sentence.start,
                sentence.start + 1,
                "Предложение должно начинаться с заглавной буквы",
                vec![first.to_uppercase().collect()],
            ));
        }

        errors
    }
}

static SIBILANT_VOWEL_META: RuleMeta = RuleMeta {
    id: "sibilant_vowel",
    error_type: ErrorType::Orthography,
    subtype: Some("spelling"),
    description: "Гласные после шипящих",
    explanation: "Жи-ши пиши с буквой и, ча-ща пиши с буквой а, чу-щу пиши с буквой у",
    examples: &[
        Example {
            wrong: "жызнь",
            correct: "жизнь",
        },
        Example {
            wrong: "чящя",
            correct: "чаща",
        },
        Example {
            wrong: "щюка",
            correct: "щука",
        },
    ],
    severity: Severity::Error,
    confidence: 0.95,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct SibilantVowelRule;

fn sibilant_fix(vowel: char) -> char {
    match vowel {
        'ы' => 'и',
        'Ы' => 'И',
        'я' => 'а',
        'Я' => 'А',
        'ю' => 'у',
        'Ю' => 'У',
        other => other,
    }
}

impl GrammarRule for SibilantVowelRule {
    fn meta(&self) -> &RuleMeta {
        &SIBILANT_VOWEL_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        SIBILANT_VOWEL
            .find_iter(text)
            .map(|m| {
                let pair = m.as_str();
                let fixed: String = pair
                    .chars()
                    .enumerate()
                    .map(|(i, c)| if i == 1 { sibilant_fix(c) } else { c })
                    .collect();
                SIBILANT_VOWEL_META.error_bytes(
                    &index,
                    m.start(),
                    m.end(),
                    format!("После шипящей пишется \"{}\", а не \"{}\"", fixed, pair),
                    vec![fixed],
                )
            })
            .collect()
    }
}

static SOFT_SIGN_META: RuleMeta = RuleMeta {
    id: "soft_sign",
    error_type: ErrorType::Orthography,
    subtype: Some("spelling"),
    description: "Мягкий знак в сочетаниях согласных",
    explanation: "В сочетаниях чк, чн, нч, нщ, рщ мягкий знак не пишется",
    examples: &[
        Example {
            wrong: "ночька",
            correct: "ночка",
        },
        Example {
            wrong: "точьный",
            correct: "точный",
        },
        Example {
            wrong: "каменьщик",
            correct: "каменщик",
        },
    ],
    severity: Severity::Error,
    confidence: 0.9,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct SoftSignRule;

impl GrammarRule for SoftSignRule {
    fn meta(&self) -> &RuleMeta {
        &SOFT_SIGN_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        SOFT_SIGN
            .find_iter(text)
            .map(|m| {
                let fixed: String = m.as_str().chars().filter(|c| !matches!(c, 'ь' | 'Ь')).collect();
                SOFT_SIGN_META.error_bytes(
                    &index,
                    m.start(),
                    m.end(),
                    format!("В сочетании \"{}\" мягкий знак не пишется", fixed),
                    vec![fixed],
                )
            })
            .collect()
    }
}

static DOUBLE_CONSONANT_META: RuleMeta = RuleMeta {
    id: "double_consonant",
    error_type: ErrorType::Orthography,
    subtype: Some("spelling"),
    description: "Двойная н в прилагательных-исключениях",
    explanation: "Стеклянный, оловянный, деревянный пишутся с двумя н",
    examples: &[
        Example {
            wrong: "деревяный дом",
            correct: "деревянный дом",
        },
        Example {
            wrong: "стекляная ваза",
            correct: "стеклянная ваза",
        },
    ],
    severity: Severity::Error,
    confidence: 0.9,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct DoubleConsonantRule;

impl GrammarRule for DoubleConsonantRule {
    fn meta(&self) -> &RuleMeta {
        &DOUBLE_CONSONANT_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for caps in DOUBLE_N.captures_iter(text) {
            let (Some(word), Some(stem), Some(rest)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            if rest.as_str().is_empty() || rest.as_str().starts_with(['н', 'Н']) {
                continue;
            }
            // "ян" as written; its case carries over to the inserted letter.
            let suffix = &text[stem.end()..rest.start()];
            let extra = if suffix.ends_with('Н') { "Н" } else { "н" };
            let fixed = format!("{}{}{}{}", stem.as_str(), suffix, extra, rest.as_str());
            errors.push(DOUBLE_CONSONANT_META.error_bytes(
                &index,
                word.start(),
                word.end(),
                format!("\"{}\" пишется с двумя н", word.as_str()),
                vec![fixed],
            ));
        }

        errors
    }
}

static PREFIX_Z_S_META: RuleMeta = RuleMeta {
    id: "prefix_z_s",
    error_type: ErrorType::Orthography,
    subtype: Some("spelling"),
    description: "Приставки на з/с",
    explanation: "Перед звонкими согласными пишется з, перед глухими — с",
    examples: &[
        Example {
            wrong: "безполезный",
            correct: "бесполезный",
        },
        Example {
            wrong: "разсказ",
            correct: "рассказ",
        },
        Example {
            wrong: "исбежать",
            correct: "избежать",
        },
    ],
    severity: Severity::Error,
    confidence: 0.85,
    enabled: true,
};

const VOICELESS: &str = "кпстфхцчшщ";
const PREFIX_EXCEPTIONS: &[&str] = &["низк", "низш", "ислам", "исланд", "беслан"];

#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixZSRule;

impl GrammarRule for PrefixZSRule {
    fn meta(&self) -> &RuleMeta {
        &PREFIX_Z_S_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for caps in PREFIX_Z_S.captures_iter(text) {
            let (Some(word), Some(letter), Some(rest)) = (caps.get(0), caps.get(2), caps.get(3)) else {
                continue;
            };
            let lower = word.as_str().to_lowercase();
            if PREFIX_EXCEPTIONS.iter().any(|e| lower.starts_with(e)) {
                continue;
            }

            let next = rest.as_str().chars().next().map(|c| c.to_lowercase().collect::<String>());
            let voiceless = next.is_some_and(|c| VOICELESS.contains(c.as_str()));
            let expected = if voiceless { "с" } else { "з" };
            let written = letter.as_str().to_lowercase();
            if written == expected {
                continue;
            }

            let fixed = format!(
                "{}{}{}",
                &text[word.start()..letter.start()],
                match_case(letter.as_str(), expected),
                rest.as_str()
            );
            errors.push(PREFIX_Z_S_META.error_bytes(
                &index,
                word.start(),
                word.end(),
                format!(
                    "Перед {} согласной в приставке пишется \"{}\"",
                    if voiceless { "глухой" } else { "звонкой" },
                    expected
                ),
                vec![fixed],
            ));
        }

        errors
    }
}

static PO_PREFIX_META: RuleMeta = RuleMeta {
    id: "po_prefix_hyphen",
    error_type: ErrorType::Orthography,
    subtype: Some("spelling"),
    description: "Дефис после по- в наречиях",
    explanation: "Приставка по- пишется через дефис с наречиями на -ому, -ему, -ски, -цки, -ьи",
    examples: &[
        Example {
            wrong: "по русски",
            correct: "по-русски",
        },
        Example {
            wrong: "по новому",
            correct: "по-новому",
        },
        Example {
            wrong: "по вашему",
            correct: "по-вашему",
        },
    ],
    severity: Severity::Error,
    confidence: 0.9,
    enabled: true,
};

const VOWELS: &str = "аеёиоуыэюя";

const PO_EXCEPTIONS: &[&str] = &[
    "долгу", "больше", "меньше", "лучше", "хуже", "тише", "громче", "ему", "нему", "кому", "чему",
    "тому", "этому", "всему", "одному",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct PoPrefixRule;

impl GrammarRule for PoPrefixRule {
    fn meta(&self) -> &RuleMeta {
        &PO_PREFIX_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for caps in PO_ADVERB.captures_iter(text) {
            let (Some(whole), Some(po), Some(word)) = (caps.get(0), caps.get(1), caps.get(2)) else {
                continue;
            };
            let lower = word.as_str().to_lowercase();
            if PO_EXCEPTIONS.contains(&lower.as_str()) {
                continue;
            }
            let dative_adjective = lower.ends_with("ому") || lower.ends_with("ему");
            // "по дому", "по шлему": a one-syllable noun, whatever follows.
            if dative_adjective && !lower.chars().rev().skip(3).any(|c| VOWELS.contains(c)) {
                continue;
            }
            // "по новому адресу": adjective before a dative noun.
            if dative_adjective {
                let next = NEXT_WORD
                    .captures(&text[whole.end()..])
                    .and_then(|c| c.get(1))
                    .map(|m| m.as_str().to_lowercase());
                if next.is_some_and(|n| n.ends_with('у') || n.ends_with('ю') || n.ends_with('е')) {
                    continue;
                }
            }

            errors.push(PO_PREFIX_META.error_bytes(
                &index,
                whole.start(),
                whole.end(),
                format!("\"{}\" пишется через дефис", whole.as_str()),
                vec![format!("{}-{}", po.as_str(), word.as_str())],
            ));
        }

        errors
    }
}

static PROPER_NAMES_META: RuleMeta = RuleMeta {
    id: "proper_names_rule",
    error_type: ErrorType::Orthography,
    subtype: Some("capitalization"),
    description: "Правописание собственных имён",
    explanation: "Собственные имена пишутся с заглавной буквы",
    examples: &[
        Example {
            wrong: "москва столица россии",
            correct: "Москва столица России",
        },
        Example {
            wrong: "иван петров",
            correct: "Иван Петров",
        },
        Example {
            wrong: "река волга",
            correct: "река Волга",
        },
    ],
    severity: Severity::Error,
    confidence: 0.85,
    enabled: true,
};

const NOT_A_NAME: &[&str] = &[
    "и", "в", "на", "с", "у", "за", "под", "над", "был", "была", "было", "были", "это", "очень",
    "тоже", "где", "как", "что", "течёт", "течет", "не",
];

const COMMON_GRAD_WORDS: &[&str] = &["виноград", "оград", "наград", "преград", "заград"];

#[derive(Debug, Default, Clone, Copy)]
pub struct ProperNamesRule;

impl ProperNamesRule {
    fn push(
        &self,
        index: &TextIndex<'_>,
        seen: &mut HashSet<(usize, usize)>,
        errors: &mut Vec<GrammarError>,
        m: regex::Match<'_>,
        message: &str,
        confidence: f32,
    ) {
        let word = m.as_str();
        if !word.chars().next().is_some_and(char::is_lowercase) || !seen.insert((m.start(), m.end())) {
            return;
        }
        errors.push(
            PROPER_NAMES_META
                .error_bytes(
                    index,
                    m.start(),
                    m.end(),
                    format!("{} \"{}\" пишется с заглавной буквы", message, word),
                    vec![capitalize(word)],
                )
                .with_confidence(confidence),
        );
    }
}

impl GrammarRule for ProperNamesRule {
    fn meta(&self) -> &RuleMeta {
        &PROPER_NAMES_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut seen = HashSet::new();
        let mut errors = Vec::new();
        let base = PROPER_NAMES_META.confidence;

        for m in PLACE_NAME.find_iter(text) {
            if COMMON_GRAD_WORDS.iter().any(|w| m.as_str().starts_with(w)) {
                continue;
            }
            self.push(&index, &mut seen, &mut errors, m, "Название", base);
        }

        for caps in PATRONYMIC.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                self.push(&index, &mut seen, &mut errors, m, "Отчество", base * 0.8);
            }
        }
        for caps in TITLED_NAME.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                self.push(&index, &mut seen, &mut errors, m, "Фамилия", base * 0.8);
            }
        }
        for caps in FULL_NAME.captures_iter(text) {
            for m in [caps.get(1), caps.get(2)].into_iter().flatten() {
                self.push(&index, &mut seen, &mut errors, m, "Имя собственное", base * 0.8);
            }
        }

        for caps in GEOGRAPHIC_FEATURE.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let lower = m.as_str().to_lowercase();
            if lower.chars().count() < 3
                || NOT_A_NAME.contains(&lower.as_str())
                || PRESENT_VERB_ENDING.is_match(&lower)
            {
                continue;
            }
            self.push(&index, &mut seen, &mut errors, m, "Географическое название", base * 0.7);
        }
        for caps in GEOGRAPHIC_ADJECTIVE.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                self.push(&index, &mut seen, &mut errors, m, "Географическое название", base * 0.7);
            }
        }

        errors
    }
}
