use lazy_static::lazy_static;
use regex::Regex;

use super::{is_verb_like, match_case, Example, GrammarRule, RuleMeta};
use crate::morphology::{Case, Mismatch, MorphologyAnalyzer, Number, PartOfSpeech, Person, WordInfo};
use crate::parser::{words, TextIndex};
use crate::{ErrorType, GrammarError, Severity, Token};

lazy_static! {
    static ref PARTICIPLE_SHAPE: Regex =
        Regex::new(r"(?:ущ|ющ|ащ|ящ|вш|нн|енн)(?:ий|ый|ая|яя|ое|ее)$").unwrap();
}

const FUNCTION_WORDS: &[&str] = &[
    "и", "а", "но", "или", "да", "не", "ни", "в", "во", "на", "с", "со", "к", "ко", "о", "об", "у",
    "из", "за", "от", "до", "по", "для", "при", "про", "без", "под", "над", "что", "как", "так",
    "это", "то", "же", "ли", "бы", "уже", "ещё", "еще", "очень", "там", "тут", "здесь", "где",
    "когда", "все", "всё", "весь", "тоже", "также",
];

/// Token pairs separated by whitespace only.
fn adjacent_pairs(index: &TextIndex<'_>) -> Vec<(Token, Token)> {
    let tokens: Vec<Token> = words(index.text()).collect();
    tokens
        .windows(2)
        .filter(|pair| {
            let gap = index.slice_chars(pair[0].end, pair[1].start);
            !gap.is_empty() && gap.chars().all(char::is_whitespace)
        })
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .collect()
}

fn is_participle_shaped(word: &str) -> bool {
    PARTICIPLE_SHAPE.is_match(&word.to_lowercase())
}

fn noun_candidate(analyzer: &MorphologyAnalyzer, token: &Token) -> Option<WordInfo> {
    let info = analyzer.analyze_word(&token.text, token.start)?;
    let plausible = info.morphology.part_of_speech == PartOfSpeech::Noun
        && info.lemma.chars().count() >= 3
        && !FUNCTION_WORDS.contains(&info.lemma.as_str())
        && !is_verb_like(&info.lemma);
    plausible.then_some(info)
}

fn adjective_candidate(analyzer: &MorphologyAnalyzer, token: &Token) -> Option<WordInfo> {
    let info = analyzer.analyze_word(&token.text, token.start)?;
    (info.morphology.part_of_speech == PartOfSpeech::Adjective).then_some(info)
}

fn mismatch_message(mismatch: Mismatch) -> &'static str {
    match mismatch {
        Mismatch::Gender => "роде",
        Mismatch::Number => "числе",
        Mismatch::Case => "падеже",
    }
}

fn mismatch_explanation(mismatch: Mismatch, noun: &WordInfo) -> Option<String> {
    let m = &noun.morphology;
    Some(match mismatch {
        Mismatch::Gender => format!(
            "Существительное \"{}\" {} рода, определение должно стоять в том же роде",
            noun.word,
            m.gender?.russian_name()
        ),
        Mismatch::Number => format!(
            "Существительное \"{}\" стоит в {} числе",
            noun.word,
            m.number?.russian_name()
        ),
        Mismatch::Case => format!(
            "Существительное \"{}\" стоит в {} падеже",
            noun.word,
            m.case?.russian_name()
        ),
    })
}

fn agreeing_form(analyzer: &MorphologyAnalyzer, adjective: &WordInfo, noun: &WordInfo) -> Vec<String> {
    let m = &noun.morphology;
    analyzer
        .adjective_form(
            &adjective.word,
            m.gender,
            m.number.unwrap_or(Number::Singular),
            m.case.unwrap_or(Case::Nominative),
        )
        .into_iter()
        .collect()
}

static NOUN_ADJECTIVE_AGREEMENT: RuleMeta = RuleMeta {
    id: "noun_adjective_agreement",
    error_type: ErrorType::Agreement,
    subtype: Some("gender_agreement"),
    description: "Согласование прилагательного с существительным",
    explanation: "Прилагательное согласуется с существительным в роде, числе и падеже",
    examples: &[
        Example {
            wrong: "красивый девочка",
            correct: "красивая девочка",
        },
        Example {
            wrong: "большой дом",
            correct: "большой дом",
        },
        Example {
            wrong: "хороший книга",
            correct: "хорошая книга",
        },
    ],
    severity: Severity::Error,
    confidence: 0.8,
    enabled: true,
};

/// Adjacent adjective and noun that disagree in gender, number or case.
#[derive(Debug, Clone)]
pub struct NounAdjectiveAgreementRule {
    meta: &'static RuleMeta,
    analyzer: MorphologyAnalyzer,
}

impl NounAdjectiveAgreementRule {
    pub fn new() -> Self {
        Self::with_meta(&NOUN_ADJECTIVE_AGREEMENT)
    }

    pub fn with_meta(meta: &'static RuleMeta) -> Self {
        Self {
            meta,
            analyzer: MorphologyAnalyzer::new(),
        }
    }

    fn report(&self, index: &TextIndex<'_>, adjective: &Token, a: &WordInfo, n: &WordInfo) -> Option<GrammarError> {
        if is_participle_shaped(&a.word) {
            return None;
        }
        let mismatch = self.analyzer.check_agreement(a, n)?;
        let mut error = self
            .meta
            .error(
                index,
                adjective.start,
                adjective.end,
                format!(
                    "Прилагательное \"{}\" не согласуется с существительным \"{}\" в {}",
                    a.word,
                    n.word,
                    mismatch_message(mismatch)
                ),
                agreeing_form(&self.analyzer, a, n),
            )
            .with_subtype(mismatch.subtype());
        if let Some(explanation) = mismatch_explanation(mismatch, n) {
            error = error.with_explanation(explanation);
        }
        Some(error)
    }
}

impl Default for NounAdjectiveAgreementRule {
    fn default() -> Self {
        Self::new()
    }
}

impl GrammarRule for NounAdjectiveAgreementRule {
    fn meta(&self) -> &RuleMeta {
        self.meta
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let pairs = adjacent_pairs(&index);
        let mut errors = Vec::new();

        for (i, (first, second)) in pairs.iter().enumerate() {
            if let (Some(a), Some(n)) = (
                adjective_candidate(&self.analyzer, first),
                noun_candidate(&self.analyzer, second),
            ) {
                errors.extend(self.report(&index, first, &a, &n));
                continue;
            }

            // Postposed adjective, unless it already precedes its own noun.
            let owns_next = pairs
                .get(i + 1)
                .filter(|(next_first, _)| next_first.start == second.start)
                .is_some_and(|(_, next)| noun_candidate(&self.analyzer, next).is_some());
            if owns_next {
                continue;
            }
            if let (Some(n), Some(a)) = (
                noun_candidate(&self.analyzer, first),
                adjective_candidate(&self.analyzer, second),
            ) {
                errors.extend(self.report(&index, second, &a, &n));
            }
        }

        errors
    }
}

static SUBJECT_PREDICATE_META: RuleMeta = RuleMeta {
    id: "subject_predicate_agreement",
    error_type: ErrorType::Agreement,
    subtype: Some("subject_verb"),
    description: "Согласование подлежащего и сказуемого",
    explanation: "Сказуемое согласуется с подлежащим в лице и числе",
    examples: &[
        Example {
            wrong: "Мальчик играют",
            correct: "Мальчик играет",
        },
        Example {
            wrong: "Дети играет",
            correct: "Дети играют",
        },
        Example {
            wrong: "Я играет",
            correct: "Я играю",
        },
    ],
    severity: Severity::Error,
    confidence: 0.75,
    enabled: true,
};

/// Present-tense forms: 1sg, 2sg, 3sg, 1pl, 2pl, 3pl.
const VERB_FORMS: &[(&str, [&str; 6])] = &[
    ("играть", ["играю", "играешь", "играет", "играем", "играете", "играют"]),
    ("читать", ["читаю", "читаешь", "читает", "читаем", "читаете", "читают"]),
    ("писать", ["пишу", "пишешь", "пишет", "пишем", "пишете", "пишут"]),
    ("говорить", ["говорю", "говоришь", "говорит", "говорим", "говорите", "говорят"]),
    ("идти", ["иду", "идёшь", "идёт", "идём", "идёте", "идут"]),
    ("делать", ["делаю", "делаешь", "делает", "делаем", "делаете", "делают"]),
    ("работать", ["работаю", "работаешь", "работает", "работаем", "работаете", "работают"]),
    ("знать", ["знаю", "знаешь", "знает", "знаем", "знаете", "знают"]),
    ("думать", ["думаю", "думаешь", "думает", "думаем", "думаете", "думают"]),
    ("жить", ["живу", "живёшь", "живёт", "живём", "живёте", "живут"]),
    ("любить", ["люблю", "любишь", "любит", "любим", "любите", "любят"]),
    ("хотеть", ["хочу", "хочешь", "хочет", "хотим", "хотите", "хотят"]),
];

const SINGULAR_SUBJECTS: &[&str] = &[
    "мальчик", "девочка", "человек", "ребёнок", "ребенок", "учитель", "студент", "мама", "папа",
];
const PLURAL_SUBJECTS: &[&str] = &[
    "мальчики", "девочки", "люди", "дети", "учителя", "студенты",
];

fn slot(person: Person, number: Number) -> usize {
    let offset = match person {
        Person::First => 0,
        Person::Second => 1,
        Person::Third => 2,
    };
    match number {
        Number::Singular => offset,
        Number::Plural => offset + 3,
    }
}

fn fold_yo(word: &str) -> String {
    word.to_lowercase().replace('ё', "е")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SubjectPredicateAgreementRule {
    analyzer: MorphologyAnalyzer,
}

impl SubjectPredicateAgreementRule {
    fn subject_slot(&self, word: &str) -> Option<usize> {
        let lower = fold_yo(word);
        if SINGULAR_SUBJECTS.iter().any(|s| fold_yo(s) == lower) {
            return Some(slot(Person::Third, Number::Singular));
        }
        if PLURAL_SUBJECTS.contains(&lower.as_str()) {
            return Some(slot(Person::Third, Number::Plural));
        }
        let info = self.analyzer.analyze_word(word, 0)?.morphology;
        if info.part_of_speech != PartOfSpeech::Pronoun {
            return None;
        }
        Some(slot(info.person?, info.number?))
    }
}

fn verb_slot(word: &str) -> Option<(&'static [&'static str; 6], usize)> {
    let lower = fold_yo(word);
    VERB_FORMS.iter().find_map(|(_, forms)| {
        forms
            .iter()
            .position(|form| fold_yo(form) == lower)
            .map(|position| (forms, position))
    })
}

impl GrammarRule for SubjectPredicateAgreementRule {
    fn meta(&self) -> &RuleMeta {
        &SUBJECT_PREDICATE_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for (subject, verb) in adjacent_pairs(&index) {
            let Some(expected) = self.subject_slot(&subject.text) else { continue };
            let Some((forms, actual)) = verb_slot(&verb.text) else { continue };
            if expected == actual {
                continue;
            }

            let gap = index.slice_chars(subject.end, verb.start);
            let correct = match_case(&verb.text, forms[expected]);
            errors.push(SUBJECT_PREDICATE_META.error(
                &index,
                subject.start,
                verb.end,
                format!(
                    "Глагол \"{}\" не согласуется с подлежащим \"{}\" в лице или числе",
                    verb.text, subject.text
                ),
                vec![format!("{}{}{}", subject.text, gap, correct)],
            ));
        }

        errors
    }
}

static PARTICIPLE_AGREEMENT_META: RuleMeta = RuleMeta {
    id: "participle_agreement",
    error_type: ErrorType::Agreement,
    subtype: Some("gender_agreement"),
    description: "Согласование причастия с существительным",
    explanation: "Причастие согласуется с определяемым существительным в роде",
    examples: &[Example {
        wrong: "прочитанный книга",
        correct: "прочитанная книга",
    }],
    severity: Severity::Error,
    confidence: 0.75,
    enabled: true,
};

#[derive(Debug, Default, Clone, Copy)]
pub struct ParticipleAgreementRule {
    analyzer: MorphologyAnalyzer,
}

impl GrammarRule for ParticipleAgreementRule {
    fn meta(&self) -> &RuleMeta {
        &PARTICIPLE_AGREEMENT_META
    }

    fn check(&self, text: &str) -> Vec<GrammarError> {
        let index = TextIndex::new(text);
        let mut errors = Vec::new();

        for (first, second) in adjacent_pairs(&index) {
            if first.text.chars().count() <= 5 || !is_participle_shaped(&first.text) {
                continue;
            }
            let (Some(participle), Some(noun)) = (
                adjective_candidate(&self.analyzer, &first),
                noun_candidate(&self.analyzer, &second),
            ) else {
                continue;
            };
            if self.analyzer.check_agreement(&participle, &noun) != Some(Mismatch::Gender) {
                continue;
            }

            let mut error = PARTICIPLE_AGREEMENT_META.error(
                &index,
                first.start,
                first.end,
                format!(
                    "Причастие \"{}\" не согласуется с существительным \"{}\" в роде",
                    participle.word, noun.word
                ),
                agreeing_form(&self.analyzer, &participle, &noun),
            );
            if let Some(explanation) = mismatch_explanation(Mismatch::Gender, &noun) {
                error = error.with_explanation(explanation);
            }
            errors.push(error);
        }

        errors
    }
}
