mod endings;

use serde::{Deserialize, Serialize};

use endings::{
    CaseEndings, KnownWord, ADJECTIVE_ENDINGS, ADJECTIVE_FORMS, KNOWN_WORDS, NOUN_ENDINGS,
    OBLIQUE_ADJECTIVE_ENDINGS, IE_NOUN_ENDINGS, PLURAL_ADJECTIVE_ENDINGS,
};

/// Confidence of an exact known-word hit.
pub const KNOWN_WORD_CONFIDENCE: f32 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Pronoun,
    Preposition,
    Conjunction,
    Particle,
    Interjection,
    Numeral,
    Participle,
    Gerund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Case {
    Nominative,
    Genitive,
    Dative,
    Accusative,
    Instrumental,
    Prepositional,
}

impl Case {
    pub fn russian_name(&self) -> &'static str {
        match self {
            Case::Nominative => "именительном",
            Case::Genitive => "родительном",
            Case::Dative => "дательном",
            Case::Accusative => "винительном",
            Case::Instrumental => "творительном",
            Case::Prepositional => "предложном",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

impl Gender {
    pub fn russian_name(&self) -> &'static str {
        match self {
            Gender::Masculine => "мужского",
            Gender::Feminine => "женского",
            Gender::Neuter => "среднего",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Number {
    Singular,
    Plural,
}

impl Number {
    pub fn russian_name(&self) -> &'static str {
        match self {
            Number::Singular => "единственном",
            Number::Plural => "множественном",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Person {
    First,
    Second,
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tense {
    Past,
    Present,
    Future,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    Perfective,
    Imperfective,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MorphologicalInfo {
    pub lemma: String,
    pub part_of_speech: PartOfSpeech,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<Case>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tense: Option<Tense>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<Aspect>,
    pub confidence: f32,
}

/// The grammatical dimension on which two words disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mismatch {
    Gender,
    Number,
    Case,
}

impl Mismatch {
    pub fn subtype(&self) -> &'static str {
        match self {
            Mismatch::Gender => "gender_agreement",
            Mismatch::Number => "number_agreement",
            Mismatch::Case => "case_agreement",
        }
    }
}

impl MorphologicalInfo {
    /// First disagreement in gender, number, case order. A dimension is only
    /// compared when both sides know it.
    pub fn mismatch(&self, other: &MorphologicalInfo) -> Option<Mismatch> {
        fn differs<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
            matches!((a, b), (Some(a), Some(b)) if a != b)
        }

        if differs(self.gender, other.gender) {
            Some(Mismatch::Gender)
        } else if differs(self.number, other.number) {
            Some(Mismatch::Number)
        } else if differs(self.case, other.case) {
            Some(Mismatch::Case)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    pub word: String,
    pub lemma: String,
    pub morphology: MorphologicalInfo,
    /// Character offset of the word in the text it came from.
    pub position: usize,
}

/// Suffix-table morphology for Russian nouns, adjectives and pronouns.
#[derive(Debug, Default, Clone, Copy)]
pub struct MorphologyAnalyzer;

impl MorphologyAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classify one word. Returns `None` for anything that is not a Cyrillic
    /// word; callers skip such words.
    pub fn analyze_word(&self, word: &str, position: usize) -> Option<WordInfo> {
        let lemma = word.to_lowercase();
        if lemma.is_empty() || !lemma.chars().all(is_cyrillic_letter) {
            return None;
        }

        let morphology = table_readings(&lemma, PartOfSpeech::Adjective, ADJECTIVE_ENDINGS)
            .next()
            .or_else(|| plural_adjective(&lemma))
            .or_else(|| known_word(&lemma).map(|known| known_info(&lemma, known)))
            .or_else(|| table_readings(&lemma, PartOfSpeech::Noun, NOUN_ENDINGS).next())?;

        Some(WordInfo {
            word: word.to_string(),
            lemma,
            morphology,
            position,
        })
    }

    /// Every adjective reading of `word`, oblique cases included.
    pub fn adjective_readings(&self, word: &str) -> Vec<MorphologicalInfo> {
        let lemma = word.to_lowercase();
        table_readings(&lemma, PartOfSpeech::Adjective, ADJECTIVE_ENDINGS)
            .chain(table_readings(&lemma, PartOfSpeech::Adjective, OBLIQUE_ADJECTIVE_ENDINGS))
            .chain(plural_adjective(&lemma))
            .collect()
    }

    /// Every noun reading of `word`. Known words have exactly one.
    pub fn noun_readings(&self, word: &str) -> Vec<MorphologicalInfo> {
        let lemma = word.to_lowercase();
        match known_word(&lemma) {
            Some(known) => vec![known_info(&lemma, known)],
            None => table_readings(&lemma, PartOfSpeech::Noun, NOUN_ENDINGS).collect(),
        }
    }

    /// Agreement of an adjective with a noun. Reports the primary readings'
    /// first mismatch, unless some other reading of the pair agrees.
    pub fn check_agreement(&self, adjective: &WordInfo, noun: &WordInfo) -> Option<Mismatch> {
        let mismatch = adjective.morphology.mismatch(&noun.morphology)?;

        let nouns: Vec<MorphologicalInfo> = self
            .noun_readings(&noun.lemma)
            .into_iter()
            .filter(|reading| reading.gender == noun.morphology.gender)
            .collect();
        let agrees = self
            .adjective_readings(&adjective.lemma)
            .iter()
            .any(|a| nouns.iter().any(|n| a.mismatch(n).is_none()));

        if agrees {
            None
        } else {
            Some(mismatch)
        }
    }

    /// Form of `adjective` agreeing with the given features. `None` when no
    /// form is known or it would not change the word. Capitalization of the
    /// first letter is kept.
    pub fn adjective_form(
        &self,
        adjective: &str,
        gender: Option<Gender>,
        number: Number,
        case: Case,
    ) -> Option<String> {
        let lower = adjective.to_lowercase();
        let form = match number {
            Number::Plural => plural_form(&lower)?,
            Number::Singular => {
                let gender = gender?;
                let lemma = ADJECTIVE_FORMS
                    .iter()
                    .find(|(_, _, _, form)| *form == lower)
                    .map(|(lemma, _, _, _)| *lemma)
                    .unwrap_or(lower.as_str());
                ADJECTIVE_FORMS
                    .iter()
                    .find(|(l, g, c, _)| *l == lemma && *g == gender && *c == case)
                    .map(|(_, _, _, form)| form.to_string())
                    .or_else(|| pattern_form(&lower, gender, case))?
            }
        };

        if form == lower {
            return None;
        }
        Some(match_capitalization(adjective, form))
    }
}

pub fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё' | 'А'..='Я' | 'Ё')
}

fn suffix_confidence(word_len: usize, ending: &str) -> f32 {
    let mut confidence: f32 = 0.6;
    if ending.chars().count() > 1 {
        confidence += 0.2;
    }
    if word_len > 4 {
        confidence += 0.1;
    }
    confidence.min(0.9)
}

fn table_readings<'a>(
    word: &'a str,
    part_of_speech: PartOfSpeech,
    table: &'static [(Gender, CaseEndings)],
) -> impl Iterator<Item = MorphologicalInfo> + 'a {
    let word_len = word.chars().count();
    table.iter().flat_map(move |&(gender, cases)| {
        cases.iter().flat_map(move |&(case, endings)| {
            endings
                .iter()
                .copied()
                .filter(move |ending| {
                    word.ends_with(*ending) && (ending.is_empty() || word_len > ending.chars().count())
                })
                .map(move |ending| MorphologicalInfo {
                    lemma: word.to_string(),
                    part_of_speech,
                    case: Some(case),
                    gender: Some(gender),
                    number: Some(Number::Singular),
                    person: None,
                    tense: None,
                    aspect: None,
                    confidence: suffix_confidence(word_len, ending),
                })
        })
    })
}

fn plural_adjective(word: &str) -> Option<MorphologicalInfo> {
    if IE_NOUN_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
        return None;
    }
    let word_len = word.chars().count();
    let ending = PLURAL_ADJECTIVE_ENDINGS
        .iter()
        .find(|ending| word.ends_with(*ending) && word_len > ending.chars().count())?;
    Some(MorphologicalInfo {
        lemma: word.to_string(),
        part_of_speech: PartOfSpeech::Adjective,
        case: Some(Case::Nominative),
        gender: None,
        number: Some(Number::Plural),
        person: None,
        tense: None,
        aspect: None,
        confidence: suffix_confidence(word_len, ending),
    })
}

fn known_word(word: &str) -> Option<&'static KnownWord> {
    KNOWN_WORDS.iter().find(|known| known.word == word)
}

fn known_info(word: &str, known: &KnownWord) -> MorphologicalInfo {
    MorphologicalInfo {
        lemma: word.to_string(),
        part_of_speech: known.part_of_speech,
        case: Some(Case::Nominative),
        gender: known.gender,
        number: Some(known.number),
        person: known.person,
        tense: None,
        aspect: None,
        confidence: KNOWN_WORD_CONFIDENCE,
    }
}

const ADJECTIVE_SUFFIXES: &[&str] = &["ый", "ий", "ой", "ая", "яя", "ое", "ее", "ую", "юю", "ые", "ие"];

fn split_adjective(word: &str) -> Option<(&str, &'static str)> {
    let ending = *ADJECTIVE_SUFFIXES.iter().find(|ending| word.ends_with(**ending))?;
    let stem = &word[..word.len() - ending.len()];
    if stem.is_empty() {
        return None;
    }
    Some((stem, ending))
}

fn pattern_form(word: &str, gender: Gender, case: Case) -> Option<String> {
    let (stem, ending) = split_adjective(word)?;
    let last = stem.chars().last()?;
    let sibilant = "жшчщ".contains(last);
    let velar = "гкх".contains(last);
    let soft = matches!(ending, "ий" | "яя" | "ее" | "юю" | "ие") && !sibilant && !velar;
    let stressed = ending == "ой";

    let new_ending = match (gender, case) {
        (Gender::Feminine, Case::Nominative) if soft => "яя",
        (Gender::Feminine, Case::Nominative) => "ая",
        (Gender::Feminine, Case::Accusative) if soft => "юю",
        (Gender::Feminine, Case::Accusative) => "ую",
        (Gender::Neuter, Case::Nominative | Case::Accusative) if soft || (sibilant && !stressed) => "ее",
        (Gender::Neuter, Case::Nominative | Case::Accusative) => "ое",
        (Gender::Masculine, Case::Nominative | Case::Accusative) if stressed => "ой",
        (Gender::Masculine, Case::Nominative | Case::Accusative) if soft || sibilant || velar => "ий",
        (Gender::Masculine, Case::Nominative | Case::Accusative) => "ый",
        _ => return None,
    };
    Some(format!("{}{}", stem, new_ending))
}

fn plural_form(word: &str) -> Option<String> {
    let (stem, ending) = split_adjective(word)?;
    let last = stem.chars().last()?;
    let soft = matches!(ending, "ий" | "яя" | "ее" | "юю");
    let new_ending = if soft || "жшчщгкх".contains(last) { "ие" } else { "ые" };
    Some(format!("{}{}", stem, new_ending))
}

fn match_capitalization(original: &str, form: String) -> String {
    let capitalized = original.chars().next().is_some_and(char::is_uppercase);
    if !capitalized {
        return form;
    }
    let mut chars = form.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => form,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(word: &str) -> MorphologicalInfo {
        MorphologyAnalyzer::new().analyze_word(word, 0).unwrap().morphology
    }

    #[test]
    fn test_adjective_before_noun() {
        let info = analyze("красивый");
        assert_eq!(info.part_of_speech, PartOfSpeech::Adjective);
        assert_eq!(info.gender, Some(Gender::Masculine));
        assert_eq!(info.case, Some(Case::Nominative));
        assert!((info.confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_noun_suffix() {
        let info = analyze("девочка");
        assert_eq!(info.part_of_speech, PartOfSpeech::Noun);
        assert_eq!(info.gender, Some(Gender::Feminine));
        assert!((info.confidence - 0.7).abs() < 1e-6);

        let info = analyze("мир");
        assert_eq!(info.gender, Some(Gender::Masculine));
        assert!((info.confidence - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_known_words() {
        let info = analyze("Мама");
        assert_eq!(info.gender, Some(Gender::Feminine));
        assert_eq!(info.confidence, KNOWN_WORD_CONFIDENCE);

        let info = analyze("окно");
        assert_eq!(info.gender, Some(Gender::Neuter));

        let info = analyze("они");
        assert_eq!(info.part_of_speech, PartOfSpeech::Pronoun);
        assert_eq!(info.number, Some(Number::Plural));
        assert_eq!(info.person, Some(Person::Third));
    }

    #[test]
    fn test_plural_adjective() {
        let info = analyze("новые");
        assert_eq!(info.number, Some(Number::Plural));
        assert_eq!(info.gender, None);
    }

    #[test]
    fn test_soft_stem_plural_adjectives() {
        for word in ["синие", "хорошие", "русские"] {
            let info = analyze(word);
            assert_eq!(info.part_of_speech, PartOfSpeech::Adjective, "{}", word);
            assert_eq!(info.number, Some(Number::Plural), "{}", word);
            assert_eq!(info.case, Some(Case::Nominative), "{}", word);
        }

        for word in ["мнение", "здание", "развитие"] {
            let info = analyze(word);
            assert_eq!(info.part_of_speech, PartOfSpeech::Noun, "{}", word);
        }
    }

    #[test]
    fn test_unanalyzable() {
        let analyzer = MorphologyAnalyzer::new();
        assert!(analyzer.analyze_word("", 0).is_none());
        assert!(analyzer.analyze_word("hello", 0).is_none());
        assert!(analyzer.analyze_word("мир2", 0).is_none());
    }

    #[test]
    fn test_position_and_lemma() {
        let info = MorphologyAnalyzer::new().analyze_word("Дом", 7).unwrap();
        assert_eq!(info.lemma, "дом");
        assert_eq!(info.word, "Дом");
        assert_eq!(info.position, 7);
    }

    #[test]
    fn test_agreement_mismatch_order() {
        let analyzer = MorphologyAnalyzer::new();
        let adj = analyzer.analyze_word("красивый", 0).unwrap();
        let noun = analyzer.analyze_word("девочка", 9).unwrap();
        assert_eq!(analyzer.check_agreement(&adj, &noun), Some(Mismatch::Gender));

        let adj = analyzer.analyze_word("красивая", 0).unwrap();
        let noun = analyzer.analyze_word("книги", 9).unwrap();
        assert_eq!(analyzer.check_agreement(&adj, &noun), Some(Mismatch::Number));
    }

    #[test]
    fn test_agreement_uses_alternative_readings() {
        let analyzer = MorphologyAnalyzer::new();
        for (adj, noun) in [("большой", "дом"), ("красивой", "девочки"), ("красивой", "девочке")] {
            let adj = analyzer.analyze_word(adj, 0).unwrap();
            let noun = analyzer.analyze_word(noun, 0).unwrap();
            assert_eq!(analyzer.check_agreement(&adj, &noun), None);
        }
    }

    #[test]
    fn test_adjective_forms() {
        let analyzer = MorphologyAnalyzer::new();
        let form = |adj, gender, number, case| analyzer.adjective_form(adj, gender, number, case);

        assert_eq!(
            form("красивый", Some(Gender::Feminine), Number::Singular, Case::Nominative).as_deref(),
            Some("красивая")
        );
        assert_eq!(
            form("Хороший", Some(Gender::Feminine), Number::Singular, Case::Nominative).as_deref(),
            Some("Хорошая")
        );
        assert_eq!(
            form("синий", Some(Gender::Feminine), Number::Singular, Case::Nominative).as_deref(),
            Some("синяя")
        );
        assert_eq!(
            form("русская", Some(Gender::Masculine), Number::Singular, Case::Nominative).as_deref(),
            Some("русский")
        );
        assert_eq!(
            form("молодой", Some(Gender::Neuter), Number::Singular, Case::Nominative).as_deref(),
            Some("молодое")
        );
        assert_eq!(
            form("большая", Some(Gender::Masculine), Number::Singular, Case::Nominative).as_deref(),
            Some("большой")
        );
        assert_eq!(
            form("новый", None, Number::Plural, Case::Nominative).as_deref(),
            Some("новые")
        );
        assert_eq!(
            form("большой", Some(Gender::Masculine), Number::Singular, Case::Nominative),
            None
        );
    }
}
