use super::{Case, Gender, Number, PartOfSpeech, Person};

pub(super) type CaseEndings = &'static [(Case, &'static [&'static str])];

/// Singular noun endings. Feminine is tried first, and the masculine
/// nominative zero ending accepts any word.
pub(super) const NOUN_ENDINGS: &[(Gender, CaseEndings)] = &[
    (
        Gender::Feminine,
        &[
            (Case::Nominative, &["а", "я", "ь"]),
            (Case::Genitive, &["ы", "и"]),
            (Case::Dative, &["е", "и"]),
            (Case::Accusative, &["у", "ю", "ь"]),
            (Case::Instrumental, &["ой", "ей", "ью"]),
            (Case::Prepositional, &["е", "и"]),
        ],
    ),
    (
        Gender::Masculine,
        &[
            (Case::Nominative, &["", "ь"]),
            (Case::Genitive, &["а", "я", "ы", "и"]),
            (Case::Dative, &["у", "ю"]),
            (Case::Accusative, &["", "а", "я", "ь"]),
            (Case::Instrumental, &["ом", "ем", "ём"]),
            (Case::Prepositional, &["е", "и"]),
        ],
    ),
    (
        Gender::Neuter,
        &[
            (Case::Nominative, &["о", "е", "ё"]),
            (Case::Genitive, &["а", "я"]),
            (Case::Dative, &["у", "ю"]),
            (Case::Accusative, &["о", "е", "ё"]),
            (Case::Instrumental, &["ом", "ем", "ём"]),
            (Case::Prepositional, &["е", "и"]),
        ],
    ),
];

/// Singular adjective endings used for the primary reading.
pub(super) const ADJECTIVE_ENDINGS: &[(Gender, CaseEndings)] = &[
    (
        Gender::Masculine,
        &[
            (Case::Nominative, &["ый", "ий", "ой"]),
            (Case::Genitive, &["ого", "его"]),
            (Case::Accusative, &["ый", "ий", "ой", "ого", "его"]),
        ],
    ),
    (
        Gender::Feminine,
        &[
            (Case::Nominative, &["ая", "яя"]),
            (Case::Genitive, &["ой", "ей"]),
            (Case::Accusative, &["ую", "юю"]),
        ],
    ),
    (
        Gender::Neuter,
        &[
            (Case::Nominative, &["ое", "ее"]),
            (Case::Genitive, &["ого", "его"]),
            (Case::Accusative, &["ое", "ее"]),
        ],
    ),
];

/// Oblique adjective endings. Only consulted when listing alternative
/// readings of a word already classified as an adjective.
pub(super) const OBLIQUE_ADJECTIVE_ENDINGS: &[(Gender, CaseEndings)] = &[
    (
        Gender::Masculine,
        &[
            (Case::Dative, &["ому", "ему"]),
            (Case::Instrumental, &["ым", "им"]),
            (Case::Prepositional, &["ом", "ем"]),
        ],
    ),
    (
        Gender::Feminine,
        &[
            (Case::Dative, &["ой", "ей"]),
            (Case::Instrumental, &["ой", "ей"]),
            (Case::Prepositional, &["ой", "ей"]),
        ],
    ),
    (
        Gender::Neuter,
        &[
            (Case::Dative, &["ому", "ему"]),
            (Case::Instrumental, &["ым", "им"]),
            (Case::Prepositional, &["ом", "ем"]),
        ],
    ),
];

pub(super) const PLURAL_ADJECTIVE_ENDINGS: &[&str] = &["ые", "ие"];

/// Neuter nouns in -ие that would otherwise read as soft plural adjectives.
pub(super) const IE_NOUN_ENDINGS: &[&str] = &["ение", "ание", "тие", "вие"];

pub(super) struct KnownWord {
    pub word: &'static str,
    pub part_of_speech: PartOfSpeech,
    pub gender: Option<Gender>,
    pub number: Number,
    pub person: Option<Person>,
}

const fn noun(word: &'static str, gender: Option<Gender>, number: Number) -> KnownWord {
    KnownWord {
        word,
        part_of_speech: PartOfSpeech::Noun,
        gender,
        number,
        person: None,
    }
}

const fn pronoun(word: &'static str, gender: Option<Gender>, number: Number, person: Person) -> KnownWord {
    KnownWord {
        word,
        part_of_speech: PartOfSpeech::Pronoun,
        gender,
        number,
        person: Some(person),
    }
}

pub(super) const KNOWN_WORDS: &[KnownWord] = &[
    noun("мама", Some(Gender::Feminine), Number::Singular),
    noun("папа", Some(Gender::Masculine), Number::Singular),
    noun("дом", Some(Gender::Masculine), Number::Singular),
    noun("книга", Some(Gender::Feminine), Number::Singular),
    noun("окно", Some(Gender::Neuter), Number::Singular),
    noun("дети", None, Number::Plural),
    noun("люди", None, Number::Plural),
    noun("книги", Some(Gender::Feminine), Number::Plural),
    noun("дома", Some(Gender::Masculine), Number::Plural),
    pronoun("я", None, Number::Singular, Person::First),
    pronoun("ты", None, Number::Singular, Person::Second),
    pronoun("он", Some(Gender::Masculine), Number::Singular, Person::Third),
    pronoun("она", Some(Gender::Feminine), Number::Singular, Person::Third),
    pronoun("оно", Some(Gender::Neuter), Number::Singular, Person::Third),
    pronoun("мы", None, Number::Plural, Person::First),
    pronoun("вы", None, Number::Plural, Person::Second),
    pronoun("они", None, Number::Plural, Person::Third),
];

/// Irregular adjective forms: (lemma, gender, case, form).
pub(super) const ADJECTIVE_FORMS: &[(&str, Gender, Case, &str)] = &[
    ("большой", Gender::Masculine, Case::Nominative, "большой"),
    ("большой", Gender::Masculine, Case::Accusative, "большого"),
    ("большой", Gender::Feminine, Case::Nominative, "большая"),
    ("большой", Gender::Feminine, Case::Accusative, "большую"),
    ("большой", Gender::Neuter, Case::Nominative, "большое"),
    ("большой", Gender::Neuter, Case::Accusative, "большое"),
    ("красивый", Gender::Masculine, Case::Nominative, "красивый"),
    ("красивый", Gender::Masculine, Case::Accusative, "красивого"),
    ("красивый", Gender::Feminine, Case::Nominative, "красивая"),
    ("красивый", Gender::Feminine, Case::Accusative, "красивую"),
    ("красивый", Gender::Neuter, Case::Nominative, "красивое"),
    ("красивый", Gender::Neuter, Case::Accusative, "красивое"),
    ("хороший", Gender::Masculine, Case::Nominative, "хороший"),
    ("хороший", Gender::Masculine, Case::Accusative, "хорошего"),
    ("хороший", Gender::Feminine, Case::Nominative, "хорошая"),
    ("хороший", Gender::Feminine, Case::Accusative, "хорошую"),
    ("хороший", Gender::Neuter, Case::Nominative, "хорошее"),
    ("хороший", Gender::Neuter, Case::Accusative, "хорошее"),
];
