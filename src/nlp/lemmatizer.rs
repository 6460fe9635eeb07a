//! Лемматизатор
//!
//! Приведение слова к словарной форме с учётом части речи.
//! Устроен по образцу morphy из WordNet: таблицы исключений,
//! правила отсечения окончаний и проверка кандидатов по словарю лемм.
//! Для слов вне словаря используются эвристики восстановления основы.

use crate::models::PartOfSpeech;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::{Arc, LazyLock};

/// Трейт лемматизатора
pub trait Lemmatizer: Debug + Send + Sync {
    /// Вернуть лемму слова для указанной части речи
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String;
}

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const ADJECTIVE_RULES: &[(&str, &str)] = &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")];

const NOUN_EXCEPTIONS: &[(&str, &str)] = &[
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
];

const VERB_EXCEPTIONS: &[(&str, &str)] = &[
    ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"),
    ("been", "be"), ("being", "be"), ("has", "have"), ("had", "have"),
    ("having", "have"), ("does", "do"), ("did", "do"), ("done", "do"),
    ("went", "go"), ("gone", "go"), ("goes", "go"), ("got", "get"),
    ("gotten", "get"), ("made", "make"), ("saw", "see"), ("seen", "see"),
    ("said", "say"), ("took", "take"), ("taken", "take"), ("came", "come"),
    ("gave", "give"), ("given", "give"), ("thought", "think"), ("told", "tell"),
    ("felt", "feel"), ("found", "find"), ("knew", "know"), ("known", "know"),
    ("bought", "buy"), ("brought", "bring"), ("kept", "keep"), ("left", "leave"),
    ("lost", "lose"), ("won", "win"), ("ate", "eat"), ("eaten", "eat"),
    ("began", "begin"), ("begun", "begin"), ("sought", "seek"), ("ran", "run"),
    ("sat", "sit"), ("stood", "stand"), ("wrote", "write"), ("written", "write"),
    ("spoke", "speak"), ("spoken", "speak"), ("broke", "break"), ("broken", "break"),
    ("chose", "choose"), ("chosen", "choose"), ("fell", "fall"), ("fallen", "fall"),
    ("forgot", "forget"), ("forgotten", "forget"), ("met", "meet"), ("paid", "pay"),
    ("sent", "send"), ("spent", "spend"), ("built", "build"), ("heard", "hear"),
    ("held", "hold"), ("meant", "mean"), ("slept", "sleep"), ("taught", "teach"),
    ("understood", "understand"), ("wore", "wear"), ("worn", "wear"),
    ("bit", "bite"), ("drove", "drive"), ("driven", "drive"), ("flew", "fly"),
    ("grew", "grow"), ("grown", "grow"), ("sang", "sing"), ("sung", "sing"),
    ("swam", "swim"), ("threw", "throw"), ("thrown", "throw"), ("woke", "wake"),
];

const ADJECTIVE_EXCEPTIONS: &[(&str, &str)] = &[
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("bigger", "big"),
    ("biggest", "big"),
    ("hotter", "hot"),
    ("hottest", "hot"),
    ("sadder", "sad"),
    ("saddest", "sad"),
];

/// Словарь известных лемм (всех частей речи)
const KNOWN_LEMMAS: &[&str] = &[
    // глаголы
    "be", "have", "do", "go", "get", "make", "see", "say", "take", "come", "give",
    "think", "tell", "feel", "find", "know", "buy", "bring", "keep", "leave", "lose",
    "win", "eat", "begin", "seek", "run", "sit", "stand", "write", "speak", "break",
    "choose", "fall", "forget", "meet", "pay", "send", "spend", "build", "hear",
    "hold", "mean", "sleep", "teach", "understand", "wear", "bite", "drive", "fly",
    "grow", "sing", "swim", "throw", "wake", "love", "hate", "like", "dislike",
    "want", "need", "hope", "miss", "thank", "wish", "enjoy", "seem", "look", "work",
    "try", "believe", "trust", "follow", "watch", "wait", "let", "help", "start",
    "stop", "use", "play", "live", "move", "call", "ask", "show", "turn", "change",
    "open", "close", "walk", "talk", "read", "learn", "agree", "free", "sell",
    "cry", "laugh", "smile", "share", "happen", "visit", "finish", "die", "kill",
    "suck", "fail", "ruin", "annoy", "disappoint", "amaze", "recommend", "appreciate",
    "excite", "bore", "waste", "break", "crash", "return", "complain", "worry",
    "hurt", "cancel", "delay", "fix", "improve", "adore", "praise", "regret",
    "care", "deserve", "celebrate", "welcome", "please", "promise", "bleed", "feed",
    "speed", "succeed", "proceed", "dance",
    // существительные
    "thing", "morning", "evening", "nothing", "something", "everything", "anything",
    "king", "ring", "wedding", "building", "spring", "string", "feeling", "meeting",
    "day", "time", "week", "weekend", "night", "year", "today", "tomorrow", "people",
    "person", "friend", "family", "life", "child", "man", "woman", "mouse", "foot",
    "tooth", "goose", "wife", "knife", "leaf", "wolf", "half", "shelf", "product",
    "company", "service", "phone", "iphone", "app", "game", "movie", "music", "song",
    "news", "thanks", "series", "species", "lens", "bus", "gas", "yes", "glass",
    "business", "address", "dress", "class", "process", "success", "mess", "chaos",
    "status", "virus", "focus", "bonus", "campus", "analysis", "basis", "crisis",
    "accuracy", "quality", "price", "customer", "support", "update", "experience",
    "problem", "issue", "bug", "quarter", "gadget", "shit", "fun", "luck", "birthday",
    "christmas", "tennis", "physics", "politics", "always", "perhaps", "sometimes",
    // прилагательные и наречия
    "good", "bad", "big", "hot", "sad", "great", "nice", "happy", "awesome",
    "amazing", "terrible", "awful", "horrible", "new", "old", "little", "cool",
    "lovely", "beautiful", "wonderful", "excellent", "perfect", "poor", "sorry",
    "glad", "sick", "tired", "angry", "boring", "interesting", "decent", "fine",
    "cute", "funny", "cold", "wrong", "right", "sure", "fantastic",
    "brilliant", "useless", "broken", "slow", "fast", "cheap", "expensive", "late",
    "early", "less", "unless", "various", "serious", "famous", "previous", "nervous",
    "delicious", "gorgeous", "generous", "ridiculous", "obvious",
];

static NOUN_EXCEPTION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| NOUN_EXCEPTIONS.iter().copied().collect());
static VERB_EXCEPTION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| VERB_EXCEPTIONS.iter().copied().collect());
static ADJECTIVE_EXCEPTION_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ADJECTIVE_EXCEPTIONS.iter().copied().collect());
static KNOWN_LEMMA_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| KNOWN_LEMMAS.iter().copied().collect());

static DEFAULT_LEMMATIZER: LazyLock<Arc<WordNetLemmatizer>> =
    LazyLock::new(|| Arc::new(WordNetLemmatizer::new()));

const ALL_POS: [PartOfSpeech; 4] = [
    PartOfSpeech::Verb,
    PartOfSpeech::Noun,
    PartOfSpeech::Adjective,
    PartOfSpeech::Adverb,
];

/// Лемматизатор в стиле WordNet morphy
#[derive(Debug, Clone)]
pub struct WordNetLemmatizer {
    /// Минимальная длина основы после отсечения окончания
    min_stem_length: usize,
}

impl WordNetLemmatizer {
    pub fn new() -> Self {
        Self { min_stem_length: 2 }
    }

    /// Общий для процесса экземпляр
    pub fn shared() -> Arc<WordNetLemmatizer> {
        Arc::clone(&DEFAULT_LEMMATIZER)
    }

    /// Установить минимальную длину основы
    pub fn with_min_stem_length(mut self, len: usize) -> Self {
        self.min_stem_length = len;
        self
    }

    fn exception(word: &str, pos: PartOfSpeech) -> Option<&'static str> {
        match pos {
            PartOfSpeech::Noun => NOUN_EXCEPTION_MAP.get(word).copied(),
            PartOfSpeech::Verb => VERB_EXCEPTION_MAP.get(word).copied(),
            PartOfSpeech::Adjective => ADJECTIVE_EXCEPTION_MAP.get(word).copied(),
            PartOfSpeech::Adverb => None,
        }
    }

    fn rules(pos: PartOfSpeech) -> &'static [(&'static str, &'static str)] {
        match pos {
            PartOfSpeech::Noun => NOUN_RULES,
            PartOfSpeech::Verb => VERB_RULES,
            PartOfSpeech::Adjective => ADJECTIVE_RULES,
            PartOfSpeech::Adverb => &[],
        }
    }

    /// Кратчайший кандидат из правил, найденный в словаре
    fn known_candidate(&self, word: &str, pos: PartOfSpeech) -> Option<String> {
        Self::rules(pos)
            .iter()
            .filter_map(|(suffix, replacement)| {
                let stem = word.strip_suffix(suffix)?;
                if stem.is_empty() {
                    return None;
                }
                let candidate = format!("{}{}", stem, replacement);
                KNOWN_LEMMA_SET
                    .contains(candidate.as_str())
                    .then_some(candidate)
            })
            .min_by_key(|c| c.len())
    }

    /// Эвристическая лемма для слова вне словаря
    fn heuristic(&self, word: &str, pos: PartOfSpeech) -> Option<String> {
        let len = word.chars().count();
        match pos {
            PartOfSpeech::Noun => {
                if len > 4 && word.ends_with("ies") {
                    return Some(format!("{}y", &word[..word.len() - 3]));
                }
                for suffix in ["ches", "shes", "xes", "zes", "sses"] {
                    if word.ends_with(suffix) {
                        return Some(word[..word.len() - 2].to_string());
                    }
                }
                self.strip_plural_s(word)
            }
            PartOfSpeech::Verb => {
                if len > 4 && word.ends_with("ies") {
                    return Some(format!("{}y", &word[..word.len() - 3]));
                }
                if len > 4 && word.ends_with("ied") {
                    return Some(format!("{}y", &word[..word.len() - 3]));
                }
                for suffix in ["ches", "shes", "xes", "zes", "sses", "oes"] {
                    if word.ends_with(suffix) {
                        return Some(word[..word.len() - 2].to_string());
                    }
                }
                if len > 5 && word.ends_with("eed") {
                    return Some(word[..word.len() - 1].to_string());
                }
                if len > 4 && word.ends_with("ed") {
                    return self.restore_stem(&word[..word.len() - 2]);
                }
                if len > 5 && word.ends_with("ing") {
                    return self.restore_stem(&word[..word.len() - 3]);
                }
                self.strip_plural_s(word)
            }
            PartOfSpeech::Adjective | PartOfSpeech::Adverb => None,
        }
    }

    fn strip_plural_s(&self, word: &str) -> Option<String> {
        if word.chars().count() <= 3 || !word.ends_with('s') {
            return None;
        }
        if ["ss", "us", "is", "'s"].iter().any(|s| word.ends_with(s)) {
            return None;
        }
        Some(word[..word.len() - 1].to_string())
    }

    /// Восстановить основу после отсечения -ed / -ing
    fn restore_stem(&self, stem: &str) -> Option<String> {
        let chars: Vec<char> = stem.chars().collect();
        if chars.len() < self.min_stem_length || !chars.iter().any(|c| is_vowel(*c)) {
            return None;
        }

        let last = chars[chars.len() - 1];
        let prev = chars.get(chars.len().wrapping_sub(2)).copied();

        // stopped -> stop
        if prev == Some(last) && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z') {
            return Some(chars[..chars.len() - 1].iter().collect());
        }

        // loved -> love, amazing -> amaze, danced -> dance
        let needs_e = last == 'v'
            || (last == 'z' && prev.is_some_and(is_vowel))
            || (last == 'c' && prev.is_some_and(|p| p == 'n' || is_vowel(p)))
            || (last == 's' && chars.len() <= 4 && prev.is_some_and(is_vowel))
            || (is_cvc(&chars) && vowel_groups(&chars) == 1);

        if needs_e {
            Some(format!("{}e", stem))
        } else {
            Some(stem.to_string())
        }
    }

    /// Слово устойчиво: повторная лемматизация его не меняет
    fn is_stable(&self, word: &str) -> bool {
        if KNOWN_LEMMA_SET.contains(word) {
            return true;
        }
        ALL_POS.iter().all(|&pos| {
            Self::exception(word, pos).is_none()
                && self.known_candidate(word, pos).is_none()
                && self.heuristic(word, pos).is_none()
        })
    }
}

impl Default for WordNetLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lemmatizer for WordNetLemmatizer {
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
        if word.is_empty() {
            return String::new();
        }

        let lower = word.to_lowercase();

        // Числа, хэштеги, "n't" и прочее не трогаем
        if !lower.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-') {
            return word.to_string();
        }

        if KNOWN_LEMMA_SET.contains(lower.as_str()) {
            return lower;
        }

        if let Some(lemma) = Self::exception(&lower, pos) {
            return lemma.to_string();
        }

        if let Some(lemma) = self.known_candidate(&lower, pos) {
            return lemma;
        }

        match self.heuristic(&lower, pos) {
            Some(lemma) if self.is_stable(&lemma) => lemma,
            _ => word.to_string(),
        }
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Согласная-гласная-согласная на конце, последняя не w/x/y
fn is_cvc(chars: &[char]) -> bool {
    if chars.len() < 3 {
        return false;
    }
    let n = chars.len();
    !is_vowel(chars[n - 3])
        && is_vowel(chars[n - 2])
        && !is_vowel(chars[n - 1])
        && !matches!(chars[n - 1], 'w' | 'x' | 'y')
}

fn vowel_groups(chars: &[char]) -> usize {
    let mut groups = 0;
    let mut in_group = false;
    for &c in chars {
        if is_vowel(c) {
            if !in_group {
                groups += 1;
            }
            in_group = true;
        } else {
            in_group = false;
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str, pos: PartOfSpeech) -> String {
        WordNetLemmatizer::new().lemmatize(word, pos)
    }

    #[test]
    fn test_noun_plurals() {
        assert_eq!(lemma("cats", PartOfSpeech::Noun), "cat");
        assert_eq!(lemma("products", PartOfSpeech::Noun), "product");
        assert_eq!(lemma("companies", PartOfSpeech::Noun), "company");
        assert_eq!(lemma("boxes", PartOfSpeech::Noun), "box");
        assert_eq!(lemma("children", PartOfSpeech::Noun), "child");
        assert_eq!(lemma("news", PartOfSpeech::Noun), "news");
        assert_eq!(lemma("glass", PartOfSpeech::Noun), "glass");
    }

    #[test]
    fn test_verb_forms() {
        assert_eq!(lemma("loved", PartOfSpeech::Verb), "love");
        assert_eq!(lemma("loving", PartOfSpeech::Verb), "love");
        assert_eq!(lemma("went", PartOfSpeech::Verb), "go");
        assert_eq!(lemma("stopped", PartOfSpeech::Verb), "stop");
        assert_eq!(lemma("hated", PartOfSpeech::Verb), "hate");
        assert_eq!(lemma("wanted", PartOfSpeech::Verb), "want");
        assert_eq!(lemma("finding", PartOfSpeech::Verb), "find");
        assert_eq!(lemma("is", PartOfSpeech::Verb), "be");
    }

    #[test]
    fn test_heuristic_stems() {
        assert_eq!(lemma("jumped", PartOfSpeech::Verb), "jump");
        assert_eq!(lemma("hoping", PartOfSpeech::Verb), "hope");
        assert_eq!(lemma("hopping", PartOfSpeech::Verb), "hop");
        assert_eq!(lemma("tweets", PartOfSpeech::Noun), "tweet");
    }

    #[test]
    fn test_adjectives() {
        assert_eq!(lemma("better", PartOfSpeech::Adjective), "good");
        assert_eq!(lemma("nicer", PartOfSpeech::Adjective), "nice");
        assert_eq!(lemma("happy", PartOfSpeech::Adjective), "happy");
        // Неизвестные прилагательные не меняются
        assert_eq!(lemma("shiny", PartOfSpeech::Adjective), "shiny");
    }

    #[test]
    fn test_non_words_untouched() {
        assert_eq!(lemma("", PartOfSpeech::Noun), "");
        assert_eq!(lemma("2020", PartOfSpeech::Noun), "2020");
        assert_eq!(lemma("#happy", PartOfSpeech::Noun), "#happy");
        assert_eq!(lemma("!!!", PartOfSpeech::Adjective), "!!!");
    }

    #[test]
    fn test_lemmas_are_fixed_points() {
        let lemmatizer = WordNetLemmatizer::new();
        let words = [
            "cats", "loved", "hoping", "tweets", "companies", "stopped", "dressed",
            "focused", "bleeding", "buses", "amazing", "danced", "things", "mornings",
        ];

        for word in words {
            for pos in ALL_POS {
                let once = lemmatizer.lemmatize(word, pos);
                assert_eq!(lemmatizer.lemmatize(&once, pos), once, "{word} {pos:?}");

                if once != word {
                    for other in ALL_POS {
                        assert_eq!(lemmatizer.lemmatize(&once, other), once, "{word} {pos:?} {other:?}");
                    }
                }
            }
        }
    }
}
