//! Разметка частей речи
//!
//! Назначает каждому токену тег в нотации Penn Treebank.
//! Правила: словарь служебных и частых слов, затем суффиксы, затем контекст
//! (предыдущий тег). Результат детерминирован.

use crate::models::TaggedToken;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::LazyLock;

/// Трейт теггера частей речи
pub trait PosTagger: Debug + Send + Sync {
    /// Назначить тег каждому токену (длина результата равна длине входа)
    fn tag(&self, tokens: &[String]) -> Vec<TaggedToken>;
}

const LEXICON: &[(&str, &str)] = &[
    // определители
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("every", "DT"), ("each", "DT"), ("some", "DT"),
    ("any", "DT"), ("no", "DT"), ("all", "DT"), ("both", "DT"), ("another", "DT"),
    // предлоги и подчинительные союзы
    ("of", "IN"), ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"), ("for", "IN"),
    ("with", "IN"), ("from", "IN"), ("about", "IN"), ("into", "IN"), ("over", "IN"),
    ("after", "IN"), ("before", "IN"), ("under", "IN"), ("between", "IN"),
    ("through", "IN"), ("during", "IN"), ("without", "IN"), ("against", "IN"),
    ("since", "IN"), ("because", "IN"), ("if", "IN"), ("while", "IN"), ("as", "IN"),
    ("than", "IN"), ("though", "IN"), ("although", "IN"), ("until", "IN"), ("upon", "IN"),
    // сочинительные союзы
    ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"), ("yet", "CC"),
    // местоимения
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"),
    ("we", "PRP"), ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("us", "PRP"),
    ("them", "PRP"), ("myself", "PRP"), ("yourself", "PRP"), ("itself", "PRP"),
    ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"), ("her", "PRP$"), ("its", "PRP$"),
    ("our", "PRP$"), ("their", "PRP$"),
    // модальные
    ("can", "MD"), ("could", "MD"), ("will", "MD"), ("would", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"), ("'ll", "MD"),
    ("ca", "MD"), ("wo", "MD"),
    ("to", "TO"),
    // наречия
    ("not", "RB"), ("n't", "RB"), ("very", "RB"), ("really", "RB"), ("so", "RB"),
    ("too", "RB"), ("just", "RB"), ("never", "RB"), ("always", "RB"), ("also", "RB"),
    ("here", "RB"), ("there", "RB"), ("now", "RB"), ("then", "RB"), ("soon", "RB"),
    ("still", "RB"), ("even", "RB"), ("quite", "RB"), ("again", "RB"), ("ever", "RB"),
    ("already", "RB"), ("only", "RB"), ("more", "RBR"), ("most", "RBS"),
    // be / have / do
    ("is", "VBZ"), ("'s", "VBZ"), ("are", "VBP"), ("am", "VBP"), ("'m", "VBP"),
    ("'re", "VBP"), ("was", "VBD"), ("were", "VBD"), ("be", "VB"), ("been", "VBN"),
    ("being", "VBG"), ("has", "VBZ"), ("have", "VBP"), ("'ve", "VBP"), ("had", "VBD"),
    ("'d", "MD"), ("does", "VBZ"), ("do", "VBP"), ("did", "VBD"),
    // вопросительные
    ("what", "WP"), ("who", "WP"), ("whom", "WP"), ("which", "WDT"), ("when", "WRB"),
    ("where", "WRB"), ("why", "WRB"), ("how", "WRB"),
    // междометия
    ("lol", "UH"), ("omg", "UH"), ("yes", "UH"), ("yeah", "UH"), ("oh", "UH"),
    ("wow", "UH"), ("hi", "UH"), ("hello", "UH"), ("please", "UH"),
    // неправильные глаголы
    ("went", "VBD"), ("got", "VBD"), ("made", "VBD"), ("saw", "VBD"), ("felt", "VBD"),
    ("came", "VBD"), ("took", "VBD"), ("gave", "VBD"), ("said", "VBD"), ("told", "VBD"),
    ("thought", "VBD"), ("knew", "VBD"), ("found", "VBD"), ("bought", "VBD"),
    ("lost", "VBD"), ("won", "VBD"), ("kept", "VBD"), ("left", "VBD"), ("ate", "VBD"),
    ("began", "VBD"), ("broke", "VBD"), ("ran", "VBD"),
    ("gone", "VBN"), ("done", "VBN"), ("seen", "VBN"), ("given", "VBN"), ("taken", "VBN"),
    ("known", "VBN"), ("eaten", "VBN"),
    // прилагательные
    ("good", "JJ"), ("great", "JJ"), ("bad", "JJ"), ("nice", "JJ"), ("happy", "JJ"),
    ("sad", "JJ"), ("awesome", "JJ"), ("amazing", "JJ"), ("terrible", "JJ"),
    ("awful", "JJ"), ("horrible", "JJ"), ("new", "JJ"), ("old", "JJ"), ("big", "JJ"),
    ("little", "JJ"), ("cool", "JJ"), ("lovely", "JJ"), ("beautiful", "JJ"),
    ("wonderful", "JJ"), ("excellent", "JJ"), ("perfect", "JJ"), ("poor", "JJ"),
    ("sorry", "JJ"), ("glad", "JJ"), ("sick", "JJ"), ("tired", "JJ"), ("angry", "JJ"),
    ("boring", "JJ"), ("interesting", "JJ"), ("decent", "JJ"), ("fine", "JJ"),
    ("cute", "JJ"), ("funny", "JJ"), ("hot", "JJ"), ("cold", "JJ"), ("wrong", "JJ"),
    ("sure", "JJ"), ("fantastic", "JJ"), ("brilliant", "JJ"), ("slow", "JJ"),
    ("cheap", "JJ"), ("expensive", "JJ"), ("better", "JJR"), ("worse", "JJR"),
    ("best", "JJS"), ("worst", "JJS"),
    // существительные на -ing
    ("thing", "NN"), ("morning", "NN"), ("evening", "NN"), ("nothing", "NN"),
    ("something", "NN"), ("everything", "NN"), ("anything", "NN"), ("king", "NN"),
    ("ring", "NN"), ("wedding", "NN"), ("building", "NN"), ("spring", "NN"),
    ("feeling", "NN"), ("meeting", "NN"), ("news", "NN"), ("thanks", "NNS"),
];

/// Частые глаголы в базовой форме
const BASE_VERBS: &[&str] = &[
    "love", "hate", "like", "want", "need", "think", "know", "get", "go", "make", "see",
    "feel", "hope", "miss", "thank", "wish", "enjoy", "buy", "seem", "look", "come",
    "take", "give", "say", "tell", "work", "try", "believe", "trust", "seek", "find",
    "follow", "watch", "wait", "keep", "let", "help", "start", "stop", "win", "lose",
    "recommend", "suck", "ruin", "fail",
];

static LEXICON_MAP: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| LEXICON.iter().copied().collect());

/// Теггер на правилах
#[derive(Debug, Clone, Default)]
pub struct RuleTagger;

impl RuleTagger {
    pub fn new() -> Self {
        Self
    }

    fn tag_one(&self, token: &str, index: usize, prev_tag: Option<&str>) -> &'static str {
        let lower = token.to_lowercase();

        if let Some(tag) = punctuation_tag(token) {
            return tag;
        }
        if token.starts_with("http") || token.starts_with("www.") || token.starts_with('@') {
            return "NN";
        }
        if token.starts_with('#') {
            return "NN";
        }
        if token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',' || c == ':') {
            return "CD";
        }
        if !token.chars().any(char::is_alphanumeric) {
            return "UH";
        }

        if let Some(tag) = LEXICON_MAP.get(lower.as_str()) {
            return tag;
        }

        if BASE_VERBS.contains(&lower.as_str()) {
            return match prev_tag {
                Some("DT") | Some("PRP$") | Some("JJ") | Some("IN") => "NN",
                Some("TO") | Some("MD") | None => "VB",
                _ => "VBP",
            };
        }

        let len = lower.chars().count();

        if len > 4 && lower.ends_with("ing") {
            return "VBG";
        }
        if len > 3 && lower.ends_with("ed") {
            return match prev_tag {
                Some("VBZ") | Some("VBP") | Some("VBD") | Some("VB") => "VBN",
                _ => "VBD",
            };
        }
        if len > 3 && lower.ends_with("ly") {
            return "RB";
        }
        if ["ous", "ful", "ive", "able", "ible", "less", "ish"]
            .iter()
            .any(|s| len > s.len() + 2 && lower.ends_with(s))
        {
            return "JJ";
        }
        if matches!(prev_tag, Some("TO") | Some("MD")) {
            return "VB";
        }
        if len > 3
            && lower.ends_with('s')
            && !["ss", "us", "is"].iter().any(|s| lower.ends_with(s))
        {
            return match prev_tag {
                Some("PRP") | Some("NN") | Some("NNP") => "VBZ",
                _ => "NNS",
            };
        }
        if index > 0 && token.chars().next().is_some_and(char::is_uppercase) {
            return "NNP";
        }

        "NN"
    }
}

impl PosTagger for RuleTagger {
    fn tag(&self, tokens: &[String]) -> Vec<TaggedToken> {
        let mut tagged: Vec<TaggedToken> = Vec::with_capacity(tokens.len());

        for (index, token) in tokens.iter().enumerate() {
            let prev_tag = tagged.last().map(|t| t.tag.as_str());
            let tag = self.tag_one(token, index, prev_tag);
            tagged.push(TaggedToken::new(token.clone(), tag));
        }

        tagged
    }
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_punctuation()) {
        return None;
    }
    let tag = match token {
        "." | "!" | "?" => ".",
        "," => ",",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "\"" | "``" => "``",
        "$" => "$",
        "#" => "#",
        _ if token.chars().all(|c| matches!(c, '.' | '!' | '?')) => ".",
        _ => ":",
    };
    Some(tag)
}
