//! Предобработка токенов
//!
//! Очистка и лемматизация размеченных токенов:
//! 1. Удаление ссылок и упоминаний (@user)
//! 2. Выбор части речи по первому символу тега
//! 3. Лемматизация
//! 4. Фильтрация коротких токенов и стоп-слов, приведение к нижнему регистру

use crate::models::{PartOfSpeech, TaggedToken};
use crate::nlp::lemmatizer::{Lemmatizer, WordNetLemmatizer};
use crate::nlp::stopwords::StopWords;
use crate::nlp::tagger::{PosTagger, RuleTagger};
use crate::nlp::tokenizer::Tokenizer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, LazyLock};

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://\S+|www\.[a-zA-Z0-9][a-zA-Z0-9-]*\.\S{2,}").unwrap()
});
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").unwrap());

/// Соответствие тега части речи аргументу лемматизатора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PosMapping {
    /// `V` -> глагол, `N` -> существительное, иначе прилагательное
    #[default]
    Basic,
    /// Дополнительно `R` -> наречие
    Extended,
}

impl PosMapping {
    /// Часть речи по тегу Penn Treebank
    pub fn resolve(&self, tag: &str) -> PartOfSpeech {
        match (tag.chars().next(), self) {
            (Some('V'), _) => PartOfSpeech::Verb,
            (Some('N'), _) => PartOfSpeech::Noun,
            (Some('R'), PosMapping::Extended) => PartOfSpeech::Adverb,
            _ => PartOfSpeech::Adjective,
        }
    }
}

/// Какие леммы считаются слишком короткими
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenFilter {
    /// Длина больше одного символа
    #[default]
    MinLength,
    /// Непустые и не состоящие из одной пунктуации
    PunctuationAware,
}

impl TokenFilter {
    fn keeps(&self, lemma: &str) -> bool {
        match self {
            TokenFilter::MinLength => lemma.chars().count() > 1,
            TokenFilter::PunctuationAware => {
                !lemma.is_empty() && !lemma.chars().all(|c| c.is_ascii_punctuation())
            }
        }
    }
}

/// Предобработчик токенов
#[derive(Debug, Clone)]
pub struct Preprocessor {
    tokenizer: Tokenizer,
    tagger: Arc<dyn PosTagger>,
    lemmatizer: Arc<dyn Lemmatizer>,
    stop_words: Arc<StopWords>,
    pos_mapping: PosMapping,
    token_filter: TokenFilter,
}

impl Preprocessor {
    /// Создать предобработчик с ресурсами по умолчанию
    pub fn new() -> Self {
        Self {
            tokenizer: Tokenizer::new(),
            tagger: Arc::new(RuleTagger::new()),
            lemmatizer: WordNetLemmatizer::shared(),
            stop_words: StopWords::english(),
            pos_mapping: PosMapping::Basic,
            token_filter: TokenFilter::MinLength,
        }
    }

    /// Установить токенизатор
    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    /// Установить теггер частей речи
    pub fn with_tagger(mut self, tagger: Arc<dyn PosTagger>) -> Self {
        self.tagger = tagger;
        self
    }

    /// Установить лемматизатор
    pub fn with_lemmatizer(mut self, lemmatizer: Arc<dyn Lemmatizer>) -> Self {
        self.lemmatizer = lemmatizer;
        self
    }

    /// Установить набор стоп-слов
    pub fn with_stop_words(mut self, stop_words: Arc<StopWords>) -> Self {
        self.stop_words = stop_words;
        self
    }

    pub fn with_pos_mapping(mut self, mapping: PosMapping) -> Self {
        self.pos_mapping = mapping;
        self
    }

    pub fn with_token_filter(mut self, filter: TokenFilter) -> Self {
        self.token_filter = filter;
        self
    }

    pub fn pos_mapping(&self) -> PosMapping {
        self.pos_mapping
    }

    pub fn token_filter(&self) -> TokenFilter {
        self.token_filter
    }

    /// Очистить и лемматизировать размеченные токены
    ///
    /// Порядок сохраняется, повторы допускаются. Токен, ставший пустым после
    /// удаления ссылок и упоминаний, отбрасывается без вызова лемматизатора.
    pub fn clean_and_lemmatize(&self, tagged_tokens: &[TaggedToken]) -> Vec<String> {
        let mut cleaned = Vec::with_capacity(tagged_tokens.len());

        for TaggedToken { text, tag } in tagged_tokens {
            let without_urls = URL_REGEX.replace_all(text, "");
            let stripped = MENTION_REGEX.replace_all(&without_urls, "");

            if stripped.is_empty() {
                continue;
            }

            let pos = self.pos_mapping.resolve(tag);
            let lemma = self.lemmatizer.lemmatize(&stripped, pos);
            let lower = lemma.to_lowercase();

            if self.token_filter.keeps(&lemma) && !self.stop_words.contains(&lower) {
                cleaned.push(lower);
            }
        }

        cleaned
    }

    /// Разметить и очистить уже токенизированный текст
    pub fn process(&self, tokens: &[String]) -> Vec<String> {
        let tagged = self.tagger.tag(tokens);
        self.clean_and_lemmatize(&tagged)
    }

    /// Полный конвейер: токенизация, разметка, очистка
    pub fn process_text(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenizer.tokenize_to_strings(text);
        self.process(&tokens)
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn tagged(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs.iter().map(|&(t, g)| TaggedToken::new(t, g)).collect()
    }

    #[derive(Debug, Default)]
    struct RecordingLemmatizer {
        calls: Mutex<Vec<(String, PartOfSpeech)>>,
    }

    impl Lemmatizer for RecordingLemmatizer {
        fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> String {
            self.calls.lock().unwrap().push((word.to_string(), pos));
            word.to_string()
        }
    }

    #[test]
    fn test_stop_words_removed() {
        let preprocessor = Preprocessor::new();
        let cleaned = preprocessor.clean_and_lemmatize(&tagged(&[("the", "DT"), ("cats", "NNS")]));

        assert_eq!(cleaned, vec!["cat"]);
    }

    #[test]
    fn test_urls_and_mentions_stripped() {
        let preprocessor = Preprocessor::new();
        let cleaned = preprocessor.clean_and_lemmatize(&tagged(&[
            ("https://example.com/x", "NN"),
            ("www.example.org", "NN"),
            ("@someone", "NN"),
            ("@bob_42:", "NN"),
            ("coffee", "NN"),
        ]));

        assert_eq!(cleaned, vec!["coffee"]);
    }

    #[test]
    fn test_empty_tokens_never_lemmatized() {
        let recorder = Arc::new(RecordingLemmatizer::default());
        let preprocessor = Preprocessor::new().with_lemmatizer(recorder.clone());

        preprocessor.clean_and_lemmatize(&tagged(&[("@user", "NN"), ("http://t.co/abc", "JJ")]));

        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_pos_mapping() {
        let recorder = Arc::new(RecordingLemmatizer::default());
        let preprocessor = Preprocessor::new().with_lemmatizer(recorder.clone());
        preprocessor.clean_and_lemmatize(&tagged(&[
            ("running", "VBG"),
            ("dogs", "NNS"),
            ("quickly", "RB"),
            ("happy", "JJ"),
        ]));

        let pos: Vec<_> = recorder.calls.lock().unwrap().iter().map(|(_, p)| *p).collect();
        assert_eq!(
            pos,
            vec![
                PartOfSpeech::Verb,
                PartOfSpeech::Noun,
                PartOfSpeech::Adjective,
                PartOfSpeech::Adjective,
            ]
        );

        assert_eq!(PosMapping::Extended.resolve("RB"), PartOfSpeech::Adverb);
        assert_eq!(PosMapping::Basic.resolve(""), PartOfSpeech::Adjective);
    }

    #[test]
    fn test_short_and_punctuation_tokens() {
        let tokens = tagged(&[("!", "."), ("x", "NN"), ("...", ":"), ("wow", "UH")]);

        // Многоточие длиннее одного символа и проходит базовый фильтр
        let default = Preprocessor::new().clean_and_lemmatize(&tokens);
        assert_eq!(default, vec!["...", "wow"]);

        let aware = Preprocessor::new()
            .with_token_filter(TokenFilter::PunctuationAware)
            .clean_and_lemmatize(&tokens);
        assert_eq!(aware, vec!["x", "wow"]);
    }

    #[test]
    fn test_output_lowercased() {
        let preprocessor = Preprocessor::new();
        let cleaned = preprocessor.clean_and_lemmatize(&tagged(&[("Apple", "NNP"), ("GREAT", "JJ")]));

        assert_eq!(cleaned, vec!["apple", "great"]);
    }

    #[test]
    fn test_process_text() {
        let preprocessor = Preprocessor::new();

        assert_eq!(
            preprocessor.process_text("I love this great product"),
            vec!["love", "great", "product"]
        );
        assert_eq!(
            preprocessor.process_text("this is terrible and awful"),
            vec!["terrible", "awful"]
        );
        assert_eq!(
            preprocessor.process_text("@jane loved the new phones https://t.co/xyz !"),
            vec!["love", "new", "phone"]
        );
    }

    #[test]
    fn test_idempotent_on_cleaned_tokens() {
        let preprocessor = Preprocessor::new();
        let texts = [
            "I do not think Apple is a good company",
            "Trust I seek and I am finding you",
            "The new gadget from Xtime is amazing, loving it!",
            "Cats were chasing the mice all morning",
        ];

        for text in texts {
            let once = preprocessor.process_text(text);
            let twice = preprocessor.process(&once);
            assert_eq!(once, twice, "{text}");
        }
    }

    #[test]
    fn test_deterministic() {
        let preprocessor = Preprocessor::new();
        let text = "Worst service ever... waited 2 hours @airline #fail";

        let first = preprocessor.process_text(text);
        for _ in 0..5 {
            assert_eq!(preprocessor.process_text(text), first);
        }
    }
}
