//! Типы данных для анализа твитов

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Токен (результат токенизации)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Оригинальная форма
    pub original: String,
    /// Позиция в тексте
    pub position: usize,
    /// Тип токена
    pub token_type: TokenType,
}

/// Тип токена
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Слово
    Word,
    /// Число
    Number,
    /// Хэштег
    Hashtag,
    /// Упоминание (@user)
    Mention,
    /// URL
    Url,
    /// Знак препинания
    Punctuation,
    /// Эмодзи и прочие символы
    Emoji,
}

/// Токен с тегом части речи (Penn Treebank: `NNS`, `VBD`, `JJ`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub tag: String,
}

impl TaggedToken {
    pub fn new(text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag: tag.into(),
        }
    }
}

impl<T: Into<String>, G: Into<String>> From<(T, G)> for TaggedToken {
    fn from((text, tag): (T, G)) -> Self {
        Self::new(text, tag)
    }
}

/// Часть речи для лемматизатора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Verb,
    Noun,
    Adjective,
    Adverb,
}

/// Метка настроения (только бинарная классификация)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Positive,
    Negative,
}

impl Label {
    /// Все метки в порядке перебора (он же порядок разрешения ничьих)
    pub const ALL: [Label; 2] = [Label::Positive, Label::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Positive => "positive",
            Label::Negative => "negative",
        }
    }

    /// Индекс метки в таблицах счётчиков
    pub(crate) fn index(&self) -> usize {
        match self {
            Label::Positive => 0,
            Label::Negative => 1,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Label::Positive),
            "negative" => Ok(Label::Negative),
            _ => Err(Error::UnsupportedLabel(s.to_string())),
        }
    }
}
