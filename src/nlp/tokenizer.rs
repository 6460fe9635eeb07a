//! Токенизатор текста
//!
//! Разбивает текст твита на токены (слова, числа, URL, упоминания, знаки препинания)
//! с сохранением исходного порядка.

use crate::models::{Token, TokenType};
use regex::Regex;
use std::sync::LazyLock;

/// Общий шаблон: альтернативы проверяются слева направо в каждой позиции
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?x)
        (?P<url>https?://\S+|www\.\S+)
        |(?P<mention>@\w+)
        |(?P<hashtag>\#\w+)
        |(?P<emoticon>[:;=][\-o*']?[)\](\[dDpP/\\}{@|]|<3)
        |(?P<number>\d+(?:[.,:]\d+)*)
        |(?P<word>\w+(?:['’]\w+)*)
        |(?P<punct>[[:punct:]]+)
        |(?P<other>\S)
        "#,
    )
    .unwrap()
});

/// Токенизатор текста
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Максимальная длина слова
    max_word_length: usize,
    /// Сохранять ли регистр
    preserve_case: bool,
    /// Разделять ли сокращения (`don't` -> `do`, `n't`)
    split_contractions: bool,
}

impl Tokenizer {
    /// Создать новый токенизатор с настройками по умолчанию
    pub fn new() -> Self {
        Self {
            max_word_length: 50,
            preserve_case: true,
            split_contractions: true,
        }
    }

    /// Установить максимальную длину слова
    pub fn with_max_length(mut self, len: usize) -> Self {
        self.max_word_length = len;
        self
    }

    /// Сохранять регистр
    pub fn preserve_case(mut self, preserve: bool) -> Self {
        self.preserve_case = preserve;
        self
    }

    /// Разделять сокращения
    pub fn split_contractions(mut self, split: bool) -> Self {
        self.split_contractions = split;
        self
    }

    /// Токенизировать текст
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();

        for caps in TOKEN_REGEX.captures_iter(text) {
            let (piece, token_type) = if let Some(m) = caps.name("url") {
                (m.as_str(), TokenType::Url)
            } else if let Some(m) = caps.name("mention") {
                (m.as_str(), TokenType::Mention)
            } else if let Some(m) = caps.name("hashtag") {
                (m.as_str(), TokenType::Hashtag)
            } else if let Some(m) = caps.name("emoticon") {
                (m.as_str(), TokenType::Emoji)
            } else if let Some(m) = caps.name("number") {
                (m.as_str(), TokenType::Number)
            } else if let Some(m) = caps.name("word") {
                (m.as_str(), TokenType::Word)
            } else if let Some(m) = caps.name("punct") {
                (m.as_str(), TokenType::Punctuation)
            } else if let Some(m) = caps.name("other") {
                (m.as_str(), TokenType::Emoji)
            } else {
                continue;
            };

            if token_type == TokenType::Word {
                if piece.chars().count() > self.max_word_length {
                    continue;
                }
                for part in self.split_word(piece) {
                    let position = tokens.len();
                    tokens.push(Token {
                        original: self.apply_case(part),
                        position,
                        token_type,
                    });
                }
            } else {
                let position = tokens.len();
                let original = match token_type {
                    TokenType::Url | TokenType::Mention | TokenType::Emoji => piece.to_string(),
                    _ => self.apply_case(piece),
                };
                tokens.push(Token {
                    original,
                    position,
                    token_type,
                });
            }
        }

        tokens
    }

    /// Токенизировать и вернуть только строки
    pub fn tokenize_to_strings(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .map(|t| t.original)
            .collect()
    }

    /// Разделить слово с апострофом на части
    fn split_word<'a>(&self, word: &'a str) -> Vec<&'a str> {
        if !self.split_contractions {
            return vec![word];
        }

        let Some(apostrophe) = word.find(['\'', '’']) else {
            return vec![word];
        };

        let lower = word.to_lowercase();
        if lower.ends_with("n't") || lower.ends_with("n’t") {
            // "don't" -> "do" + "n't"
            let suffix_len = word.chars().rev().take(3).map(char::len_utf8).sum::<usize>();
            let split_at = word.len() - suffix_len;
            if split_at > 0 {
                return vec![&word[..split_at], &word[split_at..]];
            }
            return vec![word];
        }

        if apostrophe == 0 {
            return vec![word];
        }

        // "it's" -> "it" + "'s"
        vec![&word[..apostrophe], &word[apostrophe..]]
    }

    fn apply_case(&self, piece: &str) -> String {
        if self.preserve_case {
            piece.to_string()
        } else {
            piece.to_lowercase()
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokenization() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_to_strings("Hello World!");

        assert_eq!(tokens, vec!["Hello", "World", "!"]);
    }

    #[test]
    fn test_special_tokens_keep_order() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Check @user and #coffee https://example.com/x now");

        let types: Vec<_> = tokens.iter().map(|t| t.token_type).collect();
        assert_eq!(
            types,
            vec![
                TokenType::Word,
                TokenType::Mention,
                TokenType::Word,
                TokenType::Hashtag,
                TokenType::Url,
                TokenType::Word,
            ]
        );
        assert_eq!(tokens[4].original, "https://example.com/x");
        assert!(tokens.iter().enumerate().all(|(i, t)| t.position == i));
    }

    #[test]
    fn test_contractions() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize_to_strings("I don't think it's bad");

        assert_eq!(tokens, vec!["I", "do", "n't", "think", "it", "'s", "bad"]);
    }

    #[test]
    fn test_contractions_disabled() {
        let tokenizer = Tokenizer::new().split_contractions(false);
        let tokens = tokenizer.tokenize_to_strings("won't");

        assert_eq!(tokens, vec!["won't"]);
    }

    #[test]
    fn test_emoticons_and_punctuation() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("great day :) ...");

        assert_eq!(tokens[2].original, ":)");
        assert_eq!(tokens[2].token_type, TokenType::Emoji);
        assert_eq!(tokens[3].original, "...");
        assert_eq!(tokens[3].token_type, TokenType::Punctuation);
    }

    #[test]
    fn test_lowercase_mode() {
        let tokenizer = Tokenizer::new().preserve_case(false);
        let tokens = tokenizer.tokenize_to_strings("Good Morning");

        assert_eq!(tokens, vec!["good", "morning"]);
    }
}
