//! Модели данных

mod types;

pub use types::{Label, PartOfSpeech, TaggedToken, Token, TokenType};
