//! Модуль обработки естественного языка (NLP)
//!
//! Включает:
//! - Токенизацию текста
//! - Разметку частей речи
//! - Лемматизацию и стоп-слова
//! - Предобработку (очистка ссылок и упоминаний, фильтрация)
//! - Построение бинарных признаков

mod features;
mod lemmatizer;
mod preprocessor;
mod stopwords;
mod tagger;
mod tokenizer;

pub use features::FeatureSet;
pub use lemmatizer::{Lemmatizer, WordNetLemmatizer};
pub use preprocessor::{PosMapping, Preprocessor, TokenFilter};
pub use stopwords::StopWords;
pub use tagger::{PosTagger, RuleTagger};
pub use tokenizer::Tokenizer;
