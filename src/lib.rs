//! # Анализ настроений твитов
//!
//! Библиотека для определения полярности твитов наивным Байесовским
//! классификатором и мониторинга настроений в потоке сообщений.
//!
//! ## Модули
//!
//! - `nlp` - Токенизация, разметка частей речи, лемматизация, признаки
//! - `sentiment` - Классификатор, анализатор, корпуса, сохранение модели
//! - `stream` - Разбор сообщений потока и мониторинг настроений
//! - `config` - Конфигурация и параметры поиска
//! - `models` - Модели данных
//!
//! ## Пример
//!
//! ```no_run
//! use rust_tweet_sentiment::{SampleCorpus, SentimentAnalyzer};
//!
//! let mut analyzer = SentimentAnalyzer::new();
//! analyzer.train_from_provider(&SampleCorpus::new())?;
//! println!("{}", analyzer.classify("What a lovely day")?);
//! # Ok::<(), rust_tweet_sentiment::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod nlp;
pub mod sentiment;
pub mod stream;

pub use config::{AppConfig, SearchParameters, TrainingConfig};
pub use error::{Error, Result};
pub use models::Label;
pub use nlp::{FeatureSet, Preprocessor, Tokenizer};
pub use sentiment::{CorpusProvider, JsonCorpus, ModelStore, SampleCorpus, SentimentAnalyzer};
pub use stream::{FeedEvent, IncomingMessage, SentimentMonitor, StreamListener};
