//! Модуль анализа настроений
//!
//! Включает:
//! - Наивный Байесовский классификатор
//! - Анализатор: обучение, оценка точности, классификация текста
//! - Источники размеченных корпусов
//! - Сохранение обученной модели

mod analyzer;
mod corpus;
mod naive_bayes;
mod persistence;

pub use analyzer::SentimentAnalyzer;
pub use corpus::{CorpusProvider, JsonCorpus, SampleCorpus, NEGATIVE_FILE, POSITIVE_FILE};
pub use naive_bayes::{
    InformativeFeature, LabelProbabilities, LabeledExample, NaiveBayesClassifier, Smoothing,
};
pub use persistence::{ModelStore, PersistedModel, DEFAULT_MODEL_FILE};
