//! Сохранение обученной модели на диск
//!
//! Модель, точность, размеры выборок и параметры предобработки
//! пишутся одним bincode-блобом.

use crate::error::{Error, Result};
use crate::nlp::{PosMapping, TokenFilter};
use crate::sentiment::naive_bayes::NaiveBayesClassifier;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Имя файла модели по умолчанию
pub const DEFAULT_MODEL_FILE: &str = "tweet_bayes.bin";

const FORMAT_VERSION: u32 = 2;

/// Содержимое файла модели
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedModel {
    pub classifier: NaiveBayesClassifier,
    pub accuracy: f64,
    pub train_len: usize,
    pub test_len: usize,
    /// Предобработка, с которой строились признаки при обучении
    pub pos_mapping: PosMapping,
    pub token_filter: TokenFilter,
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    model: PersistedModel,
}

/// Хранилище модели
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Записать модель
    pub fn save(&self, model: &PersistedModel) -> Result<()> {
        let envelope = Envelope {
            version: FORMAT_VERSION,
            model: model.clone(),
        };
        let bytes = bincode::serialize(&envelope)
            .map_err(|e| Error::Persistence(format!("encode failed: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }
        fs::write(&self.path, bytes).map_err(|e| self.io_error(e))?;

        debug!("Model saved to {}", self.path.display());
        Ok(())
    }

    /// Прочитать модель
    pub fn load(&self) -> Result<PersistedModel> {
        let bytes = fs::read(&self.path).map_err(|e| self.io_error(e))?;

        // Версия идёт первой, проверяем её до разбора модели
        let version: u32 = bincode::deserialize(&bytes).map_err(|e| self.corrupt(e))?;
        if version != FORMAT_VERSION {
            return Err(Error::Persistence(format!(
                "{}: unsupported model version {}",
                self.path.display(),
                version
            )));
        }

        let envelope: Envelope = bincode::deserialize(&bytes).map_err(|e| self.corrupt(e))?;
        Ok(envelope.model)
    }

    fn corrupt(&self, e: bincode::Error) -> Error {
        Error::Persistence(format!("{}: corrupt model: {}", self.path.display(), e))
    }

    fn io_error(&self, e: std::io::Error) -> Error {
        Error::Persistence(format!("{}: {}", self.path.display(), e))
    }
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Label;
    use crate::nlp::FeatureSet;
    use crate::sentiment::naive_bayes::LabeledExample;

    fn sample_model() -> PersistedModel {
        let examples = vec![
            LabeledExample::new(FeatureSet::from_tokens(["sunny"]), Label::Positive),
            LabeledExample::new(FeatureSet::from_tokens(["rain"]), Label::Negative),
        ];
        PersistedModel {
            classifier: NaiveBayesClassifier::train(&examples).unwrap(),
            accuracy: 0.75,
            train_len: 2,
            test_len: 1,
            pos_mapping: PosMapping::Extended,
            token_filter: TokenFilter::PunctuationAware,
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("models").join("bayes.bin"));
        let model = sample_model();

        store.save(&model).unwrap();
        assert!(store.exists());

        let loaded = store.load().unwrap();
        assert_eq!(loaded, model);
        assert_eq!(
            loaded.classifier.classify(&FeatureSet::from_tokens(["rain"])),
            Label::Negative
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path().join("absent.bin"));

        assert!(!store.exists());
        assert!(matches!(store.load(), Err(Error::Persistence(_))));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.bin");
        fs::write(&path, b"definitely not bincode").unwrap();

        let err = ModelStore::new(&path).load().unwrap_err();
        assert!(err.is_recoverable_by_training());
    }

    #[test]
    fn test_other_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("old.bin");
        fs::write(&path, bincode::serialize(&1u32).unwrap()).unwrap();

        let err = ModelStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("unsupported model version 1"));
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(ModelStore::default().path(), Path::new(DEFAULT_MODEL_FILE));
    }
}
