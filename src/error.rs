//! Типы ошибок библиотеки

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Основной тип ошибок
#[derive(Error, Debug)]
pub enum Error {
    /// classify/accuracy вызваны до обучения
    #[error("Classifier is not trained")]
    NotTrained,

    /// Не удалось загрузить размеченный корпус
    #[error("Corpus unavailable: {0}")]
    CorpusUnavailable(String),

    /// Сохранённая модель отсутствует или повреждена
    #[error("Model persistence error: {0}")]
    Persistence(String),

    /// Метка вне {positive, negative}
    #[error("Unsupported label: {0}")]
    UnsupportedLabel(String),

    /// Обучающая выборка пуста
    #[error("Training partition is empty")]
    EmptyCorpus,

    /// Ошибка конфигурации
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Ошибка, после которой можно переобучить модель с нуля
    pub fn is_recoverable_by_training(&self) -> bool {
        matches!(self, Error::Persistence(_) | Error::NotTrained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::NotTrained.to_string(), "Classifier is not trained");
        assert_eq!(
            Error::UnsupportedLabel("neutral".to_string()).to_string(),
            "Unsupported label: neutral"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::Persistence("missing".to_string()).is_recoverable_by_training());
        assert!(!Error::EmptyCorpus.is_recoverable_by_training());
    }
}
