//! Конфигурация приложения
//!
//! Файл `.json` или `.toml` (формат определяется по расширению).
//! Все секции необязательны, отсутствующие поля берутся по умолчанию.

use crate::error::{Error, Result};
use crate::nlp::{PosMapping, TokenFilter};
use crate::sentiment::{Smoothing, DEFAULT_MODEL_FILE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Параметры обучения классификатора
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Доля примеров в обучающей выборке
    pub split_ratio: f64,
    /// Параметр аддитивного сглаживания
    pub alpha: f64,
    /// Не сглаживать, пропуская невиданные пары (признак, метка)
    pub ignore_unseen: bool,
    /// Зерно перемешивания; без него порядок случайный
    pub seed: Option<u64>,
    pub pos_mapping: PosMapping,
    pub token_filter: TokenFilter,
}

impl TrainingConfig {
    pub fn smoothing(&self) -> Smoothing {
        if self.ignore_unseen {
            Smoothing::IgnoreUnseen
        } else {
            Smoothing::Additive(self.alpha)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_split_ratio(mut self, ratio: f64) -> Self {
        self.split_ratio = ratio;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.split_ratio > 0.0 && self.split_ratio <= 1.0) {
            return Err(Error::Config(format!(
                "split_ratio must be in (0, 1], got {}",
                self.split_ratio
            )));
        }
        // Нулевое сглаживание обнуляет метку по одному невиданному слову
        if !self.ignore_unseen && !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return Err(Error::Config(format!("alpha must be positive, got {}", self.alpha)));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            split_ratio: 0.8,
            alpha: 0.5,
            ignore_unseen: false,
            seed: None,
            pos_mapping: PosMapping::Basic,
            token_filter: TokenFilter::MinLength,
        }
    }
}

/// Где хранится модель
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Сохранять модель после обучения
    pub persist: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_FILE),
            persist: true,
        }
    }
}

/// Источник обучающего корпуса
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Каталог с `positive_tweets.json` / `negative_tweets.json`;
    /// без него используется встроенный набор
    pub dir: Option<PathBuf>,
}

/// Параметры мониторинга потока
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub report_interval_secs: u64,
    pub bar_width: usize,
    pub keywords: Vec<String>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            report_interval_secs: 10,
            bar_width: 20,
            keywords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Полная конфигурация
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub training: TrainingConfig,
    pub model: ModelConfig,
    pub corpus: CorpusConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Format::Json),
        Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
        _ => Err(Error::Config(format!(
            "unsupported config format: {}",
            path.display()
        ))),
    }
}

/// Загрузить конфигурацию из файла
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let format = format_of(path)?;
    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

    let config: AppConfig = match format {
        Format::Json => serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
        Format::Toml => toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
    };

    config.training.validate()?;
    Ok(config)
}

/// Сохранить конфигурацию в файл
pub fn save_config(config: &AppConfig, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let content = match format_of(path)? {
        Format::Json => serde_json::to_string_pretty(config)?,
        Format::Toml => toml::to_string_pretty(config)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?,
    };
    fs::write(path, content)?;
    Ok(())
}

/// Дата основания Twitter: нижняя граница поиска по умолчанию
pub fn earliest_search_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2006, 3, 1).unwrap_or(NaiveDate::MIN)
}

/// Параметры поиска твитов
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParameters {
    /// Ключевые слова (совпадение без учёта регистра, любое из)
    pub keywords: Vec<String>,
    pub date_from: Option<NaiveDate>,
    pub date_till: Option<NaiveDate>,
    pub region: Option<String>,
    pub language: Option<String>,
}

impl SearchParameters {
    /// Прочитать параметры из JSON-файла
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Наложить параметры из файла поверх параметров командной строки:
    /// заданные в `other` поля побеждают
    pub fn merge(mut self, other: SearchParameters) -> Self {
        if !other.keywords.is_empty() {
            self.keywords = other.keywords;
        }
        self.date_from = other.date_from.or(self.date_from);
        self.date_till = other.date_till.or(self.date_till);
        self.region = other.region.or(self.region);
        self.language = other.language.or(self.language);
        self
    }

    /// Заполнить отсутствующие даты
    pub fn fill_in_missing_dates(&mut self, today: NaiveDate) {
        match (self.date_from, self.date_till) {
            (Some(_), None) => self.date_till = Some(today),
            (None, None) => self.date_from = Some(earliest_search_date()),
            _ => {}
        }
    }

    /// Подходит ли текст под ключевые слова
    pub fn matches_text(&self, text: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| lower.contains(&keyword.to_lowercase()))
    }

    /// Подходит ли язык сообщения
    pub fn matches_language(&self, language: Option<&str>) -> bool {
        match (&self.language, language) {
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            _ => true,
        }
    }

    /// Попадает ли дата в диапазон
    pub fn matches_date(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return true;
        };
        self.date_from.map_or(true, |from| date >= from)
            && self.date_till.map_or(true, |till| date <= till)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.training.split_ratio, 0.8);
        assert_eq!(config.training.smoothing(), Smoothing::Additive(0.5));
        assert_eq!(config.model.path, PathBuf::from("tweet_bayes.bin"));
        assert_eq!(config.monitor.bar_width, 20);
        assert_eq!(config.monitor.report_interval_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_toml_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[training]
split_ratio = 0.75
seed = 42
ignore_unseen = true
pos_mapping = "extended"

[monitor]
keywords = ["apple"]
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.training.split_ratio, 0.75);
        assert_eq!(config.training.seed, Some(42));
        assert_eq!(config.training.smoothing(), Smoothing::IgnoreUnseen);
        assert_eq!(config.training.pos_mapping, PosMapping::Extended);
        assert_eq!(config.monitor.keywords, vec!["apple"]);
        assert_eq!(config.monitor.bar_width, 20);
        assert!(config.model.persist);
    }

    #[test]
    fn test_save_and_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.training.seed = Some(7);
        config.corpus.dir = Some(PathBuf::from("data"));

        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_unsupported_format() {
        let result = load_config("config.yaml");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_split_ratio() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"training": {"split_ratio": 1.5}}"#).unwrap();

        assert!(matches!(load_config(&path), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_alpha_rejected() {
        let mut training = TrainingConfig::default();
        training.alpha = 0.0;
        assert!(matches!(training.validate(), Err(Error::Config(_))));

        training.ignore_unseen = true;
        assert!(training.validate().is_ok());
    }

    #[test]
    fn test_fill_in_missing_dates() {
        let today = date(2024, 5, 17);

        let mut params = SearchParameters {
            date_from: Some(date(2024, 1, 1)),
            ..Default::default()
        };
        params.fill_in_missing_dates(today);
        assert_eq!(params.date_till, Some(today));

        let mut params = SearchParameters::default();
        params.fill_in_missing_dates(today);
        assert_eq!(params.date_from, Some(date(2006, 3, 1)));
        assert_eq!(params.date_till, None);

        let mut params = SearchParameters {
            date_till: Some(date(2020, 2, 2)),
            ..Default::default()
        };
        params.fill_in_missing_dates(today);
        assert_eq!(params.date_from, None);
        assert_eq!(params.date_till, Some(date(2020, 2, 2)));
    }

    #[test]
    fn test_merge_prefers_file_values() {
        let cli = SearchParameters {
            keywords: vec!["apple".to_string()],
            language: Some("en".to_string()),
            ..Default::default()
        };
        let file = SearchParameters {
            keywords: vec!["iphone".to_string()],
            region: Some("US".to_string()),
            ..Default::default()
        };

        let merged = cli.merge(file);

        assert_eq!(merged.keywords, vec!["iphone"]);
        assert_eq!(merged.language.as_deref(), Some("en"));
        assert_eq!(merged.region.as_deref(), Some("US"));
    }

    #[test]
    fn test_matching() {
        let params = SearchParameters {
            keywords: vec!["Apple".to_string()],
            language: Some("en".to_string()),
            date_from: Some(date(2024, 1, 1)),
            date_till: Some(date(2024, 12, 31)),
            ..Default::default()
        };

        assert!(params.matches_text("I bought an APPLE watch"));
        assert!(!params.matches_text("Samsung rocks"));
        assert!(params.matches_language(Some("EN")));
        assert!(!params.matches_language(Some("de")));
        assert!(params.matches_language(None));
        assert!(params.matches_date(Some(date(2024, 6, 1))));
        assert!(!params.matches_date(Some(date(2023, 6, 1))));
        assert!(params.matches_date(None));
    }

    #[test]
    fn test_search_parameters_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        fs::write(&path, r#"{"keywords": ["rust"], "date_from": "2023-04-01"}"#).unwrap();

        let params = SearchParameters::from_file(&path).unwrap();
        assert_eq!(params.keywords, vec!["rust"]);
        assert_eq!(params.date_from, Some(date(2023, 4, 1)));
    }
}
