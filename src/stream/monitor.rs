//! Мониторинг настроений в потоке твитов
//!
//! Слушатель классифицирует каждый твит, ведёт счёт меток, запоминает
//! самый популярный твит и периодически выводит сводку.

use crate::config::{MonitorConfig, SearchParameters};
use crate::models::Label;
use crate::sentiment::SentimentAnalyzer;
use crate::stream::message::IncomingMessage;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Код ответа при превышении лимита запросов
pub const RATE_LIMITED: u16 = 420;

/// Продолжать ли чтение потока
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Ошибка, пришедшая из потока
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamError {
    pub status_code: u16,
    pub message: String,
}

impl StreamError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code == RATE_LIMITED
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream error {}: {}", self.status_code, self.message)
    }
}

/// Обработчик событий потока
pub trait StreamListener: Send {
    fn on_item(&mut self, message: IncomingMessage) -> Flow;

    /// По умолчанию отключаемся только при превышении лимита
    fn on_error(&mut self, error: &StreamError) -> Flow {
        if error.is_rate_limited() {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }
}

/// Счётчик меток
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentTally {
    pub positive: usize,
    pub negative: usize,
}

impl SentimentTally {
    pub fn record(&mut self, label: Label) {
        match label {
            Label::Positive => self.positive += 1,
            Label::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative
    }

    /// Полоса из `+` и `-` пропорционально доле положительных
    pub fn bar(&self, width: usize) -> String {
        let pluses = if self.total() == 0 {
            width / 2
        } else {
            (width as f64 * self.positive as f64 / self.total() as f64).round() as usize
        };
        let minuses = width - pluses.min(width);

        format!(
            "P {} {} {} {} N",
            self.positive,
            "+".repeat(pluses.min(width)),
            "-".repeat(minuses),
            self.negative
        )
    }
}

/// Самый ретвитнутый твит
#[derive(Debug, Clone, PartialEq)]
pub struct PopularTweet {
    pub text: String,
    pub label: Label,
    pub retweets: u64,
}

/// Периодическая сводка
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReport {
    pub tally: SentimentTally,
    pub most_popular: Option<PopularTweet>,
    pub bar_width: usize,
}

impl fmt::Display for MonitorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tweet) = &self.most_popular {
            writeln!(f, "{}", tweet.text)?;
            writeln!(f)?;
            writeln!(f, "Retweets: {}", tweet.retweets)?;
            writeln!(f, "Sentiment: {}", tweet.label)?;
            writeln!(f)?;
        }
        write!(f, "{}", self.tally.bar(self.bar_width))
    }
}

type Reporter = Box<dyn FnMut(&MonitorReport) + Send>;

/// Слушатель, классифицирующий твиты
pub struct SentimentMonitor {
    analyzer: Arc<SentimentAnalyzer>,
    filter: SearchParameters,
    tally: SentimentTally,
    most_popular: Option<PopularTweet>,
    skipped: usize,
    report_interval: Duration,
    bar_width: usize,
    last_report: Instant,
    reporter: Reporter,
}

impl SentimentMonitor {
    /// Создать монитор для обученного анализатора
    pub fn new(analyzer: Arc<SentimentAnalyzer>) -> Self {
        let defaults = MonitorConfig::default();
        Self {
            analyzer,
            filter: SearchParameters::default(),
            tally: SentimentTally::default(),
            most_popular: None,
            skipped: 0,
            report_interval: Duration::from_secs(defaults.report_interval_secs),
            bar_width: defaults.bar_width,
            last_report: Instant::now(),
            reporter: Box::new(|report| println!("\n{}\n", report)),
        }
    }

    /// Применить секцию `monitor` конфигурации
    pub fn with_config(mut self, config: &MonitorConfig) -> Self {
        self.report_interval = Duration::from_secs(config.report_interval_secs);
        self.bar_width = config.bar_width;
        if !config.keywords.is_empty() {
            self.filter.keywords = config.keywords.clone();
        }
        self
    }

    /// Пропускать твиты, не подходящие под параметры поиска
    pub fn with_filter(mut self, filter: SearchParameters) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Куда отправлять сводки (по умолчанию stdout)
    pub fn with_reporter(mut self, reporter: impl FnMut(&MonitorReport) + Send + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn tally(&self) -> SentimentTally {
        self.tally
    }

    pub fn most_popular(&self) -> Option<&PopularTweet> {
        self.most_popular.as_ref()
    }

    /// Сколько твитов отброшено фильтром
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Текущая сводка
    pub fn report(&self) -> MonitorReport {
        MonitorReport {
            tally: self.tally,
            most_popular: self.most_popular.clone(),
            bar_width: self.bar_width,
        }
    }

    fn accepts(&self, message: &IncomingMessage) -> bool {
        self.filter.matches_text(message.display_text())
            && self.filter.matches_language(message.lang())
            && self.filter.matches_date(message.date())
    }
}

impl fmt::Debug for SentimentMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SentimentMonitor")
            .field("filter", &self.filter)
            .field("tally", &self.tally)
            .field("most_popular", &self.most_popular)
            .field("skipped", &self.skipped)
            .field("report_interval", &self.report_interval)
            .finish()
    }
}

impl StreamListener for SentimentMonitor {
    fn on_item(&mut self, message: IncomingMessage) -> Flow {
        if !self.accepts(&message) {
            self.skipped += 1;
            return Flow::Continue;
        }

        let text = message.display_text();
        let label = match self.analyzer.classify(text) {
            Ok(label) => label,
            Err(e) => {
                warn!("Cannot classify tweet: {}", e);
                return Flow::Stop;
            }
        };
        debug!("{} <- {:?}", label, text);
        self.tally.record(label);

        let retweets = message.retweet_count();
        let replace = self
            .most_popular
            .as_ref()
            .map_or(true, |current| retweets > current.retweets);
        if replace {
            self.most_popular = Some(PopularTweet {
                text: text.to_string(),
                label,
                retweets,
            });
        }

        if self.last_report.elapsed() >= self.report_interval {
            self.last_report = Instant::now();
            let report = self.report();
            (self.reporter)(&report);
        }

        Flow::Continue
    }

    fn on_error(&mut self, error: &StreamError) -> Flow {
        if error.is_rate_limited() {
            warn!("{}, disconnecting", error);
            Flow::Stop
        } else {
            info!("{}, continuing", error);
            Flow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrainingConfig;
    use std::sync::Mutex;

    fn analyzer() -> Arc<SentimentAnalyzer> {
        let mut analyzer = SentimentAnalyzer::with_config(TrainingConfig::default().with_seed(9));
        let mut corpus = Vec::new();
        for extra in ["one", "two", "three", "four", "five"] {
            corpus.push((format!("I love this great product {}", extra), "positive"));
            corpus.push((format!("this is terrible and awful {}", extra), "negative"));
        }
        analyzer.train(corpus).unwrap();
        Arc::new(analyzer)
    }

    fn tweet(text: &str, retweets: u64) -> IncomingMessage {
        IncomingMessage::from_json(
            &serde_json::json!({"text": text, "retweet_count": retweets, "lang": "en"}).to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_bar() {
        let tally = SentimentTally {
            positive: 3,
            negative: 1,
        };
        assert_eq!(tally.bar(20), "P 3 +++++++++++++++ ----- 1 N");
        assert_eq!(SentimentTally::default().bar(4), "P 0 ++ -- 0 N");

        let all_positive = SentimentTally {
            positive: 2,
            negative: 0,
        };
        assert_eq!(all_positive.bar(5), "P 2 +++++  0 N");
    }

    #[test]
    fn test_tally_and_most_popular() {
        let mut monitor = SentimentMonitor::new(analyzer()).with_report_interval(Duration::from_secs(3600));

        assert_eq!(monitor.on_item(tweet("I love this great product", 5)), Flow::Continue);
        monitor.on_item(tweet("this is terrible and awful", 40));
        monitor.on_item(tweet("great product, love it", 40));

        let tally = monitor.tally();
        assert_eq!(tally.positive, 2);
        assert_eq!(tally.negative, 1);
        assert_eq!(tally.total(), 3);

        let popular = monitor.most_popular().unwrap();
        assert_eq!(popular.retweets, 40);
        assert_eq!(popular.label, Label::Negative);
    }

    #[test]
    fn test_keyword_filter() {
        let filter = SearchParameters {
            keywords: vec!["product".to_string()],
            ..Default::default()
        };
        let mut monitor = SentimentMonitor::new(analyzer()).with_filter(filter);

        monitor.on_item(tweet("I love this great product", 0));
        monitor.on_item(tweet("this is terrible and awful", 0));

        assert_eq!(monitor.tally().total(), 1);
        assert_eq!(monitor.skipped(), 1);
    }

    #[test]
    fn test_reports_are_throttled() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let mut monitor = SentimentMonitor::new(analyzer())
            .with_report_interval(Duration::ZERO)
            .with_reporter(move |report| sink.lock().unwrap().push(report.clone()));

        monitor.on_item(tweet("I love this great product", 1));
        monitor.on_item(tweet("this is terrible and awful", 2));
        assert_eq!(reports.lock().unwrap().len(), 2);

        let mut quiet = SentimentMonitor::new(analyzer())
            .with_report_interval(Duration::from_secs(3600))
            .with_reporter(|_| panic!("report before interval"));
        quiet.on_item(tweet("I love this great product", 1));
    }

    #[test]
    fn test_report_display() {
        let mut monitor = SentimentMonitor::new(analyzer()).with_report_interval(Duration::from_secs(3600));
        monitor.on_item(tweet("I love this great product", 12));

        let rendered = monitor.report().to_string();
        assert!(rendered.starts_with("I love this great product\n"));
        assert!(rendered.contains("Retweets: 12"));
        assert!(rendered.contains("Sentiment: positive"));
        assert!(rendered.ends_with("P 1 ++++++++++++++++++++  0 N"));
    }

    #[test]
    fn test_rate_limit_stops() {
        let mut monitor = SentimentMonitor::new(analyzer());

        assert_eq!(monitor.on_error(&StreamError::new(420, "Enhance Your Calm")), Flow::Stop);
        assert_eq!(monitor.on_error(&StreamError::new(503, "unavailable")), Flow::Continue);
    }

    #[test]
    fn test_untrained_analyzer_stops() {
        let mut monitor = SentimentMonitor::new(Arc::new(SentimentAnalyzer::new()));
        assert_eq!(monitor.on_item(tweet("hello", 0)), Flow::Stop);
    }
}
