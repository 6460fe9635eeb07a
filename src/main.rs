//! CLI для анализа настроений твитов
//!
//! Использование:
//! ```bash
//! cargo run -- --help
//! cargo run -- train
//! cargo run -- classify --text "What a lovely day"
//! cargo run -- monitor --input tweets.jsonl --keywords apple
//! ```

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_tweet_sentiment::{
    config::{load_config, AppConfig, SearchParameters},
    sentiment::{CorpusProvider, JsonCorpus, ModelStore, SampleCorpus, SentimentAnalyzer},
    stream::{run_feed, spawn_reader, SentimentMonitor, DEFAULT_CHANNEL_CAPACITY},
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Твиты для демонстрации без `--text`
const DEMO_TWEETS: &[&str] = &[
    "I do not think Apple is a good company. Even more I believe next quarter won't be their best",
    "Trust I seek and I am finding you",
    "This time it looks like very interesting",
    "The new gadget from Xtime is the shit",
    "I do not like company Apple, but I do love Iphone",
    "This accuracy is very bad",
    "This accuracy is decent",
    "This accurary is good",
];

#[derive(Parser)]
#[command(name = "tweet_sentiment")]
#[command(version = "0.1.0")]
#[command(about = "Tweet sentiment analysis with Naive Bayes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Файл конфигурации (.json или .toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Уровень логирования
    #[arg(short, long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Обучить модель и сохранить её
    Train {
        /// Каталог с positive_tweets.json / negative_tweets.json
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Зерно перемешивания
        #[arg(long)]
        seed: Option<u64>,

        /// Показать наиболее информативные признаки
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Определить настроение текста
    Classify {
        /// Текст (можно несколько раз); без него используется демо-набор
        #[arg(short, long)]
        text: Vec<String>,

        /// Показать вероятности меток
        #[arg(short, long)]
        probabilities: bool,
    },

    /// Точность модели на отложенной выборке
    Accuracy,

    /// Мониторинг настроений в потоке твитов (JSON Lines)
    Monitor {
        /// Файл с твитами или `-` для stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Ключевые слова
        #[arg(short, long)]
        keywords: Vec<String>,

        /// Начальная дата (YYYY-MM-DD)
        #[arg(long)]
        date_from: Option<NaiveDate>,

        /// Конечная дата (YYYY-MM-DD)
        #[arg(long)]
        date_till: Option<NaiveDate>,

        /// Регион
        #[arg(short, long)]
        region: Option<String>,

        /// Язык твитов
        #[arg(long)]
        language: Option<String>,

        /// JSON с параметрами поиска (перекрывает аргументы)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Интервал между сводками, секунды
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };

    // Настройка логирования
    let level_name = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    let log_level = match level_name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train { corpus, seed, top } => {
            let mut config = config;
            if corpus.is_some() {
                config.corpus.dir = corpus;
            }
            if seed.is_some() {
                config.training.seed = seed;
            }
            run_train(&config, top)?;
        }
        Commands::Classify { text, probabilities } => {
            run_classify(&config, text, probabilities)?;
        }
        Commands::Accuracy => {
            run_accuracy(&config)?;
        }
        Commands::Monitor {
            input,
            keywords,
            date_from,
            date_till,
            region,
            language,
            params,
            interval,
        } => {
            let mut search = SearchParameters {
                keywords,
                date_from,
                date_till,
                region,
                language,
            };
            if let Some(path) = params {
                search = search.merge(SearchParameters::from_file(&path)?);
            }
            search.fill_in_missing_dates(Local::now().date_naive());

            let mut config = config;
            if let Some(secs) = interval {
                config.monitor.report_interval_secs = secs;
            }
            run_monitor(&config, input, search).await?;
        }
    }

    Ok(())
}

fn corpus_provider(config: &AppConfig) -> Box<dyn CorpusProvider> {
    match &config.corpus.dir {
        Some(dir) => Box::new(JsonCorpus::new(dir)),
        None => Box::new(SampleCorpus::new()),
    }
}

/// Загрузить сохранённую модель или обучить новую
fn prepare_analyzer(config: &AppConfig) -> Result<SentimentAnalyzer> {
    let mut analyzer = SentimentAnalyzer::with_config(config.training.clone());
    let provider = corpus_provider(config);

    if config.model.persist {
        let store = ModelStore::new(&config.model.path);
        analyzer.load_or_train(&store, provider.as_ref())?;
    } else {
        analyzer.train_from_provider(provider.as_ref())?;
    }

    Ok(analyzer)
}

fn run_train(config: &AppConfig, top: usize) -> Result<()> {
    println!("\n📚 Training Naive Bayes classifier...\n");

    let mut analyzer = SentimentAnalyzer::with_config(config.training.clone());
    let provider = corpus_provider(config);
    analyzer
        .train_from_provider(provider.as_ref())
        .context("Training failed")?;

    if let Some((train, test)) = analyzer.partition_sizes() {
        println!("Training examples: {}", train);
        println!("Held-out examples: {}", test);
    }
    println!("Accuracy: {:.3}", analyzer.accuracy()?);

    println!("\nMost informative features:");
    for feature in analyzer.most_informative_features(top)? {
        println!("  {}", feature);
    }

    if config.model.persist {
        let store = ModelStore::new(&config.model.path);
        store.save(&analyzer.to_persisted()?)?;
        println!("\n💾 Model saved to {}", store.path().display());
    }

    Ok(())
}

fn run_classify(config: &AppConfig, texts: Vec<String>, probabilities: bool) -> Result<()> {
    let analyzer = prepare_analyzer(config)?;

    let texts = if texts.is_empty() {
        DEMO_TWEETS.iter().map(|s| s.to_string()).collect()
    } else {
        texts
    };

    println!("\nAccuracy is: {:.3}", analyzer.accuracy()?);

    for text in &texts {
        println!();
        println!("{}", text);
        if probabilities {
            let probs = analyzer.classify_with_probabilities(text)?;
            println!(
                "{} (positive {:.3}, negative {:.3})",
                analyzer.classify(text)?,
                probs.positive,
                probs.negative
            );
        } else {
            println!("{}", analyzer.classify(text)?);
        }
    }

    Ok(())
}

fn run_accuracy(config: &AppConfig) -> Result<()> {
    let analyzer = prepare_analyzer(config)?;
    println!("Accuracy is: {:.3}", analyzer.accuracy()?);
    Ok(())
}

async fn run_monitor(config: &AppConfig, input: PathBuf, search: SearchParameters) -> Result<()> {
    let analyzer = Arc::new(prepare_analyzer(config)?);

    let mut search = search;
    if search.keywords.is_empty() {
        search.keywords = config.monitor.keywords.clone();
    }
    info!("Search parameters: {:?}", search);

    let (tx, rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
    let reader = spawn_reader(&input, tx)
        .await
        .with_context(|| format!("Cannot open {}", input.display()))?;

    let mut monitor = SentimentMonitor::new(analyzer)
        .with_config(&config.monitor)
        .with_filter(search);
    let summary = run_feed(rx, &mut monitor).await;

    if summary.stopped {
        // Читатель stdin может остаться заблокированным до закрытия ввода
        info!("Stream stopped, leaving the input reader behind");
        drop(reader);
    } else {
        reader.await??;
    }

    println!("\n{}\n", monitor.report());
    println!(
        "📊 Processed {} tweets, skipped {}, stream errors {}",
        monitor.tally().total(),
        monitor.skipped(),
        summary.errors
    );

    Ok(())
}
