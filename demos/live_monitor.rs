//! Пример: Мониторинг настроений в потоке твитов
//!
//! Имитирует поток: отдельная задача отправляет твиты в канал,
//! монитор классифицирует их и печатает сводку.
//!
//! Запуск:
//! ```bash
//! cargo run --example live_monitor
//! ```

use anyhow::Result;
use rust_tweet_sentiment::config::TrainingConfig;
use rust_tweet_sentiment::sentiment::{SampleCorpus, SentimentAnalyzer};
use rust_tweet_sentiment::stream::{
    run_feed, FeedEvent, IncomingMessage, SentimentMonitor, StreamError,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

const TWEETS: &[(&str, u64)] = &[
    ("Loving my new phone, the camera is amazing", 12),
    ("Worst customer service ever, waited two hours", 48),
    ("Great concert tonight, thank you all!", 230),
    ("My flight got cancelled again :(", 5),
    ("Happy Friday everyone, have a lovely weekend", 71),
];

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut analyzer = SentimentAnalyzer::with_config(TrainingConfig::default().with_seed(7));
    analyzer.train_from_provider(&SampleCorpus::new())?;
    let analyzer = Arc::new(analyzer);

    let (tx, rx) = mpsc::channel(16);

    let producer = tokio::spawn(async move {
        for (text, retweets) in TWEETS {
            let json = serde_json::json!({
                "full_text": text,
                "retweet_count": retweets,
                "lang": "en",
            });
            let message = IncomingMessage::from_json(&json.to_string())?;
            if tx.send(FeedEvent::Item(message)).await.is_err() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        // Сервер просит притормозить: поток отключается
        let _ = tx
            .send(FeedEvent::Error(StreamError::new(420, "Enhance Your Calm")))
            .await;
        Ok::<_, rust_tweet_sentiment::Error>(())
    });

    let mut monitor = SentimentMonitor::new(analyzer).with_report_interval(Duration::from_millis(500));
    let summary = run_feed(rx, &mut monitor).await;
    producer.await??;

    println!("\n{}\n", monitor.report());
    println!(
        "Items: {}, errors: {}, disconnected: {}",
        summary.items, summary.errors, summary.stopped
    );

    Ok(())
}
