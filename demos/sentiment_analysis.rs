//! Пример: Анализ настроений твитов
//!
//! Демонстрирует полный pipeline:
//! 1. Токенизация
//! 2. Разметка частей речи и лемматизация
//! 3. Признаки
//! 4. Обучение наивного Байеса и классификация
//!
//! Запуск:
//! ```bash
//! cargo run --example sentiment_analysis
//! ```

use anyhow::Result;
use rust_tweet_sentiment::config::TrainingConfig;
use rust_tweet_sentiment::nlp::{PosTagger, Preprocessor, RuleTagger, Tokenizer};
use rust_tweet_sentiment::sentiment::{SampleCorpus, SentimentAnalyzer};
use rust_tweet_sentiment::{FeatureSet, Label};

fn main() -> Result<()> {
    println!("═══════════════════════════════════════════════════════════");
    println!("   Tweet Sentiment Analysis Demo");
    println!("═══════════════════════════════════════════════════════════\n");

    let sample = "@jane Loving the new phones!!! Check https://t.co/xyz, they don't disappoint :)";

    // ═══════════════════════════════════════════════════════════
    // 1. Токенизация
    // ═══════════════════════════════════════════════════════════
    println!("1️⃣  TOKENIZATION");
    println!("──────────────────────────────────────────────\n");

    let tokenizer = Tokenizer::new();
    println!("Input: \"{}\"\n", sample);
    println!("Tokens:");
    for token in tokenizer.tokenize(sample) {
        println!("  {:25} [{:?}]", token.original, token.token_type);
    }

    // ═══════════════════════════════════════════════════════════
    // 2. Разметка и очистка
    // ═══════════════════════════════════════════════════════════
    println!("\n2️⃣  TAGGING & LEMMATIZATION");
    println!("──────────────────────────────────────────────\n");

    let tokens = tokenizer.tokenize_to_strings(sample);
    let tagged = RuleTagger::new().tag(&tokens);
    for token in &tagged {
        println!("  {:25} {}", token.text, token.tag);
    }

    let preprocessor = Preprocessor::new();
    let cleaned = preprocessor.clean_and_lemmatize(&tagged);
    println!("\nCleaned: {:?}", cleaned);

    // ═══════════════════════════════════════════════════════════
    // 3. Признаки
    // ═══════════════════════════════════════════════════════════
    println!("\n3️⃣  FEATURES");
    println!("──────────────────────────────────────────────\n");

    let features = FeatureSet::from_tokens(cleaned);
    for (name, value) in features.iter() {
        println!("  {:15} {}", name, value);
    }

    // ═══════════════════════════════════════════════════════════
    // 4. Наивный Байес
    // ═══════════════════════════════════════════════════════════
    println!("\n4️⃣  NAIVE BAYES CLASSIFIER");
    println!("──────────────────────────────────────────────\n");

    let mut analyzer = SentimentAnalyzer::with_config(TrainingConfig::default().with_seed(2024));
    analyzer.train_from_provider(&SampleCorpus::new())?;

    if let Some((train, test)) = analyzer.partition_sizes() {
        println!("Trained on {} tweets, held out {}", train, test);
    }
    println!("Accuracy: {:.1}%", analyzer.accuracy()? * 100.0);

    println!("\nMost informative features:");
    for feature in analyzer.most_informative_features(8)? {
        println!("  {}", feature);
    }

    let texts = [
        "What a lovely sunny day with friends",
        "My flight got delayed again, terrible service",
        "Thanks for the great support!",
        "The app keeps crashing, so annoying",
    ];

    println!("\nClassifying new tweets:");
    for text in texts {
        let label = analyzer.classify(text)?;
        let probs = analyzer.classify_with_probabilities(text)?;
        let emoji = match label {
            Label::Positive => "😊",
            Label::Negative => "😟",
        };

        println!("\n  {} \"{}\"", emoji, text);
        for label in Label::ALL {
            let prob = probs.get(label);
            let bar = "█".repeat((prob * 20.0) as usize);
            println!("    {:10} {:5.1}% {}", label, prob * 100.0, bar);
        }
    }

    println!("\n═══════════════════════════════════════════════════════════");
    println!("   Demo Complete! 🎉");
    println!("═══════════════════════════════════════════════════════════\n");

    Ok(())
}
