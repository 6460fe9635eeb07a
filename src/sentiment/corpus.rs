//! Размеченные корпуса твитов
//!
//! Провайдер отдаёт уже токенизированные твиты двух классов.

use crate::error::{Error, Result};
use crate::nlp::Tokenizer;
use serde::Deserialize;
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Имя файла с положительными твитами
pub const POSITIVE_FILE: &str = "positive_tweets.json";
/// Имя файла с отрицательными твитами
pub const NEGATIVE_FILE: &str = "negative_tweets.json";

/// Источник размеченных твитов
pub trait CorpusProvider: Debug + Send + Sync {
    /// Токенизированные положительные твиты
    fn positive(&self) -> Result<Vec<Vec<String>>>;

    /// Токенизированные отрицательные твиты
    fn negative(&self) -> Result<Vec<Vec<String>>>;
}

const POSITIVE_SAMPLES: &[&str] = &[
    "Thanks for the follow, have a lovely weekend :)",
    "I love this new phone, the camera is amazing!",
    "Great game tonight, what a win for the team",
    "Happy birthday @mike_88 hope you have a fantastic day :D",
    "Such a beautiful sunny morning, feeling blessed",
    "Just finished my first marathon, so proud and happy!",
    "This coffee shop is the best, friendly staff and great music",
    "Thank you all for the kind messages, you made my day",
    "Loving the new album, every song is brilliant",
    "Finally home with family, best feeling ever :)",
    "Congrats on the new job, well deserved!",
    "What a wonderful concert, the band was incredible",
    "Excited to start the holidays with good friends",
    "The support team solved my problem in minutes, excellent service",
    "Had a lovely dinner with my sister, great food and laughs",
    "New blog post is up, thanks for reading! https://t.co/abc123",
    "My garden is blooming, so many beautiful flowers",
    "Cannot wait to see you all at the party tomorrow, fun times",
    "This book is awesome, highly recommend it",
    "Good morning everyone, have a nice day :)",
    "We won the award! Thank you to the amazing team",
    "Enjoying a perfect day at the beach with the kids",
    "Your kindness means a lot, thank you so much",
    "The update works great, smooth and fast",
    "Happy Friday! Weekend plans with awesome people",
];

const NEGATIVE_SAMPLES: &[&str] = &[
    "My flight got cancelled again, worst airline ever :(",
    "I hate waking up this early, so tired",
    "The service was terrible and the food was cold",
    "Feeling sick and miserable today :(",
    "Lost my wallet on the train, awful day",
    "This update broke everything, really annoying",
    "Why is my internet so slow, so frustrating",
    "Missed the bus and got soaked in the rain",
    "I am so sad that the show got cancelled",
    "Waited two hours for a refund, horrible support @helpdesk",
    "The movie was boring and way too long",
    "Broke my phone screen again, ugh",
    "Nobody came to my party, feeling lonely :(",
    "Traffic is horrible this morning, going to be late",
    "The battery dies after an hour, such a disappointment",
    "Cannot sleep, headache and stress all night",
    "Worst customer service I have ever had",
    "My team lost again, so upset",
    "The package arrived damaged and nobody replies",
    "I miss summer, this cold weather is depressing",
    "Exams tomorrow and I feel completely unprepared :(",
    "The app keeps crashing, useless",
    "Sorry for the late reply, awful week with bad news",
    "Burnt my dinner and the kitchen smells terrible",
    "So disappointed with the ending, what a waste of time",
];

/// Встроенный набор примеров (по умолчанию)
#[derive(Debug, Clone, Default)]
pub struct SampleCorpus {
    tokenizer: Tokenizer,
}

impl SampleCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    fn tokenize_all(&self, texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|text| self.tokenizer.tokenize_to_strings(text))
            .collect()
    }
}

impl CorpusProvider for SampleCorpus {
    fn positive(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.tokenize_all(POSITIVE_SAMPLES))
    }

    fn negative(&self) -> Result<Vec<Vec<String>>> {
        Ok(self.tokenize_all(NEGATIVE_SAMPLES))
    }
}

#[derive(Debug, Deserialize)]
struct TweetRecord {
    text: String,
}

/// Корпус из каталога с `positive_tweets.json` и `negative_tweets.json`
///
/// Формат файлов: JSON Lines, по одному объекту твита на строку с полем `text`.
#[derive(Debug, Clone)]
pub struct JsonCorpus {
    dir: PathBuf,
    tokenizer: Tokenizer,
}

impl JsonCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            tokenizer: Tokenizer::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load(&self, file_name: &str) -> Result<Vec<Vec<String>>> {
        let path = self.dir.join(file_name);
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::CorpusUnavailable(format!("{}: {}", path.display(), e)))?;

        let mut tweets = Vec::new();
        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: TweetRecord = serde_json::from_str(line).map_err(|e| {
                Error::CorpusUnavailable(format!("{}:{}: {}", path.display(), line_no + 1, e))
            })?;
            tweets.push(self.tokenizer.tokenize_to_strings(&record.text));
        }

        debug!("Loaded {} tweets from {}", tweets.len(), path.display());
        Ok(tweets)
    }
}

impl CorpusProvider for JsonCorpus {
    fn positive(&self) -> Result<Vec<Vec<String>>> {
        self.load(POSITIVE_FILE)
    }

    fn negative(&self) -> Result<Vec<Vec<String>>> {
        self.load(NEGATIVE_FILE)
    }
}
