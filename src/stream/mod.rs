//! Поток твитов
//!
//! - Разбор входящих сообщений
//! - Слушатель с подсчётом настроений
//! - Асинхронная доставка событий через канал

mod feed;
mod message;
mod monitor;

pub use feed::{
    parse_line, read_json_lines, read_json_lines_blocking, run_feed, spawn_reader, FeedEvent,
    FeedSummary, DEFAULT_CHANNEL_CAPACITY,
};
pub use message::{IncomingMessage, Status};
pub use monitor::{
    Flow, MonitorReport, PopularTweet, SentimentMonitor, SentimentTally, StreamError,
    StreamListener, RATE_LIMITED,
};
