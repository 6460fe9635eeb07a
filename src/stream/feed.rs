//! Доставка событий потока слушателю
//!
//! Транспорт отправляет [`FeedEvent`] в канал `mpsc`, единственный
//! потребитель вызывает слушателя для каждого события.

use crate::error::{Error, Result};
use crate::stream::message::IncomingMessage;
use crate::stream::monitor::{Flow, StreamError, StreamListener};
use serde::Deserialize;
use std::io::{self, BufRead};
use std::path::Path;
use std::thread;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Размер буфера канала по умолчанию
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Событие потока
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Item(IncomingMessage),
    Error(StreamError),
}

/// Итог работы потока
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedSummary {
    pub items: usize,
    pub errors: usize,
    /// Слушатель запросил отключение
    pub stopped: bool,
}

/// Передавать события слушателю, пока канал открыт или слушатель не остановит поток
pub async fn run_feed<L>(mut events: mpsc::Receiver<FeedEvent>, listener: &mut L) -> FeedSummary
where
    L: StreamListener + ?Sized,
{
    let mut summary = FeedSummary::default();
    info!("Starting the stream");

    while let Some(event) = events.recv().await {
        let flow = match event {
            FeedEvent::Item(message) => {
                summary.items += 1;
                listener.on_item(message)
            }
            FeedEvent::Error(error) => {
                summary.errors += 1;
                listener.on_error(&error)
            }
        };

        if flow == Flow::Stop {
            summary.stopped = true;
            // Отправитель увидит закрытый канал и завершится
            events.close();
            break;
        }
    }

    info!(
        "Stream finished: {} items, {} errors",
        summary.items, summary.errors
    );
    summary
}

#[derive(Debug, Deserialize)]
struct ErrorLine {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status_code: u16,
    #[serde(default)]
    message: String,
}

/// Разобрать строку JSON Lines: твит или `{"error": {"status_code": ..}}`
pub fn parse_line(line: &str) -> Result<FeedEvent> {
    if let Ok(ErrorLine { error }) = serde_json::from_str::<ErrorLine>(line) {
        return Ok(FeedEvent::Error(StreamError::new(error.status_code, error.message)));
    }
    Ok(FeedEvent::Item(IncomingMessage::from_json(line)?))
}

fn line_event(line: &str) -> Option<FeedEvent> {
    if line.trim().is_empty() {
        return None;
    }
    match parse_line(line) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Skipping malformed line: {}", e);
            None
        }
    }
}

/// Читать JSON Lines и отправлять события в канал
///
/// Возвращает число отправленных событий. Некорректные строки пропускаются.
pub async fn read_json_lines<R>(reader: R, sender: mpsc::Sender<FeedEvent>) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut sent = 0;

    while let Some(line) = lines.next_line().await? {
        let Some(event) = line_event(&line) else {
            continue;
        };

        if sender.send(event).await.is_err() {
            debug!("Feed consumer is gone, stop reading");
            break;
        }
        sent += 1;
    }

    Ok(sent)
}

/// Блокирующий вариант [`read_json_lines`] для чтения вне рантайма
pub fn read_json_lines_blocking<R>(reader: R, sender: mpsc::Sender<FeedEvent>) -> Result<usize>
where
    R: BufRead,
{
    let mut sent = 0;

    for line in reader.lines() {
        let Some(event) = line_event(&line?) else {
            continue;
        };

        if sender.blocking_send(event).is_err() {
            debug!("Feed consumer is gone, stop reading");
            break;
        }
        sent += 1;
    }

    Ok(sent)
}

/// Запустить чтение файла (или stdin для `-`) в отдельной задаче
///
/// stdin читается в обычном потоке ОС: рантайм не ждёт его при завершении,
/// поэтому остановка потока по 420 не зависает на незакрытом stdin.
pub async fn spawn_reader(
    input: &Path,
    sender: mpsc::Sender<FeedEvent>,
) -> Result<JoinHandle<Result<usize>>> {
    if input == Path::new("-") {
        let (done_tx, done_rx) = oneshot::channel();
        thread::Builder::new()
            .name("stdin-feed".to_string())
            .spawn(move || {
                let result = read_json_lines_blocking(io::stdin().lock(), sender);
                let _ = done_tx.send(result);
            })?;

        return Ok(tokio::spawn(async move {
            done_rx.await.map_err(|_| {
                Error::Io(io::Error::new(io::ErrorKind::Other, "stdin reader stopped"))
            })?
        }));
    }

    let file = tokio::fs::File::open(input).await?;
    Ok(tokio::spawn(read_json_lines(BufReader::new(file), sender)))
}
