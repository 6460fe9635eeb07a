//! Сообщения потока твитов
//!
//! Разбор JSON-объекта твита в один из вариантов: обычный статус,
//! ретвит или цитата.

use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

#[derive(Debug, Clone, Default, Deserialize)]
struct RawExtended {
    full_text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawUser {
    screen_name: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawStatus {
    id: Option<u64>,
    created_at: Option<String>,
    text: Option<String>,
    full_text: Option<String>,
    extended_tweet: Option<RawExtended>,
    truncated: bool,
    retweet_count: u64,
    lang: Option<String>,
    user: Option<RawUser>,
    retweeted_status: Option<Box<RawStatus>>,
    quoted_status: Option<Box<RawStatus>>,
}

/// Один статус
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub id: Option<u64>,
    pub author: Option<String>,
    /// Полный текст: `extended_tweet.full_text` > `full_text` > `text`
    pub text: String,
    pub truncated: bool,
    pub retweet_count: u64,
    pub lang: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<RawStatus> for Status {
    fn from(raw: RawStatus) -> Self {
        let text = raw
            .extended_tweet
            .and_then(|e| e.full_text)
            .or(raw.full_text)
            .or(raw.text)
            .unwrap_or_default();

        let created_at = raw.created_at.as_deref().and_then(|s| {
            DateTime::parse_from_str(s, CREATED_AT_FORMAT)
                .or_else(|_| DateTime::parse_from_rfc3339(s))
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        });

        Self {
            id: raw.id,
            author: raw.user.and_then(|u| u.screen_name.or(u.name)),
            text,
            truncated: raw.truncated,
            retweet_count: raw.retweet_count,
            lang: raw.lang,
            created_at,
        }
    }
}

/// Входящее сообщение потока
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    Status(Status),
    Retweet { status: Status, original: Status },
    Quote { status: Status, quoted: Status },
}

impl IncomingMessage {
    /// Разобрать JSON-объект твита
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawStatus = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(mut raw: RawStatus) -> Self {
        if let Some(original) = raw.retweeted_status.take() {
            return IncomingMessage::Retweet {
                status: Status::from(raw),
                original: Status::from(*original),
            };
        }
        if let Some(quoted) = raw.quoted_status.take() {
            return IncomingMessage::Quote {
                status: Status::from(raw),
                quoted: Status::from(*quoted),
            };
        }
        IncomingMessage::Status(Status::from(raw))
    }

    /// Сам статус, пришедший в потоке
    pub fn status(&self) -> &Status {
        match self {
            IncomingMessage::Status(status)
            | IncomingMessage::Retweet { status, .. }
            | IncomingMessage::Quote { status, .. } => status,
        }
    }

    /// Текст для анализа; у ретвита это текст исходного твита
    pub fn display_text(&self) -> &str {
        match self {
            IncomingMessage::Retweet { original, .. } => &original.text,
            _ => &self.status().text,
        }
    }

    pub fn retweet_count(&self) -> u64 {
        match self {
            IncomingMessage::Retweet { original, .. } => original.retweet_count,
            _ => self.status().retweet_count,
        }
    }

    pub fn lang(&self) -> Option<&str> {
        self.status().lang.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.status().created_at.map(|dt| dt.date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_precedence() {
        let msg = IncomingMessage::from_json(
            r#"{"text": "short…", "full_text": "longer", "extended_tweet": {"full_text": "the full one"}}"#,
        )
        .unwrap();
        assert_eq!(msg.display_text(), "the full one");

        let msg = IncomingMessage::from_json(r#"{"text": "short", "full_text": "longer"}"#).unwrap();
        assert_eq!(msg.display_text(), "longer");

        let msg = IncomingMessage::from_json(r#"{"text": "short"}"#).unwrap();
        assert_eq!(msg.display_text(), "short");
    }

    #[test]
    fn test_retweet_uses_original() {
        let msg = IncomingMessage::from_json(
            r#"{
                "text": "RT @bob: nice",
                "retweet_count": 3,
                "user": {"screen_name": "alice"},
                "retweeted_status": {"full_text": "nice weather today", "retweet_count": 120}
            }"#,
        )
        .unwrap();

        assert!(matches!(msg, IncomingMessage::Retweet { .. }));
        assert_eq!(msg.display_text(), "nice weather today");
        assert_eq!(msg.retweet_count(), 120);
        assert_eq!(msg.status().author.as_deref(), Some("alice"));
    }

    #[test]
    fn test_quote_keeps_own_text() {
        let msg = IncomingMessage::from_json(
            r#"{"text": "so true", "quoted_status": {"text": "rust is fun"}}"#,
        )
        .unwrap();

        match &msg {
            IncomingMessage::Quote { quoted, .. } => assert_eq!(quoted.text, "rust is fun"),
            other => panic!("unexpected message: {:?}", other),
        }
        assert_eq!(msg.display_text(), "so true");
    }

    #[test]
    fn test_created_at() {
        let msg = IncomingMessage::from_json(
            r#"{"text": "hi", "lang": "en", "created_at": "Wed Oct 10 20:19:24 +0000 2018"}"#,
        )
        .unwrap();

        assert_eq!(msg.date(), NaiveDate::from_ymd_opt(2018, 10, 10));
        assert_eq!(msg.lang(), Some("en"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(IncomingMessage::from_json("{not json").is_err());
    }
}
