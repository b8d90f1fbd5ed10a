//! Loosely-typed post records.
//!
//! Archive exports have changed shape over the years, so records are kept as
//! the raw JSON they were read from and the accessors here know where each
//! field lives in every known layout.

use chrono::{DateTime, FixedOffset};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

/// Timestamp format used by tweet records, e.g. `Tue Jul 02 00:00:00 +0000 2019`.
pub const TWEET_DATE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

const RETWEET_PREFIX: &str = "RT @";

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
    Tweet,
    Message,
    WelcomeMessage,
}

impl Kind {
    fn message_key(self) -> Option<&'static str> {
        match self {
            Kind::Tweet => None,
            Kind::Message => Some("messageCreate"),
            Kind::WelcomeMessage => Some("welcomeMessageCreate"),
        }
    }
}

/// A single tweet or direct message, stored exactly as it was read.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Value);

impl Record {
    pub fn new(value: Value) -> Record {
        Record(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn kind(&self) -> Option<Kind> {
        if self.0.get("tweet").is_some() || self.0.get("id_str").is_some() {
            Some(Kind::Tweet)
        } else if self.0.get("messageCreate").is_some() {
            Some(Kind::Message)
        } else if self.0.get("welcomeMessageCreate").is_some() {
            Some(Kind::WelcomeMessage)
        } else {
            None
        }
    }

    /// The fields of the record proper, whatever it is wrapped in.
    fn body(&self) -> Option<&Value> {
        match self.kind()? {
            Kind::Tweet => Some(self.0.get("tweet").unwrap_or(&self.0)),
            other => other.message_key().and_then(|key| self.0.get(key)),
        }
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.body()
            .and_then(|body| body.get(name))
            .and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        match self.kind()? {
            Kind::Tweet => self.field("id_str").or_else(|| self.field("id")),
            _ => self.field("id"),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.field("full_text").or_else(|| self.field("text"))
    }

    /// The creation time, parsed with the format used by the record's kind.
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        match self.kind()? {
            Kind::Tweet => self
                .field("created_at")
                .and_then(|value| DateTime::parse_from_str(value, TWEET_DATE_FORMAT).ok()),
            _ => self
                .field("createdAt")
                .and_then(|value| DateTime::parse_from_rfc3339(value).ok()),
        }
    }

    pub fn is_retweet(&self) -> bool {
        self.kind() == Some(Kind::Tweet)
            && self
                .text()
                .map_or(false, |text| text.starts_with(RETWEET_PREFIX))
    }

    pub fn is_reply(&self) -> bool {
        self.kind() == Some(Kind::Tweet)
            && ["in_reply_to_screen_name", "in_reply_to_status_id_str"]
                .iter()
                .any(|name| self.field(name).map_or(false, |value| !value.is_empty()))
    }
}
