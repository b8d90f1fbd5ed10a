use crate::error::{Error, Result};
use crate::post::{Kind, Record};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde_derive::Deserialize;
use serde_json::Value;

const CUTOFF_DATE_FORMAT: &str = "%Y-%m-%d";

/// Criteria selecting records for deletion; all active filters must match.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Criteria {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub retweets_only: bool,
    pub replies_only: bool,
}

impl Criteria {
    pub fn parse_date(input: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(input, CUTOFF_DATE_FORMAT)
            .map_err(|error| Error::DateParse(input.to_string(), error))
    }

    /// Builds criteria from optional `YYYY-MM-DD` cutoff strings.
    pub fn from_args(
        start_date: Option<&str>,
        end_date: Option<&str>,
        retweets_only: bool,
        replies_only: bool,
    ) -> Result<Criteria> {
        Ok(Criteria {
            start_date: start_date.map(Self::parse_date).transpose()?,
            end_date: end_date.map(Self::parse_date).transpose()?,
            retweets_only,
            replies_only,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && !self.has_type_filter()
    }

    fn has_type_filter(&self) -> bool {
        self.retweets_only || self.replies_only
    }

    fn start(&self) -> Option<DateTime<Utc>> {
        self.start_date.map(cutoff)
    }

    fn end(&self) -> Option<DateTime<Utc>> {
        self.end_date.map(cutoff)
    }
}

fn cutoff(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// A direct-message conversation as it appears in a message archive.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Conversation {
    #[serde(rename = "dmConversation")]
    dm_conversation: ConversationBody,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
struct ConversationBody {
    #[serde(rename = "conversationId", default)]
    conversation_id: Option<String>,
    #[serde(default)]
    messages: Vec<Value>,
}

impl Conversation {
    pub fn id(&self) -> Option<&str> {
        self.dm_conversation.conversation_id.as_deref()
    }

    /// The messages of the conversation. Group events such as participants
    /// joining are not messages and are left out.
    pub fn into_messages(self) -> impl Iterator<Item = Record> {
        self.dm_conversation
            .messages
            .into_iter()
            .map(Record::new)
            .filter(|record| match record.kind() {
                Some(Kind::Message) | Some(Kind::WelcomeMessage) => true,
                _ => {
                    log::debug!("Ignoring conversation event {}", record.value());
                    false
                }
            })
    }
}

pub fn posted_on_or_after(record: &Record, date: &DateTime<Utc>) -> bool {
    match record.created_at() {
        Some(created_at) => created_at.with_timezone(&Utc) >= *date,
        None => {
            log::warn!("Record {:?} has no creation time", record.id());
            false
        }
    }
}

pub fn posted_on_or_before(record: &Record, date: &DateTime<Utc>) -> bool {
    match record.created_at() {
        Some(created_at) => created_at.with_timezone(&Utc) <= *date,
        None => {
            log::warn!("Record {:?} has no creation time", record.id());
            false
        }
    }
}

fn filter_by_date(records: Vec<Record>, criteria: &Criteria) -> Vec<Record> {
    let mut records = records;

    if let Some(start) = criteria.start() {
        log::info!("Filtering for records posted on or after {}...", start);
        records.retain(|record| posted_on_or_after(record, &start));
        log::info!("Identified {} records after start date", records.len());
    }

    if let Some(end) = criteria.end() {
        log::info!("Filtering for records posted on or before {}...", end);
        records.retain(|record| posted_on_or_before(record, &end));
        log::info!("Identified {} records before end date", records.len());
    }

    records
}

pub fn filter_tweets(tweets: Vec<Record>, criteria: &Criteria) -> Vec<Record> {
    let mut tweets = filter_by_date(tweets, criteria);

    if criteria.retweets_only {
        log::info!("Filtering for tweets that are retweets...");
        tweets.retain(Record::is_retweet);
    }

    if criteria.replies_only {
        log::info!("Filtering for tweets that are replies...");
        tweets.retain(Record::is_reply);
    }

    tweets
}

pub fn filter_messages(conversations: Vec<Conversation>, criteria: &Criteria) -> Vec<Record> {
    let conversation_count = conversations.len();
    let messages = conversations
        .into_iter()
        .flat_map(Conversation::into_messages)
        .collect::<Vec<_>>();

    log::info!(
        "Identified {} messages in {} conversations",
        messages.len(),
        conversation_count
    );

    if criteria.has_type_filter() {
        log::warn!("Retweet and reply filters do not apply to direct messages");
    }

    filter_by_date(messages, criteria)
}
