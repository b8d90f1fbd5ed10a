use crate::config::Config;
use crate::error::Result;
use crate::filter::{self, Criteria};
use crate::post::{Kind, Record, TWEET_DATE_FORMAT};
use chrono::{DateTime, Utc};
use egg_mode::{tweet::Tweet, user::TwitterUser, KeyPair, Token};
use serde_json::json;

const USER_TIMELINE_PAGE_SIZE: i32 = 200;

/// The deletion endpoints records are removed through.
pub trait PostApi {
    async fn delete_tweet(&self, id: u64) -> Result<()>;
    async fn delete_message(&self, id: u64) -> Result<()>;
}

pub struct Client {
    token: Token,
    user: TwitterUser,
}

impl Client {
    pub async fn from_key_pairs(consumer: KeyPair, access: KeyPair) -> Result<Client> {
        log::info!("Authenticating with Twitter via OAuth");
        let token = Token::Access { consumer, access };
        let user = egg_mode::auth::verify_tokens(&token).await?.response;

        Ok(Client { token, user })
    }

    pub async fn from_config(config: &Config) -> Result<Client> {
        let (consumer, access) = config.twitter_key_pairs();

        Self::from_key_pairs(consumer, access).await
    }

    pub fn screen_name(&self) -> &str {
        &self.user.screen_name
    }

    /// Every tweet still visible on the authenticated user's timeline, newest
    /// first, in the same shape as archive records.
    pub async fn timeline_records(&self) -> Result<Vec<Record>> {
        log::info!(
            "Processing statuses for {} via web API...",
            self.screen_name()
        );

        let mut timeline = egg_mode::tweet::user_timeline(self.user.id, true, true, &self.token)
            .with_page_size(USER_TIMELINE_PAGE_SIZE);
        let mut records = vec![];
        let mut started = false;

        loop {
            let (next, response) = if started {
                timeline.older(None).await?
            } else {
                started = true;
                timeline.start().await?
            };

            if response.response.is_empty() {
                break;
            }

            records.extend(response.response.iter().map(tweet_to_record));
            log::debug!("Retrieved {} statuses", records.len());
            timeline = next;
        }

        Ok(records)
    }

    pub async fn filter_timeline(&self, criteria: &Criteria) -> Result<Vec<Record>> {
        Ok(filter::filter_tweets(self.timeline_records().await?, criteria))
    }
}

impl PostApi for Client {
    async fn delete_tweet(&self, id: u64) -> Result<()> {
        egg_mode::tweet::delete(id, &self.token).await?;
        Ok(())
    }

    async fn delete_message(&self, id: u64) -> Result<()> {
        egg_mode::direct::delete(id, &self.token).await?;
        Ok(())
    }
}

/// Wraps an API tweet in the layout used by current archive exports.
pub fn tweet_to_record(tweet: &Tweet) -> Record {
    archive_tweet_record(
        tweet.id,
        &tweet.created_at,
        &tweet.text,
        tweet.in_reply_to_screen_name.as_deref(),
        tweet.in_reply_to_status_id,
    )
}

fn archive_tweet_record(
    id: u64,
    created_at: &DateTime<Utc>,
    text: &str,
    in_reply_to_screen_name: Option<&str>,
    in_reply_to_status_id: Option<u64>,
) -> Record {
    Record::new(json!({
        "tweet": {
            "id_str": id.to_string(),
            "created_at": created_at.format(TWEET_DATE_FORMAT).to_string(),
            "full_text": text,
            "in_reply_to_screen_name": in_reply_to_screen_name,
            "in_reply_to_status_id_str": in_reply_to_status_id.map(|id| id.to_string()),
        }
    }))
}

#[derive(Debug, Default)]
pub struct DeletionReport {
    pub deleted: usize,
    pub skipped: Vec<Record>,
}

async fn delete_record<A: PostApi>(api: &A, record: &Record) -> std::result::Result<(), String> {
    let id = record
        .id()
        .ok_or_else(|| "missing identifier".to_string())?
        .parse::<u64>()
        .map_err(|error| format!("invalid identifier: {}", error))?;

    let result = match record.kind() {
        Some(Kind::Tweet) => api.delete_tweet(id).await,
        Some(Kind::Message) | Some(Kind::WelcomeMessage) => api.delete_message(id).await,
        None => return Err("unknown record type".to_string()),
    };

    result.map_err(|error| format!("{:?}", error))
}

/// Deletes records one at a time, collecting failures instead of stopping.
pub async fn delete_records<A: PostApi>(api: &A, records: &[Record]) -> DeletionReport {
    log::info!("Deleting {} filtered records...", records.len());
    let mut report = DeletionReport::default();

    for (i, record) in records.iter().enumerate() {
        log::info!(
            "Deleting {} ({}/{})",
            record.id().unwrap_or("?"),
            i + 1,
            records.len()
        );

        match delete_record(api, record).await {
            Ok(()) => report.deleted += 1,
            Err(reason) => {
                log::debug!("Skipped {:?}: {}", record.id(), reason);
                report.skipped.push(record.clone());
            }
        }
    }

    if !report.skipped.is_empty() {
        log::warn!("Skipped {} records", report.skipped.len());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use chrono::TimeZone;
    use serde_json::json;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingApi {
        failing: Vec<u64>,
        tweets: RefCell<Vec<u64>>,
        messages: RefCell<Vec<u64>>,
    }

    impl RecordingApi {
        fn outcome(&self, id: u64) -> Result<()> {
            if self.failing.contains(&id) {
                Err(Error::InvalidOptions("rejected"))
            } else {
                Ok(())
            }
        }
    }

    impl PostApi for RecordingApi {
        async fn delete_tweet(&self, id: u64) -> Result<()> {
            self.tweets.borrow_mut().push(id);
            self.outcome(id)
        }

        async fn delete_message(&self, id: u64) -> Result<()> {
            self.messages.borrow_mut().push(id);
            self.outcome(id)
        }
    }

    fn example_records() -> Vec<Record> {
        vec![
            Record::new(json!({ "tweet": { "id_str": "1", "full_text": "a" } })),
            Record::new(json!({ "id_str": "2", "text": "b" })),
            Record::new(json!({ "messageCreate": { "id": "3" } })),
            Record::new(json!({ "welcomeMessageCreate": { "id": "4" } })),
        ]
    }

    #[test]
    fn api_tweets_match_archive_records() {
        let created_at = Utc.with_ymd_and_hms(2019, 7, 2, 11, 42, 29).unwrap();
        let retweet = archive_tweet_record(
            1146004338125717504,
            &created_at,
            "RT @someone: hello",
            None,
            None,
        );
        let reply = archive_tweet_record(
            1146004338125717505,
            &created_at,
            "@someone thanks",
            Some("someone"),
            Some(1146004338125717504),
        );

        assert_eq!(
            retweet.value()["tweet"]["created_at"],
            "Tue Jul 02 11:42:29 +0000 2019"
        );
        assert_eq!(retweet.kind(), Some(Kind::Tweet));
        assert_eq!(retweet.id(), Some("1146004338125717504"));
        assert_eq!(
            retweet.created_at().map(|date| date.with_timezone(&Utc)),
            Some(created_at)
        );
        assert!(retweet.is_retweet());
        assert!(!retweet.is_reply());

        assert_eq!(reply.id(), Some("1146004338125717505"));
        assert_eq!(reply.text(), Some("@someone thanks"));
        assert!(!reply.is_retweet());
        assert!(reply.is_reply());
    }

    #[test]
    fn api_reply_detected_from_status_id_alone() {
        let created_at = Utc.with_ymd_and_hms(2020, 9, 1, 0, 0, 0).unwrap();
        let record = archive_tweet_record(2, &created_at, "thread", None, Some(1));

        assert!(record.is_reply());
        assert_eq!(
            filter::filter_tweets(vec![record.clone()], &Criteria {
                start_date: Some(created_at.date_naive()),
                end_date: Some(created_at.date_naive()),
                retweets_only: false,
                replies_only: true,
            }),
            vec![record]
        );
    }

    #[tokio::test]
    async fn deletes_by_kind() {
        let api = RecordingApi::default();
        let report = delete_records(&api, &example_records()).await;

        assert_eq!(report.deleted, 4);
        assert!(report.skipped.is_empty());
        assert_eq!(*api.tweets.borrow(), vec![1, 2]);
        assert_eq!(*api.messages.borrow(), vec![3, 4]);
    }

    #[tokio::test]
    async fn failures_do_not_stop_the_batch() {
        let api = RecordingApi {
            failing: vec![1, 3],
            ..RecordingApi::default()
        };
        let mut records = example_records();
        records.push(Record::new(json!({ "tweet": { "id_str": "x" } })));
        records.push(Record::new(json!({ "like": { "tweetId": "5" } })));

        let report = delete_records(&api, &records).await;
        let skipped = report
            .skipped
            .iter()
            .map(|record| record.value().clone())
            .collect::<Vec<_>>();

        assert_eq!(report.deleted, 2);
        assert_eq!(skipped.len(), 4);
        assert_eq!(skipped[0], json!({ "tweet": { "id_str": "1", "full_text": "a" } }));
        assert_eq!(skipped[3], json!({ "like": { "tweetId": "5" } }));
        assert_eq!(*api.tweets.borrow(), vec![1, 2]);
        assert_eq!(*api.messages.borrow(), vec![3, 4]);
    }

    #[tokio::test]
    async fn empty_batch() {
        let report = delete_records(&RecordingApi::default(), &[]).await;

        assert_eq!(report.deleted, 0);
        assert!(report.skipped.is_empty());
    }
}
