//! Loading of downloaded account archives.
//!
//! Archive files are JavaScript rather than JSON: each one assigns its array
//! to a global such as `window.YTD.tweet.part0`. The assignment is stripped and
//! the rest is parsed as a JSON array of tweets or of message conversations.

use crate::error::{Error, Result};
use crate::filter::{self, Conversation, Criteria};
use crate::post::Record;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fs;
use std::path::Path;

const BYTE_ORDER_MARK: char = '\u{feff}';
const TWEET_ARCHIVE_NAMES: [&str; 4] = ["tweet", "tweets", "deleted_tweet", "deleted_tweets"];
const MESSAGE_ARCHIVE_NAMES: [&str; 4] = [
    "direct_message",
    "direct_messages",
    "direct_message_group",
    "direct_messages_group",
];

lazy_static! {
    static ref PREAMBLE_RE: Regex = Regex::new(r"^\s*window\.YTD\.(\w+)\.part\d+\s*=\s*").unwrap();
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    Tweets,
    Messages,
}

impl Format {
    fn from_preamble_name(name: &str) -> Option<Format> {
        if TWEET_ARCHIVE_NAMES.contains(&name) {
            Some(Format::Tweets)
        } else if MESSAGE_ARCHIVE_NAMES.contains(&name) {
            Some(Format::Messages)
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Archive {
    Tweets(Vec<Record>),
    Messages(Vec<Conversation>),
}

impl Archive {
    pub fn len(&self) -> usize {
        match self {
            Archive::Tweets(tweets) => tweets.len(),
            Archive::Messages(conversations) => conversations.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn format(&self) -> Format {
        match self {
            Archive::Tweets(_) => Format::Tweets,
            Archive::Messages(_) => Format::Messages,
        }
    }

    pub fn filter(self, criteria: &Criteria) -> Vec<Record> {
        match self {
            Archive::Tweets(tweets) => filter::filter_tweets(tweets, criteria),
            Archive::Messages(conversations) => filter::filter_messages(conversations, criteria),
        }
    }
}

/// Removes any known archive preamble, returning the JSON remainder and the
/// format the preamble names.
pub fn strip_preamble(contents: &str) -> Result<(&str, Option<Format>)> {
    let contents = contents.trim_start_matches(BYTE_ORDER_MARK);

    match PREAMBLE_RE.captures(contents) {
        Some(groups) => {
            let name = &groups[1];
            let format = Format::from_preamble_name(name)
                .ok_or_else(|| Error::UnknownPreamble(name.to_string()))?;
            let end = groups.get(0).map_or(0, |m| m.end());

            Ok((&contents[end..], Some(format)))
        }
        None => Ok((contents, None)),
    }
}

fn is_conversation(value: &Value) -> bool {
    value.get("dmConversation").is_some()
}

pub fn parse(contents: &str) -> Result<Archive> {
    let (json, named_format) = strip_preamble(contents)?;
    let values = serde_json::from_str::<Vec<Value>>(json.trim_end().trim_end_matches(';'))?;

    let format = if values.first().map_or(false, is_conversation) {
        Format::Messages
    } else {
        Format::Tweets
    };

    if let Some(named_format) = named_format {
        if named_format != format && !values.is_empty() {
            log::warn!(
                "Archive preamble names {:?} but records look like {:?}",
                named_format,
                format
            );
        }
    }

    Ok(match format {
        Format::Tweets => Archive::Tweets(values.into_iter().map(Record::new).collect()),
        Format::Messages => Archive::Messages(
            values
                .into_iter()
                .map(serde_json::from_value::<Conversation>)
                .collect::<std::result::Result<Vec<_>, _>>()?,
        ),
    })
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<Archive> {
    let path = path.as_ref();
    log::info!("Parsing archive in {:?}...", path);

    let contents = fs::read_to_string(path).map_err(|source| Error::ArchiveRead {
        path: path.to_path_buf(),
        source,
    })?;
    let archive = parse(&contents)?;

    log::debug!("Loaded {} {:?} entries", archive.len(), archive.format());
    Ok(archive)
}

pub fn load_filter_archive<P: AsRef<Path>>(path: P, criteria: &Criteria) -> Result<Vec<Record>> {
    Ok(load(path)?.filter(criteria))
}
