use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not read config file {path:?}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not parse config file {path:?}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("No home directory available for the default config path")]
    NoHomeDirectory,
    #[error("Archive file {path:?} cannot be read")]
    ArchiveRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Archive contents are not a JSON array of records")]
    ArchiveParse(#[from] serde_json::Error),
    #[error("Unknown archive preamble: {0}")]
    UnknownPreamble(String),
    #[error("Could not parse date {0} (expected YYYY-MM-DD)")]
    DateParse(String, #[source] chrono::ParseError),
    #[error("Could not write filtered records to {path:?}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not create log directory {path:?}")]
    LogDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not create log file {path:?}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Logger initialization error")]
    Logger(#[from] log::SetLoggerError),
    #[error("Twitter API client error")]
    EggMode(#[from] egg_mode::error::Error),
    #[error("Invalid options: {0}")]
    InvalidOptions(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
