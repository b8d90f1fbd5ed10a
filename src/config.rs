use crate::error::{Error, Result};
use egg_mode::KeyPair;
use serde_derive::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: [&str; 3] = [".twitter", "twdelete", "conf.yml"];

#[derive(Debug, Deserialize, Eq, PartialEq)]
pub struct Config {
    twitter: TwitterConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&contents).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The config location used when none is given on the command line.
    pub fn default_path() -> Result<PathBuf> {
        dirs::home_dir()
            .map(|home| DEFAULT_CONFIG_PATH.iter().fold(home, |acc, part| acc.join(part)))
            .ok_or(Error::NoHomeDirectory)
    }

    pub fn twitter_key_pairs(&self) -> (KeyPair, KeyPair) {
        self.twitter.key_pairs()
    }
}

#[derive(Debug, Deserialize, Eq, PartialEq)]
struct TwitterConfig {
    api_key: String,
    api_secret_key: String,
    access_token: String,
    access_token_secret: String,
}

impl TwitterConfig {
    fn key_pairs(&self) -> (KeyPair, KeyPair) {
        (
            KeyPair::new(self.api_key.clone(), self.api_secret_key.clone()),
            KeyPair::new(self.access_token.clone(), self.access_token_secret.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const EXAMPLE_CONFIG: &str = "twitter:\n  api_key: ABC\n  api_secret_key: DEF\n  \
                                  access_token: GHI\n  access_token_secret: JKL\n";

    fn expected() -> Config {
        Config {
            twitter: TwitterConfig {
                api_key: "ABC".to_string(),
                api_secret_key: "DEF".to_string(),
                access_token: "GHI".to_string(),
                access_token_secret: "JKL".to_string(),
            },
        }
    }

    #[test]
    fn parse_twitter_config() {
        let config = serde_yaml::from_str::<Config>(EXAMPLE_CONFIG).unwrap();

        assert_eq!(config, expected());
    }

    #[test]
    fn read_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EXAMPLE_CONFIG.as_bytes()).unwrap();

        let config = Config::from_file(file.path()).unwrap();
        let (consumer, access) = config.twitter_key_pairs();

        assert_eq!(config, expected());
        assert_eq!(consumer.key, "ABC");
        assert_eq!(access.secret, "JKL");
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"twitter:\n  api_key: ABC\n").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(Error::ConfigParse { .. })
        ));
    }

    #[test]
    fn missing_config_file() {
        assert!(matches!(
            Config::from_file("no/such/conf.yml"),
            Err(Error::ConfigRead { .. })
        ));
    }

    #[test]
    fn default_path_ends_with_conf_file() {
        if let Ok(path) = Config::default_path() {
            assert!(path.ends_with(".twitter/twdelete/conf.yml"));
        }
    }
}
