use crate::error::{Error, Result};
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use std::fs::{self, File};
use std::path::Path;

fn select_log_level_filter(verbose: bool, debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    }
}

fn select_log_file_level_filter(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn create_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| Error::LogDirectory {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    File::create(path).map_err(|source| Error::LogFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Rejects option combinations that need authentication when it is skipped.
pub fn check_options(skip_auth: bool, delete: bool, has_archive: bool) -> Result<()> {
    if skip_auth && delete {
        Err(Error::InvalidOptions(
            "records cannot be deleted without authentication",
        ))
    } else if skip_auth && !has_archive {
        Err(Error::InvalidOptions(
            "an archive file is required when skipping authentication",
        ))
    } else {
        Ok(())
    }
}

/// Logs to standard error, and also to `log_file` if one is given.
pub fn init_logging(verbose: bool, debug: bool, log_file: Option<&Path>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        select_log_level_filter(verbose, debug),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];

    if let Some(path) = log_file {
        loggers.push(WriteLogger::new(
            select_log_file_level_filter(debug),
            Config::default(),
            create_log_file(path)?,
        ));
    }

    Ok(CombinedLogger::init(loggers)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_filters() {
        assert_eq!(select_log_level_filter(false, false), LevelFilter::Warn);
        assert_eq!(select_log_level_filter(true, false), LevelFilter::Info);
        assert_eq!(select_log_level_filter(true, true), LevelFilter::Debug);
        assert_eq!(select_log_file_level_filter(false), LevelFilter::Info);
        assert_eq!(select_log_file_level_filter(true), LevelFilter::Debug);
    }

    #[test]
    fn skipping_auth_requires_archive_and_forbids_delete() {
        assert!(matches!(
            check_options(true, true, true),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            check_options(true, false, false),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            check_options(true, true, false),
            Err(Error::InvalidOptions(_))
        ));
    }

    #[test]
    fn valid_option_combinations() {
        assert!(check_options(true, false, true).is_ok());
        assert!(check_options(false, true, false).is_ok());
        assert!(check_options(false, true, true).is_ok());
        assert!(check_options(false, false, false).is_ok());
    }

    #[test]
    fn log_file_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("twdelete.log");

        create_log_file(&path).unwrap();

        assert!(path.is_file());
    }
}
