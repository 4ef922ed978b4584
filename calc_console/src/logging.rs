//! Logger selection for the console binary
//!
//! Frames go to stdout, so log lines go to stderr or a file.

use std::fs::File;
use std::io;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger};

/// File logger when `log_file` is set, stderr logger otherwise
pub fn build_logger(level: LevelFilter, log_file: Option<&Path>) -> io::Result<Box<dyn SharedLogger>> {
    let logger: Box<dyn SharedLogger> = match log_file {
        Some(path) => WriteLogger::new(level, Config::default(), File::create(path)?),
        None => TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    };
    Ok(logger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Record};

    #[test]
    fn test_file_logger_writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calc.log");
        let logger = build_logger(LevelFilter::Info, Some(&path)).unwrap();

        logger.log(
            &Record::builder()
                .args(format_args!("evaluation failed"))
                .level(Level::Warn)
                .target("calc")
                .build(),
        );
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("evaluation failed"));
    }

    #[test]
    fn test_terminal_logger_keeps_level() {
        let logger = build_logger(LevelFilter::Debug, None).unwrap();
        assert_eq!(logger.level(), LevelFilter::Debug);
    }

    #[test]
    fn test_missing_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("calc.log");
        assert!(build_logger(LevelFilter::Info, Some(&path)).is_err());
    }
}
