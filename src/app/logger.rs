use flexi_logger::{
    filter::{self, LogLineFilter},
    Age, Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming,
};

use super::configuration::LogConfiguration;

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_RETENTION: usize = 31;

/// Drops the HTTP stack's own chatter
pub struct IgnoreReqwest;

impl IgnoreReqwest {
    fn is_ignored(module_path: &str) -> bool {
        ["reqwest", "hyper", "hyper_util", "h2", "rustls"]
            .iter()
            .any(|p| module_path.starts_with(p))
    }
}

impl LogLineFilter for IgnoreReqwest {
    fn write(
        &self,
        now: &mut flexi_logger::DeferredNow,
        record: &log::Record,
        log_line_writer: &dyn filter::LogLineWriter,
    ) -> std::io::Result<()> {
        let path = record.module_path().unwrap_or_default();

        if Self::is_ignored(path) {
            return Ok(());
        }

        log_line_writer.write(now, record)
    }
}

/// Command line verbosity wins over the configured level
pub fn resolve_level(conf: &LogConfiguration, verbosity: Option<log::LevelFilter>) -> String {
    match verbosity {
        Some(v) => v.to_string().to_lowercase(),
        None => conf
            .level
            .as_deref()
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
    }
}

pub fn init(
    conf: &LogConfiguration,
    verbosity: Option<log::LevelFilter>,
) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_str(resolve_level(conf, verbosity))?
        .filter(Box::new(IgnoreReqwest))
        .format(flexi_logger::detailed_format);

    match &conf.directory {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .rotate(
                Criterion::Age(Age::Day),
                Naming::Timestamps,
                Cleanup::KeepCompressedFiles(conf.retention.unwrap_or(DEFAULT_RETENTION)),
            )
            .duplicate_to_stderr(Duplicate::Warn)
            .start(),
        None => logger.log_to_stderr().start(),
    }
}
