use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Engine crates at info, everything else at warn.
pub const DEFAULT_FILTER: &str = "warn,quizpath_engine=info,quizpath_algo=info";

const LOG_FILE_PREFIX: &str = "quizpath-engine.log";

/// Keeps the non-blocking file writer alive; drop it last.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Rolling file output, enabled with `ENABLE_FILE_LOGS=true|1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLogSettings {
    pub dir: PathBuf,
}

impl FileLogSettings {
    pub fn from_env() -> Option<Self> {
        Self::from_values(
            std::env::var("ENABLE_FILE_LOGS").ok().as_deref(),
            std::env::var("LOG_DIR").ok().as_deref(),
        )
    }

    fn from_values(enabled: Option<&str>, dir: Option<&str>) -> Option<Self> {
        match enabled.map(str::trim) {
            Some("true") | Some("1") => Some(Self {
                dir: PathBuf::from(dir.filter(|d| !d.trim().is_empty()).unwrap_or("./logs")),
            }),
            _ => None,
        }
    }
}

/// Parse filter directives, falling back to [`DEFAULT_FILTER`].
pub fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directives:?} ({err}); using {DEFAULT_FILTER}");
        EnvFilter::new(DEFAULT_FILTER)
    })
}

/// Logs go to stderr so stdout stays clean for JSON results.
pub fn init_tracing(directives: &str) -> Option<FileLogGuard> {
    let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    let mut guard = None;
    let file_layer = FileLogSettings::from_env().and_then(|settings| {
        if let Err(err) = std::fs::create_dir_all(&settings.dir) {
            eprintln!("failed to create log directory {}: {err}", settings.dir.display());
            return None;
        }
        let appender = RollingFileAppender::new(Rotation::DAILY, &settings.dir, LOG_FILE_PREFIX);
        let (writer, worker) = tracing_appender::non_blocking(appender);
        guard = Some(FileLogGuard { _guard: worker });
        Some(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
    });

    tracing_subscriber::registry()
        .with(build_filter(directives))
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_file_logs_need_explicit_opt_in() {
        assert_eq!(FileLogSettings::from_values(None, Some("/tmp/q")), None);
        assert_eq!(FileLogSettings::from_values(Some("yes"), None), None);
        assert_eq!(
            FileLogSettings::from_values(Some("1"), None),
            Some(FileLogSettings {
                dir: PathBuf::from("./logs")
            })
        );
        assert_eq!(
            FileLogSettings::from_values(Some("true"), Some("/var/log/quizpath")),
            Some(FileLogSettings {
                dir: PathBuf::from("/var/log/quizpath")
            })
        );
    }
}
