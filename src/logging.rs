use crate::config::AppConfig;
use crate::tools::TARGET_SESSION;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directive for the session log level.
///
/// Per-call session snapshots are silenced unless `enable_tracing` is set.
pub fn filter_directive(config: &AppConfig) -> String {
    if config.enable_tracing {
        format!("{},{}=trace", config.log_level, TARGET_SESSION)
    } else {
        format!("{},{}=off", config.log_level, TARGET_SESSION)
    }
}

pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    let file_appender = match config.rotation.as_str() {
        "hourly" => tracing_appender::rolling::hourly(&config.log_dir, &config.log_file),
        "daily" => tracing_appender::rolling::daily(&config.log_dir, &config.log_file),
        _ => tracing_appender::rolling::never(&config.log_dir, &config.log_file),
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.use_json {
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        // stdout carries the tool responses, so console logs go to stderr
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let console_layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(file_layer).with(console_layer).init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let mut config = AppConfig::default();
        assert_eq!(filter_directive(&config), "info,SENDMONEY::SESSION=off");

        config.enable_tracing = true;
        config.log_level = "debug".into();
        assert_eq!(filter_directive(&config), "debug,SENDMONEY::SESSION=trace");
    }
}
