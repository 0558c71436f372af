use shelfwise_core::config::{AppConfig, LoadOptions, LogFormat};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout carries only command output. `RUST_LOG`, when
/// set and valid, takes precedence over the configured level.
pub fn init_logging(level: &str, format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(log_filter(level));

    // A subscriber may already be installed when commands run inside tests.
    let _ = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Uses the configured level and format. A config that fails to load falls
/// back to the defaults; the command itself reports the config error.
pub fn init_from_environment() {
    let defaults = AppConfig::default();
    let logging = AppConfig::load(LoadOptions::default())
        .map(|config| config.logging)
        .unwrap_or(defaults.logging);
    init_logging(&logging.level, logging.format);
}

#[cfg(test)]
mod tests {
    use super::log_filter;

    #[test]
    fn configured_level_builds_a_filter() {
        if std::env::var_os("RUST_LOG").is_none() {
            assert_eq!(log_filter("debug").to_string(), "debug");
        }
    }
}
