use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use shelfwise_core::config::{AppConfig, LoadOptions};
use toml::Value;

use crate::commands::{config_failure, CommandResult};

#[derive(Debug, Serialize)]
struct ConfigField {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return config_failure("config", error),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = vec![
        ConfigField {
            key: "dataset.path",
            value: display_path(config.dataset.path.as_deref()),
            source: source("dataset.path", &["SHELFWISE_DATASET_PATH"]),
        },
        ConfigField {
            key: "dataset.fallback_to_demo",
            value: config.dataset.fallback_to_demo.to_string(),
            source: source("dataset.fallback_to_demo", &["SHELFWISE_DATASET_FALLBACK_TO_DEMO"]),
        },
        ConfigField {
            key: "pricing.default_region",
            value: config.pricing.default_region.to_string(),
            source: source("pricing.default_region", &["SHELFWISE_PRICING_DEFAULT_REGION"]),
        },
        ConfigField {
            key: "pricing.default_season",
            value: config.pricing.default_season.to_string(),
            source: source("pricing.default_season", &["SHELFWISE_PRICING_DEFAULT_SEASON"]),
        },
        ConfigField {
            key: "pricing.default_day",
            value: config.pricing.default_day.to_string(),
            source: source("pricing.default_day", &["SHELFWISE_PRICING_DEFAULT_DAY"]),
        },
        ConfigField {
            key: "reference.path",
            value: display_path(config.reference.path.as_deref()),
            source: source("reference.path", &["SHELFWISE_REFERENCE_PATH"]),
        },
        ConfigField {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["SHELFWISE_LOGGING_LEVEL", "SHELFWISE_LOG_LEVEL"]),
        },
        ConfigField {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
            source: source(
                "logging.format",
                &["SHELFWISE_LOGGING_FORMAT", "SHELFWISE_LOG_FORMAT"],
            ),
        },
    ];

    CommandResult::success_with_data(
        "config",
        "effective config (source precedence: env > file > default)",
        Some(fields),
    )
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| "<unset>".to_string())
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("shelfwise.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/shelfwise.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(doc: &Value, key_path: &str) -> bool {
    let mut current = doc;
    for segment in key_path.split('.') {
        let Some(next) = current.get(segment) else {
            return false;
        };
        current = next;
    }
    true
}
