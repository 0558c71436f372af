use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::product::{Region, Season};
use crate::pricing::PricingDefaults;
use crate::reference::ReferenceTables;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub pricing: PricingConfig,
    pub reference: ReferenceConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetConfig {
    /// CSV or JSON file holding the uploaded inventory rows.
    pub path: Option<PathBuf>,
    /// Serve the built-in demo catalog when no dataset path is configured.
    pub fallback_to_demo: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricingConfig {
    pub default_region: Region,
    pub default_season: Season,
    pub default_day: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReferenceConfig {
    pub path: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub dataset_path: Option<PathBuf>,
    pub fallback_to_demo: Option<bool>,
    pub default_region: Option<Region>,
    pub default_season: Option<Season>,
    pub default_day: Option<u32>,
    pub reference_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig { path: None, fallback_to_demo: true },
            pricing: PricingConfig {
                default_region: Region::West,
                default_season: Season::Regular,
                default_day: 1,
            },
            reference: ReferenceConfig { path: None },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("shelfwise.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// Reference tables from `reference.path`, or the built-in tables.
    pub fn reference_tables(&self) -> Result<ReferenceTables, ConfigError> {
        let Some(path) = &self.reference.path else {
            return Ok(ReferenceTables::default());
        };

        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::ReadFile { path: path.clone(), source })?;
        ReferenceTables::from_toml_str(&raw)
            .map_err(|source| ConfigError::ParseFile { path: path.clone(), source })
    }

    pub fn pricing_defaults(&self) -> PricingDefaults {
        PricingDefaults {
            region: self.pricing.default_region,
            season: self.pricing.default_season,
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(dataset) = patch.dataset {
            if let Some(path) = dataset.path {
                self.dataset.path = Some(path);
            }
            if let Some(fallback_to_demo) = dataset.fallback_to_demo {
                self.dataset.fallback_to_demo = fallback_to_demo;
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(region) = pricing.default_region {
                self.pricing.default_region = parse_region("pricing.default_region", &region)?;
            }
            if let Some(season) = pricing.default_season {
                self.pricing.default_season = parse_season("pricing.default_season", &season)?;
            }
            if let Some(default_day) = pricing.default_day {
                self.pricing.default_day = default_day;
            }
        }

        if let Some(reference) = patch.reference {
            if let Some(path) = reference.path {
                self.reference.path = Some(path);
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SHELFWISE_DATASET_PATH") {
            self.dataset.path = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("SHELFWISE_DATASET_FALLBACK_TO_DEMO") {
            self.dataset.fallback_to_demo =
                parse_bool("SHELFWISE_DATASET_FALLBACK_TO_DEMO", &value)?;
        }

        if let Some(value) = read_env("SHELFWISE_PRICING_DEFAULT_REGION") {
            self.pricing.default_region = value.parse().map_err(|_| invalid_env(
                "SHELFWISE_PRICING_DEFAULT_REGION",
                &value,
            ))?;
        }
        if let Some(value) = read_env("SHELFWISE_PRICING_DEFAULT_SEASON") {
            self.pricing.default_season = value.parse().map_err(|_| invalid_env(
                "SHELFWISE_PRICING_DEFAULT_SEASON",
                &value,
            ))?;
        }
        if let Some(value) = read_env("SHELFWISE_PRICING_DEFAULT_DAY") {
            self.pricing.default_day = parse_u32("SHELFWISE_PRICING_DEFAULT_DAY", &value)?;
        }

        if let Some(value) = read_env("SHELFWISE_REFERENCE_PATH") {
            self.reference.path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("SHELFWISE_LOGGING_LEVEL").or_else(|| read_env("SHELFWISE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SHELFWISE_LOGGING_FORMAT").or_else(|| read_env("SHELFWISE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.dataset_path {
            self.dataset.path = Some(path);
        }
        if let Some(fallback_to_demo) = overrides.fallback_to_demo {
            self.dataset.fallback_to_demo = fallback_to_demo;
        }
        if let Some(region) = overrides.default_region {
            self.pricing.default_region = region;
        }
        if let Some(season) = overrides.default_season {
            self.pricing.default_season = season;
        }
        if let Some(default_day) = overrides.default_day {
            self.pricing.default_day = default_day;
        }
        if let Some(path) = overrides.reference_path {
            self.reference.path = Some(path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dataset(&self.dataset)?;
        validate_pricing(&self.pricing)?;
        validate_reference(&self.reference)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("shelfwise.toml"), PathBuf::from("config/shelfwise.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_dataset(dataset: &DatasetConfig) -> Result<(), ConfigError> {
    let Some(path) = &dataset.path else {
        return Ok(());
    };

    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") | Some("json") => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "dataset.path `{}` must point to a .csv or .json file",
            path.display()
        ))),
    }
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    if pricing.default_day == 0 {
        return Err(ConfigError::Validation(
            "pricing.default_day must be at least 1 (day 1 is today)".to_string(),
        ));
    }

    Ok(())
}

fn validate_reference(reference: &ReferenceConfig) -> Result<(), ConfigError> {
    if let Some(path) = &reference.path {
        if !path.exists() {
            return Err(ConfigError::Validation(format!(
                "reference.path `{}` does not exist; remove it to use the built-in tables",
                path.display()
            )));
        }
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn invalid_env(key: &str, value: &str) -> ConfigError {
    ConfigError::InvalidEnvOverride { key: key.to_string(), value: value.to_string() }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| invalid_env(key, value))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.trim().parse::<bool>().map_err(|_| invalid_env(key, value))
}

fn parse_region(key: &str, value: &str) -> Result<Region, ConfigError> {
    value.parse().map_err(|error| ConfigError::Validation(format!("{key}: {error}")))
}

fn parse_season(key: &str, value: &str) -> Result<Season, ConfigError> {
    value.parse().map_err(|error| ConfigError::Validation(format!("{key}: {error}")))
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    dataset: Option<DatasetPatch>,
    pricing: Option<PricingPatch>,
    reference: Option<ReferencePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatasetPatch {
    path: Option<PathBuf>,
    fallback_to_demo: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    default_region: Option<String>,
    default_season: Option<String>,
    default_day: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ReferencePatch {
    path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
