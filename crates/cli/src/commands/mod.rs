pub mod config;
pub mod recommend;
pub mod report;
pub mod status;

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use shelfwise_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use shelfwise_core::dataset::{Dataset, InMemoryDatasetStore};
use shelfwise_core::errors::{ApplicationError, InterfaceError};
use shelfwise_core::reference::ReferenceTables;
use tracing::info;

use crate::loader;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_NO_DATA: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;
pub const EXIT_DATASET: u8 = 5;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome<T: Serialize> {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::success_with_data(command, message, None::<()>)
    }

    pub fn success_with_data<T: Serialize>(
        command: &str,
        message: impl Into<String>,
        data: Option<T>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome::<()> {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// Maps an application error onto its interface class and exit code.
    pub fn from_application_error(command: &str, error: ApplicationError) -> Self {
        let interface = error.into_interface(correlation_id(command));
        let exit_code = match interface {
            InterfaceError::BadRequest { .. } => EXIT_DATASET,
            InterfaceError::NotFound { .. } => EXIT_NOT_FOUND,
            InterfaceError::NoData { .. } => EXIT_NO_DATA,
            InterfaceError::Internal { .. } => EXIT_CONFIG,
        };
        let message = match &interface {
            InterfaceError::BadRequest { message, .. }
            | InterfaceError::NotFound { message, .. }
            | InterfaceError::NoData { message, .. }
            | InterfaceError::Internal { message, .. } => {
                format!("{} ({message})", interface.user_message())
            }
        };
        Self::failure(command, interface.error_class(), message, exit_code)
    }
}

fn serialize_payload<T: Serialize>(payload: CommandOutcome<T>) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

fn correlation_id(command: &str) -> String {
    format!("{command}-{}", chrono::Utc::now().timestamp_millis())
}

/// Where the product rows come from.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    #[arg(long, help = "CSV or JSON inventory file (overrides dataset.path)")]
    pub dataset: Option<PathBuf>,
    #[arg(long, conflicts_with = "dataset", help = "Use the built-in demo catalog")]
    pub demo: bool,
    #[arg(long, help = "JSON 7x7x3 action-weight table to use instead of the default")]
    pub action_table: Option<PathBuf>,
}

impl SourceArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides { dataset_path: self.dataset.clone(), ..ConfigOverrides::default() }
    }
}

pub(crate) struct Session {
    pub config: AppConfig,
    pub references: ReferenceTables,
    pub store: InMemoryDatasetStore,
}

/// Loads config and reference tables, then fills the store from the chosen
/// source. An empty store is not an error here; recommendations report it.
pub(crate) fn open_session(command: &str, source: &SourceArgs) -> Result<Session, CommandResult> {
    let options = LoadOptions { overrides: source.overrides(), ..LoadOptions::default() };
    let config = AppConfig::load(options).map_err(|error| config_failure(command, error))?;
    let references = config.reference_tables().map_err(|error| config_failure(command, error))?;

    let dataset = if source.demo {
        Some(Dataset::demo())
    } else if let Some(path) = &config.dataset.path {
        let dataset = loader::load_dataset(path, &config, &references)
            .map_err(|error| dataset_failure(command, &error))?;
        info!(
            event_name = "cli.dataset.loaded",
            path = %path.display(),
            product_count = dataset.len(),
            "dataset loaded"
        );
        Some(dataset)
    } else if config.dataset.fallback_to_demo {
        Some(Dataset::demo())
    } else {
        None
    };

    let dataset = match (dataset, &source.action_table) {
        (Some(dataset), Some(path)) => Some(
            loader::load_action_table(dataset, path)
                .map_err(|error| dataset_failure(command, &error))?,
        ),
        (dataset, _) => dataset,
    };

    let store = InMemoryDatasetStore::new();
    if let Some(dataset) = dataset {
        store.replace(dataset);
    }

    Ok(Session { config, references, store })
}

pub(crate) fn config_failure(command: &str, error: impl std::fmt::Display) -> CommandResult {
    CommandResult::failure(
        command,
        "config_validation",
        format!("configuration issue: {error}"),
        EXIT_CONFIG,
    )
}

fn dataset_failure(command: &str, error: &anyhow::Error) -> CommandResult {
    CommandResult::failure(command, "dataset_load", format!("{error:#}"), EXIT_DATASET)
}
