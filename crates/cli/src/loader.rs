//! Reads uploaded inventory files into core datasets.

use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use shelfwise_core::config::AppConfig;
use shelfwise_core::dataset::{check_required_columns, Dataset, IngestOptions, RawProductRecord};
use shelfwise_core::reference::ReferenceTables;

/// Parses CSV rows keyed by the dashboard's column headers.
pub fn read_csv_records<R: Read>(reader: R) -> Result<Vec<RawProductRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().context("failed to read CSV header row")?;
    check_required_columns(headers.iter())?;

    let mut records = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let record: RawProductRecord =
            result.with_context(|| format!("CSV parse error at line {}", line_num + 2))?;
        records.push(record);
    }

    Ok(records)
}

/// JSON uploads have no header row, so the first object's keys stand in for it.
pub fn read_json_records(raw: &str) -> Result<Vec<RawProductRecord>> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> =
        serde_json::from_str(raw).context("expected a JSON array of product rows")?;
    if let Some(first) = rows.first() {
        check_required_columns(first.keys().map(String::as_str))?;
    }

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| {
            serde_json::from_value(serde_json::Value::Object(row))
                .with_context(|| format!("JSON parse error in row {}", index + 1))
        })
        .collect()
}

pub fn read_records(path: &Path) -> Result<Vec<RawProductRecord>> {
    let extension =
        path.extension().and_then(|extension| extension.to_str()).map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => {
            let file = File::open(path)
                .with_context(|| format!("failed to open dataset `{}`", path.display()))?;
            read_csv_records(file)
                .with_context(|| format!("failed to parse dataset `{}`", path.display()))
        }
        Some("json") => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read dataset `{}`", path.display()))?;
            read_json_records(&raw)
                .with_context(|| format!("failed to parse dataset `{}`", path.display()))
        }
        _ => bail!("dataset `{}` must be a .csv or .json file", path.display()),
    }
}

/// Loads and normalizes a dataset file, with expiration dates measured from today.
pub fn load_dataset(
    path: &Path,
    config: &AppConfig,
    references: &ReferenceTables,
) -> Result<Dataset> {
    let records = read_records(path)?;
    let options = IngestOptions {
        today: chrono::Local::now().date_naive(),
        default_region: config.pricing.default_region,
    };
    Dataset::ingest(records, &options, references)
        .with_context(|| format!("dataset `{}` has no usable rows", path.display()))
}

/// Applies an uploaded 7x7x3 action-weight table, stored as nested JSON arrays.
pub fn load_action_table(dataset: Dataset, path: &Path) -> Result<Dataset> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read action table `{}`", path.display()))?;
    let weights: Vec<Vec<Vec<f64>>> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse action table `{}`", path.display()))?;
    dataset
        .with_action_weights(weights)
        .with_context(|| format!("action table `{}` was rejected", path.display()))
}
