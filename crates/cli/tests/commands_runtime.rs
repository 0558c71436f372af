use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use serde_json::Value;
use shelfwise_cli::commands::recommend::{self, RecommendArgs};
use shelfwise_cli::commands::report::{self, ReportArgs, ReportFormat};
use shelfwise_cli::commands::status::{self, StatusArgs};
use shelfwise_cli::commands::{config, SourceArgs};
use tempfile::TempDir;

const INVENTORY_CSV: &str = "\
Product_Name,Catagory,Unit_Price,Stock_Quantity,Sales_Volume,Inventory_Turnover_Rate,Days_to_Expiry,State,Seasonal_Factor,Supplier_Name
Paneer,Dairy,$3.50,120,14,40,2,Kerala,Festival,Amul
Basmati Rice,Pantry,12.00,60,20,30,180,Punjab,,India Gate
Paneer,Dairy,3.75,30,12,45,6,Goa,,Gowardhan
";

#[test]
fn recommend_returns_demo_product() {
    with_env(&[], || {
        let result = recommend::run(recommend_args("Strawberries", Some(1), demo_source()));
        assert_eq!(result.exit_code, 0, "expected successful recommendation");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "recommend");
        assert_eq!(payload["status"], "ok");
        assert_eq!(payload["data"]["productName"], "Strawberries");
        assert_eq!(payload["data"]["discountPercent"], 20.0);
    });
}

#[test]
fn recommend_is_repeatable() {
    with_env(&[], || {
        let first = recommend::run(recommend_args("Fresh Salmon Fillet", Some(2), demo_source()));
        let second = recommend::run(recommend_args("Fresh Salmon Fillet", Some(2), demo_source()));

        assert_eq!(parse_payload(&first.output)["data"], parse_payload(&second.output)["data"]);
    });
}

#[test]
fn recommend_clamps_non_positive_day() {
    with_env(&[], || {
        let clamped = recommend::run(recommend_args("Avocados", Some(-3), demo_source()));
        let first = recommend::run(recommend_args("Avocados", Some(1), demo_source()));

        assert_eq!(clamped.exit_code, 0);
        assert_eq!(parse_payload(&clamped.output)["data"], parse_payload(&first.output)["data"]);
    });
}

#[test]
fn recommend_reports_missing_product() {
    with_env(&[], || {
        let result = recommend::run(recommend_args("Dragon Fruit", None, demo_source()));
        assert_eq!(result.exit_code, 4, "expected not-found exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "product_not_found");
        assert!(payload["message"].as_str().unwrap_or_default().contains("Strawberries"));
    });
}

#[test]
fn recommend_without_data_or_fallback_reports_no_data() {
    with_env(&[("SHELFWISE_DATASET_FALLBACK_TO_DEMO", "false")], || {
        let result = recommend::run(recommend_args("Strawberries", None, SourceArgs::default()));
        assert_eq!(result.exit_code, 3, "expected no-data exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "no_data_available");
    });
}

#[test]
fn recommend_uses_uploaded_csv_with_renamed_duplicates() {
    with_env(&[], || {
        let (_dir, path) = write_inventory();

        let result =
            recommend::run(recommend_args("Paneer (1)", Some(1), dataset_source(path.clone())));
        assert_eq!(result.exit_code, 0, "duplicate row should be addressable by its new name");

        let original = recommend::run(recommend_args("Paneer", Some(1), dataset_source(path)));
        let payload = parse_payload(&original.output);
        assert_eq!(payload["data"]["discountPercent"], 25.0);
        let reasoning = payload["data"]["reasoning"].as_str().unwrap_or_default();
        assert!(reasoning.contains("Regional factor: South"));
        assert!(reasoning.contains("Seasonal factor: Festival"));
    });
}

#[test]
fn dataset_path_can_come_from_env() {
    with_env(&[], || {
        let (_dir, path) = write_inventory();
        let path = path.display().to_string();

        with_vars(&[("SHELFWISE_DATASET_PATH", path.as_str())], || {
            let result =
                recommend::run(recommend_args("Basmati Rice", None, SourceArgs::default()));
            assert_eq!(result.exit_code, 0);
        });
    });
}

#[test]
fn missing_dataset_file_is_a_load_failure() {
    with_env(&[], || {
        let result = recommend::run(recommend_args(
            "Paneer",
            None,
            dataset_source(PathBuf::from("/nonexistent/inventory.csv")),
        ));
        assert_eq!(result.exit_code, 5, "expected dataset load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "dataset_load");
    });
}

#[test]
fn upload_missing_required_columns_is_a_load_failure() {
    with_env(&[], || {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("partial.csv");
        fs::write(&path, "Product_Name,Stock_Quantity\nMilk,10\n").expect("write partial");

        let result = recommend::run(recommend_args("Milk", None, dataset_source(path)));
        assert_eq!(result.exit_code, 5, "expected dataset load failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "dataset_load");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("missing required columns"));
        assert!(message.contains("Unit_Price"));
    });
}

#[test]
fn invalid_env_config_is_a_config_failure() {
    with_env(&[("SHELFWISE_PRICING_DEFAULT_DAY", "soon")], || {
        let result = recommend::run(recommend_args("Strawberries", None, demo_source()));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn report_summarizes_demo_catalog() {
    with_env(&[], || {
        let result = report::run(ReportArgs {
            day: Some(1),
            format: ReportFormat::Json,
            source: demo_source(),
        });
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "report");
        assert_eq!(payload["data"]["summary"]["totalProducts"], 15);
        assert_eq!(payload["data"]["summary"]["urgentProducts"], 6);
        assert_eq!(payload["data"]["rows"].as_array().map(Vec::len), Some(15));
    });
}

#[test]
fn report_renders_csv_rows() {
    with_env(&[], || {
        let (_dir, path) = write_inventory();
        let result = report::run(ReportArgs {
            day: Some(2),
            format: ReportFormat::Csv,
            source: dataset_source(path),
        });
        assert_eq!(result.exit_code, 0);

        let lines = result.output.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4, "header plus one line per product");
        assert!(lines[0].starts_with("productName,category,unitPrice"));
        assert!(lines[1].starts_with("Paneer,Dairy,3.5"));
        assert!(lines[3].starts_with("Paneer (1),Dairy"));
    });
}

#[test]
fn status_reports_loaded_and_empty_stores() {
    with_env(&[], || {
        let loaded = status::run(StatusArgs { source: demo_source() });
        let payload = parse_payload(&loaded.output);
        assert_eq!(payload["data"]["hasData"], true);
        assert_eq!(payload["data"]["productCount"], 15);
    });

    with_env(&[("SHELFWISE_DATASET_FALLBACK_TO_DEMO", "false")], || {
        let empty = status::run(StatusArgs { source: SourceArgs::default() });
        assert_eq!(empty.exit_code, 0);
        let payload = parse_payload(&empty.output);
        assert_eq!(payload["data"]["hasData"], false);
        assert_eq!(payload["data"]["productCount"], 0);
    });
}

#[test]
fn config_reports_env_sources() {
    with_env(&[("SHELFWISE_PRICING_DEFAULT_REGION", "north")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        let fields = payload["data"].as_array().cloned().unwrap_or_default();
        let region = fields
            .iter()
            .find(|field| field["key"] == "pricing.default_region")
            .expect("region field");
        assert_eq!(region["value"], "North");
        assert_eq!(region["source"], "env (SHELFWISE_PRICING_DEFAULT_REGION)");

        let day = fields.iter().find(|field| field["key"] == "pricing.default_day").expect("day");
        assert_eq!(day["source"], "default");
    });
}

fn recommend_args(product: &str, day: Option<i64>, source: SourceArgs) -> RecommendArgs {
    RecommendArgs { product: product.to_string(), day, source }
}

fn demo_source() -> SourceArgs {
    SourceArgs { demo: true, ..SourceArgs::default() }
}

fn dataset_source(path: PathBuf) -> SourceArgs {
    SourceArgs { dataset: Some(path), ..SourceArgs::default() }
}

fn write_inventory() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("inventory.csv");
    fs::write(&path, INVENTORY_CSV).expect("write inventory");
    (dir, path)
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

const KEYS: [&str; 10] = [
    "SHELFWISE_DATASET_PATH",
    "SHELFWISE_DATASET_FALLBACK_TO_DEMO",
    "SHELFWISE_PRICING_DEFAULT_REGION",
    "SHELFWISE_PRICING_DEFAULT_SEASON",
    "SHELFWISE_PRICING_DEFAULT_DAY",
    "SHELFWISE_REFERENCE_PATH",
    "SHELFWISE_LOGGING_LEVEL",
    "SHELFWISE_LOGGING_FORMAT",
    "SHELFWISE_LOG_LEVEL",
    "SHELFWISE_LOG_FORMAT",
];

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard = ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let previous_values: Vec<(&str, Option<String>)> =
        KEYS.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &KEYS {
        env::remove_var(key);
    }
    with_vars(vars, test_fn);

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}

/// Sets extra variables while the caller already holds the env lock.
fn with_vars(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    for (key, value) in vars {
        env::set_var(key, value);
    }
    test_fn();
    for (key, _) in vars {
        env::remove_var(key);
    }
}
