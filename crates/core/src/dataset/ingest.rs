//! Normalization of uploaded inventory rows into a [`Dataset`].

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use super::Dataset;
use crate::domain::product::{turnover_rate, Product, Region, Season};
use crate::errors::DatasetError;
use crate::pricing::action_table::ActionTable;
use crate::reference::ReferenceTables;

pub const DEFAULT_STATE: &str = "Maharashtra";
/// Used when a row has no usable expiration information.
pub const DEFAULT_DAYS_TO_EXPIRY: u32 = 7;

/// One uploaded row, using the dashboard's column names.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProductRecord {
    #[serde(rename = "Product_Name", default)]
    pub product_name: String,
    #[serde(rename = "Catagory", alias = "Category", default)]
    pub category: String,
    #[serde(rename = "Unit_Price", default, deserialize_with = "lenient_amount")]
    pub unit_price: f64,
    #[serde(rename = "Stock_Quantity", default, deserialize_with = "lenient_count")]
    pub stock_quantity: u32,
    #[serde(rename = "Sales_Volume", default, deserialize_with = "lenient_count")]
    pub sales_volume: u32,
    #[serde(rename = "Inventory_Turnover_Rate", default, deserialize_with = "lenient_amount")]
    pub inventory_turnover_rate: f64,
    #[serde(rename = "Expiration_Date", default, deserialize_with = "non_empty_text")]
    pub expiration_date: Option<String>,
    #[serde(rename = "Days_to_Expiry", default, deserialize_with = "optional_count")]
    pub days_to_expiry: Option<u32>,
    #[serde(rename = "State", default, deserialize_with = "non_empty_text")]
    pub state: Option<String>,
    #[serde(rename = "Region", default, deserialize_with = "non_empty_text")]
    pub region: Option<String>,
    #[serde(rename = "Seasonal_Factor", default, deserialize_with = "non_empty_text")]
    pub seasonal_factor: Option<String>,
    #[serde(rename = "Supplier_Name", default, deserialize_with = "non_empty_text")]
    pub supplier_name: Option<String>,
}

/// Columns an upload must carry. Each entry lists the accepted spellings;
/// the first is the one reported when all of them are absent.
pub const REQUIRED_COLUMNS: [&[&str]; 8] = [
    &["Product_Name"],
    &["Catagory", "Category"],
    &["Unit_Price"],
    &["Stock_Quantity"],
    &["Sales_Volume"],
    &["Expiration_Date", "Days_to_Expiry"],
    &["Supplier_Name"],
    &["Inventory_Turnover_Rate"],
];

/// Rejects a header row that lacks any required column, naming every gap.
pub fn check_required_columns<'a, I>(headers: I) -> Result<(), DatasetError>
where
    I: IntoIterator<Item = &'a str>,
{
    let present = headers.into_iter().map(str::trim).collect::<HashSet<_>>();
    let missing = REQUIRED_COLUMNS
        .iter()
        .filter(|spellings| !spellings.iter().any(|column| present.contains(column)))
        .map(|spellings| spellings[0].to_string())
        .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        warn!(event_name = "dataset.ingest.missing_columns", missing = ?missing, "upload rejected");
        Err(DatasetError::MissingColumns(missing))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IngestOptions {
    /// Reference date for turning expiration dates into days remaining.
    pub today: NaiveDate,
    pub default_region: Region,
}

impl Dataset {
    pub fn ingest(
        records: Vec<RawProductRecord>,
        options: &IngestOptions,
        references: &ReferenceTables,
    ) -> Result<Self, DatasetError> {
        let mut products = Vec::with_capacity(records.len());
        let mut seen = HashSet::new();

        for (row, record) in records.into_iter().enumerate() {
            let row = row + 1;
            let name = record.product_name.trim();
            if name.is_empty() {
                warn!(event_name = "dataset.ingest.skipped_row", row, "row has no product name");
                continue;
            }

            let name = unique_name(name, &seen);
            if name != record.product_name.trim() {
                info!(
                    event_name = "dataset.ingest.renamed_duplicate",
                    row,
                    original = record.product_name.trim(),
                    renamed = %name,
                    "duplicate product name renamed"
                );
            }
            seen.insert(name.clone());

            let days_to_expiry = record.days_to_expiry.unwrap_or_else(|| {
                days_until(record.expiration_date.as_deref(), options.today, row)
            });

            let state = record.state.clone().unwrap_or_else(|| DEFAULT_STATE.to_string());
            let region = record
                .region
                .as_deref()
                .and_then(|value| value.parse::<Region>().ok())
                .or_else(|| references.region_for_state(&state))
                .unwrap_or(options.default_region);
            let season = record
                .seasonal_factor
                .as_deref()
                .and_then(|value| value.parse::<Season>().ok())
                .unwrap_or(Season::Regular);

            products.push(Product {
                name,
                category: record.category.trim().to_string(),
                unit_price: record.unit_price,
                stock_quantity: record.stock_quantity,
                sales_volume: record.sales_volume,
                days_to_expiry,
                turnover_rate: turnover_rate(record.sales_volume, record.stock_quantity),
                inventory_turnover_rate: record.inventory_turnover_rate.max(0.0),
                state: Some(state),
                region: Some(region),
                season: Some(season),
            });
        }

        if products.is_empty() {
            return Err(DatasetError::NoValidProducts);
        }

        info!(
            event_name = "dataset.ingest.completed",
            product_count = products.len(),
            "dataset ingested"
        );
        Ok(Dataset::new(products, Some(ActionTable::generate_default())))
    }
}

fn unique_name(name: &str, seen: &HashSet<String>) -> String {
    if !seen.contains(name) {
        return name.to_string();
    }
    (1..)
        .map(|counter| format!("{name} ({counter})"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

fn days_until(expiration: Option<&str>, today: NaiveDate, row: usize) -> u32 {
    let Some(raw) = expiration else {
        return DEFAULT_DAYS_TO_EXPIRY;
    };
    match parse_expiration(raw) {
        Some(date) => (date - today).num_days().clamp(0, i64::from(u32::MAX)) as u32,
        None => {
            warn!(
                event_name = "dataset.ingest.invalid_expiration",
                row,
                value = raw,
                "unparseable expiration date, assuming default shelf life"
            );
            DEFAULT_DAYS_TO_EXPIRY
        }
    }
}

/// Accepts `YYYY-MM-DD` and US-style `MM/DD/YYYY`.
pub fn parse_expiration(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn value(self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => value,
            Self::Text(text) => text.trim().replace(['$', ','], "").parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

fn to_count(value: f64) -> u32 {
    value.trunc().clamp(0.0, f64::from(u32::MAX)) as u32
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(value.and_then(LooseNumber::value).unwrap_or(0.0))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(value.and_then(LooseNumber::value).map(to_count).unwrap_or(0))
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(value.and_then(LooseNumber::value).map(to_count))
}

fn non_empty_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|text| text.trim().to_string()).filter(|text| !text.is_empty()))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        check_required_columns, parse_expiration, IngestOptions, RawProductRecord,
        DEFAULT_DAYS_TO_EXPIRY,
    };
    use crate::dataset::{ActionTableSource, Dataset, ProductCatalog};
    use crate::domain::product::{Region, Season};
    use crate::errors::DatasetError;
    use crate::pricing::action_table::ActionTable;
    use crate::reference::ReferenceTables;

    fn options() -> IngestOptions {
        IngestOptions {
            today: NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
            default_region: Region::West,
        }
    }

    fn record(name: &str) -> RawProductRecord {
        RawProductRecord {
            product_name: name.to_string(),
            category: "Dairy".to_string(),
            unit_price: 4.99,
            stock_quantity: 78,
            sales_volume: 25,
            inventory_turnover_rate: 68.0,
            expiration_date: Some("2024-06-05".to_string()),
            ..RawProductRecord::default()
        }
    }

    #[test]
    fn derives_expiry_turnover_and_location_defaults() {
        let dataset =
            Dataset::ingest(vec![record("Greek Yogurt")], &options(), &ReferenceTables::default())
                .expect("ingest");
        let product = dataset.find_product("Greek Yogurt").expect("product");

        assert_eq!(product.days_to_expiry, 4);
        assert!((product.turnover_rate - 25.0 / 78.0).abs() < 1e-12);
        assert_eq!(product.state.as_deref(), Some("Maharashtra"));
        assert_eq!(product.region, Some(Region::West));
        assert_eq!(product.season, Some(Season::Regular));
        assert_eq!(dataset.action_table(), ActionTable::generate_default());
    }

    #[test]
    fn region_comes_from_record_then_state() {
        let mut explicit = record("Paneer");
        explicit.region = Some("central".to_string());
        explicit.seasonal_factor = Some("Monsoon".to_string());
        let mut by_state = record("Curd");
        by_state.state = Some("Tamil Nadu".to_string());
        by_state.region = Some("Atlantis".to_string());

        let dataset =
            Dataset::ingest(vec![explicit, by_state], &options(), &ReferenceTables::default())
                .expect("ingest");

        let paneer = dataset.find_product("Paneer").expect("paneer");
        assert_eq!(paneer.region, Some(Region::Central));
        assert_eq!(paneer.season, Some(Season::Monsoon));
        assert_eq!(dataset.find_product("Curd").and_then(|p| p.region), Some(Region::South));
    }

    #[test]
    fn duplicate_names_get_numbered_suffixes() {
        let dataset = Dataset::ingest(
            vec![record("Milk"), record("Milk"), record("Milk (1)"), record("Milk")],
            &options(),
            &ReferenceTables::default(),
        )
        .expect("ingest");

        assert_eq!(dataset.product_names(), vec!["Milk", "Milk (1)", "Milk (1) (1)", "Milk (2)"]);
    }

    #[test]
    fn blank_names_are_skipped_and_empty_upload_fails() {
        let records = vec![record("  "), record("Butter")];
        let dataset =
            Dataset::ingest(records, &options(), &ReferenceTables::default()).expect("ingest");
        assert_eq!(dataset.len(), 1);

        let error = Dataset::ingest(vec![record("")], &options(), &ReferenceTables::default())
            .expect_err("no valid rows");
        assert_eq!(error, DatasetError::NoValidProducts);
    }

    #[test]
    fn expiry_handles_past_unparseable_and_explicit_values() {
        let mut expired = record("Old Milk");
        expired.expiration_date = Some("05/20/2024".to_string());
        let mut garbled = record("Mystery");
        garbled.expiration_date = Some("next tuesday".to_string());
        let mut explicit = record("Ghee");
        explicit.days_to_expiry = Some(120);

        let dataset = Dataset::ingest(
            vec![expired, garbled, explicit],
            &options(),
            &ReferenceTables::default(),
        )
        .expect("ingest");

        assert_eq!(dataset.find_product("Old Milk").map(|p| p.days_to_expiry), Some(0));
        assert_eq!(
            dataset.find_product("Mystery").map(|p| p.days_to_expiry),
            Some(DEFAULT_DAYS_TO_EXPIRY)
        );
        assert_eq!(dataset.find_product("Ghee").map(|p| p.days_to_expiry), Some(120));
    }

    #[test]
    fn zero_stock_rows_have_zero_turnover() {
        let mut empty = record("Sold Out");
        empty.stock_quantity = 0;

        let dataset = Dataset::ingest(vec![empty], &options(), &ReferenceTables::default())
            .expect("ingest");

        assert_eq!(dataset.find_product("Sold Out").map(|p| p.turnover_rate), Some(0.0));
    }

    #[test]
    fn json_rows_accept_decorated_and_missing_numbers() {
        let records: Vec<RawProductRecord> = serde_json::from_str(
            r#"[
                {"Product_Name": "Salmon", "Category": "Seafood", "Unit_Price": "$1,018.50",
                 "Stock_Quantity": "32", "Sales_Volume": 12.9, "Inventory_Turnover_Rate": null,
                 "Days_to_Expiry": 2, "State": ""},
                {"Product_Name": "Rice", "Unit_Price": "n/a"}
            ]"#,
        )
        .expect("parse rows");

        assert_eq!(records[0].category, "Seafood");
        assert_eq!(records[0].unit_price, 1018.5);
        assert_eq!(records[0].stock_quantity, 32);
        assert_eq!(records[0].sales_volume, 12);
        assert_eq!(records[0].inventory_turnover_rate, 0.0);
        assert_eq!(records[0].days_to_expiry, Some(2));
        assert_eq!(records[0].state, None);
        assert_eq!(records[1].unit_price, 0.0);
        assert_eq!(records[1].expiration_date, None);
    }

    #[test]
    fn negative_turnover_rates_are_floored_at_zero() {
        let mut negative = record("Kefir");
        negative.inventory_turnover_rate = -50.0;

        let dataset = Dataset::ingest(vec![negative], &options(), &ReferenceTables::default())
            .expect("ingest");

        let product = dataset.find_product("Kefir").expect("product");
        assert_eq!(product.inventory_turnover_rate, 0.0);
    }

    #[test]
    fn expiration_formats() {
        assert_eq!(parse_expiration("2024-06-05"), NaiveDate::from_ymd_opt(2024, 6, 5));
        assert_eq!(parse_expiration(" 6/5/2024 "), NaiveDate::from_ymd_opt(2024, 6, 5));
        assert_eq!(parse_expiration("5 June"), None);
    }

    #[test]
    fn required_columns_accept_either_spelling() {
        let dashboard = [
            "Product_Name",
            "Catagory",
            "Unit_Price",
            "Stock_Quantity",
            "Sales_Volume",
            "Expiration_Date",
            "Supplier_Name",
            "Inventory_Turnover_Rate",
        ];
        assert_eq!(check_required_columns(dashboard), Ok(()));

        let relabeled = dashboard.map(|column| match column {
            "Catagory" => "Category",
            "Expiration_Date" => " Days_to_Expiry ",
            other => other,
        });
        assert_eq!(check_required_columns(relabeled), Ok(()));
    }

    #[test]
    fn missing_columns_are_all_named() {
        assert_eq!(
            check_required_columns(["Product_Name", "Stock_Quantity"]),
            Err(DatasetError::MissingColumns(vec![
                "Catagory".to_string(),
                "Unit_Price".to_string(),
                "Sales_Volume".to_string(),
                "Expiration_Date".to_string(),
                "Supplier_Name".to_string(),
                "Inventory_Turnover_Rate".to_string(),
            ]))
        );
    }
}
