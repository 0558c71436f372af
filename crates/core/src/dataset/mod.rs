pub mod demo;
pub mod ingest;
pub mod store;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::product::Product;
use crate::errors::DatasetError;
use crate::pricing::action_table::ActionTable;

pub use ingest::{check_required_columns, IngestOptions, RawProductRecord, REQUIRED_COLUMNS};
pub use store::{DatasetStatus, InMemoryDatasetStore};

/// Catalog lookups. Every answer must come from the same immutable view, so
/// one recommendation never mixes rows from two datasets.
pub trait ProductCatalog: Send + Sync {
    fn has_data(&self) -> bool;
    fn find_product(&self, name: &str) -> Option<Product>;
    fn product_names(&self) -> Vec<String>;
    fn products(&self) -> Vec<Product>;
}

pub trait ActionTableSource: Send + Sync {
    /// The stored table, or the default synthetic table when none was provided.
    fn action_table(&self) -> ActionTable;
}

/// Hands out the active dataset. Callers take one snapshot per operation and
/// read everything from it.
pub trait DatasetSource: Send + Sync {
    fn current(&self) -> Option<Arc<Dataset>>;
}

/// Immutable snapshot of one loaded product dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    action_table: Option<ActionTable>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    pub fn new(products: Vec<Product>, action_table: Option<ActionTable>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            index.entry(product.name.clone()).or_insert(position);
        }
        Self { products, index, action_table, loaded_at: Utc::now() }
    }

    /// Replaces the action table with an uploaded one, validating its shape.
    pub fn with_action_weights(
        mut self,
        weights: Vec<Vec<Vec<f64>>>,
    ) -> Result<Self, DatasetError> {
        self.action_table = Some(ActionTable::from_weights(weights)?);
        Ok(self)
    }

    pub fn with_loaded_at(mut self, loaded_at: DateTime<Utc>) -> Self {
        self.loaded_at = loaded_at;
        self
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Product> {
        self.index.get(name).and_then(|position| self.products.get(*position))
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn stored_action_table(&self) -> Option<&ActionTable> {
        self.action_table.as_ref()
    }
}

impl ProductCatalog for Dataset {
    fn has_data(&self) -> bool {
        !self.is_empty()
    }

    fn find_product(&self, name: &str) -> Option<Product> {
        self.get(name).cloned()
    }

    fn product_names(&self) -> Vec<String> {
        self.products.iter().map(|product| product.name.clone()).collect()
    }

    fn products(&self) -> Vec<Product> {
        self.products.clone()
    }
}

impl ActionTableSource for Dataset {
    fn action_table(&self) -> ActionTable {
        self.action_table.clone().unwrap_or_default()
    }
}
