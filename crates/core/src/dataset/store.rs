use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Dataset, DatasetSource, ProductCatalog};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetStatus {
    pub has_data: bool,
    pub product_count: usize,
    /// Milliseconds since the dataset was loaded; zero when nothing is loaded.
    pub data_age_ms: i64,
}

/// Holds the active dataset for a hosting process. Readers get an `Arc`
/// snapshot, so a replace never disturbs a recommendation already in flight.
/// Lookups go through `DatasetSource::current`, one snapshot per operation.
#[derive(Debug, Default)]
pub struct InMemoryDatasetStore {
    active: RwLock<Option<Arc<Dataset>>>,
}

impl InMemoryDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(dataset: Dataset) -> Self {
        let store = Self::new();
        store.replace(dataset);
        store
    }

    pub fn replace(&self, dataset: Dataset) {
        let product_count = dataset.len();
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        *active = Some(Arc::new(dataset));
        info!(event_name = "dataset.store.replaced", product_count, "active dataset replaced");
    }

    pub fn clear(&self) {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        *active = None;
        info!(event_name = "dataset.store.cleared", "active dataset cleared");
    }

    pub fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.active.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn status(&self) -> DatasetStatus {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> DatasetStatus {
        match self.snapshot() {
            Some(dataset) => DatasetStatus {
                has_data: dataset.has_data(),
                product_count: dataset.len(),
                data_age_ms: (now - dataset.loaded_at()).num_milliseconds().max(0),
            },
            None => DatasetStatus { has_data: false, product_count: 0, data_age_ms: 0 },
        }
    }
}

impl DatasetSource for InMemoryDatasetStore {
    fn current(&self) -> Option<Arc<Dataset>> {
        self.snapshot()
    }
}
