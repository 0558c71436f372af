pub mod config;
pub mod dataset;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod reference;
pub mod report;

pub use config::{AppConfig, ConfigError, LoadOptions, LogFormat};
pub use dataset::{
    ActionTableSource, Dataset, DatasetSource, DatasetStatus, InMemoryDatasetStore,
    IngestOptions, ProductCatalog, RawProductRecord,
};
pub use domain::product::{Product, Region, Season};
pub use domain::recommendation::PricingRecommendation;
pub use errors::{
    ApplicationError, DatasetError, DomainError, InterfaceError, RecommendationError,
};
pub use pricing::action_table::ActionTable;
pub use pricing::projection::DayOffset;
pub use pricing::{
    DeterministicPricingEngine, PricingDefaults, PricingEngine, RecommendationInput,
    RecommendationService,
};
pub use reference::ReferenceTables;
pub use report::{DatasetSummary, PricingReport, ReportRow};
