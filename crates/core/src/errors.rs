use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid action table: {0}")]
    InvalidActionTable(String),
    #[error("unknown region `{0}` (expected north|south|east|west|central)")]
    UnknownRegion(String),
    #[error("unknown season `{0}` (expected winter|summer|monsoon|festival|regular)")]
    UnknownSeason(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("product `{product}` not found in active dataset (available: {})", preview(.available))]
    NotFound { product: String, available: Vec<String> },
    #[error("no product dataset is loaded; load a dataset or fall back to the demo catalog")]
    NoDataAvailable,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("no valid products found in dataset")]
    NoValidProducts,
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Recommendation(#[from] RecommendationError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("no data available: {message}")]
    NoData { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

const PREVIEW_LIMIT: usize = 5;

fn preview(names: &[String]) -> String {
    if names.is_empty() {
        return "none".to_string();
    }
    let mut shown = names.iter().take(PREVIEW_LIMIT).cloned().collect::<Vec<_>>().join(", ");
    if names.len() > PREVIEW_LIMIT {
        shown.push_str(&format!(", ... {} more", names.len() - PREVIEW_LIMIT));
    }
    shown
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::NotFound { .. } => "The requested product is not part of the active dataset.",
            Self::NoData { .. } => {
                "No product data is loaded. Load a dataset or switch to the demo catalog."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn error_class(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad_request",
            Self::NotFound { .. } => "product_not_found",
            Self::NoData { .. } => "no_data_available",
            Self::Internal { .. } => "internal",
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::NoData { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let message = value.to_string();
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(_) | ApplicationError::Dataset(_) => {
                Self::BadRequest { message, correlation_id }
            }
            ApplicationError::Recommendation(RecommendationError::NotFound { .. }) => {
                Self::NotFound { message, correlation_id }
            }
            ApplicationError::Recommendation(RecommendationError::NoDataAvailable) => {
                Self::NoData { message, correlation_id }
            }
            ApplicationError::Configuration(_) => Self::Internal { message, correlation_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{
        ApplicationError, DatasetError, DomainError, InterfaceError, RecommendationError,
    };

    #[test]
    fn not_found_maps_to_not_found_interface_error() {
        let interface = ApplicationError::from(RecommendationError::NotFound {
            product: "Kiwi".to_owned(),
            available: vec!["Strawberries".to_owned()],
        })
        .into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::NotFound {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(interface.error_class(), "product_not_found");
    }

    #[test]
    fn no_data_is_distinct_from_not_found() {
        let interface =
            ApplicationError::from(RecommendationError::NoDataAvailable).into_interface("req-2");

        assert!(matches!(interface, InterfaceError::NoData { .. }));
        assert_eq!(
            interface.user_message(),
            "No product data is loaded. Load a dataset or switch to the demo catalog."
        );
    }

    #[test]
    fn not_found_message_previews_first_five_products() {
        let available = (1..=8).map(|index| format!("P{index}")).collect::<Vec<_>>();
        let error = RecommendationError::NotFound { product: "Kiwi".to_owned(), available };

        assert_eq!(
            error.to_string(),
            "product `Kiwi` not found in active dataset (available: P1, P2, P3, P4, P5, ... 3 more)"
        );
    }

    #[test]
    fn dataset_errors_map_to_bad_request() {
        let interface = ApplicationError::from(DatasetError::from(
            DomainError::InvalidActionTable("expected 7 rows".to_owned()),
        ))
        .into_interface("req-3");

        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
        assert_eq!(
            interface.user_message(),
            "The request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn missing_columns_are_listed_in_order() {
        let error = DatasetError::MissingColumns(vec![
            "Unit_Price".to_owned(),
            "Supplier_Name".to_owned(),
        ]);

        assert_eq!(error.to_string(), "missing required columns: Unit_Price, Supplier_Name");
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface = ApplicationError::Configuration("reference table unreadable".to_owned())
            .into_interface("req-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }
}
