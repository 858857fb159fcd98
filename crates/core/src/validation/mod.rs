//! Input validators for the dashboard's query form.
//!
//! Every validator comes in two flavours:
//! - a typed function returning `Result<_, ValidationError>` used by the
//!   retrieval service, and
//! - a `validate_*` wrapper returning a [`ValidationResult`] the presentation
//!   layer can render directly.
//!
//! Validators are pure and never panic.

pub mod dates;
pub mod ticker;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

pub use dates::{
    default_query_range, parse_date_input, parse_date_range, parse_date_range_at, parse_lookup_range,
    validate_dates, validate_dates_at,
    DateInput, DateRange,
};
pub use ticker::{check_ticker, normalize_ticker, suggest_correction, validate_ticker};

/// Outcome of a validation, shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for ValidationResult {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(_) => ValidationResult::valid(),
            Err(e) => ValidationResult::invalid(e.to_string()),
        }
    }
}
