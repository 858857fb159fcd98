use serde::{Deserialize, Serialize};

/// Reference data for a ticker as exposed by the provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TickerDetails {
    pub ticker: String,

    /// Company/asset name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Market (e.g., "stocks", "crypto")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,

    /// Primary exchange MIC (e.g., "XNAS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_exchange: Option<String>,

    /// Lowercase currency name (e.g., "usd")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl TickerDetails {
    /// Create details carrying only a name.
    pub fn with_name(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Name with surrounding whitespace removed; blank names count as absent.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_trims() {
        let details = TickerDetails::with_name("AAPL", "  Apple Inc. ");
        assert_eq!(details.display_name(), Some("Apple Inc."));
    }

    #[test]
    fn test_blank_name_is_absent() {
        let details = TickerDetails::with_name("AAPL", "   ");
        assert_eq!(details.display_name(), None);

        let details = TickerDetails {
            ticker: "AAPL".to_string(),
            ..Default::default()
        };
        assert_eq!(details.display_name(), None);
    }

    #[test]
    fn test_serialization_skips_missing_fields() {
        let details = TickerDetails::with_name("MSFT", "Microsoft Corp");
        let json = serde_json::to_string(&details).unwrap();

        assert!(json.contains("Microsoft Corp"));
        assert!(!json.contains("primary_exchange"));
    }
}
