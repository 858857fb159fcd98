use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One daily aggregate, field for field as the provider sent it.
///
/// Every field is optional at the wire level: the cache decides what is
/// required when it ingests the bar. `t` is kept as a raw JSON number because
/// providers are not consistent about sending integers for epoch timestamps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    /// Start of the aggregate window, epoch milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<Number>,

    /// Open price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o: Option<f64>,

    /// High price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,

    /// Low price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub l: Option<f64>,

    /// Close price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,

    /// Volume (Polygon reports it as a float)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<f64>,

    /// Volume weighted average price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vw: Option<f64>,
}

impl RawBar {
    /// Create a complete aggregate.
    pub fn ohlcv(
        timestamp_ms: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        vwap: Option<f64>,
    ) -> Self {
        Self {
            t: Some(Number::from(timestamp_ms)),
            o: Some(open),
            h: Some(high),
            l: Some(low),
            c: Some(close),
            v: Some(volume),
            vw: vwap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_polygon_aggregate() {
        let json = r#"{"v":6.4e7,"vw":185.9,"o":187.15,"c":185.64,"h":188.44,"l":183.885,"t":1704171600000,"n":1008871}"#;
        let bar: RawBar = serde_json::from_str(json).unwrap();

        assert_eq!(bar.t.as_ref().and_then(|t| t.as_i64()), Some(1704171600000));
        assert_eq!(bar.o, Some(187.15));
        assert_eq!(bar.c, Some(185.64));
        assert_eq!(bar.v, Some(64_000_000.0));
        assert_eq!(bar.vw, Some(185.9));
    }

    #[test]
    fn test_missing_fields_stay_none() {
        let bar: RawBar = serde_json::from_str(r#"{"t":1704171600000,"c":185.64}"#).unwrap();

        assert!(bar.o.is_none());
        assert!(bar.v.is_none());
        assert!(bar.vw.is_none());
    }

    #[test]
    fn test_float_timestamp_is_preserved() {
        let bar: RawBar = serde_json::from_str(r#"{"t":1704171600000.5}"#).unwrap();
        let t = bar.t.unwrap();

        assert!(t.as_i64().is_none());
        assert_eq!(t.as_f64(), Some(1704171600000.5));
    }
}
