use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StatsError;

/// Raw token object as returned by the Bithomp token endpoint. Only the
/// fields below are read; everything else is ignored.
pub type TokenResponse = Map<String, Value>;

const TRUSTLINES: &str = "trustlines";
const HOLDERS: &str = "holders";
const SUPPLY: &str = "supply";
const MARKET_CAP: &str = "marketCap";
const PRICE: &str = "price";
const PRICE_IN_XRP: &str = "priceInXrp";

/// Snapshot written to the stats file. Field order is the file's field order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStats {
    pub trustlines: u64,
    pub holders: u64,
    pub supply: f64,
    pub market_cap: f64,
}

impl TokenStats {
    /// Record written when the API could not be reached.
    pub fn zeroed() -> Self {
        Self::default()
    }

    pub fn from_response(raw: &TokenResponse) -> Result<Self, StatsError> {
        Ok(Self {
            trustlines: count_field(raw, TRUSTLINES)?.unwrap_or(0),
            holders: count_field(raw, HOLDERS)?.unwrap_or(0),
            supply: decimal_field(raw, SUPPLY)?.unwrap_or(0.0),
            market_cap: market_cap(raw)?,
        })
    }
}

/// Market cap in priority order: reported value, then price * supply, then
/// XRP price * supply, else zero.
pub fn market_cap(raw: &TokenResponse) -> Result<f64, StatsError> {
    if let Some(value) = raw.get(MARKET_CAP) {
        return to_decimal(MARKET_CAP, value);
    }

    if let (Some(price), Some(supply)) = (raw.get(PRICE), raw.get(SUPPLY)) {
        return product(to_decimal(PRICE, price)?, to_decimal(SUPPLY, supply)?);
    }

    if let (Some(price_xrp), Some(supply)) = (raw.get(PRICE_IN_XRP), raw.get(SUPPLY)) {
        return product(to_decimal(PRICE_IN_XRP, price_xrp)?, to_decimal(SUPPLY, supply)?);
    }

    Ok(0.0)
}

fn product(price: f64, supply: f64) -> Result<f64, StatsError> {
    let cap = price * supply;
    if cap.is_finite() {
        Ok(cap)
    } else {
        Err(StatsError::Unexpected(format!(
            "market cap overflows: {} * {}",
            price, supply
        )))
    }
}

fn decimal_field(raw: &TokenResponse, key: &str) -> Result<Option<f64>, StatsError> {
    raw.get(key).map(|value| to_decimal(key, value)).transpose()
}

fn count_field(raw: &TokenResponse, key: &str) -> Result<Option<u64>, StatsError> {
    raw.get(key).map(|value| to_count(key, value)).transpose()
}

// Bithomp sends amounts both as JSON numbers and as numeric strings.
// NaN, infinities and negatives are rejected.
fn to_decimal(key: &str, value: &Value) -> Result<f64, StatsError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed
        .filter(|f| f.is_finite() && *f >= 0.0)
        .ok_or_else(|| {
            StatsError::Unexpected(format!(
                "field '{}' is not a non-negative number: {}",
                key, value
            ))
        })
}

fn to_count(key: &str, value: &Value) -> Result<u64, StatsError> {
    let parsed = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        StatsError::Unexpected(format!(
            "field '{}' is not a non-negative integer: {}",
            key, value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> TokenResponse {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {}", other),
        }
    }

    #[test]
    fn test_reported_market_cap_wins() {
        let raw = response(json!({
            "marketCap": "12345.5",
            "price": "2",
            "priceInXrp": "3",
            "supply": "100"
        }));
        assert_eq!(market_cap(&raw).unwrap(), 12345.5);

        let raw = response(json!({ "marketCap": 99 }));
        assert_eq!(market_cap(&raw).unwrap(), 99.0);
    }

    #[test]
    fn test_market_cap_from_price_and_supply() {
        let raw = response(json!({ "price": 0.5, "priceInXrp": "7", "supply": "400" }));
        assert_eq!(market_cap(&raw).unwrap(), 200.0);
    }

    #[test]
    fn test_market_cap_from_xrp_price() {
        let raw = response(json!({ "priceInXrp": "0.25", "supply": 1000 }));
        assert_eq!(market_cap(&raw).unwrap(), 250.0);
    }

    #[test]
    fn test_market_cap_defaults_to_zero() {
        assert_eq!(market_cap(&response(json!({}))).unwrap(), 0.0);
        // A price without supply is not enough
        assert_eq!(market_cap(&response(json!({ "price": "1" }))).unwrap(), 0.0);
        assert_eq!(market_cap(&response(json!({ "supply": "10" }))).unwrap(), 0.0);
    }

    #[test]
    fn test_price_without_supply_does_not_fall_through_to_xrp_price() {
        let raw = response(json!({ "price": "1", "priceInXrp": "2" }));
        assert_eq!(market_cap(&raw).unwrap(), 0.0);
    }

    #[test]
    fn test_example_response() {
        let raw = response(json!({
            "trustlines": 150,
            "holders": 42,
            "supply": "1000000",
            "price": "0.002"
        }));
        let stats = TokenStats::from_response(&raw).unwrap();
        assert_eq!(stats.trustlines, 150);
        assert_eq!(stats.holders, 42);
        assert_eq!(stats.supply, 1_000_000.0);
        assert!((stats.market_cap - 2000.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_default_independently() {
        let stats = TokenStats::from_response(&response(json!({ "holders": 7 }))).unwrap();
        assert_eq!(
            stats,
            TokenStats {
                trustlines: 0,
                holders: 7,
                supply: 0.0,
                market_cap: 0.0
            }
        );

        let stats = TokenStats::from_response(&response(json!({ "trustlines": "3" }))).unwrap();
        assert_eq!(stats.trustlines, 3);
        assert_eq!(stats.holders, 0);
    }

    #[test]
    fn test_non_numeric_fields_are_unexpected() {
        let err = TokenStats::from_response(&response(json!({ "supply": "lots" }))).unwrap_err();
        assert!(matches!(err, StatsError::Unexpected(_)));

        let err = market_cap(&response(json!({ "marketCap": null }))).unwrap_err();
        assert!(matches!(err, StatsError::Unexpected(_)));

        let err = TokenStats::from_response(&response(json!({ "holders": -1 }))).unwrap_err();
        assert!(matches!(err, StatsError::Unexpected(_)));
    }

    #[test]
    fn test_non_finite_decimals_are_unexpected() {
        for bad in ["NaN", "inf", "-infinity"] {
            let err = market_cap(&response(json!({ "marketCap": bad }))).unwrap_err();
            assert!(matches!(err, StatsError::Unexpected(_)), "accepted {}", bad);
        }

        let err = TokenStats::from_response(&response(json!({ "supply": "nan" }))).unwrap_err();
        assert!(matches!(err, StatsError::Unexpected(_)));
    }

    #[test]
    fn test_overflowing_market_cap_is_unexpected() {
        let raw = response(json!({ "supply": "1e308", "price": "1e10", "holders": 1 }));
        let err = TokenStats::from_response(&raw).unwrap_err();
        assert!(matches!(err, StatsError::Unexpected(_)));

        let raw = response(json!({ "supply": 1e308, "priceInXrp": 10 }));
        assert!(market_cap(&raw).is_err());
    }

    #[test]
    fn test_negative_decimals_are_unexpected() {
        let raw = response(json!({ "supply": "-5", "price": "2" }));
        let err = TokenStats::from_response(&raw).unwrap_err();
        assert!(matches!(err, StatsError::Unexpected(_)));

        let err = market_cap(&response(json!({ "marketCap": -1.5 }))).unwrap_err();
        assert!(matches!(err, StatsError::Unexpected(_)));
    }

    #[test]
    fn test_serializes_camel_case_in_order() {
        let stats = TokenStats {
            trustlines: 150,
            holders: 42,
            supply: 1_000_000.0,
            market_cap: 2000.0,
        };
        assert_eq!(
            serde_json::to_string(&stats).unwrap(),
            r#"{"trustlines":150,"holders":42,"supply":1000000.0,"marketCap":2000.0}"#
        );
    }

    #[test]
    fn test_zeroed_record() {
        let value = serde_json::to_value(TokenStats::zeroed()).unwrap();
        assert_eq!(
            value,
            json!({ "trustlines": 0, "holders": 0, "supply": 0.0, "marketCap": 0.0 })
        );
    }
}
