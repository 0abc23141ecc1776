//! Transaction records and search filters
//!
//! `TransactionRecord` is the single shape rendered by every tab: rows from the
//! historical endpoint and events from the realtime channels are both parsed
//! into it through `RawRecord::parse`, which is the only place where wire
//! values are coerced to decimals.

use {
    rust_decimal::Decimal,
    serde::{Deserialize, Serialize},
    serde_json::Value,
    std::str::FromStr,
    thiserror::Error,
};

/// A single swap/transfer with its fees, as rendered in the list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: String,
    pub sender: String,
    pub recipient: String,
    pub amount0: Decimal,
    pub amount1: Decimal,
    #[serde(rename = "feeETH")]
    pub fee_eth: Decimal,
    #[serde(rename = "feeUSDT")]
    pub fee_usdt: Decimal,
    /// Market state fields are passed through as delivered
    pub price: Value,
    pub liquidity: Value,
    pub tick: Value,
}

/// Record as it arrives on the wire, before any coercion
///
/// Amounts and fees may be JSON strings or numbers. Historical rows sometimes
/// name the identifier `txId` instead of `hash`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(default, alias = "txId")]
    pub hash: Option<String>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub amount0: Value,
    #[serde(default)]
    pub amount1: Value,
    #[serde(default, rename = "feeETH")]
    pub fee_eth: Value,
    #[serde(default, rename = "feeUSDT")]
    pub fee_usdt: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub liquidity: Value,
    #[serde(default)]
    pub tick: Value,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("malformed payload: field `{field}` is not a decimal (got {value})")]
    MalformedPayload { field: &'static str, value: String },

    #[error("malformed payload: missing field `{0}`")]
    MissingField(&'static str),

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl RawRecord {
    /// Deserialize and parse a JSON payload in one step
    pub fn from_value(value: Value) -> Result<TransactionRecord, RecordError> {
        let raw: RawRecord = serde_json::from_value(value)?;
        raw.parse()
    }

    /// Coerce the wire fields into a `TransactionRecord`
    ///
    /// Fails instead of producing a placeholder number when any amount or fee
    /// does not parse as a decimal.
    pub fn parse(self) -> Result<TransactionRecord, RecordError> {
        Ok(TransactionRecord {
            hash: required_text("hash", self.hash)?,
            sender: required_text("sender", self.sender)?,
            recipient: required_text("recipient", self.recipient)?,
            amount0: coerce_decimal("amount0", &self.amount0)?,
            amount1: coerce_decimal("amount1", &self.amount1)?,
            fee_eth: coerce_decimal("feeETH", &self.fee_eth)?,
            fee_usdt: coerce_decimal("feeUSDT", &self.fee_usdt)?,
            price: self.price,
            liquidity: self.liquidity,
            tick: self.tick,
        })
    }
}

fn required_text(field: &'static str, value: Option<String>) -> Result<String, RecordError> {
    value.ok_or(RecordError::MissingField(field))
}

/// Coerce a JSON string or number to a decimal
pub fn coerce_decimal(field: &'static str, value: &Value) -> Result<Decimal, RecordError> {
    let parsed = match value {
        Value::String(text) => parse_decimal_text(text.trim()),
        Value::Number(number) => parse_decimal_text(&number.to_string()),
        Value::Null => return Err(RecordError::MissingField(field)),
        _ => None,
    };

    parsed.ok_or_else(|| RecordError::MalformedPayload {
        field,
        value: value.to_string(),
    })
}

fn parse_decimal_text(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Closed time interval in Unix-epoch seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("time interval needs both bounds, only `{0}` is set")]
    HalfOpenInterval(&'static str),

    #[error("time interval start {start} is after end {end}")]
    InvertedInterval { start: i64, end: i64 },
}

/// Restriction applied to the historical query
///
/// The interval bounds are kept separately so a half-filled search form can
/// be represented; such a filter fails `validate` and is never fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub txhash: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

impl Filter {
    pub fn by_hash(prefix: impl Into<String>) -> Self {
        Self {
            txhash: Some(prefix.into()),
            ..Self::default()
        }
    }

    pub fn between(start: i64, end: i64) -> Self {
        Self {
            txhash: None,
            start_time: Some(start),
            end_time: Some(end),
        }
    }

    /// Hash prefix, ignoring blank input
    pub fn hash_prefix(&self) -> Option<&str> {
        self.txhash
            .as_deref()
            .map(str::trim)
            .filter(|prefix| !prefix.is_empty())
    }

    pub fn interval(&self) -> Result<Option<TimeInterval>, FilterError> {
        match (self.start_time, self.end_time) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(FilterError::HalfOpenInterval("start")),
            (None, Some(_)) => Err(FilterError::HalfOpenInterval("end")),
            (Some(start), Some(end)) if start > end => {
                Err(FilterError::InvertedInterval { start, end })
            }
            (Some(start), Some(end)) => Ok(Some(TimeInterval { start, end })),
        }
    }

    pub fn validate(&self) -> Result<(), FilterError> {
        self.interval().map(|_| ())
    }

    /// True when the filter restricts the query (hash set or interval fully set)
    pub fn is_active(&self) -> bool {
        self.hash_prefix().is_some() || matches!(self.interval(), Ok(Some(_)))
    }

    /// Same filter with a trimmed hash, so equal searches compare equal
    pub fn normalized(&self) -> Self {
        Self {
            txhash: self.hash_prefix().map(str::to_string),
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    fn swap_payload() -> Value {
        json!({
            "hash": "0xabc123",
            "sender": "0xsender",
            "recipient": "0xrecipient",
            "amount0": "1.5",
            "amount1": -2500,
            "feeETH": "0.0021",
            "feeUSDT": 5.25,
            "price": "3400.12",
            "liquidity": "1234567890123456789",
            "tick": 201234
        })
    }

    #[test]
    fn test_parse_coerces_text_and_numbers() {
        let record = RawRecord::from_value(swap_payload()).unwrap();

        assert_eq!(record.hash, "0xabc123");
        assert_eq!(record.amount0, Decimal::from_str("1.5").unwrap());
        assert_eq!(record.amount1, Decimal::from(-2500));
        assert_eq!(record.fee_eth, Decimal::from_str("0.0021").unwrap());
        assert_eq!(record.fee_usdt, Decimal::from_str("5.25").unwrap());
        // Market fields are not touched
        assert_eq!(record.price, json!("3400.12"));
        assert_eq!(record.tick, json!(201234));
    }

    #[test]
    fn test_parse_accepts_tx_id_alias() {
        let mut payload = swap_payload();
        let hash = payload.as_object_mut().unwrap().remove("hash").unwrap();
        payload["txId"] = hash;

        let record = RawRecord::from_value(payload).unwrap();
        assert_eq!(record.hash, "0xabc123");
    }

    #[test]
    fn test_parse_rejects_non_numeric_amount() {
        let mut payload = swap_payload();
        payload["amount0"] = json!("not-a-number");

        match RawRecord::from_value(payload) {
            Err(RecordError::MalformedPayload { field, .. }) => assert_eq!(field, "amount0"),
            other => panic!("expected malformed payload, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_missing_fee() {
        let mut payload = swap_payload();
        payload.as_object_mut().unwrap().remove("feeUSDT");

        assert!(matches!(
            RawRecord::from_value(payload),
            Err(RecordError::MissingField("feeUSDT"))
        ));
    }

    #[test]
    fn test_parse_scientific_notation() {
        let value = json!(1.5e-7);
        let decimal = coerce_decimal("feeETH", &value).unwrap();
        assert_eq!(decimal, Decimal::from_str("0.00000015").unwrap());
    }

    #[test]
    fn test_filter_interval_rules() {
        assert_eq!(Filter::default().interval(), Ok(None));
        assert_eq!(
            Filter::between(10, 20).interval(),
            Ok(Some(TimeInterval { start: 10, end: 20 }))
        );

        let half = Filter {
            start_time: Some(10),
            ..Filter::default()
        };
        assert_eq!(half.validate(), Err(FilterError::HalfOpenInterval("start")));
        assert!(!half.is_active());

        assert!(matches!(
            Filter::between(30, 20).validate(),
            Err(FilterError::InvertedInterval { .. })
        ));
    }

    #[test]
    fn test_filter_blank_hash_is_inactive() {
        let filter = Filter::by_hash("   ");
        assert!(!filter.is_active());
        assert_eq!(filter.normalized(), Filter::default());

        let filter = Filter::by_hash(" 0xabc ");
        assert!(filter.is_active());
        assert_eq!(filter.normalized(), Filter::by_hash("0xabc"));
    }
}
