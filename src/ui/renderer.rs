// Formatting helpers for table cells and the status line

use {
    crate::record::Filter,
    chrono::{DateTime, Utc},
    rust_decimal::Decimal,
    serde_json::Value,
};

/// Shorten a hash or address to `0x1234…abcd`
pub fn short_hex(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return value.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// Format an amount with at most `dp` decimals and no trailing zeros
pub fn format_amount(amount: Decimal, dp: u32) -> String {
    amount.round_dp(dp).normalize().to_string()
}

pub fn format_fee_eth(fee: Decimal) -> String {
    format!("{} Ξ", format_amount(fee, 8))
}

pub fn format_fee_usdt(fee: Decimal) -> String {
    format!("${}", format_amount(fee, 4))
}

/// Price, liquidity and tick are shown as received
pub fn format_market_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_timestamp(timestamp: i64) -> String {
    if let Some(dt) = DateTime::<Utc>::from_timestamp(timestamp, 0) {
        dt.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        "N/A".to_string()
    }
}

pub fn format_filter(filter: &Filter) -> String {
    let mut parts = Vec::new();
    if let Some(prefix) = filter.hash_prefix() {
        parts.push(format!("hash {}*", prefix));
    }
    match (filter.start_time, filter.end_time) {
        (Some(start), Some(end)) => parts.push(format!(
            "{} → {}",
            format_timestamp(start),
            format_timestamp(end)
        )),
        (Some(start), None) => parts.push(format!("from {}", format_timestamp(start))),
        (None, Some(end)) => parts.push(format!("to {}", format_timestamp(end))),
        (None, None) => {}
    }
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json, std::str::FromStr};

    #[test]
    fn test_short_hex() {
        assert_eq!(short_hex("0xabc"), "0xabc");
        assert_eq!(
            short_hex("0x1234567890abcdef1234567890abcdef"),
            "0x1234…cdef"
        );
    }

    #[test]
    fn test_amount_formatting() {
        let fee = Decimal::from_str("0.001230000").unwrap();
        assert_eq!(format_fee_eth(fee), "0.00123 Ξ");
        assert_eq!(format_fee_usdt(Decimal::from_str("2.345678").unwrap()), "$2.3457");
        assert_eq!(format_amount(Decimal::from_str("1.50").unwrap(), 6), "1.5");
    }

    #[test]
    fn test_market_values() {
        assert_eq!(format_market_value(&Value::Null), "-");
        assert_eq!(format_market_value(&json!("1820.5")), "1820.5");
        assert_eq!(format_market_value(&json!(-887272)), "-887272");
    }

    #[test]
    fn test_filter_summary() {
        assert_eq!(format_filter(&Filter::default()), "none");
        assert_eq!(format_filter(&Filter::by_hash("0xab")), "hash 0xab*");
        assert_eq!(
            format_filter(&Filter::between(0, 60)),
            "1970-01-01 00:00:00 → 1970-01-01 00:01:00"
        );
    }
}
