//! Normalization of backend API token payloads
//!
//! The backend serves tokens in several shapes (bare arrays, `{tokens: []}`,
//! `{results: []}`) and with several field spellings. Everything is folded
//! into [`TokenRecord`] here, once, before the pipeline runs.
use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::types::TokenRecord;
use crate::errors::{DataError, ScreenerError, ScreenerResult};
use crate::logger::{self, LogTag};

// ============================================================================
// RAW API RECORD
// ============================================================================

/// Token as served by the backend, before normalization
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiToken {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub token_address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub mint: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default, rename = "createdAt")]
    pub created_at_camel: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub volume_24h: Option<f64>,
    #[serde(default, rename = "volume24h", deserialize_with = "deserialize_lenient_number")]
    pub volume_24h_camel: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub trades_24h: Option<f64>,
    #[serde(default, rename = "trades24h", deserialize_with = "deserialize_lenient_number")]
    pub trades_24h_camel: Option<f64>,
    // Holder fields stay raw: the fallback between them depends on truthiness
    #[serde(default)]
    pub total_accounts: Option<Value>,
    #[serde(default)]
    pub holder_count: Option<Value>,
    #[serde(default)]
    pub holders: Option<Value>,
    #[serde(default, rename = "marketCap", deserialize_with = "deserialize_lenient_number")]
    pub market_cap: Option<f64>,
    #[serde(default, rename = "market_cap", deserialize_with = "deserialize_lenient_number")]
    pub market_cap_snake: Option<f64>,
    #[serde(default, rename = "priceChanges")]
    pub price_changes: Option<Value>,
    #[serde(default, deserialize_with = "deserialize_lenient_number")]
    pub price_change_24h: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl From<ApiToken> for TokenRecord {
    fn from(raw: ApiToken) -> Self {
        let address = raw
            .address
            .or(raw.token_address)
            .or(raw.mint)
            .unwrap_or_default();

        // First truthy holder field wins, then integer parse
        let holders = [&raw.total_accounts, &raw.holder_count, &raw.holders]
            .into_iter()
            .flatten()
            .find(|v| is_truthy(v))
            .and_then(lenient_int)
            .unwrap_or(0.0);

        let created_at = raw
            .created_at
            .as_ref()
            .and_then(parse_timestamp)
            .or_else(|| raw.created_at_camel.as_ref().and_then(parse_timestamp));

        let price_change_24h = raw
            .price_changes
            .as_ref()
            .and_then(|changes| changes.get("24h"))
            .map(|v| lenient_f64(v).unwrap_or(0.0))
            .or(raw.price_change_24h);

        TokenRecord {
            address,
            name: raw.name,
            symbol: raw.symbol,
            created_at,
            volume_24h: raw.volume_24h.or(raw.volume_24h_camel).unwrap_or(0.0),
            trades_24h: raw.trades_24h.or(raw.trades_24h_camel).unwrap_or(0.0),
            holders,
            market_cap: raw.market_cap.or(raw.market_cap_snake),
            price_change_24h,
            category: raw.category,
            extra: raw.extra,
        }
    }
}

// ============================================================================
// COERCION HELPERS
// ============================================================================

/// Parse the longest numeric prefix of a string, the way `parseFloat` does
///
/// Leading whitespace is skipped; `"12.5k"` yields 12.5, `"abc"` yields None.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let sign = if s.starts_with('-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    s[..end].trim_end_matches('.').parse::<f64>().ok().or_else(|| s[..end].parse().ok())
}

/// Coerce a JSON value to a number; NaN and non-numeric values are None
pub fn lenient_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float_prefix(s),
        _ => None,
    };
    parsed.filter(|v| !v.is_nan())
}

/// JavaScript truthiness of a JSON value
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce a JSON value to a whole number, the way `parseInt` does
///
/// Strings keep only their leading integer digits, so `"12.7"` and `"1e3"`
/// yield 12 and 1.
fn lenient_int(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(f64::trunc),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn parse_int_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    let value: f64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Interpret a JSON timestamp
///
/// Accepts RFC 3339 strings, `YYYY-MM-DD HH:MM:SS` (UTC), date-only
/// strings, and epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    if let Ok(millis) = s.parse::<i64>() {
        return Utc.timestamp_millis_opt(millis).single();
    }
    None
}

fn deserialize_lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(lenient_f64))
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ============================================================================
// PAYLOAD PARSING
// ============================================================================

/// Extract the token list from any of the accepted envelopes
fn extract_token_array(payload: Value) -> ScreenerResult<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ["tokens", "results"] {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return Ok(items);
                }
            }
            Err(ScreenerError::invalid_format(
                "array or object with `tokens`/`results` array",
                "object without a token list",
            ))
        }
        other => Err(ScreenerError::invalid_format(
            "array or object with `tokens`/`results` array",
            json_type_name(&other),
        )),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize an already-parsed JSON payload into canonical records
///
/// Entries that are not JSON objects are skipped with a warning.
pub fn normalize_tokens(payload: Value) -> ScreenerResult<Vec<TokenRecord>> {
    let items = extract_token_array(payload)?;
    let total = items.len();
    let mut tokens = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            logger::warning(
                LogTag::Tokens,
                &format!("Skipping entry {}: expected object, got {}", index, json_type_name(&item)),
            );
            continue;
        }
        match serde_json::from_value::<ApiToken>(item) {
            Ok(raw) => tokens.push(TokenRecord::from(raw)),
            Err(e) => logger::warning(
                LogTag::Tokens,
                &format!("Skipping entry {}: {}", index, e),
            ),
        }
    }

    logger::debug(
        LogTag::Tokens,
        &format!("Normalized {} of {} token entries", tokens.len(), total),
    );

    Ok(tokens)
}

/// Parse a JSON document into canonical records
pub fn parse_tokens_json(json: &str) -> ScreenerResult<Vec<TokenRecord>> {
    let payload: Value = serde_json::from_str(json)?;
    normalize_tokens(payload)
}

/// Read and parse a JSON token dump from disk
pub fn load_tokens_from_path(path: impl AsRef<Path>) -> ScreenerResult<Vec<TokenRecord>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        ScreenerError::Data(DataError::FileUnreadable {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    })?;

    let tokens = parse_tokens_json(&contents)?;
    logger::info(
        LogTag::Tokens,
        &format!("Loaded {} tokens from {}", tokens.len(), path.display()),
    );
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_float_prefix_matches_lenient_semantics() {
        assert_eq!(parse_float_prefix("500"), Some(500.0));
        assert_eq!(parse_float_prefix("  12.5k"), Some(12.5));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
        assert_eq!(parse_float_prefix("7e"), Some(7.0));
        assert_eq!(parse_float_prefix("-3.25"), Some(-3.25));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
    }

    #[test]
    fn test_holder_field_fallback_order() {
        let tokens = normalize_tokens(json!([
            {"address": "a", "total_accounts": "250", "holder_count": 10, "holders": 5},
            {"address": "b", "holder_count": "40", "holders": 5},
            {"address": "c", "holders": 7},
            {"address": "d", "total_accounts": 0, "holders": 9},
            {"address": "e"},
            {"address": "f", "total_accounts": "0", "holders": 9},
            {"address": "g", "holder_count": "12.7"},
            {"address": "h", "total_accounts": "", "holder_count": null, "holders": 3.9}
        ]))
        .unwrap();

        let holders: Vec<f64> = tokens.iter().map(|t| t.holders).collect();
        assert_eq!(holders, vec![250.0, 40.0, 7.0, 9.0, 0.0, 0.0, 12.0, 3.0]);
    }

    #[test]
    fn test_both_field_spellings_keep_the_record() {
        let tokens = parse_tokens_json(
            r#"[{"address": "a", "created_at": "2024-01-01", "createdAt": "2023-06-01"},
                {"address": "b", "volume_24h": "5", "volume24h": 7, "trades_24h": 2, "trades24h": "3"},
                {"address": "c", "marketCap": 100, "market_cap": "200"},
                {"address": "d", "createdAt": "2024-02-01", "volume24h": 7, "trades24h": "3", "market_cap": "200"}]"#,
        )
        .unwrap();

        let addresses: Vec<&str> = tokens.iter().map(|t| t.address.as_str()).collect();
        assert_eq!(addresses, vec!["a", "b", "c", "d"]);

        assert_eq!(tokens[0].created_at, parse_timestamp(&json!("2024-01-01")));
        assert_eq!(tokens[1].volume_24h, 5.0);
        assert_eq!(tokens[1].trades_24h, 2.0);
        assert_eq!(tokens[2].market_cap, Some(100.0));

        assert_eq!(tokens[3].created_at, parse_timestamp(&json!("2024-02-01")));
        assert_eq!(tokens[3].volume_24h, 7.0);
        assert_eq!(tokens[3].trades_24h, 3.0);
        assert_eq!(tokens[3].market_cap, Some(200.0));
    }

    #[test]
    fn test_numeric_strings_and_garbage_coerce() {
        let tokens = parse_tokens_json(
            r#"[{"token_address": "x", "name": "Foo", "symbol": "FOO",
                 "volume_24h": "1234.5", "trades_24h": "n/a", "marketCap": "99000"}]"#,
        )
        .unwrap();

        let token = &tokens[0];
        assert_eq!(token.address, "x");
        assert_eq!(token.volume_24h, 1234.5);
        assert_eq!(token.trades_24h, 0.0);
        assert_eq!(token.market_cap, Some(99_000.0));
    }

    #[test]
    fn test_envelopes() {
        let from_tokens = parse_tokens_json(r#"{"tokens": [{"address": "a"}], "total": 1}"#).unwrap();
        let from_results = parse_tokens_json(r#"{"results": [{"address": "b"}], "count": 1}"#).unwrap();
        assert_eq!(from_tokens[0].address, "a");
        assert_eq!(from_results[0].address, "b");

        assert!(parse_tokens_json(r#"{"error": "Failed"}"#).is_err());
        assert!(parse_tokens_json("42").is_err());
        assert!(parse_tokens_json("not json").is_err());
    }

    #[test]
    fn test_non_object_entries_are_skipped() {
        let tokens = normalize_tokens(json!([{"address": "a"}, 3, "x", null])).unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_timestamp_formats() {
        let rfc = parse_timestamp(&json!("2024-03-01T12:00:00Z")).unwrap();
        let spaced = parse_timestamp(&json!("2024-03-01 12:00:00")).unwrap();
        let millis = parse_timestamp(&json!(1_709_294_400_000i64)).unwrap();
        assert_eq!(rfc, spaced);
        assert_eq!(rfc, millis);

        let date_only = parse_timestamp(&json!("2024-03-01")).unwrap();
        assert_eq!(date_only.timestamp(), 1_709_251_200);

        assert_eq!(parse_timestamp(&json!("yesterday")), None);
        assert_eq!(parse_timestamp(&json!(null)), None);
    }

    #[test]
    fn test_price_changes_and_passthrough() {
        let tokens = normalize_tokens(json!([
            {"address": "a", "priceChanges": {"24h": "-12.5"}, "image": "i.png"},
            {"address": "b", "price_change_24h": 3},
            {"address": "c", "priceChanges": {"1h": 2}}
        ]))
        .unwrap();

        assert_eq!(tokens[0].price_change_24h, Some(-12.5));
        assert_eq!(tokens[0].extra.get("image"), Some(&json!("i.png")));
        assert_eq!(tokens[1].price_change_24h, Some(3.0));
        assert_eq!(tokens[2].price_change_24h, None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_tokens_from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ScreenerError::Data(DataError::FileUnreadable { .. })));
    }
}
