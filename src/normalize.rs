//! Normalization helpers shared by every provider adapter
//!
//! Upstream APIs report prices as free text, durations as minute counts or
//! ISO-8601 strings and categories as comma-joined tag lists. These helpers
//! fold all of that into the typed fields of the public result models.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Plain attraction search description limit (characters)
pub const SHORT_DESCRIPTION_CHARS: usize = 200;

/// Enriched attraction search description limit (characters)
pub const LONG_DESCRIPTION_CHARS: usize = 300;

static NUMBER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("number token pattern is valid"));

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)D)?T?(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$")
        .expect("duration pattern is valid")
});

/// Extract a price from display text such as `"$1,234.50"` or `"USD 99"`.
///
/// Thousands separators are dropped first, then the first decimal token wins.
#[must_use]
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    NUMBER_TOKEN
        .find(&cleaned)
        .and_then(|token| token.as_str().parse::<f64>().ok())
}

/// Numeric value of a JSON field that may hold a number or price-like text
#[must_use]
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_price_text(text),
        _ => None,
    }
}

/// Same as [`number_from_value`] for optional fields
#[must_use]
pub fn number_from_opt(value: Option<&Value>) -> Option<f64> {
    value.and_then(number_from_value)
}

/// Format a total minute count as `PT{H}H{M}M`
#[must_use]
pub fn iso_duration_from_minutes(total_minutes: u64) -> String {
    format!("PT{}H{}M", total_minutes / 60, total_minutes % 60)
}

/// Parse an ISO-8601 duration (`PT7H5M`, `P1DT2H`) into whole minutes
#[must_use]
pub fn minutes_from_iso_duration(duration: &str) -> Option<u64> {
    let captures = ISO_DURATION.captures(duration.trim())?;
    if captures.iter().skip(1).all(|group| group.is_none()) {
        return None;
    }

    let part = |index: usize| -> u64 {
        captures
            .get(index)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };

    Some(part(1) * 24 * 60 + part(2) * 60 + part(3) + part(4) / 60)
}

/// Truncate to at most `max_chars` characters
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// First token of a comma-separated tag list, `""` when there is none
#[must_use]
pub fn first_tag(tags: &str) -> String {
    tags.split(',').next().unwrap_or_default().trim().to_string()
}

/// Mid-point of a price range; zero unless both ends are known and non-zero
#[must_use]
pub fn average_price(min: f64, max: f64) -> f64 {
    if min > 0.0 && max > 0.0 {
        (min + max) / 2.0
    } else {
        0.0
    }
}

/// Index of the lowest rate; the first one wins ties and missing rates rank last
#[must_use]
pub fn lowest_rate_index(rates: &[Option<f64>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, rate) in rates.iter().enumerate() {
        let value = rate.unwrap_or(f64::INFINITY);
        match best {
            Some((_, current)) if value >= current => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index)
}

/// Empty and whitespace-only strings become `None`
#[must_use]
pub fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("$1,234.50", Some(1234.50))]
    #[case("USD 99", Some(99.0))]
    #[case("from 120 per night", Some(120.0))]
    #[case("1,000,000", Some(1_000_000.0))]
    #[case("free", None)]
    #[case("", None)]
    fn test_parse_price_text(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_price_text(input), expected);
    }

    #[test]
    fn test_number_from_value() {
        assert_eq!(number_from_value(&json!(42.5)), Some(42.5));
        assert_eq!(number_from_value(&json!("€ 87")), Some(87.0));
        assert_eq!(number_from_value(&json!("3h")), Some(3.0));
        assert_eq!(number_from_value(&json!(null)), None);
        assert_eq!(number_from_value(&json!({"amount": 10})), None);
    }

    #[rstest]
    #[case(150, "PT2H30M")]
    #[case(0, "PT0H0M")]
    #[case(59, "PT0H59M")]
    #[case(1440, "PT24H0M")]
    fn test_iso_duration_from_minutes(#[case] minutes: u64, #[case] expected: &str) {
        assert_eq!(iso_duration_from_minutes(minutes), expected);
    }

    #[rstest]
    #[case("PT7H5M", Some(425))]
    #[case("PT45M", Some(45))]
    #[case("PT2H", Some(120))]
    #[case("P1DT1H", Some(1500))]
    #[case("PT", None)]
    #[case("seven hours", None)]
    fn test_minutes_from_iso_duration(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(minutes_from_iso_duration(input), expected);
    }

    #[test]
    fn test_truncate_counts_characters() {
        let text = "é".repeat(250);
        let truncated = truncate_chars(&text, SHORT_DESCRIPTION_CHARS);
        assert_eq!(truncated.chars().count(), 200);

        assert_eq!(truncate_chars("short", SHORT_DESCRIPTION_CHARS), "short");
    }

    #[test]
    fn test_first_tag() {
        assert_eq!(first_tag("museums,cultural,interesting_places"), "museums");
        assert_eq!(first_tag("churches"), "churches");
        assert_eq!(first_tag(""), "");
    }

    #[test]
    fn test_average_price() {
        assert_eq!(average_price(100.0, 200.0), 150.0);
        assert_eq!(average_price(0.0, 200.0), 0.0);
        assert_eq!(average_price(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_lowest_rate_keeps_first_minimum() {
        assert_eq!(lowest_rate_index(&[Some(120.0), Some(95.0), Some(95.0)]), Some(1));
        assert_eq!(lowest_rate_index(&[None, Some(80.0)]), Some(1));
        assert_eq!(lowest_rate_index(&[None, None]), Some(0));
        assert_eq!(lowest_rate_index(&[]), None);
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some(" Paris ".to_string())), Some("Paris".to_string()));
        assert_eq!(non_empty(None), None);
    }
}
