//! Price fragment extraction and normalization.
//!
//! Fragments look like `R$ 35,90` or `R$ 1.234,56` (Brazilian formatting:
//! `.` groups thousands, `,` separates decimals). Normalization strips
//! everything but digits and the decimal comma, then converts the comma to
//! a decimal point.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static PRICE_FRAGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"R\$\s*[0-9][0-9.,]*").expect("price fragment pattern is valid"));

/// Extract every currency-prefixed price fragment from an HTML document.
///
/// Returns raw fragment text; parsing is a separate step so malformed
/// fragments can be skipped individually.
pub fn extract_price_fragments(html: &str) -> Vec<String> {
    PRICE_FRAGMENT
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parse one fragment into a price value.
///
/// Returns `None` for fragments that do not survive normalization (for
/// example a stray thousands separator producing two commas).
pub fn parse_price_fragment(fragment: &str) -> Option<f64> {
    let normalized: String = fragment
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();
    if normalized.is_empty() {
        return None;
    }
    let value: f64 = normalized.replace(',', ".").parse().ok()?;
    (value >= 0.0).then_some(value)
}

/// Arithmetic mean of the valid prices, rounded to 2 fraction digits.
/// `None` for an empty list - never zero.
pub fn representative_price(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some(round2(mean))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_all_fragments() {
        let html = r#"<div><span>R$ 10,00</span><p>frete</p><span>R$ 20,50</span></div>"#;
        let fragments = extract_price_fragments(html);
        assert_eq!(fragments, vec!["R$ 10,00", "R$ 20,50"]);
    }

    #[test]
    fn test_no_fragments_in_priceless_document() {
        assert!(extract_price_fragments("<html><body>sem resultados</body></html>").is_empty());
    }

    #[test]
    fn test_parse_decimal_comma() {
        assert_eq!(parse_price_fragment("R$ 10,00"), Some(10.0));
        assert_eq!(parse_price_fragment("R$20,50"), Some(20.5));
    }

    #[test]
    fn test_parse_thousands_separator() {
        assert_eq!(parse_price_fragment("R$ 1.234,56"), Some(1234.56));
    }

    #[test]
    fn test_parse_malformed_fragment_is_skipped() {
        // Two decimal commas survive normalization and fail the parse.
        assert_eq!(parse_price_fragment("R$ 1,2,3"), None);
        assert_eq!(parse_price_fragment("R$"), None);
    }

    #[test]
    fn test_mean_rounded_to_two_digits() {
        assert_eq!(representative_price(&[10.0, 20.5]), Some(15.25));
        assert_eq!(representative_price(&[10.0, 10.0, 10.01]), Some(10.0));
    }

    #[test]
    fn test_empty_list_has_no_representative_price() {
        assert_eq!(representative_price(&[]), None);
    }

    #[test]
    fn test_extraction_count_matches_wellformed_fragments() {
        let html = "R$ 5,00 R$ 7,50 R$ 9,99";
        let prices: Vec<f64> = extract_price_fragments(html)
            .iter()
            .filter_map(|f| parse_price_fragment(f))
            .collect();
        assert_eq!(prices.len(), 3);
        assert_eq!(representative_price(&prices), Some(7.5));
    }
}
