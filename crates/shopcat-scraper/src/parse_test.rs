use serde_json::json;

use super::*;

// -----------------------------------------------------------------------
// parse_price
// -----------------------------------------------------------------------

#[test]
fn parse_price_accepts_decimal_strings() {
    assert_eq!(parse_price(Some(&json!("30.00"))), Some(30.0));
    assert_eq!(parse_price(Some(&json!("  12.5 "))), Some(12.5));
}

#[test]
fn parse_price_accepts_json_numbers() {
    assert_eq!(parse_price(Some(&json!(19))), Some(19.0));
    assert_eq!(parse_price(Some(&json!(4.75))), Some(4.75));
}

#[test]
fn parse_price_zero_is_a_price() {
    assert_eq!(parse_price(Some(&json!("0.00"))), Some(0.0));
}

#[test]
fn parse_price_rejects_garbage() {
    assert_eq!(parse_price(None), None);
    assert_eq!(parse_price(Some(&json!(null))), None);
    assert_eq!(parse_price(Some(&json!(""))), None);
    assert_eq!(parse_price(Some(&json!("   "))), None);
    assert_eq!(parse_price(Some(&json!("abc"))), None);
    assert_eq!(parse_price(Some(&json!("NaN"))), None);
    assert_eq!(parse_price(Some(&json!("inf"))), None);
    assert_eq!(parse_price(Some(&json!("-5.00"))), None);
    assert_eq!(parse_price(Some(&json!(-1))), None);
    assert_eq!(parse_price(Some(&json!(["1.00"]))), None);
    assert_eq!(parse_price(Some(&json!({"amount": "1.00"}))), None);
}

// -----------------------------------------------------------------------
// discount_percentage
// -----------------------------------------------------------------------

#[test]
fn discount_is_rounded_to_two_decimals() {
    assert!((discount_percentage(Some(80.0), Some(100.0)) - 20.0).abs() < f64::EPSILON);
    assert!((discount_percentage(Some(12.5), Some(15.0)) - 16.67).abs() < f64::EPSILON);
}

#[test]
fn discount_is_zero_without_markdown() {
    assert!(discount_percentage(Some(100.0), Some(80.0)).abs() < f64::EPSILON);
    assert!(discount_percentage(Some(100.0), Some(100.0)).abs() < f64::EPSILON);
    assert!(discount_percentage(None, Some(100.0)).abs() < f64::EPSILON);
    assert!(discount_percentage(Some(10.0), None).abs() < f64::EPSILON);
}

#[test]
fn free_item_with_compare_price_is_fully_discounted() {
    assert!((discount_percentage(Some(0.0), Some(50.0)) - 100.0).abs() < f64::EPSILON);
}

// -----------------------------------------------------------------------
// weight
// -----------------------------------------------------------------------

#[test]
fn format_weight_appends_unit() {
    assert_eq!(
        format_weight(Some(&json!(0.25)), Some("kg")).as_deref(),
        Some("0.25kg")
    );
    assert_eq!(
        format_weight(Some(&json!(500)), Some("g")).as_deref(),
        Some("500g")
    );
}

#[test]
fn format_weight_defaults_unit_to_kg() {
    assert_eq!(format_weight(Some(&json!(2)), None).as_deref(), Some("2kg"));
}

#[test]
fn format_weight_missing_or_zero_is_none() {
    assert_eq!(format_weight(None, Some("kg")), None);
    assert_eq!(format_weight(Some(&json!(0)), Some("kg")), None);
    assert_eq!(format_weight(Some(&json!(0.0)), Some("kg")), None);
    assert_eq!(format_weight(Some(&json!("")), Some("kg")), None);
    assert_eq!(format_weight(Some(&json!(null)), Some("kg")), None);
}

#[test]
fn parse_weight_reads_numbers_and_numeric_text() {
    assert_eq!(parse_weight(Some(&json!(1.5))), Some(1.5));
    assert_eq!(parse_weight(Some(&json!("0.3"))), Some(0.3));
    assert_eq!(parse_weight(Some(&json!("heavy"))), None);
}

// -----------------------------------------------------------------------
// truncate_chars
// -----------------------------------------------------------------------

#[test]
fn truncate_chars_counts_characters_not_bytes() {
    let text = "चाय".repeat(100);
    let cut = truncate_chars(&text, 200);
    assert_eq!(cut.chars().count(), 200);
    assert!(text.starts_with(&cut));
}

#[test]
fn truncate_chars_leaves_short_text_alone() {
    assert_eq!(truncate_chars("short", 160), "short");
    assert_eq!(truncate_chars("", 160), "");
}

#[test]
fn scalar_text_skips_containers() {
    assert_eq!(scalar_text(&json!("a")).as_deref(), Some("a"));
    assert_eq!(scalar_text(&json!(3)).as_deref(), Some("3"));
    assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
    assert_eq!(scalar_text(&json!(null)), None);
    assert_eq!(scalar_text(&json!([1])), None);
}
