use super::*;

const LOCALE: &str = "en-IN";
const NOW: i64 = 1_700_000_000_000;

fn number(value: f64) -> String {
    BasicFormatter.number(LOCALE, value)
}

#[test]
fn numbers_use_indian_grouping() {
    assert_eq!(number(0.0), "0");
    assert_eq!(number(999.0), "999");
    assert_eq!(number(1000.0), "1,000");
    assert_eq!(number(100_000.0), "1,00,000");
    assert_eq!(number(1_234_567.0), "12,34,567");
    assert_eq!(number(123_456_789.0), "12,34,56,789");
}

#[test]
fn numbers_keep_up_to_three_decimals() {
    assert_eq!(number(1234.5), "1,234.5");
    assert_eq!(number(0.123_456), "0.123");
    assert_eq!(number(-42.25), "-42.25");
    assert_eq!(number(-0.0001), "0");
}

#[test]
fn non_finite_numbers_render_symbolically() {
    assert_eq!(number(f64::NAN), "NaN");
    assert_eq!(number(f64::INFINITY), "∞");
}

#[test]
fn rupees_have_no_fraction() {
    assert_eq!(BasicFormatter.currency(LOCALE, 150_000.0, "INR"), "₹1,50,000");
    assert_eq!(BasicFormatter.currency(LOCALE, 99.5, "INR"), "₹100");
    assert_eq!(BasicFormatter.currency(LOCALE, -2500.0, "inr"), "-₹2,500");
}

#[test]
fn other_currencies_use_code_prefix() {
    assert_eq!(BasicFormatter.currency(LOCALE, 1200.0, "usd"), "USD 1,200");
}

#[test]
fn dates_spell_out_the_month() {
    // 2023-11-14T22:13:20Z
    assert_eq!(BasicFormatter.date(LOCALE, NOW), "14 November 2023");
    assert_eq!(BasicFormatter.date(LOCALE, 0), "1 January 1970");
}

#[test]
fn relative_time_uses_hours_within_a_day() {
    let rt = |offset: i64| BasicFormatter.relative_time(LOCALE, NOW + offset, NOW);
    assert_eq!(rt(0), "this hour");
    assert_eq!(rt(MS_PER_HOUR), "in 1 hour");
    assert_eq!(rt(3 * MS_PER_HOUR), "in 3 hours");
    assert_eq!(rt(-2 * MS_PER_HOUR), "2 hours ago");
}

#[test]
fn relative_time_uses_days_beyond_half_a_day() {
    let rt = |offset: i64| BasicFormatter.relative_time(LOCALE, NOW + offset, NOW);
    assert_eq!(rt(MS_PER_DAY), "tomorrow");
    assert_eq!(rt(-MS_PER_DAY), "yesterday");
    assert_eq!(rt(3 * MS_PER_DAY), "in 3 days");
    assert_eq!(rt(-10 * MS_PER_DAY), "10 days ago");
}
