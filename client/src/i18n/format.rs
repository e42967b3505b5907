//! Locale-aware formatting.
//!
//! DESIGN
//! ======
//! `LocaleFormatter` is infallible. `BasicFormatter` is a pure-Rust rendition
//! of Indian English conventions; in the browser `IntlFormatter` defers to
//! `Intl.*` and drops back to `BasicFormatter` if the platform call throws.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use time::OffsetDateTime;

use crate::util::clock::{MS_PER_DAY, MS_PER_HOUR, div_round};

pub const DEFAULT_CURRENCY: &str = "INR";

pub trait LocaleFormatter {
    fn number(&self, locale: &str, value: f64) -> String;
    /// Whole units only.
    fn currency(&self, locale: &str, amount: f64, currency: &str) -> String;
    /// Calendar date of a Unix-epoch millisecond timestamp.
    fn date(&self, locale: &str, timestamp_ms: i64) -> String;
    /// `timestamp_ms` relative to `now_ms`, in hours under a day and days otherwise.
    fn relative_time(&self, locale: &str, timestamp_ms: i64, now_ms: i64) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BasicFormatter;

/// Lakh/crore grouping: the last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_owned();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut pairs = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (front, pair) = rest.split_at(rest.len() - 2);
        pairs.push(pair);
        rest = front;
    }
    let mut out = rest.to_owned();
    for pair in pairs.iter().rev() {
        out.push(',');
        out.push_str(pair);
    }
    out.push(',');
    out.push_str(tail);
    out
}

fn non_finite(value: f64) -> Option<String> {
    if value.is_nan() {
        Some("NaN".to_owned())
    } else if value.is_infinite() {
        Some(if value > 0.0 { "∞" } else { "-∞" }.to_owned())
    } else {
        None
    }
}

fn format_decimal(value: f64, max_fraction_digits: usize) -> String {
    if let Some(special) = non_finite(value) {
        return special;
    }
    let fixed = format!("{:.*}", max_fraction_digits, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let mut out = group_indian(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    if value.is_sign_negative() && out.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.insert(0, '-');
    }
    out
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 { format!("1 {unit}") } else { format!("{count} {unit}s") }
}

impl LocaleFormatter for BasicFormatter {
    fn number(&self, _locale: &str, value: f64) -> String {
        format_decimal(value, 3)
    }

    fn currency(&self, _locale: &str, amount: f64, currency: &str) -> String {
        let rendered = format_decimal(amount.round(), 0);
        let (sign, digits) = match rendered.strip_prefix('-') {
            Some(digits) => ("-", digits),
            None => ("", rendered.as_str()),
        };
        if currency.eq_ignore_ascii_case(DEFAULT_CURRENCY) {
            format!("{sign}₹{digits}")
        } else {
            format!("{sign}{} {digits}", currency.to_ascii_uppercase())
        }
    }

    fn date(&self, _locale: &str, timestamp_ms: i64) -> String {
        let nanos = i128::from(timestamp_ms) * 1_000_000;
        match OffsetDateTime::from_unix_timestamp_nanos(nanos) {
            Ok(at) => format!("{} {} {}", at.day(), at.month(), at.year()),
            Err(_) => timestamp_ms.to_string(),
        }
    }

    fn relative_time(&self, _locale: &str, timestamp_ms: i64, now_ms: i64) -> String {
        let diff = timestamp_ms.saturating_sub(now_ms);
        let days = div_round(diff, MS_PER_DAY);
        if days == 0 {
            let hours = div_round(diff, MS_PER_HOUR);
            return match hours {
                0 => "this hour".to_owned(),
                h if h > 0 => format!("in {}", plural(h, "hour")),
                h => format!("{} ago", plural(-h, "hour")),
            };
        }
        match days {
            1 => "tomorrow".to_owned(),
            -1 => "yesterday".to_owned(),
            d if d > 0 => format!("in {}", plural(d, "day")),
            d => format!("{} ago", plural(-d, "day")),
        }
    }
}

/// Browser `Intl` formatting, reached through `Reflect` so a throwing
/// constructor or unknown locale surfaces as `None` instead of a trap.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct IntlFormatter;

#[cfg(feature = "hydrate")]
mod intl {
    use js_sys::{Array, Function, Object, Reflect};
    use wasm_bindgen::{JsCast, JsValue};

    pub(super) fn options(pairs: &[(&str, JsValue)]) -> Object {
        let options = Object::new();
        for (key, value) in pairs {
            let _ = Reflect::set(&options, &JsValue::from_str(key), value);
        }
        options
    }

    pub(super) fn construct(name: &str, locale: &str, options: &Object) -> Option<JsValue> {
        let intl = Reflect::get(&js_sys::global(), &JsValue::from_str("Intl")).ok()?;
        let ctor: Function = Reflect::get(&intl, &JsValue::from_str(name)).ok()?.dyn_into().ok()?;
        let args = Array::of2(&JsValue::from_str(locale), options);
        Reflect::construct(&ctor, &args).ok()
    }

    pub(super) fn format(formatter: &JsValue, args: &[JsValue]) -> Option<String> {
        let method: Function = Reflect::get(formatter, &JsValue::from_str("format")).ok()?.dyn_into().ok()?;
        let args: Array = args.iter().collect();
        Reflect::apply(&method, formatter, &args).ok()?.as_string()
    }
}

#[cfg(feature = "hydrate")]
#[allow(clippy::cast_precision_loss)]
impl LocaleFormatter for IntlFormatter {
    fn number(&self, locale: &str, value: f64) -> String {
        intl::construct("NumberFormat", locale, &intl::options(&[]))
            .and_then(|nf| intl::format(&nf, &[value.into()]))
            .unwrap_or_else(|| BasicFormatter.number(locale, value))
    }

    fn currency(&self, locale: &str, amount: f64, currency: &str) -> String {
        let options = intl::options(&[
            ("style", "currency".into()),
            ("currency", currency.into()),
            ("minimumFractionDigits", 0.into()),
            ("maximumFractionDigits", 0.into()),
        ]);
        intl::construct("NumberFormat", locale, &options)
            .and_then(|nf| intl::format(&nf, &[amount.into()]))
            .unwrap_or_else(|| BasicFormatter.currency(locale, amount, currency))
    }

    fn date(&self, locale: &str, timestamp_ms: i64) -> String {
        let options =
            intl::options(&[("year", "numeric".into()), ("month", "long".into()), ("day", "numeric".into())]);
        let date = js_sys::Date::new(&(timestamp_ms as f64).into());
        intl::construct("DateTimeFormat", locale, &options)
            .and_then(|df| intl::format(&df, &[date.into()]))
            .unwrap_or_else(|| BasicFormatter.date(locale, timestamp_ms))
    }

    fn relative_time(&self, locale: &str, timestamp_ms: i64, now_ms: i64) -> String {
        let diff = timestamp_ms.saturating_sub(now_ms);
        let days = div_round(diff, MS_PER_DAY);
        let (value, unit) = if days == 0 { (div_round(diff, MS_PER_HOUR), "hour") } else { (days, "day") };
        let options = intl::options(&[("numeric", "auto".into())]);
        intl::construct("RelativeTimeFormat", locale, &options)
            .and_then(|rtf| intl::format(&rtf, &[(value as f64).into(), unit.into()]))
            .unwrap_or_else(|| BasicFormatter.relative_time(locale, timestamp_ms, now_ms))
    }
}
