// src/coerce.rs
//! Lenient cell → number coercion.
//!
//! Spreadsheet cells arrive as display text ("$ 1.250.000", "-27,48", "12 %").
//! Coercion never fails: anything that does not yield a number falls back to
//! the caller's default. A cell that is absent and a cell that is present but
//! unparseable both collapse to that default.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Everything that is not a digit, a decimal point or a minus sign.
fn re_noise() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.\-]").unwrap())
}

/// Longest leading float literal (no exponent, the `e` was stripped already).
fn re_float_prefix() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"^-?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)").unwrap())
}

/// Strip formatting noise and parse the leading number.
///
/// Only the leading literal of the cleaned text counts, so `"1.234,56"`
/// becomes `"1.23456"` → `1.23456` and `"10-20"` becomes `10`.
/// Absent, blank or unparseable input yields `default`.
pub fn coerce_number(raw: Option<&str>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    if raw.is_empty() {
        return default;
    }
    let cleaned = re_noise().replace_all(raw, "");
    re_float_prefix()
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Same contract as [`coerce_number`], truncated toward zero.
pub fn coerce_integer(raw: Option<&str>, default: i64) -> i64 {
    let v = coerce_number(raw, f64::NAN);
    if !v.is_finite() || v >= i64::MAX as f64 || v <= i64::MIN as f64 {
        return default;
    }
    v.trunc() as i64
}
