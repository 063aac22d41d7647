//! Display formatting for dashboard numbers.
//!
//! Every card, table and chart label goes through these helpers so the same
//! value always renders the same way. Rounding is half away from zero
//! (`2.5 -> 3`), which is what the dashboard's users see in the web client.
//!
//! The "K" suffix always uses zero decimals (`2_500 -> "€3K"`); millions use
//! one decimal (`1_500_000 -> "€1.5M"`). Non-finite inputs render as zero.

/// Rounds `value` to `decimals` places, half away from zero.
///
/// Negative zero is normalised to positive zero so it never renders as `-0`.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10_f64.powf(f64::from(decimals));
    let rounded = (value * factor).round() / factor;
    // -0.0 + 0.0 == +0.0
    rounded + 0.0
}

fn to_fixed(value: f64, decimals: u32) -> String {
    format!("{:.*}", decimals as usize, round_to(value, decimals))
}

/// Card/chart currency: `€1.5M`, `€3K`, `€950`.
///
/// Thresholds apply to the magnitude; negative values carry a leading `-`.
#[must_use]
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{sign}€{}M", to_fixed(magnitude / 1_000_000.0, 1))
    } else if magnitude >= 1_000.0 {
        format!("{sign}€{}K", to_fixed(magnitude / 1_000.0, 0))
    } else {
        format_euro(value)
    }
}

/// Plain euro amount with thousands separators and no decimals: `€12,345`.
#[must_use]
pub fn format_euro(value: f64) -> String {
    let rounded = round_to(value, 0);
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}€{}", group_thousands(&digits))
}

/// Signed change percentage with one decimal: `+4.2%`, `-3.1%`, `+0.0%`.
///
/// The sign is decided on the rounded value, so `-0.04` renders as `+0.0%`.
#[must_use]
pub fn format_percentage(value: f64) -> String {
    let rounded = round_to(value, 1);
    let sign = if rounded >= 0.0 { "+" } else { "" };
    format!("{sign}{rounded:.1}%")
}

/// Unsigned share/ratio percentage with one decimal: `35.2%`.
#[must_use]
pub fn format_share(value: f64) -> String {
    format!("{}%", to_fixed(value, 1))
}

/// Non-currency volume (cases, units): `1.2M`, `45.3K`, `950`.
#[must_use]
pub fn format_compact(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{sign}{}M", to_fixed(magnitude / 1_000_000.0, 1))
    } else if magnitude >= 1_000.0 {
        format!("{sign}{}K", to_fixed(magnitude / 1_000.0, 1))
    } else {
        format!("{sign}{}", to_fixed(magnitude, 0))
    }
}

/// Signed currency delta against last year: `+€1.2M`, `-€45K`, `+€0`.
#[must_use]
pub fn format_variance(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    if value < 0.0 {
        format_currency(value)
    } else {
        format!("+{}", format_currency(value))
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
