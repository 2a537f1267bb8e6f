//! Presentation helpers. Rounding happens here and nowhere in the calculations.

pub const DEFAULT_CURRENCY: &str = "KES";

/// Round `amt` to `dec` decimal places, halves away from zero.
pub fn round(amt: f64, dec: i32) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 10_f64.powi(dec)).round() / 10_f64.powi(dec)
    }
}

/// Render an amount the way the dashboard shows money, e.g. `KES 11,047.13`.
pub fn format_currency(amount: f64, code: &str) -> String {
    let rounded = round(amount, 2);
    let sign = if rounded < 0. { "-" } else { "" };
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    format!("{} {}{}.{}", code, sign, group_thousands(whole), frac)
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
