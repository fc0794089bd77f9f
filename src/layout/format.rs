//! Display formatting for amounts and dates.

use chrono::NaiveDate;

/// Formats `amount` as `{symbol} {grouped amount}` with two decimals,
/// e.g. `₹ 1,234.50`. Negative amounts keep their sign after the symbol.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let negative = amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    format!(
        "{} {}{}.{}",
        symbol,
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac_part
    )
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Transaction row dates: `02-Mar-25`.
pub fn format_row_date(date: NaiveDate) -> String {
    date.format("%d-%b-%y").to_string()
}

/// Footer statement date: `31-Mar-2025`.
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

/// `"{page} {n} {of} {total}"` in the given labels.
pub fn page_of(page_label: &str, n: usize, of_label: &str, total: usize) -> String {
    format!("{} {} {} {}", page_label, n, of_label, total)
}
