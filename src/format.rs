// Display helpers for the guest-facing text

use chrono::NaiveDate;

/// `R$ 1234,50`: two decimals, comma as decimal separator.
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format!("{:.2}", value).replace('.', ","))
}

/// `dd/mm/yyyy`
pub fn format_br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
