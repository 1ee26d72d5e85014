//! Display formatting and list ordering of bills.

use std::cmp::{Ordering, Reverse};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use expense_shared::domain::{BillStatus, RawBill};

use crate::error::FormatError;

const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// A bill ready to render. `bill` keeps the Store's values untouched, so the
/// raw date and status stay available next to their display forms.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBill {
    pub bill: RawBill,
    pub date: String,
    pub status: String,
    /// False when formatting failed and `date`/`status` are the raw values.
    pub formatted: bool,
}

impl DisplayBill {
    pub fn unformatted(bill: RawBill) -> Self {
        Self {
            date: bill.date.clone(),
            status: bill.status.as_str().to_string(),
            formatted: false,
            bill,
        }
    }

    pub fn raw_date(&self) -> &str {
        &self.bill.date
    }

    pub fn raw_status(&self) -> &BillStatus {
        &self.bill.status
    }
}

pub fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// `2004-04-04` becomes `4 Avr. 04`.
pub fn format_date(raw: &str) -> Result<String, FormatError> {
    let date = parse_bill_date(raw).ok_or_else(|| FormatError::InvalidDate {
        raw: raw.to_string(),
    })?;
    let month = MONTHS_FR[date.month0() as usize];
    Ok(format!(
        "{} {}. {:02}",
        date.day(),
        month,
        date.year().rem_euclid(100)
    ))
}

pub fn format_status(status: &BillStatus) -> String {
    match status {
        BillStatus::Pending => "En attente".to_string(),
        BillStatus::Accepted => "Accepté".to_string(),
        BillStatus::Refused => "Refusé".to_string(),
        BillStatus::Other(raw) => raw.clone(),
    }
}

pub fn format_bill(bill: &RawBill) -> Result<DisplayBill, FormatError> {
    Ok(DisplayBill {
        date: format_date(&bill.date)?,
        status: format_status(&bill.status),
        formatted: true,
        bill: bill.clone(),
    })
}

/// Most recent raw date first. Records whose date does not parse go last.
pub fn compare_most_recent_first(a: &DisplayBill, b: &DisplayBill) -> Ordering {
    Reverse(parse_bill_date(a.raw_date())).cmp(&Reverse(parse_bill_date(b.raw_date())))
}

/// Stable, so equal dates keep Store order.
pub fn sort_most_recent_first(bills: &mut [DisplayBill]) {
    bills.sort_by(compare_most_recent_first);
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
