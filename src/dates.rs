use std::collections::HashMap;

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

use crate::error::ScrapeError;
use crate::models::RawDateParts;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Galician month abbreviations as printed by the site, January first.
pub const GALICIAN_MONTHS: [&str; 12] = [
    "xan", "feb", "mar", "apr", "mai", "xun", "xul", "ago", "set", "out", "nov", "dec",
];

/// Lookup from localized three-letter month codes to month numbers.
#[derive(Debug, Clone)]
pub struct MonthTable {
    months: HashMap<String, u32>,
}

impl Default for MonthTable {
    fn default() -> Self {
        let months = (1..=12)
            .zip(GALICIAN_MONTHS)
            .map(|(number, code)| (code.to_string(), number))
            .collect();
        MonthTable { months }
    }
}

impl MonthTable {
    /// Builds a table from twelve distinct codes ordered January to December.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self> {
        if codes.len() != 12 {
            return Err(anyhow!("expected 12 month codes, got {}", codes.len()));
        }

        let mut months = HashMap::with_capacity(12);
        for (number, code) in (1..=12).zip(codes) {
            let code = code.as_ref().trim().to_lowercase();
            if code.is_empty() {
                return Err(anyhow!("month code #{number} is empty"));
            }
            if months.insert(code.clone(), number).is_some() {
                return Err(anyhow!("month code `{code}` appears more than once"));
            }
        }

        Ok(MonthTable { months })
    }

    /// Month number for `abbrev`, or `0` when the code is unknown.
    pub fn month_number(&self, abbrev: &str) -> u32 {
        self.months
            .get(&abbrev.trim().to_lowercase())
            .copied()
            .unwrap_or(0)
    }

    /// Canonical midnight timestamp for the given parts.
    pub fn normalize(&self, parts: &RawDateParts) -> Result<String, ScrapeError> {
        let invalid = || ScrapeError::InvalidDate {
            day: parts.day.clone(),
            month: parts.month.clone(),
            year: parts.year.clone(),
        };

        let day: u32 = parts.day.trim().parse().map_err(|_| invalid())?;
        let year: i32 = parts.year.trim().parse().map_err(|_| invalid())?;
        if !(1..=9999).contains(&year) {
            return Err(invalid());
        }
        let month = self.month_number(&parts.month);

        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|timestamp| timestamp.format(TIMESTAMP_FORMAT).to_string())
            .ok_or_else(invalid)
    }
}
