//! Card expiry dates
//!
//! Expiry has month granularity: a card printed `06/25` is valid through
//! the whole of June 2025 and expired from July 2025 on.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};

use crate::error::CardError;

/// Two-digit years are read as 2000 + YY
const CENTURY: u16 = 2000;

/// Expiry date of a card (month and year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExpiryDate {
    // Field order matters for the derived Ord
    year: u16,
    month: u8,
}

impl ExpiryDate {
    /// Create from a month (1-12) and full year (2000-2099)
    pub fn new(month: u8, year: u16) -> Result<Self, CardError> {
        if !(1..=12).contains(&month) || !(CENTURY..CENTURY + 100).contains(&year) {
            return Err(CardError::MalformedExpiry(format!("{:02}/{}", month, year)));
        }
        Ok(Self { year, month })
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    /// Check if the card is expired on the given date.
    ///
    /// The expiry month itself is still valid.
    pub fn is_expired(&self, as_of: NaiveDate) -> bool {
        let current_year = as_of.year();
        let current_month = as_of.month();
        let year = i32::from(self.year);
        let month = u32::from(self.month);

        year < current_year || (year == current_year && month < current_month)
    }
}

impl FromStr for ExpiryDate {
    type Err = CardError;

    /// Parse `MM/YY` (a single-digit month is accepted)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CardError::MalformedExpiry(s.to_string());

        let (month, year) = s.split_once('/').ok_or_else(malformed)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

        if !all_digits(month) || month.len() > 2 || !all_digits(year) || year.len() != 2 {
            return Err(malformed());
        }

        let month: u8 = month.parse().map_err(|_| malformed())?;
        let year: u16 = year.parse().map_err(|_| malformed())?;

        Self::new(month, CENTURY + year).map_err(|_| malformed())
    }
}

impl fmt::Display for ExpiryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.year - CENTURY)
    }
}
