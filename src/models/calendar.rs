//! Business-day calendar.
//!
//! Converts abstract day offsets into real dates. A business day is any
//! date that is neither a Saturday/Sunday nor a declared holiday.
//!
//! # Time Model
//! Dates are `chrono::NaiveDate`; comparison is date-only. Timestamps from
//! the source system have their time part dropped when parsed.
//!
//! # Offsets
//! [`offset`] walks forward one calendar day at a time and counts only
//! business days, so a holiday next to a weekend chains correctly and
//! spans of any length compose.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EstimateError, Result};

/// Declared non-working dates.
///
/// Holds exact dates and annually recurring month/day pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holidays {
    /// One-off holiday dates.
    pub dates: BTreeSet<NaiveDate>,
    /// Holidays that recur every year, as (month, day).
    pub recurring: BTreeSet<(u32, u32)>,
}

impl Holidays {
    /// Creates an empty holiday set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an exact holiday date.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.dates.insert(date);
        self
    }

    /// Adds a holiday that recurs every year.
    ///
    /// Invalid month/day pairs are ignored.
    pub fn with_recurring(mut self, month: u32, day: u32) -> Self {
        if is_valid_month_day(month, day) {
            self.recurring.insert((month, day));
        }
        self
    }

    /// Parses a separated list of holiday entries.
    ///
    /// Accepts `MM/DD` (recurring), `MM/DD/YYYY`, and ISO `YYYY-MM-DD`
    /// with an optional time part. Entries may be separated by commas,
    /// semicolons, or newlines. Unparseable entries are skipped.
    pub fn parse_list(input: &str) -> Self {
        let mut holidays = Self::new();
        for entry in input
            .split([',', ';', '\n'])
            .map(str::trim)
            .filter(|e| !e.is_empty())
        {
            match parse_entry(entry) {
                Some(HolidayEntry::Date(date)) => {
                    holidays.dates.insert(date);
                }
                Some(HolidayEntry::Recurring(month, day)) => {
                    holidays.recurring.insert((month, day));
                }
                None => tracing::warn!(entry, "skipping unparseable holiday entry"),
            }
        }
        holidays
    }

    /// Whether a date is a declared holiday.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date) || self.recurring.contains(&(date.month(), date.day()))
    }

    /// Number of declared entries.
    pub fn len(&self) -> usize {
        self.dates.len() + self.recurring.len()
    }

    /// Whether no holidays are declared.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() && self.recurring.is_empty()
    }
}

enum HolidayEntry {
    Date(NaiveDate),
    Recurring(u32, u32),
}

fn parse_entry(entry: &str) -> Option<HolidayEntry> {
    // Drop any time part: "2025-12-25T00:00:00.000Z" or "2025-12-25 08:00".
    let date_part = entry.split(['T', ' ']).next().unwrap_or(entry);

    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        return Some(HolidayEntry::Date(date));
    }
    if let Ok(date) = NaiveDate::parse_from_str(date_part, "%m/%d/%Y") {
        return Some(HolidayEntry::Date(date));
    }

    let (month, day) = date_part.split_once('/')?;
    let month: u32 = month.trim().parse().ok()?;
    let day: u32 = day.trim().parse().ok()?;
    is_valid_month_day(month, day).then_some(HolidayEntry::Recurring(month, day))
}

fn is_valid_month_day(month: u32, day: u32) -> bool {
    // Leap year so that 02/29 is accepted.
    NaiveDate::from_ymd_opt(2000, month, day).is_some()
}

/// Whether a date falls on a Saturday or Sunday.
#[inline]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether a date is a business day.
#[inline]
pub fn is_business_day(date: NaiveDate, holidays: &Holidays) -> bool {
    !is_weekend(date) && !holidays.contains(date)
}

/// Result of a business-day offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDayOffset {
    /// Landing date.
    pub date: NaiveDate,
    /// Calendar days passed over that did not count (weekends, holidays).
    pub skipped: u32,
}

impl BusinessDayOffset {
    /// Total calendar days advanced.
    pub fn calendar_days(&self, work_days: u32) -> u32 {
        work_days + self.skipped
    }
}

/// Advances `work_days` business days from `start`.
///
/// `start` itself never counts. With `work_days == 0` the start date is
/// returned unchanged, even if it is not a business day.
///
/// # Errors
/// [`EstimateError::NegativeWorkDays`] for a negative count.
pub fn offset(start: NaiveDate, work_days: i64, holidays: &Holidays) -> Result<BusinessDayOffset> {
    if work_days < 0 {
        return Err(EstimateError::NegativeWorkDays(work_days));
    }

    let mut date = start;
    let mut counted: i64 = 0;
    let mut skipped: u32 = 0;

    while counted < work_days {
        date = next_day(date)?;
        if is_business_day(date, holidays) {
            counted += 1;
        } else {
            skipped += 1;
        }
    }

    Ok(BusinessDayOffset { date, skipped })
}

/// First business day on or after `date`.
pub fn next_business_day(date: NaiveDate, holidays: &Holidays) -> Result<NaiveDate> {
    let mut current = date;
    while !is_business_day(current, holidays) {
        current = next_day(current)?;
    }
    Ok(current)
}

/// Counts business days in `(start, end]`.
///
/// Returns 0 when `end <= start`.
pub fn business_days_between(start: NaiveDate, end: NaiveDate, holidays: &Holidays) -> u32 {
    start
        .iter_days()
        .skip(1)
        .take_while(|d| *d <= end)
        .filter(|d| is_business_day(*d, holidays))
        .count() as u32
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt().ok_or(EstimateError::DateOutOfRange(date))
}

/// A holiday-aware calendar bound to one holiday set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessCalendar {
    /// Declared holidays.
    pub holidays: Holidays,
}

impl BusinessCalendar {
    /// Creates a calendar over the given holidays.
    pub fn new(holidays: Holidays) -> Self {
        Self { holidays }
    }

    /// Whether a date is a business day.
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        is_business_day(date, &self.holidays)
    }

    /// Advances `work_days` business days from `start`.
    pub fn offset(&self, start: NaiveDate, work_days: i64) -> Result<BusinessDayOffset> {
        offset(start, work_days, &self.holidays)
    }

    /// First business day on or after `date`.
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate> {
        next_business_day(date, &self.holidays)
    }

    /// Counts business days in `(start, end]`.
    pub fn business_days_between(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        business_days_between(start, end, &self.holidays)
    }
}
