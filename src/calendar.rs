//! Calendar-aligned millisecond ranges for month-to-date comparisons.
//!
//! Sale timestamps are milliseconds since the Unix epoch. They are mapped onto
//! local calendar dates with the caller's `UtcOffset`, and the reference
//! instant `now` is always passed in rather than read from the system clock.

use serde::Serialize;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// A calendar month, e.g. March 2024.
///
/// Both the month and the month before it fall within the dates `time` can
/// represent, so the month-to-date windows can always be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SelectedMonth {
    year: i32,
    month: Month,
}

impl SelectedMonth {
    /// Create a month, returning `None` if it or the month before it is
    /// outside the range of representable dates.
    pub fn new(year: i32, month: Month) -> Option<Self> {
        let selected = Self { year, month };
        let previous = selected.previous_unchecked();

        let representable = Date::from_calendar_date(year, month, 1).is_ok()
            && Date::from_calendar_date(previous.year, previous.month, 1).is_ok();

        representable.then_some(selected)
    }

    /// Create a month from a zero-based month index (0 is January).
    ///
    /// Returns `None` if `index` is greater than 11, or see [SelectedMonth::new].
    pub fn from_index(year: i32, index: u8) -> Option<Self> {
        let month = Month::try_from(index.checked_add(1)?).ok()?;
        Self::new(year, month)
    }

    /// The month containing `date`.
    ///
    /// Returns `None` for the first month of the earliest representable year.
    pub fn of(date: Date) -> Option<Self> {
        Self::new(date.year(), date.month())
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> Month {
        self.month
    }

    /// The month immediately before this one, wrapping into the previous year.
    ///
    /// Returns `None` if that month's own previous month is not representable.
    pub fn previous(self) -> Option<Self> {
        let previous = self.previous_unchecked();
        Self::new(previous.year, previous.month)
    }

    /// The previous month, which [SelectedMonth::new] guarantees has
    /// representable dates.
    fn previous_unchecked(self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    /// The number of days in the month, leap-year aware.
    pub fn days(self) -> u8 {
        last_day_of_month(self.year, self.month)
    }

    pub fn first_day(self) -> Date {
        Date::from_calendar_date(self.year, self.month, 1).expect("invalid month start date")
    }

    pub fn last_day(self) -> Date {
        Date::from_calendar_date(self.year, self.month, self.days())
            .expect("invalid month end date")
    }

    /// The month name and year, e.g. "March 2024".
    pub fn label(self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// An inclusive range of millisecond timestamps.
///
/// `end` is the last millisecond inside the range, so a whole month ends one
/// millisecond before the next month starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimestampRange {
    pub start: i64,
    pub end: i64,
}

impl TimestampRange {
    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// The number of milliseconds covered by the range.
    pub fn len_millis(&self) -> i64 {
        self.end - self.start + 1
    }
}

/// The whole of `month`, from local midnight on the first to the last
/// millisecond of the last day.
pub fn month_range(month: SelectedMonth, offset: UtcOffset) -> TimestampRange {
    TimestampRange {
        start: start_of_day(month.first_day(), offset),
        end: end_of_day(month.last_day(), offset),
    }
}

/// The last-month-to-date comparison window for `selected`.
///
/// When `selected` is the month containing `now`, the window covers the
/// previous month from day 1 up to the same day of month as `now`, clamped to
/// the length of the previous month (March 31 compares against February 28 or
/// 29). For any other month the window is the entire previous month.
pub fn lmtd_range(selected: SelectedMonth, now: OffsetDateTime, offset: UtcOffset) -> TimestampRange {
    let previous = selected.previous_unchecked();

    if !is_current_month(selected, now, offset) {
        return month_range(previous, offset);
    }

    let today = now.to_offset(offset).day();
    let end_day = today.min(previous.days());
    let end_date = Date::from_calendar_date(previous.year, previous.month, end_day)
        .expect("invalid clamped end date");

    TimestampRange {
        start: start_of_day(previous.first_day(), offset),
        end: end_of_day(end_date, offset),
    }
}

/// The month-to-date window for `selected`.
///
/// For the month containing `now` this runs from the first of the month up to
/// `now`. Months that have already finished (or not yet started) use the
/// whole month.
pub fn mtd_range(selected: SelectedMonth, now: OffsetDateTime, offset: UtcOffset) -> TimestampRange {
    let whole_month = month_range(selected, offset);

    if !is_current_month(selected, now, offset) {
        return whole_month;
    }

    let now_millis = (now.unix_timestamp_nanos() / 1_000_000) as i64;

    TimestampRange {
        start: whole_month.start,
        end: now_millis.clamp(whole_month.start, whole_month.end),
    }
}

/// Whether `selected` is the month that contains `now` in local time.
pub fn is_current_month(selected: SelectedMonth, now: OffsetDateTime, offset: UtcOffset) -> bool {
    let today = now.to_offset(offset).date();
    today.year() == selected.year && today.month() == selected.month
}

/// The local calendar date of a millisecond timestamp.
///
/// Timestamps outside the range `time` can represent saturate to the first or
/// last representable date.
pub fn local_date(timestamp: i64, offset: UtcOffset) -> Date {
    match OffsetDateTime::from_unix_timestamp_nanos(timestamp as i128 * 1_000_000) {
        Ok(date_time) => date_time.to_offset(offset).date(),
        Err(_) if timestamp < 0 => Date::MIN,
        Err(_) => Date::MAX,
    }
}

/// Milliseconds since the Unix epoch of a local date and time.
pub fn local_millis(date: Date, time: Time, offset: UtcOffset) -> i64 {
    let nanos = PrimitiveDateTime::new(date, time)
        .assume_offset(offset)
        .unix_timestamp_nanos();

    (nanos / 1_000_000) as i64
}

/// Local midnight at the start of `date`.
pub fn start_of_day(date: Date, offset: UtcOffset) -> i64 {
    local_millis(date, Time::MIDNIGHT, offset)
}

/// The last millisecond of `date` (23:59:59.999 local time).
pub fn end_of_day(date: Date, offset: UtcOffset) -> i64 {
    start_of_day(date, offset) + MILLIS_PER_DAY - 1
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
