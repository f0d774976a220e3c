//! The ledger view: filter pipeline, ordering and summary totals.
//!
//! A view is a pure function of the record set, the [`ViewParams`] and a
//! pinned [`Clock`]. Evaluating the same inputs twice yields the same
//! ordered list.

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::fees::Fees;
use crate::transaction::{SettlementStatus, TransactionRecord};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use log::debug;
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Keyword selecting every value of a filter.
pub const ALL: &str = "all";

/// Either every value, or exactly one.
///
/// `All` is its own variant and is never compared against record data, so a
/// store literally called "all" can still be selected with `Only`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> Selection<T> {
    pub fn matches<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        match self {
            Selection::All => true,
            Selection::Only(wanted) => wanted.borrow() == value,
        }
    }
}

impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

/// Time-range tab, evaluated against a pinned "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeRange {
    #[default]
    All,
    /// Same calendar day as now
    Today,
    /// Same calendar week as now
    ThisWeek,
    /// Same calendar month as now
    ThisMonth,
}

impl TimeRange {
    pub fn contains(&self, at: DateTime<Utc>, clock: &Clock) -> bool {
        let day = at.date_naive();
        let today = clock.now.date_naive();

        match self {
            TimeRange::All => true,
            TimeRange::Today => day == today,
            TimeRange::ThisWeek => {
                week_start(day, clock.week_starts_on) == week_start(today, clock.week_starts_on)
            }
            TimeRange::ThisMonth => day.year() == today.year() && day.month() == today.month(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::All => ALL,
            TimeRange::Today => "today",
            TimeRange::ThisWeek => "this_week",
            TimeRange::ThisMonth => "this_month",
        }
    }
}

impl FromStr for TimeRange {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            ALL => Ok(TimeRange::All),
            "today" => Ok(TimeRange::Today),
            "this_week" | "week" => Ok(TimeRange::ThisWeek),
            "this_month" | "month" => Ok(TimeRange::ThisMonth),
            _ => Err(LedgerError::InvalidFilter {
                field: "range",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn week_start(day: NaiveDate, starts_on: Weekday) -> NaiveDate {
    let offset =
        (day.weekday().num_days_from_monday() + 7 - starts_on.num_days_from_monday()) % 7;
    day - Duration::days(i64::from(offset))
}

/// The moment a view is evaluated at, plus the calendar convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    pub now: DateTime<Utc>,
    pub week_starts_on: Weekday,
}

impl Clock {
    /// Pins `now`, with weeks starting on Sunday.
    pub fn at(now: DateTime<Utc>) -> Self {
        Clock {
            now,
            week_starts_on: Weekday::Sun,
        }
    }

    pub fn with_week_start(mut self, week_starts_on: Weekday) -> Self {
        self.week_starts_on = week_starts_on;
        self
    }
}

/// User-controlled view parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewParams {
    /// Case-insensitive substring matched against id, customer and store
    pub search: String,
    pub status: Selection<SettlementStatus>,
    pub store: Selection<String>,
    pub range: TimeRange,
}

impl ViewParams {
    /// A record is visible only if every predicate holds.
    pub fn matches(&self, record: &TransactionRecord, clock: &Clock) -> bool {
        self.matches_search(record)
            && self.status.matches(&record.status())
            && self.store.matches(record.store())
            && self.range.contains(record.occurred_at(), clock)
    }

    fn matches_search(&self, record: &TransactionRecord) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let needle = self.search.to_lowercase();
        [record.id(), record.customer(), record.store()]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Returns the records matching `params`, most recent first.
///
/// Ties on `occurred_at` are broken by ascending id. The input is not
/// modified.
pub fn visible_set<'a, I>(records: I, params: &ViewParams, clock: &Clock) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut scanned = 0usize;
    let mut visible: Vec<&TransactionRecord> = records
        .into_iter()
        .inspect(|_| scanned += 1)
        .filter(|record| params.matches(record, clock))
        .collect();

    visible.sort_by(|a, b| {
        b.occurred_at()
            .cmp(&a.occurred_at())
            .then_with(|| a.id().cmp(b.id()))
    });

    debug!(
        "View (search={:?}, range={}): {} of {} records visible",
        params.search,
        params.range,
        visible.len(),
        scanned
    );

    visible
}

/// Aggregate figures over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTotals {
    pub count: usize,
    pub posted: usize,
    pub gross: Amount,
    pub fees: Fees,
    pub net: Amount,
    pub post_reach: u64,
}

impl Default for ViewTotals {
    fn default() -> Self {
        ViewTotals {
            count: 0,
            posted: 0,
            gross: Amount::ZERO,
            fees: Fees::NONE,
            net: Amount::ZERO,
            post_reach: 0,
        }
    }
}

impl ViewTotals {
    /// Sums the records, or `None` if an amount total overflows.
    pub fn from_records<'a, I>(records: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        records
            .into_iter()
            .try_fold(ViewTotals::default(), |totals, record| {
                Some(ViewTotals {
                    count: totals.count + 1,
                    posted: totals.posted + usize::from(record.is_posted()),
                    gross: totals.gross.checked_add(record.gross())?,
                    fees: Fees {
                        advertising: totals
                            .fees
                            .advertising
                            .checked_add(record.advertising_fee())?,
                        platform: totals.fees.platform.checked_add(record.platform_fee())?,
                    },
                    net: totals.net.checked_add(record.net_amount())?,
                    post_reach: totals.post_reach + u64::from(record.post_reach()),
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_selection_all_matches_everything() {
        let all: Selection<String> = Selection::All;
        assert!(all.matches("Main Branch"));
        assert!(all.matches("all"));

        let only = Selection::Only("Main Branch".to_string());
        assert!(only.matches("Main Branch"));
        assert!(!only.matches("Downtown Branch"));
    }

    #[test]
    fn test_selection_parses_all_keyword() {
        let parsed: Selection<SettlementStatus> = "ALL".parse().unwrap();
        assert_eq!(parsed, Selection::All);

        let parsed: Selection<SettlementStatus> = "on_hold".parse().unwrap();
        assert_eq!(parsed, Selection::Only(SettlementStatus::OnHold));

        assert!("pending".parse::<Selection<SettlementStatus>>().is_err());
    }

    #[test]
    fn test_time_range_parse() {
        assert_eq!("today".parse::<TimeRange>().unwrap(), TimeRange::Today);
        assert_eq!("this-week".parse::<TimeRange>().unwrap(), TimeRange::ThisWeek);
        assert_eq!("This_Month".parse::<TimeRange>().unwrap(), TimeRange::ThisMonth);
        assert!("yesterday".parse::<TimeRange>().is_err());
    }

    #[test]
    fn test_today_is_calendar_day() {
        // Saturday 2024-06-01
        let clock = Clock::at(at(2024, 6, 1, 12));

        assert!(TimeRange::Today.contains(at(2024, 6, 1, 0), &clock));
        assert!(TimeRange::Today.contains(at(2024, 6, 1, 23), &clock));
        assert!(!TimeRange::Today.contains(at(2024, 5, 31, 23), &clock));
        assert!(!TimeRange::Today.contains(at(2024, 5, 22, 12), &clock));
    }

    #[test]
    fn test_this_week_respects_week_start() {
        // Wednesday 2024-06-05
        let sunday_weeks = Clock::at(at(2024, 6, 5, 12));
        let monday_weeks = sunday_weeks.with_week_start(Weekday::Mon);
        let sunday = at(2024, 6, 2, 9);

        assert!(TimeRange::ThisWeek.contains(sunday, &sunday_weeks));
        assert!(!TimeRange::ThisWeek.contains(sunday, &monday_weeks));
        assert!(TimeRange::ThisWeek.contains(at(2024, 6, 8, 9), &sunday_weeks));
        assert!(!TimeRange::ThisWeek.contains(at(2024, 6, 9, 9), &sunday_weeks));
    }

    #[test]
    fn test_this_month_requires_same_year() {
        let clock = Clock::at(at(2024, 6, 15, 12));

        assert!(TimeRange::ThisMonth.contains(at(2024, 6, 1, 0), &clock));
        assert!(!TimeRange::ThisMonth.contains(at(2024, 5, 31, 23), &clock));
        assert!(!TimeRange::ThisMonth.contains(at(2023, 6, 15, 12), &clock));
        assert!(TimeRange::All.contains(at(1999, 1, 1, 0), &clock));
    }
}
