//! Filter enumerations shared by the admin list views.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

use crate::util::timezone::{localized_date, start_of_local_day};

/// Half-open `[start, end)` interval over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl DateRange {
    #[cfg(test)]
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Overlap of two optional ranges; an empty overlap yields `start >= end`.
    pub fn intersect(left: Option<Self>, right: Option<Self>) -> Option<Self> {
        match (left, right) {
            (Some(left), Some(right)) => Some(Self {
                start: left.start.max(right.start),
                end: left.end.min(right.end),
            }),
            (Some(range), None) | (None, Some(range)) => Some(range),
            (None, None) => None,
        }
    }

    fn local_days(start: Date, end: Date, tz: Tz) -> Self {
        Self {
            start: start_of_local_day(start, tz),
            end: start_of_local_day(end, tz),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeFilter {
    #[default]
    Any,
    Today,
    PastSevenDays,
    ThisMonth,
    ThisYear,
}

impl DateRangeFilter {
    pub const ALL: [DateRangeFilter; 5] = [
        DateRangeFilter::Any,
        DateRangeFilter::Today,
        DateRangeFilter::PastSevenDays,
        DateRangeFilter::ThisMonth,
        DateRangeFilter::ThisYear,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "any" => Some(Self::Any),
            "today" => Some(Self::Today),
            "past_7_days" => Some(Self::PastSevenDays),
            "this_month" => Some(Self::ThisMonth),
            "this_year" => Some(Self::ThisYear),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Today => "today",
            Self::PastSevenDays => "past_7_days",
            Self::ThisMonth => "this_month",
            Self::ThisYear => "this_year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Any => "Any date",
            Self::Today => "Today",
            Self::PastSevenDays => "Past 7 days",
            Self::ThisMonth => "This month",
            Self::ThisYear => "This year",
        }
    }

    /// Resolve the filter against `now`, using calendar days of `tz`.
    pub fn resolve(self, now: OffsetDateTime, tz: Tz) -> Option<DateRange> {
        let today = localized_date(now, tz);
        let tomorrow = today.next_day().unwrap_or(today);

        match self {
            Self::Any => None,
            Self::Today => Some(DateRange::local_days(today, tomorrow, tz)),
            Self::PastSevenDays => {
                let since = today.checked_sub(Duration::days(7)).unwrap_or(today);
                Some(DateRange::local_days(since, tomorrow, tz))
            }
            Self::ThisMonth => {
                let first = today.replace_day(1).unwrap_or(today);
                Some(DateRange::local_days(first, next_month(first), tz))
            }
            Self::ThisYear => {
                let first = Date::from_calendar_date(today.year(), Month::January, 1)
                    .unwrap_or(today);
                let next = Date::from_calendar_date(today.year() + 1, Month::January, 1)
                    .unwrap_or(first);
                Some(DateRange::local_days(first, next, tz))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishedFilter {
    #[default]
    All,
    Yes,
    No,
}

impl PublishedFilter {
    pub const ALL: [PublishedFilter; 3] = [
        PublishedFilter::All,
        PublishedFilter::Yes,
        PublishedFilter::No,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "" | "all" => Some(Self::All),
            "yes" | "true" | "1" => Some(Self::Yes),
            "no" | "false" | "0" => Some(Self::No),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Yes => "yes",
            Self::No => "no",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateGranularity {
    Year,
    Month,
    Day,
}

impl DateGranularity {
    /// Unit understood by Postgres `date_trunc`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }
}

/// Drill-down position inside the year, month, day hierarchy.
///
/// Levels are only kept when their parent is present and the resulting
/// calendar date exists; anything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateHierarchySelection {
    pub year: Option<i32>,
    pub month: Option<Month>,
    pub day: Option<u8>,
}

impl DateHierarchySelection {
    pub fn from_parts(year: Option<i32>, month: Option<u8>, day: Option<u8>) -> Self {
        let Some(year) = year.filter(|year| (1..=9999).contains(year)) else {
            return Self::default();
        };

        let Some(month) = month.and_then(|value| Month::try_from(value).ok()) else {
            return Self {
                year: Some(year),
                ..Self::default()
            };
        };

        let day = day.filter(|day| Date::from_calendar_date(year, month, *day).is_ok());

        Self {
            year: Some(year),
            month: Some(month),
            day,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none()
    }

    /// Granularity of the buckets offered at this level, `None` once a day is selected.
    pub fn next_granularity(&self) -> Option<DateGranularity> {
        match (self.year, self.month, self.day) {
            (None, _, _) => Some(DateGranularity::Year),
            (Some(_), None, _) => Some(DateGranularity::Month),
            (Some(_), Some(_), None) => Some(DateGranularity::Day),
            (Some(_), Some(_), Some(_)) => None,
        }
    }

    pub fn resolve(&self, tz: Tz) -> Option<DateRange> {
        let year = self.year?;

        let (start, end) = match (self.month, self.day) {
            (None, _) => {
                let start = Date::from_calendar_date(year, Month::January, 1).ok()?;
                let end = Date::from_calendar_date(year + 1, Month::January, 1).ok()?;
                (start, end)
            }
            (Some(month), None) => {
                let start = Date::from_calendar_date(year, month, 1).ok()?;
                (start, next_month(start))
            }
            (Some(month), Some(day)) => {
                let start = Date::from_calendar_date(year, month, day).ok()?;
                (start, start.next_day()?)
            }
        };

        Some(DateRange::local_days(start, end, tz))
    }

    /// The selection one level up, used for the "back" link.
    pub fn parent(&self) -> Self {
        match (self.year, self.month, self.day) {
            (Some(year), Some(month), Some(_)) => Self {
                year: Some(year),
                month: Some(month),
                day: None,
            },
            (Some(year), Some(_), None) => Self {
                year: Some(year),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Narrow the selection to the bucket starting on `date` at `granularity`.
    pub fn child(&self, granularity: DateGranularity, date: Date) -> Self {
        match granularity {
            DateGranularity::Year => Self {
                year: Some(date.year()),
                ..Self::default()
            },
            DateGranularity::Month => Self {
                year: Some(date.year()),
                month: Some(date.month()),
                day: None,
            },
            DateGranularity::Day => Self {
                year: Some(date.year()),
                month: Some(date.month()),
                day: Some(date.day()),
            },
        }
    }
}

fn next_month(first: Date) -> Date {
    let (year, month) = match first.month() {
        Month::December => (first.year() + 1, Month::January),
        other => (first.year(), other.next()),
    };
    Date::from_calendar_date(year, month, 1).unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn date_range_filter_parses_query_values() {
        for filter in DateRangeFilter::ALL {
            assert_eq!(DateRangeFilter::parse(filter.as_str()), Some(filter));
        }
        assert_eq!(DateRangeFilter::parse(""), Some(DateRangeFilter::Any));
        assert_eq!(DateRangeFilter::parse("yesterday"), None);
    }

    #[test]
    fn today_covers_local_calendar_day() {
        let now = datetime!(2025-06-10 23:30 UTC);
        let range = DateRangeFilter::Today
            .resolve(now, chrono_tz::Asia::Tokyo)
            .expect("range");

        // 08:30 on June 11th in Tokyo.
        assert_eq!(range.start, datetime!(2025-06-10 15:00 UTC));
        assert_eq!(range.end, datetime!(2025-06-11 15:00 UTC));
        assert!(range.contains(now));
    }

    #[test]
    fn past_seven_days_reaches_back_a_week() {
        let now = datetime!(2025-06-10 12:00 UTC);
        let range = DateRangeFilter::PastSevenDays
            .resolve(now, Tz::UTC)
            .expect("range");

        assert_eq!(range.start, datetime!(2025-06-03 00:00 UTC));
        assert_eq!(range.end, datetime!(2025-06-11 00:00 UTC));
    }

    #[test]
    fn this_month_and_year_roll_over_december() {
        let now = datetime!(2025-12-31 12:00 UTC);

        let month = DateRangeFilter::ThisMonth.resolve(now, Tz::UTC).expect("month");
        assert_eq!(month.start, datetime!(2025-12-01 00:00 UTC));
        assert_eq!(month.end, datetime!(2026-01-01 00:00 UTC));

        let year = DateRangeFilter::ThisYear.resolve(now, Tz::UTC).expect("year");
        assert_eq!(year.start, datetime!(2025-01-01 00:00 UTC));
        assert_eq!(year.end, datetime!(2026-01-01 00:00 UTC));
    }

    #[test]
    fn any_has_no_range() {
        assert!(DateRangeFilter::Any
            .resolve(OffsetDateTime::UNIX_EPOCH, Tz::UTC)
            .is_none());
    }

    #[test]
    fn published_filter_maps_to_bool() {
        assert_eq!(PublishedFilter::All.as_bool(), None);
        assert_eq!(PublishedFilter::parse("yes"), Some(PublishedFilter::Yes));
        assert_eq!(PublishedFilter::parse("no").and_then(|f| f.as_bool()), Some(false));
        assert_eq!(PublishedFilter::parse("maybe"), None);
    }

    #[test]
    fn hierarchy_drops_orphaned_levels() {
        let selection = DateHierarchySelection::from_parts(None, Some(3), Some(4));
        assert!(selection.is_empty());

        let selection = DateHierarchySelection::from_parts(Some(2025), Some(2), Some(30));
        assert_eq!(selection.month, Some(Month::February));
        assert_eq!(selection.day, None);

        let selection = DateHierarchySelection::from_parts(Some(2025), Some(13), Some(1));
        assert_eq!(selection.month, None);
    }

    #[test]
    fn hierarchy_walks_year_month_day() {
        let root = DateHierarchySelection::default();
        assert_eq!(root.next_granularity(), Some(DateGranularity::Year));

        let year = root.child(DateGranularity::Year, date!(2024 - 01 - 01));
        assert_eq!(year.next_granularity(), Some(DateGranularity::Month));

        let month = year.child(DateGranularity::Month, date!(2024 - 02 - 01));
        assert_eq!(month.next_granularity(), Some(DateGranularity::Day));
        let range = month.resolve(Tz::UTC).expect("range");
        assert_eq!(range.start, datetime!(2024-02-01 00:00 UTC));
        assert_eq!(range.end, datetime!(2024-03-01 00:00 UTC));

        let day = month.child(DateGranularity::Day, date!(2024 - 02 - 29));
        assert_eq!(day.next_granularity(), None);
        let range = day.resolve(Tz::UTC).expect("range");
        assert_eq!(range.end, datetime!(2024-03-01 00:00 UTC));

        assert_eq!(day.parent(), month);
        assert_eq!(month.parent(), year);
        assert_eq!(year.parent(), root);
    }
}
