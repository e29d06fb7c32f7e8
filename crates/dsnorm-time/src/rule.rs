//! Time rules: a filename pattern, an anchor builder and an interval policy.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, TimeZone, Utc};
use regex::Regex;

use crate::error::{Result, TimeError};

/// Named capture groups of a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    groups: BTreeMap<String, String>,
}

impl Captures {
    pub fn from_match(pattern: &Regex, caps: &regex::Captures<'_>) -> Self {
        let groups = pattern
            .capture_names()
            .flatten()
            .filter_map(|name| {
                caps.name(name)
                    .map(|value| (name.to_string(), value.as_str().to_string()))
            })
            .collect();
        Self { groups }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.groups.get(name).map(String::as_str)
    }

    /// Numeric group value; absent groups are an anchor error.
    pub fn number(&self, name: &str) -> Result<u32> {
        let raw = self
            .get(name)
            .ok_or_else(|| TimeError::invalid_anchor(format!("group '{name}' did not match")))?;
        raw.parse()
            .map_err(|_| TimeError::invalid_anchor(format!("group '{name}' is not a number: {raw}")))
    }

    /// Numeric group value, or `default` when the group did not participate.
    pub fn number_or(&self, name: &str, default: u32) -> Result<u32> {
        match self.get(name) {
            Some(_) => self.number(name),
            None => Ok(default),
        }
    }

    fn year(&self) -> Result<i32> {
        i32::try_from(self.number("year")?)
            .map_err(|_| TimeError::invalid_anchor("year out of range"))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Captures {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            groups: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

pub type AnchorFn = fn(&Captures) -> Result<DateTime<Utc>>;

pub type IntervalFn = fn(DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)>;

/// Builds the anchor instant from captured groups.
#[derive(Debug, Clone, Copy)]
pub enum Anchor {
    /// `year`, `month`, `day`, optionally `hour`, `minute`, `second`.
    YearMonthDay,
    /// `year` and `doy` (day of year, 1-based).
    YearDayOfYear,
    /// `year` and `month`, anchored at the first of the month.
    YearMonth,
    /// `year`, anchored at January 1st.
    Year,
    Custom(AnchorFn),
}

impl Anchor {
    /// Capture groups the anchor cannot do without.
    pub fn required_groups(&self) -> &'static [&'static str] {
        match self {
            Anchor::YearMonthDay => &["year", "month", "day"],
            Anchor::YearDayOfYear => &["year", "doy"],
            Anchor::YearMonth => &["year", "month"],
            Anchor::Year => &["year"],
            Anchor::Custom(_) => &[],
        }
    }

    pub fn build(&self, captures: &Captures) -> Result<DateTime<Utc>> {
        match self {
            Anchor::YearMonthDay => {
                let date = ymd(captures.year()?, captures.number("month")?, captures.number("day")?)?;
                at_time(
                    date,
                    captures.number_or("hour", 0)?,
                    captures.number_or("minute", 0)?,
                    captures.number_or("second", 0)?,
                )
            }
            Anchor::YearDayOfYear => {
                let year = captures.year()?;
                let doy = captures.number("doy")?;
                let date = NaiveDate::from_yo_opt(year, doy).ok_or_else(|| {
                    TimeError::invalid_anchor(format!("day of year {doy} does not exist in {year}"))
                })?;
                at_time(date, 0, 0, 0)
            }
            Anchor::YearMonth => at_time(ymd(captures.year()?, captures.number("month")?, 1)?, 0, 0, 0),
            Anchor::Year => at_time(ymd(captures.year()?, 1, 1)?, 0, 0, 0),
            Anchor::Custom(build) => build(captures),
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimeError::invalid_anchor(format!("{year:04}-{month:02}-{day:02} is not a date")))
}

fn at_time(date: NaiveDate, hour: u32, minute: u32, second: u32) -> Result<DateTime<Utc>> {
    date.and_hms_opt(hour, minute, second)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| {
            TimeError::invalid_anchor(format!("{hour:02}:{minute:02}:{second:02} is not a time"))
        })
}

fn overflow() -> TimeError {
    TimeError::invalid_anchor("interval leaves the representable range")
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>> {
    at_time(ymd(year, month, 1)?, 0, 0, 0)
}

/// Turns an anchor into a `(start, end)` pair.
#[derive(Debug, Clone, Copy)]
pub enum Interval {
    /// `(t, t)`.
    Instant,
    /// `(t, t + 1 day)`.
    Day,
    /// `(t + start, t + end)`; offsets may be negative.
    Offsets { start: TimeDelta, end: TimeDelta },
    /// The calendar month containing `t`.
    Month,
    /// The calendar year containing `t`.
    Year,
    Custom(IntervalFn),
}

impl Interval {
    /// Symmetric window of `radius` around the anchor.
    pub fn around(radius: TimeDelta) -> Self {
        Interval::Offsets {
            start: -radius,
            end: radius,
        }
    }

    pub fn apply(&self, anchor: DateTime<Utc>) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        match self {
            Interval::Instant => Ok((anchor, anchor)),
            Interval::Day => {
                let end = anchor.checked_add_signed(TimeDelta::days(1)).ok_or_else(overflow)?;
                Ok((anchor, end))
            }
            Interval::Offsets { start, end } => {
                let from = anchor.checked_add_signed(*start).ok_or_else(overflow)?;
                let to = anchor.checked_add_signed(*end).ok_or_else(overflow)?;
                Ok((from, to))
            }
            Interval::Month => {
                let (year, month) = (anchor.year(), anchor.month());
                let (next_year, next_month) = if month == 12 {
                    (year.checked_add(1).ok_or_else(overflow)?, 1)
                } else {
                    (year, month + 1)
                };
                Ok((month_start(year, month)?, month_start(next_year, next_month)?))
            }
            Interval::Year => {
                let year = anchor.year();
                let next = year.checked_add(1).ok_or_else(overflow)?;
                Ok((month_start(year, 1)?, month_start(next, 1)?))
            }
            Interval::Custom(apply) => apply(anchor),
        }
    }
}

/// A named filename pattern with its anchor and interval policies.
#[derive(Clone)]
pub struct TimeRule {
    name: String,
    pattern: Regex,
    anchor: Anchor,
    interval: Interval,
}

impl TimeRule {
    /// Compiles `pattern` and checks it exposes every group `anchor` needs.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        anchor: Anchor,
        interval: Interval,
    ) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|error| TimeError::InvalidPattern {
            rule: name.clone(),
            message: error.to_string(),
        })?;
        for group in anchor.required_groups().iter().copied() {
            if !pattern.capture_names().flatten().any(|n| n == group) {
                return Err(TimeError::MissingGroup {
                    rule: name,
                    group,
                });
            }
        }
        Ok(Self {
            name,
            pattern,
            anchor,
            interval,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Captures of the first match of the pattern anywhere in `input`.
    pub fn captures(&self, input: &str) -> Option<Captures> {
        self.pattern
            .captures(input)
            .map(|caps| Captures::from_match(&self.pattern, &caps))
    }

    /// Builds the interval for captures produced by this rule.
    pub fn interval_for(&self, captures: &Captures) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let anchor = self.anchor.build(captures)?;
        self.interval.apply(anchor)
    }
}

impl fmt::Debug for TimeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("anchor", &self.anchor)
            .field("interval", &self.interval)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(pairs: &[(&str, &str)]) -> Captures {
        pairs.iter().copied().collect()
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn ymd_anchor_with_optional_time() {
        let anchor = Anchor::YearMonthDay
            .build(&caps(&[("year", "2019"), ("month", "07"), ("day", "04")]))
            .unwrap();
        assert_eq!(anchor, utc(2019, 7, 4));

        let anchor = Anchor::YearMonthDay
            .build(&caps(&[
                ("year", "2019"),
                ("month", "07"),
                ("day", "04"),
                ("hour", "13"),
                ("minute", "05"),
                ("second", "59"),
            ]))
            .unwrap();
        assert_eq!(anchor, Utc.with_ymd_and_hms(2019, 7, 4, 13, 5, 59).unwrap());
    }

    #[test]
    fn impossible_anchors_fail() {
        let err = Anchor::YearMonth
            .build(&caps(&[("year", "2020"), ("month", "13")]))
            .unwrap_err();
        assert!(matches!(err, TimeError::InvalidAnchor { .. }));

        assert!(Anchor::YearDayOfYear
            .build(&caps(&[("year", "2023"), ("doy", "366")]))
            .is_err());
        assert_eq!(
            Anchor::YearDayOfYear
                .build(&caps(&[("year", "2024"), ("doy", "366")]))
                .unwrap(),
            utc(2024, 12, 31)
        );
    }

    #[test]
    fn calendar_intervals() {
        assert_eq!(
            Interval::Month.apply(utc(2024, 2, 1)).unwrap(),
            (utc(2024, 2, 1), utc(2024, 3, 1))
        );
        assert_eq!(
            Interval::Month.apply(utc(2023, 12, 15)).unwrap(),
            (utc(2023, 12, 1), utc(2024, 1, 1))
        );
        assert_eq!(
            Interval::Year.apply(utc(2023, 6, 1)).unwrap(),
            (utc(2023, 1, 1), utc(2024, 1, 1))
        );
    }

    #[test]
    fn offsets_go_both_ways() {
        let t = utc(2024, 1, 1);
        let (start, end) = Interval::around(TimeDelta::hours(12)).apply(t).unwrap();
        assert_eq!(start, utc(2023, 12, 31) + TimeDelta::hours(12));
        assert_eq!(end, t + TimeDelta::hours(12));
    }

    #[test]
    fn construction_checks_groups() {
        let err = TimeRule::new("broken", r"(?P<year>\d{4})", Anchor::YearMonth, Interval::Month)
            .unwrap_err();
        assert_eq!(
            err,
            TimeError::MissingGroup {
                rule: "broken".to_string(),
                group: "month"
            }
        );
        assert!(matches!(
            TimeRule::new("bad", r"(", Anchor::Year, Interval::Year),
            Err(TimeError::InvalidPattern { .. })
        ));
    }
}
