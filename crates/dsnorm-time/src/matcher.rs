//! First-match evaluation of time rules.

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::error::Result;
use crate::rule::TimeRule;

/// Temporal coverage derived from a path; both ends unknown when no rule
/// matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeCoverage {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl TimeCoverage {
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn is_known(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Evaluates `rules` in order against `input`.
///
/// The first rule whose pattern is found anywhere in `input` decides the
/// coverage; later rules are not consulted even if its captures turn out to
/// be invalid. No match yields [`TimeCoverage::unknown`].
pub fn find_time_coverage(rules: &[TimeRule], input: &str) -> Result<TimeCoverage> {
    for rule in rules {
        let Some(captures) = rule.captures(input) else {
            trace!(rule = rule.name(), input, "time rule did not match");
            continue;
        };
        let (start, end) = rule.interval_for(&captures)?;
        debug!(rule = rule.name(), input, %start, %end, "time rule matched");
        return Ok(TimeCoverage::between(start, end));
    }
    debug!(input, rules = rules.len(), "no time rule matched");
    Ok(TimeCoverage::unknown())
}
