//! Time coverage extraction from file names and attribute values.
//!
//! A [`TimeRule`] pairs a filename pattern with an [`Anchor`] builder and an
//! [`Interval`] policy. [`find_time_coverage`] evaluates an ordered rule list
//! and returns the coverage of the first rule that matches.

pub mod error;
pub mod matcher;
pub mod parse;
pub mod rule;

pub use error::{Result, TimeError};
pub use matcher::{TimeCoverage, find_time_coverage};
pub use parse::parse_timestamp;
pub use rule::{Anchor, AnchorFn, Captures, Interval, IntervalFn, TimeRule};
