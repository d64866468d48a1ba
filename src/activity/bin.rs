//! Time bin units.

use crate::error::{Error, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const MINUTES_PER_DAY: u32 = 1440;
const HOURS_PER_DAY: u32 = 24;
const MAX_DAYS: u32 = 36_500;

/// Fixed-width discretization unit for detection timestamps.
///
/// Minute and hour units must divide a day evenly so that stepping from one
/// floored bin always lands on the next floored bin. Day units are anchored
/// at 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinUnit {
    /// `n`-minute bins.
    Minutes(u32),
    /// `n`-hour bins.
    Hours(u32),
    /// `n`-day bins.
    Days(u32),
}

impl BinUnit {
    /// Width of one bin.
    pub fn duration(self) -> Duration {
        match self {
            Self::Minutes(n) => Duration::minutes(i64::from(n)),
            Self::Hours(n) => Duration::hours(i64::from(n)),
            Self::Days(n) => Duration::days(i64::from(n)),
        }
    }

    /// Floor a local timestamp to the start of its bin.
    pub fn floor(self, ts: NaiveDateTime) -> NaiveDateTime {
        let midnight = ts.date().and_time(NaiveTime::MIN);
        match self {
            Self::Minutes(n) => {
                let minute_of_day = ts.hour() * 60 + ts.minute();
                midnight + Duration::minutes(i64::from(minute_of_day / n * n))
            }
            Self::Hours(n) => midnight + Duration::hours(i64::from(ts.hour() / n * n)),
            Self::Days(n) => {
                let days = (ts.date() - NaiveDate::default()).num_days();
                let floored = days.div_euclid(i64::from(n)) * i64::from(n);
                (NaiveDate::default() + Duration::days(floored)).and_time(NaiveTime::MIN)
            }
        }
    }

    /// Every bin from `floor(start)` to `floor(end)` inclusive.
    ///
    /// If `start` floors after `end`, a single bin at `floor(start)` is returned.
    pub fn bins(self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<NaiveDateTime> {
        let first = self.floor(start);
        let last = self.floor(end).max(first);
        let step = self.duration();

        let mut bins = Vec::new();
        let mut current = first;
        while current <= last {
            bins.push(current);
            match current.checked_add_signed(step) {
                Some(next) => current = next,
                None => break,
            }
        }
        bins
    }
}

impl std::fmt::Display for BinUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minutes(n) => write!(f, "{n}min"),
            Self::Hours(n) => write!(f, "{n}h"),
            Self::Days(n) => write!(f, "{n}d"),
        }
    }
}

impl std::str::FromStr for BinUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidBinUnit {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim().to_lowercase();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| invalid("missing unit suffix (min, h, d)"))?;
        let (number, suffix) = trimmed.split_at(split);

        let count: u32 = if number.is_empty() {
            1
        } else {
            number.parse().map_err(|_| invalid("count is not a number"))?
        };
        if count == 0 {
            return Err(invalid("count must be at least 1"));
        }

        match suffix {
            "m" | "min" | "mins" | "minute" | "minutes" => {
                if MINUTES_PER_DAY % count != 0 {
                    return Err(invalid("minutes must divide 1440 evenly"));
                }
                Ok(Self::Minutes(count))
            }
            "h" | "hour" | "hours" => {
                if HOURS_PER_DAY % count != 0 {
                    return Err(invalid("hours must divide 24 evenly"));
                }
                Ok(Self::Hours(count))
            }
            "d" | "day" | "days" => {
                if count > MAX_DAYS {
                    return Err(invalid("days must be at most 36500"));
                }
                Ok(Self::Days(count))
            }
            _ => Err(invalid("unknown unit suffix (use min, h or d)")),
        }
    }
}
