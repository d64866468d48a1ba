//! Night intervals over an observation window.

use crate::activity::{ObservationWindow, SolarInterval, to_local};
use crate::solar::{SiteLocation, sun_events};
use chrono::{Days, NaiveDateTime, TimeZone};

/// Nights (sunset to next sunrise) overlapping `window`.
///
/// Events are computed for every local calendar day from one day before the
/// window to one day after it and expressed in the wall clock of `tz`.
/// Intervals without any overlap are dropped; partial overlaps are kept
/// unclipped. Days without a sunrise or sunset (polar day or night) break
/// the chain and yield no interval.
pub fn night_intervals<Tz: TimeZone>(
    site: &SiteLocation,
    tz: &Tz,
    window: &ObservationWindow,
) -> Vec<SolarInterval> {
    let (Some(first), Some(last)) = (
        window.start.date().checked_sub_days(Days::new(1)),
        window.end.date().checked_add_days(Days::new(1)),
    ) else {
        return Vec::new();
    };

    let events: Vec<Option<(NaiveDateTime, NaiveDateTime)>> = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            sun_events(day, site)
                .map(|ev| (to_local(&ev.sunrise, tz), to_local(&ev.sunset, tz)))
        })
        .collect();

    events
        .windows(2)
        .filter_map(|pair| {
            let (_, sunset) = pair[0]?;
            let (sunrise, _) = pair[1]?;
            Some(SolarInterval {
                start: sunset,
                end: sunrise,
            })
        })
        .filter(|night| window.overlaps(night.start, night.end))
        .collect()
}
