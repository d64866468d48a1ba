//! NOAA sunrise equation.

use crate::constants::solar::{
    HORIZON_ALTITUDE_DEG, J2000, OBLIQUITY_DEG, PERIHELION_DEG, SECONDS_PER_DAY, UNIX_EPOCH_JD,
};
use crate::solar::SiteLocation;
use chrono::{DateTime, NaiveDate, Utc};

/// Sunrise and sunset of one solar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunEvents {
    /// Sunrise instant.
    pub sunrise: DateTime<Utc>,
    /// Sunset instant.
    pub sunset: DateTime<Utc>,
}

/// Sunrise and sunset for the solar day of `date` at `site`.
///
/// Returns `None` during polar day or polar night, when the sun does not
/// cross the horizon.
pub fn sun_events(date: NaiveDate, site: &SiteLocation) -> Option<SunEvents> {
    let j2000_date = NaiveDate::from_ymd_opt(2000, 1, 1)?;
    #[allow(clippy::cast_precision_loss)]
    let day_number = (date - j2000_date).num_days() as f64;

    // Mean solar noon, in days since J2000.
    let mean_noon = day_number - site.longitude / 360.0;

    let anomaly = 0.985_600_28_f64.mul_add(mean_noon, 357.529_1).rem_euclid(360.0);
    let m = anomaly.to_radians();
    let centre = 1.9148 * m.sin() + 0.0200 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin();
    let ecliptic = (anomaly + centre + 180.0 + PERIHELION_DEG).rem_euclid(360.0);
    let lambda = ecliptic.to_radians();

    let transit = J2000 + mean_noon + 0.0053 * m.sin() - 0.0069 * (2.0 * lambda).sin();

    let sin_declination = lambda.sin() * OBLIQUITY_DEG.to_radians().sin();
    let cos_declination = sin_declination.asin().cos();
    let phi = site.latitude.to_radians();

    let cos_hour_angle = (HORIZON_ALTITUDE_DEG.to_radians().sin() - phi.sin() * sin_declination)
        / (phi.cos() * cos_declination);
    if !(-1.0..=1.0).contains(&cos_hour_angle) {
        return None;
    }
    let hour_angle = cos_hour_angle.acos().to_degrees();

    Some(SunEvents {
        sunrise: julian_to_utc(transit - hour_angle / 360.0)?,
        sunset: julian_to_utc(transit + hour_angle / 360.0)?,
    })
}

/// Convert a Julian date to a UTC instant, millisecond precision.
fn julian_to_utc(jd: f64) -> Option<DateTime<Utc>> {
    #[allow(clippy::cast_possible_truncation)]
    let millis = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY * 1000.0).round() as i64;
    DateTime::from_timestamp_millis(millis)
}
