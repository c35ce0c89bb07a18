//! Day sampling: one walk over a noon-to-noon window.
//!
//! The window opens at local noon on the requested date and closes at local
//! noon on the next date. Instants are generated by repeatedly adding the
//! timestep in UTC, so a daylight-saving change inside the window makes it 23
//! or 25 wall-clock hours long instead of shifting the samples. Each instant
//! is looked up in the ephemeris once, converted back to local wall-clock time
//! and classified; the three label tracks are then segmented independently.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::f64::consts::PI;

use super::classify::{
    MoonState, SkyState, SunState, classify_moon, classify_sky, classify_sun,
};
use super::day::{ConditionInterval, DayConditions, DayResult, DaySamples};
use super::segment::segment;
use crate::common::constants::{MOON_MARKER_SIZE, WINDOW_ANCHOR_HOUR};
use crate::ephemeris::Ephemeris;
use crate::location::Location;

/// Raw measurements at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub local_time: NaiveDateTime,
    pub sun_elevation: f64,
    pub moon_elevation: f64,
    pub moon_phase: f64,
    pub moon_brightness: f64,
}

/// Sample plus its derived labels.
#[derive(Debug, Clone, Copy)]
struct ClassifiedSample {
    sample: Sample,
    sun: SunState,
    moon: MoonState,
    sky: SkyState,
}

/// Moon brightness fraction in [0, 1] from the 28-unit phase.
///
/// `0.5 - 0.5 * cos(phase * π / 14)`: zero at new moon (phase 0), one at full
/// moon (phase 14). This is a smooth stand-in for the illuminated fraction,
/// not a photometric model; it ignores distance, libration and the opposition
/// surge.
pub fn moon_brightness(phase: f64) -> f64 {
    0.5 - 0.5 * (phase * PI / 14.0).cos()
}

/// Local noon on `date` in `tz`, resolved to the earliest mapping if ambiguous.
pub fn local_anchor(tz: Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    let anchor = date
        .and_hms_opt(WINDOW_ANCHOR_HOUR, 0, 0)
        .context("Invalid window anchor time")?;
    tz.from_local_datetime(&anchor)
        .earliest()
        .ok_or_else(|| anyhow::anyhow!("Local time {anchor} does not exist in {tz}"))
}

/// UTC bounds of the sampling window for `date`.
pub fn sampling_window(tz: Tz, date: NaiveDate) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let next = date
        .succ_opt()
        .with_context(|| format!("No calendar day follows {date}"))?;
    let start = local_anchor(tz, date)?.with_timezone(&Utc);
    let end = local_anchor(tz, next)?.with_timezone(&Utc);
    Ok((start, end))
}

/// Check that a timestep can produce at least two samples in a window of `window` length.
pub fn validate_timestep(timestep_minutes: u32, window: Duration) -> Result<Duration> {
    if timestep_minutes == 0 {
        anyhow::bail!("timestep must be a positive number of minutes (got 0)");
    }
    let step = Duration::minutes(i64::from(timestep_minutes));
    if step > window {
        anyhow::bail!(
            "timestep ({timestep_minutes} minutes) is longer than the sampling window ({} minutes)",
            window.num_minutes()
        );
    }
    Ok(step)
}

/// Ordered UTC sample instants for `date`, inclusive of both window bounds.
///
/// When the timestep does not divide the window the last regular step falls
/// short of the window end, and the end itself is appended as a shorter final
/// step.
pub fn sample_instants(
    location: &Location,
    date: NaiveDate,
    timestep_minutes: u32,
) -> Result<Vec<DateTime<Utc>>> {
    let (start, end) = sampling_window(location.timezone(), date)?;
    let step = validate_timestep(timestep_minutes, end - start)?;

    let mut instants = Vec::with_capacity(((end - start).num_minutes() / step.num_minutes()) as usize + 2);
    let mut current = start;
    while current <= end {
        instants.push(current);
        current += step;
    }
    if instants.last() != Some(&end) {
        instants.push(end);
    }
    Ok(instants)
}

fn take_sample<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &Location,
    instant: DateTime<Utc>,
) -> Result<Sample> {
    let observer = location.observer();
    let sun_elevation = ephemeris
        .sun_elevation(&observer, instant)
        .with_context(|| format!("Sun elevation lookup failed at {instant}"))?;
    let moon_elevation = ephemeris
        .moon_elevation(&observer, instant)
        .with_context(|| format!("Moon elevation lookup failed at {instant}"))?;
    let moon_phase = ephemeris
        .moon_phase(instant)
        .with_context(|| format!("Moon phase lookup failed at {instant}"))?;

    Ok(Sample {
        local_time: instant.with_timezone(&location.timezone()).naive_local(),
        sun_elevation,
        moon_elevation,
        moon_phase,
        moon_brightness: moon_brightness(moon_phase),
    })
}

/// Sample every instant of the day's window without classifying.
pub fn sample_day<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &Location,
    date: NaiveDate,
    timestep_minutes: u32,
) -> Result<Vec<Sample>> {
    sample_instants(location, date, timestep_minutes)?
        .into_iter()
        .map(|instant| take_sample(ephemeris, location, instant))
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to sample {date} for {}", location.name()))
}

/// Run the full day pipeline: sample, classify, segment.
pub fn compute_day<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &Location,
    date: NaiveDate,
    timestep_minutes: u32,
) -> Result<DayResult> {
    let samples = sample_day(ephemeris, location, date, timestep_minutes)?;

    let classified: Vec<ClassifiedSample> = samples
        .iter()
        .map(|&sample| {
            let sun = classify_sun(sample.sun_elevation);
            let moon = classify_moon(sample.moon_elevation);
            ClassifiedSample {
                sample,
                sun,
                moon,
                sky: classify_sky(sun, moon),
            }
        })
        .collect();

    let local_time = |c: &ClassifiedSample| c.sample.local_time;

    let sun = segment(&classified, local_time, |c| c.sun, |_| ())
        .into_iter()
        .map(ConditionInterval::from)
        .collect();
    let moon = segment(
        &classified,
        local_time,
        |c| c.moon,
        |c| c.sample.moon_brightness,
    )
    .into_iter()
    .map(ConditionInterval::from)
    .collect();
    let sky = segment(&classified, local_time, |c| c.sky, |_| ())
        .into_iter()
        .filter(|segment| segment.label == SkyState::Dark)
        .map(ConditionInterval::from)
        .collect();

    let series = DaySamples {
        timestamps: samples.iter().map(|s| s.local_time).collect(),
        sun_elevations: samples.iter().map(|s| s.sun_elevation).collect(),
        moon_elevations: samples.iter().map(|s| s.moon_elevation).collect(),
        moon_brightness_sizes: samples
            .iter()
            .map(|s| s.moon_brightness * MOON_MARKER_SIZE)
            .collect(),
    };

    let tz = location.timezone();
    let next = date
        .succ_opt()
        .with_context(|| format!("No calendar day follows {date}"))?;
    let window_start = local_anchor(tz, date)?.naive_local();
    let window_end = local_anchor(tz, next)?.naive_local();

    Ok(DayResult::new(
        location.clone(),
        date,
        window_start,
        window_end,
        DayConditions { sun, moon, sky },
        series,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::*;
    use crate::ephemeris::MockEphemeris;
    use chrono::Timelike;

    fn lincoln() -> Location {
        Location::new(
            "Lincoln, NH",
            "USA",
            TEST_TIMEZONE,
            TEST_LATITUDE,
            TEST_LONGITUDE,
        )
        .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_moon_brightness_boundaries() {
        assert!(moon_brightness(0.0).abs() < 1e-12);
        assert!((moon_brightness(14.0) - 1.0).abs() < 1e-12);
        assert!((moon_brightness(7.0) - 0.5).abs() < 1e-12);
        assert!((moon_brightness(21.0) - 0.5).abs() < 1e-12);
        assert!(moon_brightness(28.0).abs() < 1e-12);
    }

    #[test]
    fn test_instants_on_regular_day() {
        let instants = sample_instants(&lincoln(), date(2024, 6, 21), TEST_TIMESTEP).unwrap();
        // 24 hours at 3 minutes, both ends included
        assert_eq!(instants.len(), 481);
        // Noon EDT is 16:00 UTC
        assert_eq!(instants[0].hour(), 16);
        assert_eq!(*instants.last().unwrap() - instants[0], Duration::hours(24));
        for pair in instants.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::minutes(3));
        }
    }

    #[test]
    fn test_window_stretches_over_fall_back() {
        // US/Eastern leaves DST early on 2024-11-03
        let instants = sample_instants(&lincoln(), date(2024, 11, 2), 3).unwrap();
        assert_eq!(*instants.last().unwrap() - instants[0], Duration::hours(25));
        assert_eq!(instants.len(), 501);
    }

    #[test]
    fn test_window_shrinks_over_spring_forward() {
        let instants = sample_instants(&lincoln(), date(2024, 3, 9), 3).unwrap();
        assert_eq!(*instants.last().unwrap() - instants[0], Duration::hours(23));
        assert_eq!(instants.len(), 461);
    }

    #[test]
    fn test_irregular_final_step() {
        let instants = sample_instants(&lincoln(), date(2024, 6, 21), 7).unwrap();
        // 1440 / 7 = 205 full steps (206 instants) plus the window end
        assert_eq!(instants.len(), 207);
        let n = instants.len();
        assert_eq!(instants[n - 1] - instants[n - 2], Duration::minutes(5));
    }

    #[test]
    fn test_invalid_timesteps_rejected() {
        assert!(sample_instants(&lincoln(), date(2024, 6, 21), 0).is_err());
        assert!(sample_instants(&lincoln(), date(2024, 6, 21), 24 * 60 + 1).is_err());
        // A single step spanning the whole window still gives two samples
        let instants = sample_instants(&lincoln(), date(2024, 6, 21), 24 * 60).unwrap();
        assert_eq!(instants.len(), 2);
    }

    #[test]
    fn test_ephemeris_failure_aborts_day() {
        let mut ephemeris = MockEphemeris::new();
        ephemeris
            .expect_sun_elevation()
            .returning(|_, _| Err(anyhow::anyhow!("ephemeris offline")));

        let err = compute_day(&ephemeris, &lincoln(), date(2024, 6, 21), 3).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("ephemeris offline"));
        assert!(chain.contains("2024-06-21"));
    }

    #[test]
    fn test_constant_sky_yields_one_interval_per_track() {
        let mut ephemeris = MockEphemeris::new();
        ephemeris.expect_sun_elevation().returning(|_, _| Ok(-40.0));
        ephemeris.expect_moon_elevation().returning(|_, _| Ok(-30.0));
        ephemeris.expect_moon_phase().returning(|_| Ok(14.0));

        let day = compute_day(&ephemeris, &lincoln(), date(2024, 6, 21), 30).unwrap();
        assert_eq!(day.sun_intervals().len(), 1);
        assert_eq!(day.moon_intervals().len(), 1);
        assert_eq!(day.dark_intervals().len(), 1);

        let sun = &day.sun_intervals()[0];
        assert_eq!(sun.state, SunState::Night);
        assert_eq!(sun.start, day.window_start());
        assert_eq!(sun.end, day.window_end());
        assert_eq!(day.moon_intervals()[0].brightness, Some(1.0));
        assert_eq!(day.samples().moon_brightness_sizes[0], MOON_MARKER_SIZE);
    }

    #[test]
    fn test_window_bounds_are_local_noon() {
        let mut ephemeris = MockEphemeris::new();
        ephemeris.expect_sun_elevation().returning(|_, _| Ok(10.0));
        ephemeris.expect_moon_elevation().returning(|_, _| Ok(10.0));
        ephemeris.expect_moon_phase().returning(|_| Ok(0.0));

        let day = compute_day(&ephemeris, &lincoln(), date(2024, 11, 2), 60).unwrap();
        assert_eq!(
            day.window_start(),
            date(2024, 11, 2).and_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(
            day.window_end(),
            date(2024, 11, 3).and_hms_opt(12, 0, 0).unwrap()
        );
        assert_eq!(day.samples().timestamps.first(), Some(&day.window_start()));
        assert_eq!(day.samples().timestamps.last(), Some(&day.window_end()));
        assert!(day.dark_intervals().is_empty());
    }
}
