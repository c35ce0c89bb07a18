//! Year aggregation: the day pipeline for every date of a calendar year.
//!
//! Days share no state, so the work can be spread over a worker pool. Results
//! are keyed by date, which makes the outcome independent of the order in
//! which workers finish. Any failing day aborts the whole year.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::day::DayResult;
use super::month::MonthView;
use super::sampler::compute_day;
use crate::ephemeris::Ephemeris;
use crate::location::Location;

/// Shared flag used to abort a running year computation.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            anyhow::bail!("year computation cancelled");
        }
        Ok(())
    }
}

/// Execution options for [`compute_year_with`].
#[derive(Debug, Clone, Default)]
pub struct YearOptions {
    /// Worker pool size. `0` or `1` computes days sequentially on the caller's thread.
    pub workers: usize,
    pub cancel: Option<CancellationToken>,
}

impl YearOptions {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel(workers: usize) -> Self {
        Self {
            workers,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Day results for every date of one year at one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearResult {
    location: Location,
    year: i32,
    days: BTreeMap<NaiveDate, DayResult>,
}

impl YearResult {
    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayResult> {
        self.days.get(&date)
    }

    /// Look up a day by ISO date string (`YYYY-MM-DD`).
    pub fn day_iso(&self, iso: &str) -> Option<&DayResult> {
        iso.parse::<NaiveDate>().ok().and_then(|date| self.day(date))
    }

    /// Days in calendar order.
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DayResult)> {
        self.days.iter()
    }

    /// Concatenated view of one month (1-12).
    pub fn month(&self, month: u32) -> Result<MonthView> {
        MonthView::from_year(self, month)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Every date from January 1 to December 31 of `year`.
pub fn dates_of_year(year: i32) -> Result<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1)
        .with_context(|| format!("Year {year} is out of range"))?;
    Ok(first
        .iter_days()
        .take_while(|date| date.year() == year)
        .collect())
}

/// Compute a year sequentially.
pub fn compute_year<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &Location,
    year: i32,
    timestep_minutes: u32,
) -> Result<YearResult> {
    compute_year_with(
        ephemeris,
        location,
        year,
        timestep_minutes,
        &YearOptions::sequential(),
    )
}

/// Compute a year with explicit execution options.
pub fn compute_year_with<E: Ephemeris + ?Sized>(
    ephemeris: &E,
    location: &Location,
    year: i32,
    timestep_minutes: u32,
    options: &YearOptions,
) -> Result<YearResult> {
    let dates = dates_of_year(year)?;
    let cancel = options.cancel.clone().unwrap_or_default();

    log_block_start!("Computing {} days of {year} for {}", dates.len(), location.name());
    if options.workers > 1 {
        log_indented!("Worker pool: {} threads", options.workers);
    }

    let day_for = |date: NaiveDate| -> Result<(NaiveDate, DayResult)> {
        cancel.check()?;
        let day = compute_day(ephemeris, location, date, timestep_minutes)
            .with_context(|| format!("Year {year} aborted at {date}"))?;
        Ok((date, day))
    };

    let days: BTreeMap<NaiveDate, DayResult> = if options.workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.workers)
            .build()
            .context("Failed to build worker pool")?;

        // Index of the earliest failed date so far; only later dates are skipped
        let first_failure = AtomicUsize::new(usize::MAX);
        let outcomes: Vec<Option<Result<(NaiveDate, DayResult)>>> = pool.install(|| {
            dates
                .par_iter()
                .enumerate()
                .map(|(index, &date)| {
                    if index > first_failure.load(Ordering::Relaxed) {
                        return None;
                    }
                    let outcome = day_for(date);
                    if outcome.is_err() {
                        first_failure.fetch_min(index, Ordering::Relaxed);
                    }
                    Some(outcome)
                })
                .collect()
        });

        // Every date before the earliest failure was computed, so the first
        // error in date order is the one a sequential run reports
        outcomes.into_iter().flatten().collect::<Result<BTreeMap<_, _>>>()?
    } else {
        dates
            .iter()
            .map(|&date| day_for(date))
            .collect::<Result<BTreeMap<_, _>>>()?
    };

    log_decorated!("Computed {} days", days.len());

    Ok(YearResult {
        location: location.clone(),
        year,
        days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::MockEphemeris;
    use crate::logger::Log;

    fn utc_location() -> Location {
        Location::new("Greenwich", "UK", "UTC", 51.48, 0.0).unwrap()
    }

    fn flat_ephemeris() -> MockEphemeris {
        let mut ephemeris = MockEphemeris::new();
        ephemeris.expect_sun_elevation().returning(|_, _| Ok(-30.0));
        ephemeris.expect_moon_elevation().returning(|_, _| Ok(-30.0));
        ephemeris.expect_moon_phase().returning(|_| Ok(0.0));
        ephemeris
    }

    #[test]
    fn test_dates_of_year_handles_leap_years() {
        assert_eq!(dates_of_year(2023).unwrap().len(), 365);
        let leap = dates_of_year(2024).unwrap();
        assert_eq!(leap.len(), 366);
        assert_eq!(leap[0], NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(
            *leap.last().unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_year_keyed_by_iso_date() {
        Log::set_enabled(false);
        let year = compute_year(&flat_ephemeris(), &utc_location(), 2023, 60).unwrap();
        assert_eq!(year.len(), 365);
        assert!(year.day_iso("2023-02-28").is_some());
        assert!(year.day_iso("2023-02-29").is_none());
        assert_eq!(year.day_iso("2023-07-04").unwrap().dark_intervals().len(), 1);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        Log::set_enabled(false);
        let ephemeris = flat_ephemeris();
        let sequential = compute_year(&ephemeris, &utc_location(), 2023, 60).unwrap();
        let parallel = compute_year_with(
            &ephemeris,
            &utc_location(),
            2023,
            60,
            &YearOptions::parallel(4),
        )
        .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_single_failing_day_aborts_year() {
        Log::set_enabled(false);
        let mut ephemeris = MockEphemeris::new();
        ephemeris.expect_sun_elevation().returning(|_, instant| {
            if instant.date_naive() == NaiveDate::from_ymd_opt(2023, 5, 10).unwrap() {
                Err(anyhow::anyhow!("no data"))
            } else {
                Ok(-30.0)
            }
        });
        ephemeris.expect_moon_elevation().returning(|_, _| Ok(-30.0));
        ephemeris.expect_moon_phase().returning(|_| Ok(0.0));

        let err = compute_year(&ephemeris, &utc_location(), 2023, 60).unwrap_err();
        assert!(format!("{err:#}").contains("no data"));

        let err = compute_year_with(
            &ephemeris,
            &utc_location(),
            2023,
            60,
            &YearOptions::parallel(3),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("no data"));
    }

    #[test]
    fn test_parallel_reports_earliest_failing_date() {
        Log::set_enabled(false);
        let failing = [
            NaiveDate::from_ymd_opt(2023, 3, 20).unwrap(),
            NaiveDate::from_ymd_opt(2023, 7, 3).unwrap(),
        ];
        let mut ephemeris = MockEphemeris::new();
        ephemeris.expect_sun_elevation().returning(move |_, instant| {
            if failing.contains(&instant.date_naive()) {
                Err(anyhow::anyhow!("no data for {}", instant.date_naive()))
            } else {
                Ok(-30.0)
            }
        });
        ephemeris.expect_moon_elevation().returning(|_, _| Ok(-30.0));
        ephemeris.expect_moon_phase().returning(|_| Ok(0.0));

        // The window of 2023-03-19 runs into the morning of 2023-03-20
        let err = compute_year(&ephemeris, &utc_location(), 2023, 60).unwrap_err();
        assert!(err.to_string().contains("aborted at 2023-03-19"), "{err:#}");

        for workers in [2, 3, 8] {
            for _ in 0..5 {
                let err = compute_year_with(
                    &ephemeris,
                    &utc_location(),
                    2023,
                    60,
                    &YearOptions::parallel(workers),
                )
                .unwrap_err();
                assert!(
                    err.to_string().contains("aborted at 2023-03-19"),
                    "{workers} workers: {err:#}"
                );
            }
        }
    }

    #[test]
    fn test_cancelled_token_stops_computation() {
        Log::set_enabled(false);
        let token = CancellationToken::new();
        token.cancel();
        let options = YearOptions::parallel(2).with_cancellation(token);
        let err = compute_year_with(&flat_ephemeris(), &utc_location(), 2023, 60, &options)
            .unwrap_err();
        assert!(err.to_string().contains("cancelled"));
    }
}
