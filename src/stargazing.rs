//! Stargazing window evaluation.
//!
//! A day qualifies when at least one of its dark-sky intervals, clipped to the
//! allowable clock-time range, still lasts the minimum duration. The range is
//! given in hours from the day's local midnight and may run past 24 to reach
//! into the following morning (16.0 to 26.0 is 4pm to 2am).
//!
//! Every dark interval of the day is checked and the results are OR-ed; a day
//! whose only qualifying interval is not the last one still qualifies.

use anyhow::Result;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::common::utils::{format_clock_hours, format_hours_minutes};
use crate::location::Location;
use crate::sky::{ConditionInterval, DayResult, SkyState, YearResult};

/// Minimum continuous darkness inside an allowable clock-time range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StargazingCriterion {
    min_duration: Duration,
    range_start_hours: f64,
    range_end_hours: f64,
}

impl StargazingCriterion {
    /// Build a criterion, rejecting non-positive durations and empty or inverted ranges.
    ///
    /// A range shorter than the duration is accepted with a warning; no day
    /// can satisfy it.
    pub fn new(min_duration: Duration, range_start_hours: f64, range_end_hours: f64) -> Result<Self> {
        if min_duration <= Duration::zero() {
            anyhow::bail!(
                "minimum stargazing duration must be positive (got {} minutes)",
                min_duration.num_minutes()
            );
        }
        if !range_start_hours.is_finite() || !range_end_hours.is_finite() {
            anyhow::bail!("stargazing range bounds must be finite numbers");
        }
        if range_end_hours <= range_start_hours {
            anyhow::bail!(
                "stargazing range end ({range_end_hours}) must be after its start ({range_start_hours})"
            );
        }

        let criterion = Self {
            min_duration,
            range_start_hours,
            range_end_hours,
        };
        if criterion.range_length() < min_duration {
            log_warning!(
                "Given time range ({}) is too short for the requested duration ({})",
                format_hours_minutes(criterion.range_length()),
                format_hours_minutes(min_duration)
            );
        }
        Ok(criterion)
    }

    /// Convenience constructor taking whole minutes.
    pub fn from_minutes(min_minutes: u32, range_start_hours: f64, range_end_hours: f64) -> Result<Self> {
        Self::new(
            Duration::minutes(i64::from(min_minutes)),
            range_start_hours,
            range_end_hours,
        )
    }

    pub fn min_duration(&self) -> Duration {
        self.min_duration
    }

    pub fn range_start_hours(&self) -> f64 {
        self.range_start_hours
    }

    pub fn range_end_hours(&self) -> f64 {
        self.range_end_hours
    }

    fn range_length(&self) -> Duration {
        hours_to_duration(self.range_end_hours - self.range_start_hours)
    }

    /// Absolute local bounds of the allowable range for `date`.
    pub fn range_on(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        (
            midnight + hours_to_duration(self.range_start_hours),
            midnight + hours_to_duration(self.range_end_hours),
        )
    }
}

fn hours_to_duration(hours: f64) -> Duration {
    Duration::milliseconds((hours * 3_600_000.0).round() as i64)
}

/// The part of a dark interval that falls inside the allowable range, if any.
pub fn clip_to_range(
    interval: &ConditionInterval<SkyState>,
    date: NaiveDate,
    criterion: &StargazingCriterion,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let (range_start, range_end) = criterion.range_on(date);
    let start = interval.start.max(range_start);
    let end = interval.end.min(range_end);
    (end > start).then_some((start, end))
}

fn interval_qualifies(
    interval: &ConditionInterval<SkyState>,
    date: NaiveDate,
    criterion: &StargazingCriterion,
) -> bool {
    let (range_start, range_end) = criterion.range_on(date);
    let overlap_start = interval.start.max(range_start);
    let overlap_end = interval.end.min(range_end);
    overlap_end - overlap_start >= criterion.min_duration
}

/// Whether any of `intervals` yields a long enough window on `date`.
pub fn evaluate_intervals(
    date: NaiveDate,
    intervals: &[ConditionInterval<SkyState>],
    criterion: &StargazingCriterion,
) -> bool {
    intervals
        .iter()
        .any(|interval| interval_qualifies(interval, date, criterion))
}

/// Whether the day offers a qualifying stargazing window.
pub fn evaluate_day(day: &DayResult, criterion: &StargazingCriterion) -> bool {
    evaluate_intervals(day.date(), day.dark_intervals(), criterion)
}

/// Longest clipped dark window of the day, regardless of the minimum duration.
pub fn best_window(
    day: &DayResult,
    criterion: &StargazingCriterion,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    day.dark_intervals()
        .iter()
        .filter_map(|interval| clip_to_range(interval, day.date(), criterion))
        .max_by_key(|(start, end)| *end - *start)
}

/// Qualification flag for every day of a year.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct StargazingCalendar {
    days: BTreeMap<NaiveDate, bool>,
}

impl StargazingCalendar {
    pub fn get(&self, date: NaiveDate) -> Option<bool> {
        self.days.get(&date).copied()
    }

    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, bool)> + '_ {
        self.days.iter().map(|(date, flag)| (*date, *flag))
    }

    pub fn qualifying_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days
            .iter()
            .filter(|(_, flag)| **flag)
            .map(|(date, _)| *date)
    }

    pub fn count(&self) -> usize {
        self.days.values().filter(|flag| **flag).count()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Caption describing what a highlighted day means.
    pub fn summary(&self, location: &Location, criterion: &StargazingCriterion) -> String {
        format!(
            "Highlighted days have {} of continuous night sky with no moon between the hours of {} and {}. Location {} is at {}, {}.",
            format_hours_minutes(criterion.min_duration()),
            format_clock_hours(criterion.range_start_hours()),
            format_clock_hours(criterion.range_end_hours()),
            location.name(),
            location.latitude(),
            location.longitude(),
        )
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl FromIterator<(NaiveDate, bool)> for StargazingCalendar {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, bool)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

/// Evaluate every day of a computed year.
pub fn evaluate_year(year: &YearResult, criterion: &StargazingCriterion) -> StargazingCalendar {
    year.days()
        .map(|(date, day)| (*date, evaluate_day(day, criterion)))
        .collect()
}
