//! Month view: consecutive day results joined into one continuous strip.
//!
//! Renderers draw a month as a single band; this gathers the interval tracks
//! and sample series of every day of the month in date order, together with
//! the window start of the first day and the window end of the last.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::day::{DayConditions, DaySamples};
use super::year::YearResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthView {
    pub month: u32,
    pub month_name: String,
    pub days: usize,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub conditions: DayConditions,
    pub samples: DaySamples,
}

impl MonthView {
    /// Build the view for `month` (1-12) from a computed year.
    pub fn from_year(year: &YearResult, month: u32) -> Result<Self> {
        let first = NaiveDate::from_ymd_opt(year.year(), month, 1)
            .with_context(|| format!("Invalid month {month} (expected 1-12)"))?;

        let mut conditions = DayConditions::default();
        let mut samples = DaySamples::default();
        let mut window_start = None;
        let mut window_end = None;
        let mut days = 0;

        for date in first.iter_days().take_while(|date| date.month() == month) {
            let day = year
                .day(date)
                .with_context(|| format!("Year result has no entry for {date}"))?;

            if window_start.is_none() {
                window_start = Some(day.window_start());
            }
            window_end = Some(day.window_end());

            let day_conditions = day.conditions();
            conditions.sun.extend_from_slice(&day_conditions.sun);
            conditions.moon.extend_from_slice(&day_conditions.moon);
            conditions.sky.extend_from_slice(&day_conditions.sky);
            samples.extend_from(day.samples());
            days += 1;
        }

        Ok(Self {
            month,
            month_name: first.format("%B").to_string(),
            days,
            window_start: window_start.context("Month has no days")?,
            window_end: window_end.context("Month has no days")?,
            conditions,
            samples,
        })
    }
}
