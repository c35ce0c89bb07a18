//! Per-day results handed to renderers and the stargazing evaluator.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::classify::{Component, ConditionState, MoonState, SkyState, SunState};
use super::segment::Segment;
use crate::location::Location;

/// A maximal run of one state on one component track.
///
/// Timestamps are local wall-clock values in the location's timezone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionInterval<S> {
    pub component: Component,
    pub state: S,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Moon brightness fraction at the closing sample (moon track only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
}

impl<S: ConditionState> ConditionInterval<S> {
    pub fn new(state: S, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            component: S::COMPONENT,
            state,
            start,
            end,
            brightness: None,
        }
    }

    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = Some(brightness);
        self
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl<S: ConditionState> From<Segment<S, ()>> for ConditionInterval<S> {
    fn from(segment: Segment<S, ()>) -> Self {
        Self::new(segment.label, segment.start, segment.end)
    }
}

impl<S: ConditionState> From<Segment<S, f64>> for ConditionInterval<S> {
    fn from(segment: Segment<S, f64>) -> Self {
        Self::new(segment.label, segment.start, segment.end).with_brightness(segment.aux)
    }
}

/// Interval tracks for one day. `sky` holds only dark intervals.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DayConditions {
    pub sun: Vec<ConditionInterval<SunState>>,
    pub moon: Vec<ConditionInterval<MoonState>>,
    pub sky: Vec<ConditionInterval<SkyState>>,
}

/// Raw sampled series, index-aligned.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DaySamples {
    pub timestamps: Vec<NaiveDateTime>,
    pub sun_elevations: Vec<f64>,
    pub moon_elevations: Vec<f64>,
    /// Moon brightness scaled by the renderer's marker size.
    pub moon_brightness_sizes: Vec<f64>,
}

impl DaySamples {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub(crate) fn extend_from(&mut self, other: &DaySamples) {
        self.timestamps.extend_from_slice(&other.timestamps);
        self.sun_elevations.extend_from_slice(&other.sun_elevations);
        self.moon_elevations.extend_from_slice(&other.moon_elevations);
        self.moon_brightness_sizes
            .extend_from_slice(&other.moon_brightness_sizes);
    }
}

/// Everything computed for one location and local calendar day.
///
/// The sampling window runs from local noon on `date` to local noon on the
/// following day, so a whole night sits inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayResult {
    location: Location,
    date: NaiveDate,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    conditions: DayConditions,
    samples: DaySamples,
}

impl DayResult {
    pub(crate) fn new(
        location: Location,
        date: NaiveDate,
        window_start: NaiveDateTime,
        window_end: NaiveDateTime,
        conditions: DayConditions,
        samples: DaySamples,
    ) -> Self {
        Self {
            location,
            date,
            window_start,
            window_end,
            conditions,
            samples,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn window_start(&self) -> NaiveDateTime {
        self.window_start
    }

    pub fn window_end(&self) -> NaiveDateTime {
        self.window_end
    }

    pub fn conditions(&self) -> &DayConditions {
        &self.conditions
    }

    pub fn samples(&self) -> &DaySamples {
        &self.samples
    }

    pub fn sun_intervals(&self) -> &[ConditionInterval<SunState>] {
        &self.conditions.sun
    }

    pub fn moon_intervals(&self) -> &[ConditionInterval<MoonState>] {
        &self.conditions.moon
    }

    /// Dark-sky intervals (sun in night, moon down).
    pub fn dark_intervals(&self) -> &[ConditionInterval<SkyState>] {
        &self.conditions.sky
    }

    /// Total time spent in `state` on the sun track.
    pub fn sun_state_duration(&self, state: SunState) -> Duration {
        self.conditions
            .sun
            .iter()
            .filter(|interval| interval.state == state)
            .map(ConditionInterval::duration)
            .fold(Duration::zero(), |acc, d| acc + d)
    }

    /// Total dark-sky time in the window.
    pub fn dark_duration(&self) -> Duration {
        self.conditions
            .sky
            .iter()
            .map(ConditionInterval::duration)
            .fold(Duration::zero(), |acc, d| acc + d)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
