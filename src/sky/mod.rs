//! Sky condition computation.
//!
//! ## Module Structure
//!
//! - [`classify`]: sun, moon and sky state labels and their classifiers
//! - [`segment`]: run-length segmentation of labelled samples
//! - [`sampler`]: the noon-to-noon day walk and the day pipeline
//! - [`day`]: day result types
//! - [`year`]: year aggregation, sequential or on a worker pool
//! - [`month`]: month strips assembled from a year

pub mod classify;
pub mod day;
pub mod month;
pub mod sampler;
pub mod segment;
pub mod year;

pub use classify::{
    Component, ConditionState, MoonState, SkyState, SunState, classify_moon, classify_sky,
    classify_sun,
};
pub use day::{ConditionInterval, DayConditions, DayResult, DaySamples};
pub use month::MonthView;
pub use sampler::{Sample, compute_day, moon_brightness, sample_day, sample_instants};
pub use segment::{Segment, Segmenter, segment};
pub use year::{
    CancellationToken, YearOptions, YearResult, compute_year, compute_year_with, dates_of_year,
};
