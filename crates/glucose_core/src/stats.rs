//! crates/glucose_core/src/stats.rs
//!
//! Trend aggregation over a series of health readings. Everything here is pure:
//! the caller fetches the readings and this module only reduces them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{GlucoseReading, SymptomEntry};

/// Lower bound of the in-target glucose band, inclusive (mg/dL).
pub const TARGET_LOW: f64 = 70.0;
/// Upper bound of the in-target glucose band, inclusive (mg/dL).
pub const TARGET_HIGH: f64 = 180.0;
/// Below this many readings the trend is always [`Trend::Stable`].
pub const TREND_MIN_READINGS: usize = 6;
const IMPROVING_RATIO: f64 = 0.95;
const WORSENING_RATIO: f64 = 1.05;

/// One numeric data point of a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub context: String,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64, context: impl Into<String>) -> Self {
        Self {
            timestamp,
            value,
            context: context.into(),
        }
    }
}

impl From<&GlucoseReading> for Reading {
    fn from(reading: &GlucoseReading) -> Self {
        Reading::new(reading.recorded_at(), reading.level, reading.meal_context.as_ref())
    }
}

/// Flattens symptom logs so that every item is one reading of its severity.
pub fn symptom_readings(entries: &[SymptomEntry]) -> Vec<Reading> {
    entries
        .iter()
        .flat_map(|entry| {
            let at = entry.recorded_at();
            entry
                .symptoms
                .iter()
                .map(move |item| Reading::new(at, f64::from(item.severity), item.kind.as_ref()))
        })
        .collect()
}

/// Which kind of series is being summarized. Glucose series also get target bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Glucose,
    Symptom,
}

/// Direction of the series. Lower values count as better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Worsening,
    #[default]
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetBands {
    pub in_target: usize,
    pub above_target: usize,
    pub below_target: usize,
}

impl TargetBands {
    pub fn total(&self) -> usize {
        self.in_target + self.above_target + self.below_target
    }

    fn record(&mut self, level: f64) {
        if level < TARGET_LOW {
            self.below_target += 1;
        } else if level > TARGET_HIGH {
            self.above_target += 1;
        } else {
            self.in_target += 1;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    pub trend: Trend,
    /// Mean value per context tag seen in the input. Absent tags are omitted.
    pub context_averages: BTreeMap<String, f64>,
    pub context_counts: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_bands: Option<TargetBands>,
    pub window_days: u32,
}

impl Summary {
    fn empty(kind: SeriesKind, window_days: u32) -> Self {
        Self {
            average: 0.0,
            min: 0.0,
            max: 0.0,
            count: 0,
            trend: Trend::Stable,
            context_averages: BTreeMap::new(),
            context_counts: BTreeMap::new(),
            target_bands: (kind == SeriesKind::Glucose).then(TargetBands::default),
            window_days,
        }
    }
}

/// Reduces a reading series into a [`Summary`].
///
/// Readings are put in chronological order first (stable, so equal timestamps
/// keep their input order). An empty series yields the zero summary.
pub fn summarize(kind: SeriesKind, readings: &[Reading], window_days: u32) -> Summary {
    if readings.is_empty() {
        return Summary::empty(kind, window_days);
    }

    let mut ordered: Vec<&Reading> = readings.iter().collect();
    ordered.sort_by_key(|r| r.timestamp);
    let values: Vec<f64> = ordered.iter().map(|r| r.value).collect();

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut per_context: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for reading in &ordered {
        let slot = per_context.entry(reading.context.clone()).or_insert((0.0, 0));
        slot.0 += reading.value;
        slot.1 += 1;
    }

    let target_bands = (kind == SeriesKind::Glucose).then(|| {
        let mut bands = TargetBands::default();
        values.iter().for_each(|&v| bands.record(v));
        bands
    });

    Summary {
        average: round2(mean(&values)),
        min,
        max,
        count: values.len(),
        trend: trend_of(&values),
        context_averages: per_context
            .iter()
            .map(|(context, (sum, n))| (context.clone(), round2(sum / *n as f64)))
            .collect(),
        context_counts: per_context
            .into_iter()
            .map(|(context, (_, n))| (context, n))
            .collect(),
        target_bands,
        window_days,
    }
}

/// Compares the mean of the first third against the mean of the last third.
/// The third is `len / 3` (floor), so any remainder lands in the ignored middle.
pub fn trend_of(values: &[f64]) -> Trend {
    if values.len() < TREND_MIN_READINGS {
        return Trend::Stable;
    }
    let third = values.len() / 3;
    let first = mean(&values[..third]);
    let last = mean(&values[values.len() - third..]);

    if last < first * IMPROVING_RATIO {
        Trend::Improving
    } else if last > first * WORSENING_RATIO {
        Trend::Worsening
    } else {
        Trend::Stable
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Two decimals, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
