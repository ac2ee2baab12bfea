use serde::{Deserialize, Serialize};

use crate::models::chart::ScaledPoint;
use crate::models::settings::ChartLayout;

/// Whether a domain can be drawn as a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataState {
    Sufficient,
    /// Fewer than two points, or every value equal
    InsufficientData,
}

/// A Y tick: data value and where it lands on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub y: f64,
}

/// Maps point indices to X and values to Y inside a padded viewport.
///
/// Both mappings floor their denominators, so a degenerate domain maps to
/// the plot edge instead of dividing by zero. Use [`LinearScale::state`]
/// to decide whether the result is worth drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub min: f64,
    pub max: f64,
    /// Number of points in the index domain
    pub count: usize,
}

impl LinearScale {
    pub fn new(layout: &ChartLayout, min: f64, max: f64, count: usize) -> Self {
        Self {
            width: layout.width,
            height: layout.height,
            padding: layout.padding,
            min,
            max,
            count,
        }
    }

    /// Scale whose value domain spans `values`. Empty input gives `[0, 0]`.
    pub fn for_values(layout: &ChartLayout, values: &[f64]) -> Self {
        let (min, max) = if values.is_empty() {
            (0.0, 0.0)
        } else {
            values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                })
        };
        Self::new(layout, min, max, values.len())
    }

    #[inline]
    pub fn x(&self, index: usize) -> f64 {
        let steps = self.count.saturating_sub(1).max(1) as f64;
        self.padding + (index as f64 / steps) * (self.width - 2.0 * self.padding)
    }

    #[inline]
    pub fn y(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        let span = if span == 0.0 { 1.0 } else { span };
        self.height - self.padding - ((value - self.min) / span) * (self.height - 2.0 * self.padding)
    }

    pub fn point(&self, index: usize, value: f64) -> ScaledPoint {
        ScaledPoint::new(self.x(index), self.y(value))
    }

    pub fn state(&self) -> DataState {
        if self.count < 2 || self.min == self.max {
            DataState::InsufficientData
        } else {
            DataState::Sufficient
        }
    }

    /// `intervals + 1` ticks from `min` to `max` inclusive.
    pub fn ticks(&self, intervals: usize) -> Vec<Tick> {
        tick_values(self.min, self.max, intervals)
            .into_iter()
            .map(|value| Tick { value, y: self.y(value) })
            .collect()
    }
}

/// `intervals + 1` evenly spaced values from `min` to `max` inclusive.
pub fn tick_values(min: f64, max: f64, intervals: usize) -> Vec<f64> {
    let k = intervals.max(1);
    (0..=k)
        .map(|i| min + (max - min) * i as f64 / k as f64)
        .collect()
}

/// Indices of the points that get an X label.
///
/// Picks `min(max_labels, count)` indices spread evenly over `0..count`,
/// always including the first and (when more than one label fits) the last.
pub fn label_indices(count: usize, max_labels: usize) -> Vec<usize> {
    let labels = max_labels.min(count);
    if labels == 0 {
        return Vec::new();
    }
    let last = (count - 1) as u64;
    let denom = (labels - 1).max(1) as u64;
    let mut indices: Vec<usize> = (0..labels as u64)
        // round(j * last / denom), half up, in integers
        .map(|j| ((2 * j * last + denom) / (2 * denom)) as usize)
        .collect();
    indices.dedup();
    indices
}

/// Round to the nearest integer with halves going toward +∞.
#[inline]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
