/// Bounded history of stats readings feeding the charts
///
/// A `SampleWindow` keeps the most recent readings of one container in
/// chronological order. Appending past capacity evicts from the head.

use chrono::{DateTime, Local};
use std::collections::VecDeque;

use crate::core::models::ContainerStats;
use crate::utils::WINDOW_CAPACITY;

/// One timestamped reading, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub cpu_percent: f64,
    pub memory_usage: f64,
    pub memory_limit: f64,
    pub memory_percent: f64,
    /// Wall-clock time the fetch completed
    pub taken_at: DateTime<Local>,
}

impl Sample {
    /// Build a sample, rounding every numeric field to two decimals once
    pub fn from_stats(stats: &ContainerStats, taken_at: DateTime<Local>) -> Self {
        Self {
            cpu_percent: round2(stats.cpu_percent),
            memory_usage: round2(stats.memory_usage),
            memory_limit: round2(stats.memory_limit),
            memory_percent: round2(stats.memory_percent),
            taken_at,
        }
    }

    /// Chart X label
    pub fn time_label(&self) -> String {
        self.taken_at.format("%H:%M:%S").to_string()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct SampleWindow {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleWindow {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            // Large windows grow on demand
            samples: VecDeque::with_capacity(capacity.min(WINDOW_CAPACITY) + 1),
            capacity,
        }
    }

    /// Append to the tail, evicting the oldest samples beyond capacity
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Current contents, oldest first
    pub fn to_sequence(&self) -> Vec<Sample> {
        self.samples.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> + '_ {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// (index, cpu %) points for a line chart
    pub fn cpu_points(&self) -> Vec<(f64, f64)> {
        self.points(|s| s.cpu_percent)
    }

    /// (index, memory %) points for a line chart
    pub fn memory_points(&self) -> Vec<(f64, f64)> {
        self.points(|s| s.memory_percent)
    }

    fn points(&self, value: impl Fn(&Sample) -> f64) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (i as f64, value(s)))
            .collect()
    }

    /// Min / average / max of a field over the window
    pub fn summary(&self, value: impl Fn(&Sample) -> f64) -> Option<WindowSummary> {
        if self.samples.is_empty() {
            return None;
        }

        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut sum = 0.0;
        for sample in &self.samples {
            let v = value(sample);
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }

        Some(WindowSummary {
            min,
            avg: round2(sum / self.samples.len() as f64),
            max,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSummary {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}
