use flamewar_game::{BatchReport, MetricSeries};
use serde::Serialize;

/// Welford accumulator for mean and sample variance, plus the range.
#[derive(Debug, Clone)]
pub struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl RunningStats {
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub const fn count(&self) -> u32 {
        self.count
    }

    pub const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    pub fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub const fn min(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.min }
    }

    pub const fn max(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.max }
    }
}

/// Summary statistics of one metric series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSummary {
    pub name: &'static str,
    pub count: u32,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricSummary {
    pub fn from_series(series: &MetricSeries) -> Self {
        let mut stats = RunningStats::default();
        for value in &series.values {
            stats.add(*value);
        }
        Self {
            name: series.name,
            count: stats.count(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
            min: stats.min(),
            max: stats.max(),
        }
    }
}

pub fn summarize_report(report: &BatchReport) -> Vec<MetricSummary> {
    report.series().iter().map(MetricSummary::from_series).collect()
}

/// Equal-width bucket counts over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<u32>,
}

impl Histogram {
    /// Bucket `values` into `bins` buckets. The last bucket is closed on
    /// the right. A constant series lands in a single bucket.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        let bins = bins.max(1);
        let first = *values.first()?;
        let (min, max) = values
            .iter()
            .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let bins = if max > min { bins } else { 1 };
        let mut counts = vec![0u32; bins];
        #[allow(clippy::cast_precision_loss)]
        let width = (max - min) / bins as f64;
        for value in values {
            let slot = if width > 0.0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let raw = ((value - min) / width) as usize;
                raw.min(bins - 1)
            } else {
                0
            };
            counts[slot] += 1;
        }
        Some(Self { min, max, counts })
    }

    /// Lower edge of bucket `idx`.
    pub fn bucket_start(&self, idx: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let width = (self.max - self.min) / self.counts.len() as f64;
        #[allow(clippy::cast_precision_loss)]
        let offset = width * idx as f64;
        self.min + offset
    }

    /// One text bar per bucket, scaled so the tallest bucket is `width` wide.
    pub fn render(&self, width: usize) -> Vec<String> {
        let tallest = self.counts.iter().copied().max().unwrap_or(0).max(1);
        self.counts
            .iter()
            .enumerate()
            .map(|(idx, count)| {
                let bar = (*count as usize * width).div_ceil(tallest as usize);
                format!(
                    "{:>8.1} | {:<width$} {count}",
                    self.bucket_start(idx),
                    "#".repeat(bar)
                )
            })
            .collect()
    }
}
