use serde::{Deserialize, Serialize};

use crate::entry::CanonicalEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Cap roas/ctr/cpm samples at `winsorize_percentile` before computing stats.
    pub winsorize: bool,
    pub winsorize_percentile: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            winsorize: true,
            winsorize_percentile: 0.95,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeanStd {
    pub mean: f64,
    pub std: f64,
}

/// Batch baseline shared read-only by every scoring call of that batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub total_creatives: usize,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub avg_roas: f64,
    pub avg_ctr: f64,
    pub avg_cpm: f64,
    pub roas_stats: MeanStd,
    pub ctr_stats: MeanStd,
    pub cpm_stats: MeanStd,
    pub spend_stats: MeanStd,
}

impl Aggregates {
    /// `share` of total batch spend, e.g. `0.03` for 3%.
    pub fn spend_share(&self, share: f64) -> f64 {
        self.total_spend * share
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator {
    config: AggregationConfig,
}

impl Aggregator {
    pub fn new(config: AggregationConfig) -> Self {
        Self { config }
    }

    pub fn summarize(&self, entries: &[CanonicalEntry]) -> Aggregates {
        let mut total_spend = 0.0;
        let mut total_revenue = 0.0;
        let mut roas_values = Vec::with_capacity(entries.len());
        let mut ctr_values = Vec::with_capacity(entries.len());
        let mut cpm_values = Vec::with_capacity(entries.len());
        let mut spend_values = Vec::with_capacity(entries.len());

        for entry in entries {
            let metrics = &entry.metrics;
            total_spend += metrics.spend;
            total_revenue += metrics.revenue;
            roas_values.push(metrics.roas);
            ctr_values.push(metrics.ctr);
            cpm_values.push(metrics.cpm);
            spend_values.push(metrics.spend);
        }

        if self.config.winsorize {
            let percentile = self.config.winsorize_percentile;
            roas_values = winsorize(&roas_values, percentile);
            ctr_values = winsorize(&ctr_values, percentile);
            cpm_values = winsorize(&cpm_values, percentile);
        }

        let roas_stats = mean_std(&roas_values);
        let ctr_stats = mean_std(&ctr_values);
        let cpm_stats = mean_std(&cpm_values);
        let spend_stats = mean_std(&spend_values);

        Aggregates {
            total_creatives: entries.len(),
            total_spend,
            total_revenue,
            avg_roas: roas_stats.mean,
            avg_ctr: ctr_stats.mean,
            avg_cpm: cpm_stats.mean,
            roas_stats,
            ctr_stats,
            cpm_stats,
            spend_stats,
        }
    }
}

/// Mean and Bessel-corrected standard deviation. Non-finite samples are
/// skipped; empty input is `{0, 0}` and a single sample has `std = 0`.
pub fn mean_std(values: &[f64]) -> MeanStd {
    let clean: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if clean.is_empty() {
        return MeanStd::default();
    }

    let count = clean.len() as f64;
    let mean = clean.iter().sum::<f64>() / count;
    if clean.len() == 1 {
        return MeanStd { mean, std: 0.0 };
    }

    let variance =
        clean.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1.0).max(1.0);
    MeanStd {
        mean,
        std: variance.sqrt(),
    }
}

/// Zero variance carries no signal.
pub fn z_score(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 || !std.is_finite() || !value.is_finite() {
        return 0.0;
    }
    (value - mean) / std
}

/// Caps every sample at the order statistic at `floor(n * percentile)`.
pub fn winsorize(values: &[f64], percentile: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let percentile = if percentile.is_finite() {
        percentile.clamp(0.0, 1.0)
    } else {
        1.0
    };
    let cap_index = ((sorted.len() as f64 * percentile).floor() as usize).min(sorted.len() - 1);
    let cap = sorted[cap_index];

    values.iter().map(|value| value.min(cap)).collect()
}
