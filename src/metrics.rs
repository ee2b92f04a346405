use serde::{Deserialize, Serialize};

use crate::record::{number_or, safe_divide, to_number, Field, MetricSource, RawRecord};

pub const SPEND_FIELDS: &[Field] = &[
    Field::Metric("spend"),
    Field::Metric("spend_eur"),
    Field::Record("spend"),
];

pub const REVENUE_FIELDS: &[Field] = &[
    Field::Metric("revenue"),
    Field::Metric("purchase_value"),
    Field::Metric("value"),
    Field::Record("revenue"),
];

pub const ROAS_FIELDS: &[Field] = &[Field::Metric("roas"), Field::Metric("return_on_ad_spend")];

pub const PURCHASE_FIELDS: &[Field] = &[
    Field::Metric("purchases"),
    Field::Metric("purchase"),
    Field::Metric("conversions"),
];

pub const ROAS_PREV_FIELDS: &[Field] = &[Field::Metric("roas_prev"), Field::Metric("roas_prev_7d")];

pub const CTR_PREV_FIELDS: &[Field] = &[Field::Metric("ctr_prev"), Field::Metric("ctr_prev_7d")];

/// Platform-specific ROAS reported as a list of `{action_type, value}` objects.
pub const PLATFORM_ROAS_FIELD: &str = "website_purchase_roas";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub spend: f64,
    pub revenue: f64,
    pub roas: f64,
    pub roas_prev: f64,
    pub ctr: f64,
    pub ctr_prev: f64,
    pub cpm: f64,
    pub impressions: f64,
    pub clicks: f64,
    pub purchases: f64,
    pub cpa: f64,
}

impl Metrics {
    fn sanitized(self) -> Self {
        Self {
            spend: finite_or_zero(self.spend),
            revenue: finite_or_zero(self.revenue),
            roas: finite_or_zero(self.roas),
            roas_prev: finite_or_zero(self.roas_prev),
            ctr: finite_or_zero(self.ctr),
            ctr_prev: finite_or_zero(self.ctr_prev),
            cpm: finite_or_zero(self.cpm),
            impressions: finite_or_zero(self.impressions),
            clicks: finite_or_zero(self.clicks),
            purchases: finite_or_zero(self.purchases),
            cpa: finite_or_zero(self.cpa),
        }
    }
}

/// Normalizes one raw record into the canonical metric set.
pub fn extract_metrics(record: &RawRecord) -> Metrics {
    let source = record.source();

    let spend = source.first_nonzero_or(SPEND_FIELDS, 0.0);
    let mut revenue = source.first_nonzero_or(REVENUE_FIELDS, 0.0);

    let mut roas = source.first_nonzero_or(ROAS_FIELDS, 0.0);
    if roas == 0.0 {
        roas = platform_roas(&source).unwrap_or(0.0);
    }
    if roas == 0.0 && spend != 0.0 && revenue != 0.0 {
        roas = safe_divide(revenue, spend, 0.0);
    }

    let impressions = number_or(source.metric("impressions"), 0.0);
    let clicks = number_or(source.metric("clicks"), 0.0);

    let ctr = source
        .metric("ctr")
        .and_then(to_number)
        .unwrap_or_else(|| per_impression(clicks, impressions, 100.0));
    let cpm = source
        .metric("cpm")
        .and_then(to_number)
        .unwrap_or_else(|| per_impression(spend, impressions, 1000.0));

    let purchases = source.first_nonzero_or(PURCHASE_FIELDS, 0.0);
    let cpa = if purchases > 0.0 {
        safe_divide(spend, purchases, 0.0)
    } else {
        0.0
    };

    let roas_prev = source.first_nonzero_or(ROAS_PREV_FIELDS, 0.0);
    let ctr_prev = source.first_nonzero_or(CTR_PREV_FIELDS, 0.0);

    if revenue == 0.0 && roas != 0.0 && spend != 0.0 {
        revenue = roas * spend;
    }

    Metrics {
        spend,
        revenue,
        roas,
        roas_prev,
        ctr,
        ctr_prev,
        cpm,
        impressions,
        clicks,
        purchases,
        cpa,
    }
    .sanitized()
}

fn platform_roas(source: &MetricSource<'_>) -> Option<f64> {
    let first = source.metric(PLATFORM_ROAS_FIELD)?.as_array()?.first()?;
    first.as_object()?.get("value").and_then(to_number)
}

fn per_impression(value: f64, impressions: f64, scale: f64) -> f64 {
    if impressions > 0.0 {
        safe_divide(value, impressions, 0.0) * scale
    } else {
        0.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

