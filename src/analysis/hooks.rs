use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::analysis::SenseiEngine;
use crate::entry::{canonicalize_all, CanonicalEntry, EntityKind};
use crate::metrics::Metrics;
use crate::record::{safe_divide, RawRecord};
use crate::recommend::{
    HookDetails, HookRef, Priority, Recommendation, RecommendationDetails, RecommendationKind,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    pub top_hooks: usize,
    pub weak_hooks: usize,
    /// Weak hooks are only reported when more buckets than this exist, so
    /// small batches never list a bucket as both top and weak.
    pub weak_hooks_min_buckets: usize,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            top_hooks: 3,
            weak_hooks: 3,
            weak_hooks_min_buckets: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookCreative {
    pub id: String,
    pub name: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookBucket {
    pub label: String,
    pub creatives: Vec<HookCreative>,
    pub total_spend: f64,
    pub total_revenue: f64,
    /// Spend-weighted ROAS of the bucket.
    pub avg_roas: f64,
    /// Percent of total batch spend.
    pub share_of_spend: f64,
}

impl HookBucket {
    fn new(label: String) -> Self {
        Self {
            label,
            creatives: Vec::new(),
            total_spend: 0.0,
            total_revenue: 0.0,
            avg_roas: 0.0,
            share_of_spend: 0.0,
        }
    }

    fn to_ref(&self) -> HookRef {
        HookRef {
            label: self.label.clone(),
            avg_roas: self.avg_roas,
            share_of_spend: self.share_of_spend,
            total_spend: self.total_spend,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookSummary {
    pub hook_count: usize,
    pub total_creatives: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookReport {
    pub summary: HookSummary,
    pub hooks: Vec<HookBucket>,
    pub recommendations: Vec<Recommendation>,
}

impl HookReport {
    fn empty() -> Self {
        Self {
            summary: HookSummary::default(),
            hooks: Vec::new(),
            recommendations: vec![Recommendation::no_data(
                "No creatives for hook analysis",
                "Hook analysis requires creatives with names or hook labels.",
            )],
        }
    }
}

impl SenseiEngine {
    /// Hook/story analysis: bucket creatives by hook label and rank the
    /// buckets by spend-weighted ROAS.
    pub fn hooks(&self, records: &[RawRecord]) -> HookReport {
        if records.is_empty() {
            tracing::debug!("hook analysis skipped: empty batch");
            return HookReport::empty();
        }

        let entries = canonicalize_all(records, EntityKind::Creative);
        let total_spend: f64 = entries.iter().map(|entry| entry.metrics.spend).sum();
        let hooks = bucket_by_hook(&entries, total_spend);
        let recommendations = self.hook_recommendations(&hooks);

        tracing::debug!(
            creatives = entries.len(),
            hooks = hooks.len(),
            "hook analysis complete"
        );

        HookReport {
            summary: HookSummary {
                hook_count: hooks.len(),
                total_creatives: entries.len(),
            },
            hooks,
            recommendations,
        }
    }

    fn hook_recommendations(&self, hooks: &[HookBucket]) -> Vec<Recommendation> {
        let config = &self.config.hooks;
        let mut recommendations = Vec::new();

        let top: Vec<HookRef> = hooks.iter().take(config.top_hooks).map(HookBucket::to_ref).collect();
        if !top.is_empty() {
            recommendations.push(Recommendation::new(
                RecommendationKind::HookWinners,
                Priority::High,
                "Top hooks identified",
                "These hook formats beat your account average significantly. Produce more creatives in this style.",
                RecommendationDetails::Hooks(HookDetails { hooks: top }),
            ));
        }

        if hooks.len() > config.weak_hooks_min_buckets {
            let start = hooks.len().saturating_sub(config.weak_hooks);
            let bottom: Vec<HookRef> = hooks[start..].iter().map(HookBucket::to_ref).collect();
            if !bottom.is_empty() {
                recommendations.push(Recommendation::new(
                    RecommendationKind::HookLosers,
                    Priority::Medium,
                    "Weak hook formats - reduce spend",
                    "Some hook clusters clearly below account ROAS. Consider reducing budget or pausing.",
                    RecommendationDetails::Hooks(HookDetails { hooks: bottom }),
                ));
            }
        }

        recommendations
    }
}

/// Buckets keep first-seen order before the stable ROAS sort, so ties stay
/// in input order.
fn bucket_by_hook(entries: &[CanonicalEntry], total_spend: f64) -> Vec<HookBucket> {
    let mut buckets: Vec<HookBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut weighted_roas: Vec<f64> = Vec::new();

    for entry in entries {
        let position = *index.entry(entry.hook_label.clone()).or_insert_with(|| {
            buckets.push(HookBucket::new(entry.hook_label.clone()));
            weighted_roas.push(0.0);
            buckets.len() - 1
        });

        let metrics = entry.metrics;
        let bucket = &mut buckets[position];
        bucket.creatives.push(HookCreative {
            id: entry.id.clone(),
            name: entry.name.clone(),
            metrics,
        });
        bucket.total_spend += metrics.spend;
        bucket.total_revenue += metrics.revenue;
        weighted_roas[position] += metrics.roas * metrics.spend;
    }

    for (bucket, weighted) in buckets.iter_mut().zip(weighted_roas) {
        bucket.avg_roas = safe_divide(weighted, bucket.total_spend, 0.0);
        bucket.share_of_spend = safe_divide(bucket.total_spend, total_spend, 0.0) * 100.0;
    }

    buckets.sort_by(|a, b| b.avg_roas.partial_cmp(&a.avg_roas).unwrap_or(Ordering::Equal));
    buckets
}
