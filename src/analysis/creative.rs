use serde::Serialize;

use crate::aggregate::Aggregates;
use crate::analysis::SenseiEngine;
use crate::entry::{canonicalize_all, EntityKind};
use crate::record::RawRecord;
use crate::recommend::Recommendation;
use crate::scoring::ScoredEntry;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeSummary {
    pub total_creatives: usize,
    pub total_spend: f64,
    pub total_revenue: f64,
    pub avg_roas: f64,
    pub avg_ctr: f64,
    pub avg_cpm: f64,
}

impl From<&Aggregates> for CreativeSummary {
    fn from(aggregates: &Aggregates) -> Self {
        Self {
            total_creatives: aggregates.total_creatives,
            total_spend: aggregates.total_spend,
            total_revenue: aggregates.total_revenue,
            avg_roas: aggregates.avg_roas,
            avg_ctr: aggregates.avg_ctr,
            avg_cpm: aggregates.avg_cpm,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreativeReport {
    pub summary: CreativeSummary,
    pub scoring: Vec<ScoredEntry>,
    pub winners: Vec<ScoredEntry>,
    pub losers: Vec<ScoredEntry>,
    pub testing: Vec<ScoredEntry>,
    pub potentials: Vec<ScoredEntry>,
    pub recommendations: Vec<Recommendation>,
}

impl CreativeReport {
    fn empty() -> Self {
        Self {
            summary: CreativeSummary::default(),
            scoring: Vec::new(),
            winners: Vec::new(),
            losers: Vec::new(),
            testing: Vec::new(),
            potentials: Vec::new(),
            recommendations: vec![Recommendation::no_data(
                "No creatives provided",
                "Analysis requires at least one creative with metrics.",
            )],
        }
    }
}

impl SenseiEngine {
    /// Creative performance: score every creative against its batch and turn
    /// the resulting segments into recommendations.
    pub fn creative(&self, records: &[RawRecord]) -> CreativeReport {
        if records.is_empty() {
            tracing::debug!("creative analysis skipped: empty batch");
            return CreativeReport::empty();
        }

        let entries = canonicalize_all(records, EntityKind::Creative);
        let batch = self.pipeline.score(&entries);
        let recommendations = self.recommendations.build(&batch.aggregates, &batch.segments);

        tracing::debug!(
            creatives = entries.len(),
            winners = batch.segments.winners.len(),
            losers = batch.segments.losers.len(),
            testing = batch.segments.testing.len(),
            recommendations = recommendations.len(),
            "creative analysis complete"
        );

        let segments = batch.segments;
        CreativeReport {
            summary: CreativeSummary::from(&batch.aggregates),
            scoring: batch.scored,
            winners: segments.winners,
            losers: segments.losers,
            testing: segments.testing,
            potentials: segments.potentials,
            recommendations,
        }
    }
}
