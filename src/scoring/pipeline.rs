use crate::aggregate::{Aggregates, Aggregator};
use crate::entry::CanonicalEntry;
use crate::scoring::{CreativeScorer, ScoredEntry, Segmenter, Segments};

#[derive(Debug, Clone)]
pub struct ScoredBatch {
    pub aggregates: Aggregates,
    pub scored: Vec<ScoredEntry>,
    pub segments: Segments,
}

/// Aggregate once, score every entry against that baseline, then segment.
#[derive(Debug, Clone)]
pub struct ScoringPipeline {
    aggregator: Aggregator,
    scorer: CreativeScorer,
    segmenter: Segmenter,
}

impl ScoringPipeline {
    pub fn new(aggregator: Aggregator, scorer: CreativeScorer, segmenter: Segmenter) -> Self {
        Self {
            aggregator,
            scorer,
            segmenter,
        }
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn score(&self, entries: &[CanonicalEntry]) -> ScoredBatch {
        let aggregates = self.aggregator.summarize(entries);
        let scored: Vec<ScoredEntry> = entries
            .iter()
            .map(|entry| self.scorer.score(entry, &aggregates))
            .collect();
        let segments = self.segmenter.segment(&scored);

        ScoredBatch {
            aggregates,
            scored,
            segments,
        }
    }
}
