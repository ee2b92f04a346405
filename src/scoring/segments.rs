use serde::Serialize;
use std::cmp::Ordering;

use crate::scoring::{ScoreTier, ScoredEntry};

/// Disjoint partition of a scored batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Segments {
    pub winners: Vec<ScoredEntry>,
    pub losers: Vec<ScoredEntry>,
    pub testing: Vec<ScoredEntry>,
    pub potentials: Vec<ScoredEntry>,
}

impl Segments {
    pub fn len(&self) -> usize {
        self.winners.len() + self.losers.len() + self.testing.len() + self.potentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Winner,
    Loser,
    Testing,
    Potential,
}

impl Segment {
    pub fn of(entry: &ScoredEntry) -> Self {
        if entry.tier == ScoreTier::Winner && !entry.is_testing {
            Segment::Winner
        } else if entry.tier == ScoreTier::Loser {
            Segment::Loser
        } else if entry.is_testing || entry.has_testing_label() {
            Segment::Testing
        } else {
            Segment::Potential
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Segmenter;

impl Segmenter {
    pub fn new() -> Self {
        Self
    }

    pub fn segment(&self, scored: &[ScoredEntry]) -> Segments {
        let mut segments = Segments::default();

        for entry in scored {
            let bucket = match Segment::of(entry) {
                Segment::Winner => &mut segments.winners,
                Segment::Loser => &mut segments.losers,
                Segment::Testing => &mut segments.testing,
                Segment::Potential => &mut segments.potentials,
            };
            bucket.push(entry.clone());
        }

        segments.winners.sort_by(|a, b| b.score.cmp(&a.score));
        segments.losers.sort_by(|a, b| a.score.cmp(&b.score));
        segments
            .testing
            .sort_by(|a, b| b.spend().partial_cmp(&a.spend()).unwrap_or(Ordering::Equal));
        segments.potentials.sort_by(|a, b| b.score.cmp(&a.score));

        segments
    }
}
