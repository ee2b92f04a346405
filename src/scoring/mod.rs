pub mod pipeline;
pub mod scorer;
pub mod segments;

pub use pipeline::{ScoredBatch, ScoringPipeline};
pub use scorer::{
    CreativeScorer, MomentumConfig, ScoreTier, ScoreWeights, ScoredEntry, ScoringRules,
    TESTING_SUFFIX,
};
pub use segments::{Segment, Segmenter, Segments};
