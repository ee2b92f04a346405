pub mod aggregate;
pub mod analysis;
pub mod api;
pub mod config;
pub mod entry;
pub mod error;
pub mod hooks;
pub mod metrics;
pub mod record;
pub mod recommend;
pub mod scoring;
pub mod server;

pub use aggregate::{mean_std, winsorize, z_score, Aggregates, MeanStd};
pub use analysis::{
    AnalysisResult, CreativeReport, HookReport, Mode, OfferReport, SenseiEngine,
};
pub use config::AnalysisConfig;
pub use entry::{CanonicalEntry, EntityKind};
pub use error::{ApiError, ConfigError};
pub use hooks::{label_hook, HookCategory};
pub use metrics::{extract_metrics, Metrics};
pub use record::RawRecord;
pub use recommend::{Priority, Recommendation, RecommendationKind};
pub use scoring::{ScoreTier, ScoredEntry, Segments};

/// Creative performance analysis with the default configuration.
pub fn analyze_creative_performance(creatives: &[RawRecord]) -> CreativeReport {
    SenseiEngine::default().creative(creatives)
}

/// Offer/funnel analysis with the default configuration.
pub fn analyze_offer(campaigns: &[RawRecord]) -> OfferReport {
    SenseiEngine::default().offer(campaigns)
}

/// Hook/story analysis with the default configuration.
pub fn analyze_hooks(creatives: &[RawRecord]) -> HookReport {
    SenseiEngine::default().hooks(creatives)
}
