pub mod creative;
pub mod hooks;
pub mod offer;

use serde::Serialize;
use std::str::FromStr;

use crate::aggregate::Aggregator;
use crate::config::AnalysisConfig;
use crate::error::ApiError;
use crate::record::RawRecord;
use crate::recommend::RecommendationBuilder;
use crate::scoring::{CreativeScorer, ScoringPipeline, Segmenter};

pub use creative::{CreativeReport, CreativeSummary};
pub use hooks::{HookBucket, HookConfig, HookCreative, HookReport, HookSummary};
pub use offer::{CampaignAnalysis, FunnelConfig, FunnelType, OfferReport, OfferSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Creative,
    Offer,
    Hook,
    Full,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Creative, Mode::Offer, Mode::Hook, Mode::Full];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Creative => "creative",
            Mode::Offer => "offer",
            Mode::Hook => "hook",
            Mode::Full => "full",
        }
    }
}

impl FromStr for Mode {
    type Err = ApiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "creative" | "performance" => Ok(Mode::Creative),
            "offer" | "funnel" => Ok(Mode::Offer),
            "hook" | "hooks" => Ok(Mode::Hook),
            "full" | "all" => Ok(Mode::Full),
            "" => Err(ApiError::MissingMode),
            _ => Err(ApiError::UnknownMode(value.to_string())),
        }
    }
}

/// Result of one `run`; only the facades the mode asked for are present.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<CreativeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offer: Option<OfferReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<HookReport>,
}

/// Entry point wiring extraction, aggregation, scoring, segmentation and
/// recommendations for one configuration. Holds no per-batch state.
#[derive(Debug, Clone)]
pub struct SenseiEngine {
    config: AnalysisConfig,
    pipeline: ScoringPipeline,
    recommendations: RecommendationBuilder,
}

impl Default for SenseiEngine {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl SenseiEngine {
    pub fn new(config: AnalysisConfig) -> Self {
        let pipeline = ScoringPipeline::new(
            Aggregator::new(config.aggregation.clone()),
            CreativeScorer::new(
                config.weights.clone(),
                config.momentum.clone(),
                config.rules.clone(),
            ),
            Segmenter::new(),
        );
        let recommendations = RecommendationBuilder::new(config.recommendations.clone());

        Self {
            config,
            pipeline,
            recommendations,
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn pipeline(&self) -> &ScoringPipeline {
        &self.pipeline
    }

    /// Dispatches on `mode`. Single-facade modes require their input array;
    /// `Full` runs every facade whose input is present.
    pub fn run(
        &self,
        mode: Mode,
        creatives: Option<&[RawRecord]>,
        campaigns: Option<&[RawRecord]>,
    ) -> Result<AnalysisResult, ApiError> {
        let mut result = AnalysisResult::default();

        match mode {
            Mode::Creative => {
                let creatives = creatives.ok_or(ApiError::MissingArray {
                    mode: "creative",
                    field: "creatives",
                })?;
                result.performance = Some(self.creative(creatives));
            }
            Mode::Offer => {
                let campaigns = campaigns.ok_or(ApiError::MissingArray {
                    mode: "offer",
                    field: "campaigns",
                })?;
                result.offer = Some(self.offer(campaigns));
            }
            Mode::Hook => {
                let creatives = creatives.ok_or(ApiError::MissingArray {
                    mode: "hook",
                    field: "creatives",
                })?;
                result.hook = Some(self.hooks(creatives));
            }
            Mode::Full => {
                result.performance = creatives.map(|records| self.creative(records));
                result.offer = campaigns.map(|records| self.offer(records));
                result.hook = creatives.map(|records| self.hooks(records));
            }
        }

        Ok(result)
    }
}
