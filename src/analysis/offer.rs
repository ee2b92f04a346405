use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregates;
use crate::analysis::SenseiEngine;
use crate::entry::{canonicalize_all, CanonicalEntry, EntityKind};
use crate::metrics::Metrics;
use crate::record::{percent_change, safe_divide, RawRecord};
use crate::recommend::{
    CampaignDetails, CampaignRef, Priority, Recommendation, RecommendationDetails,
    RecommendationKind,
};

const OFFER_CHECKLIST: [&str; 4] = [
    "Landing page conversion (Add-to-Cart → Purchase)",
    "Offer communication (Price, bundles, scarcity, social proof)",
    "Pixel events and tracking setup",
    "Mobile page speed",
];

const TARGETING_CHECKLIST: [&str; 4] = [
    "Test placements (Reels vs Feed)",
    "Compare Broad vs Interest targeting",
    "Check Frequency & Audience Overlap",
    "Test bidding strategy (Lowest Cost vs Cost Cap)",
];

const CREATIVE_SUGGESTION: &str =
    "Use Sensei to find better hooks (UGC, Problem/Solution vs static banners).";

/// Ratios against the batch averages that place a campaign in a funnel stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FunnelConfig {
    pub offer_min_ctr_ratio: f64,
    pub offer_max_roas_ratio: f64,
    pub creative_max_ctr_ratio: f64,
    pub creative_max_roas_ratio: f64,
    pub targeting_min_cpm_ratio: f64,
}

impl Default for FunnelConfig {
    fn default() -> Self {
        Self {
            offer_min_ctr_ratio: 1.1,
            offer_max_roas_ratio: 0.8,
            creative_max_ctr_ratio: 0.8,
            creative_max_roas_ratio: 0.9,
            targeting_min_cpm_ratio: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelType {
    /// Traffic clicks but does not buy.
    OfferIssue,
    /// Weak clicks and weak sales.
    CreativeIssue,
    /// Reach bought at a premium.
    TargetingIssue,
    Balanced,
}

impl FunnelType {
    /// First matching stage wins: offer, then creative, then targeting.
    pub fn classify(metrics: &Metrics, aggregates: &Aggregates, config: &FunnelConfig) -> Self {
        let Metrics { roas, ctr, cpm, .. } = *metrics;
        if ctr > aggregates.avg_ctr * config.offer_min_ctr_ratio
            && roas < aggregates.avg_roas * config.offer_max_roas_ratio
        {
            FunnelType::OfferIssue
        } else if ctr < aggregates.avg_ctr * config.creative_max_ctr_ratio
            && roas < aggregates.avg_roas * config.creative_max_roas_ratio
        {
            FunnelType::CreativeIssue
        } else if cpm > aggregates.avg_cpm * config.targeting_min_cpm_ratio {
            FunnelType::TargetingIssue
        } else {
            FunnelType::Balanced
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignAnalysis {
    #[serde(flatten)]
    pub entry: CanonicalEntry,
    pub funnel_type: FunnelType,
    /// Percent difference of this campaign's ROAS from the batch average.
    pub roas_delta_vs_avg: f64,
    /// Percent of total batch spend.
    pub spend_share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummary {
    pub total_campaigns: usize,
    pub avg_roas: f64,
    pub avg_ctr: f64,
    pub avg_cpm: f64,
    pub total_spend: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferReport {
    pub summary: OfferSummary,
    pub campaigns: Vec<CampaignAnalysis>,
    pub recommendations: Vec<Recommendation>,
}

impl OfferReport {
    fn empty() -> Self {
        Self {
            summary: OfferSummary::default(),
            campaigns: Vec::new(),
            recommendations: vec![Recommendation::no_data(
                "No campaigns provided",
                "Offer/Funnel analysis requires at least one campaign with spend/ROAS.",
            )],
        }
    }
}

impl SenseiEngine {
    /// Offer/funnel analysis: locate where in the click → purchase funnel
    /// each campaign loses money relative to the batch.
    pub fn offer(&self, records: &[RawRecord]) -> OfferReport {
        if records.is_empty() {
            tracing::debug!("offer analysis skipped: empty batch");
            return OfferReport::empty();
        }

        let entries = canonicalize_all(records, EntityKind::Campaign);
        let aggregates = self.pipeline.aggregator().summarize(&entries);
        let funnel = &self.config.funnel;

        let campaigns: Vec<CampaignAnalysis> = entries
            .into_iter()
            .map(|entry| {
                let funnel_type = FunnelType::classify(&entry.metrics, &aggregates, funnel);
                let roas_delta_vs_avg = percent_change(entry.metrics.roas, aggregates.avg_roas);
                let spend_share = safe_divide(entry.metrics.spend, aggregates.total_spend, 0.0) * 100.0;
                CampaignAnalysis {
                    entry,
                    funnel_type,
                    roas_delta_vs_avg,
                    spend_share,
                }
            })
            .collect();

        let recommendations = funnel_recommendations(&campaigns);

        tracing::debug!(
            campaigns = campaigns.len(),
            recommendations = recommendations.len(),
            "offer analysis complete"
        );

        OfferReport {
            summary: OfferSummary {
                total_campaigns: campaigns.len(),
                avg_roas: aggregates.avg_roas,
                avg_ctr: aggregates.avg_ctr,
                avg_cpm: aggregates.avg_cpm,
                total_spend: aggregates.total_spend,
                total_revenue: aggregates.total_revenue,
            },
            campaigns,
            recommendations,
        }
    }
}

fn funnel_recommendations(campaigns: &[CampaignAnalysis]) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    let offer = campaign_refs(campaigns, FunnelType::OfferIssue);
    if !offer.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationKind::Offer,
            Priority::High,
            "High CTR, low ROAS - Check offer/funnel",
            "Campaigns with good CTR but weak ROAS indicate issues in offer, landing page, or checkout.",
            RecommendationDetails::Campaigns(CampaignDetails {
                campaigns: offer,
                checklist: Some(checklist(&OFFER_CHECKLIST)),
                suggestion: None,
            }),
        ));
    }

    let creative = campaign_refs(campaigns, FunnelType::CreativeIssue);
    if !creative.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationKind::Creative,
            Priority::Medium,
            "Campaigns with creative issues identified",
            "Low CTR and low ROAS suggest uninteresting creatives/angles.",
            RecommendationDetails::Campaigns(CampaignDetails {
                campaigns: creative,
                checklist: None,
                suggestion: Some(CREATIVE_SUGGESTION.to_string()),
            }),
        ));
    }

    let targeting = campaign_refs(campaigns, FunnelType::TargetingIssue);
    if !targeting.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationKind::Targeting,
            Priority::Medium,
            "High CPM - Optimize targeting/placements",
            "Some campaigns buying reach at high CPMs. Review audiences, placements, and bidding.",
            RecommendationDetails::Campaigns(CampaignDetails {
                campaigns: targeting,
                checklist: Some(checklist(&TARGETING_CHECKLIST)),
                suggestion: None,
            }),
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(Recommendation::new(
            RecommendationKind::FunnelOk,
            Priority::Low,
            "Funnel looks healthy overall",
            "No major funnel bottlenecks detected. Focus on creative testing and scaling.",
            RecommendationDetails::empty(),
        ));
    }

    recommendations
}

fn campaign_refs(campaigns: &[CampaignAnalysis], funnel_type: FunnelType) -> Vec<CampaignRef> {
    campaigns
        .iter()
        .filter(|campaign| campaign.funnel_type == funnel_type)
        .map(|campaign| {
            let metrics = &campaign.entry.metrics;
            let (ctr, cpm) = match funnel_type {
                FunnelType::TargetingIssue => (None, Some(metrics.cpm)),
                _ => (Some(metrics.ctr), None),
            };
            CampaignRef {
                id: campaign.entry.id.clone(),
                name: campaign.entry.name.clone(),
                roas: metrics.roas,
                ctr,
                cpm,
                spend: metrics.spend,
            }
        })
        .collect()
}

fn checklist(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
