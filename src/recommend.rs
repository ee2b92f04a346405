use serde::{Deserialize, Serialize};

use crate::aggregate::Aggregates;
use crate::scoring::{ScoredEntry, Segments};

pub const TESTING_SUGGESTION: &str =
    "Test for 2-3 days with fixed daily budget, then decide based on ROAS/CPA.";
pub const FATIGUE_SUGGESTION: &str =
    "Create 2-3 variants with same angle/hook but new visuals, music, or text overlay.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub budget_shift_winners: usize,
    pub budget_shift_losers: usize,
    pub testing_candidates: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            budget_shift_winners: 3,
            budget_shift_losers: 3,
            testing_candidates: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    BudgetShift,
    Testing,
    Fatigue,
    Generic,
    NoData,
    Offer,
    Creative,
    Targeting,
    FunnelOk,
    HookWinners,
    HookLosers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub details: RecommendationDetails,
}

impl Recommendation {
    pub fn new(
        kind: RecommendationKind,
        priority: Priority,
        title: &str,
        message: &str,
        details: RecommendationDetails,
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.to_string(),
            message: message.to_string(),
            details,
        }
    }

    pub fn no_data(title: &str, message: &str) -> Self {
        Self::new(
            RecommendationKind::NoData,
            Priority::Low,
            title,
            message,
            RecommendationDetails::empty(),
        )
    }
}

/// Payload driving a recommendation, serialized as a plain JSON object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecommendationDetails {
    BudgetShift(BudgetShiftDetails),
    Testing(TestingDetails),
    Fatigue(FatigueDetails),
    Campaigns(CampaignDetails),
    Hooks(HookDetails),
    Empty(EmptyDetails),
}

impl RecommendationDetails {
    pub fn empty() -> Self {
        RecommendationDetails::Empty(EmptyDetails {})
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmptyDetails {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
    pub roas: f64,
    pub spend: f64,
}

impl From<&ScoredEntry> for EntityRef {
    fn from(scored: &ScoredEntry) -> Self {
        Self {
            id: scored.entry.id.clone(),
            name: scored.entry.name.clone(),
            roas: scored.roas(),
            spend: scored.spend(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetShiftDetails {
    pub from_creatives: Vec<EntityRef>,
    pub to_creatives: Vec<EntityRef>,
    pub loser_spend: f64,
    pub estimated_daily_revenue_uplift: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestingDetails {
    pub candidates: Vec<EntityRef>,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FatiguedCreative {
    pub id: String,
    pub name: String,
    pub roas: f64,
    pub roas_delta: f64,
    pub spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FatigueDetails {
    pub creatives: Vec<FatiguedCreative>,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignRef {
    pub id: String,
    pub name: String,
    pub roas: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpm: Option<f64>,
    pub spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CampaignDetails {
    pub campaigns: Vec<CampaignRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookRef {
    pub label: String,
    pub avg_roas: f64,
    pub share_of_spend: f64,
    pub total_spend: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HookDetails {
    pub hooks: Vec<HookRef>,
}

#[derive(Debug, Clone, Default)]
pub struct RecommendationBuilder {
    config: RecommendationConfig,
}

impl RecommendationBuilder {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    /// Every rule is evaluated independently; the generic note is emitted
    /// only when none of them fired.
    pub fn build(&self, aggregates: &Aggregates, segments: &Segments) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if let Some(shift) = self.budget_shift(aggregates, segments) {
            recommendations.push(shift);
        }
        if let Some(testing) = self.testing(segments) {
            recommendations.push(testing);
        }
        if let Some(fatigue) = fatigue_alert(segments) {
            recommendations.push(fatigue);
        }

        if recommendations.is_empty() {
            recommendations.push(Recommendation::new(
                RecommendationKind::Generic,
                Priority::Low,
                "Account stable - focus on new tests",
                "No major issues detected. Use testing budget to find new hooks and creators.",
                RecommendationDetails::empty(),
            ));
        }

        recommendations
    }

    fn budget_shift(&self, aggregates: &Aggregates, segments: &Segments) -> Option<Recommendation> {
        if segments.winners.is_empty() || segments.losers.is_empty() || aggregates.total_spend <= 0.0
        {
            return None;
        }

        let top: Vec<&ScoredEntry> = segments
            .winners
            .iter()
            .take(self.config.budget_shift_winners)
            .collect();
        let worst: Vec<&ScoredEntry> = segments
            .losers
            .iter()
            .take(self.config.budget_shift_losers)
            .collect();

        let loser_spend: f64 = worst.iter().map(|entry| entry.spend()).sum();
        // +1 keeps the ratio defined when every top winner has zero spend.
        let top_spend: f64 = top.iter().map(|entry| entry.spend()).sum::<f64>() + 1.0;
        let weighted_winner_roas =
            top.iter().map(|entry| entry.roas() * entry.spend()).sum::<f64>() / top_spend;
        let uplift_roas = (weighted_winner_roas - aggregates.avg_roas).max(0.0);
        let estimated_extra_revenue = loser_spend * uplift_roas;

        Some(Recommendation::new(
            RecommendationKind::BudgetShift,
            Priority::High,
            "Shift budget from losers to winners",
            "Reduce spend on underperforming creatives and reallocate to top performers.",
            RecommendationDetails::BudgetShift(BudgetShiftDetails {
                from_creatives: worst.into_iter().map(EntityRef::from).collect(),
                to_creatives: top.into_iter().map(EntityRef::from).collect(),
                loser_spend,
                estimated_daily_revenue_uplift: estimated_extra_revenue.round() as i64,
            }),
        ))
    }

    fn testing(&self, segments: &Segments) -> Option<Recommendation> {
        if segments.testing.is_empty() {
            return None;
        }

        let candidates = segments
            .testing
            .iter()
            .take(self.config.testing_candidates)
            .map(EntityRef::from)
            .collect();

        Some(Recommendation::new(
            RecommendationKind::Testing,
            Priority::Medium,
            "Evaluate testing creatives",
            "Some creatives show early signals. Give them structured budget and timeline.",
            RecommendationDetails::Testing(TestingDetails {
                candidates,
                suggestion: TESTING_SUGGESTION.to_string(),
            }),
        ))
    }
}

fn fatigue_alert(segments: &Segments) -> Option<Recommendation> {
    let creatives: Vec<FatiguedCreative> = segments
        .winners
        .iter()
        .filter(|entry| entry.fatigue)
        .map(|entry| FatiguedCreative {
            id: entry.entry.id.clone(),
            name: entry.entry.name.clone(),
            roas: entry.roas(),
            roas_delta: entry.roas_delta,
            spend: entry.spend(),
        })
        .collect();

    if creatives.is_empty() {
        return None;
    }

    Some(Recommendation::new(
        RecommendationKind::Fatigue,
        Priority::High,
        "Ad fatigue detected - build variants",
        "Winner creatives losing performance. Replace before account crashes.",
        RecommendationDetails::Fatigue(FatigueDetails {
            creatives,
            suggestion: FATIGUE_SUGGESTION.to_string(),
        }),
    ))
}
