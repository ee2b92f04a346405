use serde::{Deserialize, Serialize};

use crate::aggregate::{z_score, Aggregates};
use crate::entry::CanonicalEntry;
use crate::record::percent_change;

pub const TESTING_SUFFIX: &str = " (Testing)";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub base: f64,
    pub roas: f64,
    pub ctr: f64,
    pub cpm: f64,
    pub spend: f64,
    pub momentum: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: 50.0,
            roas: 12.0,
            ctr: 8.0,
            cpm: 6.0,
            spend: 4.0,
            momentum: 3.0,
        }
    }
}

/// Percent deltas are divided by `divisor` and clamped to `[-cap, cap]`, so
/// with the defaults a 40% move saturates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub divisor: f64,
    pub cap: f64,
    pub roas_share: f64,
    pub ctr_share: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            divisor: 20.0,
            cap: 2.0,
            roas_share: 0.6,
            ctr_share: 0.4,
        }
    }
}

/// Bonuses, penalties, label bands and flag rules. Spend thresholds are
/// fractions of total batch spend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub winner_score: u8,
    pub strong_score: u8,
    pub under_review_score: u8,
    pub loser_score: u8,
    pub high_roas_multiplier: f64,
    pub low_roas_multiplier: f64,
    pub high_spend_share: f64,
    pub low_spend_share: f64,
    pub no_conversion_spend_share: f64,
    pub clear_winner_bonus: f64,
    pub underperformer_penalty: f64,
    pub no_conversion_penalty: f64,
    pub testing_spend_share: f64,
    pub testing_mean_spend_ratio: f64,
    pub fatigue_roas_drop: f64,
    pub fatigue_spend_share: f64,
    pub roas_delta_note_pct: f64,
    pub ctr_delta_note_pct: f64,
    pub above_average_roas: f64,
    pub below_average_roas: f64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            winner_score: 80,
            strong_score: 65,
            under_review_score: 55,
            loser_score: 40,
            high_roas_multiplier: 1.4,
            low_roas_multiplier: 0.7,
            high_spend_share: 0.03,
            low_spend_share: 0.02,
            no_conversion_spend_share: 0.015,
            clear_winner_bonus: 6.0,
            underperformer_penalty: 8.0,
            no_conversion_penalty: 10.0,
            testing_spend_share: 0.01,
            testing_mean_spend_ratio: 0.6,
            fatigue_roas_drop: 0.7,
            fatigue_spend_share: 0.02,
            roas_delta_note_pct: 10.0,
            ctr_delta_note_pct: 8.0,
            above_average_roas: 1.2,
            below_average_roas: 0.8,
        }
    }
}

impl ScoringRules {
    pub fn tier(&self, score: u8) -> ScoreTier {
        if score >= self.winner_score {
            ScoreTier::Winner
        } else if score >= self.strong_score {
            ScoreTier::Strong
        } else if score <= self.loser_score {
            ScoreTier::Loser
        } else if score <= self.under_review_score {
            ScoreTier::UnderReview
        } else {
            ScoreTier::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Winner,
    Strong,
    Neutral,
    UnderReview,
    Loser,
}

impl ScoreTier {
    pub fn label(self) -> &'static str {
        match self {
            ScoreTier::Winner => "Winner",
            ScoreTier::Strong => "Strong",
            ScoreTier::Neutral => "Neutral",
            ScoreTier::UnderReview => "Under Review",
            ScoreTier::Loser => "Loser",
        }
    }

    /// Only an otherwise neutral label is qualified as testing.
    pub fn display(self, is_testing: bool) -> String {
        if is_testing && self == ScoreTier::Neutral {
            format!("{}{}", self.label(), TESTING_SUFFIX)
        } else {
            self.label().to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: CanonicalEntry,
    pub score: u8,
    pub label: String,
    pub tier: ScoreTier,
    pub is_testing: bool,
    pub fatigue: bool,
    pub roas_delta: f64,
    pub ctr_delta: f64,
    pub reasoning: Vec<String>,
}

impl ScoredEntry {
    pub fn spend(&self) -> f64 {
        self.entry.metrics.spend
    }

    pub fn roas(&self) -> f64 {
        self.entry.metrics.roas
    }

    pub fn has_testing_label(&self) -> bool {
        self.label.ends_with(TESTING_SUFFIX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreativeScorer {
    weights: ScoreWeights,
    momentum: MomentumConfig,
    rules: ScoringRules,
}

impl CreativeScorer {
    pub fn new(weights: ScoreWeights, momentum: MomentumConfig, rules: ScoringRules) -> Self {
        Self {
            weights,
            momentum,
            rules,
        }
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn score(&self, entry: &CanonicalEntry, aggregates: &Aggregates) -> ScoredEntry {
        let metrics = &entry.metrics;
        let stats = aggregates;

        let z_roas = z_score(metrics.roas, stats.roas_stats.mean, stats.roas_stats.std);
        let z_ctr = z_score(metrics.ctr, stats.ctr_stats.mean, stats.ctr_stats.std);
        let z_cpm = -z_score(metrics.cpm, stats.cpm_stats.mean, stats.cpm_stats.std);
        let z_spend = z_score(metrics.spend, stats.spend_stats.mean, stats.spend_stats.std);

        let roas_delta = percent_change(metrics.roas, metrics.roas_prev);
        let ctr_delta = percent_change(metrics.ctr, metrics.ctr_prev);
        let momentum = self.momentum(roas_delta, ctr_delta);

        let weights = &self.weights;
        let mut raw = weights.base
            + weights.roas * z_roas
            + weights.ctr * z_ctr
            + weights.cpm * z_cpm
            + weights.spend * z_spend
            + weights.momentum * momentum;
        raw += self.adjustment(entry, aggregates);

        let score = if raw.is_finite() {
            raw.round().clamp(0.0, 100.0) as u8
        } else {
            0
        };

        let tier = self.rules.tier(score);
        let is_testing = self.is_testing(entry, aggregates);
        let fatigue = self.is_fatigued(entry, aggregates);
        let reasoning = self.reasoning(entry, aggregates, roas_delta, ctr_delta, fatigue);

        ScoredEntry {
            entry: entry.clone(),
            score,
            label: tier.display(is_testing),
            tier,
            is_testing,
            fatigue,
            roas_delta,
            ctr_delta,
            reasoning,
        }
    }

    pub fn momentum(&self, roas_delta: f64, ctr_delta: f64) -> f64 {
        let config = &self.momentum;
        let cap = config.cap.abs();
        let step = |delta: f64| {
            if config.divisor == 0.0 {
                return 0.0;
            }
            (delta / config.divisor).max(-cap).min(cap)
        };
        config.roas_share * step(roas_delta) + config.ctr_share * step(ctr_delta)
    }

    fn adjustment(&self, entry: &CanonicalEntry, aggregates: &Aggregates) -> f64 {
        let rules = &self.rules;
        let metrics = &entry.metrics;
        let mut adjustment = 0.0;

        if metrics.roas > aggregates.avg_roas * rules.high_roas_multiplier
            && metrics.spend > aggregates.spend_share(rules.high_spend_share)
        {
            adjustment += rules.clear_winner_bonus;
        }

        if metrics.roas < aggregates.avg_roas * rules.low_roas_multiplier
            && metrics.spend > aggregates.spend_share(rules.low_spend_share)
        {
            adjustment -= rules.underperformer_penalty;
        }

        if metrics.purchases == 0.0
            && metrics.spend > aggregates.spend_share(rules.no_conversion_spend_share)
        {
            adjustment -= rules.no_conversion_penalty;
        }

        adjustment
    }

    fn is_testing(&self, entry: &CanonicalEntry, aggregates: &Aggregates) -> bool {
        let rules = &self.rules;
        let ceiling = (aggregates.spend_stats.mean * rules.testing_mean_spend_ratio)
            .max(aggregates.spend_share(rules.testing_spend_share));
        entry.metrics.spend < ceiling && entry.is_active()
    }

    fn is_fatigued(&self, entry: &CanonicalEntry, aggregates: &Aggregates) -> bool {
        let rules = &self.rules;
        let metrics = &entry.metrics;
        metrics.roas_prev > 0.0
            && metrics.roas < metrics.roas_prev * rules.fatigue_roas_drop
            && metrics.spend > aggregates.spend_share(rules.fatigue_spend_share)
    }

    fn reasoning(
        &self,
        entry: &CanonicalEntry,
        aggregates: &Aggregates,
        roas_delta: f64,
        ctr_delta: f64,
        fatigue: bool,
    ) -> Vec<String> {
        let rules = &self.rules;
        let metrics = &entry.metrics;
        let mut reasoning = Vec::new();

        if metrics.roas_prev != 0.0 && roas_delta.abs() > rules.roas_delta_note_pct {
            reasoning.push(format!(
                "ROAS {}{:.1}% vs. previous period",
                sign(roas_delta),
                roas_delta.abs()
            ));
        }

        if metrics.ctr_prev != 0.0 && ctr_delta.abs() > rules.ctr_delta_note_pct {
            let note = if ctr_delta < 0.0 {
                "Hook losing effectiveness"
            } else {
                "Hook gaining traction"
            };
            reasoning.push(format!(
                "CTR {}{:.1}% ({})",
                sign(ctr_delta),
                ctr_delta.abs(),
                note
            ));
        }

        if fatigue {
            reasoning.push("Ad Fatigue suspected: ROAS dropping despite spend".to_string());
        }

        if reasoning.is_empty() {
            if metrics.roas > aggregates.avg_roas * rules.above_average_roas {
                reasoning.push("Above-average ROAS".to_string());
            } else if metrics.roas < aggregates.avg_roas * rules.below_average_roas {
                reasoning.push("Below-average ROAS".to_string());
            }
        }

        reasoning
    }
}

fn sign(delta: f64) -> char {
    if delta < 0.0 {
        '-'
    } else {
        '+'
    }
}
