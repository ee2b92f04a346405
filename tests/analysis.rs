use serde_json::{json, Value};
use sensei_engine::analysis::FunnelType;
use sensei_engine::recommend::RecommendationDetails;
use sensei_engine::{
    analyze_creative_performance, analyze_hooks, analyze_offer, ApiError, Mode, Priority,
    RawRecord, RecommendationKind, SenseiEngine,
};

fn records(values: Value) -> Vec<RawRecord> {
    match values {
        Value::Array(items) => items.into_iter().map(RawRecord::from_value).collect(),
        _ => Vec::new(),
    }
}

fn creative(id: &str, spend: f64, roas: f64, ctr: f64, cpm: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Ad {}", id),
        "status": "ACTIVE",
        "metrics": { "spend": spend, "roas": roas, "ctr": ctr, "cpm": cpm, "purchases": 10 }
    })
}

fn campaign(id: &str, roas: f64, ctr: f64, cpm: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Campaign {}", id),
        "metrics": { "spend": 100, "roas": roas, "ctr": ctr, "cpm": cpm, "purchases": 4 }
    })
}

fn hook_creative(id: &str, hook: &str, spend: f64, roas: f64) -> Value {
    json!({
        "id": id,
        "name": format!("Ad {}", id),
        "hook": hook,
        "metrics": { "spend": spend, "roas": roas }
    })
}

fn kinds(recommendations: &[sensei_engine::Recommendation]) -> Vec<RecommendationKind> {
    recommendations.iter().map(|rec| rec.kind).collect()
}

#[test]
fn empty_inputs_produce_no_data_recommendations() {
    let creative = analyze_creative_performance(&[]);
    assert!(creative.scoring.is_empty());
    assert_eq!(creative.summary.total_creatives, 0);
    assert_eq!(kinds(&creative.recommendations), vec![RecommendationKind::NoData]);
    assert_eq!(creative.recommendations[0].title, "No creatives provided");
    assert_eq!(creative.recommendations[0].priority, Priority::Low);

    let offer = analyze_offer(&[]);
    assert!(offer.campaigns.is_empty());
    assert_eq!(offer.recommendations[0].title, "No campaigns provided");

    let hooks = analyze_hooks(&[]);
    assert!(hooks.hooks.is_empty());
    assert_eq!(hooks.recommendations[0].title, "No creatives for hook analysis");
}

#[test]
fn winner_and_loser_trigger_budget_shift() {
    let batch = records(json!([
        creative("A", 100.0, 4.0, 2.0, 8.0),
        creative("B", 100.0, 2.0, 1.0, 10.0),
        creative("C", 100.0, 2.0, 1.0, 10.0),
        creative("D", 100.0, 0.5, 0.5, 14.0),
    ]));

    let report = analyze_creative_performance(&batch);

    assert_eq!(report.summary.total_creatives, 4);
    assert_eq!(report.summary.total_spend, 400.0);
    assert_eq!(report.summary.total_revenue, 850.0);
    assert!((report.summary.avg_roas - 2.125).abs() < 1e-12);

    let scores: Vec<u8> = report.scoring.iter().map(|entry| entry.score).collect();
    assert_eq!(scores, vec![89, 49, 49, 12]);

    let winner_ids: Vec<&str> = report.winners.iter().map(|e| e.entry.id.as_str()).collect();
    let loser_ids: Vec<&str> = report.losers.iter().map(|e| e.entry.id.as_str()).collect();
    let potential_ids: Vec<&str> = report.potentials.iter().map(|e| e.entry.id.as_str()).collect();
    assert_eq!(winner_ids, vec!["A"]);
    assert_eq!(loser_ids, vec!["D"]);
    assert_eq!(potential_ids, vec!["B", "C"]);
    assert!(report.testing.is_empty());

    assert_eq!(report.winners[0].reasoning, vec!["Above-average ROAS".to_string()]);
    assert_eq!(report.losers[0].reasoning, vec!["Below-average ROAS".to_string()]);

    assert_eq!(kinds(&report.recommendations), vec![RecommendationKind::BudgetShift]);
    let shift = &report.recommendations[0];
    assert_eq!(shift.priority, Priority::High);
    match &shift.details {
        RecommendationDetails::BudgetShift(details) => {
            assert_eq!(details.loser_spend, 100.0);
            assert_eq!(details.estimated_daily_revenue_uplift, 184);
            assert_eq!(details.from_creatives[0].id, "D");
            assert_eq!(details.to_creatives[0].id, "A");
        }
        other => panic!("unexpected details: {:?}", other),
    }
}

#[test]
fn segments_partition_every_scored_creative() {
    let batch = records(json!([
        creative("A", 100.0, 4.0, 2.0, 8.0),
        creative("B", 100.0, 2.0, 1.0, 10.0),
        creative("C", 100.0, 2.0, 1.0, 10.0),
        creative("D", 100.0, 0.5, 0.5, 14.0),
        creative("E", 3.0, 1.0, 1.0, 10.0),
        creative("F", 250.0, 2.6, 1.4, 9.0),
    ]));

    let report = analyze_creative_performance(&batch);
    let mut seen: Vec<String> = report
        .winners
        .iter()
        .chain(&report.losers)
        .chain(&report.testing)
        .chain(&report.potentials)
        .map(|entry| entry.entry.id.clone())
        .collect();
    seen.sort();

    assert_eq!(seen, vec!["A", "B", "C", "D", "E", "F"]);
    assert!(report.winners.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(report.losers.windows(2).all(|w| w[0].score <= w[1].score));
    assert!(report.potentials.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(report.winners.iter().all(|entry| !entry.is_testing));
}

#[test]
fn low_spend_active_creative_is_a_testing_candidate() {
    let batch = records(json!([
        creative("A", 100.0, 2.0, 0.0, 0.0),
        creative("B", 100.0, 2.0, 0.0, 0.0),
        creative("C", 100.0, 2.0, 0.0, 0.0),
        creative("T", 5.0, 2.0, 0.0, 0.0),
    ]));

    let report = analyze_creative_performance(&batch);

    assert_eq!(report.testing.len(), 1);
    assert_eq!(report.testing[0].entry.id, "T");
    assert_eq!(report.testing[0].score, 44);
    assert_eq!(report.testing[0].label, "Under Review");
    assert_eq!(kinds(&report.recommendations), vec![RecommendationKind::Testing]);
    match &report.recommendations[0].details {
        RecommendationDetails::Testing(details) => {
            assert_eq!(details.candidates.len(), 1);
            assert_eq!(details.candidates[0].id, "T");
        }
        other => panic!("unexpected details: {:?}", other),
    }
}

#[test]
fn uniform_batch_gets_generic_recommendation() {
    let batch = records(json!([
        creative("A", 100.0, 2.0, 1.0, 10.0),
        creative("B", 100.0, 2.0, 1.0, 10.0),
    ]));

    let report = analyze_creative_performance(&batch);

    assert!(report.scoring.iter().all(|entry| entry.score == 50));
    assert_eq!(kinds(&report.recommendations), vec![RecommendationKind::Generic]);
    assert_eq!(
        report.recommendations[0].title,
        "Account stable - focus on new tests"
    );
}

#[test]
fn fatigued_winner_raises_alert() {
    let mut batch = records(json!([
        creative("B", 100.0, 2.0, 1.0, 10.0),
        creative("C", 100.0, 2.0, 1.0, 10.0),
        creative("D", 100.0, 0.5, 0.5, 14.0),
    ]));
    batch.insert(
        0,
        RawRecord::from_value(json!({
            "id": "A",
            "status": "ACTIVE",
            "metrics": {
                "spend": 100, "roas": 4.0, "roas_prev": 8.0,
                "ctr": 2.0, "cpm": 8.0, "purchases": 10
            }
        })),
    );

    let report = analyze_creative_performance(&batch);

    assert_eq!(report.winners.len(), 1);
    assert!(report.winners[0].fatigue);
    assert!(kinds(&report.recommendations).contains(&RecommendationKind::Fatigue));
}

#[test]
fn creative_analysis_is_idempotent() {
    let batch = records(json!([
        { "name": "no id", "metrics": { "spend": 20, "roas": 1.1 } },
        creative("B", 100.0, 2.0, 1.0, 10.0),
        creative("D", 100.0, 0.5, 0.5, 14.0),
    ]));

    let engine = SenseiEngine::default();
    assert_eq!(engine.creative(&batch), engine.creative(&batch));
}

#[test]
fn offer_analysis_classifies_funnel_stages() {
    let batch = records(json!([
        campaign("O", 1.0, 3.0, 10.0),
        campaign("C", 1.0, 0.5, 10.0),
        campaign("T", 3.0, 1.5, 20.0),
        campaign("B", 3.0, 1.5, 10.0),
    ]));

    let report = analyze_offer(&batch);

    let stages: Vec<FunnelType> = report.campaigns.iter().map(|c| c.funnel_type).collect();
    assert_eq!(
        stages,
        vec![
            FunnelType::OfferIssue,
            FunnelType::CreativeIssue,
            FunnelType::TargetingIssue,
            FunnelType::Balanced,
        ]
    );
    assert_eq!(report.summary.total_campaigns, 4);
    assert!((report.summary.avg_roas - 2.0).abs() < 1e-12);
    assert!((report.campaigns[0].roas_delta_vs_avg + 50.0).abs() < 1e-9);
    assert!((report.campaigns[0].spend_share - 25.0).abs() < 1e-9);
    assert_eq!(report.campaigns[0].entry.objective.as_deref(), Some("UNKNOWN"));

    assert_eq!(
        kinds(&report.recommendations),
        vec![
            RecommendationKind::Offer,
            RecommendationKind::Creative,
            RecommendationKind::Targeting,
        ]
    );
    assert_eq!(report.recommendations[0].priority, Priority::High);
    match &report.recommendations[2].details {
        RecommendationDetails::Campaigns(details) => {
            assert_eq!(details.campaigns[0].id, "T");
            assert_eq!(details.campaigns[0].cpm, Some(20.0));
            assert_eq!(details.campaigns[0].ctr, None);
            assert_eq!(details.checklist.as_ref().map(Vec::len), Some(4));
        }
        other => panic!("unexpected details: {:?}", other),
    }
}

#[test]
fn single_campaign_is_balanced() {
    let report = analyze_offer(&records(json!([campaign("only", 2.0, 1.0, 10.0)])));

    assert_eq!(report.campaigns[0].funnel_type, FunnelType::Balanced);
    assert_eq!(kinds(&report.recommendations), vec![RecommendationKind::FunnelOk]);
}

#[test]
fn hook_buckets_rank_by_weighted_roas() {
    let batch = records(json!([
        hook_creative("1", "UGC unboxing", 100.0, 3.0),
        hook_creative("2", "ugc haul", 300.0, 1.0),
        hook_creative("3", "Static banner", 100.0, 2.0),
    ]));

    let report = analyze_hooks(&batch);

    assert_eq!(report.summary.hook_count, 2);
    assert_eq!(report.summary.total_creatives, 3);

    let static_bucket = &report.hooks[0];
    assert_eq!(static_bucket.label, "Static");
    assert!((static_bucket.avg_roas - 2.0).abs() < 1e-12);
    assert!((static_bucket.share_of_spend - 20.0).abs() < 1e-9);

    let ugc = &report.hooks[1];
    assert_eq!(ugc.label, "UGC");
    assert_eq!(ugc.creatives.len(), 2);
    assert_eq!(ugc.total_spend, 400.0);
    assert_eq!(ugc.total_revenue, 600.0);
    assert!((ugc.avg_roas - 1.5).abs() < 1e-12);
    assert!((ugc.share_of_spend - 80.0).abs() < 1e-9);

    // two buckets: winners only, never losers
    assert_eq!(kinds(&report.recommendations), vec![RecommendationKind::HookWinners]);
}

#[test]
fn weak_hooks_reported_above_bucket_threshold() {
    let batch = records(json!([
        hook_creative("1", "problem hook", 100.0, 4.0),
        hook_creative("2", "customer review", 100.0, 3.0),
        hook_creative("3", "before shot", 100.0, 2.0),
        hook_creative("4", "image only", 100.0, 1.0),
    ]));

    let report = analyze_hooks(&batch);

    assert_eq!(
        kinds(&report.recommendations),
        vec![RecommendationKind::HookWinners, RecommendationKind::HookLosers]
    );
    let labels = |index: usize| match &report.recommendations[index].details {
        RecommendationDetails::Hooks(details) => details
            .hooks
            .iter()
            .map(|hook| hook.label.clone())
            .collect::<Vec<_>>(),
        other => panic!("unexpected details: {:?}", other),
    };
    assert_eq!(labels(0), vec!["Problem/Solution", "Testimonial", "Before/After"]);
    assert_eq!(labels(1), vec!["Testimonial", "Before/After", "Static"]);
}

#[test]
fn unmatched_hooks_use_first_token() {
    let batch = records(json!([
        { "id": "1", "name": "Spring launch video", "metrics": { "spend": 10, "roas": 2 } },
        { "id": "2", "metrics": { "spend": 10, "roas": 1 } },
    ]));

    let report = analyze_hooks(&batch);
    let labels: Vec<&str> = report.hooks.iter().map(|hook| hook.label.as_str()).collect();
    assert_eq!(labels, vec!["Spring", "unknown"]);
}

#[test]
fn run_validates_required_arrays() {
    let engine = SenseiEngine::default();
    let none: &[RawRecord] = &[];

    assert_eq!(
        engine.run(Mode::Creative, None, None).unwrap_err(),
        ApiError::MissingArray {
            mode: "creative",
            field: "creatives"
        }
    );
    let err = engine.run(Mode::Offer, Some(none), None).unwrap_err();
    assert_eq!(err.to_string(), "Mode \"offer\" requires \"campaigns\" array");
    assert!(engine.run(Mode::Hook, None, Some(none)).is_err());
}

#[test]
fn full_mode_skips_missing_facades() {
    let engine = SenseiEngine::default();
    let campaigns = records(json!([campaign("only", 2.0, 1.0, 10.0)]));

    let result = engine.run(Mode::Full, None, Some(campaigns.as_slice())).unwrap();
    assert!(result.performance.is_none());
    assert!(result.hook.is_none());
    assert!(result.offer.is_some());

    let payload = serde_json::to_value(&result).unwrap();
    assert!(payload.get("performance").is_none());
    assert!(payload.get("offer").is_some());

    let empty = engine.run(Mode::Full, None, None).unwrap();
    assert_eq!(serde_json::to_value(&empty).unwrap(), json!({}));
}

#[test]
fn modes_parse_with_aliases() {
    assert_eq!("performance".parse::<Mode>(), Ok(Mode::Creative));
    assert_eq!("Funnel".parse::<Mode>(), Ok(Mode::Offer));
    assert_eq!("hooks".parse::<Mode>(), Ok(Mode::Hook));
    assert_eq!("all".parse::<Mode>(), Ok(Mode::Full));
    assert_eq!("".parse::<Mode>(), Err(ApiError::MissingMode));
    assert_eq!(
        "bogus".parse::<Mode>().unwrap_err().to_string(),
        "Unknown mode: \"bogus\". Valid modes: creative, offer, hook, full"
    );
}

#[test]
fn scored_entries_serialize_flat_with_camel_case() {
    let report = analyze_creative_performance(&records(json!([
        creative("A", 100.0, 2.0, 1.0, 10.0)
    ])));
    let payload = serde_json::to_value(&report.scoring[0]).unwrap();

    assert_eq!(payload["id"], json!("A"));
    assert_eq!(payload["hookLabel"], json!("unknown"));
    assert_eq!(payload["metrics"]["roas"], json!(2.0));
    assert!(payload.get("isTesting").is_some());
    assert!(payload.get("roasDelta").is_some());
    assert_eq!(payload["raw"]["id"], json!("A"));
}
