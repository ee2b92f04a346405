use serde_json::json;
use sensei_engine::entry::{canonicalize, fallback_id, EntityKind};
use sensei_engine::record::{percent_change, safe_divide, to_number};
use sensei_engine::{extract_metrics, Metrics, RawRecord};

fn record(value: serde_json::Value) -> RawRecord {
    RawRecord::from_value(value)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn coerces_loose_numeric_values() {
    assert_eq!(to_number(&json!(12.5)), Some(12.5));
    assert_eq!(to_number(&json!(" 7.25 ")), Some(7.25));
    assert_eq!(to_number(&json!("")), Some(0.0));
    assert_eq!(to_number(&json!(true)), Some(1.0));
    assert_eq!(to_number(&json!("n/a")), None);
    assert_eq!(to_number(&json!(null)), None);
    assert_eq!(to_number(&json!([1, 2])), None);
    assert_eq!(to_number(&json!("inf")), None);
}

#[test]
fn division_helpers_never_return_non_finite_values() {
    assert_eq!(safe_divide(10.0, 0.0, -1.0), -1.0);
    assert_eq!(safe_divide(10.0, 4.0, 0.0), 2.5);
    assert_eq!(safe_divide(f64::NAN, 4.0, 0.0), 0.0);
    assert_eq!(percent_change(3.0, 0.0), 0.0);
    assert_close(percent_change(3.0, 2.0), 50.0);
}

#[test]
fn reads_nested_aliases_and_derives_rates() {
    let metrics = extract_metrics(&record(json!({
        "metrics": {
            "spend_eur": "120.5",
            "purchase_value": 241,
            "impressions": 10000,
            "clicks": 150,
            "purchases": 3
        }
    })));

    assert_close(metrics.spend, 120.5);
    assert_close(metrics.revenue, 241.0);
    assert_close(metrics.roas, 2.0);
    assert_close(metrics.ctr, 1.5);
    assert_close(metrics.cpm, 12.05);
    assert_close(metrics.cpa, 120.5 / 3.0);
    assert_eq!(metrics.impressions, 10000.0);
    assert_eq!(metrics.clicks, 150.0);
}

#[test]
fn skips_zero_aliases_in_favour_of_later_ones() {
    let metrics = extract_metrics(&record(json!({
        "metrics": { "spend": 0, "spend_eur": 40, "roas": 0, "return_on_ad_spend": 2.5 }
    })));

    assert_eq!(metrics.spend, 40.0);
    assert_eq!(metrics.roas, 2.5);
    assert_close(metrics.revenue, 100.0);
}

#[test]
fn falls_back_to_platform_roas_list() {
    let metrics = extract_metrics(&record(json!({
        "insights": {
            "spend": 100,
            "website_purchase_roas": [{ "action_type": "offsite_conversion", "value": "3.2" }]
        }
    })));

    assert_close(metrics.roas, 3.2);
    assert_close(metrics.revenue, 320.0);
}

#[test]
fn uses_record_level_spend_and_revenue() {
    let metrics = extract_metrics(&record(json!({ "spend": 50, "revenue": 100 })));

    assert_eq!(metrics.spend, 50.0);
    assert_eq!(metrics.revenue, 100.0);
    assert_close(metrics.roas, 2.0);
    assert_eq!(metrics.ctr, 0.0);
    assert_eq!(metrics.cpm, 0.0);
    assert_eq!(metrics.cpa, 0.0);
}

#[test]
fn keeps_explicit_zero_rates() {
    let metrics = extract_metrics(&record(json!({
        "metrics": { "ctr": 0, "cpm": "0", "impressions": 1000, "clicks": 20, "spend": 10 }
    })));

    assert_eq!(metrics.ctr, 0.0);
    assert_eq!(metrics.cpm, 0.0);
}

#[test]
fn reads_previous_period_values() {
    let metrics = extract_metrics(&record(json!({
        "metrics": { "roas": 1.5, "roas_prev_7d": 2.0, "ctr": 0.9, "ctr_prev": 1.2 }
    })));

    assert_eq!(metrics.roas_prev, 2.0);
    assert_eq!(metrics.ctr_prev, 1.2);
}

#[test]
fn garbage_input_yields_zeroed_metrics() {
    let metrics = extract_metrics(&record(json!({
        "metrics": { "spend": "abc", "roas": null, "clicks": [1] }
    })));
    assert_eq!(metrics, Metrics::default());

    assert_eq!(extract_metrics(&record(json!("not a record"))), Metrics::default());
    assert_eq!(extract_metrics(&RawRecord::default()), Metrics::default());
}

#[test]
fn canonical_creative_uses_aliases_and_defaults() {
    let entry = canonicalize(
        &record(json!({
            "ad_id": 998877,
            "title": "Spring UGC cut",
            "isActive": true,
            "creator_name": "Mia",
            "metrics": { "spend": 10 }
        })),
        0,
        EntityKind::Creative,
    );

    assert_eq!(entry.id, "998877");
    assert_eq!(entry.name, "Spring UGC cut");
    assert_eq!(entry.status, "ACTIVE");
    assert!(entry.is_active());
    assert_eq!(entry.creator.as_deref(), Some("Mia"));
    assert_eq!(entry.hook_label, "UGC");
    assert_eq!(entry.objective, None);
    assert_eq!(entry.metrics.spend, 10.0);
}

#[test]
fn canonical_campaign_defaults_objective_and_status() {
    let entry = canonicalize(&record(json!({ "campaign_id": "c-1" })), 3, EntityKind::Campaign);

    assert_eq!(entry.id, "c-1");
    assert_eq!(entry.name, "Unnamed Campaign");
    assert_eq!(entry.status, "UNKNOWN");
    assert_eq!(entry.objective.as_deref(), Some("UNKNOWN"));
}

#[test]
fn fallback_ids_are_deterministic() {
    let raw = record(json!({ "name": "No id here" }));
    let first = canonicalize(&raw, 2, EntityKind::Creative);
    let second = canonicalize(&raw, 2, EntityKind::Creative);
    let moved = canonicalize(&raw, 3, EntityKind::Creative);

    assert_eq!(first.id, second.id);
    assert_ne!(first.id, moved.id);
    assert_eq!(first.id, fallback_id(EntityKind::Creative, "No id here", 2));
    assert!(first.id.starts_with("creative_"));
    assert_eq!(first.id.len(), "creative_".len() + 16);
}

#[test]
fn canonical_entry_keeps_the_raw_record() {
    let raw = record(json!({ "id": "a", "custom": { "nested": true } }));
    let entry = canonicalize(&raw, 0, EntityKind::Creative);

    assert_eq!(entry.raw, raw);
    assert_eq!(entry.raw.get("custom"), Some(&json!({ "nested": true })));
}
