mod common;

use axum::http::StatusCode;
use common::TestHarness;
use subscription_audit::Config;
use subscription_audit::database::entities::{CategoryType, EvaluationStatus, SubscriptionStatus};
use subscription_audit::database::{DatabaseManager, MonthlyKey, MonthlyRecordStore};
use subscription_audit::period::UsagePeriod;
use subscription_audit::test_utils::{
    TestServerBuilder, create_test_category, create_test_subscription,
};
use subscription_audit::usage_tracking::UsageError;

fn key(subscription_id: i32, year: i32, month: i32) -> MonthlyKey {
    MonthlyKey::new(subscription_id, UsagePeriod::new(year, month).unwrap())
}

#[tokio::test]
async fn test_report_usage_creates_usage_and_evaluation() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("OTT", "Streaming", 9_000, "MONTHLY", "ACTIVE")
        .await;

    let (status, body) = harness.report_usage(id, 2025, 3, 900).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let db = &harness.server.database;
    let usage = db.usage().find_by_key(&key(id, 2025, 3)).await.unwrap().unwrap();
    assert_eq!(usage.usage_value, 900);

    // OTT reference is 1800 minutes
    let evaluation = db
        .evaluations()
        .find_by_key(&key(id, 2025, 3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(evaluation.efficiency_rate, 50.0);
    assert_eq!(evaluation.status, EvaluationStatus::Review);
    assert_eq!(evaluation.cost_per_unit, 10);
    assert_eq!(evaluation.annual_waste, 54_000);
    assert_eq!(evaluation.reference_snapshot_value, 1800);
}

#[tokio::test]
async fn test_repeated_report_is_idempotent() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("MUSIC", "Music", 6_000, "MONTHLY", "ACTIVE")
        .await;

    harness.report_usage(id, 2025, 5, 750).await;
    let db = &harness.server.database;
    let first = db
        .evaluations()
        .find_by_key(&key(id, 2025, 5))
        .await
        .unwrap()
        .unwrap();

    let (status, _) = harness.report_usage(id, 2025, 5, 750).await;
    assert_eq!(status, StatusCode::OK);
    let second = db
        .evaluations()
        .find_by_key(&key(id, 2025, 5))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(first.efficiency_rate, second.efficiency_rate);
    assert_eq!(first.status, second.status);
    assert_eq!(first.cost_per_unit, second.cost_per_unit);
    assert_eq!(first.annual_waste, second.annual_waste);
    assert_eq!(db.usage().find_for_subscription(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_later_report_overwrites_month() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("WORK_TOOL", "Docs", 8_000, "MONTHLY", "ACTIVE")
        .await;

    harness.report_usage(id, 2025, 7, 4).await;
    harness.report_usage(id, 2025, 7, 25).await;

    let evaluation = harness
        .server
        .database
        .evaluations()
        .find_by_key(&key(id, 2025, 7))
        .await
        .unwrap()
        .unwrap();
    // WORK_TOOL reference is 20 days, clamped at 100%
    assert_eq!(evaluation.efficiency_rate, 100.0);
    assert_eq!(evaluation.status, EvaluationStatus::Efficient);
    assert_eq!(evaluation.annual_waste, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_reports_on_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.database.url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("audit.db").display()
    );
    let server = TestServerBuilder::new()
        .with_config(config)
        .with_real_database()
        .build()
        .await;

    let category = create_test_category(
        server.database.as_ref(),
        "AI_TOOL",
        CategoryType::Productivity,
        12,
    )
    .await;
    let id = create_test_subscription(
        server.database.as_ref(),
        category.id,
        "Assistant",
        29_000,
        SubscriptionStatus::Active,
    )
    .await
    .id;

    let writers: Vec<_> = (1..=8)
        .map(|usage_value| {
            let service = server.usage_service.clone();
            tokio::spawn(async move {
                service
                    .record_usage_and_evaluate(id, 2025, 9, usage_value)
                    .await
            })
        })
        .collect();
    for writer in writers {
        writer.await.unwrap().unwrap();
    }

    let db = &server.database;
    let rows = db.usage().find_for_subscription(id).await.unwrap();
    assert_eq!(rows.len(), 1);

    let evaluations = db
        .evaluations()
        .find_by_period(UsagePeriod::new(2025, 9).unwrap())
        .await
        .unwrap();
    assert_eq!(evaluations.len(), 1);

    // Whichever write committed last wins, and usage and evaluation agree on it
    let usage_value = rows[0].usage_value;
    assert!((1..=8).contains(&usage_value));
    let expected_rate = usage_value as f64 / 12.0 * 100.0;
    assert_eq!(evaluations[0].efficiency_rate, expected_rate);
}

#[tokio::test]
async fn test_usage_outside_dashboard_years_is_recorded() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("EBOOK", "Books", 1_000, "MONTHLY", "ACTIVE")
        .await;

    let (status, _) = harness.report_usage(id, 1999, 12, 150).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = harness.report_usage(id, 2150, 2, 150).await;
    assert_eq!(status, StatusCode::OK);

    let rows = harness
        .server
        .database
        .usage()
        .find_for_subscription(id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_day_cap_rejects_before_write() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("CLOUD", "Storage", 3_000, "MONTHLY", "ACTIVE")
        .await;

    let (status, body) = harness.report_usage(id, 2025, 2, 29).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");

    let db = &harness.server.database;
    assert!(db.usage().find_by_key(&key(id, 2025, 2)).await.unwrap().is_none());
    assert!(
        db.evaluations()
            .find_by_key(&key(id, 2025, 2))
            .await
            .unwrap()
            .is_none()
    );

    let (status, _) = harness.report_usage(id, 2024, 2, 29).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_negative_usage_is_rejected() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("EBOOK", "Books", 1_000, "MONTHLY", "ACTIVE")
        .await;

    let (status, body) = harness.report_usage(id, 2025, 1, -10).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("-10"));
}

#[tokio::test]
async fn test_unknown_subscription_is_not_found() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.report_usage(999, 2025, 1, 10).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");

    let err = harness
        .server
        .usage_service
        .record_usage_and_evaluate(999, 2025, 1, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, UsageError::SubscriptionNotFound(999)));
}

#[tokio::test]
async fn test_trial_has_no_annual_waste() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("OTT", "Trial stream", 12_000, "MONTHLY", "TRIAL")
        .await;

    harness.report_usage(id, 2025, 3, 180).await;

    let evaluation = harness
        .server
        .database
        .evaluations()
        .find_by_key(&key(id, 2025, 3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(evaluation.efficiency_rate, 10.0);
    assert_eq!(evaluation.status, EvaluationStatus::Inefficient);
    assert_eq!(evaluation.annual_waste, 0);
}

#[tokio::test]
async fn test_zero_usage_is_ghost() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("AI_TOOL", "Unused", 20_000, "MONTHLY", "ACTIVE")
        .await;

    harness.report_usage(id, 2025, 3, 0).await;

    let evaluation = harness
        .server
        .database
        .evaluations()
        .find_by_key(&key(id, 2025, 3))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(evaluation.status, EvaluationStatus::Ghost);
    assert_eq!(evaluation.cost_per_unit, 20_000);
    assert_eq!(evaluation.annual_waste, 240_000);
}

#[tokio::test]
async fn test_delete_subscription_cascades() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("MUSIC", "Music", 6_000, "MONTHLY", "ACTIVE")
        .await;
    harness.report_usage(id, 2025, 1, 100).await;
    harness.report_usage(id, 2025, 2, 200).await;

    let (status, _) = harness.delete(&format!("/api/v1/subscriptions/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let db = &harness.server.database;
    assert!(db.usage().find_for_subscription(id).await.unwrap().is_empty());
    assert!(
        db.evaluations()
            .find_by_key(&key(id, 2025, 1))
            .await
            .unwrap()
            .is_none()
    );

    let (status, _) = harness.delete(&format!("/api/v1/subscriptions/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
