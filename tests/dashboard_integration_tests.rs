mod common;

use axum::http::StatusCode;
use common::TestHarness;
use subscription_audit::database::entities::EvaluationStatus;
use subscription_audit::period::UsagePeriod;

#[tokio::test]
async fn test_dashboard_rolls_up_evaluated_subscriptions() {
    let harness = TestHarness::new().await;
    let streaming = harness
        .create_subscription("OTT", "Streaming", 9_000, "MONTHLY", "ACTIVE")
        .await;
    let music = harness
        .create_subscription("MUSIC", "Music", 6_000, "MONTHLY", "TRIAL")
        .await;
    let _unreported = harness
        .create_subscription("AI_TOOL", "Assistant", 20_000, "MONTHLY", "ACTIVE")
        .await;
    let cloud = harness
        .create_subscription("CLOUD", "Storage", 3_000, "MONTHLY", "ACTIVE")
        .await;

    harness.report_usage(streaming, 2025, 4, 900).await;
    harness.report_usage(music, 2025, 4, 300).await;
    harness.report_usage(cloud, 2025, 4, 25).await;

    let (status, body) = harness.get("/api/v1/dashboard?year=2025&month=4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["year"], 2025);
    assert_eq!(body["month"], 4);

    // Trials do not count towards what is being paid
    assert_eq!(body["total_monthly_cost"], 12_000);
    assert_eq!(body["total_annual_waste"], 54_000);

    let rows = body["subscriptions"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    let ids: Vec<i64> = rows.iter().map(|r| r["subscription_id"].as_i64().unwrap()).collect();
    assert_eq!(ids, vec![streaming as i64, music as i64, cloud as i64]);

    assert_eq!(rows[0]["category_name"], "OTT");
    assert_eq!(rows[0]["name"], "Streaming");
    assert_eq!(rows[0]["status"], "REVIEW");
    assert_eq!(rows[0]["annual_waste"], 54_000);
    assert_eq!(rows[0]["is_trial"], false);
    assert_eq!(rows[0]["potential_annual_waste"], 0);
    assert_eq!(rows[0]["cost_per_unit"], 10);

    assert_eq!(rows[1]["is_trial"], true);
    assert_eq!(rows[1]["efficiency_rate"], 20.0);
    assert_eq!(rows[1]["status"], "INEFFICIENT");
    assert_eq!(rows[1]["annual_waste"], 0);
    assert_eq!(rows[1]["potential_annual_waste"], 57_600);

    assert_eq!(rows[2]["category_name"], "CLOUD");
    assert_eq!(rows[2]["status"], "EFFICIENT");
    assert_eq!(rows[2]["annual_waste"], 0);
}

#[tokio::test]
async fn test_dashboard_is_scoped_to_month() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("EBOOK", "Books", 1_000, "MONTHLY", "ACTIVE")
        .await;
    harness.report_usage(id, 2025, 5, 150).await;
    harness.report_usage(id, 2025, 6, 300).await;

    let dashboard = harness
        .server
        .dashboard_service
        .get_monthly_dashboard(UsagePeriod::new(2025, 5).unwrap())
        .await
        .unwrap();
    assert_eq!(dashboard.subscriptions.len(), 1);
    assert_eq!(dashboard.subscriptions[0].efficiency_rate, 50.0);
    assert_eq!(dashboard.subscriptions[0].status, EvaluationStatus::Review);
    assert_eq!(dashboard.total_annual_waste, 6_000);

    let june = harness
        .server
        .dashboard_service
        .get_monthly_dashboard(UsagePeriod::new(2025, 6).unwrap())
        .await
        .unwrap();
    assert_eq!(june.subscriptions[0].status, EvaluationStatus::Efficient);
    assert_eq!(june.total_annual_waste, 0);
}

#[tokio::test]
async fn test_empty_month_returns_zero_totals() {
    let harness = TestHarness::new().await;
    harness
        .create_subscription("OTT", "Streaming", 9_000, "MONTHLY", "ACTIVE")
        .await;

    let (status, body) = harness.get("/api/v1/dashboard?year=2030&month=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_monthly_cost"], 0);
    assert_eq!(body["total_annual_waste"], 0);
    assert!(body["subscriptions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_dashboard_uses_normalized_monthly_cost() {
    let harness = TestHarness::new().await;
    let id = harness
        .create_subscription("WORK_TOOL", "Suite", 120_000, "ANNUAL", "ACTIVE")
        .await;
    harness.report_usage(id, 2025, 8, 10).await;

    let (_, body) = harness.get("/api/v1/dashboard?year=2025&month=8").await;
    assert_eq!(body["total_monthly_cost"], 10_000);
    // 10000 * 0.5 * 12
    assert_eq!(body["total_annual_waste"], 60_000);
    assert_eq!(body["subscriptions"][0]["cost_per_unit"], 1_000);
}

#[tokio::test]
async fn test_dashboard_rejects_invalid_period() {
    let harness = TestHarness::new().await;

    let (status, _) = harness.get("/api/v1/dashboard?year=2025&month=13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = harness.get("/api/v1/dashboard?year=2025&month=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = harness.get("/api/v1/dashboard?year=1999&month=6").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("1999"));

    let (status, _) = harness.get("/api/v1/dashboard?year=2025").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
