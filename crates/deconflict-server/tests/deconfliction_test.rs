//! Deconfliction service integration tests.
//!
//! Exercises the end-to-end threat resolution flow against a live stack.
//!
//! Run with: cargo test --test deconfliction_test -- --ignored
//! Requires a running deconfliction server and registry services.

use reqwest::Client;

fn base_url() -> String {
    std::env::var("DECONFLICT_TEST_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// A loss-of-separation threat between two registered aircraft resolves
/// into one corrected plan per aircraft.
#[tokio::test]
#[ignore]
async fn separation_threat_returns_corrected_plans() {
    let client = Client::new();
    let base = base_url();

    let request = serde_json::json!({
        "tactical": true,
        "threat": {
            "kind": "loss_of_separation",
            "uav_ids": ["UAV-TEST-001", "UAV-TEST-002"],
            "times_s": [30.0, 30.0]
        }
    });

    let resp = client
        .post(format!("{}/v1/deconfliction", base))
        .json(&request)
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let result: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(result["success"], true, "resolution failed: {result}");
    assert_eq!(result["uav_ids"].as_array().unwrap().len(), 2);
    assert_eq!(result["deconflicted_plans"].as_array().unwrap().len(), 2);
}

/// Non-tactical requests are acknowledged without touching any plans.
#[tokio::test]
#[ignore]
async fn non_tactical_request_changes_nothing() {
    let client = Client::new();
    let base = base_url();

    let request = serde_json::json!({
        "tactical": false,
        "threat": {
            "kind": "geofence_conflict",
            "uav_ids": ["UAV-TEST-001"],
            "times_s": [30.0],
            "geofence_ids": ["GF-TEST-001"]
        }
    });

    let resp = client
        .post(format!("{}/v1/deconfliction", base))
        .json(&request)
        .send()
        .await
        .unwrap();

    let result: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(result["success"], true);
    assert!(result["deconflicted_plans"].as_array().unwrap().is_empty());
}
