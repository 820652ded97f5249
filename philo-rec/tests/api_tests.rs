//! Integration tests for philo-rec API endpoints
//!
//! Drives the router in-process with `oneshot`; no socket is bound.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use philo_common::config::TomlConfig;
use philo_rec::models::{CatalogUpdate, UpdateSource, MAX_FINISHED_UPDATES};
use philo_rec::{build_router, AppState};
use serde_json::{json, Value};
use std::time::Duration;
use tower::util::ServiceExt; // for `oneshot` method

fn setup_app() -> (AppState, Router) {
    let state = AppState::new(TomlConfig::default());
    let app = build_router(state.clone());
    (state, app)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

fn stoic_profile() -> Value {
    json!({
        "introspectionText": "",
        "personalityTraits": {
            "openness": 60,
            "conscientiousness": 95,
            "extraversion": 30,
            "agreeableness": 70,
            "neuroticism": 15,
            "practicality": 90,
            "dogmaSkeptic": 55,
            "acceptanceAction": 60,
            "tone": "neutral"
        }
    })
}

fn long_text() -> String {
    "I keep returning to the same questions every single night".to_string()
}

// =============================================================================
// Service endpoints
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (_, app) = setup_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "philo-rec");
    assert!(body["version"].is_string());
    assert_eq!(body["catalog_size"], 6);
    assert!(body.get("last_error").is_none());
}

#[tokio::test]
async fn test_buildinfo_endpoint() {
    let (_, app) = setup_app();

    let response = app.oneshot(get("/api/buildinfo")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["git_hash"].is_string());
    assert!(body["build_timestamp"].is_string());
}

#[tokio::test]
async fn test_questions_endpoint() {
    let (_, app) = setup_app();

    let response = app.oneshot(get("/api/questions")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["standard"].as_array().unwrap().len(), 10);
    assert_eq!(body["enhanced"].as_array().unwrap().len(), 5);

    let first = &body["standard"][0];
    assert_eq!(first["id"], "question-1");
    assert_eq!(first["options"][0]["effect"]["kind"], "trait");
    assert_eq!(first["options"][0]["effect"]["trait"], "openness");
    assert_eq!(first["options"][0]["effect"]["score"], 90);

    let tone_question = &body["standard"][7];
    assert_eq!(tone_question["options"][3]["effect"]["kind"], "tone");
    assert_eq!(tone_question["options"][3]["effect"]["tone"], "pessimistic");
}

// =============================================================================
// Profile building
// =============================================================================

#[tokio::test]
async fn test_build_profile() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/profile",
        json!({
            "answers": [
                {"questionId": "question-1", "value": "a"},
                {"questionId": "question-2", "value": "a"},
                {"questionId": "question-6", "value": "d"},
                {"questionId": "question-8", "value": "a"}
            ],
            "introspectionText": "Social anxiety keeps me from the work I love",
            "experienceWithPhilosophy": "intermediate"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["personalityTraits"]["openness"], 90);
    // later answer to the same trait wins
    assert_eq!(body["personalityTraits"]["conscientiousness"], 10);
    assert_eq!(body["personalityTraits"]["tone"], "optimistic");
    assert!(body["personalityTraits"].get("practicality").is_none());
    assert_eq!(body["experienceLevel"], "intermediate");
    assert_eq!(body["wantsContrast"], false);

    let contexts: Vec<&str> = body["extractedContexts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    for expected in ["anxiety", "social anxiety", "work", "love"] {
        assert!(contexts.contains(&expected), "missing {}", expected);
    }
}

#[tokio::test]
async fn test_build_profile_with_enhanced_contrast() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/profile",
        json!({
            "answers": [],
            "introspectionText": "",
            "enhancedProfile": {
                "currentChallenges": long_text(),
                "personalityVariability": long_text(),
                "lifeBackground": long_text(),
                "seekingType": "practical",
                "preferenceType": "contrast"
            }
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["wantsContrast"], true);
    assert_eq!(body["enhancedProfile"]["seekingType"], "practical");
}

#[tokio::test]
async fn test_build_profile_rejects_short_enhanced_text() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/profile",
        json!({
            "enhancedProfile": {
                "currentChallenges": "   too short   ",
                "personalityVariability": long_text(),
                "lifeBackground": long_text()
            }
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(body["error"]["message"].as_str().unwrap().contains("currentChallenges"));
}

// =============================================================================
// Recommendations
// =============================================================================

#[tokio::test]
async fn test_recommendations_default_limit() {
    let (_, app) = setup_app();

    let response = app
        .oneshot(post_json("/api/recommendations", json!({"profile": stoic_profile()})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let aligned = body["aligned"].as_array().unwrap();
    assert_eq!(aligned.len(), 6);
    assert_eq!(body["contrasting"].as_array().unwrap().len(), 6);
    assert_eq!(aligned[0]["id"], "enchiridion");
    assert_eq!(aligned[0]["matchPercentage"], 100);
    assert_eq!(body["dominantMovement"], "Stoicism");

    let scores: Vec<u64> = aligned
        .iter()
        .map(|b| b["matchPercentage"].as_u64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_recommendations_limit_and_filter() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/recommendations",
        json!({"profile": stoic_profile(), "limit": 2}),
    );
    let body = extract_json(app.clone().oneshot(request).await.unwrap().into_body()).await;
    assert_eq!(body["aligned"].as_array().unwrap().len(), 2);
    assert_eq!(body["contrasting"].as_array().unwrap().len(), 2);

    let request = post_json(
        "/api/recommendations",
        json!({"profile": stoic_profile(), "filter": "modern"}),
    );
    let body = extract_json(app.oneshot(request).await.unwrap().into_body()).await;
    let aligned = body["aligned"].as_array().unwrap();
    assert_eq!(aligned.len(), 2);
    assert!(aligned.iter().all(|b| b["isPublicDomain"] == false));
    // computed before filtering
    assert_eq!(body["dominantMovement"], "Stoicism");
}

#[tokio::test]
async fn test_recommendations_rejects_zero_limit() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/recommendations",
        json!({"profile": stoic_profile(), "limit": 0}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommendations_regenerate() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/recommendations",
        json!({"profile": stoic_profile(), "regenerate": true}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    let openness = body["profile"]["personalityTraits"]["openness"].as_u64().unwrap();
    assert!((50..=70).contains(&openness));
    assert_eq!(body["profile"]["personalityTraits"]["conscientiousness"], 95);
    assert_eq!(body["aligned"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_recommendations_contrast_override() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/recommendations",
        json!({"profile": stoic_profile(), "wantsContrast": true}),
    );
    let body = extract_json(app.oneshot(request).await.unwrap().into_body()).await;
    assert_eq!(body["wantsContrast"], true);
    assert_eq!(body["profile"]["wantsContrast"], true);
}

#[tokio::test]
async fn test_recommendations_report_contexts() {
    let (_, app) = setup_app();

    // contexts come from the text; a stale stored set is ignored
    let mut profile = stoic_profile();
    profile["introspectionText"] = json!("I long for freedom");
    profile["extractedContexts"] = json!(["war", "mortality"]);
    let body = extract_json(
        app.oneshot(post_json("/api/recommendations", json!({"profile": profile})))
            .await
            .unwrap()
            .into_body(),
    )
    .await;

    assert_eq!(body["contexts"], json!(["freedom"]));
    let score = |id: &str| {
        body["aligned"]
            .as_array()
            .unwrap()
            .iter()
            .find(|b| b["id"] == id)
            .unwrap()["matchPercentage"]
            .clone()
    };
    // (635 traits + 100 tone + 100 context) / 10 factors
    assert_eq!(score("second-sex"), 84);
    // (750 traits + 100 tone) / 9 factors, no context bonus
    assert_eq!(score("meditations"), 94);
}

// =============================================================================
// Compatibility
// =============================================================================

#[tokio::test]
async fn test_compatibility_breakdown() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/compatibility",
        json!({
            "profile": {"personalityTraits": {"openness": 90, "practicality": 90}},
            "bookId": "republic"
        }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["bookId"], "republic");
    assert_eq!(body["matchPercentage"], 73);
    assert_eq!(body["quality"], "good");
    assert_eq!(body["label"], "Good Match");

    let traits = body["traits"].as_array().unwrap();
    assert_eq!(traits.len(), 2);
    assert_eq!(traits[0]["trait"], "openness");
    assert_eq!(traits[0]["similarity"], 95);
    assert_eq!(traits[1]["trait"], "practicality");
    assert_eq!(traits[1]["difference"], 50);
}

#[tokio::test]
async fn test_compatibility_extracts_contexts_from_text() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/compatibility",
        json!({
            "profile": {"introspectionText": "I long for freedom", "personalityTraits": {"openness": 0}},
            "bookId": "second-sex"
        }),
    );
    let body = extract_json(app.oneshot(request).await.unwrap().into_body()).await;
    // (15 + 100) / 2, rounded up
    assert_eq!(body["matchPercentage"], 58);
    assert_eq!(body["quality"], "moderate");
}

#[tokio::test]
async fn test_compatibility_unknown_book() {
    let (_, app) = setup_app();

    let request = post_json(
        "/api/compatibility",
        json!({"profile": stoic_profile(), "bookId": "no-such-book"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// =============================================================================
// Catalog
// =============================================================================

async fn wait_for_update(app: &Router, update_id: &str) -> Value {
    for _ in 0..100 {
        let response = app
            .clone()
            .oneshot(get(&format!("/api/catalog/update/{}", update_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = extract_json(response.into_body()).await;
        if body["state"] != "running" {
            return body;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("update {} did not finish", update_id);
}

#[tokio::test]
async fn test_get_catalog() {
    let (_, app) = setup_app();

    let response = app.oneshot(get("/api/catalog")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["count"], 6);
    assert!(body["lastUpdated"].is_null());
    assert_eq!(body["books"][0]["id"], "meditations");
    assert!(body["books"][0].get("matchPercentage").is_none());
}

#[tokio::test]
async fn test_curated_update_flow() {
    let (state, app) = setup_app();

    let response = app
        .clone()
        .oneshot(post_json("/api/catalog/update", json!({"source": "curated"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["source"], "curated");
    let update_id = body["updateId"].as_str().unwrap().to_string();

    let finished = wait_for_update(&app, &update_id).await;
    assert_eq!(finished["state"], "completed");
    assert_eq!(finished["booksAdded"], 1);
    assert!(finished["finishedAt"].is_string());

    assert_eq!(state.catalog.read().await.len(), 7);
    let body = extract_json(app.clone().oneshot(get("/api/catalog")).await.unwrap().into_body()).await;
    assert_eq!(body["count"], 7);
    assert!(body["lastUpdated"].is_string());

    // a second run adds nothing
    let body = extract_json(
        app.clone()
            .oneshot(post_json("/api/catalog/update", json!({"source": "curated"})))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    let finished = wait_for_update(&app, body["updateId"].as_str().unwrap()).await;
    assert_eq!(finished["booksAdded"], 0);
    assert_eq!(state.catalog.read().await.len(), 7);
}

#[tokio::test]
async fn test_update_status_not_found() {
    let (_, app) = setup_app();

    let response = app
        .clone()
        .oneshot(get("/api/catalog/update/00000000-0000-0000-0000-000000000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/api/catalog/update/not-a-uuid")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_source() {
    let (_, app) = setup_app();

    let response = app
        .oneshot(post_json("/api/catalog/update", json!({"source": "library"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_rejected_while_running() {
    let (state, app) = setup_app();
    let running = CatalogUpdate::start(UpdateSource::Gutenberg);
    state.updates.write().await.insert(running.update_id, running.clone());

    let response = app
        .clone()
        .oneshot(post_json("/api/catalog/update", json!({"source": "curated"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "CONFLICT");

    // nothing new was recorded and the catalog is unchanged
    assert_eq!(state.updates.read().await.len(), 1);
    assert_eq!(state.catalog.read().await.len(), 6);

    // once the running update finishes, a new one is accepted
    if let Some(update) = state.updates.write().await.get_mut(&running.update_id) {
        update.fail("cancelled");
    }
    let response = app
        .oneshot(post_json("/api/catalog/update", json!({"source": "curated"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_finished_updates_are_capped() {
    let (state, app) = setup_app();
    {
        let mut updates = state.updates.write().await;
        for _ in 0..MAX_FINISHED_UPDATES + 5 {
            let mut update = CatalogUpdate::start(UpdateSource::Curated);
            update.complete(0);
            updates.insert(update.update_id, update);
        }
    }

    let response = app
        .oneshot(post_json("/api/catalog/update", json!({"source": "curated"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    // the capped history plus the update just started
    assert!(state.updates.read().await.len() <= MAX_FINISHED_UPDATES + 1);
}
