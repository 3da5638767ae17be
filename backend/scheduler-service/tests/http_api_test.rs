/// HTTP surface tests: routing, status codes and response shapes
mod common;

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use common::{
    days_ago, failing_service, service_with, storeless_service, InMemoryStore, ADMIN_TOKEN,
};
use scheduler_service::handlers::{configure, ADMIN_TOKEN_HEADER};

macro_rules! app {
    ($service:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($service))
                .configure(configure),
        )
        .await
    };
}

fn weights_body(w_e: f64, w_r: f64) -> Value {
    json!({
        "account": "acc",
        "w_engagement": w_e,
        "w_relevance": w_r,
        "learning_rate": 0.05
    })
}

#[actix_web::test]
async fn test_health() {
    let app = app!(storeless_service());

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "scheduler-service");
}

#[actix_web::test]
async fn test_store_health_states() {
    let app = app!(storeless_service());
    let req = test::TestRequest::get().uri("/health/store").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["store_connection"], "not_configured");

    let app = app!(failing_service());
    let req = test::TestRequest::get().uri("/health/store").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["store_connection"], "failed");
    assert!(body["detail"].is_string());
}

#[actix_web::test]
async fn test_next_post_shape() {
    let app = app!(storeless_service());

    let req = test::TestRequest::get()
        .uri("/scheduler/next_post?account=vibecodinglatam")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["account"], "vibecodinglatam");
    assert!(body["recommended_time"].is_string());
    assert!(body["content_type"].is_string());
    assert!(body["topic"].is_string());
    assert!(body["priority"].is_number());
}

#[actix_web::test]
async fn test_next_post_defaults_account() {
    let app = app!(storeless_service());

    let req = test::TestRequest::get().uri("/scheduler/next_post").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["account"], "vibecodinglatam");
}

#[actix_web::test]
async fn test_trends_empty() {
    let app = app!(service_with(Arc::new(InMemoryStore::new())));

    let req = test::TestRequest::get()
        .uri("/scheduler/trends?limit=6")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn test_feedback_without_store() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/scheduler/feedback")
        .set_json(json!({
            "account": "vibecodinglatam",
            "post_id": "post_test_1",
            "likes": 10,
            "comments": 2,
            "saves": 1,
            "reach": 1000,
            "followers": 1000,
            "content_type": "reel"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["stored"], false);
    assert_eq!(body["engagement_score"], 0.0145);
}

#[actix_web::test]
async fn test_feedback_rejects_empty_account() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/scheduler/feedback")
        .set_json(json!({
            "account": "",
            "post_id": "p",
            "likes": 1,
            "comments": 0,
            "saves": 0,
            "reach": 10
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_weights_store_unavailable() {
    let app = app!(storeless_service());

    let req = test::TestRequest::get()
        .uri("/scheduler/weights?account=x")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["error"], "store_unavailable");
    assert_eq!(body["w_engagement"], 0.6);
    assert_eq!(body["w_relevance"], 0.4);
}

#[actix_web::test]
async fn test_update_weights_bad_token() {
    let app = app!(service_with(Arc::new(InMemoryStore::new())));

    let req = test::TestRequest::post()
        .uri("/scheduler/weights/update")
        .insert_header((ADMIN_TOKEN_HEADER, "bad"))
        .set_json(weights_body(0.6, 0.4))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_update_weights_missing_token() {
    let app = app!(service_with(Arc::new(InMemoryStore::new())));

    let req = test::TestRequest::post()
        .uri("/scheduler/weights/update")
        .set_json(weights_body(0.6, 0.4))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_update_weights_sum_out_of_tolerance() {
    let store = Arc::new(InMemoryStore::new());
    let app = app!(service_with(store.clone()));

    let req = test::TestRequest::post()
        .uri("/scheduler/weights/update")
        .insert_header((ADMIN_TOKEN_HEADER, ADMIN_TOKEN))
        .set_json(weights_body(1.0, 0.2))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.params("acc").is_none());
}

#[actix_web::test]
async fn test_update_weights_success() {
    let store = Arc::new(InMemoryStore::new());
    let app = app!(service_with(store.clone()));

    let req = test::TestRequest::post()
        .uri("/scheduler/weights/update")
        .insert_header((ADMIN_TOKEN_HEADER, ADMIN_TOKEN))
        .set_json(weights_body(0.65, 0.35))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "updated");
    assert_eq!(body["new_weights"]["w_engagement"], 0.65);
    assert_eq!(body["new_weights"]["w_relevance"], 0.35);
    assert_eq!(body["previous_weights"]["w_engagement"], 0.6);
    assert_eq!(store.audit().len(), 1);
}

#[actix_web::test]
async fn test_score_text() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/semantic/score")
        .set_json(json!({
            "text": "IA generativa para comunidades",
            "context": "comunidades de IA en latam"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["relevance"], 1.0);
    assert_eq!(body["momentum"], 1.0);
    assert_eq!(body["roi_prediction"], 1.0);
}

#[actix_web::test]
async fn test_run_daily() {
    let store = Arc::new(InMemoryStore::new());
    let app = app!(service_with(store.clone()));

    let req = test::TestRequest::post()
        .uri("/scheduler/run_daily")
        .set_json(json!({ "accounts": ["vibecodinglatam", "consdelrosario"] }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let results = body["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["scheduled"]["account"], "vibecodinglatam");
    assert_eq!(results[1]["scheduled"]["account"], "consdelrosario");
    assert_eq!(results[0]["item_id"], 1);
    assert_eq!(store.items().len(), 2);
}

#[actix_web::test]
async fn test_run_daily_rejects_empty_accounts() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/scheduler/run_daily")
        .set_json(json!({ "accounts": [] }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_generator_post() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/generator/post")
        .set_json(json!({
            "topic": "Liderazgo consciente",
            "account": "wavwearevision",
            "keywords": ["cultura"]
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let text = body["text"].as_str().expect("text");
    assert!(text.starts_with("Liderazgo consciente"));
    assert_eq!(body["hashtags"][0], "#Cultura");
}

#[actix_web::test]
async fn test_insert_item() {
    let store = Arc::new(InMemoryStore::new());
    let app = app!(service_with(store.clone()));

    let req = test::TestRequest::post()
        .uri("/items")
        .set_json(json!({ "title": "Nueva tendencia", "url": "https://example.org/a" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["inserted_id"], 1);
    assert_eq!(store.items()[0].source.as_deref(), Some("manual"));

    let app = app!(storeless_service());
    let req = test::TestRequest::post()
        .uri("/items")
        .set_json(json!({ "title": "Nueva tendencia" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "error");
}

#[actix_web::test]
async fn test_auto_generate_empty_body_uses_default_account() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/scheduler/auto_generate")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["scheduled"]["account"], "vibecodinglatam");
    assert!(body["content"]["text"].is_string());
}

#[actix_web::test]
async fn test_run_daily_empty_body_uses_default_account() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/scheduler/run_daily")
        .set_json(json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let results = body["results"].as_array().expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["scheduled"]["account"], "vibecodinglatam");
}

#[actix_web::test]
async fn test_malformed_json_returns_json_error() {
    let app = app!(storeless_service());

    let req = test::TestRequest::post()
        .uri("/scheduler/feedback")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
    assert!(body["error"].as_str().unwrap_or_default().starts_with("Bad request"));
}

#[actix_web::test]
async fn test_malformed_query_returns_json_error() {
    let app = app!(storeless_service());

    let req = test::TestRequest::get()
        .uri("/scheduler/trends?limit=many")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 400);
}

#[actix_web::test]
async fn test_trends_negative_limit_returns_one_entry() {
    let store = Arc::new(InMemoryStore::new());
    store.add_item("IA generativa uno", None, days_ago(1));
    store.add_item("Liderazgo consciente", None, days_ago(2));
    let app = app!(service_with(store));

    let req = test::TestRequest::get()
        .uri("/scheduler/trends?limit=-1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}
