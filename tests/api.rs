use std::sync::{Arc, Mutex};

use actix_web::{test, web, App};
use serde_json::{json, Value};

use blue::ai::{Composer, GeminiClient};
use blue::core::db::StoreAdapter;
use blue::handlers::{self, AppState};
use blue::settings::ThemeSink;

struct NullTheme;

impl ThemeSink for NullTheme {
    fn set_dark_mode(&self, _enabled: bool) {}
}

fn test_state() -> web::Data<Mutex<AppState>> {
    let store = StoreAdapter::in_memory();
    web::Data::new(Mutex::new(
        AppState::open(store, Arc::new(NullTheme)).unwrap(),
    ))
}

fn test_composer() -> web::Data<Composer> {
    // Unreachable gateway: AI endpoints exercise the fallback paths.
    web::Data::new(Composer::new(Arc::new(GeminiClient::new(
        String::new(),
        "http://127.0.0.1:1".to_string(),
    ))))
}

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .app_data(test_state())
                .app_data(test_composer())
                .configure(handlers::routes),
        )
        .await
    };
}

#[actix_web::test]
async fn login_then_post_flow() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"name": "Jane Doe", "handle": "janedoe", "email": "jane@example.com"}))
        .to_request();
    let user: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(user["handle"], "@janedoe");
    assert_eq!(user["followers"], 0);

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"content": "Hello Blue!"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.as_array().unwrap().len(), 1);
    assert_eq!(posts[0]["content"], "Hello Blue!");
    assert_eq!(posts[0]["timestamp"], "Just now");
    assert_eq!(posts[0]["userHandle"], "@janedoe");
}

#[actix_web::test]
async fn posting_requires_a_session_and_content() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"content": "no session yet"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"name": "Jane", "handle": "jane"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"content": "   "}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get().uri("/posts").to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert!(posts.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn author_filter_and_profile_roundtrip() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"name": "Jane", "handle": "jane"}))
        .to_request();
    let user: Value = test::call_and_read_body_json(&app, req).await;
    let user_id = user["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/posts")
        .set_json(json!({"content": "mine"}))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts?author={}", user_id))
        .to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(posts.as_array().unwrap().len(), 1);

    let req = test::TestRequest::get()
        .uri("/posts?author=nobody123")
        .to_request();
    let posts: Value = test::call_and_read_body_json(&app, req).await;
    assert!(posts.as_array().unwrap().is_empty());

    let req = test::TestRequest::get().uri("/profile").to_request();
    let profile: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile["id"], user_id.as_str());
}

#[actix_web::test]
async fn settings_merge_over_http() {
    let app = test_app!();

    let req = test::TestRequest::put()
        .uri("/settings")
        .set_json(json!({"darkMode": true}))
        .to_request();
    let settings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(settings["darkMode"], true);
    assert_eq!(settings["emailNotifications"], true);

    let req = test::TestRequest::put()
        .uri("/settings")
        .set_json(json!({"emailNotifications": false}))
        .to_request();
    let settings: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(settings["darkMode"], true);
    assert_eq!(settings["emailNotifications"], false);
    assert_eq!(settings["contentFilter"], "standard");
}

#[actix_web::test]
async fn follow_toggle_roundtrip() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/follow")
        .set_json(json!({"targetUserId": "zeta9"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["following"], true);

    let req = test::TestRequest::post()
        .uri("/follow")
        .set_json(json!({"targetUserId": "zeta9"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["following"], false);

    let req = test::TestRequest::post()
        .uri("/follow")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn trending_serves_the_fixed_fallback_when_gateway_is_down() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/ai/trending").to_request();
    let topics: Value = test::call_and_read_body_json(&app, req).await;
    let topics = topics.as_array().unwrap();
    assert_eq!(topics.len(), 2);
    assert_eq!(topics[0]["topic"], "Blue AI");
    assert_eq!(topics[1]["topic"], "Remote Work");
}

#[actix_web::test]
async fn enhance_applies_the_apology_fallback() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/ai/enhance")
        .set_json(json!({"prompt": "rust memes"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["text"], blue::ai::BUSY_FALLBACK);

    let req = test::TestRequest::post()
        .uri("/ai/enhance")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn index_page_is_embedded() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("Blue"));
}
