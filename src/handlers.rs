//! HTTP boundary. Handlers parse intents and dispatch to the stores; no
//! domain logic lives here. All store state sits behind one lock, so
//! mutations stay serialized on a single logical thread of control.

use std::sync::{Arc, Mutex};

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::{json, Value};

use crate::ai::Composer;
use crate::auth::SessionManager;
use crate::core::db::StoreAdapter;
use crate::core::errors::{ApiError, AppError};
use crate::core::query_params::parse_query_params;
use crate::follow::FollowGraph;
use crate::models::models::{Post, SettingsPatch, User};
use crate::posts::FeedStore;
use crate::settings::{SettingsStore, ThemeSink};
use crate::static_server;

pub struct AppState {
    pub session: SessionManager,
    pub feed: FeedStore,
    pub settings: SettingsStore,
    pub follow: FollowGraph,
}

impl AppState {
    /// Load every store from the shared adapter. Corrupt persisted state
    /// fails here and aborts startup.
    pub fn open(store: StoreAdapter, theme: Arc<dyn ThemeSink>) -> anyhow::Result<Self> {
        Ok(AppState {
            session: SessionManager::open(store.clone())?,
            feed: FeedStore::open(store.clone())?,
            settings: SettingsStore::open(store.clone(), theme)?,
            follow: FollowGraph::open(store)?,
        })
    }
}

pub type SharedState = web::Data<Mutex<AppState>>;

type HttpResult = Result<HttpResponse, AppError>;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login))
        .route("/logout", web::post().to(logout))
        .service(
            web::resource("/profile")
                .route(web::get().to(get_profile))
                .route(web::put().to(update_profile)),
        )
        .service(
            web::resource("/posts")
                .route(web::post().to(create_post))
                .route(web::get().to(list_posts)),
        )
        .route("/follow", web::post().to(toggle_follow))
        .service(
            web::resource("/settings")
                .route(web::get().to(get_settings))
                .route(web::put().to(update_settings)),
        )
        .route("/ai/enhance", web::post().to(enhance_post))
        .route("/ai/image", web::post().to(generate_image))
        .route("/ai/trending", web::get().to(trending))
        .default_service(web::route().to(assets));
}

// === Session ===

async fn login(state: SharedState, body: web::Bytes) -> HttpResult {
    let value: Value = serde_json::from_slice(&body)?;

    let mut candidate = User::candidate(
        value["name"].as_str().unwrap_or_default(),
        value["handle"].as_str().unwrap_or_default(),
        value["email"].as_str().map(str::to_string),
    );
    if let Some(avatar) = value["avatar"].as_str() {
        candidate.avatar = avatar.to_string();
    }

    let mut app = state.lock().expect("app state lock");
    let user = app.session.login(candidate)?;
    Ok(HttpResponse::Ok().json(user))
}

async fn logout(state: SharedState) -> HttpResult {
    let mut app = state.lock().expect("app state lock");
    app.session.logout()?;
    Ok(HttpResponse::Ok().json(json!({"message": "Logged out successfully"})))
}

async fn get_profile(state: SharedState) -> HttpResult {
    let app = state.lock().expect("app state lock");
    match app.session.current() {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Ok(ApiError::Unauthorized.into()),
    }
}

async fn update_profile(state: SharedState, body: web::Bytes) -> HttpResult {
    let updated: User = serde_json::from_slice(&body)?;
    let mut app = state.lock().expect("app state lock");
    app.session.update_profile(updated.clone())?;
    Ok(HttpResponse::Ok().json(updated))
}

// === Feed ===

async fn create_post(state: SharedState, body: web::Bytes) -> HttpResult {
    let value: Value = serde_json::from_slice(&body)?;
    let content = value["content"].as_str().unwrap_or_default();
    let image = value["image"].as_str().map(str::to_string);
    let ai_generated = value["isAiGenerated"].as_bool().unwrap_or(false);

    let mut app = state.lock().expect("app state lock");
    let author = match app.session.current() {
        Some(user) => user.clone(),
        None => return Ok(ApiError::Unauthorized.into()),
    };

    match app.feed.create_post(&author, content, image, ai_generated)? {
        Some(post) => Ok(HttpResponse::Created().json(post)),
        None => Ok(ApiError::BadRequest("Post needs text or an image".to_string()).into()),
    }
}

async fn list_posts(state: SharedState, req: HttpRequest) -> HttpResult {
    let params = parse_query_params(&req.uri().to_string());
    let app = state.lock().expect("app state lock");

    let posts: Vec<Post> = match params.get("author") {
        Some(author) => app.feed.posts_by(author).cloned().collect(),
        None => app.feed.posts().to_vec(),
    };
    Ok(HttpResponse::Ok().json(posts))
}

// === Follow graph ===

async fn toggle_follow(state: SharedState, body: web::Bytes) -> HttpResult {
    let value: Value = serde_json::from_slice(&body)?;
    let target = value["targetUserId"].as_str().unwrap_or_default();
    if target.is_empty() {
        return Ok(ApiError::BadRequest("Target user required".to_string()).into());
    }

    let mut app = state.lock().expect("app state lock");
    if app.session.current().map_or(false, |user| user.id == target) {
        return Ok(ApiError::BadRequest("Invalid target user".to_string()).into());
    }

    let following = app.follow.toggle(target)?;
    Ok(HttpResponse::Ok().json(json!({"following": following})))
}

// === Settings ===

async fn get_settings(state: SharedState) -> HttpResult {
    let app = state.lock().expect("app state lock");
    Ok(HttpResponse::Ok().json(app.settings.settings()))
}

async fn update_settings(state: SharedState, body: web::Bytes) -> HttpResult {
    let patch: SettingsPatch = serde_json::from_slice(&body)?;
    let mut app = state.lock().expect("app state lock");
    app.settings.update(patch)?;
    Ok(HttpResponse::Ok().json(app.settings.settings()))
}

// === AI studio ===

async fn enhance_post(composer: web::Data<Composer>, body: web::Bytes) -> HttpResult {
    let value: Value = serde_json::from_slice(&body)?;
    let prompt = value["prompt"].as_str().unwrap_or_default();
    if prompt.is_empty() {
        return Ok(ApiError::BadRequest("Prompt required".to_string()).into());
    }

    // None means a newer request superseded this one mid-flight.
    let text = composer.enhance(prompt).await;
    Ok(HttpResponse::Ok().json(json!({"text": text})))
}

async fn generate_image(composer: web::Data<Composer>, body: web::Bytes) -> HttpResult {
    let value: Value = serde_json::from_slice(&body)?;
    let prompt = value["prompt"].as_str().unwrap_or_default();
    if prompt.is_empty() {
        return Ok(ApiError::BadRequest("Prompt required".to_string()).into());
    }

    let image = composer.gateway().generate_image(prompt).await;
    Ok(HttpResponse::Ok().json(json!({"image": image})))
}

async fn trending(composer: web::Data<Composer>) -> HttpResult {
    let topics = composer.gateway().trending_topics().await;
    Ok(HttpResponse::Ok().json(topics))
}

// === Static front end ===

async fn assets(req: HttpRequest) -> HttpResponse {
    static_server::serve_static(req.path())
}
