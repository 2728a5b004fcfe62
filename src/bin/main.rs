use std::sync::{Arc, Mutex};

use actix_web::{web, App, HttpServer};
use tracing_subscriber::EnvFilter;

use blue::ai::{Composer, ContentGateway, GeminiClient};
use blue::config;
use blue::core::db::StoreAdapter;
use blue::handlers::{self, AppState};
use blue::settings::ProcessTheme;

fn init_tracing() {
    let filter = std::env::var("RUST_LOG")
        .map(EnvFilter::new)
        .unwrap_or_else(|_| EnvFilter::new("blue=info,actix_web=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let store = StoreAdapter::file(config::store_path());
    let state = web::Data::new(Mutex::new(AppState::open(store, Arc::new(ProcessTheme))?));

    let gateway: Arc<dyn ContentGateway> = Arc::new(GeminiClient::from_env());
    let composer = web::Data::new(Composer::new(gateway));

    let addr = config::listen_addr();
    tracing::info!(%addr, "blue listening");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(composer.clone())
            .configure(handlers::routes)
    })
    .bind(&addr)?
    .run()
    .await?;

    Ok(())
}
