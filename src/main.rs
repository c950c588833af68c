//! HTTP server for the hindsight engine.
//!
//! Loads the shared engine once at startup, then serves the read-only
//! endpoints: health, BTC close lookup, series range, and date match.

use btc_garage::{api, Engine};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let _ = env_logger::try_init();
    let engine = match Engine::shared() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("failed to load datasets: {}", e);
            std::process::exit(1);
        }
    };
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    let app = api::create_router(engine);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await.expect("bind");
    eprintln!("listening on http://{}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .expect("serve");
}
