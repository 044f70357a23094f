mod app;
mod auth;
mod config;
mod db;
mod error;
mod observability;
mod recipes;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    observability::init_tracing()?;

    let app_state = AppState::init().await?;
    let addr = app_state.config.listen_addr;
    tracing::info!("database ready");

    app::serve(app::build_app(app_state), addr).await
}
