use anyhow::Context;
use tokio::net::TcpListener;

use flexform_api::routes::app_router;
use flexform_api::AppState;
use flexform_store::SubmissionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    dotenvy::dotenv().ok();
    let supabase_url = std::env::var("SUPABASE_URL").context("SUPABASE_URL must be set")?;
    let service_key =
        std::env::var("SUPABASE_SERVICE_KEY").context("SUPABASE_SERVICE_KEY must be set")?;
    let table =
        std::env::var("FLEXFORM_TABLE").unwrap_or_else(|_| "form_submissions".to_string());

    let store = SubmissionStore::new(&supabase_url, &service_key, &table)
        .map_err(|err| anyhow::anyhow!("Failed to build store client: {err}"))?;
    let app = app_router(AppState { store });

    let listener = TcpListener::bind("0.0.0.0:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
