mod api;
mod middleware;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Config is validated in full before anything is served: a deployment
    // missing its identifiers or credentials must refuse to start, not let
    // the scheduler's retries mask the breakage.
    let config = chatwatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = chatwatch_db::PoolConfig::from_app_config(&config);
    let pool = chatwatch_db::connect_pool(&config.database_url, pool_config).await?;
    chatwatch_db::run_migrations(&pool).await?;

    let chat = Arc::new(chatwatch_chat::LiveChatClient::new(
        &config.youtube_api_key,
        config.chat_request_timeout_secs,
    )?);
    let scorer: Arc<dyn chatwatch_sentiment::SentimentScorer> =
        Arc::new(chatwatch_sentiment::GoogleLanguageClient::new(
            &config.sentiment_api_key,
            config.sentiment_request_timeout_secs,
        )?);

    let app = build_app(AppState {
        pool,
        chat,
        scorer,
        target_authors: Arc::new(config.target_authors.clone()),
        chat_max_results: config.chat_max_results,
    });

    tracing::info!(addr = %config.bind_addr, env = %config.env, "starting chatwatch server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
