//! Vola API Server
//!
//! Main entry point for the Vola backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vola_api::{AppState, create_router};
use vola_core::currency::RateTable;
use vola_db::connect;
use vola_shared::types::Currency;
use vola_shared::{AppConfig, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vola=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Build the exchange rate table from configuration
    let rates = RateTable::from_pairs([
        (Currency::Mga, config.rates.mga),
        (Currency::Rmb, config.rates.rmb),
        (Currency::Eur, config.rates.eur),
        (Currency::Usd, config.rates.usd),
        (Currency::Aed, config.rates.aed),
    ]);
    info!(
        rmb = %config.rates.rmb,
        eur = %config.rates.eur,
        usd = %config.rates.usd,
        aed = %config.rates.aed,
        "Exchange rate table loaded"
    );

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        rates: Arc::new(rates),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
