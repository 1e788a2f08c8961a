//! Bank Checkout Demo Server
//!
//! Axum server wiring the payment network and billing service clients
//! into the demo checkout flow: resolve a payment-network customer,
//! collect a funding source through the embedded bank-linking widget,
//! then create the billing account, payment method, and subscription and
//! render the resulting invoice.

mod checkout;
mod handlers;
mod pages;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_billing::{BillingGateway, CallContext, HttpBillingGateway};
use checkout_payments::{CustomerResolver, HttpPaymentNetwork, PaymentNetwork, ResolveStrategy};

use crate::checkout::{CheckoutOffer, CorrelationMode};
use crate::handlers::{charge, health_check, landing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Construct the two service clients explicitly; configuration is
    // read once here and immutable afterwards.
    let billing: Arc<dyn BillingGateway> = Arc::new(HttpBillingGateway::from_env());
    let network: Arc<dyn PaymentNetwork> = Arc::new(
        HttpPaymentNetwork::from_env().context("payment network configuration")?,
    );

    let strategy = ResolveStrategy::from_env();
    let correlation = CorrelationMode::from_env();
    tracing::info!(
        strategy = %strategy.as_str(),
        correlation = ?correlation,
        "Checkout configuration"
    );

    if billing.health_check().await {
        tracing::info!("✓ Billing service reachable");
    } else {
        tracing::warn!("⚠ Billing service not reachable - checkout will fail");
        tracing::warn!("  Set BILLING_URL (default http://127.0.0.1:8080)");
    }

    if network.health_check().await {
        tracing::info!("✓ Payment network reachable");
    } else {
        tracing::warn!("⚠ Payment network not reachable - landing page will fail");
        tracing::warn!("  Set PAYMENT_NETWORK_API_BASE and PAYMENT_NETWORK_ACCESS_TOKEN");
    }

    // Build application state
    let state = AppState {
        network,
        billing,
        resolver: Arc::new(CustomerResolver::new(strategy)),
        offer: Arc::new(CheckoutOffer::default()),
        call_context: Arc::new(CallContext::from_env()),
        correlation,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router
    let app = Router::new()
        .route("/", get(landing))
        .route("/charge", post(charge))
        .route("/health", get(health_check))
        // Widget stylesheet
        .nest_service("/static", ServeDir::new("static"))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Bank checkout demo running on http://{}", addr);
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /        - Landing page (bank-linking widget)");
    tracing::info!("  POST /charge  - Checkout");
    tracing::info!("  GET  /health  - Health check");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}
