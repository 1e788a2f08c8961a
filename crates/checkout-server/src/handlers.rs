//! HTTP Handlers

use axum::{Form, Json, extract::State, http::StatusCode, response::Html};
use serde::{Deserialize, Serialize};

use crate::checkout::{ChargeRequest, CheckoutError, run_checkout};
use crate::pages;
use crate::state::AppState;

/// JSON error body returned on failed requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub billing_reachable: bool,
    pub payment_network_reachable: bool,
}

/// Form posted by the widget callback
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeForm {
    pub funding_source: String,
    pub customer_id: String,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, message: &str, code: &str) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
            code: code.into(),
        }),
    )
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        billing_reachable: state.billing.health_check().await,
        payment_network_reachable: state.network.health_check().await,
    })
}

/// Landing page: resolve the customer, issue a linking token, render the
/// bank-linking widget page
pub async fn landing(State(state): State<AppState>) -> Result<Html<String>, HandlerError> {
    let customer = state
        .resolver
        .resolve(state.network.as_ref())
        .await
        .map_err(|e| {
            tracing::error!("Customer resolution failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.user_message(),
                "CUSTOMER_ERROR",
            )
        })?;

    let customer_id = customer
        .id()
        .map_err(|e| {
            tracing::error!("Customer reference not parseable: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "The payment network returned an unexpected customer reference.",
                "CUSTOMER_REF_ERROR",
            )
        })?
        .to_string();

    let token = state
        .network
        .create_linking_token(&customer)
        .await
        .map_err(|e| {
            tracing::error!("Linking token issue failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.user_message(),
                "LINKING_TOKEN_ERROR",
            )
        })?;

    Ok(Html(pages::landing(&token.token, &customer_id, &state.offer)))
}

/// Checkout: run the billing sequence and render the invoice
pub async fn charge(
    State(state): State<AppState>,
    Form(form): Form<ChargeForm>,
) -> Result<Html<String>, HandlerError> {
    let request = ChargeRequest {
        funding_source: form.funding_source,
        customer_id: form.customer_id,
    };

    let outcome = run_checkout(
        state.billing.as_ref(),
        &state.offer,
        &state.call_context,
        state.correlation,
        &request,
    )
    .await
    .map_err(|e| {
        tracing::error!("Checkout failed: {}", e);
        let status = match &e {
            CheckoutError::FundingSource(_) => StatusCode::BAD_REQUEST,
            CheckoutError::Billing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, e.user_message(), "CHECKOUT_ERROR")
    })?;

    Ok(Html(pages::invoice(&outcome)))
}
