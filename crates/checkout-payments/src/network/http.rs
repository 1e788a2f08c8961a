//! HTTP Payment Network Client

use async_trait::async_trait;
use reqwest::header::LOCATION;

use super::PaymentNetwork;
use crate::error::{PaymentNetworkError, Result};
use crate::model::{Customer, CustomerRef, CustomerSearchPage, LinkingToken, NewCustomer};

/// Payment network configuration
#[derive(Clone, Debug)]
pub struct PaymentNetworkConfig {
    /// API base URL
    pub api_base: String,

    /// OAuth application client id
    pub client_id: String,

    /// OAuth application client secret
    pub client_secret: String,

    /// Long-lived account access token used for server-side calls
    pub access_token: String,
}

impl PaymentNetworkConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let api_base = std::env::var("PAYMENT_NETWORK_API_BASE")
            .unwrap_or_else(|_| "https://api-sandbox.banklink.example".into());
        let client_id = require_env("PAYMENT_NETWORK_CLIENT_ID")?;
        let client_secret = require_env("PAYMENT_NETWORK_CLIENT_SECRET")?;
        let access_token = require_env("PAYMENT_NETWORK_ACCESS_TOKEN")?;

        Ok(Self {
            api_base,
            client_id,
            client_secret,
            access_token,
        })
    }
}

fn require_env(name: &'static str) -> Result<String> {
    std::env::var(name).map_err(|_| PaymentNetworkError::Config(format!("{name} not set")))
}

/// reqwest-backed implementation of [`PaymentNetwork`]
pub struct HttpPaymentNetwork {
    client: reqwest::Client,
    config: PaymentNetworkConfig,
}

impl HttpPaymentNetwork {
    /// Create a client from explicit configuration
    pub fn new(config: PaymentNetworkConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(PaymentNetworkConfig::from_env()?))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base.trim_end_matches('/'), path)
    }

    /// Map a non-success response into an API error
    async fn api_error(response: reqwest::Response) -> PaymentNetworkError {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        PaymentNetworkError::Api { status, message }
    }
}

#[async_trait]
impl PaymentNetwork for HttpPaymentNetwork {
    async fn search_customers(&self, email: &str) -> Result<Vec<Customer>> {
        let response = self
            .client
            .get(self.url("/customers"))
            .bearer_auth(&self.config.access_token)
            .query(&[("search", email)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let page: CustomerSearchPage = response.json().await?;
        Ok(page.embedded.customers)
    }

    async fn create_customer(&self, new: &NewCustomer) -> Result<CustomerRef> {
        let response = self
            .client
            .post(self.url("/customers"))
            .bearer_auth(&self.config.access_token)
            .json(new)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        let href = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(PaymentNetworkError::MissingLocation("customer creation"))?;

        tracing::info!(customer = %href, "Created payment network customer");
        Ok(CustomerRef::new(href))
    }

    async fn create_linking_token(&self, customer: &CustomerRef) -> Result<LinkingToken> {
        let response = self
            .client
            .post(format!("{}/linking-tokens", customer.href()))
            .bearer_auth(&self.config.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::api_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn health_check(&self) -> bool {
        let probe = self
            .client
            .get(self.url("/"))
            .bearer_auth(&self.config.access_token)
            .send()
            .await;

        match probe {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Payment network health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "PaymentNetworkHttp"
    }
}
