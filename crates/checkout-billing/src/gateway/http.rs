//! HTTP Billing Gateway

use async_trait::async_trait;
use reqwest::RequestBuilder;
use reqwest::header::LOCATION;

use super::BillingGateway;
use crate::context::{CallContext, TenantCredentials};
use crate::error::{BillingError, Result};
use crate::model::{Account, Invoice, NewAccount, NewPaymentMethod, NewSubscription, Subscription};

/// Billing service configuration
#[derive(Clone, Debug)]
pub struct BillingConfig {
    /// Billing service base URL
    pub base_url: String,

    /// Multi-tenant credentials
    pub credentials: TenantCredentials,
}

impl BillingConfig {
    /// Read configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("BILLING_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".into()),
            credentials: TenantCredentials::from_env(),
        }
    }
}

/// reqwest-backed implementation of [`BillingGateway`]
pub struct HttpBillingGateway {
    client: reqwest::Client,
    config: BillingConfig,
}

impl HttpBillingGateway {
    /// Create a gateway from explicit configuration
    pub fn new(config: BillingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create a gateway from environment variables
    pub fn from_env() -> Self {
        Self::new(BillingConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attach the tenant and audit headers shared by every call
    fn request(&self, builder: RequestBuilder, ctx: &CallContext) -> RequestBuilder {
        let creds = &self.config.credentials;
        builder
            .basic_auth(&creds.username, Some(&creds.password))
            .header("X-Billing-ApiKey", &creds.api_key)
            .header("X-Billing-ApiSecret", &creds.api_secret)
            .header("X-Billing-CreatedBy", &ctx.created_by)
            .header("X-Billing-Reason", &ctx.reason)
            .header("X-Billing-Comment", &ctx.comment)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(BillingError::from_api_response(status, message))
    }

    /// POST, then GET the returned Location to materialize the resource
    async fn create_and_fetch<T: serde::de::DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        ctx: &CallContext,
        what: &'static str,
    ) -> Result<T> {
        let response = Self::check(self.request(builder, ctx).send().await?).await?;

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(BillingError::MissingLocation(what))?
            .to_string();

        let fetched = self.request(self.client.get(&location), ctx).send().await?;
        Ok(Self::check(fetched).await?.json().await?)
    }
}

#[async_trait]
impl BillingGateway for HttpBillingGateway {
    async fn create_account(&self, new: &NewAccount, ctx: &CallContext) -> Result<Account> {
        let account: Account = self
            .create_and_fetch(
                self.client.post(self.url("/accounts")).json(new),
                ctx,
                "account creation",
            )
            .await?;

        tracing::info!(account_id = %account.account_id, "Created billing account");
        Ok(account)
    }

    async fn create_payment_method(
        &self,
        new: &NewPaymentMethod,
        set_default: bool,
        ctx: &CallContext,
    ) -> Result<String> {
        let path = format!("/accounts/{}/paymentMethods", new.account_id);
        let response = self
            .request(
                self.client
                    .post(self.url(&path))
                    .query(&[("isDefault", set_default)])
                    .json(new),
                ctx,
            )
            .send()
            .await?;
        let response = Self::check(response).await?;

        let href = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(BillingError::MissingLocation("payment method creation"))?;
        let id = href.rsplit('/').next().unwrap_or(href).to_string();

        tracing::info!(payment_method_id = %id, "Created payment method");
        Ok(id)
    }

    async fn create_subscription(
        &self,
        new: &NewSubscription,
        ctx: &CallContext,
    ) -> Result<Subscription> {
        let subscription: Subscription = self
            .create_and_fetch(
                self.client
                    .post(self.url("/subscriptions"))
                    .query(&[("callCompletion", true)])
                    .json(new),
                ctx,
                "subscription creation",
            )
            .await?;

        tracing::info!(subscription_id = %subscription.subscription_id, "Created subscription");
        Ok(subscription)
    }

    async fn account_invoices(
        &self,
        account_id: &str,
        with_items: bool,
        ctx: &CallContext,
    ) -> Result<Vec<Invoice>> {
        let path = format!("/accounts/{account_id}/invoices");
        let response = self
            .request(
                self.client
                    .get(self.url(&path))
                    .query(&[("withItems", with_items)]),
                ctx,
            )
            .send()
            .await?;

        Ok(Self::check(response).await?.json().await?)
    }

    async fn health_check(&self) -> bool {
        match self.client.get(self.url("/healthcheck")).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Billing health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "BillingHttp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;

    use crate::model::{PhasePriceOverride, PhaseType};

    fn gateway(base: &str) -> HttpBillingGateway {
        HttpBillingGateway::new(BillingConfig {
            base_url: base.into(),
            credentials: TenantCredentials {
                username: "admin".into(),
                password: "password".into(),
                api_key: "demo".into(),
                api_secret: "demo-secret".into(),
            },
        })
    }

    fn ctx() -> CallContext {
        CallContext {
            created_by: "demo".into(),
            reason: "New subscription".into(),
            comment: "Triggered by checkout demo".into(),
        }
    }

    fn new_subscription(account_id: &str) -> NewSubscription {
        NewSubscription {
            account_id: account_id.into(),
            product_name: "Sports".into(),
            product_category: "BASE".into(),
            billing_period: "MONTHLY".into(),
            price_list: "DEFAULT".into(),
            price_overrides: vec![PhasePriceOverride {
                phase_type: PhaseType::Trial,
                fixed_price: dec!(10.0),
            }],
        }
    }

    #[tokio::test]
    async fn create_account_follows_location() {
        let server = MockServer::start_async().await;
        let location = server.url("/accounts/a1");

        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/accounts")
                    .header("X-Billing-ApiKey", "demo")
                    .header("X-Billing-ApiSecret", "demo-secret")
                    .header("X-Billing-CreatedBy", "demo")
                    .header("X-Billing-Reason", "New subscription");
                then.status(201).header("Location", &location);
            })
            .await;
        let fetch = server
            .mock_async(|when, then| {
                when.method(GET).path("/accounts/a1");
                then.status(200).json_body(serde_json::json!({
                    "accountId": "a1",
                    "name": "John Doe",
                    "currency": "USD",
                    "externalKey": "CUST1"
                }));
            })
            .await;

        let account = gateway(&server.base_url())
            .create_account(
                &NewAccount {
                    name: "John Doe".into(),
                    currency: "USD".into(),
                    external_key: Some("CUST1".into()),
                },
                &ctx(),
            )
            .await
            .unwrap();

        create.assert_async().await;
        fetch.assert_async().await;
        assert_eq!(account.account_id, "a1");
        assert_eq!(account.external_key.as_deref(), Some("CUST1"));
    }

    #[tokio::test]
    async fn payment_method_id_comes_from_location() {
        let server = MockServer::start_async().await;
        let location = server.url("/paymentMethods/pm1");

        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/accounts/a1/paymentMethods")
                    .query_param("isDefault", "true");
                then.status(201).header("Location", &location);
            })
            .await;

        let id = gateway(&server.base_url())
            .create_payment_method(
                &NewPaymentMethod::bank_transfer("a1", "FS1", "CUST1"),
                true,
                &ctx(),
            )
            .await
            .unwrap();

        create.assert_async().await;
        assert_eq!(id, "pm1");
    }

    #[tokio::test]
    async fn lock_contention_is_classified() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/subscriptions")
                    .query_param("callCompletion", "true");
                then.status(500).body("Failed to lock account record");
            })
            .await;

        let err = gateway(&server.base_url())
            .create_subscription(&new_subscription("a1"), &ctx())
            .await
            .unwrap_err();

        assert!(err.is_lock_contention());
    }

    #[tokio::test]
    async fn invoices_deserialize_with_items() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/accounts/a1/invoices")
                    .query_param("withItems", "true");
                then.status(200).json_body(serde_json::json!([{
                    "invoiceId": "i1",
                    "amount": 10.0,
                    "currency": "USD",
                    "items": [{
                        "subscriptionId": "s1",
                        "amount": 10.0,
                        "startDate": "2016-08-01"
                    }]
                }]));
            })
            .await;

        let invoices = gateway(&server.base_url())
            .account_invoices("a1", true, &ctx())
            .await
            .unwrap();

        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].items[0].amount, dec!(10.0));
    }
}
