//! Customer Resolution
//!
//! Locate-or-create logic for the demo's payment-network customer, run
//! on every landing page load.

use chrono::Utc;

use crate::error::Result;
use crate::model::{CustomerRef, NewCustomer};
use crate::network::PaymentNetwork;

/// How the landing page obtains its customer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveStrategy {
    /// Search by the fixed demo email first; create only on a miss
    LookupByEmail,

    /// Skip the search and create a fresh customer per invocation,
    /// qualifying the email local part with a unix timestamp
    AlwaysCreate,
}

impl ResolveStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            Self::LookupByEmail => "lookup",
            Self::AlwaysCreate => "always-create",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "always-create" => Self::AlwaysCreate,
            _ => Self::LookupByEmail,
        }
    }

    /// Read from `CUSTOMER_RESOLVE_STRATEGY`, defaulting to lookup
    pub fn from_env() -> Self {
        std::env::var("CUSTOMER_RESOLVE_STRATEGY")
            .map(|v| Self::from_str(&v))
            .unwrap_or(Self::LookupByEmail)
    }
}

/// Resolves the payment-network customer for a page load
#[derive(Clone, Debug)]
pub struct CustomerResolver {
    strategy: ResolveStrategy,
    email: String,
}

impl CustomerResolver {
    /// Demo email used by the lookup strategy
    pub const DEMO_EMAIL: &'static str = "no@nemail.net";

    pub fn new(strategy: ResolveStrategy) -> Self {
        Self {
            strategy,
            email: Self::DEMO_EMAIL.into(),
        }
    }

    /// Override the demo email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Return an existing customer reference or create a new one
    pub async fn resolve(&self, network: &dyn PaymentNetwork) -> Result<CustomerRef> {
        match self.strategy {
            ResolveStrategy::LookupByEmail => self.lookup_or_create(network).await,
            ResolveStrategy::AlwaysCreate => self.create_fresh(network).await,
        }
    }

    async fn lookup_or_create(&self, network: &dyn PaymentNetwork) -> Result<CustomerRef> {
        let matches = network.search_customers(&self.email).await?;

        if let Some(existing) = matches.first() {
            tracing::info!(customer = %existing.href(), "Customer found");
            return Ok(CustomerRef::new(existing.href()));
        }

        let created = network
            .create_customer(&NewCustomer::demo(self.email.as_str()))
            .await?;
        tracing::info!(customer = %created.href(), "Customer created");
        Ok(created)
    }

    async fn create_fresh(&self, network: &dyn PaymentNetwork) -> Result<CustomerRef> {
        let email = self.timestamped_email();
        let created = network.create_customer(&NewCustomer::demo(email)).await?;
        tracing::info!(customer = %created.href(), "Customer created");
        Ok(created)
    }

    /// Qualify the email local part with a seconds-resolution timestamp,
    /// guaranteeing a fresh customer per invocation without a search
    /// round-trip.
    fn timestamped_email(&self) -> String {
        match self.email.split_once('@') {
            Some((local, domain)) => format!("{local}+{}@{domain}", Utc::now().timestamp()),
            None => self.email.clone(),
        }
    }
}
