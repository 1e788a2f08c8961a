//! Billing Gateway
//!
//! Abstraction over the billing service API plus implementations.

mod http;
mod mock;

pub use http::{BillingConfig, HttpBillingGateway};
pub use mock::MockBillingGateway;

use async_trait::async_trait;

use crate::context::CallContext;
use crate::error::Result;
use crate::model::{Account, Invoice, NewAccount, NewPaymentMethod, NewSubscription, Subscription};

/// Billing service seam
///
/// One implementation per backend: the real HTTP API, or the recording
/// mock used by orchestration tests.
#[async_trait]
pub trait BillingGateway: Send + Sync {
    /// Create an account and return its materialized form
    async fn create_account(&self, new: &NewAccount, ctx: &CallContext) -> Result<Account>;

    /// Attach a payment method to an account, returning its id
    async fn create_payment_method(
        &self,
        new: &NewPaymentMethod,
        set_default: bool,
        ctx: &CallContext,
    ) -> Result<String>;

    /// Create a subscription, waiting for call completion
    async fn create_subscription(
        &self,
        new: &NewSubscription,
        ctx: &CallContext,
    ) -> Result<Subscription>;

    /// List an account's invoices
    async fn account_invoices(
        &self,
        account_id: &str,
        with_items: bool,
        ctx: &CallContext,
    ) -> Result<Vec<Invoice>>;

    /// Whether the billing service answers at all
    async fn health_check(&self) -> bool;

    /// Implementation name (for logs)
    fn name(&self) -> &str;
}
