//! Mock Billing Gateway
//!
//! For orchestration tests. Records the ordered operations it serves and
//! can be scripted to fail the next subscription creation, so sequencing
//! and the tolerated lock-contention path are testable without a billing
//! backend.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::BillingGateway;
use crate::context::CallContext;
use crate::error::{BillingError, Result};
use crate::model::{
    Account, Invoice, InvoiceItem, NewAccount, NewPaymentMethod, NewSubscription, Subscription,
};

/// Recording implementation of [`BillingGateway`]
pub struct MockBillingGateway {
    calls: Mutex<Vec<&'static str>>,
    accounts: Mutex<Vec<Account>>,
    payment_methods: Mutex<Vec<NewPaymentMethod>>,
    subscriptions: Mutex<Vec<NewSubscription>>,
    invoices: Mutex<Vec<Invoice>>,
    next_subscription_failure: Mutex<Option<BillingError>>,
    next_id: AtomicUsize,
}

impl Default for MockBillingGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBillingGateway {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            accounts: Mutex::new(Vec::new()),
            payment_methods: Mutex::new(Vec::new()),
            subscriptions: Mutex::new(Vec::new()),
            invoices: Mutex::new(Vec::new()),
            next_subscription_failure: Mutex::new(None),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Script the next `create_subscription` call to fail
    pub fn fail_next_subscription(&self, err: BillingError) {
        *self.next_subscription_failure.lock().unwrap() = Some(err);
    }

    /// Operation names in the order they were served
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    /// Accounts created so far
    pub fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().unwrap().clone()
    }

    /// Payment method requests received so far
    pub fn payment_methods(&self) -> Vec<NewPaymentMethod> {
        self.payment_methods.lock().unwrap().clone()
    }

    /// Subscription requests received so far
    pub fn subscriptions(&self) -> Vec<NewSubscription> {
        self.subscriptions.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }

    fn mint_id(&self, kind: &str) -> String {
        format!("{kind}-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

#[async_trait]
impl BillingGateway for MockBillingGateway {
    async fn create_account(&self, new: &NewAccount, _ctx: &CallContext) -> Result<Account> {
        self.record("create_account");

        let account = Account {
            account_id: self.mint_id("ACC"),
            name: new.name.clone(),
            currency: new.currency.clone(),
            external_key: new.external_key.clone(),
        };
        self.accounts.lock().unwrap().push(account.clone());

        Ok(account)
    }

    async fn create_payment_method(
        &self,
        new: &NewPaymentMethod,
        _set_default: bool,
        _ctx: &CallContext,
    ) -> Result<String> {
        self.record("create_payment_method");
        self.payment_methods.lock().unwrap().push(new.clone());

        Ok(self.mint_id("PM"))
    }

    async fn create_subscription(
        &self,
        new: &NewSubscription,
        _ctx: &CallContext,
    ) -> Result<Subscription> {
        self.record("create_subscription");

        if let Some(err) = self.next_subscription_failure.lock().unwrap().take() {
            return Err(err);
        }

        self.subscriptions.lock().unwrap().push(new.clone());

        let subscription = Subscription {
            subscription_id: self.mint_id("SUB"),
            account_id: new.account_id.clone(),
            product_name: new.product_name.clone(),
            state: Some("ACTIVE".into()),
        };

        // A successful subscription immediately produces its first invoice,
        // charged at the trial override when one is present.
        let amount = new
            .price_overrides
            .first()
            .map_or(Decimal::ZERO, |o| o.fixed_price);
        self.invoices.lock().unwrap().push(Invoice {
            invoice_id: self.mint_id("INV"),
            amount,
            currency: "USD".into(),
            items: vec![InvoiceItem {
                subscription_id: Some(subscription.subscription_id.clone()),
                amount,
                start_date: Some(Utc::now().date_naive()),
                phase_name: Some(format!(
                    "{}-monthly-trial",
                    new.product_name.to_lowercase()
                )),
            }],
        });

        Ok(subscription)
    }

    async fn account_invoices(
        &self,
        _account_id: &str,
        _with_items: bool,
        _ctx: &CallContext,
    ) -> Result<Vec<Invoice>> {
        self.record("account_invoices");
        Ok(self.invoices.lock().unwrap().clone())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "MockBillingGateway"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ctx() -> CallContext {
        CallContext {
            created_by: "demo".into(),
            reason: "New subscription".into(),
            comment: "test".into(),
        }
    }

    #[tokio::test]
    async fn successful_subscription_seeds_an_invoice() {
        let gateway = MockBillingGateway::new();

        let subscription = gateway
            .create_subscription(
                &NewSubscription {
                    account_id: "a1".into(),
                    product_name: "Sports".into(),
                    product_category: "BASE".into(),
                    billing_period: "MONTHLY".into(),
                    price_list: "DEFAULT".into(),
                    price_overrides: vec![crate::model::PhasePriceOverride {
                        phase_type: crate::model::PhaseType::Trial,
                        fixed_price: dec!(10.0),
                    }],
                },
                &ctx(),
            )
            .await
            .unwrap();

        let invoices = gateway.account_invoices("a1", true, &ctx()).await.unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].amount, dec!(10.0));
        assert_eq!(
            invoices[0].items[0].subscription_id.as_deref(),
            Some(subscription.subscription_id.as_str())
        );
    }

    #[tokio::test]
    async fn scripted_failure_fires_once() {
        let gateway = MockBillingGateway::new();
        gateway.fail_next_subscription(BillingError::AccountLocked("locked".into()));

        let new = NewSubscription {
            account_id: "a1".into(),
            product_name: "Sports".into(),
            product_category: "BASE".into(),
            billing_period: "MONTHLY".into(),
            price_list: "DEFAULT".into(),
            price_overrides: Vec::new(),
        };

        let err = gateway.create_subscription(&new, &ctx()).await.unwrap_err();
        assert!(err.is_lock_contention());

        gateway.create_subscription(&new, &ctx()).await.unwrap();
    }
}
