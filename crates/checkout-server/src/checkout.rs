//! Checkout Orchestration
//!
//! The billing sequence run when the widget posts back a funding source.
//! Each step's request body depends on an identifier returned by the
//! previous step, so the order is fixed:
//! account, then payment method, then subscription, then invoice fetch.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use checkout_billing::{
    Account, BillingError, BillingGateway, CallContext, Invoice, NewAccount, NewPaymentMethod,
    NewSubscription, PhasePriceOverride, PhaseType,
};
use checkout_payments::hypermedia::HypermediaError;
use checkout_payments::model::FUNDING_SOURCES_PREFIX;
use checkout_payments::resource_id;

/// Fixed demo offer sold by the landing page
#[derive(Clone, Debug)]
pub struct CheckoutOffer {
    pub product_name: String,
    pub product_category: String,
    pub billing_period: String,
    pub price_list: String,

    /// TRIAL phase override; non-zero so the flow triggers a real charge
    pub trial_price: Decimal,

    /// Billing account display name
    pub account_name: String,
    pub currency: String,
}

impl Default for CheckoutOffer {
    fn default() -> Self {
        Self {
            product_name: "Sports".into(),
            product_category: "BASE".into(),
            billing_period: "MONTHLY".into(),
            price_list: "DEFAULT".into(),
            trial_price: dec!(10.0),
            account_name: "John Doe".into(),
            currency: "USD".into(),
        }
    }
}

/// Whether billing accounts carry the payment-network customer id as
/// their external key
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorrelationMode {
    /// Set the account external key to the customer id
    ExternalKey,

    /// Leave the account uncorrelated
    Uncorrelated,
}

impl CorrelationMode {
    /// Read from `ACCOUNT_CORRELATION`, defaulting to external-key
    pub fn from_env() -> Self {
        match std::env::var("ACCOUNT_CORRELATION").as_deref() {
            Ok("none") => Self::Uncorrelated,
            _ => Self::ExternalKey,
        }
    }

    fn external_key(self, customer_id: &str) -> Option<String> {
        match self {
            Self::ExternalKey => Some(customer_id.to_string()),
            Self::Uncorrelated => None,
        }
    }
}

/// Input posted by the widget callback
#[derive(Clone, Debug)]
pub struct ChargeRequest {
    /// URL-shaped funding source reference
    pub funding_source: String,

    /// Bare payment-network customer id
    pub customer_id: String,
}

/// Checkout result rendered by the invoice page
#[derive(Clone, Debug)]
pub struct CheckoutOutcome {
    pub account: Account,

    /// First invoice on the account, if any exists yet
    pub invoice: Option<Invoice>,
}

/// Checkout failure
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// The funding source reference from the widget was malformed
    #[error("invalid funding source reference: {0}")]
    FundingSource(#[from] HypermediaError),

    /// A billing step failed
    #[error(transparent)]
    Billing(#[from] BillingError),
}

impl CheckoutError {
    /// User-facing message, safe to surface to the end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::FundingSource(_) => "The bank-linking widget returned an invalid funding source.",
            Self::Billing(e) => e.user_message(),
        }
    }
}

/// Run the checkout sequence against the billing service.
pub async fn run_checkout(
    billing: &dyn BillingGateway,
    offer: &CheckoutOffer,
    ctx: &CallContext,
    correlation: CorrelationMode,
    request: &ChargeRequest,
) -> Result<CheckoutOutcome, CheckoutError> {
    let funding_source = resource_id(&request.funding_source, FUNDING_SOURCES_PREFIX)?;

    tracing::info!(
        customer_id = %request.customer_id,
        funding_source = %funding_source,
        "Starting checkout"
    );

    let account = billing
        .create_account(
            &NewAccount {
                name: offer.account_name.clone(),
                currency: offer.currency.clone(),
                external_key: correlation.external_key(&request.customer_id),
            },
            ctx,
        )
        .await?;

    billing
        .create_payment_method(
            &NewPaymentMethod::bank_transfer(
                account.account_id.as_str(),
                funding_source,
                request.customer_id.as_str(),
            ),
            true,
            ctx,
        )
        .await?;

    let subscription = NewSubscription {
        account_id: account.account_id.clone(),
        product_name: offer.product_name.clone(),
        product_category: offer.product_category.clone(),
        billing_period: offer.billing_period.clone(),
        price_list: offer.price_list.clone(),
        price_overrides: vec![PhasePriceOverride {
            phase_type: PhaseType::Trial,
            fixed_price: offer.trial_price,
        }],
    };

    // The billing backend occasionally reports transient lock contention
    // on the account record here. That class is tolerated: log and move
    // on to the invoice fetch; anything else fails the checkout.
    match billing.create_subscription(&subscription, ctx).await {
        Ok(created) => {
            tracing::info!(subscription_id = %created.subscription_id, "Subscription created");
        }
        Err(e) if e.is_lock_contention() => {
            tracing::warn!("Subscription creation hit lock contention, continuing: {}", e);
        }
        Err(e) => return Err(e.into()),
    }

    let invoice = billing
        .account_invoices(&account.account_id, true, ctx)
        .await?
        .into_iter()
        .next();

    Ok(CheckoutOutcome { account, invoice })
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_billing::MockBillingGateway;

    fn ctx() -> CallContext {
        CallContext {
            created_by: "demo".into(),
            reason: "New subscription".into(),
            comment: "test".into(),
        }
    }

    fn request() -> ChargeRequest {
        ChargeRequest {
            funding_source: "https://host/funding-sources/FS1".into(),
            customer_id: "CUST1".into(),
        }
    }

    #[tokio::test]
    async fn steps_run_in_creation_order() {
        let billing = MockBillingGateway::new();

        let outcome = run_checkout(
            &billing,
            &CheckoutOffer::default(),
            &ctx(),
            CorrelationMode::ExternalKey,
            &request(),
        )
        .await
        .unwrap();

        assert_eq!(
            billing.calls(),
            [
                "create_account",
                "create_payment_method",
                "create_subscription",
                "account_invoices",
            ]
        );
        assert_eq!(outcome.account.external_key.as_deref(), Some("CUST1"));

        let pm = &billing.payment_methods()[0];
        assert_eq!(pm.plugin_info["fundingSource"], "FS1");
        assert_eq!(pm.plugin_info["customerId"], "CUST1");

        let subscription = &billing.subscriptions()[0];
        assert_eq!(subscription.product_name, "Sports");
        assert_eq!(
            subscription.price_overrides[0].fixed_price,
            CheckoutOffer::default().trial_price
        );

        assert!(outcome.invoice.is_some());
    }

    #[tokio::test]
    async fn lock_contention_still_fetches_invoices() {
        let billing = MockBillingGateway::new();
        billing.fail_next_subscription(BillingError::AccountLocked(
            "Failed to lock account record".into(),
        ));

        let outcome = run_checkout(
            &billing,
            &CheckoutOffer::default(),
            &ctx(),
            CorrelationMode::ExternalKey,
            &request(),
        )
        .await
        .unwrap();

        assert!(billing.calls().contains(&"account_invoices"));
        assert!(outcome.invoice.is_none());
    }

    #[tokio::test]
    async fn other_billing_failures_propagate() {
        let billing = MockBillingGateway::new();
        billing.fail_next_subscription(BillingError::Api {
            status: 500,
            message: "boom".into(),
        });

        let err = run_checkout(
            &billing,
            &CheckoutOffer::default(),
            &ctx(),
            CorrelationMode::ExternalKey,
            &request(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::Billing(_)));
        assert!(!billing.calls().contains(&"account_invoices"));
    }

    #[tokio::test]
    async fn malformed_funding_source_issues_no_billing_call() {
        let billing = MockBillingGateway::new();

        let err = run_checkout(
            &billing,
            &CheckoutOffer::default(),
            &ctx(),
            CorrelationMode::ExternalKey,
            &ChargeRequest {
                funding_source: "https://host/other/FS1".into(),
                customer_id: "CUST1".into(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::FundingSource(_)));
        assert!(billing.calls().is_empty());
    }

    #[tokio::test]
    async fn uncorrelated_accounts_omit_the_external_key() {
        let billing = MockBillingGateway::new();

        run_checkout(
            &billing,
            &CheckoutOffer::default(),
            &ctx(),
            CorrelationMode::Uncorrelated,
            &request(),
        )
        .await
        .unwrap();

        assert!(billing.accounts()[0].external_key.is_none());
    }

    #[test]
    fn default_offer_matches_the_demo_catalog() {
        let offer = CheckoutOffer::default();
        assert_eq!(offer.product_name, "Sports");
        assert_eq!(offer.trial_price, dec!(10.0));
        assert_eq!(offer.billing_period, "MONTHLY");
    }
}
