//! # checkout-billing
//!
//! Billing Service client for the bank-checkout demo.
//!
//! The billing service manages accounts, payment methods, subscriptions,
//! and invoices. Every mutating call carries multi-tenant credentials
//! and audit metadata; both are explicit configuration
//! ([`TenantCredentials`], [`CallContext`]) passed to the client rather
//! than process-wide constants.
//!
//! The service seam is [`BillingGateway`], with a reqwest-backed
//! implementation ([`HttpBillingGateway`]) and a recording mock
//! ([`MockBillingGateway`]) for orchestration tests.

pub mod context;
pub mod error;
pub mod gateway;
pub mod model;

pub use context::{CallContext, TenantCredentials};
pub use error::{BillingError, Result};
pub use gateway::{BillingConfig, BillingGateway, HttpBillingGateway, MockBillingGateway};
pub use model::{
    Account, BANK_TRANSFER_PLUGIN, Invoice, InvoiceItem, NewAccount, NewPaymentMethod,
    NewSubscription, PhasePriceOverride, PhaseType, Subscription,
};
