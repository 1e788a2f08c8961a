//! # checkout-payments
//!
//! Payment Network Service client for the bank-checkout demo.
//!
//! The payment network manages customers, short-lived bank-linking
//! tokens, and the funding sources produced by the interactive linking
//! widget. This crate exposes:
//!
//! - [`PaymentNetwork`]: the service seam, with a reqwest-backed
//!   implementation ([`HttpPaymentNetwork`]) and an in-memory mock
//!   ([`MockPaymentNetwork`]) for tests and offline demos.
//! - [`CustomerResolver`]: locate-or-create logic for the demo customer,
//!   run on every landing page load.
//! - [`hypermedia`]: turning URL-shaped resource references into bare
//!   entity ids.

pub mod error;
pub mod hypermedia;
pub mod model;
pub mod network;
pub mod resolver;

pub use error::{PaymentNetworkError, Result};
pub use hypermedia::{HypermediaError, resource_id};
pub use model::{Customer, CustomerRef, LinkingToken, NewCustomer};
pub use network::{HttpPaymentNetwork, MockPaymentNetwork, PaymentNetwork, PaymentNetworkConfig};
pub use resolver::{CustomerResolver, ResolveStrategy};
