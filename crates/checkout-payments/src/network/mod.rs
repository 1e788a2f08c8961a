//! Payment Network Integration
//!
//! Abstraction over the payment network API plus implementations.

mod http;
mod mock;

pub use http::{HttpPaymentNetwork, PaymentNetworkConfig};
pub use mock::MockPaymentNetwork;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{Customer, CustomerRef, LinkingToken, NewCustomer};

/// Payment network seam
///
/// One implementation per backend: the real HTTP API, or the in-memory
/// mock used by tests and offline demos.
#[async_trait]
pub trait PaymentNetwork: Send + Sync {
    /// Search customers by exact email
    async fn search_customers(&self, email: &str) -> Result<Vec<Customer>>;

    /// Create a customer, returning the reference from the Location header
    async fn create_customer(&self, new: &NewCustomer) -> Result<CustomerRef>;

    /// Issue a short-lived linking token scoped to one customer
    async fn create_linking_token(&self, customer: &CustomerRef) -> Result<LinkingToken>;

    /// Whether the network answers at all
    async fn health_check(&self) -> bool;

    /// Implementation name (for logs)
    fn name(&self) -> &str;
}
