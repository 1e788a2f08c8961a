//! Application State

use std::sync::Arc;

use checkout_billing::{BillingGateway, CallContext};
use checkout_payments::{CustomerResolver, PaymentNetwork};

use crate::checkout::{CheckoutOffer, CorrelationMode};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment network client
    pub network: Arc<dyn PaymentNetwork>,

    /// Billing service client
    pub billing: Arc<dyn BillingGateway>,

    /// Locate-or-create logic for the demo customer
    pub resolver: Arc<CustomerResolver>,

    /// Fixed demo offer
    pub offer: Arc<CheckoutOffer>,

    /// Audit metadata attached to billing calls
    pub call_context: Arc<CallContext>,

    /// Whether accounts carry the customer id as their external key
    pub correlation: CorrelationMode,
}
