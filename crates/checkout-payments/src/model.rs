//! Payment Network Models
//!
//! Wire models for the payment network API (camelCase JSON with
//! HAL-style `_links`/`_embedded` blocks).

use serde::{Deserialize, Serialize};

use crate::hypermedia::{HypermediaError, resource_id};

/// Path prefix under which the network exposes customers
pub const CUSTOMERS_PREFIX: &str = "/customers/";

/// Path prefix under which the network exposes funding sources
pub const FUNDING_SOURCES_PREFIX: &str = "/funding-sources/";

/// Customer creation request
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub ip_address: String,
}

impl NewCustomer {
    /// Fixed demo profile used by the landing page
    pub fn demo(email: impl Into<String>) -> Self {
        Self {
            first_name: "Jane".into(),
            last_name: "Merchant".into(),
            email: email.into(),
            ip_address: "99.99.99.99".into(),
        }
    }
}

/// Customer summary as returned by search
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl Customer {
    /// The customer's self-reference URL
    pub fn href(&self) -> &str {
        &self.links.self_link.href
    }
}

/// Hypermedia links block
#[derive(Clone, Debug, Deserialize)]
pub struct Links {
    #[serde(rename = "self")]
    pub self_link: Link,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

/// Search response envelope
#[derive(Clone, Debug, Deserialize)]
pub struct CustomerSearchPage {
    #[serde(rename = "_embedded", default)]
    pub embedded: EmbeddedCustomers,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmbeddedCustomers {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// Opaque reference to a payment-network customer.
///
/// Holds the full URL (search self link or creation Location header);
/// the bare id is derived on demand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerRef {
    href: String,
}

impl CustomerRef {
    pub fn new(href: impl Into<String>) -> Self {
        Self { href: href.into() }
    }

    /// Full customer URL
    pub fn href(&self) -> &str {
        &self.href
    }

    /// Bare customer id extracted from the URL
    pub fn id(&self) -> Result<&str, HypermediaError> {
        resource_id(&self.href, CUSTOMERS_PREFIX)
    }
}

/// Short-lived token scoping the bank-linking widget to one customer.
/// Created fresh per page load; never persisted.
#[derive(Clone, Debug, Deserialize)]
pub struct LinkingToken {
    pub token: String,
}
