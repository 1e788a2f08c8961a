//! Mock Payment Network
//!
//! For tests and offline demos. Keeps customers in memory and counts the
//! calls it serves, so resolver tests can assert exactly which requests
//! were issued.

use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::PaymentNetwork;
use crate::error::Result;
use crate::model::{Customer, CustomerRef, Link, Links, LinkingToken, NewCustomer};

/// In-memory implementation of [`PaymentNetwork`]
pub struct MockPaymentNetwork {
    base: String,
    customers: RwLock<Vec<(String, NewCustomer)>>,
    created: RwLock<Vec<NewCustomer>>,
    searches: AtomicUsize,
    creates: AtomicUsize,
    tokens: AtomicUsize,
    next_id: AtomicUsize,
}

impl Default for MockPaymentNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPaymentNetwork {
    pub fn new() -> Self {
        Self {
            base: "https://api.sandbox.test".into(),
            customers: RwLock::new(Vec::new()),
            created: RwLock::new(Vec::new()),
            searches: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            tokens: AtomicUsize::new(0),
            next_id: AtomicUsize::new(1),
        }
    }

    /// Seed an existing customer for the given email
    pub fn with_customer(self, email: &str) -> Self {
        let id = self.mint_id();
        self.customers
            .write()
            .unwrap()
            .push((id, NewCustomer::demo(email)));
        self
    }

    /// Number of search calls served
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::SeqCst)
    }

    /// Number of create calls served
    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    /// Number of linking tokens issued
    pub fn token_count(&self) -> usize {
        self.tokens.load(Ordering::SeqCst)
    }

    /// Profiles passed to `create_customer`, in call order
    pub fn created_customers(&self) -> Vec<NewCustomer> {
        self.created.read().unwrap().clone()
    }

    fn mint_id(&self) -> String {
        format!("CUS-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn customer_href(&self, id: &str) -> String {
        format!("{}/customers/{id}", self.base)
    }
}

#[async_trait]
impl PaymentNetwork for MockPaymentNetwork {
    async fn search_customers(&self, email: &str) -> Result<Vec<Customer>> {
        self.searches.fetch_add(1, Ordering::SeqCst);

        let matches = self
            .customers
            .read()
            .unwrap()
            .iter()
            .filter(|(_, profile)| profile.email == email)
            .map(|(id, profile)| Customer {
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                email: profile.email.clone(),
                links: Links {
                    self_link: Link {
                        href: self.customer_href(id),
                    },
                },
            })
            .collect();

        Ok(matches)
    }

    async fn create_customer(&self, new: &NewCustomer) -> Result<CustomerRef> {
        self.creates.fetch_add(1, Ordering::SeqCst);

        let id = self.mint_id();
        let href = self.customer_href(&id);
        self.customers.write().unwrap().push((id, new.clone()));
        self.created.write().unwrap().push(new.clone());

        Ok(CustomerRef::new(href))
    }

    async fn create_linking_token(&self, _customer: &CustomerRef) -> Result<LinkingToken> {
        let n = self.tokens.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(LinkingToken {
            token: format!("LNK-{n}"),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "MockPaymentNetwork"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_customer_is_searchable() {
        let network = MockPaymentNetwork::new().with_customer("no@nemail.net");

        let hits = network.search_customers("no@nemail.net").await.unwrap();
        assert_eq!(hits.len(), 1);

        let misses = network.search_customers("other@nemail.net").await.unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn created_customer_gets_distinct_refs() {
        let network = MockPaymentNetwork::new();

        let a = network
            .create_customer(&NewCustomer::demo("a@test"))
            .await
            .unwrap();
        let b = network
            .create_customer(&NewCustomer::demo("b@test"))
            .await
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(network.create_count(), 2);
    }
}
