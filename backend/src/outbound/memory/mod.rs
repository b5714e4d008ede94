//! In-process customer store.
//!
//! Records live in a `BTreeMap` behind a Tokio `RwLock`, so listings come back
//! in ascending identifier order. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{
    CustomerRepository, CustomerRepositoryError, FixtureCustomerRepository,
};
use crate::domain::{Customer, CustomerId};

/// Customer repository backed by process memory.
///
/// `create` keeps a positive caller-supplied identifier and rejects it when it
/// is already taken. A zero or negative identifier asks the store to allocate
/// the next free one.
#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    customers: RwLock<BTreeMap<CustomerId, Customer>>,
}

impl InMemoryCustomerRepository {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the demo customers.
    pub fn with_demo_customers() -> Self {
        Self::with_customers(FixtureCustomerRepository::demo_customers())
    }

    /// Store pre-populated with `customers`, keyed by their identifiers.
    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let customers = customers
            .into_iter()
            .map(|customer| (customer.customer_id, customer))
            .collect();
        Self {
            customers: RwLock::new(customers),
        }
    }
}

fn next_id(customers: &BTreeMap<CustomerId, Customer>) -> Result<CustomerId, CustomerRepositoryError> {
    let last = customers.keys().next_back().map_or(0, |id| id.get().max(0));
    last.checked_add(1)
        .map(CustomerId::new)
        .ok_or_else(|| CustomerRepositoryError::query("customer identifiers exhausted"))
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, customer: &Customer) -> Result<CustomerId, CustomerRepositoryError> {
        let mut customers = self.customers.write().await;
        let id = if customer.customer_id.is_assigned() {
            if customers.contains_key(&customer.customer_id) {
                return Err(CustomerRepositoryError::conflict(customer.customer_id.get()));
            }
            customer.customer_id
        } else {
            next_id(&customers)?
        };
        customers.insert(id, customer.with_id(id));
        debug!(customer_id = %id, total = customers.len(), "customer stored");
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Customer>, CustomerRepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        let customers = self.customers.read().await;
        Ok(customers.get(&id).cloned())
    }
}
