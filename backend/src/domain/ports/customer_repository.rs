//! Port abstraction for customer persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Customer, CustomerId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by customer repository adapters.
    pub enum CustomerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "customer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "customer repository query failed: {message}",
        /// A record with the requested identifier already exists.
        Conflict { id: i32 } => "customer {id} already exists",
    }
}

/// Port for storing and reading customer records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Store `customer` and return the identifier it was stored under.
    async fn create(&self, customer: &Customer) -> Result<CustomerId, CustomerRepositoryError>;

    /// Every stored customer, in the adapter's stable order.
    async fn list_all(&self) -> Result<Vec<Customer>, CustomerRepositoryError>;

    /// Fetch a customer by identifier; `None` when absent.
    async fn find_by_id(&self, id: CustomerId)
    -> Result<Option<Customer>, CustomerRepositoryError>;
}

/// Deterministic stub backing demos and tests that need canned data.
///
/// `create` always answers `1` without storing anything, `list_all` returns
/// the two demo customers, and only identifier `1` resolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCustomerRepository;

impl FixtureCustomerRepository {
    /// The canned customers returned by [`CustomerRepository::list_all`].
    #[must_use]
    pub fn demo_customers() -> Vec<Customer> {
        vec![
            demo_customer(1, "Roberto", "Contoso", "roberto.contoso@microsoft.com"),
            demo_customer(2, "Joao", "Contoso", "joao.contoso@microsoft.com"),
        ]
    }
}

fn demo_customer(id: i32, first_name: &str, last_name: &str, email: &str) -> Customer {
    Customer {
        customer_id: CustomerId::new(id),
        first_name: Some(first_name.to_owned()),
        last_name: Some(last_name.to_owned()),
        email: Some(email.to_owned()),
    }
}

#[async_trait]
impl CustomerRepository for FixtureCustomerRepository {
    async fn create(&self, _customer: &Customer) -> Result<CustomerId, CustomerRepositoryError> {
        Ok(CustomerId::new(1))
    }

    async fn list_all(&self) -> Result<Vec<Customer>, CustomerRepositoryError> {
        Ok(Self::demo_customers())
    }

    async fn find_by_id(
        &self,
        id: CustomerId,
    ) -> Result<Option<Customer>, CustomerRepositoryError> {
        Ok(Self::demo_customers()
            .into_iter()
            .find(|customer| customer.customer_id == id && id.get() == 1))
    }
}
