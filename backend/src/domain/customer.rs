//! Customer entity, its read projection, and the mappings between them and
//! the creation command.
//!
//! Every mapping is a plain field-for-field copy, so an entity projected to a
//! view, turned back into a command and then into an entity again is
//! unchanged, absent and empty values included.

use std::fmt;

use crate::domain::requests::CreateCustomer;

/// Identifier of a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CustomerId(i32);

impl CustomerId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }

    /// Whether the identifier was supplied by the caller rather than left
    /// for the store to allocate.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl From<i32> for CustomerId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<CustomerId> for i32 {
    fn from(value: CustomerId) -> Self {
        value.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Authoritative customer record owned by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Customer {
    /// Record identifier.
    pub customer_id: CustomerId,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact address.
    pub email: Option<String>,
}

impl Customer {
    /// Copy of this record carrying a different identifier.
    #[must_use]
    pub fn with_id(&self, customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            ..self.clone()
        }
    }
}

/// Read-only projection of a [`Customer`] returned by queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerView {
    /// Record identifier.
    pub customer_id: CustomerId,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
    /// Contact address.
    pub email: Option<String>,
}

impl From<Customer> for CustomerView {
    fn from(value: Customer) -> Self {
        let Customer {
            customer_id,
            first_name,
            last_name,
            email,
        } = value;
        Self {
            customer_id,
            first_name,
            last_name,
            email,
        }
    }
}

impl From<&Customer> for CustomerView {
    fn from(value: &Customer) -> Self {
        Self::from(value.clone())
    }
}

impl From<CreateCustomer> for Customer {
    fn from(value: CreateCustomer) -> Self {
        let CreateCustomer {
            customer_id,
            first_name,
            last_name,
            email,
        } = value;
        Self {
            customer_id: CustomerId::new(customer_id),
            first_name,
            last_name,
            email,
        }
    }
}

impl From<Customer> for CreateCustomer {
    fn from(value: Customer) -> Self {
        Self {
            customer_id: value.customer_id.get(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
        }
    }
}

impl From<CustomerView> for CreateCustomer {
    fn from(value: CustomerView) -> Self {
        Self {
            customer_id: value.customer_id.get(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
        }
    }
}
