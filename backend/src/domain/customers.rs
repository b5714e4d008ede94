//! Wiring of the customer handlers, validators and pipeline.

use std::sync::Arc;

use crate::domain::handlers::{
    CreateCustomerHandler, GetAllCustomersHandler, GetCustomerByIdHandler,
};
use crate::domain::mediator::{Mediator, RegistryError, TracingStage, ValidationStage};
use crate::domain::ports::CustomerRepository;
use crate::domain::requests::{CreateCustomer, GetAllCustomers, GetCustomerById};
use crate::domain::validation::CreateCustomerValidator;

/// Build the mediator serving every customer request over `repository`.
///
/// Validation runs first, then dispatch tracing, then the handler.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use customer_service::domain::build_customer_mediator;
/// use customer_service::domain::ports::FixtureCustomerRepository;
///
/// let mediator = build_customer_mediator(Arc::new(FixtureCustomerRepository));
/// assert!(mediator.is_ok());
/// ```
pub fn build_customer_mediator(
    repository: Arc<dyn CustomerRepository>,
) -> Result<Mediator, RegistryError> {
    Mediator::builder()
        .stage(
            ValidationStage::new()
                .with_validator::<CreateCustomer, _>(CreateCustomerValidator::new()),
        )
        .stage(TracingStage)
        .handler::<CreateCustomer, _>(CreateCustomerHandler::new(Arc::clone(&repository)))
        .handler::<GetAllCustomers, _>(GetAllCustomersHandler::new(Arc::clone(&repository)))
        .handler::<GetCustomerById, _>(GetCustomerByIdHandler::new(repository))
        .build()
}
