//! Handlers answering customer commands and queries.
//!
//! Each handler performs at most one repository call and maps the result to
//! its reply shape. A missing customer is `None`, never an error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::mediator::RequestHandler;
use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::requests::{CreateCustomer, GetAllCustomers, GetCustomerById};
use crate::domain::{Customer, CustomerId, CustomerView, Error};

fn map_repository_error(error: CustomerRepositoryError) -> Error {
    match error {
        CustomerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("customer repository unavailable: {message}"))
        }
        CustomerRepositoryError::Query { message } => {
            Error::internal(format!("customer repository error: {message}"))
        }
        CustomerRepositoryError::Conflict { id } => {
            Error::conflict(format!("customer with ID {id} already exists"))
        }
    }
}

/// Stores a new customer and returns the identifier the repository chose.
pub struct CreateCustomerHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> CreateCustomerHandler<R> {
    /// Create the handler over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> RequestHandler<CreateCustomer> for CreateCustomerHandler<R>
where
    R: CustomerRepository + ?Sized + 'static,
{
    async fn handle(&self, message: CreateCustomer) -> Result<CustomerId, Error> {
        let customer = Customer::from(message);
        let id = self
            .repository
            .create(&customer)
            .await
            .map_err(map_repository_error)?;
        info!(customer_id = %id, "customer created");
        Ok(id)
    }
}

/// Lists every customer in repository order.
pub struct GetAllCustomersHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> GetAllCustomersHandler<R> {
    /// Create the handler over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> RequestHandler<GetAllCustomers> for GetAllCustomersHandler<R>
where
    R: CustomerRepository + ?Sized + 'static,
{
    async fn handle(&self, _message: GetAllCustomers) -> Result<Vec<CustomerView>, Error> {
        let customers = self
            .repository
            .list_all()
            .await
            .map_err(map_repository_error)?;
        debug!(count = customers.len(), "customers listed");
        Ok(customers.into_iter().map(CustomerView::from).collect())
    }
}

/// Looks up a single customer.
pub struct GetCustomerByIdHandler<R: ?Sized> {
    repository: Arc<R>,
}

impl<R: ?Sized> GetCustomerByIdHandler<R> {
    /// Create the handler over `repository`.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> RequestHandler<GetCustomerById> for GetCustomerByIdHandler<R>
where
    R: CustomerRepository + ?Sized + 'static,
{
    async fn handle(&self, message: GetCustomerById) -> Result<Option<CustomerView>, Error> {
        let customer = self
            .repository
            .find_by_id(CustomerId::new(message.id))
            .await
            .map_err(map_repository_error)?;
        if customer.is_none() {
            debug!(customer_id = message.id, "customer not found");
        }
        Ok(customer.map(CustomerView::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::MockCustomerRepository;
    use rstest::rstest;

    fn customer(id: i32, first_name: &str) -> Customer {
        Customer {
            customer_id: CustomerId::new(id),
            first_name: Some(first_name.to_owned()),
            last_name: Some("Contoso".to_owned()),
            email: Some(format!("{}@example.com", first_name.to_lowercase())),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_passes_an_identical_entity_to_the_repository() {
        let command = CreateCustomer {
            customer_id: 1,
            first_name: Some("Joao".into()),
            last_name: Some("Silva".into()),
            email: Some("joao@x.com".into()),
        };
        let expected = Customer::from(command.clone());
        let mut repo = MockCustomerRepository::new();
        repo.expect_create()
            .withf(move |stored| *stored == expected)
            .times(1)
            .returning(|_| Ok(CustomerId::new(1)));

        let handler = CreateCustomerHandler::new(Arc::new(repo));
        let id = handler.handle(command).await.expect("create succeeds");

        assert_eq!(id, CustomerId::new(1));
    }

    #[rstest]
    #[tokio::test]
    async fn create_returns_the_repository_identifier() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Ok(CustomerId::new(17)));

        let handler = CreateCustomerHandler::new(Arc::new(repo));
        let id = handler
            .handle(CreateCustomer::default())
            .await
            .expect("create succeeds");

        assert_eq!(id.get(), 17);
    }

    #[rstest]
    #[case(CustomerRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(CustomerRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(CustomerRepositoryError::conflict(3), ErrorCode::Conflict)]
    #[tokio::test]
    async fn create_maps_repository_errors(
        #[case] failure: CustomerRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockCustomerRepository::new();
        repo.expect_create()
            .times(1)
            .returning(move |_| Err(failure.clone()));

        let handler = CreateCustomerHandler::new(Arc::new(repo));
        let err = handler
            .handle(CreateCustomer::default())
            .await
            .expect_err("repository failure surfaces");

        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn list_preserves_repository_order() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_list_all()
            .times(1)
            .returning(|| Ok(vec![customer(2, "Joao"), customer(1, "Roberto")]));

        let handler = GetAllCustomersHandler::new(Arc::new(repo));
        let views = handler
            .handle(GetAllCustomers)
            .await
            .expect("list succeeds");

        let ids: Vec<i32> = views.iter().map(|v| v.customer_id.get()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(views[1].first_name.as_deref(), Some("Roberto"));
    }

    #[rstest]
    #[tokio::test]
    async fn get_by_id_returns_none_when_absent() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id()
            .withf(|id| *id == CustomerId::new(999))
            .times(1)
            .returning(|_| Ok(None));

        let handler = GetCustomerByIdHandler::new(Arc::new(repo));
        let found = handler
            .handle(GetCustomerById::new(999))
            .await
            .expect("lookup succeeds");

        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn get_by_id_projects_the_entity() {
        let mut repo = MockCustomerRepository::new();
        repo.expect_find_by_id()
            .times(1)
            .returning(|id| Ok(Some(customer(id.get(), "Roberto"))));

        let handler = GetCustomerByIdHandler::new(Arc::new(repo));
        let found = handler
            .handle(GetCustomerById::new(1))
            .await
            .expect("lookup succeeds")
            .expect("customer exists");

        assert_eq!(found, CustomerView::from(customer(1, "Roberto")));
    }
}
