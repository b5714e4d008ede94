//! Domain primitives, requests and the mediator that routes them.
//!
//! Purpose: Define the customer model, the commands and queries the service
//! accepts, their validation rules and the handlers that answer them. Nothing
//! here knows about HTTP; inbound adapters translate to and from these types.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Customer, CustomerId, CustomerView: the customer record and its
//!   read projection.
//! - Mediator (alias to `mediator::Mediator`): request dispatcher.

pub mod customer;
pub mod customers;
pub mod error;
pub mod handlers;
pub mod mediator;
pub mod ports;
pub mod requests;
pub mod trace_id;
pub mod validation;

pub use self::customer::{Customer, CustomerId, CustomerView};
pub use self::customers::build_customer_mediator;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::mediator::{
    DispatchError, Mediator, MediatorBuilder, PipelineStage, RegistryError, RequestHandler,
    TracingStage, ValidationStage,
};
pub use self::requests::{
    CreateCustomer, GetAllCustomers, GetCustomerById, Message, Reply, Request, RequestKind,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::validation::{CreateCustomerValidator, Validator, Violation};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use customer_service::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
