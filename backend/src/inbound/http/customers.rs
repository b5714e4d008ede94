//! Customer HTTP handlers.
//!
//! ```text
//! GET  /api/customers
//! GET  /api/customers/{customerId}
//! POST /api/customers {"customerId":0,"firstName":"Joao","lastName":"Silva","email":"joao@x.com"}
//! ```
//!
//! Handlers translate between wire payloads and domain requests and hand the
//! request to the mediator. Each request gets its own cancellation token which
//! fires if actix drops the handler future, for example when the client goes
//! away mid-request.

use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::domain::{
    CreateCustomer, CustomerView, Error, GetAllCustomers, GetCustomerById, Message,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /api/customers`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    /// Requested identifier; `0` lets the store allocate one.
    #[serde(default)]
    #[schema(example = 0)]
    pub customer_id: i32,
    /// Given name; must not be blank.
    #[schema(example = "Joao")]
    pub first_name: Option<String>,
    /// Family name; must be present.
    #[schema(example = "Silva")]
    pub last_name: Option<String>,
    /// Contact email address.
    #[schema(example = "joao@x.com")]
    pub email: Option<String>,
}

impl From<CreateCustomerRequest> for CreateCustomer {
    fn from(value: CreateCustomerRequest) -> Self {
        Self {
            customer_id: value.customer_id,
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
        }
    }
}

/// Customer as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    /// Store-assigned identifier.
    #[schema(example = 1)]
    pub customer_id: i32,
    /// Given name.
    #[schema(example = "Roberto")]
    pub first_name: Option<String>,
    /// Family name.
    #[schema(example = "Contoso")]
    pub last_name: Option<String>,
    /// Contact email address.
    #[schema(example = "roberto.contoso@microsoft.com")]
    pub email: Option<String>,
}

impl From<CustomerView> for CustomerResponse {
    fn from(value: CustomerView) -> Self {
        Self {
            customer_id: value.customer_id.get(),
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
        }
    }
}

async fn dispatch<M: Message>(state: &HttpState, message: M) -> ApiResult<M::Output> {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();
    let result = state
        .mediator
        .send(message, &cancel)
        .await
        .map_err(Error::from);
    let _token = guard.disarm();
    result
}

/// JSON extractor configuration reporting malformed bodies with the shared
/// error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let error = Error::invalid_request("request body is not valid JSON")
            .with_details(json!({ "reason": err.to_string() }));
        let response = ResponseError::error_response(&error);
        InternalError::from_response(err, response).into()
    })
}

/// List every customer.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use customer_service::inbound::http::customers::list_customers;
///
/// let app = App::new().service(web::scope("/api").service(list_customers));
/// ```
#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "Customers", body = [CustomerResponse]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "listCustomers"
)]
#[get("/customers")]
pub async fn list_customers(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<CustomerResponse>>> {
    let customers = dispatch(&state, GetAllCustomers).await?;
    Ok(web::Json(
        customers.into_iter().map(CustomerResponse::from).collect(),
    ))
}

/// Fetch one customer.
#[utoipa::path(
    get,
    path = "/api/customers/{customerId}",
    params(("customerId" = i32, Path, description = "Customer identifier")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "getCustomer"
)]
#[get("/customers/{customer_id}")]
pub async fn get_customer(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<CustomerResponse>> {
    let id = path.into_inner();
    dispatch(&state, GetCustomerById::new(id))
        .await?
        .map(|view| web::Json(CustomerResponse::from(view)))
        .ok_or_else(|| {
            Error::not_found(format!("customer with ID {id} was not found"))
                .with_details(json!({ "customerId": id }))
        })
}

/// Create a customer.
///
/// Answers `201 Created` with the identifier as the body and a `Location`
/// header pointing at the new record. Validation failures answer `400` with
/// every violation under `details.violations`.
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = i32,
            headers(("Location" = String, description = "URL of the new customer"))),
        (status = 400, description = "Validation failed", body = ErrorSchema),
        (status = 409, description = "Identifier already taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/customers")]
pub async fn create_customer(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCustomerRequest>,
) -> ApiResult<HttpResponse> {
    let command = CreateCustomer::from(payload.into_inner());
    let id = dispatch(&state, command).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/api/customers/{id}")))
        .json(id.get()))
}

#[cfg(test)]
mod tests;
