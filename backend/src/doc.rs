//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the customer endpoints, the health probes and the
//! schema wrappers from [`crate::inbound::http::schemas`] that describe
//! domain types without coupling them to utoipa.
//!
//! The generated document backs Swagger UI in debug builds and is exported
//! via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::customers::{CreateCustomerRequest, CustomerResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, ViolationSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer service API",
        description = "Create, list and fetch customers through a validating mediator.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::customers::list_customers,
        crate::inbound::http::customers::get_customer,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateCustomerRequest,
        CustomerResponse,
        ErrorSchema,
        ErrorCodeSchema,
        ViolationSchema
    )),
    tags(
        (name = "customers", description = "Customer commands and queries"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
