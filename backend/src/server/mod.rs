//! Server construction and middleware wiring.

mod config;

pub use config::{ServerConfig, ServerSettings};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use customer_service::Trace;
#[cfg(debug_assertions)]
use customer_service::doc::ApiDoc;
use customer_service::domain::build_customer_mediator;
use customer_service::domain::ports::CustomerRepository;
use customer_service::inbound::http::customers::{
    create_customer, get_customer, json_config, list_customers,
};
use customer_service::inbound::http::health::{HealthState, live, ready};
use customer_service::inbound::http::state::HttpState;
use customer_service::outbound::InMemoryCustomerRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_repository(config: &ServerConfig) -> Arc<dyn CustomerRepository> {
    if config.seed_demo_customers {
        Arc::new(InMemoryCustomerRepository::with_demo_customers())
    } else {
        Arc::new(InMemoryCustomerRepository::new())
    }
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api")
        .service(list_customers)
        .service(get_customer)
        .service(create_customer);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The customer mediator is built once and shared by every worker.
///
/// # Errors
/// Returns [`std::io::Error`] when the handler registry is incomplete or when
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let repository = build_repository(&config);
    let mediator = build_customer_mediator(repository)
        .map_err(|err| std::io::Error::other(format!("customer mediator wiring failed: {err}")))?;
    let http_state = web::Data::new(HttpState::new(Arc::new(mediator)));
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        seed_demo_customers,
    } = config;

    let server = HttpServer::new(move || build_app(server_health_state.clone(), http_state.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, seed_demo_customers, "customer service listening");
    health_state.mark_ready();
    Ok(server)
}
