//! Tests for the customer HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::build_customer_mediator;
use crate::domain::ports::{CustomerRepository, FixtureCustomerRepository};
use crate::outbound::InMemoryCustomerRepository;

fn test_app(
    repository: Arc<dyn CustomerRepository>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let mediator = build_customer_mediator(repository).expect("registry is complete");
    App::new()
        .app_data(web::Data::new(HttpState::new(Arc::new(mediator))))
        .app_data(json_config())
        .service(
            web::scope("/api")
                .service(list_customers)
                .service(get_customer)
                .service(create_customer),
        )
}

#[rstest]
#[actix_web::test]
async fn lists_the_fixture_customers() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureCustomerRepository))).await;
    let req = actix_test::TestRequest::get().uri("/api/customers").to_request();

    let body: Vec<CustomerResponse> = actix_test::call_and_read_body_json(&app, req).await;

    let names: Vec<_> = body
        .iter()
        .map(|c| c.first_name.as_deref().unwrap_or_default())
        .collect();
    assert_eq!(names, vec!["Roberto", "Joao"]);
    assert_eq!(body[0].email.as_deref(), Some("roberto.contoso@microsoft.com"));
}

#[rstest]
#[actix_web::test]
async fn fetches_a_customer_by_id() {
    let app = actix_test::init_service(test_app(Arc::new(FixtureCustomerRepository))).await;
    let req = actix_test::TestRequest::get().uri("/api/customers/1").to_request();

    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({
            "customerId": 1,
            "firstName": "Roberto",
            "lastName": "Contoso",
            "email": "roberto.contoso@microsoft.com"
        })
    );
}

#[rstest]
#[actix_web::test]
async fn missing_customer_is_404_with_message() {
    let app = actix_test::init_service(test_app(Arc::new(InMemoryCustomerRepository::new()))).await;
    let req = actix_test::TestRequest::get().uri("/api/customers/999").to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(res).await;

    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], "customer with ID 999 was not found");
}

#[rstest]
#[actix_web::test]
async fn creates_a_customer_and_points_at_it() {
    let app = actix_test::init_service(test_app(Arc::new(InMemoryCustomerRepository::new()))).await;
    let create = actix_test::TestRequest::post()
        .uri("/api/customers")
        .set_json(json!({
            "customerId": 0,
            "firstName": "Joao",
            "lastName": "Silva",
            "email": "joao@x.com"
        }))
        .to_request();

    let res = actix_test::call_service(&app, create).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let id: i32 = actix_test::read_body_json(res).await;

    assert_eq!(id, 1);
    assert_eq!(location.as_deref(), Some("/api/customers/1"));

    let fetch = actix_test::TestRequest::get().uri("/api/customers/1").to_request();
    let stored: CustomerResponse = actix_test::call_and_read_body_json(&app, fetch).await;
    assert_eq!(stored.first_name.as_deref(), Some("Joao"));
}

#[rstest]
#[actix_web::test]
async fn invalid_payload_lists_every_violation() {
    let app = actix_test::init_service(test_app(Arc::new(InMemoryCustomerRepository::new()))).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/customers")
        .set_json(json!({ "firstName": "", "lastName": "", "email": "invalid-email" }))
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;

    assert_eq!(body["code"], "invalid_request");
    let fields: Vec<&str> = body["details"]["violations"]
        .as_array()
        .expect("violations array")
        .iter()
        .filter_map(|v| v["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["firstName", "lastName", "email"]);

    let list = actix_test::TestRequest::get().uri("/api/customers").to_request();
    let stored: Vec<CustomerResponse> = actix_test::call_and_read_body_json(&app, list).await;
    assert!(stored.is_empty(), "rejected command must not be stored");
}

#[rstest]
#[actix_web::test]
async fn duplicate_identifier_is_a_conflict() {
    let app = actix_test::init_service(test_app(Arc::new(
        InMemoryCustomerRepository::with_demo_customers(),
    )))
    .await;
    let req = actix_test::TestRequest::post()
        .uri("/api/customers")
        .set_json(json!({
            "customerId": 1,
            "firstName": "Maria",
            "lastName": "Souza",
            "email": "maria@x.com"
        }))
        .to_request();

    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_error_envelope() {
    let app = actix_test::init_service(test_app(Arc::new(InMemoryCustomerRepository::new()))).await;
    let req = actix_test::TestRequest::post()
        .uri("/api/customers")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;

    assert_eq!(body["code"], "invalid_request");
}
