//! Server harness and shared world for the customer endpoint scenarios.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` stops the server
//! even if a step panics.

use std::cell::RefCell;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

use customer_service::Trace;
use customer_service::domain::{TRACE_ID_HEADER, build_customer_mediator};
use customer_service::inbound::http::customers::{
    create_customer, get_customer, json_config, list_customers,
};
use customer_service::inbound::http::state::HttpState;
use customer_service::outbound::InMemoryCustomerRepository;

pub(crate) struct CustomerWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_location: Option<String>,
    pub(crate) last_trace_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<CustomerWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        // `LocalSet` must be driven on the thread that owns it.
        let ctx = self.world.borrow();
        let server = ctx.server.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            server.stop(true).await;
        });
    }
}

async fn spawn_customer_server(
    repository: InMemoryCustomerRepository,
) -> Result<(String, ServerHandle), String> {
    let mediator = build_customer_mediator(Arc::new(repository)).map_err(|err| err.to_string())?;
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let http_data = web::Data::new(HttpState::new(Arc::new(mediator)));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .app_data(json_config())
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .service(list_customers)
                    .service(get_customer)
                    .service(create_customer),
            )
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok((format!("http://{addr}"), handle))
}

/// Start a server over a store seeded with the demo customers.
pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    let (base_url, server) = local
        .block_on(&runtime, async {
            spawn_customer_server(InMemoryCustomerRepository::with_demo_customers()).await
        })
        .expect("server should start");

    WorldFixture {
        world: Rc::new(RefCell::new(CustomerWorld {
            runtime,
            local,
            base_url,
            server,
            last_status: None,
            last_body: None,
            last_location: None,
            last_trace_id: None,
        })),
    }
}

/// Body sent with a scenario request.
pub(crate) enum RequestBody {
    Empty,
    Json(Value),
    Raw(&'static str),
}

/// Send a request and record status, body and the interesting headers.
pub(crate) fn perform_request(
    world: &SharedWorld,
    method: Method,
    path: &str,
    request_body: RequestBody,
) {
    let (status, body, location, trace_id) = {
        let ctx = world.borrow();
        let url = format!("{}{path}", ctx.base_url);
        ctx.local.block_on(&ctx.runtime, async move {
            let request = Client::default().request(method, url);
            let mut response = match request_body {
                RequestBody::Empty => request.send().await,
                RequestBody::Json(payload) => request.send_json(&payload).await,
                RequestBody::Raw(raw) => {
                    request
                        .insert_header((header::CONTENT_TYPE, "application/json"))
                        .send_body(raw)
                        .await
                }
            }
            .expect("request should complete");

            let header_value = |name: &str| {
                response
                    .headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned)
            };
            let location = header_value(header::LOCATION.as_str());
            let trace_id = header_value(TRACE_ID_HEADER);
            let status = response.status().as_u16();
            let bytes = response.body().await.expect("response body");
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).expect("JSON body")
            };
            (status, body, location, trace_id)
        })
    };

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_body = Some(body);
    ctx.last_location = location;
    ctx.last_trace_id = trace_id;
}
