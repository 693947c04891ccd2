#![warn(clippy::pedantic)]

mod error;
mod extract;
mod openapi;
mod ratelimit;
mod route;
mod trace;

use std::{net::SocketAddr, sync::Arc};

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{body::Body, http::Request, Extension, Router};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to
/// access. Right now that is only the database pool; dependencies used by
/// a single handler can be combined into a separate state instead.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub database: Database,
}

/// Assembles the application router, with the generated OpenAPI document
/// attached as an extension for the docs routes to serve.
fn api(state: State) -> Router {
	aide::gen::on_error(|error| {
		tracing::error!("openapi generation error: {error}");
	});
	aide::gen::extract_schemas(true);

	let mut docs = OpenApi::default();

	ApiRouter::new()
		.nest_api_service("/docs", route::docs::routes())
		.nest("/users", route::user::routes())
		.nest("/posts", route::post::routes())
		.nest("/comments", route::comment::routes())
		.nest("/friendships", route::friendship::routes())
		.finish_api_with(&mut docs, openapi::docs)
		.layer(Extension(Arc::new(docs)))
		.with_state(state)
}

/// Builds the per-request span. The request and correlation ids are
/// recorded on the span so every log line can be tied back to the caller.
fn make_span(request: &Request<Body>) -> tracing::Span {
	let headers = request.headers();
	let request_id = headers
		.get("x-request-id")
		.and_then(|id| id.to_str().ok())
		.unwrap_or_default();
	let correlation_id = headers
		.get("x-correlation-id")
		.and_then(|id| id.to_str().ok())
		.unwrap_or_default();

	tracing::info_span!(
		"request",
		method = %request.method(),
		uri = %request.uri(),
		request_id,
		correlation_id,
	)
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let _guard = trace::init_tracing_subscriber();

	let state = State {
		database: Database::connect(
			&std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
		)
		.await
		.expect("failed to connect to database"),
	};

	let governor = ratelimit::default();

	ratelimit::cleanup_old_limits(&[&governor]);

	let app = api(state).layer(
		ServiceBuilder::new()
			.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
			.layer(TraceLayer::new_for_http().make_span_with(make_span))
			.layer(PropagateRequestIdLayer::x_request_id())
			.layer(CorsLayer::permissive())
			.layer(CompressionLayer::new())
			.layer(GovernorLayer { config: governor }),
	);

	let port = std::env::var("PORT").map_or_else(
		|_| 3000,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await
	.unwrap();
}

#[cfg(test)]
pub mod test {
	pub use serde_json::json;

	pub use crate::Database;

	/// Spins up a test server around the full application router.
	pub fn app(pool: Database) -> axum_test::TestServer {
		axum_test::TestServer::new(crate::api(crate::State { database: pool }))
			.expect("failed to start test server")
	}
}
