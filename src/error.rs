use std::{borrow::Cow, fmt};

use axum::{
	body::Body,
	extract::rejection::{PathRejection, QueryRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
};
use axum_jsonschema::JsonSchemaRejection;
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// A single error message presented to the client.
///
/// `content` is the human-readable description; `field` points at the
/// offending input field where one exists; `details` carries structured
/// context (identifiers, rejected tokens) for programmatic consumers.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'e> {
	pub content: Cow<'e, str>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'e, str>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Map>,
}

impl<'e> Message<'e> {
	pub fn new(content: impl Into<Cow<'e, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn field(mut self, field: impl Into<Cow<'e, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
		self.details
			.get_or_insert_with(Map::new)
			.insert(key.into(), serde_json::to_value(value).unwrap_or_default());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The error envelope returned for every non-2xx response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
	pub status: u16,
	pub errors: Vec<Message<'static>>,
}

/// How an error type maps onto an HTTP response.
///
/// Route modules implement this for their local error enums; the
/// [`RouteError`] envelope turns any implementation into a response.
pub trait ErrorShape: fmt::Display + Sized {
	fn status(&self) -> StatusCode;
	fn into_errors(self) -> Vec<Message<'static>>;
}

/// Failures that can occur in any route: rejected input deserialization,
/// validation errors, rate limiting, and the storage layer.
///
/// The `Display` output may contain sensitive detail; it is logged, never
/// sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("invalid request body")]
	Body(Vec<Message<'static>>),
	#[error("query string error: {0}")]
	Query(#[from] QueryRejection),
	#[error("path parameter error: {0}")]
	Path(#[from] PathRejection),
	#[error("rate limit error: {0}")]
	RateLimited(#[from] GovernorError),
	#[error("database error: {0}")]
	Database(#[from] sqlx::Error),
}

impl From<JsonSchemaRejection> for AppError {
	fn from(rejection: JsonSchemaRejection) -> Self {
		match rejection {
			JsonSchemaRejection::Json(error) => Self::Body(Message::new(error.body_text()).into_vec()),
			JsonSchemaRejection::Serde(error) => Self::Body(Message::new(error.to_string()).into_vec()),
			JsonSchemaRejection::Schema(errors) => Self::Body(
				Message::new("request body does not match the expected schema")
					.detail("schema", errors)
					.into_vec(),
			),
		}
	}
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Body(..) | Self::Query(..) | Self::Path(..) => {
				StatusCode::BAD_REQUEST
			}
			Self::RateLimited(error) => match error {
				GovernorError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
				GovernorError::Other { code, .. } => *code,
				GovernorError::UnableToExtractKey => StatusCode::INTERNAL_SERVER_ERROR,
			},
			Self::Database(error) => match error {
				sqlx::Error::RowNotFound => StatusCode::NOT_FOUND,
				sqlx::Error::Database(e) if e.is_unique_violation() => StatusCode::CONFLICT,
				sqlx::Error::PoolTimedOut | sqlx::Error::Io(..) | sqlx::Error::Tls(..) => {
					StatusCode::SERVICE_UNAVAILABLE
				}
				_ => StatusCode::INTERNAL_SERVER_ERROR,
			},
		}
	}

	fn into_errors(self) -> Vec<Message<'static>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors
						.iter()
						.map(move |error| Message::new(error.to_string()).field(field))
				})
				.collect(),
			Self::Body(messages) => messages,
			Self::Query(error) => Message::new(error.to_string()).into_vec(),
			Self::Path(error) => Message::new(error.to_string()).into_vec(),
			Self::RateLimited(error) => match error {
				GovernorError::TooManyRequests { wait_time, .. } => Message::new("too many requests")
					.detail("retry_after_seconds", wait_time)
					.into_vec(),
				GovernorError::Other { msg, .. } => {
					Message::new(msg.unwrap_or_else(|| "rate limit error".to_owned())).into_vec()
				}
				GovernorError::UnableToExtractKey => {
					Message::new("internal server error").into_vec()
				}
			},
			// Storage detail is logged, never returned to the client.
			Self::Database(error) => Message::new(match &error {
				sqlx::Error::RowNotFound => "resource not found",
				sqlx::Error::Database(e) if e.is_unique_violation() => "resource already exists",
				sqlx::Error::PoolTimedOut | sqlx::Error::Io(..) | sqlx::Error::Tls(..) => {
					"storage temporarily unavailable"
				}
				_ => "internal server error",
			})
			.into_vec(),
		}
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response<Body> {
		match &self {
			Self::Database(error) => tracing::error!(%error, "storage error"),
			error => tracing::debug!(%error, "request rejected"),
		}

		respond(self)
	}
}

/// The error type of every route handler: either a failure any route can
/// produce ([`AppError`]) or the module's own error enum.
///
/// Each module aliases this with its error type, e.g.
/// `type RouteError = error::RouteError<Error>;`.
#[derive(Debug)]
pub enum RouteError<E> {
	App(AppError),
	Route(E),
}

impl<E> From<E> for RouteError<E> {
	fn from(error: E) -> Self {
		Self::Route(error)
	}
}

impl<E: ErrorShape> IntoResponse for RouteError<E> {
	fn into_response(self) -> Response<Body> {
		match self {
			Self::App(error) => error.into_response(),
			Self::Route(error) => {
				if error.status().is_server_error() {
					tracing::error!(%error, "route error");
				}

				respond(error)
			}
		}
	}
}

impl<E> aide::OperationOutput for RouteError<E> {
	type Inner = ErrorResponse;

	fn operation_response(
		ctx: &mut aide::gen::GenContext,
		operation: &mut aide::openapi::Operation,
	) -> Option<aide::openapi::Response> {
		axum::Json::<ErrorResponse>::operation_response(ctx, operation)
	}
}

fn respond<E: ErrorShape>(error: E) -> Response<Body> {
	let status = error.status();

	(
		status,
		axum::Json(ErrorResponse {
			status: status.as_u16(),
			errors: error.into_errors(),
		}),
	)
		.into_response()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_database_error_statuses() {
		assert_eq!(
			AppError::Database(sqlx::Error::RowNotFound).status(),
			StatusCode::NOT_FOUND
		);
		assert_eq!(
			AppError::Database(sqlx::Error::PoolTimedOut).status(),
			StatusCode::SERVICE_UNAVAILABLE
		);
	}

	#[test]
	fn test_message_details_round_trip() {
		let message = Message::new("unknown post").detail("post", "d4f0");

		assert_eq!(
			serde_json::to_value(&message).unwrap(),
			serde_json::json!({
				"content": "unknown post",
				"details": { "post": "d4f0" },
			})
		);
	}
}
