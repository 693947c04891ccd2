use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("username already taken")]
	UsernameTaken,
	#[error("email already taken")]
	EmailTaken,
}

pub type RouteError = error::RouteError<Error>;

impl From<sqlx::Error> for RouteError {
	fn from(error: sqlx::Error) -> Self {
		Self::App(error.into())
	}
}

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_users, list_users_docs).post_with(create_user, create_user_docs),
		)
		.api_route(
			"/:id",
			get_with(get_user, get_user_docs)
				.put_with(update_user, update_user_docs)
				.delete_with(delete_user, delete_user_docs),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownUser(..) => StatusCode::NOT_FOUND,
			Self::UsernameTaken | Self::EmailTaken => StatusCode::CONFLICT,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::UnknownUser(user) => message.detail("user", user).into_vec(),
			Self::UsernameTaken | Self::EmailTaken => message.into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	#[sqlx::test]
	async fn test_user_crud_flow(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/users")
			.json(&json!({
				"username": "john",
				"email": "john@smith.com",
				"password": "hunter2hunter",
				"first_name": "John",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let user = response.json::<serde_json::Value>();
		let id = user["id"].as_str().unwrap();

		assert_eq!(user["username"], "john");
		// The password never leaves the server.
		assert!(user.get("password").is_none());

		let response = app.get(&format!("/users/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["first_name"], "John");

		let response = app
			.put(&format!("/users/{id}"))
			.json(&json!({ "username": "johnny" }))
			.await;

		assert_eq!(response.status_code(), 200);

		let user = response.json::<serde_json::Value>();

		// Omitted fields are unchanged.
		assert_eq!(user["username"], "johnny");
		assert_eq!(user["email"], "john@smith.com");

		let response = app.get("/users").await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>().as_array().unwrap().len(), 1);

		let response = app.delete(&format!("/users/{id}")).await;

		assert_eq!(response.status_code(), 204);

		let response = app.get(&format!("/users/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_duplicate_email_conflicts(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/users")
			.json(&json!({
				"username": "john",
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let response = app
			.post("/users")
			.json(&json!({
				"username": "johnny",
				"email": "john@smith.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 409);
	}

	#[sqlx::test]
	async fn test_create_rejects_invalid_email(pool: Database) {
		let app = app(pool);

		let response = app
			.post("/users")
			.json(&json!({
				"username": "john",
				"email": "not-an-email",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 400);
	}
}
