use aide::axum::{routing::get_with, ApiRouter};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown comment {0}")]
	UnknownComment(Uuid),
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown author {0}")]
	UnknownAuthor(Uuid),
}

pub type RouteError = error::RouteError<Error>;

impl From<sqlx::Error> for RouteError {
	fn from(error: sqlx::Error) -> Self {
		Self::App(error.into())
	}
}

/// Routes for operating on existing comments. Creation lives under the
/// post routes, since a comment is always left on a post.
pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new().api_route(
		"/:id",
		get_with(get_comment, get_comment_docs)
			.put_with(update_comment, update_comment_docs)
			.delete_with(delete_comment, delete_comment_docs),
	)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownComment(..) | Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::UnknownAuthor(..) => StatusCode::BAD_REQUEST,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::UnknownComment(comment) => message.detail("comment", comment).into_vec(),
			Self::UnknownPost(post) => message.detail("post", post).into_vec(),
			Self::UnknownAuthor(author) => message.detail("author", author).into_vec(),
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	async fn setup_post(app: &axum_test::TestServer) -> (uuid::Uuid, String) {
		let response = app
			.post("/users")
			.json(&json!({
				"username": "alice",
				"email": "alice@example.com",
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		let user_id = response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.parse()
			.unwrap();

		let response = app
			.post("/posts")
			.json(&json!({ "user_id": user_id, "content": "a post" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let post_id = response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.to_owned();

		(user_id, post_id)
	}

	#[sqlx::test]
	async fn test_comment_crud_flow(pool: Database) {
		let app = app(pool);
		let (user_id, post_id) = setup_post(&app).await;

		let response = app
			.post(&format!("/posts/{post_id}/comments"))
			.json(&json!({ "user_id": user_id, "content": "nice post" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let comment = response.json::<serde_json::Value>();
		let id = comment["id"].as_str().unwrap();

		assert_eq!(comment["post_id"].as_str().unwrap(), post_id);

		let response = app.get(&format!("/comments/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["content"], "nice post");

		let response = app
			.put(&format!("/comments/{id}"))
			.json(&json!({ "content": "edited" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["content"], "edited");

		let response = app.delete(&format!("/comments/{id}")).await;

		assert_eq!(response.status_code(), 204);

		let response = app.get(&format!("/comments/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_commenting_on_missing_post_is_not_found(pool: Database) {
		let app = app(pool);
		let (user_id, _) = setup_post(&app).await;

		let response = app
			.post(&format!("/posts/{}/comments", uuid::Uuid::new_v4()))
			.json(&json!({ "user_id": user_id, "content": "hello?" }))
			.await;

		assert_eq!(response.status_code(), 404);
	}
}
