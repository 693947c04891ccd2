use aide::axum::{
	routing::{get_with, post_with},
	ApiRouter,
};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod query;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown post {0}")]
	UnknownPost(Uuid),
	#[error("unknown author {0}")]
	UnknownAuthor(Uuid),
	#[error("malformed sort token {0:?}")]
	MalformedSort(String),
	#[error("field {0:?} is not sortable")]
	UnknownSortField(String),
	#[error("unknown sort direction {0:?}")]
	UnknownSortDirection(String),
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
			get_with(list_posts, list_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.put_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
		.api_route(
			"/:id/comments",
			post_with(
				super::comment::route::create_comment,
				super::comment::route::create_comment_docs,
			),
		)
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::UnknownAuthor(..)
			| Self::MalformedSort(..)
			| Self::UnknownSortField(..)
			| Self::UnknownSortDirection(..) => StatusCode::BAD_REQUEST,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::UnknownPost(post) => message.detail("post", post).into_vec(),
			Self::UnknownAuthor(author) => message.detail("author", author).into_vec(),
			Self::MalformedSort(token)
			| Self::UnknownSortField(token)
			| Self::UnknownSortDirection(token) => {
				message.field("sort").detail("token", token).into_vec()
			}
		}
	}
}

#[cfg(test)]
mod test {
	use crate::test::*;

	async fn create_user(app: &axum_test::TestServer, username: &str) -> uuid::Uuid {
		let response = app
			.post("/users")
			.json(&json!({
				"username": username,
				"email": format!("{username}@example.com"),
				"password": "hunter2hunter",
			}))
			.await;

		assert_eq!(response.status_code(), 201);

		response.json::<serde_json::Value>()["id"]
			.as_str()
			.unwrap()
			.parse()
			.unwrap()
	}

	async fn create_post(app: &axum_test::TestServer, user_id: uuid::Uuid, content: &str) {
		let response = app
			.post("/posts")
			.json(&json!({ "user_id": user_id, "content": content }))
			.await;

		assert_eq!(response.status_code(), 201);
	}

	#[sqlx::test]
	async fn test_listing_filters_sorts_and_counts(pool: Database) {
		let app = app(pool);

		let alice = create_user(&app, "alice").await;
		let bob = create_user(&app, "bob").await;

		for content in ["hello", "world", "hello world"] {
			create_post(&app, alice, content).await;
		}

		create_post(&app, bob, "other").await;

		let response = app
			.get("/posts")
			.add_query_param("userId", alice)
			.add_query_param("search", "hello")
			.add_query_param("sort", "content,asc")
			.await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["totalElements"], 2);
		assert_eq!(body["totalPages"], 1);

		let contents = body["content"]
			.as_array()
			.unwrap()
			.iter()
			.map(|post| post["content"].as_str().unwrap())
			.collect::<Vec<_>>();

		assert_eq!(contents, ["hello", "hello world"]);
	}

	#[sqlx::test]
	async fn test_listing_paginates_with_consistent_totals(pool: Database) {
		let app = app(pool);
		let alice = create_user(&app, "alice").await;

		for content in ["a", "b", "c", "d", "e"] {
			create_post(&app, alice, content).await;
		}

		let mut seen = Vec::new();

		for page in 0..3 {
			let response = app
				.get("/posts")
				.add_query_param("page", page)
				.add_query_param("size", 2)
				.add_query_param("sort", "content,asc")
				.await;

			assert_eq!(response.status_code(), 200);

			let body = response.json::<serde_json::Value>();

			assert_eq!(body["totalElements"], 5);
			assert_eq!(body["totalPages"], 3);

			seen.extend(
				body["content"]
					.as_array()
					.unwrap()
					.iter()
					.map(|post| post["content"].as_str().unwrap().to_owned()),
			);
		}

		// Walking every page yields each matching row exactly once.
		assert_eq!(seen, ["a", "b", "c", "d", "e"]);
	}

	#[sqlx::test]
	async fn test_listing_rejects_invalid_parameters(pool: Database) {
		let app = app(pool);

		for (key, value) in [
			("page", "-1"),
			("size", "0"),
			("sort", "bogus,asc"),
			("sort", "content,sideways"),
			("sort", "content"),
		] {
			let response = app.get("/posts").add_query_param(key, value).await;

			assert_eq!(response.status_code(), 400, "{key}={value}");
		}
	}

	#[sqlx::test]
	async fn test_empty_listing_is_a_valid_page(pool: Database) {
		let app = app(pool);

		let response = app
			.get("/posts")
			.add_query_param("search", "no such content")
			.await;

		assert_eq!(response.status_code(), 200);

		let body = response.json::<serde_json::Value>();

		assert_eq!(body["content"], json!([]));
		assert_eq!(body["totalElements"], 0);
		assert_eq!(body["totalPages"], 0);
	}

	#[sqlx::test]
	async fn test_post_crud_flow(pool: Database) {
		let app = app(pool);
		let alice = create_user(&app, "alice").await;

		let response = app
			.post("/posts")
			.json(&json!({ "user_id": alice, "content": "first!" }))
			.await;

		assert_eq!(response.status_code(), 201);

		let post = response.json::<serde_json::Value>();
		let id = post["id"].as_str().unwrap();

		assert_eq!(post["content"], "first!");

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["content"], "first!");

		let response = app
			.put(&format!("/posts/{id}"))
			.json(&json!({ "content": "edited" }))
			.await;

		assert_eq!(response.status_code(), 200);
		assert_eq!(response.json::<serde_json::Value>()["content"], "edited");

		let response = app.delete(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 204);

		let response = app.get(&format!("/posts/{id}")).await;

		assert_eq!(response.status_code(), 404);
	}

	#[sqlx::test]
	async fn test_deleting_missing_post_is_not_found_every_time(pool: Database) {
		let app = app(pool);
		let id = uuid::Uuid::new_v4();

		for _ in 0..2 {
			let response = app.delete(&format!("/posts/{id}")).await;

			assert_eq!(response.status_code(), 404);
		}
	}

	#[sqlx::test]
	async fn test_create_rejects_empty_content_and_unknown_author(pool: Database) {
		let app = app(pool);
		let alice = create_user(&app, "alice").await;

		let response = app
			.post("/posts")
			.json(&json!({ "user_id": alice, "content": "" }))
			.await;

		assert_eq!(response.status_code(), 400);

		let response = app
			.post("/posts")
			.json(&json!({ "user_id": uuid::Uuid::new_v4(), "content": "hello" }))
			.await;

		assert_eq!(response.status_code(), 400);
	}
}
