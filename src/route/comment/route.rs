use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

const COMMENT_COLUMNS: &str = "id, post_id, user_id, content, created_at";

/// Create comment
/// Leaves a new comment on the post named in the path.
#[route(tag = tag::COMMENT, response(status = 201, description = "The created comment.", shape = "Json<model::Comment>"))]
pub async fn create_comment(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::CreateCommentInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user_id = input.user_id;
	let comment = sqlx::query_as::<_, model::Comment>(&format!(
		r"
			INSERT INTO comments (post_id, user_id, content)
			VALUES ($1, $2, $3)
			RETURNING {COMMENT_COLUMNS}
		"
	))
	.bind(path.id)
	.bind(user_id)
	.bind(input.content)
	.fetch_one(&database)
	.await
	.map_err(|error| match error {
		sqlx::Error::Database(ref e) => match e.constraint() {
			Some("comments_post_id_fkey") => Error::UnknownPost(path.id).into(),
			Some("comments_user_id_fkey") => Error::UnknownAuthor(user_id).into(),
			_ => RouteError::from(error),
		},
		error => RouteError::from(error),
	})?;

	Ok((StatusCode::CREATED, Json(comment)).into_response())
}

/// Get single comment
/// Returns a single comment by its unique id.
#[route(tag = tag::COMMENT)]
pub async fn get_comment(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(&format!(
		"SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
	))
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment(path.id))?))
}

/// Update comment
/// Replaces the content of an existing comment.
#[route(tag = tag::COMMENT)]
pub async fn update_comment(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateCommentInput>,
) -> Result<Json<model::Comment>, RouteError> {
	let comment = sqlx::query_as::<_, model::Comment>(&format!(
		r"
			UPDATE comments
			SET content = $1
			WHERE id = $2
			RETURNING {COMMENT_COLUMNS}
		"
	))
	.bind(input.content)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(comment.ok_or(Error::UnknownComment(path.id))?))
}

/// Delete comment
/// Deletes an existing comment by its unique id.
#[route(tag = tag::COMMENT, response(status = 204, description = "The comment was deleted."))]
pub async fn delete_comment(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let status = sqlx::query("DELETE FROM comments WHERE id = $1")
		.bind(path.id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownComment(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}
