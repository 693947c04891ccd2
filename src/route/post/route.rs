use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path, Query},
	openapi::tag,
	Database,
};

use super::{model, query, Error, RouteError};

/// List posts
/// Returns a page of posts. The result can be narrowed to a single author
/// (`userId`) and to content containing a search term (`search`), and
/// ordered by `sort` (`content` or `createdAt`, ascending or descending,
/// newest first by default).
#[route(tag = tag::POST)]
pub async fn list_posts(
	State(database): State<Database>,
	Query(params): Query<model::ListPostsInput>,
) -> Result<Json<model::PagedResponse<model::Post>>, RouteError> {
	let sort = params
		.sort
		.as_deref()
		.map(query::Sort::parse)
		.transpose()?
		.unwrap_or_default();

	let filter = query::Filter::new(params.user_id, params.search.as_deref());

	let posts =
		query::fetch_page(&database, &filter, sort, params.offset(), params.limit()).await?;
	let total = query::count(&database, &filter).await?;

	Ok(Json(model::PagedResponse::new(
		posts,
		params.page,
		params.size,
		total,
	)))
}

/// Get single post
/// Returns a single post by its unique id.
#[route(tag = tag::POST)]
pub async fn get_post(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r"
			SELECT id, user_id, content, created_at, updated_at FROM posts
			WHERE id = $1
		",
	)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.id))?))
}

/// Create post
/// Creates a new post for the given author.
#[route(tag = tag::POST, response(status = 201, description = "The created post.", shape = "Json<model::Post>"))]
pub async fn create_post(
	State(database): State<Database>,
	Json(input): Json<model::CreatePostInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user_id = input.user_id;
	let post = sqlx::query_as::<_, model::Post>(
		r"
			INSERT INTO posts (user_id, content)
			VALUES ($1, $2)
			RETURNING id, user_id, content, created_at, updated_at
		",
	)
	.bind(user_id)
	.bind(input.content)
	.fetch_one(&database)
	.await
	.map_err(|error| match error {
		sqlx::Error::Database(ref e) if e.constraint() == Some("posts_user_id_fkey") => {
			Error::UnknownAuthor(user_id).into()
		}
		error => RouteError::from(error),
	})?;

	Ok((StatusCode::CREATED, Json(post)).into_response())
}

/// Update post
/// Replaces the content of an existing post, bumping its update time.
#[route(tag = tag::POST)]
pub async fn update_post(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::Post>, RouteError> {
	let post = sqlx::query_as::<_, model::Post>(
		r"
			UPDATE posts
			SET content = $1, updated_at = now()
			WHERE id = $2
			RETURNING id, user_id, content, created_at, updated_at
		",
	)
	.bind(input.content)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(post.ok_or(Error::UnknownPost(path.id))?))
}

/// Delete post
/// Deletes an existing post by its unique id.
#[route(tag = tag::POST, response(status = 204, description = "The post was deleted."))]
pub async fn delete_post(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let status = sqlx::query("DELETE FROM posts WHERE id = $1")
		.bind(path.id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownPost(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}
