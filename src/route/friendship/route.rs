use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

const FRIENDSHIP_COLUMNS: &str = "id, user_id, friend_id, status, created_at";

/// Send friendship request
/// Sends a friendship request from one user to another. The new request
/// starts out pending.
#[route(tag = tag::FRIENDSHIP, response(status = 201, description = "The created friendship request.", shape = "Json<model::Friendship>"))]
pub async fn send_request(
	State(database): State<Database>,
	Json(input): Json<model::CreateFriendshipInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	if input.user_id == input.friend_id {
		return Err(Error::SelfFriendship.into());
	}

	let friendship = sqlx::query_as::<_, model::Friendship>(&format!(
		r"
			INSERT INTO friendships (user_id, friend_id)
			VALUES ($1, $2)
			RETURNING {FRIENDSHIP_COLUMNS}
		"
	))
	.bind(input.user_id)
	.bind(input.friend_id)
	.fetch_one(&database)
	.await
	.map_err(|error| match error {
		sqlx::Error::Database(ref e) => match e.constraint() {
			Some("friendships_user_id_friend_id_key") => Error::AlreadyRequested.into(),
			Some("friendships_user_id_fkey") => Error::UnknownUser(input.user_id).into(),
			Some("friendships_friend_id_fkey") => Error::UnknownUser(input.friend_id).into(),
			_ => RouteError::from(error),
		},
		error => RouteError::from(error),
	})?;

	Ok((StatusCode::CREATED, Json(friendship)).into_response())
}

/// Update friendship status
/// Moves an existing friendship request to a new status, accepting or
/// declining it.
#[route(tag = tag::FRIENDSHIP)]
pub async fn update_status(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateFriendshipInput>,
) -> Result<Json<model::Friendship>, RouteError> {
	let friendship = sqlx::query_as::<_, model::Friendship>(&format!(
		r"
			UPDATE friendships
			SET status = $1
			WHERE id = $2
			RETURNING {FRIENDSHIP_COLUMNS}
		"
	))
	.bind(input.status)
	.bind(path.id)
	.fetch_optional(&database)
	.await?;

	Ok(Json(friendship.ok_or(Error::UnknownFriendship(path.id))?))
}
