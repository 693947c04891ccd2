use aide::axum::IntoApiResponse;
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use macros::route;

use crate::{
	extract::{Json, Path},
	openapi::tag,
	Database,
};

use super::{model, Error, RouteError};

const USER_COLUMNS: &str =
	"id, username, email, password, first_name, last_name, created_at, updated_at";

/// List users
/// Returns every user, newest first.
#[route(tag = tag::USER)]
pub async fn list_users(
	State(database): State<Database>,
) -> Result<Json<Vec<model::User>>, RouteError> {
	let users = sqlx::query_as::<_, model::User>(&format!(
		"SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
	))
	.fetch_all(&database)
	.await?;

	Ok(Json(users))
}

/// Get single user
/// Returns a single user by their unique id.
#[route(tag = tag::USER)]
pub async fn get_user(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<Json<model::User>, RouteError> {
	let user =
		sqlx::query_as::<_, model::User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
			.bind(path.id)
			.fetch_optional(&database)
			.await?;

	Ok(Json(user.ok_or(Error::UnknownUser(path.id))?))
}

/// Create user
/// Registers a new user.
#[route(tag = tag::USER, response(status = 201, description = "The created user.", shape = "Json<model::User>"))]
pub async fn create_user(
	State(database): State<Database>,
	Json(input): Json<model::CreateUserInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let user = sqlx::query_as::<_, model::User>(&format!(
		r"
			INSERT INTO users (username, email, password, first_name, last_name)
			VALUES ($1, $2, $3, $4, $5)
			RETURNING {USER_COLUMNS}
		"
	))
	.bind(input.username)
	.bind(input.email)
	.bind(input.password)
	.bind(input.first_name)
	.bind(input.last_name)
	.fetch_one(&database)
	.await
	.map_err(|error| match error {
		sqlx::Error::Database(ref e) => match e.constraint() {
			Some("users_email_key") => Error::EmailTaken.into(),
			Some("users_username_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(error),
		},
		error => RouteError::from(error),
	})?;

	Ok((StatusCode::CREATED, Json(user)).into_response())
}

/// Update user
/// Updates a user's profile; omitted fields are left unchanged.
#[route(tag = tag::USER)]
pub async fn update_user(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
	Json(input): Json<model::UpdateUserInput>,
) -> Result<Json<model::User>, RouteError> {
	let user = sqlx::query_as::<_, model::User>(&format!(
		r"
			UPDATE users
			SET username = COALESCE($1, username),
				email = COALESCE($2, email),
				password = COALESCE($3, password),
				first_name = COALESCE($4, first_name),
				last_name = COALESCE($5, last_name),
				updated_at = now()
			WHERE id = $6
			RETURNING {USER_COLUMNS}
		"
	))
	.bind(input.username)
	.bind(input.email)
	.bind(input.password)
	.bind(input.first_name.flatten())
	.bind(input.last_name.flatten())
	.bind(path.id)
	.fetch_optional(&database)
	.await
	.map_err(|error| match error {
		sqlx::Error::Database(ref e) => match e.constraint() {
			Some("users_email_key") => Error::EmailTaken.into(),
			Some("users_username_key") => Error::UsernameTaken.into(),
			_ => RouteError::from(error),
		},
		error => RouteError::from(error),
	})?;

	Ok(Json(user.ok_or(Error::UnknownUser(path.id))?))
}

/// Delete user
/// Deletes a user and, through cascading, their posts, comments, and
/// friendships. This action is irreversible.
#[route(tag = tag::USER, response(status = 204, description = "The user was deleted."))]
pub async fn delete_user(
	State(database): State<Database>,
	Path(path): Path<model::IdInput>,
) -> Result<impl IntoApiResponse, RouteError> {
	let status = sqlx::query("DELETE FROM users WHERE id = $1")
		.bind(path.id)
		.execute(&database)
		.await?;

	if status.rows_affected() == 0 {
		return Err(Error::UnknownUser(path.id).into());
	}

	Ok(StatusCode::NO_CONTENT.into_response())
}
