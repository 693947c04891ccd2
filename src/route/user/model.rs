pub use crate::route::model::IdInput;

use macros::model;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single user.
#[model]
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct User {
	/// The unique identifier of the user.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The name displayed to the public.
	#[validate(length(min = 3, max = 32))]
	pub username: String,
	/// The user's primary email address.
	#[validate(email)]
	pub email: String,
	/// Stored as supplied and never serialized back; there is no
	/// authentication layer consuming it.
	#[serde(skip_serializing)]
	#[validate(length(min = 8, max = 128))]
	pub password: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	/// The creation time of the user.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
	/// The time of the last profile update.
	#[serde(skip_deserializing)]
	pub updated_at: chrono::DateTime<chrono::Utc>,
}
