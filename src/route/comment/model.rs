pub use crate::route::model::IdInput;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A comment left on a post.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Comment {
	/// The unique identifier of the comment.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The post the comment was left on.
	#[serde(skip_deserializing)]
	pub post_id: Uuid,
	/// The user that wrote the comment.
	pub user_id: Uuid,
	/// The body of the comment.
	#[validate(length(min = 1, max = 2048))]
	pub content: String,
	/// The creation time of the comment.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for commenting on a post; the post comes from the request path.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreateCommentInput {
	/// The user writing the comment.
	pub user_id: Uuid,
	#[validate(length(min = 1, max = 2048))]
	pub content: String,
}

/// Input for updating a comment's content.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdateCommentInput {
	#[validate(length(min = 1, max = 2048))]
	pub content: String,
}
