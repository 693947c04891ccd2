pub use crate::route::model::IdInput;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// The lifecycle of a friendship request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "friendship_status", rename_all = "lowercase")]
pub enum FriendshipStatus {
	Pending,
	Accepted,
	Declined,
}

/// A friendship record between two users.
///
/// A flat status record: `user_id` sent the request, `friend_id` received
/// it, and `status` tracks where it stands.
#[derive(Debug, Serialize, JsonSchema, sqlx::FromRow)]
pub struct Friendship {
	/// The unique identifier of the friendship.
	pub id: Uuid,
	/// The user that sent the request.
	pub user_id: Uuid,
	/// The user the request was sent to.
	pub friend_id: Uuid,
	pub status: FriendshipStatus,
	/// The time the request was sent.
	pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Input for sending a friendship request. New requests always start out
/// pending; the receiver moves them along with an update.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreateFriendshipInput {
	pub user_id: Uuid,
	pub friend_id: Uuid,
}

/// Input for moving a friendship request to a new status.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdateFriendshipInput {
	pub status: FriendshipStatus,
}
