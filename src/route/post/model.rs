pub use crate::route::model::{IdInput, PagedResponse};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A single post, created by a user.
#[derive(Debug, Deserialize, Serialize, JsonSchema, Validate, sqlx::FromRow)]
pub struct Post {
	/// The unique identifier of the post.
	#[serde(skip_deserializing)]
	pub id: Uuid,
	/// The user that created the post.
	pub user_id: Uuid,
	/// The body of the post.
	#[validate(length(min = 1, max = 4096))]
	pub content: String,
	/// The creation time of the post.
	#[serde(skip_deserializing)]
	pub created_at: chrono::DateTime<chrono::Utc>,
	/// The time of the last content update.
	#[serde(skip_deserializing)]
	pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating a post. The author is named explicitly since there
/// is no authentication layer to infer one from.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct CreatePostInput {
	/// The user creating the post.
	pub user_id: Uuid,
	#[validate(length(min = 1, max = 4096))]
	pub content: String,
}

/// Input for updating a post. Only the content can change; the author and
/// creation time are immutable.
#[derive(Debug, Deserialize, JsonSchema, Validate)]
pub struct UpdatePostInput {
	#[validate(length(min = 1, max = 4096))]
	pub content: String,
}

/// These can be removed when [`serde`] supports
/// literal defaults: <https://github.com/serde-rs/serde/issues/368>
#[inline]
fn zero() -> i64 {
	0
}

#[inline]
fn ten() -> i64 {
	10
}

/// Query parameters of the post listing.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct ListPostsInput {
	/// The page to return, starting at 0.
	#[validate(range(min = 0))]
	#[serde(default = "zero")]
	pub page: i64,
	/// The number of posts to return per page.
	#[validate(range(min = 1, max = 100))]
	#[serde(default = "ten")]
	pub size: i64,
	/// Ordering as a `field,direction` token, e.g. `createdAt,desc`.
	/// Sortable fields are `content` and `createdAt`.
	pub sort: Option<String>,
	/// Only posts created by this user.
	#[serde(rename = "userId")]
	pub user_id: Option<Uuid>,
	/// Only posts whose content contains this text, case-insensitively.
	pub search: Option<String>,
}

impl ListPostsInput {
	pub fn offset(&self) -> i64 {
		self.page * self.size
	}

	pub fn limit(&self) -> i64 {
		self.size
	}
}

#[cfg(test)]
mod test {
	use super::ListPostsInput;

	fn input(page: i64, size: i64) -> ListPostsInput {
		ListPostsInput {
			page,
			size,
			sort: None,
			user_id: None,
			search: None,
		}
	}

	#[test]
	fn test_offset_is_zero_based() {
		assert_eq!(input(0, 10).offset(), 0);
		assert_eq!(input(2, 10).offset(), 20);
		assert_eq!(input(3, 5).offset(), 15);
	}

	#[test]
	fn test_limit_is_page_size() {
		assert_eq!(input(0, 25).limit(), 25);
	}
}
