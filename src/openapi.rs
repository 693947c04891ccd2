use aide::{openapi::Tag, transform::TransformOpenApi};

use crate::{error, extract::Json};

pub mod tag {
	pub const USER: &str = "User";
	pub const POST: &str = "Post";
	pub const COMMENT: &str = "Comment";
	pub const FRIENDSHIP: &str = "Friendship";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Chatter Open API")
		.summary("A small social-network backend")
		.description(include_str!("../README.md"))
		.tag(Tag {
			name: tag::USER.into(),
			description: Some("User management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management and listing".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::COMMENT.into(),
			description: Some("Comments on posts".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::FRIENDSHIP.into(),
			description: Some("Friendship requests".into()),
			..Default::default()
		})
		.default_response_with::<Json<error::ErrorResponse>, _>(|res| {
			res.example(error::ErrorResponse {
				status: 400,
				errors: error::Message::new("error message")
					.field("optional field")
					.into_vec(),
			})
		})
}
