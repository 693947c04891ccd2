use aide::axum::{
	routing::{post_with, put_with},
	ApiRouter,
};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::{error, AppState};

pub mod model;
pub mod route;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unknown friendship {0}")]
	UnknownFriendship(Uuid),
	#[error("unknown user {0}")]
	UnknownUser(Uuid),
	#[error("cannot friend yourself")]
	SelfFriendship,
	#[error("friendship already requested")]
	AlreadyRequested,
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
		.api_route("/", post_with(send_request, send_request_docs))
		.api_route("/:id", put_with(update_status, update_status_docs))
}

impl error::ErrorShape for Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::UnknownFriendship(..) | Self::UnknownUser(..) => StatusCode::NOT_FOUND,
			Self::SelfFriendship => StatusCode::BAD_REQUEST,
			Self::AlreadyRequested => StatusCode::CONFLICT,
		}
	}

	fn into_errors(self) -> Vec<error::Message<'static>> {
		let message = error::Message::new(self.to_string());

		match self {
			Self::UnknownFriendship(friendship) => {
				message.detail("friendship", friendship).into_vec()
			}
			Self::UnknownUser(user) => message.detail("user", user).into_vec(),
			Self::SelfFriendship | Self::AlreadyRequested => message.into_vec(),
		}
	}
}
