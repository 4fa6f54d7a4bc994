use axum::response::{IntoResponse, Response};
use http::StatusCode;

#[derive(Debug, thiserror::Error)]
#[error("SQL error: {0}")]
pub struct Sqlx(#[source] pub sqlx::Error);

#[derive(Clone, Copy, Debug, thiserror::Error)]
#[error("Could not find song with id {0}")]
pub struct SongNotFound(pub i64);

#[derive(Debug, thiserror::Error)]
#[error("Could not find file {0}")]
pub struct UploadNotFound(pub String);

#[derive(Clone, Copy, Debug, thiserror::Error)]
#[error("Could not find file data")]
pub struct MissingFilePart;

/// Request body failed to match the expected shape; carries the decoder's message.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidBody(pub String);

#[derive(Clone, Copy, Debug, thiserror::Error)]
#[error("cannot satisfy Accept header; this endpoint produces {0}")]
pub struct NotAcceptable(pub &'static str);

#[derive(Clone, Copy, Debug, thiserror::Error)]
#[error("expected request Content-Type {0}")]
pub struct UnsupportedMediaType(pub &'static str);

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Multipart(#[source] pub axum::extract::multipart::MultipartError);

#[derive(Debug, thiserror::Error)]
#[error("IO error while {0}: {1}")]
pub struct Io(pub &'static str, #[source] pub std::io::Error);

/// All errors surface to the client as `{"message": <Display text>}`.
pub fn error_response(error: &dyn std::error::Error, status_code: StatusCode) -> Response {
	let body = serde_json::json!({ "message": error.to_string() });
	(status_code, axum::Json(body)).into_response()
}

macro_rules! impl_response {
	($struct_name:ident, $status:ident) => {
		impl axum::response::IntoResponse for $struct_name {
			fn into_response(self) -> axum::response::Response {
				crate::error::error_response(&self, http::StatusCode::$status)
			}
		}
	};
}

impl_response!(Sqlx, INTERNAL_SERVER_ERROR);
impl_response!(SongNotFound, NOT_FOUND);
impl_response!(UploadNotFound, NOT_FOUND);
impl_response!(MissingFilePart, UNPROCESSABLE_ENTITY);
impl_response!(InvalidBody, UNPROCESSABLE_ENTITY);
impl_response!(NotAcceptable, NOT_ACCEPTABLE);
impl_response!(UnsupportedMediaType, UNSUPPORTED_MEDIA_TYPE);
impl_response!(Multipart, BAD_REQUEST);

impl IntoResponse for Io {
	fn into_response(self) -> Response {
		use std::io::ErrorKind;

		let status_code = match self.1.kind() {
			ErrorKind::NotFound => StatusCode::NOT_FOUND,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		};
		error_response(&self, status_code)
	}
}
