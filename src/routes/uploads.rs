use std::sync::Arc;

use axum::response::{ErrorResponse, Response};
use axum::{extract, Router};
use tower::Service as _;
use tower_http::services::ServeFile;

use crate::config::Config;
use crate::error;
use crate::helpers::secure_filename;

/// Serves uploaded file contents back. `ServeFile` infers the content type
/// from the extension and produces the 404 for missing files.
async fn get_handler(
	extract::Path((filename,)): extract::Path<(String,)>,
	extract::Extension(config): extract::Extension<Arc<Config>>,
	req_parts: http::request::Parts,
) -> Result<Response, ErrorResponse> {
	// A name that does not survive sanitization unchanged cannot have been
	// produced by the upload endpoint, so it cannot exist under the upload
	// directory. This also forecloses traversal.
	if filename.is_empty() || secure_filename(&filename) != filename {
		return Err(error::UploadNotFound(filename).into());
	}

	let fs_path = config.upload_dir.join(&filename);
	let mut service = ServeFile::new(fs_path);
	let request = http::Request::from_parts(req_parts, ());
	let response = service
		.call(request)
		.await
		.map_err(|err| error::Io("serving uploaded file", err))?;
	Ok(response.map(|body| {
		use http_body::Body as _;
		body.map_err(axum::Error::new).boxed_unsync()
	}))
}

pub fn configure() -> Router {
	let mut app = Router::new();
	app = app.route("/:filename", axum::routing::get(get_handler));
	app
}
