use std::sync::Arc;

use axum::response::{ErrorResponse, IntoResponse, Response};
use axum::{extract, Json, Router};
use http::StatusCode;

use crate::config::Config;
use crate::database::{models, Database};
use crate::error;
use crate::helpers::media_type::{AcceptJson, RequireMultipart};
use crate::helpers::{secure_filename, TempFile};

#[derive(serde::Serialize)]
struct FileInfo {
	id: models::FileId,
	name: String,
	/// URL path under which the contents can be fetched back.
	path: String,
}

async fn post_handler(
	_: RequireMultipart,
	_: AcceptJson,
	extract::Extension(database): extract::Extension<Arc<Database>>,
	extract::Extension(config): extract::Extension<Arc<Config>>,
	mut multipart: extract::Multipart,
) -> Result<Response, ErrorResponse> {
	let (original_name, contents) = loop {
		let field = multipart
			.next_field()
			.await
			.map_err(error::Multipart)?
			.ok_or(error::MissingFilePart)?;
		if field.name() != Some("file") {
			continue;
		}
		let name = field
			.file_name()
			.ok_or(error::MissingFilePart)?
			.to_owned();
		let contents = field.bytes().await.map_err(error::Multipart)?;
		break (name, contents);
	};

	let filename = secure_filename(&original_name);
	if filename.is_empty() {
		return Err(error::MissingFilePart.into());
	}

	// The row is recorded before the bytes land on disk. A crash in between
	// leaves an orphan row, never an unrecorded file.
	let record = models::File::create(&database, &filename)
		.await
		.map_err(error::Sqlx)?;

	let final_path = config.upload_dir.join(&record.filename);
	let mut temp_file = TempFile::create(&final_path)
		.await
		.map_err(|err| error::Io("opening temporary upload file", err))?;
	temp_file
		.write_all(&contents)
		.await
		.map_err(|err| error::Io("writing upload contents", err))?;
	temp_file
		.move_into_place()
		.await
		.map_err(|err| error::Io("moving upload into place", err))?;

	let info = FileInfo {
		path: format!("/uploads/{}", record.filename),
		id: record.id,
		name: record.filename,
	};
	Ok((StatusCode::CREATED, Json(info)).into_response())
}

pub fn configure() -> Router {
	let mut app = Router::new();
	app = app.route("/", axum::routing::post(post_handler));
	app
}
