use std::sync::Arc;

use axum::body::Bytes;
use axum::response::{ErrorResponse, IntoResponse, Response};
use axum::{extract, Json, Router};
use http::StatusCode;

use crate::database::{models, Database};
use crate::error;
use crate::helpers::media_type::{AcceptJson, RequireJson};

/// Expected body for POST and PUT: `{"file": {"id": <integer>}}`.
#[derive(serde::Deserialize)]
struct SongBody {
	file: FileRef,
}

#[derive(serde::Deserialize)]
struct FileRef {
	id: models::FileId,
}

#[derive(serde::Serialize)]
struct FileInfo {
	id: models::FileId,
	name: String,
}

#[derive(serde::Serialize)]
struct SongInfo {
	id: models::SongId,
	file: FileInfo,
}

fn parse_body(body: &Bytes) -> Result<SongBody, error::InvalidBody> {
	serde_json::from_slice(body).map_err(|err| error::InvalidBody(err.to_string()))
}

/// Resolves the referenced file to build the nested representation. The
/// foreign key guarantees the file row exists; a miss here is a database-level
/// inconsistency, so it surfaces as a SQL error.
async fn song_info(database: &Database, song: &models::Song) -> Result<SongInfo, ErrorResponse> {
	let file = models::File::by_id(database, song.song_file_id)
		.await
		.map_err(error::Sqlx)?
		.ok_or_else(|| error::Sqlx(sqlx::Error::RowNotFound))?;
	Ok(SongInfo {
		id: song.id,
		file: FileInfo {
			id: file.id,
			name: file.filename,
		},
	})
}

#[derive(sqlx::FromRow)]
struct JoinedRow {
	id: models::SongId,
	file_id: models::FileId,
	filename: String,
}

async fn get_handler(
	_: AcceptJson,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Response, ErrorResponse> {
	let rows = sqlx::query_as::<_, JoinedRow>(
		"SELECT songs.id, files.id AS file_id, files.filename FROM songs INNER JOIN files ON files.id = songs.song_file_id ORDER BY songs.id",
	)
	.fetch_all(&*database)
	.await
	.map_err(error::Sqlx)?;
	let songs: Vec<SongInfo> = rows
		.into_iter()
		.map(|row| SongInfo {
			id: row.id,
			file: FileInfo {
				id: row.file_id,
				name: row.filename,
			},
		})
		.collect();
	Ok(Json(songs).into_response())
}

async fn post_handler(
	_: AcceptJson,
	_: RequireJson,
	extract::Extension(database): extract::Extension<Arc<Database>>,
	body: Bytes,
) -> Result<Response, ErrorResponse> {
	let body = parse_body(&body)?;

	let song = models::Song::create(&database, body.file.id)
		.await
		.map_err(error::Sqlx)?;
	let info = song_info(&database, &song).await?;

	let mut response = (StatusCode::CREATED, Json(info)).into_response();
	response.headers_mut().insert(
		http::header::LOCATION,
		http::HeaderValue::from_static("/api/songs"),
	);
	Ok(response)
}

async fn put_handler(
	_: AcceptJson,
	_: RequireJson,
	extract::Path((song_id,)): extract::Path<(models::SongId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
	body: Bytes,
) -> Result<Response, ErrorResponse> {
	models::Song::by_id(&database, song_id)
		.await
		.map_err(error::Sqlx)?
		.ok_or(error::SongNotFound(song_id))?;

	let body = parse_body(&body)?;

	let song = models::Song::set_file(&database, song_id, body.file.id)
		.await
		.map_err(error::Sqlx)?
		.ok_or(error::SongNotFound(song_id))?;
	let info = song_info(&database, &song).await?;
	Ok(Json(info).into_response())
}

async fn delete_handler(
	_: AcceptJson,
	extract::Path((song_id,)): extract::Path<(models::SongId,)>,
	extract::Extension(database): extract::Extension<Arc<Database>>,
) -> Result<Response, ErrorResponse> {
	let deleted = models::Song::delete(&database, song_id)
		.await
		.map_err(error::Sqlx)?;
	if !deleted {
		return Err(error::SongNotFound(song_id).into());
	}

	let message = format!("Successfully deleted song with id {song_id}");
	Ok(Json(serde_json::json!({ "message": message })).into_response())
}

pub fn configure() -> Router {
	let mut app = Router::new();
	app = app.route("/", axum::routing::get(get_handler).post(post_handler));
	app = app.route(
		"/:id",
		axum::routing::put(put_handler).delete(delete_handler),
	);
	app
}
