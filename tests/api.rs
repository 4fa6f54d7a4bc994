use std::sync::Arc;

use axum::body::Body;
use axum::{Extension, Router};
use bindable::BindableAddr;
use http::{Request, StatusCode};
use songbox::config::{Config, LogLevel};
use songbox::database::models::{File, Song};
use songbox::database::{self, Database};
use songbox::routes;
use tower::ServiceExt as _;
use tracing_subscriber::filter::LevelFilter;

struct TestApp {
	app: Router,
	database: Arc<Database>,
	upload_dir: std::path::PathBuf,
	// Removed on drop, taking the database file and uploads with it.
	_dir: tempfile::TempDir,
}

async fn spawn() -> TestApp {
	let dir = tempfile::tempdir().unwrap();
	let database_url = format!("sqlite://{}", dir.path().join("songbox.db").display());
	let database = Arc::new(database::connect(&database_url).await.unwrap());

	let upload_dir = dir.path().join("uploads");
	std::fs::create_dir_all(&upload_dir).unwrap();

	let config = Arc::new(Config {
		address: BindableAddr::Tcp(([127, 0, 0, 1], 0).into()),
		log_level: LogLevel {
			internal: LevelFilter::OFF,
			external: LevelFilter::OFF,
		},
		database_url,
		upload_dir: upload_dir.clone(),
	});

	let app = routes::configure()
		.layer(Extension(Arc::clone(&database)))
		.layer(Extension(config));

	TestApp {
		app,
		database,
		upload_dir,
		_dir: dir,
	}
}

impl TestApp {
	async fn request(&self, request: Request<Body>) -> (StatusCode, http::HeaderMap, Vec<u8>) {
		let response = self.app.clone().oneshot(request).await.unwrap();
		let (parts, body) = response.into_parts();
		let body = hyper::body::to_bytes(body).await.unwrap();
		(parts.status, parts.headers, body.to_vec())
	}

	async fn request_json(
		&self,
		request: Request<Body>,
	) -> (StatusCode, http::HeaderMap, serde_json::Value) {
		let (status, headers, body) = self.request(request).await;
		assert!(
			headers
				.get("content-type")
				.and_then(|value| value.to_str().ok())
				.map_or(false, |value| value.starts_with("application/json")),
			"expected a JSON response, got headers {headers:?}",
		);
		let body = serde_json::from_slice(&body).unwrap();
		(status, headers, body)
	}

	async fn song_count(&self) -> i64 {
		sqlx::query_scalar("SELECT count(*) FROM songs")
			.fetch_one(&*self.database)
			.await
			.unwrap()
	}
}

fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri(uri)
		.header("Accept", "application/json")
		.header("Content-Type", "application/json")
		.body(Body::from(body.to_string()))
		.unwrap()
}

fn bare_request(method: &str, uri: &str) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri(uri)
		.header("Accept", "application/json")
		.body(Body::empty())
		.unwrap()
}

const BOUNDARY: &str = "---------------------------songboxtestboundary";

fn multipart_request(uri: &str, field: &str, filename: &str, contents: &[u8]) -> Request<Body> {
	let mut body = Vec::new();
	body.extend_from_slice(
		format!(
			"--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
		)
		.as_bytes(),
	);
	body.extend_from_slice(contents);
	body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
	Request::builder()
		.method("POST")
		.uri(uri)
		.header("Accept", "application/json")
		.header(
			"Content-Type",
			format!("multipart/form-data; boundary={BOUNDARY}"),
		)
		.body(Body::from(body))
		.unwrap()
}

#[tokio::test]
async fn get_empty_songs() {
	let test = spawn().await;

	let (status, _, body) = test.request_json(bare_request("GET", "/api/songs")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn get_songs_in_id_order() {
	let test = spawn().await;

	let file_a = File::create(&test.database, "Abbey_Road.mp3").await.unwrap();
	let file_b = File::create(&test.database, "Yellow_Submarine.mp3")
		.await
		.unwrap();
	let song_a = Song::create(&test.database, file_a.id).await.unwrap();
	let song_b = Song::create(&test.database, file_b.id).await.unwrap();

	let (status, _, body) = test.request_json(bare_request("GET", "/api/songs")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body,
		serde_json::json!([
			{ "id": song_a.id, "file": { "id": file_a.id, "name": "Abbey_Road.mp3" } },
			{ "id": song_b.id, "file": { "id": file_b.id, "name": "Yellow_Submarine.mp3" } },
		]),
	);
}

#[tokio::test]
async fn post_song() {
	let test = spawn().await;

	let file = File::create(&test.database, "FileA").await.unwrap();

	let body = serde_json::json!({ "file": { "id": file.id } });
	let (status, headers, body) = test
		.request_json(json_request("POST", "/api/songs", &body))
		.await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(
		headers.get("location").and_then(|value| value.to_str().ok()),
		Some("/api/songs"),
	);
	assert_eq!(body["file"]["id"], serde_json::json!(file.id));
	assert_eq!(body["file"]["name"], serde_json::json!("FileA"));

	assert_eq!(test.song_count().await, 1);
	let song = Song::by_id(&test.database, body["id"].as_i64().unwrap())
		.await
		.unwrap()
		.unwrap();
	assert_eq!(song.song_file_id, file.id);
}

#[tokio::test]
async fn post_song_invalid_body() {
	let test = spawn().await;

	for body in [
		serde_json::json!({}),
		serde_json::json!({ "file": {} }),
		serde_json::json!({ "file": { "id": "one" } }),
		serde_json::json!([1, 2, 3]),
	] {
		let (status, _, body) = test
			.request_json(json_request("POST", "/api/songs", &body))
			.await;
		assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
		assert!(body["message"].as_str().is_some_and(|s| !s.is_empty()));
	}

	assert_eq!(test.song_count().await, 0);
}

#[tokio::test]
async fn put_song() {
	let test = spawn().await;

	let file_a = File::create(&test.database, "FileA").await.unwrap();
	let file_b = File::create(&test.database, "FileB").await.unwrap();
	let song = Song::create(&test.database, file_a.id).await.unwrap();

	let body = serde_json::json!({ "file": { "id": file_b.id } });
	let (status, _, body) = test
		.request_json(json_request("PUT", &format!("/api/songs/{}", song.id), &body))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["id"], serde_json::json!(song.id));
	assert_eq!(body["file"]["id"], serde_json::json!(file_b.id));
	assert_eq!(body["file"]["name"], serde_json::json!("FileB"));

	let song = Song::by_id(&test.database, song.id).await.unwrap().unwrap();
	assert_eq!(song.song_file_id, file_b.id);
}

#[tokio::test]
async fn put_missing_song() {
	let test = spawn().await;

	let body = serde_json::json!({ "file": { "id": 1 } });
	let (status, _, body) = test
		.request_json(json_request("PUT", "/api/songs/7", &body))
		.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["message"], "Could not find song with id 7");
}

#[tokio::test]
async fn delete_song() {
	let test = spawn().await;

	let file = File::create(&test.database, "FileA").await.unwrap();
	let song = Song::create(&test.database, file.id).await.unwrap();

	let (status, _, body) = test
		.request_json(bare_request("DELETE", &format!("/api/songs/{}", song.id)))
		.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(
		body["message"],
		format!("Successfully deleted song with id {}", song.id),
	);
	assert_eq!(test.song_count().await, 0);
}

#[tokio::test]
async fn delete_missing_song() {
	let test = spawn().await;

	let (status, _, body) = test.request_json(bare_request("DELETE", "/api/songs/1")).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["message"], "Could not find song with id 1");
}

#[tokio::test]
async fn get_uploaded_file() {
	let test = spawn().await;

	std::fs::write(test.upload_dir.join("test.txt"), b"File contents").unwrap();

	let (status, headers, body) = test.request(bare_request("GET", "/uploads/test.txt")).await;
	assert_eq!(status, StatusCode::OK);
	assert!(headers
		.get("content-type")
		.and_then(|value| value.to_str().ok())
		.is_some_and(|value| value.starts_with("text/plain")));
	assert_eq!(body, b"File contents");
}

#[tokio::test]
async fn get_missing_uploaded_file() {
	let test = spawn().await;

	let (status, _, _) = test.request(bare_request("GET", "/uploads/missing.txt")).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_uploaded_file_rejects_unsafe_names() {
	let test = spawn().await;

	let (status, _, _) = test.request(bare_request("GET", "/uploads/.hidden")).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_file() {
	let test = spawn().await;

	let request = multipart_request("/api/files", "file", "test.txt", b"File contents");
	let (status, _, body) = test.request_json(request).await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["name"], "test.txt");
	assert_eq!(body["path"], "/uploads/test.txt");

	let on_disk = std::fs::read(test.upload_dir.join("test.txt")).unwrap();
	assert_eq!(on_disk, b"File contents");

	// And it round-trips through the uploads route.
	let (status, _, served) = test.request(bare_request("GET", "/uploads/test.txt")).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(served, b"File contents");
}

#[tokio::test]
async fn upload_sanitizes_filename() {
	let test = spawn().await;

	let request = multipart_request("/api/files", "file", "../../etc/passwd", b"x");
	let (status, _, body) = test.request_json(request).await;
	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["name"], "etc_passwd");
	assert_eq!(body["path"], "/uploads/etc_passwd");
	assert!(test.upload_dir.join("etc_passwd").is_file());
}

#[tokio::test]
async fn upload_without_file_part() {
	let test = spawn().await;

	let request = multipart_request("/api/files", "other", "test.txt", b"File contents");
	let (status, _, body) = test.request_json(request).await;
	assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
	assert_eq!(body["message"], "Could not find file data");
}

#[tokio::test]
async fn wrong_accept_header() {
	let test = spawn().await;

	let request = Request::builder()
		.method("GET")
		.uri("/api/songs")
		.header("Accept", "text/html")
		.body(Body::empty())
		.unwrap();
	let (status, _, _) = test.request(request).await;
	assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
}

#[tokio::test]
async fn wrong_content_type() {
	let test = spawn().await;

	let request = Request::builder()
		.method("POST")
		.uri("/api/songs")
		.header("Accept", "application/json")
		.header("Content-Type", "text/plain")
		.body(Body::from("{\"file\":{\"id\":1}}"))
		.unwrap();
	let (status, _, _) = test.request(request).await;
	assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}
