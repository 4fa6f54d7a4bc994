use axum::Router;

use crate::routes::sub;

mod files;
mod songs;

pub fn configure() -> Router {
	let mut app = Router::new();

	crate::routes::sub!(app; files, songs);

	app
}
