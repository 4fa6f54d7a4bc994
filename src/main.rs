#![forbid(unsafe_code)]

use std::sync::Arc;

use axum::Extension;
use songbox::{config, database, routes, server, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
	let config = config::config()?;

	if !config.upload_dir.exists() {
		std::fs::create_dir_all(&config.upload_dir).map_err(Error::CreateUploadDir)?;
	}

	let config = Arc::new(config);

	init_logging(config.log_level);

	let database = database::connect(&config.database_url)
		.await
		.map(Arc::new)?;

	let mut app = routes::configure();
	app = app.layer(Extension(database));
	app = app.layer(Extension(Arc::clone(&config)));
	app = app.layer(tower_http::trace::TraceLayer::new_for_http());

	tracing::info!(address = %config.address, "listening");
	server::run(app, &config.address).await
}

fn init_logging(log_level: config::LogLevel) {
	use tracing_subscriber::filter::FilterFn;
	use tracing_subscriber::layer::{Layer, SubscriberExt};
	use tracing_subscriber::util::SubscriberInitExt;

	let filter = FilterFn::new(move |metadata| {
		let required_level = match metadata.module_path() {
			Some(path) if path.starts_with(env!("CARGO_PKG_NAME")) => log_level.internal,
			_ => log_level.external,
		};
		// "If a Level is considered less than a LevelFilter, it should be considered enabled; if greater than or equal to the LevelFilter, that level is disabled."
		metadata.level() < &required_level
	});

	let layer = tracing_subscriber::fmt::layer()
		.with_file(true)
		.with_line_number(true)
		.with_writer(std::io::stderr);

	tracing_subscriber::registry()
		.with(layer.with_filter(filter))
		.init();
}
