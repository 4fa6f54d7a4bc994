use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Result;

pub mod models;

pub type Database = SqlitePool;

pub async fn connect(conn_str: &str) -> Result<Database> {
	let options = SqliteConnectOptions::from_str(conn_str)?
		.create_if_missing(true)
		.foreign_keys(true);
	let conn = SqlitePoolOptions::new()
		.max_connections(5)
		.connect_with(options)
		.await?;
	sqlx::migrate!().run(&conn).await?;
	Ok(conn)
}
