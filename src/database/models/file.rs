use crate::database::Database;

pub type Id = super::Id;

/// An uploaded file. The contents live in the upload directory under
/// `filename`; only the name is recorded here.
#[derive(Debug, sqlx::FromRow)]
pub struct File {
	pub id: Id,
	pub filename: String,
}

impl File {
	pub async fn create(database: &Database, filename: &str) -> sqlx::Result<Self> {
		sqlx::query_as::<_, Self>("INSERT INTO files (filename) VALUES (?) RETURNING id, filename")
			.bind(filename)
			.fetch_one(database)
			.await
	}

	pub async fn by_id(database: &Database, id: Id) -> sqlx::Result<Option<Self>> {
		sqlx::query_as::<_, Self>("SELECT id, filename FROM files WHERE id = ?")
			.bind(id)
			.fetch_optional(database)
			.await
	}
}
