use super::FileId;
use crate::database::Database;

pub type Id = super::Id;

#[derive(Clone, Copy, Debug, sqlx::FromRow)]
pub struct Song {
	pub id: Id,
	/// References `files.id`; enforced by the database, not pre-checked by the API.
	pub song_file_id: FileId,
}

impl Song {
	pub async fn create(database: &Database, file_id: FileId) -> sqlx::Result<Self> {
		sqlx::query_as::<_, Self>(
			"INSERT INTO songs (song_file_id) VALUES (?) RETURNING id, song_file_id",
		)
		.bind(file_id)
		.fetch_one(database)
		.await
	}

	pub async fn by_id(database: &Database, id: Id) -> sqlx::Result<Option<Self>> {
		sqlx::query_as::<_, Self>("SELECT id, song_file_id FROM songs WHERE id = ?")
			.bind(id)
			.fetch_optional(database)
			.await
	}

	/// Repoints the song at a different file. `None` if no such song.
	pub async fn set_file(
		database: &Database,
		id: Id,
		file_id: FileId,
	) -> sqlx::Result<Option<Self>> {
		sqlx::query_as::<_, Self>(
			"UPDATE songs SET song_file_id = ? WHERE id = ? RETURNING id, song_file_id",
		)
		.bind(file_id)
		.bind(id)
		.fetch_optional(database)
		.await
	}

	/// `false` if no such song.
	pub async fn delete(database: &Database, id: Id) -> sqlx::Result<bool> {
		let result = sqlx::query("DELETE FROM songs WHERE id = ?")
			.bind(id)
			.execute(database)
			.await?;
		Ok(result.rows_affected() > 0)
	}
}
