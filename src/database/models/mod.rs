pub mod file;
pub mod song;

pub use file::{File, Id as FileId};
pub use song::{Id as SongId, Song};

type Id = i64;
