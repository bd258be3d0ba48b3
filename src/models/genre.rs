use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GenreResponse {
    pub id: i32,
    pub name: String,
}

impl From<Genre> for GenreResponse {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id,
            name: genre.name,
        }
    }
}

/// Replaces the caller's preferred-genre set wholesale.
#[derive(Debug, Deserialize)]
pub struct CreateGenrePreferences {
    pub genre_ids: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct GenrePreferenceResponse {
    pub genres: Vec<GenreResponse>,
}
