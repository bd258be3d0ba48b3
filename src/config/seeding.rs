use anyhow::Result;
use sqlx::PgPool;

/// The TMDB movie genre list. Genres are static reference data; the catalog
/// ingestion pipeline only ever attaches these ids to movies.
const GENRES: &[(i32, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (99, "Documentary"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (10402, "Music"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (10770, "TV Movie"),
    (53, "Thriller"),
    (10752, "War"),
    (37, "Western"),
];

pub struct DatabaseSeeder {
    pool: PgPool,
}

impl DatabaseSeeder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn seed_all(&self) -> Result<()> {
        self.seed_genres().await?;
        Ok(())
    }

    /// Idempotent: re-running leaves existing rows untouched.
    async fn seed_genres(&self) -> Result<()> {
        for &(id, name) in GENRES {
            sqlx::query(
                "INSERT INTO genres (id, name) VALUES ($1, $2)
                 ON CONFLICT (id) DO NOTHING",
            )
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        }

        tracing::info!("Seeded {} reference genres", GENRES.len());
        Ok(())
    }
}
