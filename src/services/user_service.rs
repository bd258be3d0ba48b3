use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    Demographics, GenrePreferenceResponse, GenreResponse, UpdateDemographics, UpdateUser, User,
    UserResponse,
};

#[derive(Debug, Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> ApiResult<UserResponse> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }

    /// Partial profile update: absent fields keep their stored values.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        update: UpdateUser,
    ) -> ApiResult<UserResponse> {
        update.validate()?;

        let password_hash = match update.password.as_deref() {
            Some(password) => Some(hash_password(password).map_err(anyhow::Error::from)?),
            None => None,
        };

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET \
                username = COALESCE($2, username), \
                full_name = COALESCE($3, full_name), \
                email = COALESCE($4, email), \
                password_hash = COALESCE($5, password_hash), \
                age = COALESCE($6, age), \
                gender = COALESCE($7, gender), \
                location = COALESCE($8, location), \
                marital_status = COALESCE($9, marital_status), \
                favorite_countries = COALESCE($10, favorite_countries), \
                avatar_url = COALESCE($11, avatar_url), \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING *",
        )
        .bind(user_id)
        .bind(&update.username)
        .bind(&update.full_name)
        .bind(&update.email)
        .bind(&password_hash)
        .bind(update.age)
        .bind(&update.gender)
        .bind(&update.location)
        .bind(&update.marital_status)
        .bind(&update.favorite_countries)
        .bind(&update.avatar_url)
        .fetch_optional(&self.db)
        .await
        .map_err(map_profile_conflict)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn update_demographics(
        &self,
        user_id: Uuid,
        update: UpdateDemographics,
    ) -> ApiResult<UserResponse> {
        self.update_profile(
            user_id,
            UpdateUser {
                age: update.age,
                gender: update.gender,
                location: update.location,
                marital_status: update.marital_status,
                favorite_countries: update.favorite_countries,
                ..UpdateUser::default()
            },
        )
        .await
    }

    pub async fn get_demographics(&self, user_id: Uuid) -> ApiResult<Demographics> {
        let demographics = sqlx::query_as::<_, Demographics>(
            "SELECT age, gender, location, marital_status, favorite_countries \
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(demographics)
    }

    pub async fn set_avatar(&self, user_id: Uuid, avatar_url: &str) -> ApiResult<UserResponse> {
        self.update_profile(
            user_id,
            UpdateUser {
                avatar_url: Some(avatar_url.to_string()),
                ..UpdateUser::default()
            },
        )
        .await
    }

    /// Replace the user's preferred-genre set.
    pub async fn set_genre_preferences(
        &self,
        user_id: Uuid,
        genre_ids: Vec<i32>,
    ) -> ApiResult<GenrePreferenceResponse> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM user_genre_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for genre_id in &genre_ids {
            sqlx::query(
                "INSERT INTO user_genre_preferences (user_id, genre_id) VALUES ($1, $2) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_genre_preferences(user_id).await
    }

    pub async fn get_genre_preferences(&self, user_id: Uuid) -> ApiResult<GenrePreferenceResponse> {
        let genres = sqlx::query_as::<_, GenreResponse>(
            "SELECT g.id, g.name FROM genres g \
             JOIN user_genre_preferences p ON p.genre_id = g.id \
             WHERE p.user_id = $1 ORDER BY g.name",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(GenrePreferenceResponse { genres })
    }
}

fn map_profile_conflict(err: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("users_username_key") => {
                return ApiError::Conflict("Username already registered".to_string())
            }
            Some("users_email_key") => {
                return ApiError::Conflict("Email already registered".to_string())
            }
            _ => {}
        }
    }
    ApiError::from(err)
}
