use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub marital_status: Option<String>,
    pub favorite_countries: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload. Checked before anything touches the database.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub marital_status: Option<String>,
    pub favorite_countries: Option<String>,
}

/// Partial profile update: absent fields leave stored values untouched.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUser {
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,
    pub full_name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub marital_status: Option<String>,
    pub favorite_countries: Option<String>,
    pub avatar_url: Option<String>,
}

/// Public user shape. Deliberately has no password field at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub marital_status: Option<String>,
    pub favorite_countries: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_url: user.avatar_url,
            full_name: user.full_name,
            age: user.age,
            gender: user.gender,
            location: user.location,
            marital_status: user.marital_status,
            favorite_countries: user.favorite_countries,
        }
    }
}

/// Demographic subset used by the profile page and the recommender.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Demographics {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub marital_status: Option<String>,
    pub favorite_countries: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateDemographics {
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub location: Option<String>,
    pub marital_status: Option<String>,
    pub favorite_countries: Option<String>,
}
