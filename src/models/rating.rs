use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Allowed rating bounds. Configuration constants pending a product
/// decision on the scale; the validator attributes below must match.
pub const RATING_MIN: i32 = 1;
pub const RATING_MAX: i32 = 10;

/// At most one rating per (user, movie); re-rating replaces the value and
/// bumps `updated_at`.
#[derive(Debug, Clone, FromRow)]
pub struct Rating {
    pub id: i32,
    pub user_id: Uuid,
    pub movie_id: i32,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRating {
    pub movie_id: i32,
    #[validate(range(min = 1, max = 10, message = "Rating must be between 1 and 10"))]
    pub rating: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct RatingResponse {
    pub id: i32,
    pub user_id: Uuid,
    pub movie_id: i32,
    pub title: String,
    pub poster_path: Option<String>,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_rating_bounds() {
        let ok = CreateRating {
            movie_id: 42,
            rating: RATING_MAX,
        };
        assert!(ok.validate().is_ok());

        let too_high = CreateRating {
            movie_id: 42,
            rating: RATING_MAX + 1,
        };
        assert!(too_high.validate().is_err());

        let too_low = CreateRating {
            movie_id: 42,
            rating: RATING_MIN - 1,
        };
        assert!(too_low.validate().is_err());
    }
}
