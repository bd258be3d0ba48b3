mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use uuid::Uuid;

use cineplex::auth::AuthService;
use cineplex::error::ApiError;
use cineplex::models::{CreateRating, CreateUser};
use cineplex::services::{
    HistoryService, RatingService, RecommendationService, UserService, WatchlistService,
};

async fn register_user(db: &PgPool, name: &str) -> Uuid {
    let suffix = common::unique_suffix();
    let token = AuthService::new(db.clone(), "test_secret")
        .register(CreateUser {
            username: format!("{name}_{suffix}"),
            full_name: format!("{name} Example"),
            email: format!("{name}_{suffix}@example.com"),
            password: "pw123".to_string(),
            age: None,
            gender: None,
            location: None,
            marital_status: None,
            favorite_countries: None,
        })
        .await
        .expect("failed to register test user");

    token.user.id
}

/// Re-rating replaces the value, keeps one row, and bumps updated_at.
#[tokio::test]
async fn test_rating_upsert_replaces_value() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "rater").await;
    let movie_id = common::seed_movie(&db, "Upsert Test Movie", vec![18]).await;
    let service = RatingService::new(db.clone());

    let first = service
        .rate(
            user_id,
            CreateRating {
                movie_id,
                rating: 5,
            },
        )
        .await
        .unwrap();
    assert_eq!(first.rating, 5);

    let second = service
        .rate(
            user_id,
            CreateRating {
                movie_id,
                rating: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(second.rating, 3);
    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > second.created_at);

    // Still exactly one rating for the pair.
    let ratings = service.list(user_id).await.unwrap();
    let for_movie: Vec<_> = ratings.iter().filter(|r| r.movie_id == movie_id).collect();
    assert_eq!(for_movie.len(), 1);
    assert_eq!(for_movie[0].rating, 3);
}

#[tokio::test]
async fn test_out_of_range_rating_is_rejected() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "bounds").await;
    let movie_id = common::seed_movie(&db, "Bounds Test Movie", vec![18]).await;
    let service = RatingService::new(db.clone());

    let err = service
        .rate(
            user_id,
            CreateRating {
                movie_id,
                rating: 11,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Validation(_));

    // Validation failed before persistence: nothing stored.
    assert!(service.list(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rating_unknown_movie_is_not_found() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "ghost").await;

    let err = RatingService::new(db.clone())
        .rate(
            user_id,
            CreateRating {
                movie_id: -1,
                rating: 5,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::NotFound(_));
}

/// Toggle adds when absent, removes when present, and never stores a
/// second entry for the same (user, movie).
#[tokio::test]
async fn test_watchlist_toggle() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "lister").await;
    let movie_id = common::seed_movie(&db, "Watchlist Test Movie", vec![35]).await;
    let service = WatchlistService::new(db.clone());

    let added = service.toggle(user_id, movie_id).await.unwrap();
    assert!(added.in_watchlist);

    let listed = service.list(user_id).await.unwrap();
    let entries: Vec<_> = listed
        .watchlist
        .iter()
        .filter(|entry| entry.movie_id == movie_id)
        .collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "Watchlist Test Movie");

    let removed = service.toggle(user_id, movie_id).await.unwrap();
    assert!(!removed.in_watchlist);

    let listed = service.list(user_id).await.unwrap();
    assert!(listed
        .watchlist
        .iter()
        .all(|entry| entry.movie_id != movie_id));
}

/// History is an append-only log; deletion removes every row for the movie.
#[tokio::test]
async fn test_watch_history_lifecycle() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "historian").await;
    let movie_id = common::seed_movie(&db, "History Test Movie", vec![28]).await;
    let service = HistoryService::new(db.clone());

    service.record(user_id, movie_id).await.unwrap();
    service.record(user_id, movie_id).await.unwrap();

    let listed = service.list(user_id, 50).await.unwrap();
    let entries: Vec<_> = listed
        .history
        .iter()
        .filter(|entry| entry.movie_id == movie_id)
        .collect();
    assert_eq!(entries.len(), 2);

    service.remove(user_id, movie_id).await.unwrap();
    let listed = service.list(user_id, 50).await.unwrap();
    assert!(listed.history.iter().all(|entry| entry.movie_id != movie_id));

    let err = service.remove(user_id, movie_id).await.unwrap_err();
    assert_matches!(err, ApiError::NotFound(_));
}

/// Setting preferences replaces the stored set wholesale.
#[tokio::test]
async fn test_genre_preferences_replace() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "curator").await;
    let service = UserService::new(db.clone());

    let prefs = service
        .set_genre_preferences(user_id, vec![28, 35])
        .await
        .unwrap();
    let mut ids: Vec<i32> = prefs.genres.iter().map(|g| g.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![28, 35]);

    let prefs = service.set_genre_preferences(user_id, vec![18]).await.unwrap();
    let ids: Vec<i32> = prefs.genres.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![18]);
    assert_eq!(prefs.genres[0].name, "Drama");
}

/// Personalized recommendations follow preferred genres and exclude
/// already-watched movies.
#[tokio::test]
async fn test_personalized_recommendations_exclude_watched() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "viewer").await;
    let drama_id = common::seed_movie(&db, "Recommended Drama", vec![18]).await;

    UserService::new(db.clone())
        .set_genre_preferences(user_id, vec![18])
        .await
        .unwrap();

    let service = RecommendationService::new(db.clone());
    let recommended = service.personalized(user_id, 1000).await.unwrap();
    assert!(recommended.iter().any(|movie| movie.id == drama_id));

    HistoryService::new(db.clone())
        .record(user_id, drama_id)
        .await
        .unwrap();

    let recommended = service.personalized(user_id, 1000).await.unwrap();
    assert!(recommended.iter().all(|movie| movie.id != drama_id));
}

/// Partial profile updates leave absent fields untouched.
#[tokio::test]
async fn test_partial_profile_update() {
    let Some(db) = common::test_db().await else {
        return;
    };
    let user_id = register_user(&db, "editor").await;
    let service = UserService::new(db.clone());

    let updated = service
        .update_profile(
            user_id,
            cineplex::models::UpdateUser {
                location: Some("Paris".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.location.as_deref(), Some("Paris"));

    let updated = service
        .update_profile(
            user_id,
            cineplex::models::UpdateUser {
                age: Some(30),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // The earlier location survives an update that does not mention it.
    assert_eq!(updated.age, Some(30));
    assert_eq!(updated.location.as_deref(), Some("Paris"));
}
