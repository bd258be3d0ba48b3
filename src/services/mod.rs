// Business logic services

pub mod history_service;
pub mod movie_service;
pub mod rating_service;
pub mod recommendation_service;
pub mod user_service;
pub mod watchlist_service;

pub use history_service::HistoryService;
pub use movie_service::MovieService;
pub use rating_service::RatingService;
pub use recommendation_service::RecommendationService;
pub use user_service::UserService;
pub use watchlist_service::WatchlistService;
