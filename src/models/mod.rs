// Entities and the request/response contract

pub mod genre;
pub mod history;
pub mod movie;
pub mod rating;
pub mod user;
pub mod watchlist;

pub use genre::*;
pub use history::*;
pub use movie::*;
pub use rating::*;
pub use user::*;
pub use watchlist::*;
