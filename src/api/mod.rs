// API routes and handlers

pub mod auth;
pub mod health;
pub mod movies;
pub mod recommendations;
pub mod routes;
pub mod users;

pub use routes::{create_routes, AppState};
