// Authentication: credential verification, token issuance, token-to-identity
// resolution.

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;

pub use errors::AuthError;
pub use jwt::{extract_bearer_token, JwtService};
pub use middleware::jwt_auth_middleware;
pub use models::{AuthUser, Claims, LoginRequest, Token};
pub use service::AuthService;
