use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthError, JwtService, LoginRequest, Token};
use crate::models::{CreateUser, User, UserResponse};

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

const USER_COLUMNS: &str = "id, username, email, password_hash, full_name, age, gender, \
     location, marital_status, favorite_countries, avatar_url, created_at, updated_at";

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            db,
        }
    }

    /// Register a new user and issue a token.
    ///
    /// Validation runs before any query; duplicate username/email surface as
    /// conflict errors whether caught by the pre-check or by the unique
    /// constraint under a concurrent insert.
    pub async fn register(&self, request: CreateUser) -> Result<Token, AuthError> {
        request.validate()?;

        if self.get_user_by_username(&request.username).await?.is_some() {
            return Err(AuthError::UsernameAlreadyExists);
        }
        if self.get_user_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&request.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, username, email, password_hash, full_name, age, gender, \
             location, marital_status, favorite_countries) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&request.username)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(&request.full_name)
        .bind(request.age)
        .bind(&request.gender)
        .bind(&request.location)
        .bind(&request.marital_status)
        .bind(&request.favorite_countries)
        .fetch_one(&self.db)
        .await
        .map_err(map_unique_violation)?;

        self.issue_token(user)
    }

    /// Login with username or email plus password.
    pub async fn login(&self, request: LoginRequest) -> Result<Token, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1"
        ))
        .bind(&request.username)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?
        .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(user)
    }

    /// Resolve a bearer token to the stored user, the precondition for all
    /// protected operations.
    pub async fn validate_session(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.jwt_service.extract_user_id(token)?;

        self.get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(UserResponse::from(user))
    }

    fn issue_token(&self, user: User) -> Result<Token, AuthError> {
        let access_token = self
            .jwt_service
            .create_access_token(user.id, &user.email)?;

        Ok(Token {
            access_token,
            token_type: "bearer".to_string(),
            user: UserResponse::from(user),
        })
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AuthError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_optional(&self.db)
                .await
                .map_err(AuthError::Database)?;

        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(user)
    }
}

fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.constraint() {
            Some("users_username_key") => return AuthError::UsernameAlreadyExists,
            Some("users_email_key") => return AuthError::EmailAlreadyExists,
            _ => {}
        }
    }
    AuthError::Database(err)
}
