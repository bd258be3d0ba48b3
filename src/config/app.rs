use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Process-wide configuration, read from the environment once at startup
/// and treated as read-only afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Allowed cross-origin request sources. A single "*" entry allows any
    /// origin; credentials are then disabled.
    pub cors_origins: Vec<String>,
    /// Directory served under /uploads; avatars land in a subdirectory.
    pub upload_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse()
            .unwrap_or(8000);
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());
        let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5500,http://127.0.0.1:5500".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();
        let upload_dir =
            PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()));

        Ok(AppConfig {
            host,
            port,
            jwt_secret,
            cors_origins,
            upload_dir,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn avatar_dir(&self) -> PathBuf {
        self.upload_dir.join("avatars")
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            jwt_secret: "secret".to_string(),
            cors_origins: vec!["http://localhost:5500".to_string()],
            upload_dir: PathBuf::from("uploads"),
        };

        assert_eq!(config.server_address(), "0.0.0.0:8000");
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn test_wildcard_origin() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            jwt_secret: "secret".to_string(),
            cors_origins: vec!["*".to_string()],
            upload_dir: PathBuf::from("uploads"),
        };

        assert!(config.allows_any_origin());
    }
}
