//! API configuration.

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// HMAC secret used to validate access tokens
    pub jwt_secret: String,
    /// SQLite database file
    pub db_path: PathBuf,
    /// Directory thumbnails are written to and served from
    pub assets_root: PathBuf,
    /// Base URL thumbnail links are built from
    pub public_base_url: Url,
    /// Directory video uploads are staged in
    pub temp_dir: PathBuf,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Environment (development/production)
    pub environment: String,
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(p) => p.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{}' is not a port number", p),
            })?,
            Err(_) => 8091,
        };

        let jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));
        let public_base_url = parse_base_url(&public_base_url)?;

        Ok(Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            jwt_secret,
            db_path: std::env::var("DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("tubely.db")),
            assets_root: std::env::var("ASSETS_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("assets")),
            public_base_url,
            temp_dir: std::env::var("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        })
    }

    /// Config for local runs and tests; paths are taken as given.
    pub fn local(jwt_secret: impl Into<String>, assets_root: PathBuf, temp_dir: PathBuf) -> Self {
        let port = 8091;
        Self {
            host: "127.0.0.1".to_string(),
            port,
            jwt_secret: jwt_secret.into(),
            db_path: PathBuf::from("tubely.db"),
            assets_root,
            public_base_url: Url::parse(&format!("http://localhost:{}", port))
                .expect("static URL is valid"),
            temp_dir,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
        }
    }

    /// Public URL of a file stored in the assets directory.
    pub fn asset_url(&self, file_name: &str) -> String {
        format!(
            "{}/assets/{}",
            self.public_base_url.as_str().trim_end_matches('/'),
            file_name
        )
    }

    /// Create the assets directory if it doesn't exist.
    pub async fn ensure_assets_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.assets_root).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: "PUBLIC_BASE_URL",
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::Invalid {
            name: "PUBLIC_BASE_URL",
            reason: format!("unsupported scheme '{}'", scheme),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_url() {
        let config = ApiConfig::local("secret", PathBuf::from("assets"), std::env::temp_dir());
        assert_eq!(
            config.asset_url("abc.png"),
            "http://localhost:8091/assets/abc.png"
        );
    }

    #[test]
    fn test_asset_url_trailing_slash() {
        let mut config = ApiConfig::local("secret", PathBuf::from("assets"), std::env::temp_dir());
        config.public_base_url = parse_base_url("https://cdn.example.com/").unwrap();
        assert_eq!(
            config.asset_url("abc.jpg"),
            "https://cdn.example.com/assets/abc.jpg"
        );
    }

    #[test]
    fn test_parse_base_url_rejects_other_schemes() {
        assert!(parse_base_url("ftp://example.com").is_err());
        assert!(parse_base_url("not a url").is_err());
    }
}
