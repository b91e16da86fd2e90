// Application configuration loaded from environment variables.
// Decision: DATABASE_URL is optional; without it the API runs on the in-memory store
// Decision: File uploads are disabled unless the S3 bucket is fully configured

use petgallery_storage::S3Config;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Maximum accepted request body for file uploads
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string
    pub database_url: Option<String>,
    pub bind_address: String,
    /// CORS origins; empty means no CORS layer
    pub allowed_origins: Vec<String>,
    /// Object storage for uploads
    pub s3: Option<S3Config>,
    /// Actor recorded on audit events when a request has no X-Actor-Id header
    pub default_actor_id: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            allowed_origins: Vec::new(),
            s3: None,
            default_actor_id: 0,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_address =
            non_empty("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let allowed_origins = parse_origins(lookup("ALLOWED_ORIGINS").as_deref());

        let default_actor_id = match non_empty("DEFAULT_ACTOR_ID") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "DEFAULT_ACTOR_ID is not an integer, using 0");
                0
            }),
            None => 0,
        };

        let s3 = match (
            non_empty("AWS_ACCESS_KEY_ID"),
            non_empty("AWS_SECRET_ACCESS_KEY"),
            non_empty("AWS_S3_BUCKET_NAME"),
            non_empty("AWS_S3_BUCKET_REGION"),
        ) {
            (Some(access_key_id), Some(secret_access_key), Some(bucket_name), Some(region)) => {
                Some(S3Config {
                    access_key_id,
                    secret_access_key,
                    bucket_name,
                    region,
                })
            }
            (_, _, None, _) => None,
            _ => {
                tracing::warn!(
                    "AWS_S3_BUCKET_NAME is set but credentials or region are missing; uploads disabled"
                );
                None
            }
        };

        Self {
            database_url: non_empty("DATABASE_URL"),
            bind_address,
            allowed_origins,
            s3,
            default_actor_id,
        }
    }
}

/// Split a comma-separated origin list, trimming whitespace around entries
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(Some("http://localhost:3000 ,  https://pets.example.com")),
            vec!["http://localhost:3000", "https://pets.example.com"]
        );
        assert!(parse_origins(Some("   ")).is_empty());
        assert!(parse_origins(None).is_empty());
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.database_url, None);
        assert!(config.allowed_origins.is_empty());
        assert!(config.s3.is_none());
        assert_eq!(config.default_actor_id, 0);
    }

    #[test]
    fn test_s3_requires_all_settings() {
        let partial = config(&[("AWS_S3_BUCKET_NAME", "pets")]);
        assert!(partial.s3.is_none());

        let full = config(&[
            ("AWS_ACCESS_KEY_ID", "key"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("AWS_S3_BUCKET_NAME", "pets"),
            ("AWS_S3_BUCKET_REGION", "us-east-2"),
        ]);
        let s3 = full.s3.unwrap();
        assert_eq!(s3.bucket_name, "pets");
        assert_eq!(s3.region, "us-east-2");
    }

    #[test]
    fn test_actor_and_database() {
        let config = config(&[
            ("DEFAULT_ACTOR_ID", "17"),
            ("DATABASE_URL", "postgres://localhost/pets"),
            ("BIND_ADDRESS", "127.0.0.1:9000"),
        ]);
        assert_eq!(config.default_actor_id, 17);
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/pets")
        );
        assert_eq!(config.bind_address, "127.0.0.1:9000");
    }

    #[test]
    fn test_malformed_actor_falls_back_to_zero() {
        assert_eq!(config(&[("DEFAULT_ACTOR_ID", "admin")]).default_actor_id, 0);
    }
}
