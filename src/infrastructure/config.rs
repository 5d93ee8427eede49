use anyhow::{Context, Result, bail};
use std::env;

const DEFAULT_TOKEN_TTL_SECS: u64 = 3600;
const MAX_TOKEN_TTL_SECS: u64 = 30 * 24 * 3600;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    /// Empty means any origin is allowed.
    pub cors_allowed_origins: Vec<String>,
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenv::dotenv().ok();

        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
            jwt_secret,
            token_ttl_secs: match env::var("TOKEN_TTL_SECS") {
                Ok(raw) => parse_token_ttl(&raw)?,
                Err(_) => DEFAULT_TOKEN_TTL_SECS,
            },
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
            ),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_token_ttl(raw: &str) -> Result<u64> {
    let ttl: u64 = raw
        .trim()
        .parse()
        .context("TOKEN_TTL_SECS must be a positive integer")?;
    if ttl == 0 || ttl > MAX_TOKEN_TTL_SECS {
        bail!(
            "TOKEN_TTL_SECS must be between 1 and {} seconds, got {}",
            MAX_TOKEN_TTL_SECS,
            ttl
        );
    }
    Ok(ttl)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && *s != "*")
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins_wildcard_is_permissive() {
        assert!(parse_origins("*").is_empty());
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_parse_origins_splits_and_trims() {
        let origins = parse_origins("http://localhost:3000, http://localhost:5173 ,");
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
    }

    #[test]
    fn test_parse_token_ttl_accepts_bounded_values() {
        assert_eq!(parse_token_ttl("3600").unwrap(), 3600);
        assert_eq!(parse_token_ttl(" 1 ").unwrap(), 1);
        assert_eq!(
            parse_token_ttl(&MAX_TOKEN_TTL_SECS.to_string()).unwrap(),
            MAX_TOKEN_TTL_SECS
        );
    }

    #[test]
    fn test_parse_token_ttl_rejects_zero_huge_and_garbage() {
        assert!(parse_token_ttl("0").is_err());
        assert!(parse_token_ttl(&(MAX_TOKEN_TTL_SECS + 1).to_string()).is_err());
        assert!(parse_token_ttl(&u64::MAX.to_string()).is_err());
        assert!(parse_token_ttl("-5").is_err());
        assert!(parse_token_ttl("soon").is_err());
    }

    #[test]
    fn test_bind_addr() {
        let config = AppConfig {
            server_host: "0.0.0.0".to_string(),
            server_port: 9000,
            jwt_secret: "secret".to_string(),
            token_ttl_secs: 60,
            cors_allowed_origins: Vec::new(),
            log_level: "info".to_string(),
        };
        assert_eq!(config.bind_addr(), "0.0.0.0:9000");
    }
}
