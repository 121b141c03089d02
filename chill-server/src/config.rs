//! Server configuration

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP listen port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT signing secret
    pub jwt_secret: String,
    /// Frontend origin allowed by CORS
    pub cors_origin: String,
    /// PgPool size
    pub db_max_connections: u32,
    /// Default tracing filter when RUST_LOG is unset
    pub log_filter: String,
    /// Emit JSON log lines instead of the pretty format
    pub log_json: bool,
    /// Behind a reverse proxy that sets `X-Forwarded-For`
    pub trust_proxy: bool,
}

impl Config {
    /// Load configuration from environment variables (after `.env`)
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .filter(|s| !s.is_empty())
                .ok_or("DATABASE_URL must be set")?,
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: require_secret(&lookup, "JWT_SECRET", &environment)?,
            cors_origin: lookup("CORS_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".into()),
            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(10),
            log_filter: lookup("RUST_LOG")
                .unwrap_or_else(|| "chill_server=info,tower_http=info".into()),
            log_json: lookup("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            trust_proxy: lookup("TRUST_PROXY").is_some_and(|v| parse_flag(&v)),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Require a secret env var: must be set and non-empty in non-development environments.
fn require_secret<F>(lookup: &F, name: &str, environment: &str) -> Result<String, BoxError>
where
    F: Fn(&str) -> Option<String>,
{
    let val = match lookup(name) {
        Some(v) => v,
        None => {
            if environment != "development" {
                return Err(format!("{name} must be set in {environment} environment").into());
            }
            format!("dev-{name}-not-for-production")
        }
    };
    if val.is_empty() && environment != "development" {
        return Err(format!("{name} must not be empty in {environment} environment").into());
    }
    Ok(val)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/chill")]))
                .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.cors_origin, "http://localhost:3000");
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.log_filter, "chill_server=info,tower_http=info");
        assert!(!config.log_json);
        assert!(!config.trust_proxy);
        assert!(config.is_development());
        assert_eq!(config.jwt_secret, "dev-JWT_SECRET-not-for-production");
    }

    #[test]
    fn test_trust_proxy_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" Yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("maybe"));
    }

    #[test]
    fn test_database_url_required() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("DATABASE_URL", "")])).is_err());
    }

    #[test]
    fn test_jwt_secret_required_outside_development() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/chill"),
            ("ENVIRONMENT", "production"),
        ]));
        assert!(result.is_err());

        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/chill"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", ""),
        ]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/chill"),
            ("ENVIRONMENT", "production"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .unwrap();
        assert_eq!(config.jwt_secret, "s3cret");
        assert!(!config.is_development());
    }

    #[test]
    fn test_overrides_and_bad_numbers() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/chill"),
            ("HTTP_PORT", "9090"),
            ("DB_MAX_CONNECTIONS", "zero"),
            ("LOG_FORMAT", "JSON"),
            ("CORS_ORIGIN", "https://chill.example"),
            ("TRUST_PROXY", "true"),
        ]))
        .unwrap();
        assert!(config.trust_proxy);
        assert_eq!(config.http_port, 9090);
        assert_eq!(config.db_max_connections, 10);
        assert!(config.log_json);
        assert_eq!(config.cors_origin, "https://chill.example");
    }
}
