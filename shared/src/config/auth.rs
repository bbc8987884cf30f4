//! Token signing and session lifecycle configuration

use serde::{Deserialize, Serialize};

/// Built-in HS256 secret for local development only
pub const DEFAULT_JWT_SECRET: &str = "scribe-development-secret-change-me";

/// JWT signing configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HS256 signing
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    pub issuer: String,

    pub audience: String,

    /// `HS256` or `RS256`
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// PEM private key, RS256 only
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// PEM public key, RS256 only
    #[serde(default)]
    pub public_key_path: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("scribe"),
            audience: String::from("scribe-api"),
            algorithm: default_algorithm(),
            private_key_path: None,
            public_key_path: None,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("algorithm", &self.algorithm)
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Switches to RS256 with the given PEM key files
    pub fn with_rs256_keys(
        mut self,
        private_key_path: impl Into<String>,
        public_key_path: impl Into<String>,
    ) -> Self {
        self.algorithm = String::from("RS256");
        self.private_key_path = Some(private_key_path.into());
        self.public_key_path = Some(public_key_path.into());
        self
    }

    /// Check if HS256 would sign with the built-in development secret
    /// or with no secret at all. The algorithm name is case-insensitive.
    pub fn is_using_default_secret(&self) -> bool {
        self.algorithm.trim().eq_ignore_ascii_case("HS256")
            && (self.secret == DEFAULT_JWT_SECRET || self.secret.trim().is_empty())
    }
}

/// What happens to the stored refresh token when a session is refreshed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// Refresh token stays valid until its own expiry or logout
    #[default]
    Reuse,
    /// Every refresh replaces the stored token; the old one stops working
    Rotate,
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub refresh_policy: RefreshPolicy,

    /// Run the periodic expired-session sweep
    #[serde(default = "default_cleanup_enabled")]
    pub cleanup_enabled: bool,

    /// Seconds between sweeps
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_policy: RefreshPolicy::default(),
            cleanup_enabled: default_cleanup_enabled(),
            cleanup_interval_seconds: default_cleanup_interval(),
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt: JwtConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

impl AuthConfig {
    /// Create from plain environment variables
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").unwrap_or(defaults.secret),
            access_token_expiry: env_parse("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
            refresh_token_expiry: env_parse("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or(defaults.audience),
            algorithm: std::env::var("JWT_ALGORITHM").unwrap_or(defaults.algorithm),
            private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH").ok(),
            public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH").ok(),
        };

        let session = SessionConfig {
            refresh_policy: std::env::var("SESSION_REFRESH_POLICY")
                .ok()
                .and_then(|value| match value.to_lowercase().as_str() {
                    "rotate" => Some(RefreshPolicy::Rotate),
                    "reuse" => Some(RefreshPolicy::Reuse),
                    _ => None,
                })
                .unwrap_or_default(),
            cleanup_enabled: env_parse("SESSION_CLEANUP_ENABLED", default_cleanup_enabled()),
            cleanup_interval_seconds: env_parse(
                "SESSION_CLEANUP_INTERVAL",
                default_cleanup_interval(),
            ),
        };

        Self { jwt, session }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str, fallback: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(fallback)
}

fn default_algorithm() -> String {
    String::from("HS256")
}

fn default_cleanup_enabled() -> bool {
    true
}

fn default_cleanup_interval() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_default() {
        let config = JwtConfig::default();
        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.algorithm, "HS256");
        assert!(config.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_builder() {
        let config = JwtConfig::new("workspace-secret")
            .with_access_expiry_minutes(30)
            .with_refresh_expiry_days(14);

        assert_eq!(config.access_token_expiry, 1800);
        assert_eq!(config.refresh_token_expiry, 1209600);
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_default_secret_detected_for_any_algorithm_case() {
        for algorithm in ["HS256", "hs256", "Hs256", " hs256 "] {
            let config = JwtConfig {
                algorithm: algorithm.to_string(),
                ..JwtConfig::default()
            };
            assert!(config.is_using_default_secret(), "{:?} not detected", algorithm);
        }

        let blank = JwtConfig::new("   ");
        assert!(blank.is_using_default_secret());
    }

    #[test]
    fn test_jwt_config_debug_hides_secret() {
        let config = JwtConfig::new("do-not-print-me");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("do-not-print-me"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_rs256_builder() {
        let config = JwtConfig::default().with_rs256_keys("keys/private.pem", "keys/public.pem");
        assert_eq!(config.algorithm, "RS256");
        assert_eq!(config.private_key_path.as_deref(), Some("keys/private.pem"));
        assert!(!config.is_using_default_secret());
    }

    #[test]
    fn test_session_config_default() {
        let config = SessionConfig::default();
        assert_eq!(config.refresh_policy, RefreshPolicy::Reuse);
        assert!(config.cleanup_enabled);
        assert_eq!(config.cleanup_interval_seconds, 3600);
    }

    #[test]
    fn test_refresh_policy_deserialize() {
        let policy: RefreshPolicy = serde_json::from_str("\"rotate\"").unwrap();
        assert_eq!(policy, RefreshPolicy::Rotate);
    }
}
