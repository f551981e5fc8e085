//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GOLINKS_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `GOLINKS_BASE_URL` - Public URL of the server, used for the OAuth redirect URI
//! - `GOLINKS_DEFAULT_REDIRECT_LOCATION` - Where `GET /` redirects to
//! - Google OAuth client, either:
//!   - `GOOGLE_CREDENTIALS_FILE` - Path to the `client_credentials.json` downloaded
//!     from the Google Cloud console, or
//!   - `GOOGLE_CLIENT_ID` and `GOOGLE_CLIENT_SECRET`
//!
//! ## Optional
//! - `GOLINKS_HOST` - Bind address (default: 127.0.0.1)
//! - `GOLINKS_PORT` - Listen port (default: 8080)
//! - `GOLINKS_SESSION_SECRET` - Cookie signing secret (min 64 chars, high entropy).
//!   When unset a random secret is generated at startup and sessions do not
//!   survive a restart.
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tower_sessions::cookie::Key;

use golinks_core::Destination;

/// Cookie signing keys must be at least 512 bits.
const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URI: &str = "https://www.googleapis.com/userinfo/v2/me";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
    #[error("Invalid Google credentials file: {0}")]
    InvalidCredentials(String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct GolinksConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, without trailing slash
    pub base_url: String,
    /// Target of `GET /`
    pub default_redirect: Destination,
    /// Cookie signing secret
    pub session_secret: SecretString,
    /// `true` when `session_secret` was generated because none was configured
    pub session_secret_generated: bool,
    /// Google OAuth client configuration
    pub google: GoogleConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Google OAuth 2.0 client configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct GoogleConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Authorization endpoint
    pub auth_uri: String,
    /// Token endpoint
    pub token_uri: String,
    /// Profile endpoint
    pub userinfo_uri: String,
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("auth_uri", &self.auth_uri)
            .field("token_uri", &self.token_uri)
            .field("userinfo_uri", &self.userinfo_uri)
            .finish()
    }
}

/// `client_credentials.json` as downloaded from the Google Cloud console.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    web: Option<CredentialsSection>,
    installed: Option<CredentialsSection>,
}

#[derive(Debug, Deserialize)]
struct CredentialsSection {
    client_id: String,
    client_secret: String,
    auth_uri: Option<String>,
    token_uri: Option<String>,
}

impl GolinksConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("GOLINKS_DATABASE_URL")?;
        let host = get_env_or_default("GOLINKS_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GOLINKS_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("GOLINKS_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GOLINKS_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("GOLINKS_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("GOLINKS_BASE_URL".to_string(), e.to_string())
        })?;
        let default_redirect = Destination::parse(&get_required_env(
            "GOLINKS_DEFAULT_REDIRECT_LOCATION",
        )?)
        .map_err(|e| {
            ConfigError::InvalidEnvVar(
                "GOLINKS_DEFAULT_REDIRECT_LOCATION".to_string(),
                e.to_string(),
            )
        })?;

        let (session_secret, session_secret_generated) =
            match get_optional_env("GOLINKS_SESSION_SECRET") {
                Some(value) => {
                    let secret = SecretString::from(value);
                    validate_session_secret(&secret, "GOLINKS_SESSION_SECRET")?;
                    validate_secret_strength(secret.expose_secret(), "GOLINKS_SESSION_SECRET")?;
                    (secret, false)
                }
                None => (generate_session_secret(), true),
            };

        let google = GoogleConfig::from_env()?;

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            default_redirect,
            session_secret,
            session_secret_generated,
            google,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The OAuth redirect URI registered with Google.
    #[must_use]
    pub fn oauth_redirect_uri(&self) -> String {
        format!("{}/oauth/callback", self.base_url)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }

    /// Derive the cookie signing key from the session secret.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InsecureSecret` if the secret is shorter than 64 bytes.
    pub fn session_key(&self) -> Result<Key, ConfigError> {
        Key::try_from(self.session_secret.expose_secret().as_bytes()).map_err(|e| {
            ConfigError::InsecureSecret("GOLINKS_SESSION_SECRET".to_string(), e.to_string())
        })
    }
}

impl GoogleConfig {
    fn from_env() -> Result<Self, ConfigError> {
        if let Some(path) = get_optional_env("GOOGLE_CREDENTIALS_FILE") {
            let json = std::fs::read_to_string(Path::new(&path))
                .map_err(|e| ConfigError::InvalidCredentials(format!("{path}: {e}")))?;
            return Self::from_credentials_json(&json);
        }

        Ok(Self::new(
            get_required_env("GOOGLE_CLIENT_ID")?,
            get_validated_secret("GOOGLE_CLIENT_SECRET")?,
        ))
    }

    /// Create a configuration with Google's public endpoints.
    #[must_use]
    pub fn new(client_id: String, client_secret: SecretString) -> Self {
        Self {
            client_id,
            client_secret,
            auth_uri: GOOGLE_AUTH_URI.to_string(),
            token_uri: GOOGLE_TOKEN_URI.to_string(),
            userinfo_uri: GOOGLE_USERINFO_URI.to_string(),
        }
    }

    /// Parse a Google Cloud console `client_credentials.json`.
    ///
    /// Accepts both the `web` and `installed` application layouts. Endpoint
    /// URIs in the file override the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidCredentials` if the JSON is malformed or
    /// has neither section.
    pub fn from_credentials_json(json: &str) -> Result<Self, ConfigError> {
        let file: CredentialsFile =
            serde_json::from_str(json).map_err(|e| ConfigError::InvalidCredentials(e.to_string()))?;

        let section = file.web.or(file.installed).ok_or_else(|| {
            ConfigError::InvalidCredentials("expected a \"web\" or \"installed\" section".to_string())
        })?;

        let mut config = Self::new(section.client_id, SecretString::from(section.client_secret));
        if let Some(auth_uri) = section.auth_uri {
            config.auth_uri = auth_uri;
        }
        if let Some(token_uri) = section.token_uri {
            config.token_uri = token_uri;
        }
        Ok(config)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Generate a random alphanumeric session secret.
fn generate_session_secret() -> SecretString {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    let secret: String = (0..MIN_SESSION_SECRET_LENGTH)
        .filter_map(|_| CHARSET.get(rng.random_range(0..CHARSET.len())))
        .map(|&b| char::from(b))
        .collect();
    SecretString::from(secret)
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> GolinksConfig {
        GolinksConfig {
            database_url: SecretString::from("postgres://localhost/golinks"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            base_url: "https://go.example.com".to_string(),
            default_redirect: Destination::parse("http://www.example.com/").unwrap(),
            session_secret: generate_session_secret(),
            session_secret_generated: true,
            google: GoogleConfig::new("client-id".to_string(), SecretString::from("s3cr3t")),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
        assert!(shannon_entropy("aB3$xY9!mK2@nL5#") > 3.3);
    }

    #[test]
    fn test_validate_secret_strength() {
        assert!(validate_secret_strength("your-api-key-here", "TEST_VAR").is_err());
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
        assert!(matches!(
            validate_secret_strength(&"a".repeat(64), "TEST_VAR"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_session_secret_length() {
        assert!(validate_session_secret(&SecretString::from("x".repeat(32)), "S").is_err());
        assert!(validate_session_secret(&SecretString::from("x".repeat(64)), "S").is_ok());
    }

    #[test]
    fn test_generated_secret_is_usable() {
        let secret = generate_session_secret();
        assert_eq!(secret.expose_secret().len(), MIN_SESSION_SECRET_LENGTH);
        assert!(shannon_entropy(secret.expose_secret()) > MIN_ENTROPY_BITS_PER_CHAR);
        assert_ne!(
            secret.expose_secret(),
            generate_session_secret().expose_secret()
        );
    }

    #[test]
    fn test_session_key_requires_64_bytes() {
        let mut config = test_config();
        assert!(config.session_key().is_ok());

        config.session_secret = SecretString::from("short");
        assert!(config.session_key().is_err());
    }

    #[test]
    fn test_derived_urls() {
        let config = test_config();
        assert_eq!(
            config.oauth_redirect_uri(),
            "https://go.example.com/oauth/callback"
        );
        assert!(config.is_secure());
        assert_eq!(config.socket_addr().port(), 8080);
    }

    #[test]
    fn test_credentials_file_web() {
        let json = r#"{
            "web": {
                "client_id": "123.apps.googleusercontent.com",
                "project_id": "golinks",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_secret": "GOCSPX-abc",
                "redirect_uris": ["https://go.example.com/oauth/callback"]
            }
        }"#;

        let config = GoogleConfig::from_credentials_json(json).unwrap();
        assert_eq!(config.client_id, "123.apps.googleusercontent.com");
        assert_eq!(config.client_secret.expose_secret(), "GOCSPX-abc");
        assert_eq!(config.token_uri, "https://oauth2.googleapis.com/token");
        assert_eq!(config.userinfo_uri, GOOGLE_USERINFO_URI);
    }

    #[test]
    fn test_credentials_file_installed_uses_default_endpoints() {
        let json = r#"{"installed": {"client_id": "abc", "client_secret": "def"}}"#;
        let config = GoogleConfig::from_credentials_json(json).unwrap();
        assert_eq!(config.auth_uri, GOOGLE_AUTH_URI);
    }

    #[test]
    fn test_credentials_file_without_section() {
        assert!(matches!(
            GoogleConfig::from_credentials_json("{}"),
            Err(ConfigError::InvalidCredentials(_))
        ));
        assert!(GoogleConfig::from_credentials_json("not json").is_err());
    }

    #[test]
    fn test_google_config_debug_redacts_secret() {
        let config = GoogleConfig::new(
            "client_id_value".to_string(),
            SecretString::from("super_secret_client_secret"),
        );
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("client_id_value"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_client_secret"));
    }
}
