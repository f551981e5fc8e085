//! Redirect destination type.

use core::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Errors that can occur when parsing a [`Destination`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DestinationError {
    /// The input string is empty.
    #[error("destination cannot be empty")]
    Empty,
    /// The input is not an absolute URL.
    #[error("destination is not a valid URL: {0}")]
    Invalid(String),
    /// The input contains control characters, which `Url::parse` would
    /// silently drop but a `Location` header cannot carry.
    #[error("destination cannot contain control characters")]
    InvalidCharacter,
    /// The URL scheme is not http or https.
    #[error("destination scheme must be http or https (got {0})")]
    UnsupportedScheme(String),
}

/// An absolute http(s) URL a slug redirects to.
///
/// The original string is kept verbatim and sent back unchanged in the
/// `Location` header; parsing only validates it.
///
/// ```
/// use golinks_core::Destination;
///
/// let dest = Destination::parse("http://www.example.com").unwrap();
/// assert_eq!(dest.as_str(), "http://www.example.com");
///
/// assert!(Destination::parse("").is_err());
/// assert!(Destination::parse("javascript:alert(1)").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Destination(String);

impl Destination {
    /// Parse a `Destination` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains control characters,
    /// is not an absolute URL, or uses a scheme other than `http`/`https`.
    pub fn parse(s: &str) -> Result<Self, DestinationError> {
        if s.trim().is_empty() {
            return Err(DestinationError::Empty);
        }

        if s.chars().any(char::is_control) {
            return Err(DestinationError::InvalidCharacter);
        }

        let url = Url::parse(s).map_err(|e| DestinationError::Invalid(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(Self(s.to_owned())),
            other => Err(DestinationError::UnsupportedScheme(other.to_owned())),
        }
    }

    /// Returns the destination as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Destination {
    type Err = DestinationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Destination {
    type Error = DestinationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Destination> for String {
    fn from(dest: Destination) -> Self {
        dest.0
    }
}
